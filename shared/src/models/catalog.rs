//! Catalog Reference Models
//!
//! Display data owned by the upstream management backend and mirrored here
//! for the read-side projections. The booking core never edits these beyond
//! the sync upserts; absent rows only mean missing names, never errors.

use serde::{Deserialize, Serialize};

/// User display data from the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserAccount {
    pub id: i64,
    pub full_name: String,
    pub phone: Option<String>,
}

/// Club display data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Club {
    pub id: i64,
    pub name: String,
}

/// Activity display data (yoga, crossfit, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ActivityDefinition {
    pub id: i64,
    pub name: String,
}

/// Membership plan descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MembershipPlan {
    pub id: i64,
    pub name: String,
    /// None = unlimited plan
    pub duration_days: Option<i64>,
    /// Price in minor currency units
    pub price: i64,
}

/// Catalog sync payload pushed by the management backend
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogSync {
    #[serde(default)]
    pub users: Vec<UserAccount>,
    #[serde(default)]
    pub clubs: Vec<Club>,
    #[serde(default)]
    pub activities: Vec<ActivityDefinition>,
    #[serde(default)]
    pub plans: Vec<MembershipPlan>,
}
