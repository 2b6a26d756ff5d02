//! Class Session Model
//!
//! A class session is the bookable unit: fixed capacity, a booked-seat
//! counter, and a version stamp for optimistic concurrency. The counter is
//! only ever mutated together with a reservation write in one transaction.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Session lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl SessionStatus {
    /// Only SCHEDULED sessions accept new reservations.
    pub fn is_bookable(self) -> bool {
        matches!(self, SessionStatus::Scheduled)
    }
}

/// Class session record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ClassSession {
    pub id: i64,
    pub club_id: i64,
    pub activity_id: i64,
    pub trainer_id: Option<i64>,
    /// Session date (YYYY-MM-DD)
    pub session_date: String,
    /// Start time (HH:MM)
    pub start_time: String,
    /// End time (HH:MM)
    pub end_time: String,
    /// Fixed at creation, never changed by booking traffic
    pub capacity: i64,
    /// Seats currently held by active reservations
    pub booked_count: i64,
    pub status: SessionStatus,
    pub notes: Option<String>,
    /// Optimistic concurrency stamp, bumped on every counter change
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ClassSession {
    pub fn available_spots(&self) -> i64 {
        self.capacity - self.booked_count
    }

    pub fn has_available_spots(&self) -> bool {
        self.available_spots() > 0
    }
}

/// Create session payload (catalog ingest)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SessionCreate {
    pub club_id: i64,
    pub activity_id: i64,
    pub trainer_id: Option<i64>,
    /// Session date (YYYY-MM-DD)
    pub session_date: String,
    /// Start time (HH:MM)
    pub start_time: String,
    /// End time (HH:MM)
    pub end_time: String,
    #[validate(range(min = 1, message = "capacity must be at least 1"))]
    pub capacity: i64,
    pub notes: Option<String>,
}

/// Session status change payload (staff)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatusUpdate {
    pub status: SessionStatus,
}
