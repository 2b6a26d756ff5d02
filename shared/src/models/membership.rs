//! User Membership Model
//!
//! A membership is a purchased access grant with a validity window and an
//! approval workflow: requested PENDING, activated by staff approval (which
//! also records the payment), expired by the periodic sweep.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::payment::PaymentMethod;

/// Membership lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipStatus {
    /// User requested, waiting for staff approval and payment
    Pending,
    /// Payment confirmed, membership usable
    Active,
    /// Validity window ran out (set by the periodic sweep)
    Expired,
    /// Temporarily suspended by staff
    Suspended,
    /// Rejected or cancelled
    Cancelled,
}

impl MembershipStatus {
    /// Approval and rejection both consume a PENDING request.
    pub fn is_pending(self) -> bool {
        matches!(self, MembershipStatus::Pending)
    }

    pub fn can_transition_to(self, next: MembershipStatus) -> bool {
        use MembershipStatus::*;
        matches!(
            (self, next),
            (Pending, Active)
                | (Pending, Cancelled)
                | (Active, Expired)
                | (Active, Suspended)
                | (Active, Cancelled)
                | (Suspended, Active)
                | (Suspended, Cancelled)
        )
    }
}

/// User membership record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserMembership {
    pub id: i64,
    pub user_id: i64,
    pub plan_id: i64,
    pub club_id: i64,
    /// Start date (YYYY-MM-DD); reset to the approval date on activation
    pub start_date: String,
    /// End date (YYYY-MM-DD), None = unlimited
    pub end_date: Option<String>,
    pub status: MembershipStatus,
    /// Payment created at approval time
    pub payment_id: Option<i64>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl UserMembership {
    /// Validity predicate: ACTIVE and inside the window on the given day.
    ///
    /// `today` is an ISO date (YYYY-MM-DD); ISO dates compare correctly as
    /// strings, which keeps the predicate clock-free for tests.
    pub fn is_valid_on(&self, today: &str) -> bool {
        if self.status != MembershipStatus::Active {
            return false;
        }
        match &self.end_date {
            Some(end) => today <= end.as_str(),
            None => true,
        }
    }

    pub fn is_expired_on(&self, today: &str) -> bool {
        matches!(&self.end_date, Some(end) if today > end.as_str())
    }
}

/// Membership purchase request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseMembershipRequest {
    pub plan_id: i64,
    pub club_id: i64,
    /// Defaults to today when omitted
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
}

/// Membership approval payload (staff)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApproveMembershipRequest {
    #[validate(range(min = 1, message = "amount must be positive"))]
    pub amount: i64,
    pub method: PaymentMethod,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

/// Membership rejection payload (staff)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RejectMembershipRequest {
    pub reason: Option<String>,
}

/// Validation result for staff check-in UIs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateMembershipResponse {
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Membership with display names (read-side projection)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MembershipDetail {
    pub id: i64,
    pub user_id: i64,
    pub plan_id: i64,
    pub club_id: i64,
    pub start_date: String,
    pub end_date: Option<String>,
    pub status: MembershipStatus,
    pub payment_id: Option<i64>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub club_name: Option<String>,
    pub plan_name: Option<String>,
    pub user_name: Option<String>,
    pub user_phone: Option<String>,
}
