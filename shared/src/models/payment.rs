//! Payment Model
//!
//! One row per settlement event. A payment targets exactly one of a
//! reservation or a membership; at most one payment may reference a given
//! reservation (UNIQUE index backs the guard in code).

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payment method accepted at the front desk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Pos,
    BankTransfer,
}

/// Payment settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Failed,
}

/// Payment record
///
/// `amount` is in minor currency units (IRR carries no fractional part).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    /// Set for class-booking payments, mutually exclusive with membership_id
    pub reservation_id: Option<i64>,
    /// Set for membership-approval payments
    pub membership_id: Option<i64>,
    pub user_id: i64,
    pub club_id: i64,
    pub amount: i64,
    pub currency: String,
    pub method: PaymentMethod,
    pub reference_number: Option<String>,
    pub status: PaymentStatus,
    pub paid_at: Option<i64>,
    /// Staff user who recorded the settlement
    pub recorded_by: Option<i64>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Record payment payload (staff, reservation settlement)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    pub reservation_id: i64,
    #[validate(range(min = 1, message = "amount must be positive"))]
    pub amount: i64,
    pub method: PaymentMethod,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

/// Pending payment list entry (read-side projection, staff cashier view)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PendingPaymentDetail {
    pub reservation_id: i64,
    pub user_id: i64,
    pub user_full_name: Option<String>,
    pub user_phone: Option<String>,
    pub session_id: i64,
    pub activity_name: Option<String>,
    pub session_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub booked_at: i64,
    pub club_id: i64,
    pub club_name: Option<String>,
}

/// Payment history entry (read-side projection)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PaymentHistoryDetail {
    pub id: i64,
    pub reservation_id: Option<i64>,
    pub membership_id: Option<i64>,
    pub user_id: i64,
    pub user_full_name: Option<String>,
    pub user_phone: Option<String>,
    pub club_id: i64,
    pub amount: i64,
    pub currency: String,
    pub method: PaymentMethod,
    pub reference_number: Option<String>,
    pub status: PaymentStatus,
    pub paid_at: Option<i64>,
    pub recorded_by: Option<i64>,
    pub recorded_by_name: Option<String>,
    pub notes: Option<String>,
    /// "RESERVATION" or "MEMBERSHIP", derived from the target column
    pub payment_type: String,
    pub activity_name: Option<String>,
    pub plan_name: Option<String>,
}
