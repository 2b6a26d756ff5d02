//! Reservation Model
//!
//! One row per booking attempt that claimed a seat. Rows are never deleted,
//! only state-transitioned, so the ledger doubles as an audit trail.

use serde::{Deserialize, Serialize};

/// Reservation lifecycle status
///
/// ```text
/// PENDING_PAYMENT --payment--> PAID --check-in--> (checked_in_at set, status stays PAID)
/// PENDING_PAYMENT | PAID --cancel--> CANCELLED
/// PAID --staff--> NO_SHOW | COMPLETED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    PendingPayment,
    Paid,
    Cancelled,
    NoShow,
    Completed,
}

impl ReservationStatus {
    /// Statuses that hold a seat on the session counter.
    pub fn holds_seat(self) -> bool {
        matches!(
            self,
            ReservationStatus::PendingPayment | ReservationStatus::Paid
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ReservationStatus::Cancelled | ReservationStatus::NoShow | ReservationStatus::Completed
        )
    }

    /// Closed transition table; everything not listed is rejected.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (PendingPayment, Paid)
                | (PendingPayment, Cancelled)
                | (Paid, Cancelled)
                | (Paid, NoShow)
                | (Paid, Completed)
        )
    }
}

/// Reservation record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub user_id: i64,
    pub session_id: i64,
    pub club_id: i64,
    pub status: ReservationStatus,
    pub booked_at: i64,
    pub cancelled_at: Option<i64>,
    pub cancellation_reason: Option<String>,
    pub checked_in_at: Option<i64>,
    /// Optimistic concurrency stamp
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Reservation {
    pub fn can_cancel(&self) -> bool {
        self.status.can_transition_to(ReservationStatus::Cancelled)
    }

    /// Check-in is a marker on a PAID reservation, not a status change.
    pub fn can_check_in(&self) -> bool {
        self.status == ReservationStatus::Paid && self.checked_in_at.is_none()
    }
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub session_id: i64,
}

/// Cancel reservation payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReservationCancel {
    pub reason: Option<String>,
}
