//! Attendance Model
//!
//! Append-only check-in ledger. Rows are created only after membership
//! validity has been re-confirmed and are never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Attendance record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Attendance {
    pub id: i64,
    pub user_id: i64,
    pub membership_id: i64,
    pub club_id: i64,
    /// Set for class check-ins, None for open gym access
    pub session_id: Option<i64>,
    pub check_in_time: i64,
    pub recorded_by_user_id: Option<i64>,
    pub notes: Option<String>,
    pub created_at: i64,
}

/// Check-in payload (staff)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRequest {
    pub user_id: i64,
    pub membership_id: i64,
    pub club_id: i64,
    pub session_id: Option<i64>,
    pub notes: Option<String>,
}

/// Attendance with display names (read-side projection)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AttendanceDetail {
    pub id: i64,
    pub user_id: i64,
    pub membership_id: i64,
    pub club_id: i64,
    pub session_id: Option<i64>,
    pub check_in_time: i64,
    pub recorded_by_user_id: Option<i64>,
    pub notes: Option<String>,
    pub user_name: Option<String>,
    pub user_phone: Option<String>,
    pub plan_name: Option<String>,
}
