//! Attendance Recording
//!
//! Membership validity is re-checked at check-in time — a prior validate
//! call is not trusted, time may have passed. Only a confirmed-valid
//! membership produces an attendance row, and rows are never mutated.

use shared::models::{Attendance, CheckInRequest};
use sqlx::SqlitePool;
use tracing::info;

use super::{BookingError, BookingResult};
use crate::db::repository::{
    RepoError, attendance as attendance_repo, membership as membership_repo,
};

pub async fn check_in(
    pool: &SqlitePool,
    req: CheckInRequest,
    staff_user_id: i64,
    today: &str,
) -> BookingResult<Attendance> {
    let mut tx = pool.begin().await?;

    let membership = membership_repo::find_by_id(&mut *tx, req.membership_id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Membership {}", req.membership_id)))?;

    if !membership.is_valid_on(today) {
        return Err(BookingError::MembershipNotValid);
    }

    let id = attendance_repo::insert(
        &mut *tx,
        req.user_id,
        req.membership_id,
        req.club_id,
        req.session_id,
        Some(staff_user_id),
        req.notes.as_deref(),
    )
    .await?;

    let attendance = attendance_repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to record attendance".into()))?;

    tx.commit().await?;

    info!(
        attendance_id = id,
        user_id = req.user_id,
        club_id = req.club_id,
        "Check-in recorded"
    );
    Ok(attendance)
}
