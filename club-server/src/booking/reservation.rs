//! Reservation Lifecycle
//!
//! Seat claim and reservation write are one atomic unit; the transaction
//! rolls back the claimed seat if anything after it fails. Seat contention
//! is an expected, recoverable condition: a stale-version conflict retries
//! the full sequence once against fresh state (re-checking the duplicate
//! and availability rules), then surfaces as a retryable error.

use shared::models::Reservation;
use sqlx::SqlitePool;
use tracing::info;

use super::{BookingError, BookingResult};
use crate::db::repository::{RepoError, reservation as reservation_repo, session as session_repo};

pub async fn create_reservation(
    pool: &SqlitePool,
    user_id: i64,
    session_id: i64,
) -> BookingResult<Reservation> {
    match try_create(pool, user_id, session_id).await {
        Err(BookingError::Repo(RepoError::Conflict(_))) => {
            try_create(pool, user_id, session_id).await
        }
        other => other,
    }
}

async fn try_create(
    pool: &SqlitePool,
    user_id: i64,
    session_id: i64,
) -> BookingResult<Reservation> {
    let mut tx = pool.begin().await?;

    if reservation_repo::exists_non_cancelled(&mut *tx, user_id, session_id).await? {
        return Err(BookingError::AlreadyBooked);
    }

    let session = session_repo::find_by_id(&mut *tx, session_id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Session {session_id}")))?;

    if !session.status.is_bookable() {
        return Err(BookingError::SessionNotBookable);
    }
    if !session.has_available_spots() {
        return Err(BookingError::SessionFull);
    }

    session_repo::claim_seat(&mut *tx, session_id, session.version).await?;
    let id = reservation_repo::insert(&mut *tx, user_id, session_id, session.club_id).await?;
    let reservation = reservation_repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create reservation".into()))?;

    tx.commit().await?;

    info!(
        reservation_id = id,
        user_id, session_id, "Reservation created"
    );
    Ok(reservation)
}

pub async fn cancel_reservation(
    pool: &SqlitePool,
    id: i64,
    requester_id: i64,
    reason: Option<&str>,
    is_staff: bool,
) -> BookingResult<Reservation> {
    let mut tx = pool.begin().await?;

    let reservation = reservation_repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Reservation {id}")))?;

    if !is_staff && reservation.user_id != requester_id {
        return Err(BookingError::Forbidden);
    }
    if !reservation.can_cancel() {
        return Err(BookingError::CannotCancel);
    }

    // Best-effort release: a vanished or cancelled session no-ops here and
    // the cancellation still goes through.
    session_repo::release_seat(&mut *tx, reservation.session_id).await?;
    reservation_repo::mark_cancelled(&mut *tx, id, reservation.version, reason).await?;

    let updated = reservation_repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to reload reservation".into()))?;

    tx.commit().await?;

    info!(reservation_id = id, requester_id, "Reservation cancelled");
    Ok(updated)
}

/// Staff check-in of a paid reservation; a marker, not a status change.
pub async fn check_in_reservation(pool: &SqlitePool, id: i64) -> BookingResult<Reservation> {
    let reservation = reservation_repo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Reservation {id}")))?;

    if !reservation.can_check_in() {
        return Err(BookingError::CannotCheckIn);
    }

    reservation_repo::mark_checked_in(pool, id).await?;
    let updated = reservation_repo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Reservation {id}")))?;

    info!(reservation_id = id, "Reservation checked in");
    Ok(updated)
}

/// Staff marks a paid reservation as a no-show. The seat stays consumed.
pub async fn mark_no_show(pool: &SqlitePool, id: i64) -> BookingResult<Reservation> {
    let reservation = reservation_repo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Reservation {id}")))?;

    if reservation.status != shared::models::ReservationStatus::Paid {
        return Err(BookingError::CannotMarkNoShow);
    }

    reservation_repo::mark_no_show(pool, id).await?;
    let updated = reservation_repo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Reservation {id}")))?;

    info!(reservation_id = id, "Reservation marked as no-show");
    Ok(updated)
}

/// Fetch with ownership check: users see their own rows, staff see all.
pub async fn get_reservation(
    pool: &SqlitePool,
    id: i64,
    requester_id: i64,
    is_staff: bool,
) -> BookingResult<Reservation> {
    let reservation = reservation_repo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Reservation {id}")))?;

    if !is_staff && reservation.user_id != requester_id {
        return Err(BookingError::Forbidden);
    }
    Ok(reservation)
}
