//! Reservation Repository
//!
//! Rows are only ever inserted and state-transitioned; every transition is a
//! guarded UPDATE whose WHERE clause encodes the legal source states, so an
//! illegal move matches zero rows instead of clobbering the ledger.

use super::{RepoError, RepoResult};
use shared::models::Reservation;
use sqlx::{SqliteExecutor, SqlitePool};

const RESERVATION_SELECT: &str = "SELECT id, user_id, session_id, club_id, status, booked_at, cancelled_at, cancellation_reason, checked_in_at, version, created_at, updated_at FROM reservation";

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<Reservation>> {
    let sql = format!("{RESERVATION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Reservation>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Reservation>> {
    let sql = format!("{RESERVATION_SELECT} WHERE user_id = ? ORDER BY booked_at DESC");
    let rows = sqlx::query_as::<_, Reservation>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Duplicate-booking guard: any non-cancelled reservation blocks a rebook.
pub async fn exists_non_cancelled(
    db: impl SqliteExecutor<'_>,
    user_id: i64,
    session_id: i64,
) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reservation WHERE user_id = ? AND session_id = ? AND status != 'CANCELLED'",
    )
    .bind(user_id)
    .bind(session_id)
    .fetch_one(db)
    .await?;
    Ok(count > 0)
}

/// Active (seat-holding) reservations for a session; drives the capacity
/// invariant checks.
pub async fn count_active_by_session(
    db: impl SqliteExecutor<'_>,
    session_id: i64,
) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reservation WHERE session_id = ? AND status IN ('PENDING_PAYMENT', 'PAID')",
    )
    .bind(session_id)
    .fetch_one(db)
    .await?;
    Ok(count)
}

/// Insert a fresh PENDING_PAYMENT reservation; always paired with a seat
/// claim inside the same transaction.
pub async fn insert(
    db: impl SqliteExecutor<'_>,
    user_id: i64,
    session_id: i64,
    club_id: i64,
) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO reservation (id, user_id, session_id, club_id, status, booked_at, version, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 'PENDING_PAYMENT', ?5, 0, ?5, ?5)",
    )
    .bind(id)
    .bind(user_id)
    .bind(session_id)
    .bind(club_id)
    .bind(now)
    .execute(db)
    .await?;
    Ok(id)
}

/// Versioned flip to CANCELLED from a cancellable state.
pub async fn mark_cancelled(
    db: impl SqliteExecutor<'_>,
    id: i64,
    version: i64,
    reason: Option<&str>,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE reservation SET status = 'CANCELLED', cancelled_at = ?1, cancellation_reason = ?2, version = version + 1, updated_at = ?1 WHERE id = ?3 AND version = ?4 AND status IN ('PENDING_PAYMENT', 'PAID')",
    )
    .bind(now)
    .bind(reason)
    .bind(id)
    .bind(version)
    .execute(db)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Reservation {id} was updated concurrently"
        )));
    }
    Ok(())
}

/// Payment settlement flip; legal only while awaiting payment.
pub async fn mark_paid(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE reservation SET status = 'PAID', version = version + 1, updated_at = ?1 WHERE id = ?2 AND status = 'PENDING_PAYMENT'",
    )
    .bind(now)
    .bind(id)
    .execute(db)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Reservation {id} is no longer awaiting payment"
        )));
    }
    Ok(())
}

/// Check-in marker; status stays PAID.
pub async fn mark_checked_in(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE reservation SET checked_in_at = ?1, version = version + 1, updated_at = ?1 WHERE id = ?2 AND status = 'PAID' AND checked_in_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(db)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Reservation {id} cannot be checked in"
        )));
    }
    Ok(())
}

/// Staff marks a paid reservation as a no-show; the seat stays consumed.
pub async fn mark_no_show(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE reservation SET status = 'NO_SHOW', version = version + 1, updated_at = ?1 WHERE id = ?2 AND status = 'PAID'",
    )
    .bind(now)
    .bind(id)
    .execute(db)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Reservation {id} is not eligible for no-show"
        )));
    }
    Ok(())
}
