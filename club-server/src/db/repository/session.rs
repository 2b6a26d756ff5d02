//! Class Session Repository
//!
//! The session's `(booked_count, version)` pair is the only resource touched
//! by more than one operation path (booking and cancellation). Every counter
//! write is a single conditional UPDATE; a write that matches zero rows means
//! the row moved under the caller, surfaced as a retryable Conflict.

use super::{RepoError, RepoResult};
use shared::models::{ClassSession, SessionCreate, SessionStatus};
use sqlx::{SqliteExecutor, SqlitePool};

const SESSION_SELECT: &str = "SELECT id, club_id, activity_id, trainer_id, session_date, start_time, end_time, capacity, booked_count, status, notes, version, created_at, updated_at FROM class_session";

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<ClassSession>> {
    let sql = format!("{SESSION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, ClassSession>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_by_club(
    pool: &SqlitePool,
    club_id: i64,
    session_date: Option<&str>,
) -> RepoResult<Vec<ClassSession>> {
    let rows = match session_date {
        Some(date) => {
            let sql = format!(
                "{SESSION_SELECT} WHERE club_id = ? AND session_date = ? ORDER BY session_date, start_time"
            );
            sqlx::query_as::<_, ClassSession>(&sql)
                .bind(club_id)
                .bind(date)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql =
                format!("{SESSION_SELECT} WHERE club_id = ? ORDER BY session_date, start_time");
            sqlx::query_as::<_, ClassSession>(&sql)
                .bind(club_id)
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows)
}

/// Catalog ingest: materialize a session with its fixed capacity.
pub async fn create(pool: &SqlitePool, data: SessionCreate) -> RepoResult<ClassSession> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO class_session (id, club_id, activity_id, trainer_id, session_date, start_time, end_time, capacity, booked_count, status, notes, version, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, 'SCHEDULED', ?9, 0, ?10, ?10)",
    )
    .bind(id)
    .bind(data.club_id)
    .bind(data.activity_id)
    .bind(data.trainer_id)
    .bind(&data.session_date)
    .bind(&data.start_time)
    .bind(&data.end_time)
    .bind(data.capacity)
    .bind(&data.notes)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create session".into()))
}

/// Conditional seat claim.
///
/// Succeeds only if the version stamp still matches what the caller read
/// inside the same transaction, the session is still SCHEDULED, and a seat
/// is free. Zero rows affected surfaces as `Conflict`; the caller must
/// re-validate business rules against fresh state before retrying, so no
/// silent retry happens here.
pub async fn claim_seat(
    db: impl SqliteExecutor<'_>,
    id: i64,
    version: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE class_session SET booked_count = booked_count + 1, version = version + 1, updated_at = ?1 WHERE id = ?2 AND version = ?3 AND status = 'SCHEDULED' AND booked_count < capacity",
    )
    .bind(now)
    .bind(id)
    .bind(version)
    .execute(db)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Session {id} was updated concurrently"
        )));
    }
    Ok(())
}

/// Floored seat release.
///
/// No-op when the session is gone or already CANCELLED — a cancelled
/// session's seat accounting no longer matters.
pub async fn release_seat(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE class_session SET booked_count = MAX(booked_count - 1, 0), version = version + 1, updated_at = ?1 WHERE id = ?2 AND status != 'CANCELLED'",
    )
    .bind(now)
    .bind(id)
    .execute(db)
    .await?;
    Ok(())
}

/// Staff status change. SCHEDULED is the only state that can move.
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: SessionStatus,
) -> RepoResult<ClassSession> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE class_session SET status = ?1, version = version + 1, updated_at = ?2 WHERE id = ?3 AND status = 'SCHEDULED'",
    )
    .bind(status)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Session {id} not found or no longer scheduled"
        )));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Session {id} not found")))
}
