//! Attendance Repository
//!
//! Append-only: there is deliberately no update or delete here.

use super::RepoResult;
use shared::models::Attendance;
use sqlx::{SqliteExecutor, SqlitePool};

const ATTENDANCE_SELECT: &str = "SELECT id, user_id, membership_id, club_id, session_id, check_in_time, recorded_by_user_id, notes, created_at FROM attendance";

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<Attendance>> {
    let sql = format!("{ATTENDANCE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Attendance>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn insert(
    db: impl SqliteExecutor<'_>,
    user_id: i64,
    membership_id: i64,
    club_id: i64,
    session_id: Option<i64>,
    recorded_by_user_id: Option<i64>,
    notes: Option<&str>,
) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO attendance (id, user_id, membership_id, club_id, session_id, check_in_time, recorded_by_user_id, notes, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?6)",
    )
    .bind(id)
    .bind(user_id)
    .bind(membership_id)
    .bind(club_id)
    .bind(session_id)
    .bind(now)
    .bind(recorded_by_user_id)
    .bind(notes)
    .execute(db)
    .await?;
    Ok(id)
}

pub async fn count_by_membership(pool: &SqlitePool, membership_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE membership_id = ?")
        .bind(membership_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
