//! Booking-level tests run against the real schema: a tempfile database
//! through `DbService`, WAL mode and migrations included, so the conditional
//! writes are exercised under the same journal mode as production.

mod test_flows;

use shared::models::{ClassSession, SessionCreate};
use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::db::DbService;
use crate::db::repository::{membership as membership_repo, session as session_repo};

pub(super) const TODAY: &str = "2026-08-07";
pub(super) const YESTERDAY: &str = "2026-08-06";

/// Pool over a fresh tempfile database with migrations applied.
/// The TempDir must stay alive for the duration of the test.
pub(super) async fn test_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("club.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();
    (db.pool, dir)
}

pub(super) async fn seed_session(pool: &SqlitePool, capacity: i64) -> ClassSession {
    session_repo::create(
        pool,
        SessionCreate {
            club_id: 1,
            activity_id: 7,
            trainer_id: None,
            session_date: TODAY.into(),
            start_time: "10:00".into(),
            end_time: "11:00".into(),
            capacity,
            notes: None,
        },
    )
    .await
    .unwrap()
}

/// Directly seed an ACTIVE membership with the given window.
pub(super) async fn active_membership(
    pool: &SqlitePool,
    user_id: i64,
    club_id: i64,
    end_date: Option<&str>,
) -> i64 {
    let id = membership_repo::insert_pending(pool, user_id, 5, club_id, TODAY, end_date, None)
        .await
        .unwrap();
    membership_repo::mark_active(pool, id, 1, TODAY).await.unwrap();
    id
}
