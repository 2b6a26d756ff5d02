//! User Membership Repository

use super::{RepoError, RepoResult};
use shared::models::UserMembership;
use sqlx::SqliteExecutor;

const MEMBERSHIP_SELECT: &str = "SELECT id, user_id, plan_id, club_id, start_date, end_date, status, payment_id, notes, created_at, updated_at FROM user_membership";

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<UserMembership>> {
    let sql = format!("{MEMBERSHIP_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, UserMembership>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// ACTIVE memberships of a user at a club. Deliberately does not filter the
/// validity window: the sweep may not have run yet, and the validation flow
/// wants to see an expired-but-still-ACTIVE row to report "expired".
pub async fn find_active_by_user_and_club(
    db: impl SqliteExecutor<'_>,
    user_id: i64,
    club_id: i64,
) -> RepoResult<Vec<UserMembership>> {
    let sql = format!(
        "{MEMBERSHIP_SELECT} WHERE user_id = ? AND club_id = ? AND status = 'ACTIVE' ORDER BY end_date IS NOT NULL, end_date DESC"
    );
    let rows = sqlx::query_as::<_, UserMembership>(&sql)
        .bind(user_id)
        .bind(club_id)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

/// Insert a PENDING membership request.
pub async fn insert_pending(
    db: impl SqliteExecutor<'_>,
    user_id: i64,
    plan_id: i64,
    club_id: i64,
    start_date: &str,
    end_date: Option<&str>,
    notes: Option<&str>,
) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO user_membership (id, user_id, plan_id, club_id, start_date, end_date, status, notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'PENDING', ?7, ?8, ?8)",
    )
    .bind(id)
    .bind(user_id)
    .bind(plan_id)
    .bind(club_id)
    .bind(start_date)
    .bind(end_date)
    .bind(notes)
    .bind(now)
    .execute(db)
    .await?;
    Ok(id)
}

/// Approval flip: PENDING -> ACTIVE, start date reset to the approval date,
/// payment linked. Paired with the payment insert in one transaction.
pub async fn mark_active(
    db: impl SqliteExecutor<'_>,
    id: i64,
    payment_id: i64,
    start_date: &str,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE user_membership SET status = 'ACTIVE', payment_id = ?1, start_date = ?2, updated_at = ?3 WHERE id = ?4 AND status = 'PENDING'",
    )
    .bind(payment_id)
    .bind(start_date)
    .bind(now)
    .bind(id)
    .execute(db)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Membership {id} is no longer pending"
        )));
    }
    Ok(())
}

/// Rejection: PENDING -> CANCELLED with the reason recorded.
pub async fn mark_rejected(
    db: impl SqliteExecutor<'_>,
    id: i64,
    reason: Option<&str>,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE user_membership SET status = 'CANCELLED', notes = COALESCE(?1, notes), updated_at = ?2 WHERE id = ?3 AND status = 'PENDING'",
    )
    .bind(reason)
    .bind(now)
    .bind(id)
    .execute(db)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Membership {id} is no longer pending"
        )));
    }
    Ok(())
}

/// Staff suspension of an active membership.
pub async fn mark_suspended(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE user_membership SET status = 'SUSPENDED', updated_at = ?1 WHERE id = ?2 AND status = 'ACTIVE'",
    )
    .bind(now)
    .bind(id)
    .execute(db)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Membership {id} is not active"
        )));
    }
    Ok(())
}

/// Staff cancellation of an active or suspended membership.
pub async fn mark_cancelled(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE user_membership SET status = 'CANCELLED', updated_at = ?1 WHERE id = ?2 AND status IN ('ACTIVE', 'SUSPENDED')",
    )
    .bind(now)
    .bind(id)
    .execute(db)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Membership {id} cannot be cancelled"
        )));
    }
    Ok(())
}

/// Batch expiry sweep: every ACTIVE membership whose window has passed flips
/// to EXPIRED. Unlimited memberships (NULL end_date) are never touched and
/// running the sweep twice changes nothing.
pub async fn expire_older_than(db: impl SqliteExecutor<'_>, today: &str) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE user_membership SET status = 'EXPIRED', updated_at = ?1 WHERE status = 'ACTIVE' AND end_date IS NOT NULL AND end_date < ?2",
    )
    .bind(now)
    .bind(today)
    .execute(db)
    .await?;
    Ok(rows.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::MembershipStatus;
    use sqlx::SqlitePool;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE user_membership (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                plan_id INTEGER NOT NULL,
                club_id INTEGER NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT,
                status TEXT NOT NULL DEFAULT 'PENDING',
                payment_id INTEGER,
                notes TEXT,
                created_at INTEGER NOT NULL DEFAULT 0,
                updated_at INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    #[tokio::test]
    async fn request_then_approve_links_payment_and_resets_start() {
        let pool = test_pool().await;
        let id = insert_pending(&pool, 10, 2, 30, "2026-09-01", Some("2026-12-01"), None)
            .await
            .unwrap();

        mark_active(&pool, id, 555, "2026-08-07").await.unwrap();

        let m = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(m.status, MembershipStatus::Active);
        assert_eq!(m.payment_id, Some(555));
        assert_eq!(m.start_date, "2026-08-07"); // approval date, not requested date
    }

    #[tokio::test]
    async fn approve_twice_conflicts() {
        let pool = test_pool().await;
        let id = insert_pending(&pool, 10, 2, 30, "2026-08-07", None, None)
            .await
            .unwrap();
        mark_active(&pool, id, 555, "2026-08-07").await.unwrap();

        let err = mark_active(&pool, id, 556, "2026-08-07").await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[tokio::test]
    async fn reject_records_reason_and_requires_pending() {
        let pool = test_pool().await;
        let id = insert_pending(&pool, 10, 2, 30, "2026-08-07", None, None)
            .await
            .unwrap();
        mark_rejected(&pool, id, Some("plan discontinued")).await.unwrap();

        let m = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(m.status, MembershipStatus::Cancelled);
        assert_eq!(m.notes.as_deref(), Some("plan discontinued"));

        let err = mark_rejected(&pool, id, None).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[tokio::test]
    async fn sweep_expires_only_past_windows_and_is_idempotent() {
        let pool = test_pool().await;
        let past = insert_pending(&pool, 1, 2, 30, "2026-01-01", Some("2026-08-06"), None)
            .await
            .unwrap();
        let future = insert_pending(&pool, 2, 2, 30, "2026-01-01", Some("2026-12-31"), None)
            .await
            .unwrap();
        let unlimited = insert_pending(&pool, 3, 2, 30, "2026-01-01", None, None)
            .await
            .unwrap();
        for id in [past, future, unlimited] {
            mark_active(&pool, id, 1, "2026-01-01").await.unwrap();
        }

        assert_eq!(expire_older_than(&pool, "2026-08-07").await.unwrap(), 1);
        // Second run: nothing left to expire
        assert_eq!(expire_older_than(&pool, "2026-08-07").await.unwrap(), 0);

        let m = find_by_id(&pool, past).await.unwrap().unwrap();
        assert_eq!(m.status, MembershipStatus::Expired);
        let m = find_by_id(&pool, future).await.unwrap().unwrap();
        assert_eq!(m.status, MembershipStatus::Active);
        let m = find_by_id(&pool, unlimited).await.unwrap().unwrap();
        assert_eq!(m.status, MembershipStatus::Active);
    }

    #[tokio::test]
    async fn ending_today_is_not_expired() {
        let pool = test_pool().await;
        let id = insert_pending(&pool, 1, 2, 30, "2026-01-01", Some("2026-08-07"), None)
            .await
            .unwrap();
        mark_active(&pool, id, 1, "2026-01-01").await.unwrap();

        assert_eq!(expire_older_than(&pool, "2026-08-07").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn suspend_and_cancel_follow_transition_table() {
        let pool = test_pool().await;
        let id = insert_pending(&pool, 1, 2, 30, "2026-01-01", None, None)
            .await
            .unwrap();

        // Pending cannot be suspended
        assert!(mark_suspended(&pool, id).await.is_err());

        mark_active(&pool, id, 1, "2026-01-01").await.unwrap();
        mark_suspended(&pool, id).await.unwrap();
        mark_cancelled(&pool, id).await.unwrap();

        // Cancelled is terminal
        assert!(mark_cancelled(&pool, id).await.is_err());
    }
}
