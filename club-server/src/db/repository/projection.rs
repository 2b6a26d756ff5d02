//! Read-Side Projection
//!
//! Cross-entity enrichment for staff-facing views: pending payments,
//! payment history, membership and attendance listings with display names.
//! Pure read plumbing, decoupled from the mutation paths — every lookup is
//! a LEFT JOIN, so missing catalog rows yield NULL names instead of errors.

use super::RepoResult;
use shared::models::{AttendanceDetail, MembershipDetail, PaymentHistoryDetail, PendingPaymentDetail};
use sqlx::SqlitePool;

const MEMBERSHIP_DETAIL_SELECT: &str = "SELECT m.id, m.user_id, m.plan_id, m.club_id, m.start_date, m.end_date, m.status, m.payment_id, m.notes, m.created_at, c.name AS club_name, pl.name AS plan_name, u.full_name AS user_name, u.phone AS user_phone FROM user_membership m LEFT JOIN club c ON m.club_id = c.id LEFT JOIN membership_plan pl ON m.plan_id = pl.id LEFT JOIN user_account u ON m.user_id = u.id";

const ATTENDANCE_DETAIL_SELECT: &str = "SELECT att.id, att.user_id, att.membership_id, att.club_id, att.session_id, att.check_in_time, att.recorded_by_user_id, att.notes, u.full_name AS user_name, u.phone AS user_phone, pl.name AS plan_name FROM attendance att LEFT JOIN user_account u ON att.user_id = u.id LEFT JOIN user_membership m ON att.membership_id = m.id LEFT JOIN membership_plan pl ON m.plan_id = pl.id";

/// Cashier worklist: reservations awaiting payment at a club.
pub async fn pending_payments_by_club(
    pool: &SqlitePool,
    club_id: i64,
) -> RepoResult<Vec<PendingPaymentDetail>> {
    let rows = sqlx::query_as::<_, PendingPaymentDetail>(
        "SELECT r.id AS reservation_id, r.user_id, u.full_name AS user_full_name, u.phone AS user_phone, r.session_id, a.name AS activity_name, s.session_date, s.start_time, s.end_time, r.booked_at, r.club_id, c.name AS club_name FROM reservation r LEFT JOIN class_session s ON r.session_id = s.id LEFT JOIN activity_definition a ON s.activity_id = a.id LEFT JOIN user_account u ON r.user_id = u.id LEFT JOIN club c ON r.club_id = c.id WHERE r.club_id = ? AND r.status = 'PENDING_PAYMENT' ORDER BY r.booked_at",
    )
    .bind(club_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Settlement history for a club, newest first.
pub async fn payment_history_by_club(
    pool: &SqlitePool,
    club_id: i64,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<PaymentHistoryDetail>> {
    let rows = sqlx::query_as::<_, PaymentHistoryDetail>(
        "SELECT p.id, p.reservation_id, p.membership_id, p.user_id, u.full_name AS user_full_name, u.phone AS user_phone, p.club_id, p.amount, p.currency, p.method, p.reference_number, p.status, p.paid_at, p.recorded_by, ru.full_name AS recorded_by_name, p.notes, CASE WHEN p.membership_id IS NOT NULL THEN 'MEMBERSHIP' ELSE 'RESERVATION' END AS payment_type, a.name AS activity_name, pl.name AS plan_name FROM payment p LEFT JOIN user_account u ON p.user_id = u.id LEFT JOIN user_account ru ON p.recorded_by = ru.id LEFT JOIN reservation r ON p.reservation_id = r.id LEFT JOIN class_session s ON r.session_id = s.id LEFT JOIN activity_definition a ON s.activity_id = a.id LEFT JOIN user_membership m ON p.membership_id = m.id LEFT JOIN membership_plan pl ON m.plan_id = pl.id WHERE p.club_id = ? ORDER BY p.created_at DESC LIMIT ? OFFSET ?",
    )
    .bind(club_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn memberships_by_user(
    pool: &SqlitePool,
    user_id: i64,
) -> RepoResult<Vec<MembershipDetail>> {
    let sql = format!("{MEMBERSHIP_DETAIL_SELECT} WHERE m.user_id = ? ORDER BY m.created_at DESC");
    let rows = sqlx::query_as::<_, MembershipDetail>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn memberships_by_club_and_status(
    pool: &SqlitePool,
    club_id: i64,
    status: &str,
) -> RepoResult<Vec<MembershipDetail>> {
    let sql = format!(
        "{MEMBERSHIP_DETAIL_SELECT} WHERE m.club_id = ? AND m.status = ? ORDER BY m.created_at DESC"
    );
    let rows = sqlx::query_as::<_, MembershipDetail>(&sql)
        .bind(club_id)
        .bind(status)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Check-ins at a club within [from, to) millis.
pub async fn attendance_by_club_between(
    pool: &SqlitePool,
    club_id: i64,
    from_millis: i64,
    to_millis: i64,
) -> RepoResult<Vec<AttendanceDetail>> {
    let sql = format!(
        "{ATTENDANCE_DETAIL_SELECT} WHERE att.club_id = ? AND att.check_in_time >= ? AND att.check_in_time < ? ORDER BY att.check_in_time DESC"
    );
    let rows = sqlx::query_as::<_, AttendanceDetail>(&sql)
        .bind(club_id)
        .bind(from_millis)
        .bind(to_millis)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn attendance_by_user(
    pool: &SqlitePool,
    user_id: i64,
) -> RepoResult<Vec<AttendanceDetail>> {
    let sql = format!("{ATTENDANCE_DETAIL_SELECT} WHERE att.user_id = ? ORDER BY att.check_in_time DESC");
    let rows = sqlx::query_as::<_, AttendanceDetail>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn attendance_by_session(
    pool: &SqlitePool,
    session_id: i64,
) -> RepoResult<Vec<AttendanceDetail>> {
    let sql = format!(
        "{ATTENDANCE_DETAIL_SELECT} WHERE att.session_id = ? ORDER BY att.check_in_time DESC"
    );
    let rows = sqlx::query_as::<_, AttendanceDetail>(&sql)
        .bind(session_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{attendance, catalog, membership, payment, reservation, session};
    use shared::models::{CatalogSync, Club, PaymentMethod, SessionCreate, UserAccount};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        for ddl in [
            "CREATE TABLE class_session (id INTEGER PRIMARY KEY, club_id INTEGER NOT NULL, activity_id INTEGER NOT NULL, trainer_id INTEGER, session_date TEXT NOT NULL, start_time TEXT NOT NULL, end_time TEXT NOT NULL, capacity INTEGER NOT NULL, booked_count INTEGER NOT NULL DEFAULT 0, status TEXT NOT NULL DEFAULT 'SCHEDULED', notes TEXT, version INTEGER NOT NULL DEFAULT 0, created_at INTEGER NOT NULL DEFAULT 0, updated_at INTEGER NOT NULL DEFAULT 0)",
            "CREATE TABLE reservation (id INTEGER PRIMARY KEY, user_id INTEGER NOT NULL, session_id INTEGER NOT NULL, club_id INTEGER NOT NULL, status TEXT NOT NULL DEFAULT 'PENDING_PAYMENT', booked_at INTEGER NOT NULL, cancelled_at INTEGER, cancellation_reason TEXT, checked_in_at INTEGER, version INTEGER NOT NULL DEFAULT 0, created_at INTEGER NOT NULL DEFAULT 0, updated_at INTEGER NOT NULL DEFAULT 0)",
            "CREATE TABLE payment (id INTEGER PRIMARY KEY, reservation_id INTEGER, membership_id INTEGER, user_id INTEGER NOT NULL, club_id INTEGER NOT NULL, amount INTEGER NOT NULL, currency TEXT NOT NULL DEFAULT 'IRR', method TEXT NOT NULL, reference_number TEXT, status TEXT NOT NULL DEFAULT 'PENDING', paid_at INTEGER, recorded_by INTEGER, notes TEXT, created_at INTEGER NOT NULL DEFAULT 0, updated_at INTEGER NOT NULL DEFAULT 0)",
            "CREATE TABLE user_membership (id INTEGER PRIMARY KEY, user_id INTEGER NOT NULL, plan_id INTEGER NOT NULL, club_id INTEGER NOT NULL, start_date TEXT NOT NULL, end_date TEXT, status TEXT NOT NULL DEFAULT 'PENDING', payment_id INTEGER, notes TEXT, created_at INTEGER NOT NULL DEFAULT 0, updated_at INTEGER NOT NULL DEFAULT 0)",
            "CREATE TABLE attendance (id INTEGER PRIMARY KEY, user_id INTEGER NOT NULL, membership_id INTEGER NOT NULL, club_id INTEGER NOT NULL, session_id INTEGER, check_in_time INTEGER NOT NULL, recorded_by_user_id INTEGER, notes TEXT, created_at INTEGER NOT NULL DEFAULT 0)",
            "CREATE TABLE user_account (id INTEGER PRIMARY KEY, full_name TEXT NOT NULL, phone TEXT)",
            "CREATE TABLE club (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
            "CREATE TABLE activity_definition (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
            "CREATE TABLE membership_plan (id INTEGER PRIMARY KEY, name TEXT NOT NULL, duration_days INTEGER, price INTEGER NOT NULL DEFAULT 0)",
        ] {
            sqlx::query(ddl).execute(&pool).await.unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn pending_payments_survive_missing_catalog_rows() {
        let pool = test_pool().await;
        let s = session::create(
            &pool,
            SessionCreate {
                club_id: 1,
                activity_id: 7,
                trainer_id: None,
                session_date: "2026-08-07".into(),
                start_time: "10:00".into(),
                end_time: "11:00".into(),
                capacity: 5,
                notes: None,
            },
        )
        .await
        .unwrap();
        reservation::insert(&pool, 42, s.id, 1).await.unwrap();

        // No user_account / club / activity rows synced at all
        let pending = pending_payments_by_club(&pool, 1).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].user_id, 42);
        assert_eq!(pending[0].user_full_name, None);
        assert_eq!(pending[0].activity_name, None);
        assert_eq!(pending[0].session_date.as_deref(), Some("2026-08-07"));
    }

    #[tokio::test]
    async fn payment_history_tags_type_and_names() {
        let pool = test_pool().await;
        catalog::sync_all(
            &pool,
            &CatalogSync {
                users: vec![
                    UserAccount {
                        id: 42,
                        full_name: "Reza Karimi".into(),
                        phone: None,
                    },
                    UserAccount {
                        id: 99,
                        full_name: "Front Desk".into(),
                        phone: None,
                    },
                ],
                clubs: vec![Club {
                    id: 1,
                    name: "Downtown".into(),
                }],
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let membership_id =
            membership::insert_pending(&pool, 42, 5, 1, "2026-08-07", None, None)
                .await
                .unwrap();
        payment::insert(
            &pool,
            payment::PaymentInsert {
                reservation_id: None,
                membership_id: Some(membership_id),
                user_id: 42,
                club_id: 1,
                amount: 500_000,
                method: PaymentMethod::Card,
                reference_number: Some("TRX-1".into()),
                recorded_by: Some(99),
                notes: None,
            },
        )
        .await
        .unwrap();

        let history = payment_history_by_club(&pool, 1, 50, 0).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].payment_type, "MEMBERSHIP");
        assert_eq!(history[0].user_full_name.as_deref(), Some("Reza Karimi"));
        assert_eq!(history[0].recorded_by_name.as_deref(), Some("Front Desk"));
    }

    #[tokio::test]
    async fn attendance_detail_joins_plan_name() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO membership_plan (id, name, price) VALUES (5, 'Monthly', 500000)")
            .execute(&pool)
            .await
            .unwrap();

        let membership_id =
            membership::insert_pending(&pool, 42, 5, 1, "2026-08-07", None, None)
                .await
                .unwrap();
        membership::mark_active(&pool, membership_id, 1, "2026-08-07")
            .await
            .unwrap();
        attendance::insert(&pool, 42, membership_id, 1, None, Some(99), None)
            .await
            .unwrap();

        let today = shared::util::now_millis();
        let rows = attendance_by_club_between(&pool, 1, today - 60_000, today + 60_000)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].plan_name.as_deref(), Some("Monthly"));
        assert_eq!(rows[0].user_name, None); // user never synced

        let by_user = attendance_by_user(&pool, 42).await.unwrap();
        assert_eq!(by_user.len(), 1);
    }
}
