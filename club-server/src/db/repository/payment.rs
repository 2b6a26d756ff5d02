//! Payment Repository
//!
//! Insert-only ledger; a payment is created already settled (PAID) by the
//! staff-facing record/approve flows. The UNIQUE index on reservation_id
//! backs the in-code idempotency guard against double billing.

use super::{RepoError, RepoResult};
use shared::models::{Payment, PaymentMethod};
use sqlx::{SqliteExecutor, SqlitePool};

const PAYMENT_SELECT: &str = "SELECT id, reservation_id, membership_id, user_id, club_id, amount, currency, method, reference_number, status, paid_at, recorded_by, notes, created_at, updated_at FROM payment";

const DEFAULT_CURRENCY: &str = "IRR";

/// Insert parameters for a settled payment.
pub struct PaymentInsert {
    /// Exactly one of reservation_id / membership_id must be set
    pub reservation_id: Option<i64>,
    pub membership_id: Option<i64>,
    pub user_id: i64,
    pub club_id: i64,
    /// Minor currency units, must be positive
    pub amount: i64,
    pub method: PaymentMethod,
    pub reference_number: Option<String>,
    pub recorded_by: Option<i64>,
    pub notes: Option<String>,
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Payment>> {
    let sql = format!("{PAYMENT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Payment>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_by_reservation(
    db: impl SqliteExecutor<'_>,
    reservation_id: i64,
) -> RepoResult<Option<Payment>> {
    let sql = format!("{PAYMENT_SELECT} WHERE reservation_id = ?");
    let row = sqlx::query_as::<_, Payment>(&sql)
        .bind(reservation_id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn exists_for_reservation(
    db: impl SqliteExecutor<'_>,
    reservation_id: i64,
) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payment WHERE reservation_id = ?")
        .bind(reservation_id)
        .fetch_one(db)
        .await?;
    Ok(count > 0)
}

pub async fn count_by_reservation(pool: &SqlitePool, reservation_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payment WHERE reservation_id = ?")
        .bind(reservation_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert a settled payment row; paired with the corresponding status flip
/// inside the same transaction.
pub async fn insert(db: impl SqliteExecutor<'_>, data: PaymentInsert) -> RepoResult<i64> {
    if data.amount <= 0 {
        return Err(RepoError::Validation(format!(
            "Payment amount must be positive: {}",
            data.amount
        )));
    }
    if data.reservation_id.is_some() == data.membership_id.is_some() {
        return Err(RepoError::Validation(
            "Payment must target exactly one of reservation or membership".into(),
        ));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO payment (id, reservation_id, membership_id, user_id, club_id, amount, currency, method, reference_number, status, paid_at, recorded_by, notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'PAID', ?10, ?11, ?12, ?10, ?10)",
    )
    .bind(id)
    .bind(data.reservation_id)
    .bind(data.membership_id)
    .bind(data.user_id)
    .bind(data.club_id)
    .bind(data.amount)
    .bind(DEFAULT_CURRENCY)
    .bind(data.method)
    .bind(&data.reference_number)
    .bind(now)
    .bind(data.recorded_by)
    .bind(&data.notes)
    .execute(db)
    .await?;
    Ok(id)
}
