//! Payment Recording
//!
//! A settlement must never exist without its status flip, and vice versa:
//! payment insert and reservation transition commit together or not at all.
//! The idempotency guards run before any write.

use shared::models::{Payment, RecordPaymentRequest, ReservationStatus};
use sqlx::SqlitePool;
use tracing::info;

use super::{BookingError, BookingResult};
use crate::db::repository::{
    RepoError, payment as payment_repo, reservation as reservation_repo,
};

pub async fn record_payment(
    pool: &SqlitePool,
    req: RecordPaymentRequest,
    recorded_by: i64,
) -> BookingResult<Payment> {
    let mut tx = pool.begin().await?;

    let reservation = reservation_repo::find_by_id(&mut *tx, req.reservation_id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Reservation {}", req.reservation_id)))?;

    if payment_repo::exists_for_reservation(&mut *tx, req.reservation_id).await? {
        return Err(BookingError::PaymentExists);
    }
    if reservation.status != ReservationStatus::PendingPayment {
        return Err(BookingError::InvalidStatus);
    }

    let payment_id = payment_repo::insert(
        &mut *tx,
        payment_repo::PaymentInsert {
            reservation_id: Some(reservation.id),
            membership_id: None,
            user_id: reservation.user_id,
            club_id: reservation.club_id,
            amount: req.amount,
            method: req.method,
            reference_number: req.reference_number.clone(),
            recorded_by: Some(recorded_by),
            notes: req.notes.clone(),
        },
    )
    .await?;
    reservation_repo::mark_paid(&mut *tx, reservation.id).await?;

    let payment = payment_repo::find_by_id(&mut *tx, payment_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create payment".into()))?;

    tx.commit().await?;

    info!(
        payment_id,
        reservation_id = reservation.id,
        recorded_by,
        "Payment recorded"
    );
    Ok(payment)
}
