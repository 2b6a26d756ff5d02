//! Reservation, payment and attendance flows.

use super::*;
use crate::booking::{BookingError, attendance, payment, reservation};
use crate::db::repository::{
    RepoError, payment as payment_repo, reservation as reservation_repo,
    session as session_repo,
};
use shared::models::{
    CheckInRequest, PaymentMethod, PaymentStatus, RecordPaymentRequest, ReservationStatus,
    SessionStatus,
};

fn cash_payment(reservation_id: i64, amount: i64) -> RecordPaymentRequest {
    RecordPaymentRequest {
        reservation_id,
        amount,
        method: PaymentMethod::Cash,
        reference_number: None,
        notes: None,
    }
}

#[tokio::test]
async fn booking_claims_a_seat() {
    let (pool, _dir) = test_db().await;
    let session = seed_session(&pool, 10).await;

    let r = reservation::create_reservation(&pool, 42, session.id)
        .await
        .unwrap();
    assert_eq!(r.status, ReservationStatus::PendingPayment);
    assert_eq!(r.club_id, session.club_id);

    let s = session_repo::find_by_id(&pool, session.id).await.unwrap().unwrap();
    assert_eq!(s.booked_count, 1);
    assert_eq!(s.version, 1);
}

#[tokio::test]
async fn capacity_one_second_booker_gets_session_full() {
    let (pool, _dir) = test_db().await;
    let session = seed_session(&pool, 1).await;

    reservation::create_reservation(&pool, 1, session.id).await.unwrap();
    let s = session_repo::find_by_id(&pool, session.id).await.unwrap().unwrap();
    assert_eq!(s.booked_count, 1);

    let err = reservation::create_reservation(&pool, 2, session.id)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::SessionFull));
    assert_eq!(err.code(), "SESSION_FULL");

    let s = session_repo::find_by_id(&pool, session.id).await.unwrap().unwrap();
    assert_eq!(s.booked_count, 1);
}

#[tokio::test]
async fn duplicate_booking_rejected_until_cancelled() {
    let (pool, _dir) = test_db().await;
    let session = seed_session(&pool, 5).await;

    let first = reservation::create_reservation(&pool, 42, session.id)
        .await
        .unwrap();
    let err = reservation::create_reservation(&pool, 42, session.id)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::AlreadyBooked));

    reservation::cancel_reservation(&pool, first.id, 42, None, false)
        .await
        .unwrap();

    // Seat freed, rebooking allowed
    reservation::create_reservation(&pool, 42, session.id)
        .await
        .unwrap();
    let s = session_repo::find_by_id(&pool, session.id).await.unwrap().unwrap();
    assert_eq!(s.booked_count, 1);
}

#[tokio::test]
async fn cancel_releases_seat_and_stamps_reason() {
    let (pool, _dir) = test_db().await;
    let session = seed_session(&pool, 3).await;

    let r = reservation::create_reservation(&pool, 42, session.id)
        .await
        .unwrap();
    let cancelled = reservation::cancel_reservation(&pool, r.id, 42, Some("sick"), false)
        .await
        .unwrap();

    assert_eq!(cancelled.status, ReservationStatus::Cancelled);
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("sick"));
    assert!(cancelled.cancelled_at.is_some());

    let s = session_repo::find_by_id(&pool, session.id).await.unwrap().unwrap();
    assert_eq!(s.booked_count, 0); // back to pre-booking value
}

#[tokio::test]
async fn double_cancel_fails_without_double_release() {
    let (pool, _dir) = test_db().await;
    let session = seed_session(&pool, 3).await;

    let r = reservation::create_reservation(&pool, 42, session.id)
        .await
        .unwrap();
    reservation::cancel_reservation(&pool, r.id, 42, None, false)
        .await
        .unwrap();

    let err = reservation::cancel_reservation(&pool, r.id, 42, None, false)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::CannotCancel));

    // State unchanged, counter not released a second time
    let s = session_repo::find_by_id(&pool, session.id).await.unwrap().unwrap();
    assert_eq!(s.booked_count, 0);
}

#[tokio::test]
async fn cancel_checks_ownership_unless_staff() {
    let (pool, _dir) = test_db().await;
    let session = seed_session(&pool, 3).await;

    let r = reservation::create_reservation(&pool, 42, session.id)
        .await
        .unwrap();

    let err = reservation::cancel_reservation(&pool, r.id, 7, None, false)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Forbidden));

    // Staff may cancel on behalf of the member
    reservation::cancel_reservation(&pool, r.id, 7, Some("front desk"), true)
        .await
        .unwrap();
}

#[tokio::test]
async fn booking_unknown_session_is_not_found() {
    let (pool, _dir) = test_db().await;
    let err = reservation::create_reservation(&pool, 42, 999)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::NotFound(_)));
}

#[tokio::test]
async fn cancelled_session_is_not_bookable() {
    let (pool, _dir) = test_db().await;
    let session = seed_session(&pool, 3).await;
    session_repo::update_status(&pool, session.id, SessionStatus::Cancelled)
        .await
        .unwrap();

    let err = reservation::create_reservation(&pool, 42, session.id)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::SessionNotBookable));
}

#[tokio::test]
async fn cancel_proceeds_when_session_was_cancelled() {
    let (pool, _dir) = test_db().await;
    let session = seed_session(&pool, 3).await;

    let r = reservation::create_reservation(&pool, 42, session.id)
        .await
        .unwrap();
    session_repo::update_status(&pool, session.id, SessionStatus::Cancelled)
        .await
        .unwrap();

    // Seat release is a no-op on a cancelled session; the cancel still lands
    let cancelled = reservation::cancel_reservation(&pool, r.id, 42, None, false)
        .await
        .unwrap();
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);

    let s = session_repo::find_by_id(&pool, session.id).await.unwrap().unwrap();
    assert_eq!(s.booked_count, 1); // untouched, accounting no longer matters
}

#[tokio::test]
async fn recording_payment_flips_reservation_to_paid() {
    let (pool, _dir) = test_db().await;
    let session = seed_session(&pool, 3).await;
    let r = reservation::create_reservation(&pool, 42, session.id)
        .await
        .unwrap();

    let p = payment::record_payment(&pool, cash_payment(r.id, 100_000), 99)
        .await
        .unwrap();
    assert_eq!(p.status, PaymentStatus::Paid);
    assert_eq!(p.amount, 100_000);
    assert_eq!(p.reservation_id, Some(r.id));
    assert!(p.paid_at.is_some());

    let r = reservation_repo::find_by_id(&pool, r.id).await.unwrap().unwrap();
    assert_eq!(r.status, ReservationStatus::Paid);
}

#[tokio::test]
async fn second_payment_rejected_and_creates_no_row() {
    let (pool, _dir) = test_db().await;
    let session = seed_session(&pool, 3).await;
    let r = reservation::create_reservation(&pool, 42, session.id)
        .await
        .unwrap();

    payment::record_payment(&pool, cash_payment(r.id, 100_000), 99)
        .await
        .unwrap();
    let err = payment::record_payment(&pool, cash_payment(r.id, 100_000), 99)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::PaymentExists));
    assert_eq!(err.code(), "PAYMENT_EXISTS");

    assert_eq!(payment_repo::count_by_reservation(&pool, r.id).await.unwrap(), 1);
}

#[tokio::test]
async fn payment_requires_pending_payment_status() {
    let (pool, _dir) = test_db().await;
    let session = seed_session(&pool, 3).await;
    let r = reservation::create_reservation(&pool, 42, session.id)
        .await
        .unwrap();
    reservation::cancel_reservation(&pool, r.id, 42, None, false)
        .await
        .unwrap();

    let err = payment::record_payment(&pool, cash_payment(r.id, 100_000), 99)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::InvalidStatus));
}

#[tokio::test]
async fn payment_for_unknown_reservation_is_not_found() {
    let (pool, _dir) = test_db().await;
    let err = payment::record_payment(&pool, cash_payment(999, 100_000), 99)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::NotFound(_)));
}

#[tokio::test]
async fn check_in_requires_paid_and_marks_once() {
    let (pool, _dir) = test_db().await;
    let session = seed_session(&pool, 3).await;
    let r = reservation::create_reservation(&pool, 42, session.id)
        .await
        .unwrap();

    let err = reservation::check_in_reservation(&pool, r.id).await.unwrap_err();
    assert!(matches!(err, BookingError::CannotCheckIn));

    payment::record_payment(&pool, cash_payment(r.id, 100_000), 99)
        .await
        .unwrap();
    let checked = reservation::check_in_reservation(&pool, r.id).await.unwrap();
    assert!(checked.checked_in_at.is_some());
    assert_eq!(checked.status, ReservationStatus::Paid); // marker, not a phase

    let err = reservation::check_in_reservation(&pool, r.id).await.unwrap_err();
    assert!(matches!(err, BookingError::CannotCheckIn));
}

#[tokio::test]
async fn no_show_only_from_paid_and_keeps_seat() {
    let (pool, _dir) = test_db().await;
    let session = seed_session(&pool, 3).await;
    let r = reservation::create_reservation(&pool, 42, session.id)
        .await
        .unwrap();

    let err = reservation::mark_no_show(&pool, r.id).await.unwrap_err();
    assert!(matches!(err, BookingError::CannotMarkNoShow));

    payment::record_payment(&pool, cash_payment(r.id, 100_000), 99)
        .await
        .unwrap();
    let r = reservation::mark_no_show(&pool, r.id).await.unwrap();
    assert_eq!(r.status, ReservationStatus::NoShow);

    // No-show does not release the seat
    let s = session_repo::find_by_id(&pool, session.id).await.unwrap().unwrap();
    assert_eq!(s.booked_count, 1);
}

#[tokio::test]
async fn booked_count_matches_active_reservations() {
    let (pool, _dir) = test_db().await;
    let session = seed_session(&pool, 5).await;

    let a = reservation::create_reservation(&pool, 1, session.id).await.unwrap();
    let b = reservation::create_reservation(&pool, 2, session.id).await.unwrap();
    reservation::create_reservation(&pool, 3, session.id).await.unwrap();

    payment::record_payment(&pool, cash_payment(a.id, 100_000), 99)
        .await
        .unwrap();
    reservation::cancel_reservation(&pool, b.id, 2, None, false)
        .await
        .unwrap();

    let s = session_repo::find_by_id(&pool, session.id).await.unwrap().unwrap();
    let active = reservation_repo::count_active_by_session(&pool, session.id)
        .await
        .unwrap();
    assert_eq!(s.booked_count, active);
    assert_eq!(s.booked_count, 2);
}

#[tokio::test]
async fn attendance_check_in_appends_for_valid_membership() {
    let (pool, _dir) = test_db().await;
    let membership_id = active_membership(&pool, 42, 1, Some("2026-12-31")).await;

    let att = attendance::check_in(
        &pool,
        CheckInRequest {
            user_id: 42,
            membership_id,
            club_id: 1,
            session_id: None,
            notes: None,
        },
        99,
        TODAY,
    )
    .await
    .unwrap();

    assert_eq!(att.membership_id, membership_id);
    assert_eq!(att.recorded_by_user_id, Some(99));
    assert!(att.check_in_time > 0);
}

#[tokio::test]
async fn attendance_rejects_lapsed_membership() {
    let (pool, _dir) = test_db().await;
    // ACTIVE in the ledger but past its window: the sweep simply hasn't run
    let membership_id = active_membership(&pool, 42, 1, Some(YESTERDAY)).await;

    let err = attendance::check_in(
        &pool,
        CheckInRequest {
            user_id: 42,
            membership_id,
            club_id: 1,
            session_id: None,
            notes: None,
        },
        99,
        TODAY,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BookingError::MembershipNotValid));
}

#[tokio::test]
async fn attendance_unknown_membership_is_not_found() {
    let (pool, _dir) = test_db().await;
    let err = attendance::check_in(
        &pool,
        CheckInRequest {
            user_id: 42,
            membership_id: 999,
            club_id: 1,
            session_id: None,
            notes: None,
        },
        99,
        TODAY,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BookingError::NotFound(_)));
}

#[tokio::test]
async fn get_reservation_enforces_ownership() {
    let (pool, _dir) = test_db().await;
    let session = seed_session(&pool, 3).await;
    let r = reservation::create_reservation(&pool, 42, session.id)
        .await
        .unwrap();

    assert!(reservation::get_reservation(&pool, r.id, 42, false).await.is_ok());
    assert!(reservation::get_reservation(&pool, r.id, 7, true).await.is_ok());
    let err = reservation::get_reservation(&pool, r.id, 7, false)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Forbidden));
}

#[tokio::test]
async fn repo_conflict_maps_to_retryable_error() {
    let err = BookingError::Repo(RepoError::Conflict("stale".into()));
    assert!(err.is_retryable());
    assert_eq!(err.code(), "CONFLICT");
    assert!(!BookingError::SessionFull.is_retryable());
}
