//! Booking Errors
//!
//! Business-rule failures carry a stable machine-readable code so clients
//! can branch without parsing messages. `Conflict` (directly or via a repo
//! error) is the one retryable case.

use crate::db::repository::RepoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Session is fully booked")]
    SessionFull,

    #[error("Session is not available for booking")]
    SessionNotBookable,

    #[error("You have already booked this session")]
    AlreadyBooked,

    #[error("A payment is already recorded for this reservation")]
    PaymentExists,

    #[error("Reservation is not awaiting payment")]
    InvalidStatus,

    #[error("Reservation cannot be cancelled")]
    CannotCancel,

    #[error("Reservation cannot be checked in")]
    CannotCheckIn,

    #[error("Reservation is not eligible for no-show")]
    CannotMarkNoShow,

    #[error("Only pending memberships can be approved or rejected")]
    MembershipNotPending,

    #[error("Membership is not valid")]
    MembershipNotValid,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Permission denied")]
    Forbidden,

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl BookingError {
    /// Stable code surfaced in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::SessionFull => "SESSION_FULL",
            BookingError::SessionNotBookable => "SESSION_NOT_BOOKABLE",
            BookingError::AlreadyBooked => "ALREADY_BOOKED",
            BookingError::PaymentExists => "PAYMENT_EXISTS",
            BookingError::InvalidStatus => "INVALID_STATUS",
            BookingError::CannotCancel => "CANNOT_CANCEL",
            BookingError::CannotCheckIn => "CANNOT_CHECK_IN",
            BookingError::CannotMarkNoShow => "CANNOT_MARK_NO_SHOW",
            BookingError::MembershipNotPending => "MEMBERSHIP_NOT_PENDING",
            BookingError::MembershipNotValid => "MEMBERSHIP_NOT_VALID",
            BookingError::NotFound(_) => "NOT_FOUND",
            BookingError::Forbidden => "FORBIDDEN",
            BookingError::Repo(RepoError::Conflict(_)) => "CONFLICT",
            BookingError::Repo(RepoError::Duplicate(_)) => "DUPLICATE",
            BookingError::Repo(RepoError::NotFound(_)) => "NOT_FOUND",
            BookingError::Repo(RepoError::Validation(_)) => "VALIDATION",
            BookingError::Repo(RepoError::Database(_)) => "DATABASE",
        }
    }

    /// Whether the caller should retry the whole operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BookingError::Repo(RepoError::Conflict(_)))
    }
}

impl From<sqlx::Error> for BookingError {
    fn from(err: sqlx::Error) -> Self {
        BookingError::Repo(RepoError::from(err))
    }
}
