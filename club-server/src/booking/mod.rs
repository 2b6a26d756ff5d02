//! Booking Orchestration
//!
//! Composes the capacity store and the ledgers into the invariant-preserving
//! operations: reservation lifecycle, payment-gated transitions, the
//! membership workflow and attendance recording. Every multi-write sequence
//! runs inside one SQLite transaction; a failure anywhere rolls back the
//! whole unit, including a claimed seat.

pub mod attendance;
pub mod error;
pub mod membership;
pub mod payment;
pub mod reservation;

#[cfg(test)]
mod tests;

pub use error::BookingError;

/// Result type for booking operations
pub type BookingResult<T> = Result<T, BookingError>;
