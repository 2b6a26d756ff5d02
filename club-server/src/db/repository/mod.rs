//! Repository Module
//!
//! Data access over the SQLite pool, one module per table. Read paths take
//! any executor; mutating paths that participate in booking transactions
//! take `&mut SqliteConnection` (or an executor) so the booking layer can
//! compose several writes into one atomic unit.

pub mod attendance;
pub mod catalog;
pub mod membership;
pub mod payment;
pub mod projection;
pub mod reservation;
pub mod session;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Stale versioned write or concurrent writer; retryable by the caller.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        let msg = err.to_string();
        let lower = msg.to_lowercase();
        if lower.contains("unique constraint") {
            RepoError::Duplicate(msg)
        } else if lower.contains("database is locked") || lower.contains("database is busy") {
            // SQLITE_BUSY past busy_timeout: another writer held the lock.
            // Same retry semantics as a stale version stamp.
            RepoError::Conflict(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
