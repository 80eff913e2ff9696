//! Unified error handling for `PocketLedger`.
//!
//! All fallible operations in the crate return [`Result`]. Storage failures
//! surface as a single [`Error::Database`] condition; the aggregation engine
//! never retries, it propagates the failure to its caller.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration or validation problem described by a message.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Underlying storage failure (I/O, connectivity, SQL).
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The referenced account does not exist or belongs to another user.
    #[error("Account not found: {id}")]
    AccountNotFound {
        /// Primary key of the missing account
        id: i64,
    },

    /// The referenced entry does not exist or belongs to another user.
    #[error("Entry not found: {id}")]
    EntryNotFound {
        /// Primary key of the missing entry
        id: i64,
    },

    /// CSV serialization failure during export.
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
