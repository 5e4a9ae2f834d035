//! Centralized error types for Chronicle.

use thiserror::Error;

/// Main error type for Chronicle operations.
///
/// Missing entities are not errors here: lookups return `Option` and the
/// recorder answers an unknown choice with `Ok(None)`.
#[derive(Error, Debug)]
pub enum ChronicleError {
    #[error("Database error: {0}")]
    Database(#[from] chronicle_db::DbError),
}

/// Result type for Chronicle operations.
pub type ChronicleResult<T> = Result<T, ChronicleError>;
