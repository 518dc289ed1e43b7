//! Console error types.

use cardo_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the console.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or contradictory configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A game rule, catalog or store failure.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Terminal I/O error.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}
