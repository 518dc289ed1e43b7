//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Error type shared by every Cardo crate.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No events exist for the requested aggregate.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Optimistic concurrency conflict on append.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The version the writer expected.
        expected: i64,
        /// The version actually stored.
        actual: i64,
    },

    /// A command was rejected by domain rules.
    #[error("validation error: {0}")]
    Validation(String),

    /// A catalog category holds no cards, so nothing can be sampled from it.
    #[error("catalog category '{0}' is empty")]
    EmptyCategory(String),

    /// A round could not be drawn because a sampled category had no cards.
    #[error("catalog exhausted: category '{0}' has no cards to draw")]
    CatalogExhausted(String),

    /// The player input source failed (for example, stdin was closed).
    #[error("input error: {0}")]
    Input(String),

    /// Storage or serialization failure.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
