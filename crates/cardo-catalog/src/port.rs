//! Catalog port implemented by storage adapters.

use async_trait::async_trait;
use cardo_core::error::DomainError;

use crate::card::{Card, CardId, Category};

/// Read-only access to a category-partitioned card store.
///
/// Offsets are positions in a stable per-category ordering, so that
/// `nth(c, i)` for `i` in `0..count(c)` visits every card exactly once.
#[async_trait]
pub trait CardCatalog: Send + Sync {
    /// Number of cards in `category`.
    async fn count(&self, category: Category) -> Result<u64, DomainError>;

    /// The card at `offset` within `category`, if any.
    async fn nth(&self, category: Category, offset: u64) -> Result<Option<Card>, DomainError>;

    /// Looks `id` up within one category.
    async fn find_in(&self, category: Category, id: &CardId) -> Result<Option<Card>, DomainError>;
}
