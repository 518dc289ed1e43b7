//! In-memory catalog adapter.

use std::collections::BTreeMap;

use async_trait::async_trait;
use cardo_core::error::DomainError;

use crate::card::{Card, CardId, Category};
use crate::port::CardCatalog;

/// Catalog held entirely in memory, each category in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCardCatalog {
    partitions: BTreeMap<Category, Vec<Card>>,
}

impl InMemoryCardCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from cards, grouped by their own category.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut catalog = Self::new();
        for card in cards {
            catalog.insert(card);
        }
        catalog
    }

    /// Adds a card to the end of its category.
    pub fn insert(&mut self, card: Card) {
        self.partitions.entry(card.category).or_default().push(card);
    }

    /// Total number of cards across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.partitions.values().map(Vec::len).sum()
    }

    /// Whether the catalog holds no cards at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every card, category by category in [`Category`] order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.partitions.values().flatten()
    }

    fn partition(&self, category: Category) -> &[Card] {
        self.partitions.get(&category).map_or(&[], Vec::as_slice)
    }
}

#[async_trait]
impl CardCatalog for InMemoryCardCatalog {
    async fn count(&self, category: Category) -> Result<u64, DomainError> {
        Ok(self.partition(category).len() as u64)
    }

    async fn nth(&self, category: Category, offset: u64) -> Result<Option<Card>, DomainError> {
        let Ok(offset) = usize::try_from(offset) else {
            return Ok(None);
        };
        Ok(self.partition(category).get(offset).cloned())
    }

    async fn find_in(&self, category: Category, id: &CardId) -> Result<Option<Card>, DomainError> {
        Ok(self
            .partition(category)
            .iter()
            .find(|card| &card.id == id)
            .cloned())
    }
}
