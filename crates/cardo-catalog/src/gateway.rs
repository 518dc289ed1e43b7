//! Catalog gateway: uniform sampling and lookup over a [`CardCatalog`].

use cardo_core::error::DomainError;
use cardo_core::rng::DeterministicRng;
use tracing::debug;

use crate::card::{Card, CardId, Category};
use crate::port::CardCatalog;

/// Per-category card counts, in [`Category::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogReport {
    /// `(category, count)` pairs.
    pub counts: Vec<(Category, u64)>,
}

impl CatalogReport {
    /// Total number of cards.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

/// Sampling and lookup over a catalog port.
#[derive(Clone, Copy)]
pub struct CatalogGateway<'a> {
    catalog: &'a dyn CardCatalog,
}

impl<'a> CatalogGateway<'a> {
    /// Wraps a catalog port.
    #[must_use]
    pub fn new(catalog: &'a dyn CardCatalog) -> Self {
        Self { catalog }
    }

    /// Number of cards in `category`.
    ///
    /// # Errors
    ///
    /// Propagates adapter failures.
    pub async fn count(&self, category: Category) -> Result<u64, DomainError> {
        self.catalog.count(category).await
    }

    /// Picks one card of `category`, each with equal probability.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyCategory` if the category has no cards, and
    /// `DomainError::Infrastructure` if the catalog shrinks between counting
    /// and fetching.
    pub async fn sample_one(
        &self,
        category: Category,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Card, DomainError> {
        let count = self.catalog.count(category).await?;
        if count == 0 {
            return Err(DomainError::EmptyCategory(category.to_string()));
        }
        let max = u32::try_from(count - 1).map_err(|_| {
            DomainError::Infrastructure(format!("category '{category}' is too large to sample"))
        })?;
        let offset = u64::from(rng.next_u32_range(0, max));
        debug!(%category, count, offset, "sampling card");

        self.catalog.nth(category, offset).await?.ok_or_else(|| {
            DomainError::Infrastructure(format!(
                "card at offset {offset} disappeared from category '{category}'"
            ))
        })
    }

    /// Finds a card by id, searching every category in [`Category::ALL`]
    /// order and stopping at the first hit.
    ///
    /// # Errors
    ///
    /// Propagates adapter failures.
    pub async fn find_by_id(&self, id: &CardId) -> Result<Option<Card>, DomainError> {
        for category in Category::ALL {
            if let Some(card) = self.catalog.find_in(category, id).await? {
                return Ok(Some(card));
            }
        }
        Ok(None)
    }

    /// Counts every category and checks none is empty.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyCategory` naming the first empty category.
    pub async fn verify(&self) -> Result<CatalogReport, DomainError> {
        let mut counts = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let count = self.catalog.count(category).await?;
            if count == 0 {
                return Err(DomainError::EmptyCategory(category.to_string()));
            }
            counts.push((category, count));
        }
        Ok(CatalogReport { counts })
    }
}
