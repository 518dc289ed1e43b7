//! `PostgreSQL` implementation of the `CardCatalog` port.
//!
//! Cards live in a single `cards` table keyed by id. Each category is read
//! in id order, which gives the stable per-category offsets the sampler
//! relies on.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use cardo_catalog::{Card, CardCatalog, CardId, Category};
use cardo_core::error::DomainError;

/// PostgreSQL-backed card catalog.
#[derive(Debug, Clone)]
pub struct PgCardCatalog {
    pool: PgPool,
}

impl PgCardCatalog {
    /// Creates a new `PgCardCatalog`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts or replaces cards, for seeding a database from a deck.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a score does not fit the
    /// `score` column, or `DomainError::Infrastructure` if any write fails.
    /// No card is written in either case.
    pub async fn upsert_cards(&self, cards: &[Card]) -> Result<(), DomainError> {
        let scores = cards
            .iter()
            .map(|card| {
                i32::try_from(card.score).map_err(|_| {
                    DomainError::Validation(format!(
                        "card {} score {} exceeds storage range",
                        card.id, card.score
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut tx = self.pool.begin().await.map_err(|e| infrastructure(&e))?;
        for (card, score) in cards.iter().zip(scores) {
            sqlx::query(
                "INSERT INTO cards (id, category, description, score) \
                 VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (id) DO UPDATE \
                 SET category = EXCLUDED.category, \
                     description = EXCLUDED.description, \
                     score = EXCLUDED.score",
            )
            .bind(card.id.as_str())
            .bind(card.category.as_str())
            .bind(&card.description)
            .bind(score)
            .execute(&mut *tx)
            .await
            .map_err(|e| infrastructure(&e))?;
        }
        tx.commit().await.map_err(|e| infrastructure(&e))?;
        debug!(count = cards.len(), "cards upserted");
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct CardRow {
    id: String,
    category: String,
    description: Option<String>,
    score: Option<i32>,
}

impl TryFrom<CardRow> for Card {
    type Error = DomainError;

    fn try_from(row: CardRow) -> Result<Self, Self::Error> {
        let category: Category = row.category.parse()?;
        let score = row
            .score
            .map(|s| {
                u32::try_from(s).map_err(|_| {
                    DomainError::Validation(format!("card '{}' has negative score {s}", row.id))
                })
            })
            .transpose()?;
        Card::from_stored(CardId::new(row.id), row.description, score, category)
    }
}

fn infrastructure(e: &sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("card catalog: {e}"))
}

#[async_trait]
impl CardCatalog for PgCardCatalog {
    async fn count(&self, category: Category) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cards WHERE category = $1")
            .bind(category.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| infrastructure(&e))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn nth(&self, category: Category, offset: u64) -> Result<Option<Card>, DomainError> {
        let Ok(offset) = i64::try_from(offset) else {
            return Ok(None);
        };
        let row: Option<CardRow> = sqlx::query_as(
            "SELECT id, category, description, score FROM cards \
             WHERE category = $1 \
             ORDER BY id \
             OFFSET $2 LIMIT 1",
        )
        .bind(category.as_str())
        .bind(offset)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;
        row.map(Card::try_from).transpose()
    }

    async fn find_in(&self, category: Category, id: &CardId) -> Result<Option<Card>, DomainError> {
        let row: Option<CardRow> = sqlx::query_as(
            "SELECT id, category, description, score FROM cards \
             WHERE category = $1 AND id = $2",
        )
        .bind(category.as_str())
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;
        row.map(Card::try_from).transpose()
    }
}
