//! Card model.

use std::fmt;
use std::str::FromStr;

use cardo_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Description used when the catalog entry has none.
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Score used when the catalog entry has none.
pub const DEFAULT_SCORE: u32 = 1;

/// Highest score a card may carry; the `cards.score` column is a signed
/// 32-bit integer.
#[allow(clippy::cast_sign_loss)]
pub const MAX_SCORE: u32 = i32::MAX as u32;

/// Catalog-wide card identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Wraps a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The catalog's partitions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Situations.
    Situations,
    /// Objects.
    Objects,
    /// Emotions.
    Emotions,
    /// Places.
    Places,
}

impl Category {
    /// Every category, in lookup order.
    pub const ALL: [Category; 4] = [
        Category::Situations,
        Category::Objects,
        Category::Emotions,
        Category::Places,
    ];

    /// The storage name of the category.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Situations => "situations",
            Category::Objects => "objects",
            Category::Emotions => "emotions",
            Category::Places => "places",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown category '{s}'")))
    }
}

/// A playable card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Identifier, unique across categories.
    pub id: CardId,
    /// Text shown to the players.
    pub description: String,
    /// Point value, in `1..=MAX_SCORE`.
    pub score: u32,
    /// Partition the card belongs to.
    pub category: Category,
}

impl Card {
    /// Builds a card, rejecting a score outside `1..=MAX_SCORE`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `score` is 0 or above
    /// [`MAX_SCORE`].
    pub fn new(
        id: CardId,
        description: impl Into<String>,
        score: u32,
        category: Category,
    ) -> Result<Self, DomainError> {
        if score == 0 {
            return Err(DomainError::Validation(format!(
                "card {id} must score at least 1"
            )));
        }
        if score > MAX_SCORE {
            return Err(DomainError::Validation(format!(
                "card {id} score {score} exceeds {MAX_SCORE}"
            )));
        }
        Ok(Self {
            id,
            description: description.into(),
            score,
            category,
        })
    }

    /// Builds a card from possibly incomplete stored fields, filling the
    /// catalog defaults.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the stored score is out of range.
    pub fn from_stored(
        id: CardId,
        description: Option<String>,
        score: Option<u32>,
        category: Category,
    ) -> Result<Self, DomainError> {
        Self::new(
            id,
            description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_owned()),
            score.unwrap_or(DEFAULT_SCORE),
            category,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_its_storage_name() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let result = "weather".parse::<Category>();
        match result.unwrap_err() {
            DomainError::Validation(msg) => assert_eq!(msg, "unknown category 'weather'"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_card_with_zero_score_is_rejected() {
        let result = Card::new(CardId::new("x"), "nothing", 0, Category::Objects);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_card_score_above_storage_range_is_rejected() {
        let at_max = Card::new(CardId::new("e1"), "calm", MAX_SCORE, Category::Emotions);
        assert_eq!(at_max.unwrap().score, 2_147_483_647);

        let result = Card::new(CardId::new("e2"), "rage", MAX_SCORE + 1, Category::Emotions);
        match result.unwrap_err() {
            DomainError::Validation(msg) => {
                assert_eq!(msg, "card e2 score 2147483648 exceeds 2147483647");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_from_stored_fills_defaults() {
        let card = Card::from_stored(CardId::new("s9"), None, None, Category::Situations).unwrap();
        assert_eq!(card.description, DEFAULT_DESCRIPTION);
        assert_eq!(card.score, DEFAULT_SCORE);
    }
}
