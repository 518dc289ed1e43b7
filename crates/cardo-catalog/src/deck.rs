//! YAML deck files.
//!
//! A deck maps each category to its cards:
//!
//! ```yaml
//! situations:
//!   - id: s1
//!     description: Missing the last bus
//!     score: 2
//! objects:
//!   - id: o1
//!     description: A rusty key
//! ```
//!
//! `description` and `score` are optional and fall back to the catalog
//! defaults.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use cardo_core::error::DomainError;
use serde::Deserialize;
use tracing::info;

use crate::card::{Card, CardId, Category};
use crate::memory::InMemoryCardCatalog;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeckEntry {
    id: String,
    description: Option<String>,
    score: Option<u32>,
}

/// Parses a YAML deck into an in-memory catalog.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the YAML is malformed, names an
/// unknown category, repeats a card id or carries a score outside
/// `1..=MAX_SCORE`.
pub fn parse_deck(yaml: &str) -> Result<InMemoryCardCatalog, DomainError> {
    let deck: BTreeMap<Category, Vec<DeckEntry>> = serde_yaml::from_str(yaml)
        .map_err(|e| DomainError::Validation(format!("invalid deck: {e}")))?;

    let mut seen = HashSet::new();
    let mut catalog = InMemoryCardCatalog::new();
    for (category, entries) in deck {
        for entry in entries {
            if !seen.insert(entry.id.clone()) {
                return Err(DomainError::Validation(format!(
                    "duplicate card id '{}' in deck",
                    entry.id
                )));
            }
            catalog.insert(Card::from_stored(
                CardId::new(entry.id),
                entry.description,
                entry.score,
                category,
            )?);
        }
    }
    Ok(catalog)
}

/// Reads and parses a YAML deck file.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the file cannot be read, or any
/// error of [`parse_deck`].
pub fn load_deck(path: &Path) -> Result<InMemoryCardCatalog, DomainError> {
    let yaml = std::fs::read_to_string(path).map_err(|e| {
        DomainError::Infrastructure(format!("cannot read deck {}: {e}", path.display()))
    })?;
    let catalog = parse_deck(&yaml)?;
    info!(path = %path.display(), cards = catalog.len(), "loaded deck");
    Ok(catalog)
}
