//! Players and role alternation.

use std::fmt;

use cardo_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Name given to the first player when none is entered.
pub const DEFAULT_FIRST_PLAYER: &str = "Player 1";

/// Name given to the second player when none is entered.
pub const DEFAULT_SECOND_PLAYER: &str = "Player 2";

/// What a player does in a given round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Privately picks one of the three offered cards.
    Cardoelector,
    /// Tries to identify the picked card.
    Cardomante,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Cardoelector => "cardoelector",
            Role::Cardomante => "cardomante",
        })
    }
}

/// The two players of a session, in seating order.
///
/// The order is fixed for the whole session and decides who elects first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Players([String; 2]);

impl Players {
    /// Seats two players. Blank names fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if both players end up with the
    /// same name, since scores are keyed by name.
    pub fn new(first: &str, second: &str) -> Result<Self, DomainError> {
        let first = non_blank_or(first, DEFAULT_FIRST_PLAYER);
        let second = non_blank_or(second, DEFAULT_SECOND_PLAYER);
        if first == second {
            return Err(DomainError::Validation(format!(
                "players must have distinct names, both are '{first}'"
            )));
        }
        Ok(Self([first, second]))
    }

    /// The player seated first.
    #[must_use]
    pub fn first(&self) -> &str {
        &self.0[0]
    }

    /// The player seated second.
    #[must_use]
    pub fn second(&self) -> &str {
        &self.0[1]
    }

    /// Both names in seating order.
    #[must_use]
    pub fn names(&self) -> &[String; 2] {
        &self.0
    }

    /// Whether `name` is seated in this session.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|p| p == name)
    }
}

fn non_blank_or(name: &str, fallback: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        fallback.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Who elects and who guesses in one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// The card picker.
    pub cardoelector: String,
    /// The guesser.
    pub cardomante: String,
}

impl RoleAssignment {
    /// Roles for the 1-based `round_index`: odd rounds seat the first
    /// player as cardoelector, even rounds the second.
    #[must_use]
    pub fn for_round(players: &Players, round_index: u32) -> Self {
        let (cardoelector, cardomante) = if round_index % 2 == 1 {
            (players.first(), players.second())
        } else {
            (players.second(), players.first())
        };
        Self {
            cardoelector: cardoelector.to_owned(),
            cardomante: cardomante.to_owned(),
        }
    }

    /// The name of the player holding `role`.
    #[must_use]
    pub fn player(&self, role: Role) -> &str {
        match role {
            Role::Cardoelector => &self.cardoelector,
            Role::Cardomante => &self.cardomante,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_rounds_alternate_electors_starting_with_first_player() {
        let players = Players::new("A", "B").unwrap();

        let electors: Vec<String> = (1..=5)
            .map(|r| RoleAssignment::for_round(&players, r).cardoelector)
            .collect();

        assert_eq!(electors, vec!["A", "B", "A", "B", "A"]);
    }

    #[test]
    fn test_cardomante_is_always_the_other_player() {
        let players = Players::new("A", "B").unwrap();
        for round in 1..=10 {
            let roles = RoleAssignment::for_round(&players, round);
            assert_ne!(roles.cardoelector, roles.cardomante);
            assert!(players.contains(&roles.cardomante));
        }
    }

    #[test]
    fn test_blank_names_fall_back_to_defaults() {
        let players = Players::new("  ", "").unwrap();
        assert_eq!(players.first(), DEFAULT_FIRST_PLAYER);
        assert_eq!(players.second(), DEFAULT_SECOND_PLAYER);
    }

    #[test]
    fn test_names_are_trimmed() {
        let players = Players::new(" Ana ", "Luis\n").unwrap();
        assert_eq!(players.names(), &["Ana".to_owned(), "Luis".to_owned()]);
    }

    #[test]
    fn test_identical_names_are_rejected() {
        let result = Players::new("Ana", " Ana");
        match result.unwrap_err() {
            DomainError::Validation(msg) => {
                assert_eq!(msg, "players must have distinct names, both are 'Ana'");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
