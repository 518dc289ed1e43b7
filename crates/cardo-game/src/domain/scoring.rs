//! Scoring policy.
//!
//! A correct guess pays the cardomante the card's score minus one (the
//! deduction tax, only charged on cards worth 2 or more). A wrong guess pays
//! the cardoelector the full score.

use cardo_catalog::{Card, CardId};
use serde::{Deserialize, Serialize};

use super::Scores;
use super::roles::{Role, RoleAssignment};

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    /// The cardomante identified the chosen card.
    CorrectGuess,
    /// The cardomante picked a different card.
    WrongGuess,
}

impl RoundOutcome {
    /// The role that scores under this outcome.
    #[must_use]
    pub fn scoring_role(self) -> Role {
        match self {
            RoundOutcome::CorrectGuess => Role::Cardomante,
            RoundOutcome::WrongGuess => Role::Cardoelector,
        }
    }
}

/// Breakdown of the points paid out in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsDetail {
    /// Score printed on the chosen card.
    pub base_score: u32,
    /// Amount withheld from a correct guess.
    pub penalty: u32,
    /// Points actually paid to the scoring player.
    pub gained: u32,
}

/// Everything the policy decides about one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoring {
    /// Tagged result of the guess.
    pub outcome: RoundOutcome,
    /// Points for both players; the non-scoring one receives 0.
    pub points_awarded: Scores,
    /// How `gained` was computed.
    pub points_detail: PointsDetail,
}

/// Points paid for a card worth `base_score` under `outcome`.
#[must_use]
pub fn points_detail(base_score: u32, outcome: RoundOutcome) -> PointsDetail {
    let penalty = match outcome {
        RoundOutcome::CorrectGuess if base_score >= 2 => 1,
        RoundOutcome::CorrectGuess | RoundOutcome::WrongGuess => 0,
    };
    PointsDetail {
        base_score,
        penalty,
        gained: base_score - penalty,
    }
}

/// Scores a round from the chosen card and the id the cardomante guessed.
#[must_use]
pub fn resolve(chosen_card: &Card, guessed_card_id: &CardId, roles: &RoleAssignment) -> Scoring {
    let outcome = if *guessed_card_id == chosen_card.id {
        RoundOutcome::CorrectGuess
    } else {
        RoundOutcome::WrongGuess
    };
    let points_detail = points_detail(chosen_card.score, outcome);

    let scorer = outcome.scoring_role();
    let points_awarded = [Role::Cardoelector, Role::Cardomante]
        .into_iter()
        .map(|role| {
            let points = if role == scorer {
                points_detail.gained
            } else {
                0
            };
            (roles.player(role).to_owned(), points)
        })
        .collect();

    Scoring {
        outcome,
        points_awarded,
        points_detail,
    }
}
