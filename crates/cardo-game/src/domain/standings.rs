//! Winner determination and per-role achievements, derived from the round
//! log.

use cardo_catalog::CardId;

use super::Scores;
use super::roles::{Players, Role};
use super::round::Round;
use super::scoring::RoundOutcome;

/// The player with strictly more points, or `None` on a tie.
#[must_use]
pub fn winner_of(players: &Players, scores: &Scores) -> Option<String> {
    let first = scores.get(players.first()).copied().unwrap_or(0);
    let second = scores.get(players.second()).copied().unwrap_or(0);
    match first.cmp(&second) {
        std::cmp::Ordering::Greater => Some(players.first().to_owned()),
        std::cmp::Ordering::Less => Some(players.second().to_owned()),
        std::cmp::Ordering::Equal => None,
    }
}

/// Chosen cards a player scored with, split by the role they held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WonCardIds {
    /// Rounds the player guessed correctly.
    pub as_cardomante: Vec<CardId>,
    /// Rounds where the player's pick fooled the guesser.
    pub as_cardoelector: Vec<CardId>,
}

/// Replays `rounds` and collects the chosen card of every round `player`
/// won, in round order.
#[must_use]
pub fn won_card_ids(rounds: &[Round], player: &str) -> WonCardIds {
    let mut won = WonCardIds::default();
    for round in rounds {
        match (round.role_of(player), round.outcome) {
            (Some(Role::Cardomante), RoundOutcome::CorrectGuess) => {
                won.as_cardomante.push(round.chosen_card_id.clone());
            }
            (Some(Role::Cardoelector), RoundOutcome::WrongGuess) => {
                won.as_cardoelector.push(round.chosen_card_id.clone());
            }
            _ => {}
        }
    }
    won
}

/// Sums every round's award per player, saturating at `u32::MAX`.
///
/// A recorded session never saturates: `GameSession::record_round` refuses
/// a round whose award would overflow the running score.
#[must_use]
pub fn tally(players: &Players, rounds: &[Round]) -> Scores {
    players
        .names()
        .iter()
        .map(|name| {
            let total = rounds
                .iter()
                .fold(0_u32, |acc, r| acc.saturating_add(r.points_for(name)));
            (name.clone(), total)
        })
        .collect()
}
