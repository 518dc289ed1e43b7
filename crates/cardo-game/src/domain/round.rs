//! The per-round state machine and the immutable round record.

use std::collections::HashSet;
use std::fmt;

use cardo_catalog::{Card, CardId};
use cardo_core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Scores;
use super::roles::{Role, RoleAssignment};
use super::scoring::{self, PointsDetail, RoundOutcome};

/// Number of cards offered each round.
pub const OFFER_SIZE: usize = 3;

/// Position of a card within a round's offer, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct OfferIndex(u8);

impl TryFrom<u8> for OfferIndex {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(usize::from(index))
            .ok_or_else(|| format!("offer index {index} is past the {OFFER_SIZE} offered cards"))
    }
}

impl From<OfferIndex> for u8 {
    fn from(index: OfferIndex) -> Self {
        index.0
    }
}

impl OfferIndex {
    /// Wraps a 0-based position, rejecting anything past the offer.
    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        if index < OFFER_SIZE {
            u8::try_from(index).ok().map(Self)
        } else {
            None
        }
    }

    /// The 0-based position.
    #[must_use]
    pub fn get(self) -> usize {
        usize::from(self.0)
    }

    /// The 1-based number shown to players.
    #[must_use]
    pub fn display_number(self) -> usize {
        self.get() + 1
    }
}

/// Why a typed answer was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputRejection {
    /// Nothing was typed.
    Empty,
    /// The answer is not an integer.
    NotANumber(String),
    /// The answer is an integer outside `1..=3`.
    OutOfRange(i64),
}

impl fmt::Display for InputRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputRejection::Empty => f.write_str("empty answer, please enter a number"),
            InputRejection::NotANumber(raw) => write!(f, "'{raw}' is not a number"),
            InputRejection::OutOfRange(_) => {
                write!(f, "please enter a number between 1 and {OFFER_SIZE}")
            }
        }
    }
}

/// Maps a typed 1-based answer onto an [`OfferIndex`].
///
/// # Errors
///
/// Returns the [`InputRejection`] describing why the answer is unusable.
pub fn parse_answer(raw: &str) -> Result<OfferIndex, InputRejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputRejection::Empty);
    }
    let number: i64 = trimmed
        .parse()
        .map_err(|_| InputRejection::NotANumber(trimmed.to_owned()))?;
    number
        .checked_sub(1)
        .and_then(|n| usize::try_from(n).ok())
        .and_then(OfferIndex::new)
        .ok_or(InputRejection::OutOfRange(number))
}

/// The three cards offered in a round, in presentation order.
///
/// Built once per round and shown identically to both players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    cards: [Card; OFFER_SIZE],
}

impl Offer {
    /// Builds an offer, checking the cards come from distinct categories
    /// and carry distinct ids.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the card count is wrong or a
    /// category or id repeats.
    pub fn new(cards: Vec<Card>) -> Result<Self, DomainError> {
        let count = cards.len();
        let cards: [Card; OFFER_SIZE] = cards.try_into().map_err(|_| {
            DomainError::Validation(format!("an offer needs {OFFER_SIZE} cards, got {count}"))
        })?;

        let categories: HashSet<_> = cards.iter().map(|c| c.category).collect();
        if categories.len() != OFFER_SIZE {
            return Err(DomainError::Validation(
                "offered cards must come from distinct categories".to_owned(),
            ));
        }
        let ids: HashSet<_> = cards.iter().map(|c| &c.id).collect();
        if ids.len() != OFFER_SIZE {
            return Err(DomainError::Validation(
                "offered cards must have distinct ids".to_owned(),
            ));
        }
        Ok(Self { cards })
    }

    /// Cards in presentation order.
    #[must_use]
    pub fn cards(&self) -> &[Card; OFFER_SIZE] {
        &self.cards
    }

    /// The card at `index`.
    #[must_use]
    pub fn card(&self, index: OfferIndex) -> &Card {
        &self.cards[index.get()]
    }

    /// Card ids in presentation order.
    #[must_use]
    pub fn ids(&self) -> [CardId; OFFER_SIZE] {
        self.cards.clone().map(|c| c.id)
    }
}

/// The stored record of a resolved round. Never modified once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based position in the session.
    pub index: u32,
    /// Who picked the card.
    pub cardoelector: String,
    /// Who guessed.
    pub cardomante: String,
    /// Offered ids in presentation order.
    pub offered_card_ids: [CardId; OFFER_SIZE],
    /// Position of the chosen card in `offered_card_ids`.
    pub choice_index: OfferIndex,
    /// Id of the chosen card.
    pub chosen_card_id: CardId,
    /// Position of the guessed card in `offered_card_ids`.
    pub guess_index: OfferIndex,
    /// Id of the guessed card.
    pub guessed_card_id: CardId,
    /// Result of the guess.
    pub outcome: RoundOutcome,
    /// Points per player for this round only.
    pub points_awarded: Scores,
    /// How the points were computed.
    pub points_detail: PointsDetail,
    /// When the round was resolved.
    pub timestamp: DateTime<Utc>,
}

impl Round {
    /// The role `player` held in this round, if they played it.
    #[must_use]
    pub fn role_of(&self, player: &str) -> Option<Role> {
        if self.cardoelector == player {
            Some(Role::Cardoelector)
        } else if self.cardomante == player {
            Some(Role::Cardomante)
        } else {
            None
        }
    }

    /// Points this round paid to `player`.
    #[must_use]
    pub fn points_for(&self, player: &str) -> u32 {
        self.points_awarded.get(player).copied().unwrap_or(0)
    }
}

/// Round state machine phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Waiting for the three cards.
    Drawing,
    /// Waiting for the cardoelector's pick.
    Choosing,
    /// Waiting for the cardomante's guess.
    Guessing,
    /// Scored; the round record has been built.
    Resolved,
}

/// A round in progress.
#[derive(Debug, Clone)]
pub struct RoundDraft {
    index: u32,
    roles: RoleAssignment,
    phase: RoundPhase,
    offer: Option<Offer>,
    choice: Option<OfferIndex>,
    guess: Option<OfferIndex>,
}

impl RoundDraft {
    /// Opens round `index` with the given roles.
    #[must_use]
    pub fn new(index: u32, roles: RoleAssignment) -> Self {
        Self {
            index,
            roles,
            phase: RoundPhase::Drawing,
            offer: None,
            choice: None,
            guess: None,
        }
    }

    /// 1-based round number.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Roles for this round.
    #[must_use]
    pub fn roles(&self) -> &RoleAssignment {
        &self.roles
    }

    /// The dealt offer, once drawn.
    #[must_use]
    pub fn offer(&self) -> Option<&Offer> {
        self.offer.as_ref()
    }

    /// The chosen card, once the cardoelector has picked.
    #[must_use]
    pub fn chosen_card(&self) -> Option<&Card> {
        Some(self.offer.as_ref()?.card(self.choice?))
    }

    fn expect_phase(&self, expected: RoundPhase) -> Result<(), DomainError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "round {} must be in {expected:?} phase, is in {:?}",
                self.index, self.phase
            )))
        }
    }

    /// Places the drawn offer on the table: `Drawing → Choosing`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` outside the `Drawing` phase.
    pub fn deal(&mut self, offer: Offer) -> Result<(), DomainError> {
        self.expect_phase(RoundPhase::Drawing)?;
        self.offer = Some(offer);
        self.phase = RoundPhase::Choosing;
        Ok(())
    }

    /// Records the cardoelector's pick: `Choosing → Guessing`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` outside the `Choosing` phase.
    pub fn choose(&mut self, index: OfferIndex) -> Result<(), DomainError> {
        self.expect_phase(RoundPhase::Choosing)?;
        self.choice = Some(index);
        self.phase = RoundPhase::Guessing;
        Ok(())
    }

    /// Records the cardomante's guess and scores the round:
    /// `Guessing → Resolved`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` outside the `Guessing` phase.
    pub fn guess(&mut self, index: OfferIndex, at: DateTime<Utc>) -> Result<Round, DomainError> {
        self.expect_phase(RoundPhase::Guessing)?;
        let (Some(offer), Some(choice)) = (self.offer.as_ref(), self.choice) else {
            return Err(DomainError::Validation(format!(
                "round {} reached Guessing without an offer and a choice",
                self.index
            )));
        };

        let chosen = offer.card(choice);
        let guessed = offer.card(index);
        let scoring = scoring::resolve(chosen, &guessed.id, &self.roles);

        let round = Round {
            index: self.index,
            cardoelector: self.roles.cardoelector.clone(),
            cardomante: self.roles.cardomante.clone(),
            offered_card_ids: offer.ids(),
            choice_index: choice,
            chosen_card_id: chosen.id.clone(),
            guess_index: index,
            guessed_card_id: guessed.id.clone(),
            outcome: scoring.outcome,
            points_awarded: scoring.points_awarded,
            points_detail: scoring.points_detail,
            timestamp: at,
        };

        self.guess = Some(index);
        self.phase = RoundPhase::Resolved;
        Ok(round)
    }

    /// The cardomante's guess, once resolved.
    #[must_use]
    pub fn guessed_index(&self) -> Option<OfferIndex> {
        self.guess
    }
}

#[cfg(test)]
mod tests {
    use cardo_catalog::Category;
    use chrono::TimeZone;

    use super::*;

    fn card(id: &str, score: u32, category: Category) -> Card {
        Card::new(CardId::new(id), format!("card {id}"), score, category).unwrap()
    }

    #[test]
    fn test_offer_index_deserializes_only_within_offer() {
        let last: OfferIndex = serde_json::from_str("2").unwrap();
        assert_eq!(last, OfferIndex::new(2).unwrap());
        assert_eq!(serde_json::to_string(&last).unwrap(), "2");

        let err = serde_json::from_str::<OfferIndex>("3").unwrap_err();
        assert!(
            err.to_string()
                .starts_with("offer index 3 is past the 3 offered cards"),
            "unexpected error: {err}"
        );
    }

    fn offer() -> Offer {
        Offer::new(vec![
            card("s1", 1, Category::Situations),
            card("o1", 2, Category::Objects),
            card("p1", 3, Category::Places),
        ])
        .unwrap()
    }

    fn roles() -> RoleAssignment {
        RoleAssignment {
            cardoelector: "A".to_owned(),
            cardomante: "B".to_owned(),
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    fn idx(i: usize) -> OfferIndex {
        OfferIndex::new(i).unwrap()
    }

    // --- answers ---

    #[test]
    fn test_parse_answer_maps_one_based_numbers() {
        assert_eq!(parse_answer("1"), Ok(idx(0)));
        assert_eq!(parse_answer(" 3\n"), Ok(idx(2)));
    }

    #[test]
    fn test_parse_answer_rejects_empty_input() {
        assert_eq!(parse_answer("   "), Err(InputRejection::Empty));
    }

    #[test]
    fn test_parse_answer_rejects_non_numeric_input() {
        assert_eq!(
            parse_answer("two"),
            Err(InputRejection::NotANumber("two".to_owned()))
        );
    }

    #[test]
    fn test_parse_answer_rejects_out_of_range_numbers() {
        assert_eq!(parse_answer("0"), Err(InputRejection::OutOfRange(0)));
        assert_eq!(parse_answer("4"), Err(InputRejection::OutOfRange(4)));
        assert_eq!(parse_answer("-2"), Err(InputRejection::OutOfRange(-2)));
    }

    #[test]
    fn test_offer_index_rejects_positions_past_the_offer() {
        assert!(OfferIndex::new(3).is_none());
        assert_eq!(OfferIndex::new(2).unwrap().display_number(), 3);
    }

    // --- offer ---

    #[test]
    fn test_offer_rejects_repeated_category() {
        let result = Offer::new(vec![
            card("s1", 1, Category::Situations),
            card("s2", 1, Category::Situations),
            card("p1", 1, Category::Places),
        ]);
        match result.unwrap_err() {
            DomainError::Validation(msg) => {
                assert_eq!(msg, "offered cards must come from distinct categories");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_offer_rejects_wrong_card_count() {
        let result = Offer::new(vec![card("s1", 1, Category::Situations)]);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    // --- state machine ---

    #[test]
    fn test_round_walks_through_every_phase() {
        let mut draft = RoundDraft::new(1, roles());
        assert_eq!(draft.phase(), RoundPhase::Drawing);

        draft.deal(offer()).unwrap();
        assert_eq!(draft.phase(), RoundPhase::Choosing);

        draft.choose(idx(2)).unwrap();
        assert_eq!(draft.phase(), RoundPhase::Guessing);
        assert_eq!(draft.chosen_card().unwrap().id, CardId::new("p1"));

        let round = draft.guess(idx(2), at()).unwrap();
        assert_eq!(draft.phase(), RoundPhase::Resolved);
        assert_eq!(draft.guessed_index(), Some(idx(2)));

        assert_eq!(round.index, 1);
        assert_eq!(round.outcome, RoundOutcome::CorrectGuess);
        assert_eq!(round.chosen_card_id, CardId::new("p1"));
        assert_eq!(round.guessed_card_id, CardId::new("p1"));
        assert_eq!(round.points_awarded["B"], 2);
        assert_eq!(round.points_awarded["A"], 0);
        assert_eq!(round.timestamp, at());
        assert_eq!(
            round.offered_card_ids,
            [CardId::new("s1"), CardId::new("o1"), CardId::new("p1")]
        );
    }

    #[test]
    fn test_wrong_guess_records_both_indices() {
        let mut draft = RoundDraft::new(2, roles());
        draft.deal(offer()).unwrap();
        draft.choose(idx(1)).unwrap();

        let round = draft.guess(idx(0), at()).unwrap();

        assert_eq!(round.choice_index, idx(1));
        assert_eq!(round.guess_index, idx(0));
        assert_eq!(round.outcome, RoundOutcome::WrongGuess);
        assert_eq!(round.points_for("A"), 2);
        assert_eq!(round.points_for("B"), 0);
        assert_eq!(round.role_of("A"), Some(Role::Cardoelector));
        assert_eq!(round.role_of("B"), Some(Role::Cardomante));
        assert_eq!(round.role_of("C"), None);
    }

    #[test]
    fn test_choose_before_deal_returns_error() {
        let mut draft = RoundDraft::new(1, roles());

        let result = draft.choose(idx(0));

        match result.unwrap_err() {
            DomainError::Validation(msg) => {
                assert_eq!(msg, "round 1 must be in Choosing phase, is in Drawing");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_resolved_round_cannot_be_guessed_again() {
        let mut draft = RoundDraft::new(1, roles());
        draft.deal(offer()).unwrap();
        draft.choose(idx(0)).unwrap();
        draft.guess(idx(0), at()).unwrap();

        assert!(draft.guess(idx(1), at()).is_err());
        assert!(draft.deal(offer()).is_err());
    }
}
