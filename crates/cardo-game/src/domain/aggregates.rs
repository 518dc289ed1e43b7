//! Aggregate roots for the game context.

use cardo_core::aggregate::AggregateRoot;
use cardo_core::clock::Clock;
use cardo_core::error::DomainError;
use cardo_core::event::EventMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Scores;
use super::events::{
    GameEvent, GameEventKind, ROUND_PLAYED_EVENT_TYPE, RoundPlayed, SESSION_FINALIZED_EVENT_TYPE,
    SESSION_STARTED_EVENT_TYPE, SessionFinalized, SessionStarted,
};
use super::roles::{Players, RoleAssignment};
use super::round::{Round, RoundDraft};
use super::standings;

/// Number of rounds in a session, within `3..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundsTotal(u8);

impl RoundsTotal {
    /// Fewest rounds a session may have.
    pub const MIN: u8 = 3;
    /// Most rounds a session may have.
    pub const MAX: u8 = 10;
    /// Used whenever the requested count is unusable.
    pub const DEFAULT: RoundsTotal = RoundsTotal(5);

    /// Validates a round count.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` outside `3..=10`.
    pub fn new(rounds: u32) -> Result<Self, DomainError> {
        u8::try_from(rounds)
            .ok()
            .filter(|r| (Self::MIN..=Self::MAX).contains(r))
            .map(Self)
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "rounds must be between {} and {}, got {rounds}",
                    Self::MIN,
                    Self::MAX
                ))
            })
    }

    /// Parses a typed round count, falling back to [`Self::DEFAULT`] when
    /// it is not a number or out of range. The flag reports the fallback.
    #[must_use]
    pub fn parse_or_default(raw: &str) -> (Self, bool) {
        match raw.trim().parse::<u32>().ok().map(Self::new) {
            Some(Ok(rounds)) => (rounds, false),
            _ => (Self::DEFAULT, true),
        }
    }

    /// The count as a number.
    #[must_use]
    pub fn get(self) -> u32 {
        u32::from(self.0)
    }
}

/// Session lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionPhase {
    Created,
    InProgress,
    Finished,
}

/// The aggregate root for one match between two players.
#[derive(Debug)]
pub struct GameSession {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    pub(crate) phase: SessionPhase,
    pub(crate) players: Option<Players>,
    pub(crate) rounds_total: RoundsTotal,
    pub(crate) rounds: Vec<Round>,
    pub(crate) scores: Scores,
    pub(crate) winner: Option<String>,
    pub(crate) created_at: Option<DateTime<Utc>>,
    pub(crate) finished_at: Option<DateTime<Utc>>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<GameEvent>,
}

impl GameSession {
    /// Creates an empty session shell, ready for `start` or reconstitution.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            phase: SessionPhase::Created,
            players: None,
            rounds_total: RoundsTotal::DEFAULT,
            rounds: Vec::new(),
            scores: Scores::new(),
            winner: None,
            created_at: None,
            finished_at: None,
            uncommitted_events: Vec::new(),
        }
    }

    /// Both players, once started.
    #[must_use]
    pub fn players(&self) -> Option<&Players> {
        self.players.as_ref()
    }

    /// Rounds to play in total.
    #[must_use]
    pub fn rounds_total(&self) -> RoundsTotal {
        self.rounds_total
    }

    /// Rounds played so far, oldest first.
    #[must_use]
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Running totals.
    #[must_use]
    pub fn scores(&self) -> &Scores {
        &self.scores
    }

    /// The winner, set on finalization; `None` before that or on a tie.
    #[must_use]
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    /// When the session was started.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// When the session was finalized.
    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Whether every round has been played.
    #[must_use]
    pub fn all_rounds_played(&self) -> bool {
        self.rounds.len() as u64 >= u64::from(self.rounds_total.get())
    }

    /// Whether the session has been finalized.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn metadata(&self, event_type: &str, correlation_id: Uuid, clock: &dyn Clock) -> EventMetadata {
        EventMetadata::caused_by_command(
            event_type,
            self.id,
            self.next_sequence_number(),
            correlation_id,
            clock.now(),
        )
    }

    fn require_in_progress(&self) -> Result<&Players, DomainError> {
        match (self.phase, self.players.as_ref()) {
            (SessionPhase::InProgress, Some(players)) => Ok(players),
            (SessionPhase::Finished, _) => Err(DomainError::Validation(
                "session is already finished".to_owned(),
            )),
            _ => Err(DomainError::Validation(
                "session has not been started".to_owned(),
            )),
        }
    }

    /// Opens the session with zero scores, producing a `SessionStarted`
    /// event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the session was already started.
    pub fn start(
        &mut self,
        players: Players,
        rounds_total: RoundsTotal,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.phase != SessionPhase::Created || !self.uncommitted_events.is_empty() {
            return Err(DomainError::Validation(
                "session has already been started".to_owned(),
            ));
        }

        let metadata = self.metadata(SESSION_STARTED_EVENT_TYPE, correlation_id, clock);
        let created_at = metadata.occurred_at;
        self.uncommitted_events.push(GameEvent {
            metadata,
            kind: GameEventKind::SessionStarted(SessionStarted {
                session_id: self.id,
                players,
                rounds_total,
                created_at,
            }),
        });
        Ok(())
    }

    /// Opens the next round with roles assigned by round parity.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the session is not in progress or
    /// every round has been played.
    pub fn next_round(&self) -> Result<RoundDraft, DomainError> {
        let players = self.require_in_progress()?;
        if self.all_rounds_played() {
            return Err(DomainError::Validation(format!(
                "all {} rounds have been played",
                self.rounds_total.get()
            )));
        }
        let index = self.next_round_index();
        Ok(RoundDraft::new(
            index,
            RoleAssignment::for_round(players, index),
        ))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn next_round_index(&self) -> u32 {
        self.rounds.len() as u32 + 1
    }

    /// Appends a resolved round and the updated running scores, producing a
    /// `RoundPlayed` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the session is not in progress,
    /// is full, the round does not match the next index and roles, or a
    /// running score would overflow.
    pub fn record_round(
        &mut self,
        round: Round,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let expected = self.next_round()?;
        if !self.uncommitted_events.is_empty() {
            return Err(DomainError::Validation(
                "a previous change is still pending persistence".to_owned(),
            ));
        }
        if round.index != expected.index() {
            return Err(DomainError::Validation(format!(
                "expected round {}, got round {}",
                expected.index(),
                round.index
            )));
        }
        let roles = expected.roles();
        if round.cardoelector != roles.cardoelector || round.cardomante != roles.cardomante {
            return Err(DomainError::Validation(format!(
                "round {} must be elected by {} and guessed by {}",
                round.index, roles.cardoelector, roles.cardomante
            )));
        }

        let mut scores = self.scores.clone();
        for (player, points) in &round.points_awarded {
            let total = scores.entry(player.clone()).or_default();
            *total = total.checked_add(*points).ok_or_else(|| {
                DomainError::Validation(format!(
                    "score of {player} overflows after round {}",
                    round.index
                ))
            })?;
        }

        let metadata = self.metadata(ROUND_PLAYED_EVENT_TYPE, correlation_id, clock);
        self.uncommitted_events.push(GameEvent {
            metadata,
            kind: GameEventKind::RoundPlayed(RoundPlayed {
                session_id: self.id,
                round,
                scores,
            }),
        });
        Ok(())
    }

    /// Closes the session and settles the winner, producing a
    /// `SessionFinalized` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the session is not in progress or
    /// rounds remain to be played.
    pub fn finalize(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        let players = self.require_in_progress()?;
        if !self.all_rounds_played() {
            return Err(DomainError::Validation(format!(
                "cannot finalize after {} of {} rounds",
                self.rounds.len(),
                self.rounds_total.get()
            )));
        }
        if !self.uncommitted_events.is_empty() {
            return Err(DomainError::Validation(
                "a previous change is still pending persistence".to_owned(),
            ));
        }

        let winner = standings::winner_of(players, &self.scores);
        let metadata = self.metadata(SESSION_FINALIZED_EVENT_TYPE, correlation_id, clock);
        let finished_at = metadata.occurred_at;
        self.uncommitted_events.push(GameEvent {
            metadata,
            kind: GameEventKind::SessionFinalized(SessionFinalized {
                session_id: self.id,
                winner,
                scores: self.scores.clone(),
                finished_at,
            }),
        });
        Ok(())
    }
}

impl AggregateRoot for GameSession {
    type Event = GameEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            GameEventKind::SessionStarted(payload) => {
                self.phase = SessionPhase::InProgress;
                self.scores = payload
                    .players
                    .names()
                    .iter()
                    .map(|name| (name.clone(), 0))
                    .collect();
                self.players = Some(payload.players.clone());
                self.rounds_total = payload.rounds_total;
                self.created_at = Some(payload.created_at);
            }
            GameEventKind::RoundPlayed(payload) => {
                self.rounds.push(payload.round.clone());
                self.scores.clone_from(&payload.scores);
            }
            GameEventKind::SessionFinalized(payload) => {
                self.phase = SessionPhase::Finished;
                self.winner.clone_from(&payload.winner);
                self.scores.clone_from(&payload.scores);
                self.finished_at = Some(payload.finished_at);
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}
