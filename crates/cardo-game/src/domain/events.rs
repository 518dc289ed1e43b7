//! Domain events for the game context.

use cardo_core::event::{DomainEvent, EventMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Scores;
use super::aggregates::RoundsTotal;
use super::roles::Players;
use super::round::Round;

/// Emitted when a session is opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStarted {
    /// The session identifier.
    pub session_id: Uuid,
    /// Both players in seating order.
    pub players: Players,
    /// Number of rounds to play.
    pub rounds_total: RoundsTotal,
    /// When the session was opened.
    pub created_at: DateTime<Utc>,
}

/// Emitted when a round is resolved. Carries the round and the running
/// scores after it, so both land in the store together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundPlayed {
    /// The session identifier.
    pub session_id: Uuid,
    /// The resolved round.
    pub round: Round,
    /// Running totals including this round.
    pub scores: Scores,
}

/// Emitted once, after the last round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFinalized {
    /// The session identifier.
    pub session_id: Uuid,
    /// The player with more points; `None` on a tie.
    pub winner: Option<String>,
    /// Final totals.
    pub scores: Scores,
    /// When the session was closed.
    pub finished_at: DateTime<Utc>,
}

/// Event type identifier for [`SessionStarted`].
pub const SESSION_STARTED_EVENT_TYPE: &str = "game.session_started";

/// Event type identifier for [`RoundPlayed`].
pub const ROUND_PLAYED_EVENT_TYPE: &str = "game.round_played";

/// Event type identifier for [`SessionFinalized`].
pub const SESSION_FINALIZED_EVENT_TYPE: &str = "game.session_finalized";

/// Event payload variants for the game context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEventKind {
    /// A session has started.
    SessionStarted(SessionStarted),
    /// A round has been played.
    RoundPlayed(RoundPlayed),
    /// A session has been finalized.
    SessionFinalized(SessionFinalized),
}

/// Domain event envelope for the game context.
#[derive(Debug, Clone)]
pub struct GameEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: GameEventKind,
}

impl DomainEvent for GameEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            GameEventKind::SessionStarted(_) => SESSION_STARTED_EVENT_TYPE,
            GameEventKind::RoundPlayed(_) => ROUND_PLAYED_EVENT_TYPE,
            GameEventKind::SessionFinalized(_) => SESSION_FINALIZED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("GameEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
