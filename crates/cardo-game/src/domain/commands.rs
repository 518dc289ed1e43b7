//! Commands for the game context.

use cardo_core::command::Command;
use uuid::Uuid;

/// Command to open a new session.
#[derive(Debug, Clone)]
pub struct StartSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Name typed for the first player; blank means the default.
    pub first_player: String,
    /// Name typed for the second player; blank means the default.
    pub second_player: String,
    /// Round count as typed; anything outside `3..=10` falls back to 5.
    pub rounds_requested: String,
}

impl StartSession {
    /// Builds the command under a fresh correlation id.
    pub fn new(
        first_player: impl Into<String>,
        second_player: impl Into<String>,
        rounds_requested: impl Into<String>,
    ) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            first_player: first_player.into(),
            second_player: second_player.into(),
            rounds_requested: rounds_requested.into(),
        }
    }
}

impl Command for StartSession {
    fn command_type(&self) -> &'static str {
        "game.start_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to play the next round of a session.
#[derive(Debug, Clone)]
pub struct PlayRound {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to advance.
    pub session_id: Uuid,
}

impl PlayRound {
    /// Builds the command under a fresh correlation id.
    #[must_use]
    pub fn new(session_id: Uuid) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            session_id,
        }
    }
}

impl Command for PlayRound {
    fn command_type(&self) -> &'static str {
        "game.play_round"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to close a session once every round is played.
#[derive(Debug, Clone)]
pub struct FinalizeSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to close.
    pub session_id: Uuid,
}

impl FinalizeSession {
    /// Builds the command under a fresh correlation id.
    #[must_use]
    pub fn new(session_id: Uuid) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            session_id,
        }
    }
}

impl Command for FinalizeSession {
    fn command_type(&self) -> &'static str {
        "game.finalize_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
