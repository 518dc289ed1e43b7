//! Command handlers for the game context.
//!
//! Each handler loads the session from its event stream, runs the command
//! against the aggregate, appends the single resulting event and only then
//! folds it into the in-memory state. Together they form the session
//! store's write contract: create, append round, finalize.

use cardo_catalog::{Card, CardCatalog, CatalogGateway};
use cardo_core::aggregate::AggregateRoot;
use cardo_core::clock::Clock;
use cardo_core::command::Command;
use cardo_core::error::DomainError;
use cardo_core::repository::{EventRepository, StoredEvent};
use cardo_core::rng::DeterministicRng;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::input::RoundInput;
use super::query_handlers::{self, FinalStandings};
use super::round_engine;
use crate::domain::Scores;
use crate::domain::aggregates::{GameSession, RoundsTotal};
use crate::domain::commands::{FinalizeSession, PlayRound, StartSession};
use crate::domain::events::{GameEvent, GameEventKind};
use crate::domain::roles::Players;
use crate::domain::round::Round;

/// Result of opening a session.
#[derive(Debug)]
pub struct SessionStartedResult {
    /// The new session's identifier.
    pub session_id: Uuid,
    /// Both players in seating order, after name defaults.
    pub players: Players,
    /// Rounds that will be played.
    pub rounds_total: RoundsTotal,
    /// Whether the requested round count was unusable and 5 was used.
    pub rounds_defaulted: bool,
    /// The stored events produced and persisted.
    pub stored_events: Vec<StoredEvent>,
}

/// What the presentation layer shows after each round.
#[derive(Debug, Clone)]
pub struct RoundReport {
    /// The persisted round record.
    pub round: Round,
    /// The card the cardoelector picked.
    pub chosen_card: Card,
    /// Totals after this round.
    pub running_scores: Scores,
    /// Rounds still to be played.
    pub rounds_remaining: u32,
}

/// Reconstitutes a `GameSession` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    session_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<GameSession, DomainError> {
    let mut session = GameSession::new(session_id);
    for stored in existing_events {
        let kind: GameEventKind = serde_json::from_value(stored.payload.clone()).map_err(|e| {
            DomainError::Infrastructure(format!("event deserialization failed: {e}"))
        })?;
        session.apply(&GameEvent {
            metadata: stored.metadata(),
            kind,
        });
    }
    Ok(session)
}

/// Loads a session, failing if its stream is empty.
pub(crate) async fn load_session(
    session_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<GameSession, DomainError> {
    let existing_events = repo.load_events(session_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(session_id));
    }
    reconstitute(session_id, &existing_events)
}

/// Appends the session's pending events, then folds them in. On failure the
/// pending events are discarded so the in-memory state never runs ahead of
/// the store.
async fn persist(
    session: &mut GameSession,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let stored_events: Vec<StoredEvent> = session
        .uncommitted_events()
        .iter()
        .map(StoredEvent::from_domain_event)
        .collect();

    if let Err(e) = repo
        .append_events(session.id, session.version(), &stored_events)
        .await
    {
        session.clear_uncommitted_events();
        return Err(e);
    }
    session.commit();
    Ok(stored_events)
}

/// Handles the `StartSession` command: seats the players, settles the
/// round count and persists the new session.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the player names collide, or any
/// error from appending the event.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
    )
)]
pub async fn handle_start_session(
    command: &StartSession,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<SessionStartedResult, DomainError> {
    let players = Players::new(&command.first_player, &command.second_player)?;
    let (rounds_total, rounds_defaulted) = RoundsTotal::parse_or_default(&command.rounds_requested);
    if rounds_defaulted {
        warn!(
            requested = %command.rounds_requested,
            rounds = rounds_total.get(),
            "round count out of range, using default"
        );
    }

    let session_id = Uuid::new_v4();
    let mut session = GameSession::new(session_id);
    session.start(players.clone(), rounds_total, command.correlation_id, clock)?;
    let stored_events = persist(&mut session, repo).await?;

    info!(%session_id, rounds = rounds_total.get(), "session started");
    Ok(SessionStartedResult {
        session_id,
        players,
        rounds_total,
        rounds_defaulted,
        stored_events,
    })
}

/// Handles the `PlayRound` command: runs the round engine for the next
/// round and persists the round with the new running scores in one event.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown session,
/// `DomainError::Validation` once every round is played,
/// `DomainError::CatalogExhausted` if the draw fails, and any error from
/// appending the event.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        session_id = %command.session_id,
        correlation_id = %command.correlation_id(),
    )
)]
pub async fn handle_play_round(
    command: &PlayRound,
    catalog: &dyn CardCatalog,
    rng: &mut dyn DeterministicRng,
    input: &mut dyn RoundInput,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<RoundReport, DomainError> {
    let mut session = load_session(command.session_id, repo).await?;
    let draft = session.next_round()?;

    let played =
        round_engine::run_round(draft, CatalogGateway::new(catalog), rng, input, clock).await?;
    session.record_round(played.round.clone(), command.correlation_id, clock)?;
    persist(&mut session, repo).await?;

    let rounds_total = session.rounds_total().get();
    #[allow(clippy::cast_possible_truncation)]
    let rounds_remaining = rounds_total.saturating_sub(session.rounds().len() as u32);
    info!(
        round = played.round.index,
        outcome = ?played.round.outcome,
        rounds_remaining,
        "round persisted"
    );
    Ok(RoundReport {
        round: played.round,
        chosen_card: played.chosen_card,
        running_scores: session.scores().clone(),
        rounds_remaining,
    })
}

/// Handles the `FinalizeSession` command: settles the winner, persists the
/// final result, then rebuilds the standings from the stored log.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown session,
/// `DomainError::Validation` if rounds remain or the session is already
/// finished, and any error from the repository or catalog.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        session_id = %command.session_id,
        correlation_id = %command.correlation_id(),
    )
)]
pub async fn handle_finalize_session(
    command: &FinalizeSession,
    catalog: &dyn CardCatalog,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<FinalStandings, DomainError> {
    let mut session = load_session(command.session_id, repo).await?;
    session.finalize(command.correlation_id, clock)?;
    persist(&mut session, repo).await?;
    info!(winner = ?session.winner(), "session finalized");

    query_handlers::get_final_standings(command.session_id, repo, catalog).await
}

#[cfg(test)]
mod tests {
    use cardo_catalog::CardId;
    use cardo_core::error::DomainError;
    use cardo_core::repository::StoredEvent;
    use cardo_store::InMemoryEventRepository;
    use cardo_test_support::{
        EmptyEventRepository, FailingEventRepository, MockRng, RecordingEventRepository,
        fixed_clock,
    };
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::application::round_engine::tests::{ScriptedInput, catalog};
    use crate::domain::events::{RoundPlayed, SessionStarted};
    use crate::domain::round::OfferIndex;
    use crate::domain::scoring::{PointsDetail, RoundOutcome};

    fn start_command(rounds: &str) -> StartSession {
        StartSession {
            correlation_id: Uuid::new_v4(),
            first_player: "A".to_owned(),
            second_player: "B".to_owned(),
            rounds_requested: rounds.to_owned(),
        }
    }

    fn stored(session_id: Uuid, sequence_number: i64, kind: &GameEventKind) -> StoredEvent {
        let event_type = match kind {
            GameEventKind::SessionStarted(_) => "game.session_started",
            GameEventKind::RoundPlayed(_) => "game.round_played",
            GameEventKind::SessionFinalized(_) => "game.session_finalized",
        };
        StoredEvent {
            event_id: Uuid::new_v4(),
            aggregate_id: session_id,
            event_type: event_type.to_owned(),
            payload: serde_json::to_value(kind).unwrap(),
            sequence_number,
            correlation_id: Uuid::new_v4(),
            causation_id: Uuid::new_v4(),
            occurred_at: fixed_clock().0,
        }
    }

    fn session_started(session_id: Uuid, rounds: u32, at: DateTime<Utc>) -> StoredEvent {
        stored(
            session_id,
            1,
            &GameEventKind::SessionStarted(SessionStarted {
                session_id,
                players: Players::new("A", "B").unwrap(),
                rounds_total: RoundsTotal::new(rounds).unwrap(),
                created_at: at,
            }),
        )
    }

    fn round_played(session_id: Uuid, index: u32, a: u32, b: u32) -> StoredEvent {
        let (elector, mante) = if index % 2 == 1 { ("A", "B") } else { ("B", "A") };
        let round = Round {
            index,
            cardoelector: elector.to_owned(),
            cardomante: mante.to_owned(),
            offered_card_ids: [CardId::new("s1"), CardId::new("o1"), CardId::new("e1")],
            choice_index: OfferIndex::new(0).unwrap(),
            chosen_card_id: CardId::new("s1"),
            guess_index: OfferIndex::new(1).unwrap(),
            guessed_card_id: CardId::new("o1"),
            outcome: RoundOutcome::WrongGuess,
            points_awarded: [(elector.to_owned(), 1), (mante.to_owned(), 0)]
                .into_iter()
                .collect(),
            points_detail: PointsDetail {
                base_score: 1,
                penalty: 0,
                gained: 1,
            },
            timestamp: fixed_clock().0,
        };
        stored(
            session_id,
            i64::from(index) + 1,
            &GameEventKind::RoundPlayed(RoundPlayed {
                session_id,
                round,
                scores: [("A".to_owned(), a), ("B".to_owned(), b)]
                    .into_iter()
                    .collect(),
            }),
        )
    }

    // --- start ---

    #[tokio::test]
    async fn test_handle_start_session_persists_session_started_event() {
        // Arrange
        let command = start_command("4");
        let repo = RecordingEventRepository::new(Vec::new());

        // Act
        let result = handle_start_session(&command, &fixed_clock(), &repo)
            .await
            .unwrap();

        // Assert
        assert_eq!(result.rounds_total.get(), 4);
        assert!(!result.rounds_defaulted);
        let appended = repo.appended_events();
        assert_eq!(appended.len(), 1);

        let (agg_id, expected_version, events) = &appended[0];
        assert_eq!(*agg_id, result.session_id);
        assert_eq!(*expected_version, 0);
        assert_eq!(events.len(), 1);

        let stored = &events[0];
        assert_eq!(stored.event_type, "game.session_started");
        assert_eq!(stored.sequence_number, 1);
        assert_eq!(stored.correlation_id, command.correlation_id);
        assert_eq!(stored.occurred_at, fixed_clock().0);
        assert_eq!(stored.payload["SessionStarted"]["players"], serde_json::json!(["A", "B"]));
        assert_eq!(stored.payload["SessionStarted"]["rounds_total"], 4);
    }

    #[tokio::test]
    async fn test_handle_start_session_defaults_invalid_round_count() {
        let repo = RecordingEventRepository::new(Vec::new());

        let result = handle_start_session(&start_command("twenty"), &fixed_clock(), &repo)
            .await
            .unwrap();

        assert!(result.rounds_defaulted);
        assert_eq!(result.rounds_total.get(), 5);
    }

    #[tokio::test]
    async fn test_handle_start_session_rejects_duplicate_names() {
        let repo = RecordingEventRepository::new(Vec::new());
        let mut command = start_command("5");
        command.second_player = "A".to_owned();

        let result = handle_start_session(&command, &fixed_clock(), &repo).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(repo.appended_events().is_empty());
    }

    #[tokio::test]
    async fn test_handle_start_session_surfaces_append_failure() {
        let repo = FailingEventRepository::default();

        let result = handle_start_session(&start_command("5"), &fixed_clock(), &repo).await;

        match result.unwrap_err() {
            DomainError::Infrastructure(msg) => assert_eq!(msg, "connection refused"),
            other => panic!("expected Infrastructure, got {other:?}"),
        }
    }

    // --- play round ---

    #[tokio::test]
    async fn test_handle_play_round_appends_round_with_running_scores() {
        // Arrange
        let session_id = Uuid::new_v4();
        let repo = RecordingEventRepository::new(vec![
            session_started(session_id, 3, fixed_clock().0),
            round_played(session_id, 1, 1, 0),
        ]);
        let catalog = catalog();
        // Round 2: B elects e1 (3 points), A guesses s1.
        let mut input = ScriptedInput::new(&["3", "1"]);
        let command = PlayRound {
            correlation_id: Uuid::new_v4(),
            session_id,
        };

        // Act
        let report = handle_play_round(
            &command,
            &catalog,
            &mut MockRng,
            &mut input,
            &fixed_clock(),
            &repo,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(report.round.index, 2);
        assert_eq!(report.round.cardoelector, "B");
        assert_eq!(report.round.outcome, RoundOutcome::WrongGuess);
        assert_eq!(report.chosen_card.id, CardId::new("e1"));
        assert_eq!(report.running_scores["A"], 1);
        assert_eq!(report.running_scores["B"], 3);
        assert_eq!(report.rounds_remaining, 1);

        let appended = repo.appended_events();
        assert_eq!(appended.len(), 1);
        let (_, expected_version, events) = &appended[0];
        assert_eq!(*expected_version, 2);
        assert_eq!(events[0].event_type, "game.round_played");
        assert_eq!(events[0].sequence_number, 3);
        assert_eq!(events[0].payload["RoundPlayed"]["scores"]["B"], 3);
        assert_eq!(events[0].payload["RoundPlayed"]["round"]["outcome"], "wrong_guess");
    }

    #[tokio::test]
    async fn test_handle_play_round_returns_not_found_for_unknown_session() {
        let session_id = Uuid::new_v4();
        let catalog = catalog();
        let mut input = ScriptedInput::new(&[]);
        let command = PlayRound {
            correlation_id: Uuid::new_v4(),
            session_id,
        };

        let result = handle_play_round(
            &command,
            &catalog,
            &mut MockRng,
            &mut input,
            &fixed_clock(),
            &EmptyEventRepository,
        )
        .await;

        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, session_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_play_round_rejects_extra_round() {
        let session_id = Uuid::new_v4();
        let repo = RecordingEventRepository::new(vec![
            session_started(session_id, 3, fixed_clock().0),
            round_played(session_id, 1, 1, 0),
            round_played(session_id, 2, 1, 1),
            round_played(session_id, 3, 2, 1),
        ]);
        let catalog = catalog();
        let mut input = ScriptedInput::new(&["1", "1"]);
        let command = PlayRound {
            correlation_id: Uuid::new_v4(),
            session_id,
        };

        let result = handle_play_round(
            &command,
            &catalog,
            &mut MockRng,
            &mut input,
            &fixed_clock(),
            &repo,
        )
        .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(repo.appended_events().is_empty());
        assert!(input.offers_seen.is_empty());
    }

    #[tokio::test]
    async fn test_handle_play_round_surfaces_append_failure() {
        let session_id = Uuid::new_v4();
        let repo = FailingEventRepository::with_history(vec![session_started(
            session_id,
            3,
            fixed_clock().0,
        )]);
        let catalog = catalog();
        let mut input = ScriptedInput::new(&["1", "1"]);
        let command = PlayRound {
            correlation_id: Uuid::new_v4(),
            session_id,
        };

        let result = handle_play_round(
            &command,
            &catalog,
            &mut MockRng,
            &mut input,
            &fixed_clock(),
            &repo,
        )
        .await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    // --- finalize ---

    #[tokio::test]
    async fn test_handle_finalize_session_rejects_unfinished_session() {
        let session_id = Uuid::new_v4();
        let repo = RecordingEventRepository::new(vec![
            session_started(session_id, 3, fixed_clock().0),
            round_played(session_id, 1, 1, 0),
        ]);
        let catalog = catalog();
        let command = FinalizeSession {
            correlation_id: Uuid::new_v4(),
            session_id,
        };

        let result = handle_finalize_session(&command, &catalog, &fixed_clock(), &repo).await;

        match result.unwrap_err() {
            DomainError::Validation(msg) => assert_eq!(msg, "cannot finalize after 1 of 3 rounds"),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert!(repo.appended_events().is_empty());
    }

    #[tokio::test]
    async fn test_handle_finalize_session_appends_winner() {
        // Arrange
        let session_id = Uuid::new_v4();
        let repo = InMemoryEventRepository::new();
        repo.append_events(
            session_id,
            0,
            &[
                session_started(session_id, 3, fixed_clock().0),
                round_played(session_id, 1, 1, 0),
                round_played(session_id, 2, 1, 1),
                round_played(session_id, 3, 2, 1),
            ],
        )
        .await
        .unwrap();
        let catalog = catalog();
        let command = FinalizeSession::new(session_id);

        // Act
        let standings = handle_finalize_session(&command, &catalog, &fixed_clock(), &repo)
            .await
            .unwrap();

        // Assert
        assert_eq!(standings.winner.as_deref(), Some("A"));
        assert_eq!(standings.winner_total(), Some(2));
        assert_eq!(standings.won_as_cardoelector, vec!["card s1", "card s1"]);
        assert!(standings.won_as_cardomante.is_empty());

        let events = repo.load_events(session_id).await.unwrap();
        assert_eq!(events.len(), 5);
        let finalized = &events[4];
        assert_eq!(finalized.sequence_number, 5);
        assert_eq!(finalized.event_type, "game.session_finalized");
        assert_eq!(finalized.correlation_id, command.correlation_id);
        assert_eq!(finalized.payload["SessionFinalized"]["winner"], "A");
        assert_eq!(finalized.payload["SessionFinalized"]["scores"]["A"], 2);
    }
}
