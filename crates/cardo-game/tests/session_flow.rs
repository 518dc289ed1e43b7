//! End-to-end session tests over the in-memory event store.

use std::collections::VecDeque;

use cardo_catalog::{Card, CardId, Category, InMemoryCardCatalog};
use cardo_core::error::DomainError;
use cardo_core::repository::EventRepository;
use cardo_core::rng::StdRandom;
use cardo_game::application::command_handlers::{
    handle_finalize_session, handle_play_round, handle_start_session,
};
use cardo_game::application::input::RoundInput;
use cardo_game::application::query_handlers::get_session_by_id;
use cardo_game::domain::commands::{FinalizeSession, PlayRound, StartSession};
use cardo_game::domain::roles::{Players, Role};
use cardo_game::domain::round::{InputRejection, Offer};
use cardo_game::domain::standings::tally;
use cardo_store::InMemoryEventRepository;
use cardo_test_support::fixed_clock;
use uuid::Uuid;

/// Answers from a fixed script and counts rejections.
#[derive(Default)]
struct Script {
    answers: VecDeque<&'static str>,
    rejections: usize,
}

impl Script {
    fn new(answers: &[&'static str]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            rejections: 0,
        }
    }

    fn next(&mut self) -> Result<String, DomainError> {
        self.answers
            .pop_front()
            .map(str::to_owned)
            .ok_or_else(|| DomainError::Input("no more answers".to_owned()))
    }
}

impl RoundInput for Script {
    fn choose(&mut self, _cardoelector: &str, _offer: &Offer) -> Result<String, DomainError> {
        self.next()
    }

    fn guess(&mut self, _cardomante: &str, _offer: &Offer) -> Result<String, DomainError> {
        self.next()
    }

    fn rejected(&mut self, _player: &str, _role: Role, _rejection: &InputRejection) {
        self.rejections += 1;
    }
}

fn catalog() -> InMemoryCardCatalog {
    let card = |id: &str, score: u32, category: Category| {
        Card::new(CardId::new(id), format!("card {id}"), score, category).unwrap()
    };
    InMemoryCardCatalog::from_cards([
        card("s1", 1, Category::Situations),
        card("s2", 2, Category::Situations),
        card("o1", 3, Category::Objects),
        card("o2", 1, Category::Objects),
        card("e1", 2, Category::Emotions),
        card("p1", 3, Category::Places),
        card("p2", 1, Category::Places),
    ])
}

#[tokio::test]
async fn test_full_session_persists_every_step() {
    // Arrange
    let repo = InMemoryEventRepository::new();
    let catalog = catalog();
    let clock = fixed_clock();
    let mut rng = StdRandom::seeded(7);
    // Round 2 opens with two rejected answers before the valid pick.
    let mut input = Script::new(&["1", "1", "", "9", "2", "3", "3", "2"]);

    let started = handle_start_session(
        &StartSession {
            correlation_id: Uuid::new_v4(),
            first_player: "Ana".to_owned(),
            second_player: "Bruno".to_owned(),
            rounds_requested: "3".to_owned(),
        },
        &clock,
        &repo,
    )
    .await
    .unwrap();
    let session_id = started.session_id;

    // Act
    let mut reports = Vec::new();
    for _ in 0..3 {
        let report = handle_play_round(
            &PlayRound {
                correlation_id: Uuid::new_v4(),
                session_id,
            },
            &catalog,
            &mut rng,
            &mut input,
            &clock,
            &repo,
        )
        .await
        .unwrap();
        reports.push(report);
    }
    let standings = handle_finalize_session(
        &FinalizeSession {
            correlation_id: Uuid::new_v4(),
            session_id,
        },
        &catalog,
        &clock,
        &repo,
    )
    .await
    .unwrap();

    // Assert
    assert_eq!(input.rejections, 2);
    let roles: Vec<&str> = reports
        .iter()
        .map(|r| r.round.cardoelector.as_str())
        .collect();
    assert_eq!(roles, vec!["Ana", "Bruno", "Ana"]);
    assert_eq!(
        reports.iter().map(|r| r.rounds_remaining).collect::<Vec<_>>(),
        vec![2, 1, 0]
    );

    let events = repo.load_events(session_id).await.unwrap();
    let types: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        types,
        vec![
            "game.session_started",
            "game.round_played",
            "game.round_played",
            "game.round_played",
            "game.session_finalized",
        ]
    );

    let view = get_session_by_id(session_id, &repo).await.unwrap();
    let players = Players::new("Ana", "Bruno").unwrap();
    assert!(view.finished);
    assert_eq!(view.scores, tally(&players, &view.rounds));
    assert_eq!(standings.scores, view.scores);
    assert_eq!(standings.winner, view.winner);
    assert_eq!(
        reports.last().map(|r| r.running_scores.clone()),
        Some(view.scores)
    );
}

#[tokio::test]
async fn test_finished_session_rejects_more_play() {
    let repo = InMemoryEventRepository::new();
    let catalog = catalog();
    let clock = fixed_clock();
    let mut rng = StdRandom::seeded(11);
    let mut input = Script::new(&["1", "2", "2", "2", "3", "1", "1", "1"]);

    let session_id = handle_start_session(
        &StartSession {
            correlation_id: Uuid::new_v4(),
            first_player: String::new(),
            second_player: String::new(),
            rounds_requested: "3".to_owned(),
        },
        &clock,
        &repo,
    )
    .await
    .unwrap()
    .session_id;
    for _ in 0..3 {
        handle_play_round(
            &PlayRound {
                correlation_id: Uuid::new_v4(),
                session_id,
            },
            &catalog,
            &mut rng,
            &mut input,
            &clock,
            &repo,
        )
        .await
        .unwrap();
    }
    let finalize = FinalizeSession {
        correlation_id: Uuid::new_v4(),
        session_id,
    };
    let standings = handle_finalize_session(&finalize, &catalog, &clock, &repo)
        .await
        .unwrap();

    let again = handle_finalize_session(&finalize, &catalog, &clock, &repo).await;
    let extra = handle_play_round(
        &PlayRound {
            correlation_id: Uuid::new_v4(),
            session_id,
        },
        &catalog,
        &mut rng,
        &mut input,
        &clock,
        &repo,
    )
    .await;

    assert_eq!(standings.players, vec!["Player 1".to_owned(), "Player 2".to_owned()]);
    assert!(matches!(again, Err(DomainError::Validation(_))));
    assert!(matches!(extra, Err(DomainError::Validation(_))));
    assert_eq!(repo.load_events(session_id).await.unwrap().len(), 5);
}
