//! Query handlers for the game context.
//!
//! Queries rebuild the session from the stored log, so what they report is
//! what was persisted.

use cardo_catalog::{CardCatalog, CardId, CatalogGateway};
use cardo_core::error::DomainError;
use cardo_core::repository::EventRepository;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use super::command_handlers::load_session;
use crate::domain::Scores;
use crate::domain::round::Round;
use crate::domain::standings;

/// Read-only view of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    /// The session identifier.
    pub session_id: Uuid,
    /// Both players in seating order.
    pub players: Vec<String>,
    /// Rounds the session will have.
    pub rounds_total: u32,
    /// Rounds played so far, in order.
    pub rounds: Vec<Round>,
    /// Running totals.
    pub scores: Scores,
    /// Whether the session has been finalized.
    pub finished: bool,
    /// The winner, once finalized; `None` before that or on a tie.
    pub winner: Option<String>,
    /// When the session was opened.
    pub created_at: Option<DateTime<Utc>>,
    /// When the session was closed.
    pub finished_at: Option<DateTime<Utc>>,
}

/// The closing summary of a finished session.
#[derive(Debug, Clone, Serialize)]
pub struct FinalStandings {
    /// The session identifier.
    pub session_id: Uuid,
    /// Both players in seating order.
    pub players: Vec<String>,
    /// The winner; `None` on a tie.
    pub winner: Option<String>,
    /// Final totals.
    pub scores: Scores,
    /// Descriptions of the cards the winner guessed correctly.
    pub won_as_cardomante: Vec<String>,
    /// Descriptions of the cards the winner fooled the guesser with.
    pub won_as_cardoelector: Vec<String>,
}

impl FinalStandings {
    /// The winner's final total; `None` on a tie.
    #[must_use]
    pub fn winner_total(&self) -> Option<u32> {
        self.winner
            .as_ref()
            .map(|name| self.scores.get(name).copied().unwrap_or(0))
    }
}

/// Retrieves a session by its identifier.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the session has no events.
pub async fn get_session_by_id(
    session_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<SessionView, DomainError> {
    let session = load_session(session_id, repo).await?;
    Ok(SessionView {
        session_id,
        players: session
            .players()
            .map(|p| p.names().to_vec())
            .unwrap_or_default(),
        rounds_total: session.rounds_total().get(),
        rounds: session.rounds().to_vec(),
        scores: session.scores().clone(),
        finished: session.is_finished(),
        winner: session.winner().map(str::to_owned),
        created_at: session.created_at(),
        finished_at: session.finished_at(),
    })
}

/// Builds the final standings of a finished session: the winner, the
/// scores and, for the winner only, the descriptions of the chosen cards
/// they scored with in each role. Cards no longer in the catalog are
/// skipped.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown session and
/// `DomainError::Validation` if it has not been finalized.
pub async fn get_final_standings(
    session_id: Uuid,
    repo: &dyn EventRepository,
    catalog: &dyn CardCatalog,
) -> Result<FinalStandings, DomainError> {
    let session = load_session(session_id, repo).await?;
    if !session.is_finished() {
        return Err(DomainError::Validation(format!(
            "session {session_id} has not been finalized"
        )));
    }

    let winner = session.winner().map(str::to_owned);
    let (won_as_cardomante, won_as_cardoelector) = match &winner {
        Some(name) => {
            let won = standings::won_card_ids(session.rounds(), name);
            let gateway = CatalogGateway::new(catalog);
            (
                describe(gateway, &won.as_cardomante).await?,
                describe(gateway, &won.as_cardoelector).await?,
            )
        }
        None => (Vec::new(), Vec::new()),
    };

    Ok(FinalStandings {
        session_id,
        players: session
            .players()
            .map(|p| p.names().to_vec())
            .unwrap_or_default(),
        winner,
        scores: session.scores().clone(),
        won_as_cardomante,
        won_as_cardoelector,
    })
}

async fn describe(gateway: CatalogGateway<'_>, ids: &[CardId]) -> Result<Vec<String>, DomainError> {
    let mut descriptions = Vec::with_capacity(ids.len());
    for id in ids {
        match gateway.find_by_id(id).await? {
            Some(card) => descriptions.push(card.description),
            None => warn!(card_id = %id, "won card no longer in catalog, skipping"),
        }
    }
    Ok(descriptions)
}
