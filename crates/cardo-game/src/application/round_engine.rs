//! Round engine: draws the offer, collects both answers and resolves.

use cardo_catalog::{Card, CatalogGateway, Category};
use cardo_core::clock::Clock;
use cardo_core::error::DomainError;
use cardo_core::rng::{DeterministicRng, sample_without_replacement, shuffle};
use tracing::debug;

use super::input::RoundInput;
use crate::domain::roles::Role;
use crate::domain::round::{OFFER_SIZE, Offer, OfferIndex, Round, RoundDraft, parse_answer};

/// A resolved round together with the card that was chosen, for display.
#[derive(Debug, Clone)]
pub struct PlayedRound {
    /// The immutable round record.
    pub round: Round,
    /// The card the cardoelector picked.
    pub chosen_card: Card,
}

/// Draws three cards from three distinct categories and shuffles them into
/// presentation order.
///
/// # Errors
///
/// Returns `DomainError::CatalogExhausted` if a sampled category is empty.
pub async fn draw_offer(
    catalog: CatalogGateway<'_>,
    rng: &mut dyn DeterministicRng,
) -> Result<Offer, DomainError> {
    let categories = sample_without_replacement(rng, &Category::ALL, OFFER_SIZE);

    let mut cards = Vec::with_capacity(OFFER_SIZE);
    for category in categories {
        let card = catalog
            .sample_one(category, rng)
            .await
            .map_err(|e| match e {
                DomainError::EmptyCategory(category) => DomainError::CatalogExhausted(category),
                other => other,
            })?;
        cards.push(card);
    }
    shuffle(rng, &mut cards);
    Offer::new(cards)
}

/// Asks `player` until they give a usable answer.
fn ask(
    input: &mut dyn RoundInput,
    role: Role,
    player: &str,
    offer: &Offer,
) -> Result<OfferIndex, DomainError> {
    loop {
        let raw = match role {
            Role::Cardoelector => input.choose(player, offer)?,
            Role::Cardomante => input.guess(player, offer)?,
        };
        match parse_answer(&raw) {
            Ok(index) => {
                input.accepted(player, role);
                return Ok(index);
            }
            Err(rejection) => {
                debug!(%player, %role, %rejection, "answer rejected");
                input.rejected(player, role, &rejection);
            }
        }
    }
}

/// Plays one round from `Drawing` to `Resolved`.
///
/// # Errors
///
/// Returns `DomainError::CatalogExhausted` if the draw fails and
/// `DomainError::Input` if an answer cannot be read.
pub async fn run_round(
    mut draft: RoundDraft,
    catalog: CatalogGateway<'_>,
    rng: &mut dyn DeterministicRng,
    input: &mut dyn RoundInput,
    clock: &dyn Clock,
) -> Result<PlayedRound, DomainError> {
    let offer = draw_offer(catalog, rng).await?;
    draft.deal(offer.clone())?;

    let roles = draft.roles().clone();
    let choice = ask(input, Role::Cardoelector, &roles.cardoelector, &offer)?;
    draft.choose(choice)?;

    let guess = ask(input, Role::Cardomante, &roles.cardomante, &offer)?;
    let round = draft.guess(guess, clock.now())?;

    debug!(
        round = round.index,
        outcome = ?round.outcome,
        gained = round.points_detail.gained,
        "round resolved"
    );
    Ok(PlayedRound {
        round,
        chosen_card: offer.card(choice).clone(),
    })
}
