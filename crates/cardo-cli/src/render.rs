//! Text for every screen the console shows.

use cardo_catalog::CatalogReport;
use cardo_game::application::command_handlers::RoundReport;
use cardo_game::application::query_handlers::FinalStandings;
use cardo_game::domain::Scores;
use cardo_game::domain::roles::{Players, Role};
use cardo_game::domain::round::Offer;
use cardo_game::domain::scoring::RoundOutcome;
use colored::Colorize;

/// One line per category with its card count.
pub fn catalog_counts(report: &CatalogReport) -> Vec<String> {
    report
        .counts
        .iter()
        .map(|(category, count)| format!("{category}: {count} cards"))
        .collect()
}

/// Heading shown above the offer.
pub fn turn_heading(round: u32, rounds_total: u32, player: &str, role: Role) -> String {
    let action = match role {
        Role::Cardoelector => "choose",
        Role::Cardomante => "guess",
    };
    format!("Round {round}/{rounds_total}: time to {action}, {player}")
        .bold()
        .to_string()
}

/// The offer as `n) description (score)`.
pub fn offer_lines(offer: &Offer) -> Vec<String> {
    offer
        .cards()
        .iter()
        .enumerate()
        .map(|(i, card)| format!("{}) {} ({})", i + 1, card.description, card.score))
        .collect()
}

/// `Ana: 3  |  Bruno: 1`, in seating order.
pub fn score_line(players: &Players, scores: &Scores) -> String {
    players
        .names()
        .iter()
        .map(|name| format!("{name}: {}", scores.get(name).copied().unwrap_or(0)))
        .collect::<Vec<_>>()
        .join("  |  ")
}

/// Summary printed after a round is stored.
pub fn round_summary(report: &RoundReport, players: &Players) -> Vec<String> {
    let round = &report.round;
    let gained = round.points_detail.gained;
    let outcome = match round.outcome {
        RoundOutcome::CorrectGuess => format!(
            "{} {} and gains {gained} point(s).",
            round.cardomante,
            "guessed right".green()
        ),
        RoundOutcome::WrongGuess => format!(
            "{} {} {} gains {gained} point(s).",
            round.cardomante,
            "missed.".red(),
            round.cardoelector
        ),
    };
    vec![
        format!(
            "Round {} done. {} chose '{}' ({}).",
            round.index, round.cardoelector, report.chosen_card.description, report.chosen_card.score
        ),
        outcome.bold().to_string(),
        "Current scores:".to_owned(),
        format!(" - {}", score_line(players, &report.running_scores)),
    ]
}

/// Closing screen: a tie, or the winner with the cards they scored with.
pub fn final_summary(standings: &FinalStandings, players: &Players) -> Vec<String> {
    let mut lines = Vec::new();
    match (&standings.winner, standings.winner_total()) {
        (Some(winner), Some(total)) => {
            lines.push(format!("{winner} wins!").green().to_string());
            lines.push(format!(
                "Won as cardomante: {}",
                list(&standings.won_as_cardomante)
            ));
            lines.push(format!(
                "Won as cardoelector: {}",
                list(&standings.won_as_cardoelector)
            ));
            lines.push(format!("Total points: {total}"));
        }
        _ => {
            lines.push("The game ended in a tie!".yellow().to_string());
            lines.push(format!(
                "Final scores: {}",
                score_line(players, &standings.scores)
            ));
        }
    }
    lines.push(format!("Session log stored as {}.", standings.session_id));
    lines
}

fn list(descriptions: &[String]) -> String {
    if descriptions.is_empty() {
        "none".to_owned()
    } else {
        descriptions.join(", ")
    }
}
