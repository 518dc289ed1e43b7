//! Cardo console entry point.

use std::process::ExitCode;
use std::time::Duration;

use cardo_catalog::deck::load_deck;
use cardo_catalog::{CardCatalog, CatalogGateway};
use cardo_core::clock::{Clock, SystemClock};
use cardo_core::repository::EventRepository;
use cardo_core::rng::{DeterministicRng, StdRandom};
use cardo_game::application::command_handlers::{
    handle_finalize_session, handle_play_round, handle_start_session,
};
use cardo_game::domain::commands::{FinalizeSession, PlayRound, StartSession};
use cardo_store::schema::run_migrations;
use cardo_store::{InMemoryEventRepository, PgCardCatalog, PgEventRepository};
use clap::Parser;
use colored::Colorize;
use sqlx::postgres::PgPoolOptions;
use tokio::runtime::Runtime;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod console;
mod error;
mod render;

use config::Config;
use console::Console;
use error::AppError;

/// Where cards come from and where sessions go.
struct Stores {
    catalog: Box<dyn CardCatalog>,
    events: Box<dyn EventRepository>,
}

fn main() -> ExitCode {
    let config = Config::parse();
    init_tracing(config.log_json);

    let result = runtime()
        .map_err(AppError::Terminal)
        .and_then(|rt| rt.block_on(run(config)));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("error: {e}").red());
            ExitCode::FAILURE
        }
    }
}

/// The console blocks on prompts and pauses, so everything runs on the
/// calling thread.
fn runtime() -> std::io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Logs go to stderr so they never interleave with the game screen.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(config: Config) -> Result<(), AppError> {
    config.validate()?;
    let stores = open_stores(&config).await?;

    let mut rng = match config.seed {
        Some(seed) => {
            info!(seed, "using seeded rng");
            StdRandom::seeded(seed)
        }
        None => StdRandom::from_os(),
    };
    let mut console = Console::new(Duration::from_millis(config.pause_ms));

    play(
        &mut console,
        stores.catalog.as_ref(),
        stores.events.as_ref(),
        &mut rng,
        &SystemClock,
    )
    .await
}

async fn open_stores(config: &Config) -> Result<Stores, AppError> {
    let deck = config.catalog.as_deref().map(load_deck).transpose()?;
    let Some(url) = &config.database_url else {
        let Some(deck) = deck else {
            return Err(AppError::Config("no card source configured".to_owned()));
        };
        warn!("no database configured, sessions are kept in memory only");
        return Ok(Stores {
            catalog: Box::new(deck),
            events: Box::new(InMemoryEventRepository::new()),
        });
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(url)
        .await?;
    run_migrations(&pool).await?;
    let events = Box::new(PgEventRepository::new(pool.clone()));
    let pg_catalog = PgCardCatalog::new(pool);

    match deck {
        Some(deck) if config.import_deck => {
            let cards: Vec<_> = deck.cards().cloned().collect();
            pg_catalog.upsert_cards(&cards).await?;
            info!(count = cards.len(), "deck imported into the database");
            Ok(Stores {
                catalog: Box::new(pg_catalog),
                events,
            })
        }
        Some(deck) => Ok(Stores {
            catalog: Box::new(deck),
            events,
        }),
        None => Ok(Stores {
            catalog: Box::new(pg_catalog),
            events,
        }),
    }
}

async fn play(
    console: &mut Console,
    catalog: &dyn CardCatalog,
    events: &dyn EventRepository,
    rng: &mut dyn DeterministicRng,
    clock: &dyn Clock,
) -> Result<(), AppError> {
    let report = CatalogGateway::new(catalog).verify().await?;
    console.say(render::catalog_counts(&report));
    console.say([String::new(), "Cardo".bold().to_string(), String::new()]);

    let first_player = console.ask("Player 1 name")?;
    let second_player = console.ask("Player 2 name")?;
    let rounds_requested = console.ask("Number of rounds (3-10)")?;

    let started = handle_start_session(
        &StartSession::new(first_player, second_player, rounds_requested),
        clock,
        events,
    )
    .await?;
    let session_id = started.session_id;
    let rounds_total = started.rounds_total.get();
    if started.rounds_defaulted {
        console.say([format!(
            "That number is out of range, playing {rounds_total} rounds."
        )
        .yellow()
        .to_string()]);
        console.wait_for_enter()?;
    }

    for round in 1..=rounds_total {
        console.begin_round(round, rounds_total);
        let report = handle_play_round(
            &PlayRound::new(session_id),
            catalog,
            rng,
            console,
            clock,
            events,
        )
        .await?;
        console.clear()?;
        console.say(render::round_summary(&report, &started.players));
        console.wait_for_enter()?;
    }

    let standings = handle_finalize_session(
        &FinalizeSession::new(session_id),
        catalog,
        clock,
        events,
    )
    .await?;
    console.clear()?;
    console.say(render::final_summary(&standings, &started.players));
    Ok(())
}
