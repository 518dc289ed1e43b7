//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::error::AppError;

/// Two players, one deck: elect a card, guess the card.
#[derive(Debug, Clone, Parser)]
#[command(name = "cardo", version, about, long_about = None)]
pub struct Config {
    /// PostgreSQL connection string; stores sessions and reads cards there.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// YAML deck file; used instead of the database's card table.
    #[arg(long, env = "CARDO_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Copy the YAML deck into the database's card table before playing.
    #[arg(long, requires_all = ["database_url", "catalog"])]
    pub import_deck: bool,

    /// Seed for reproducible draws.
    #[arg(long, env = "CARDO_SEED")]
    pub seed: Option<u64>,

    /// Milliseconds to wait before clearing the screen after an answer.
    #[arg(long, default_value_t = 900)]
    pub pause_ms: u64,

    /// Database pool size.
    #[arg(long, default_value_t = 5)]
    pub max_connections: u32,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

impl Config {
    /// Checks that at least one card source is configured.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when neither a database nor a deck file is
    /// given.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database_url.is_none() && self.catalog.is_none() {
            return Err(AppError::Config(
                "no card source: pass --database-url (DATABASE_URL) or --catalog (CARDO_CATALOG)"
                    .to_owned(),
            ));
        }
        Ok(())
    }
}
