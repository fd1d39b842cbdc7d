//! CLI module
//!
//! Provides subcommands:
//! - `serve`: bootstrap the schema, start the session janitor and serve HTTP
//!   (default)
//! - `migrate`: bootstrap the schema and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Session-based account registration, login and logout
#[derive(Parser)]
#[command(name = "session-auth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Run the HTTP server (default)
    #[default]
    Serve,

    /// Create the database schema and exit
    Migrate,
}

/// Load `.env`, read configuration and start logging
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&logging::LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });

    Ok(config)
}
