//! hourledger library root.
//! Exposes the ledger (keyed tables, event and lock stores, query facade),
//! the CLI parser, and the high-level run() used by main.rs.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use crate::core::facade::Ledger;
pub use crate::core::input::RecordInput;
pub use crate::db::pool::DbPool;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli, cfg),
        Commands::Users | Commands::User { .. } => cli::commands::users::handle(&cli.command, cfg),
        Commands::Event { action } => cli::commands::event::handle(action, cfg),
        Commands::Lock { action } => cli::commands::lock::handle(action, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Install the stderr tracing subscriber. `HOURLEDGER_LOG` wins over the
/// configured level.
pub fn init_tracing(default_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("HOURLEDGER_LOG")
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ load config once
    let mut cfg = Config::load()?;

    // 3️⃣ command-line DB override
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    init_tracing(&cfg.log_level);
    tracing::debug!(database = %cfg.database, "configuration loaded");

    dispatch(&cli, &cfg)
}
