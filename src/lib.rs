//! sleeptracker library root.
//! Exposes the CLI parser, the high-level run() function and the state
//! holders the terminal screens are built on.

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

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Start => cli::commands::start::handle(cfg).await,
        Commands::Stop => cli::commands::stop::handle(cfg).await,
        Commands::Quality { .. } => cli::commands::quality::handle(&cli.command, cfg).await,
        Commands::List { .. } => cli::commands::list::handle(&cli.command, cfg).await,
        Commands::Detail { .. } => cli::commands::detail::handle(&cli.command, cfg).await,
        Commands::Clear { .. } => cli::commands::clear::handle(&cli.command, cfg).await,
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    // --db wins over the configured database
    if let Some(custom_db) = &cli.db {
        cfg.database = utils::path::expand_tilde(custom_db)
            .to_string_lossy()
            .to_string();
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(dispatch(&cli, &cfg))
}
