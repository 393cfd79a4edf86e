//! timeclock-bot library root.
//! Exposes the CLI parser, the high-level run() function and internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod externals;
pub mod models;
pub mod server;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use std::path::PathBuf;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: &Config, config_path: &std::path::Path) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli, config_path),
        Commands::Serve { listen } => cli::commands::serve::handle(cfg, listen.as_deref()).await,
        Commands::Status { account, date, log } => {
            cli::commands::status::handle(cfg, account, date.as_deref(), *log)
        }
        Commands::Clean { account, date, yes } => {
            cli::commands::clean::handle(cfg, account, date.as_deref(), *yes)
        }
    }
}

/// Entry point used by main.rs
pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(Config::config_file);

    // Load the config once; a missing file yields defaults.
    let mut cfg = Config::load_from(&config_path)?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg, &config_path).await
}
