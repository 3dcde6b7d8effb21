//! hallkeep - lecture hall state tracking
//!
//! Command-line host for the hallkeep engine: loads configuration, opens the
//! shared room store and runs one command or the reconciliation watcher.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;
mod error;
mod feed;
mod output;
mod reconciler;
mod state;

use cli::Cli;
use config::Config;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> error::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.database {
        config.database_path = Some(path);
    }
    if let Some(operator) = cli.operator {
        config.operator = operator;
    }

    let state = Arc::new(state::AppState::new(config)?);
    commands::execute(cli.command, state).await
}
