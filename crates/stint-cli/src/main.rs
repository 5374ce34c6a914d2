//! stint: an interactive work tracker.
//!
//! One prompt for tracker tickets, local notes, task timers, and portal
//! hours. Logs go to a file under the config directory; the console stays
//! reserved for the interactive session.

mod commands;
mod repl;
mod setup;
#[cfg(test)]
mod testing;

use std::fs::{self, OpenOptions};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stint_core::command::registry::CommandRegistry;
use stint_core::AppContext;
use stint_infrastructure::{
    ConfigStorage, SecretStorage, SessionStateRepository, StintPaths, TomlNoteRepository,
    TomlTimeEntryRepository,
};
use stint_interaction::{ClaudeSummaryAgent, JiraClient, ProcessPortalClient};

#[derive(Parser)]
#[command(name = "stint", version, about = "Interactive work tracker")]
struct Cli {
    /// Run interactive configuration and exit.
    #[arg(long)]
    setup: bool,
}

fn init_logging() -> Result<()> {
    let logs_dir = StintPaths::logs_dir()?;
    fs::create_dir_all(&logs_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(logs_dir.join("stint.log"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let config_storage = ConfigStorage::new()?;
    let secret_storage = SecretStorage::new()?;

    // An unparsable config file is fatal; overwriting the user's settings
    // with defaults would be worse than stopping.
    let mut config = config_storage
        .load_or_default()
        .context("failed to load config.toml")?;
    let mut secrets = secret_storage.load()?;

    if cli.setup || !config.is_configured() {
        let (new_config, new_secrets) =
            setup::run(&config_storage, &secret_storage, config, secrets)?;
        config = new_config;
        secrets = new_secrets;
        if cli.setup {
            return Ok(());
        }
    }

    let tickets = JiraClient::new(
        &config.jira,
        secrets.jira_api_token.clone().unwrap_or_default(),
    )?;
    let portal = ProcessPortalClient::new(&config.portal, &secrets);
    let summarizer = ClaudeSummaryAgent::new(
        &config.llm,
        secrets.anthropic_api_key.clone().unwrap_or_default(),
    );
    let notes = TomlNoteRepository::new()?;
    let time_entries = TomlTimeEntryRepository::new()?;

    let state = SessionStateRepository::new()?;
    let (session, recovered) = state.load_or_recover();
    if let Some(err) = recovered {
        println!(
            "{}",
            format!("Warning: session state was unreadable, starting fresh ({})", err).yellow()
        );
    }

    let ctx = AppContext::new(
        session,
        config,
        Arc::new(tickets),
        Arc::new(portal),
        Arc::new(summarizer),
        Arc::new(notes),
        Arc::new(time_entries),
    );

    let mut registry = CommandRegistry::new();
    commands::register_all(&mut registry)?;

    info!("stint starting");
    repl::run(registry, ctx, state, StintPaths::history_file()?).await
}
