//! Interactive first-run configuration.
//!
//! Walks through the tracker, portal, and LLM settings, keeping current
//! values when the user just presses enter. Secrets land in `secret.json`
//! (0600), everything else in `config.toml`.

use std::io::{self, Write};

use colored::Colorize;

use stint_core::config::{SecretConfig, StintConfig};
use stint_core::Result;
use stint_infrastructure::{ConfigStorage, SecretStorage};

pub fn run(
    config_storage: &ConfigStorage,
    secret_storage: &SecretStorage,
    mut config: StintConfig,
    mut secrets: SecretConfig,
) -> Result<(StintConfig, SecretConfig)> {
    println!("{}", "stint setup".bold());
    println!(
        "{}",
        "Press enter to keep the current value.".bright_black()
    );
    println!();

    println!("{}", "Jira".cyan());
    prompt_into(&mut config.jira.url, "Jira URL (https://...)")?;
    prompt_into(&mut config.jira.username, "Jira account email")?;
    prompt_into(&mut config.jira.project, "Default project key (e.g. SB)")?;
    prompt_secret(&mut secrets.jira_api_token, "Jira API token")?;
    println!();

    println!("{}", "Accounting portal (optional)".cyan());
    prompt_into(&mut config.portal.url, "Portal URL")?;
    prompt_into(&mut config.portal.username, "Portal username")?;
    prompt_into(
        &mut config.portal.driver_command,
        "Portal driver command (invoked as <cmd> <date> <hours> <description>)",
    )?;
    prompt_secret(&mut secrets.portal_password, "Portal password")?;
    prompt_secret(&mut secrets.portal_totp_secret, "Portal TOTP secret")?;
    println!();

    println!("{}", "Summaries (optional)".cyan());
    prompt_into(&mut config.llm.model, "Claude model")?;
    prompt_secret(&mut secrets.anthropic_api_key, "Anthropic API key")?;
    println!();

    config_storage.save(&config)?;
    secret_storage.save(&secrets)?;
    println!("{}", "Configuration saved.".green());

    Ok((config, secrets))
}

/// Prompts for a plain value; an empty answer keeps the current one.
fn prompt_into(value: &mut String, label: &str) -> Result<()> {
    let shown = if value.is_empty() {
        format!("{}: ", label)
    } else {
        format!("{} [{}]: ", label, value)
    };
    if let Some(answer) = read_answer(&shown)? {
        *value = answer;
    }
    Ok(())
}

/// Prompts for a secret. The current value is never echoed; "[set]" marks
/// its presence.
fn prompt_secret(value: &mut Option<String>, label: &str) -> Result<()> {
    let shown = match value {
        Some(_) => format!("{} [set]: ", label),
        None => format!("{}: ", label),
    };
    if let Some(answer) = read_answer(&shown)? {
        *value = Some(answer);
    }
    Ok(())
}

fn read_answer(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let trimmed = line.trim();
    Ok(if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    })
}
