//! Configuration domain models.
//!
//! Non-secret settings live in `config.toml`; credentials live in
//! `secret.json` (see `stint-infrastructure`).

use serde::{Deserialize, Serialize};

/// Application configuration (config.toml).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StintConfig {
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JiraConfig {
    /// Base URL of the Jira instance, e.g. "https://example.atlassian.net".
    #[serde(default)]
    pub url: String,
    /// Account email used for basic auth together with the API token.
    #[serde(default)]
    pub username: String,
    /// Project key new tickets are created under, e.g. "SB".
    #[serde(default)]
    pub project: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PortalConfig {
    /// Login URL of the accounting portal.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub username: String,
    /// External automation command that drives the portal in a browser.
    /// Invoked as `<driver_command> <date> <hours> <description>`.
    #[serde(default)]
    pub driver_command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl StintConfig {
    /// Whether enough configuration exists to start the interactive loop.
    /// Only the tracker settings are mandatory; portal and LLM features
    /// report their own configuration errors when used.
    pub fn is_configured(&self) -> bool {
        !self.jira.url.is_empty() && !self.jira.username.is_empty()
    }
}

/// Credentials (secret.json, mode 0600 on Unix).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SecretConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jira_api_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portal_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portal_totp_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic_api_key: Option<String>,
}
