//! Accounting portal driver.
//!
//! The portal has no API; submissions go through an external browser
//! automation command configured as `portal.driver_command`. The driver is
//! invoked as `<driver_command> <date> <hours> <description>` with the
//! portal credentials passed through the environment, never on the command
//! line.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use stint_core::config::{PortalConfig, SecretConfig};
use stint_core::portal::{PortalEntry, TimePortal};
use stint_core::{Result, StintError};

/// `TimePortal` that shells out to the configured automation driver.
pub struct ProcessPortalClient {
    program: String,
    args: Vec<String>,
    url: String,
    username: String,
    password: Option<String>,
    totp_secret: Option<String>,
}

impl ProcessPortalClient {
    pub fn new(config: &PortalConfig, secrets: &SecretConfig) -> Self {
        let mut parts = config.driver_command.split_whitespace();
        let program = parts.next().unwrap_or_default().to_string();
        let args = parts.map(str::to_string).collect();
        Self {
            program,
            args,
            url: config.url.clone(),
            username: config.username.clone(),
            password: secrets.portal_password.clone(),
            totp_secret: secrets.portal_totp_secret.clone(),
        }
    }
}

#[async_trait]
impl TimePortal for ProcessPortalClient {
    async fn submit_entry(&self, entry: &PortalEntry) -> Result<()> {
        if self.program.is_empty() {
            return Err(StintError::config(
                "no portal driver configured; set portal.driver_command in config.toml",
            ));
        }

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(entry.date.format("%Y-%m-%d").to_string())
            .arg(format!("{:.2}", entry.hours))
            .arg(&entry.description)
            .env("STINT_PORTAL_URL", &self.url)
            .env("STINT_PORTAL_USERNAME", &self.username);
        if let Some(password) = &self.password {
            command.env("STINT_PORTAL_PASSWORD", password);
        }
        if let Some(totp) = &self.totp_secret {
            command.env("STINT_PORTAL_TOTP_SECRET", totp);
        }

        debug!(program = %self.program, date = %entry.date, "running portal driver");
        let output = command.output().await.map_err(|e| {
            StintError::collaborator(
                "portal",
                format!("failed to run driver '{}': {}", self.program, e),
            )
        })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = ?output.status.code(), "portal driver failed");
            Err(StintError::collaborator(
                "portal",
                format!(
                    "driver exited with {}: {}",
                    output
                        .status
                        .code()
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "signal".to_string()),
                    stderr.trim()
                ),
            ))
        }
    }
}
