//! External collaborators for stint: the Jira tracker, the accounting
//! portal driver, and the Claude summarizer, plus the prompts fed to it.

pub mod jira_client;
pub mod portal_client;
pub mod prompts;
pub mod summary_agent;

pub use jira_client::JiraClient;
pub use portal_client::ProcessPortalClient;
pub use summary_agent::ClaudeSummaryAgent;
