//! Jira REST client.
//!
//! Talks to the Jira Cloud REST API v2 with basic auth (account email +
//! API token). Only the narrow surface behind `TicketTracker` is covered.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use stint_core::config::JiraConfig;
use stint_core::ticket::{Ticket, TicketDetails, TicketFilter, TicketTracker};
use stint_core::{Result, StintError};

const SEARCH_FIELDS: &str = "summary,status,priority,assignee,updated";
const DETAIL_FIELDS: &str = "summary,status,priority,assignee,reporter,created,updated,description";

/// `TicketTracker` backed by the Jira REST API.
#[derive(Debug)]
pub struct JiraClient {
    client: Client,
    base_url: String,
    username: String,
    api_token: String,
    project: String,
}

impl JiraClient {
    pub fn new(config: &JiraConfig, api_token: impl Into<String>) -> Result<Self> {
        if config.url.is_empty() || config.username.is_empty() {
            return Err(StintError::config(
                "Jira is not configured. Run 'stint --setup' first.",
            ));
        }
        Ok(Self {
            client: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            api_token: api_token.into(),
            project: config.project.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest/api/2/{}", self.base_url, path)
    }

    async fn search(&self, jql: &str) -> Result<Vec<Ticket>> {
        debug!(jql, "jira search");
        let response = self
            .client
            .get(self.url("search"))
            .basic_auth(&self.username, Some(&self.api_token))
            .query(&[("jql", jql), ("fields", SEARCH_FIELDS), ("maxResults", "50")])
            .send()
            .await
            .map_err(request_error)?;

        let response = check_status(response, None).await?;
        let parsed: SearchResponse = response.json().await.map_err(decode_error)?;
        Ok(parsed.issues.into_iter().map(IssueDto::into_ticket).collect())
    }

    async fn issue(&self, key: &str) -> Result<IssueDto> {
        let response = self
            .client
            .get(self.url(&format!("issue/{}", key)))
            .basic_auth(&self.username, Some(&self.api_token))
            .query(&[("fields", DETAIL_FIELDS)])
            .send()
            .await
            .map_err(request_error)?;

        let response = check_status(response, Some(key)).await?;
        response.json().await.map_err(decode_error)
    }

    async fn post(&self, path: &str, body: serde_json::Value, key: Option<&str>) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(self.url(path))
            .basic_auth(&self.username, Some(&self.api_token))
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;
        check_status(response, key).await
    }
}

/// Builds the JQL for a filter. Split out so the queries can be tested
/// without a server; `today` anchors the relative date ranges.
fn jql_for(filter: &TicketFilter, today: NaiveDate) -> String {
    match filter {
        TicketFilter::Todo => {
            "assignee = currentUser() AND status = 'To Do' \
             ORDER BY priority DESC, updated DESC"
                .to_string()
        }
        TicketFilter::Active => {
            "assignee = currentUser() AND status != Done AND status != Resolved \
             ORDER BY priority DESC, updated DESC"
                .to_string()
        }
        TicketFilter::Completed { days } => {
            let since = today - Duration::days(i64::from(*days));
            format!(
                "assignee = currentUser() AND (status = Done OR status = Resolved) \
                 AND updated >= {} ORDER BY updated DESC",
                since.format("%Y-%m-%d")
            )
        }
        TicketFilter::WorkedOn { date } => format!(
            "worklogDate = {} AND worklogAuthor = currentUser() ORDER BY updated DESC",
            date.format("%Y-%m-%d")
        ),
    }
}

#[async_trait]
impl TicketTracker for JiraClient {
    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>> {
        let jql = jql_for(filter, Utc::now().date_naive());
        self.search(&jql).await
    }

    async fn details(&self, key: &str) -> Result<TicketDetails> {
        let issue = self.issue(key).await?;
        Ok(issue.into_details())
    }

    async fn set_status(&self, key: &str, status: &str) -> Result<()> {
        let response = self
            .client
            .get(self.url(&format!("issue/{}/transitions", key)))
            .basic_auth(&self.username, Some(&self.api_token))
            .send()
            .await
            .map_err(request_error)?;
        let response = check_status(response, Some(key)).await?;
        let transitions: TransitionsResponse = response.json().await.map_err(decode_error)?;

        let transition = transitions
            .transitions
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(status))
            .ok_or_else(|| {
                let available = transitions
                    .transitions
                    .iter()
                    .map(|t| t.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                StintError::collaborator(
                    "jira",
                    format!(
                        "transition '{}' not available for {} (available: {})",
                        status, key, available
                    ),
                )
            })?;

        self.post(
            &format!("issue/{}/transitions", key),
            json!({ "transition": { "id": transition.id } }),
            Some(key),
        )
        .await?;
        Ok(())
    }

    async fn create(&self, summary: &str, description: &str) -> Result<String> {
        if self.project.is_empty() {
            return Err(StintError::config(
                "no Jira project configured; set jira.project in config.toml",
            ));
        }
        let body = json!({
            "fields": {
                "project": { "key": self.project },
                "summary": summary,
                "description": description,
                "issuetype": { "name": "Task" },
            }
        });
        let response = self.post("issue", body, None).await?;
        let created: CreatedIssueResponse = response.json().await.map_err(decode_error)?;
        Ok(created.key)
    }

    async fn create_subtask(
        &self,
        parent: &str,
        summary: &str,
        description: &str,
    ) -> Result<String> {
        // The subtask inherits its project from the parent.
        let parent_issue = self.issue(parent).await?;
        let project = parent_issue
            .key
            .split('-')
            .next()
            .unwrap_or(&self.project)
            .to_string();

        let body = json!({
            "fields": {
                "project": { "key": project },
                "summary": summary,
                "description": description,
                "issuetype": { "name": "Sub-task" },
                "parent": { "key": parent },
            }
        });
        let response = self.post("issue", body, Some(parent)).await?;
        let created: CreatedIssueResponse = response.json().await.map_err(decode_error)?;
        Ok(created.key)
    }

    async fn add_comment(&self, key: &str, body: &str) -> Result<()> {
        self.post(
            &format!("issue/{}/comment", key),
            json!({ "body": body }),
            Some(key),
        )
        .await?;
        Ok(())
    }
}

fn request_error(err: reqwest::Error) -> StintError {
    StintError::collaborator("jira", format!("request failed: {}", err))
}

fn decode_error(err: reqwest::Error) -> StintError {
    StintError::collaborator("jira", format!("unexpected response: {}", err))
}

/// Turns HTTP error statuses into domain errors. `key` identifies the
/// ticket for 404 responses.
async fn check_status(response: reqwest::Response, key: Option<&str>) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        if let Some(key) = key {
            return Err(StintError::not_found("ticket", key));
        }
    }

    let body = response.text().await.unwrap_or_default();
    let message = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            "authentication failed; check jira username and API token".to_string()
        }
        _ => format!("HTTP {}: {}", status, truncate(&body, 200)),
    };
    Err(StintError::collaborator("jira", message))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// Wire types. Jira timestamps ("2024-01-15T10:30:00.000+0000") are not
// RFC 3339, so they arrive as strings and are parsed leniently.

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<IssueDto>,
}

#[derive(Debug, Deserialize)]
struct IssueDto {
    key: String,
    fields: FieldsDto,
}

#[derive(Debug, Default, Deserialize)]
struct FieldsDto {
    #[serde(default)]
    summary: String,
    status: Option<NamedDto>,
    priority: Option<NamedDto>,
    assignee: Option<UserDto>,
    reporter: Option<UserDto>,
    created: Option<String>,
    updated: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedDto {
    name: String,
}

#[derive(Debug, Deserialize)]
struct UserDto {
    #[serde(rename = "displayName")]
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct TransitionsResponse {
    #[serde(default)]
    transitions: Vec<TransitionDto>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TransitionDto {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct CreatedIssueResponse {
    key: String,
}

fn parse_jira_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?;
    DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.3f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl IssueDto {
    fn into_ticket(self) -> Ticket {
        Ticket {
            key: self.key,
            summary: self.fields.summary,
            status: self
                .fields
                .status
                .map(|s| s.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            priority: self
                .fields
                .priority
                .map(|p| p.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            assignee: self.fields.assignee.map(|u| u.display_name),
            updated: parse_jira_timestamp(self.fields.updated.as_deref()),
        }
    }

    fn into_details(self) -> TicketDetails {
        let description = self.fields.description.clone().unwrap_or_default();
        let reporter = self.fields.reporter.as_ref().map(|u| u.display_name.clone());
        let created = parse_jira_timestamp(self.fields.created.as_deref());
        TicketDetails {
            ticket: IssueDto {
                key: self.key,
                fields: FieldsDto {
                    description: None,
                    reporter: None,
                    created: None,
                    ..self.fields
                },
            }
            .into_ticket(),
            description,
            reporter,
            created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn active_filter_excludes_done_and_resolved() {
        let jql = jql_for(&TicketFilter::Active, day("2024-03-10"));
        assert!(jql.contains("status != Done"));
        assert!(jql.contains("status != Resolved"));
        assert!(jql.contains("ORDER BY priority DESC, updated DESC"));
    }

    #[test]
    fn completed_filter_anchors_on_days_back() {
        let jql = jql_for(&TicketFilter::Completed { days: 7 }, day("2024-03-10"));
        assert!(jql.contains("updated >= 2024-03-03"));
    }

    #[test]
    fn worked_on_filter_uses_worklog_date() {
        let jql = jql_for(
            &TicketFilter::WorkedOn {
                date: day("2024-03-10"),
            },
            day("2024-03-11"),
        );
        assert!(jql.contains("worklogDate = 2024-03-10"));
        assert!(jql.contains("worklogAuthor = currentUser()"));
    }

    #[test]
    fn jira_timestamps_parse() {
        let parsed = parse_jira_timestamp(Some("2024-01-15T10:30:00.000+0000")).unwrap();
        assert_eq!(parsed.date_naive(), day("2024-01-15"));
        assert!(parse_jira_timestamp(Some("garbage")).is_none());
        assert!(parse_jira_timestamp(None).is_none());
    }

    #[test]
    fn issue_dto_maps_missing_fields_to_placeholders() {
        let dto: IssueDto = serde_json::from_value(serde_json::json!({
            "key": "SB-3",
            "fields": { "summary": "Fix the thing" }
        }))
        .unwrap();
        let ticket = dto.into_ticket();
        assert_eq!(ticket.status, "Unknown");
        assert_eq!(ticket.priority, "Unknown");
        assert!(ticket.assignee.is_none());
    }

    #[test]
    fn details_carry_description_and_reporter() {
        let dto: IssueDto = serde_json::from_value(serde_json::json!({
            "key": "SB-3",
            "fields": {
                "summary": "Fix the thing",
                "status": { "name": "In Progress" },
                "description": "Longer text",
                "reporter": { "displayName": "Sam" },
                "created": "2024-01-15T10:30:00.000+0000"
            }
        }))
        .unwrap();
        let details = dto.into_details();
        assert_eq!(details.ticket.key, "SB-3");
        assert_eq!(details.ticket.status, "In Progress");
        assert_eq!(details.description, "Longer text");
        assert_eq!(details.reporter.as_deref(), Some("Sam"));
        assert!(details.created.is_some());
    }

    #[test]
    fn unconfigured_client_is_a_config_error() {
        let err = JiraClient::new(&JiraConfig::default(), "token").unwrap_err();
        assert!(matches!(err, StintError::Config(_)));
    }
}
