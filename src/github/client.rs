use crate::config::Config;
use crate::github::issues::{Issue, IssueFields, IssueState, StateChange};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

mod media_types {
    pub const ACCEPT: &str = "application/vnd.github.v3+json";
    pub const CONTENT_TYPE: &str = "application/json";
}

const USER_AGENT: &str = "gissue-cli";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection failures, timeouts and body read failures.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API request error: {status}{}", detail(.message))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("failed to decode issue: {0}")]
    Decode(#[from] serde_json::Error),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" ({m})"))
        .unwrap_or_default()
}

/// GitHub error bodies look like `{"message": "...", "documentation_url": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the `/repos/{owner}/{repo}/issues` endpoints.
pub struct IssueClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl IssueClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(IssueClient {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn issues_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/issues", self.base_url, owner, repo)
    }

    pub fn issue_url(&self, owner: &str, repo: &str, number: u64) -> String {
        format!("{}/{}", self.issues_url(owner, repo), number)
    }

    /// Creates an issue and returns its number when the response carries one.
    pub async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
    ) -> Result<Option<u64>, ApiError> {
        let response = self
            .request(Method::POST, self.issues_url(owner, repo))
            .json(&IssueFields { title, body })
            .send()
            .await?;
        let response = expect_status(response, StatusCode::CREATED).await?;

        // The status alone decides success; the number is best effort.
        let number = response
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
            .and_then(|value| value["number"].as_u64());
        Ok(number)
    }

    pub async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        title: &str,
        body: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .request(Method::PATCH, self.issue_url(owner, repo, number))
            .json(&IssueFields { title, body })
            .send()
            .await?;
        expect_status(response, StatusCode::OK).await?;
        Ok(())
    }

    pub async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> Result<Issue, ApiError> {
        let response = self
            .request(Method::GET, self.issue_url(owner, repo, number))
            .send()
            .await?;
        let response = expect_status(response, StatusCode::OK).await?;

        let text = response.text().await?;
        let issue = serde_json::from_str::<Issue>(&text)?;
        Ok(issue)
    }

    pub async fn close_issue(&self, owner: &str, repo: &str, number: u64) -> Result<(), ApiError> {
        self.set_state(owner, repo, number, IssueState::Closed).await
    }

    pub async fn reopen_issue(&self, owner: &str, repo: &str, number: u64) -> Result<(), ApiError> {
        self.set_state(owner, repo, number, IssueState::Open).await
    }

    async fn set_state(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        state: IssueState,
    ) -> Result<(), ApiError> {
        let response = self
            .request(Method::PATCH, self.issue_url(owner, repo, number))
            .json(&StateChange { state })
            .send()
            .await?;
        expect_status(response, StatusCode::OK).await?;
        Ok(())
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        tracing::debug!(%method, %url, "sending request");
        self.http
            .request(method, url)
            .header("Accept", media_types::ACCEPT)
            .header("Content-Type", media_types::CONTENT_TYPE)
            .header("Authorization", format!("token {}", self.token))
    }
}

async fn expect_status(response: Response, expected: StatusCode) -> Result<Response, ApiError> {
    let status = response.status();
    tracing::debug!(%status, url = %response.url(), "received response");
    if status == expected {
        return Ok(response);
    }

    // The body only adds detail to the error; failing to read it is not worth reporting.
    let message = response
        .text()
        .await
        .ok()
        .and_then(|text| serde_json::from_str::<ErrorBody>(&text).ok())
        .map(|body| body.message);
    Err(ApiError::Status { status, message })
}
