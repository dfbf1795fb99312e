use serde::Serialize;
use thiserror::Error;

mod response;

pub use response::{ColumnHeader, ReportResponse};

/// Public endpoint of the YouTube Analytics API
pub const DEFAULT_API_ADDRESS: &str = "https://youtubeanalytics.googleapis.com";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("YouTube Analytics API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed report response: {0}")]
    MalformedResponse(String),

    #[error("Failed to decode report response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Query parameters of `reports.query`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    /// Channel selector, e.g. `channel==MINE`
    pub ids: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    /// Comma-separated metric names
    pub metrics: String,
    /// Grouping dimension, e.g. `day`
    pub dimensions: String,
    /// Sort key, e.g. `day`
    pub sort: String,
}

/// Authenticated client for the analytics reports endpoint
pub struct AnalyticsClient {
    /// Shared HTTP client
    http: reqwest::Client,
    /// API base URL without a trailing slash
    base_url: String,
    /// OAuth access token sent as a bearer credential
    access_token: String,
}

impl AnalyticsClient {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a single report query. Failures are returned as-is, without retry.
    pub async fn query(&self, query: &ReportQuery) -> Result<ReportResponse, ClientError> {
        let url = format!("{}/v2/reports", self.base_url);
        tracing::debug!(%url, ?query, "querying analytics report");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            return Err(ClientError::Api {
                status,
                message: error_message(&body),
            });
        }

        let raw: serde_json::Value = response.json().await?;
        let report = ReportResponse::from_value(raw)?;
        tracing::info!(rows = report.rows.len(), "received analytics report");
        Ok(report)
    }
}

/// Pull `error.message` out of a Google error document, falling back to the body text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(|message| message.as_str())
                .map(|message| message.to_string())
        })
        .unwrap_or_else(|| body.to_string())
}
