use chrono::NaiveDate;
use yt_analytics_client::{AnalyticsClient, ReportQuery, ReportResponse};

use crate::config::DATE_FORMAT;
use crate::error::ReportError;

/// Every report covers the authenticated user's own channel
pub const CHANNEL_SELECTOR: &str = "channel==MINE";
/// Reports are grouped and sorted by day
pub const DAY_DIMENSION: &str = "day";

/// A validated report query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    /// Always `channel==MINE`
    pub channel_selector: String,
    /// First day of the report, inclusive
    pub start_date: NaiveDate,
    /// Last day of the report, inclusive
    pub end_date: NaiveDate,
    /// Requested metrics in request order, without duplicates
    pub metrics: Vec<String>,
    /// Always `day`
    pub dimension: String,
    /// Always `day`
    pub sort: String,
}

impl ReportRequest {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, metrics: Vec<String>) -> Self {
        Self {
            channel_selector: CHANNEL_SELECTOR.to_string(),
            start_date,
            end_date,
            metrics,
            dimension: DAY_DIMENSION.to_string(),
            sort: DAY_DIMENSION.to_string(),
        }
    }

    pub fn to_query(&self) -> ReportQuery {
        ReportQuery {
            ids: self.channel_selector.clone(),
            start_date: self.start_date.format(DATE_FORMAT).to_string(),
            end_date: self.end_date.format(DATE_FORMAT).to_string(),
            metrics: self.metrics.join(","),
            dimensions: self.dimension.clone(),
            sort: self.sort.clone(),
        }
    }
}

/// Run the report query once
pub async fn fetch_report(
    client: &AnalyticsClient,
    request: &ReportRequest,
) -> Result<ReportResponse, ReportError> {
    tracing::info!(
        start = %request.start_date,
        end = %request.end_date,
        metrics = request.metrics.len(),
        "fetching analytics report"
    );
    Ok(client.query(&request.to_query()).await?)
}
