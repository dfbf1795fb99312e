use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Where the client secret is read from and reports are written to
pub const DEFAULT_DATA_DIR: &str = "../data";
pub const SECRET_FILE_NAME: &str = "secrets.json";

pub const DATA_DIR_VAR: &str = "YT_ANALYTICS_DATA_DIR";
pub const API_ADDRESS_VAR: &str = "ANALYTICS_API_ADDRESS";
pub const INSECURE_TRANSPORT_VAR: &str = "OAUTH_INSECURE_TRANSPORT";

pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/yt-analytics.readonly",
    "https://www.googleapis.com/auth/yt-analytics-monetary.readonly",
];

/// Metrics a report may request. The default request asks for all of them, in this order.
pub const METRICS: [&str; 35] = [
    "views",
    "redViews",
    "comments",
    "likes",
    "dislikes",
    "videosAddedToPlaylists",
    "videosRemovedFromPlaylists",
    "shares",
    "estimatedMinutesWatched",
    "estimatedRedMinutesWatched",
    "averageViewDuration",
    "averageViewPercentage",
    "annotationClickThroughRate",
    "annotationCloseRate",
    "annotationImpressions",
    "annotationClickableImpressions",
    "annotationClosableImpressions",
    "annotationClicks",
    "annotationCloses",
    "cardClickRate",
    "cardTeaserClickRate",
    "cardImpressions",
    "cardTeaserImpressions",
    "cardClicks",
    "cardTeaserClicks",
    "subscribersGained",
    "subscribersLost",
    "estimatedRevenue",
    "estimatedAdRevenue",
    "grossRevenue",
    "estimatedRedPartnerRevenue",
    "monetizedPlaybacks",
    "playbackBasedCpm",
    "adImpressions",
    "cpm",
];

/// First day YouTube existed; no report can start before it
pub const EARLIEST_DATE: &str = "2005-02-14";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Settings shared by every stage of a run. Built once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the client secret and the written reports
    pub data_dir: PathBuf,
    /// Path to the OAuth client secret descriptor
    pub secret_file: PathBuf,
    /// OAuth scopes requested on consent
    pub scopes: Vec<String>,
    /// Metrics a report may request
    pub metrics: Vec<String>,
    /// Lowest accepted start or end date
    pub earliest_date: NaiveDate,
    /// Analytics API base URL
    pub api_address: String,
    /// Permit plain-HTTP token endpoints
    pub allow_insecure_transport: bool,
}

impl AppConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|dir| !dir.is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        let api_address = lookup(API_ADDRESS_VAR)
            .filter(|address| !address.is_empty())
            .unwrap_or_else(|| yt_analytics_client::DEFAULT_API_ADDRESS.to_string());
        let allow_insecure_transport =
            lookup(INSECURE_TRANSPORT_VAR).is_some_and(|value| !value.is_empty() && value != "0");

        Self {
            secret_file: Path::new(&data_dir).join(SECRET_FILE_NAME),
            data_dir: PathBuf::from(data_dir),
            scopes: SCOPES.iter().map(|scope| scope.to_string()).collect(),
            metrics: METRICS.iter().map(|metric| metric.to_string()).collect(),
            earliest_date: earliest_date(),
            api_address,
            allow_insecure_transport,
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self.secret_file = self.data_dir.join(SECRET_FILE_NAME);
        self
    }

    pub fn with_api_address(mut self, api_address: impl Into<String>) -> Self {
        self.api_address = api_address.into();
        self
    }

    pub fn is_allowed_metric(&self, metric: &str) -> bool {
        self.metrics.iter().any(|allowed| allowed == metric)
    }

    /// All allowed metrics joined the way the CLI accepts them
    pub fn all_metrics(&self) -> String {
        self.metrics.join(",")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn earliest_date() -> NaiveDate {
    NaiveDate::parse_from_str(EARLIEST_DATE, DATE_FORMAT).expect("EARLIEST_DATE is a valid date")
}
