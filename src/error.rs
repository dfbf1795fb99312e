use thiserror::Error;
use yt_analytics_client::ClientError;
use yt_oauth::OAuthError;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Authentication failed: {0}")]
    Authentication(#[from] OAuthError),

    #[error(transparent)]
    Api(#[from] ClientError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ReportError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            ReportError::InvalidArgument(_) => 2,
            ReportError::Authentication(_) => 4,
            _ => 1,
        }
    }
}
