//! Fetch a YouTube Analytics daily report for the authenticated channel and
//! save it as JSON or CSV.
//!
//! A run is strictly linear: validate the arguments, authenticate, query
//! once, write the file. Any failure ends the run; nothing is retried.

pub mod args;
pub mod auth;
pub mod config;
pub mod error;
pub mod output;
pub mod report;

use chrono::NaiveDate;
use yt_oauth::ClientSecret;

pub use args::{OutputFormat, OutputTarget, ReportArgs, validate};
pub use auth::{AuthFlow, CredentialProvider, InteractiveProvider};
pub use config::AppConfig;
pub use error::ReportError;
pub use report::{ReportRequest, fetch_report};

/// Validate, authenticate, fetch and persist one report.
///
/// Argument errors are returned before the secret file is read or any
/// request is made.
pub async fn run<P>(
    config: &AppConfig,
    args: &ReportArgs,
    today: NaiveDate,
    provider: &P,
) -> Result<OutputTarget, ReportError>
where
    P: CredentialProvider + ?Sized,
{
    let (request, target) = validate(args, config, today)?;
    tracing::debug!(?request, ?target, "arguments validated");

    let secret = ClientSecret::load(&config.secret_file)?;
    let client = provider.authenticate(&secret, &config.scopes).await?;

    let report = fetch_report(&client, &request).await?;
    output::write_report(&report, &target)?;

    Ok(target)
}
