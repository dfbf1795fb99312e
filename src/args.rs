use chrono::{NaiveDate, NaiveDateTime};
use std::path::PathBuf;

use crate::config::{AppConfig, DATE_FORMAT};
use crate::error::ReportError;
use crate::report::ReportRequest;

/// Raw, unvalidated report arguments as typed by the user
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Report filename; the extension selects the format
    pub filename: String,
    /// Start date as typed, expected `YYYY-MM-DD`
    pub start_date: String,
    /// End date as typed, expected `YYYY-MM-DD`
    pub end_date: String,
    /// Comma-separated metric names
    pub metrics: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    /// Format implied by a filename, if it has a supported extension
    pub fn from_filename(filename: &str) -> Option<Self> {
        if filename.ends_with(".json") {
            Some(OutputFormat::Json)
        } else if filename.ends_with(".csv") {
            Some(OutputFormat::Csv)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    /// File the report is written to
    pub path: PathBuf,
    /// Serialization chosen from the filename extension
    pub format: OutputFormat,
}

/// `analytics-YYYY-MM-DD-HH-MM-SS.csv` for the given moment
pub fn default_filename(now: NaiveDateTime) -> String {
    format!("analytics-{}.csv", now.format("%Y-%m-%d-%H-%M-%S"))
}

/// Check the raw arguments and resolve them into a request and a target file.
///
/// Checks run in order and the first failure is reported: file extension,
/// date syntax, lower date bound, upper date bound (`today`), then the
/// metric vocabulary. Nothing is touched on disk or over the network.
pub fn validate(
    args: &ReportArgs,
    config: &AppConfig,
    today: NaiveDate,
) -> Result<(ReportRequest, OutputTarget), ReportError> {
    let format = OutputFormat::from_filename(&args.filename).ok_or_else(|| {
        ReportError::InvalidArgument("You can only save the report as a JSON or a CSV.".to_string())
    })?;

    let start_date = parse_date(&args.start_date, "start")?;
    let end_date = parse_date(&args.end_date, "end")?;

    if start_date < config.earliest_date || end_date < config.earliest_date {
        return Err(ReportError::InvalidArgument(format!(
            "You cannot set a date before {}.",
            config.earliest_date.format("%-d %b %Y")
        )));
    }

    if start_date > today || end_date > today {
        return Err(ReportError::InvalidArgument(
            "You cannot set a date in the future.".to_string(),
        ));
    }

    let requested: Vec<&str> = args.metrics.split(',').collect();
    let invalid: Vec<&str> = requested
        .iter()
        .copied()
        .filter(|metric| !config.is_allowed_metric(metric))
        .collect();
    if !invalid.is_empty() {
        return Err(ReportError::InvalidArgument(format!(
            "One or more invalid metrics were passed: {}.",
            invalid.join(",")
        )));
    }

    let mut metrics: Vec<String> = Vec::with_capacity(requested.len());
    for metric in requested {
        if !metrics.iter().any(|seen| seen == metric) {
            metrics.push(metric.to_string());
        }
    }

    let target = OutputTarget {
        path: config.data_dir.join(&args.filename),
        format,
    };

    Ok((ReportRequest::new(start_date, end_date, metrics), target))
}

fn parse_date(value: &str, which: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        ReportError::InvalidArgument(format!(
            "The {} date '{}' is not in YYYY-MM-DD format.",
            which, value
        ))
    })
}
