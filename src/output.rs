use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use yt_analytics_client::ReportResponse;

use crate::args::{OutputFormat, OutputTarget};
use crate::error::ReportError;

/// Write the report to its target, replacing any existing file
pub fn write_report(report: &ReportResponse, target: &OutputTarget) -> Result<(), ReportError> {
    if let Some(parent) = target.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match target.format {
        OutputFormat::Json => write_json(report, &target.path)?,
        OutputFormat::Csv => write_csv(report, &target.path)?,
    }

    tracing::debug!(path = %target.path.display(), "report written");
    Ok(())
}

/// The response document as received, indented by four spaces
pub fn write_json(report: &ReportResponse, path: &Path) -> Result<(), ReportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut writer, formatter);
    report.raw().serialize(&mut serializer)?;
    writer.flush()?;
    Ok(())
}

/// One line per row, preceded by a 0-based index column with an empty header
pub fn write_csv(report: &ReportResponse, path: &Path) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec![String::new()];
    header.extend(report.column_names().map(str::to_string));
    writer.write_record(&header)?;

    for (index, row) in report.rows.iter().enumerate() {
        let mut record = vec![index.to_string()];
        record.extend(row.iter().map(cell_text));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}
