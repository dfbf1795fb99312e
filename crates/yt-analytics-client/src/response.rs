use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ClientError;

/// One column of a report table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    /// Column name, e.g. `day` or `views`
    pub name: String,
    /// "DIMENSION" or "METRIC"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_type: Option<String>,
    /// "STRING", "INTEGER", "FLOAT", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

/// Result of a report query.
///
/// The typed table view is checked on construction: every row carries
/// exactly one value per column header. The raw document is kept as
/// received so it can be written back out unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportResponse {
    /// Columns in value order
    pub column_headers: Vec<ColumnHeader>,
    /// One entry per row, one value per column
    pub rows: Vec<Vec<Value>>,
    raw: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Table {
    #[serde(default)]
    column_headers: Vec<ColumnHeader>,
    // The API omits `rows` entirely when the range has no data
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

impl ReportResponse {
    pub fn from_value(raw: Value) -> Result<Self, ClientError> {
        let table = Table::deserialize(&raw)?;

        for (index, row) in table.rows.iter().enumerate() {
            if row.len() != table.column_headers.len() {
                return Err(ClientError::MalformedResponse(format!(
                    "row {} has {} values but there are {} column headers",
                    index,
                    row.len(),
                    table.column_headers.len()
                )));
            }
        }

        Ok(Self {
            column_headers: table.column_headers,
            rows: table.rows,
            raw,
        })
    }

    /// Column names in value order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.column_headers.iter().map(|header| header.name.as_str())
    }

    /// The response document exactly as the API returned it
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_table_and_keeps_raw_key_order() {
        let raw = json!({
            "kind": "youtubeAnalytics#resultTable",
            "columnHeaders": [
                {"name": "day", "columnType": "DIMENSION", "dataType": "STRING"},
                {"name": "views", "columnType": "METRIC", "dataType": "INTEGER"}
            ],
            "rows": [["2020-01-01", 10], ["2020-01-02", 20]]
        });

        let response = ReportResponse::from_value(raw.clone()).unwrap();

        assert_eq!(response.column_names().collect::<Vec<_>>(), ["day", "views"]);
        assert_eq!(response.rows[1], vec![json!("2020-01-02"), json!(20)]);
        let keys: Vec<&String> = response.raw().as_object().unwrap().keys().collect();
        assert_eq!(keys, ["kind", "columnHeaders", "rows"]);
        assert_eq!(response.raw(), &raw);
    }

    #[test]
    fn missing_rows_means_empty_table() {
        let response = ReportResponse::from_value(json!({
            "columnHeaders": [{"name": "day"}, {"name": "views"}]
        }))
        .unwrap();

        assert!(response.rows.is_empty());
        assert_eq!(response.column_headers.len(), 2);
    }

    #[test]
    fn rejects_row_with_wrong_width() {
        let err = ReportResponse::from_value(json!({
            "columnHeaders": [{"name": "day"}, {"name": "views"}],
            "rows": [["2020-01-01", 10], ["2020-01-02"]]
        }))
        .unwrap_err();

        match err {
            ClientError::MalformedResponse(message) => {
                assert_eq!(message, "row 1 has 1 values but there are 2 column headers")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
