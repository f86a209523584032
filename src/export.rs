//! Download exports of filtered lists.

use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

/// A row of a delimited export.
pub trait ExportRow {
    fn columns() -> &'static [&'static str];
    fn values(&self) -> Vec<String>;
}

/// Rendered export, ready to hand to a save dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub file_name: String,
    pub mime_type: String,
    pub content: String,
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Header line plus one line per row, every cell quoted.
pub fn to_csv<R: ExportRow>(rows: &[R]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(R::columns().join(","));
    for row in rows {
        let cells: Vec<String> = row.values().iter().map(|v| quote(v)).collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

pub fn to_json<T: Serialize>(rows: &[T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// `audit-logs-2025-01-15.csv`
pub fn export_file_name(prefix: &str, format: ExportFormat, today: NaiveDate) -> String {
    format!("{}-{}.{}", prefix, today.format("%Y-%m-%d"), format.extension())
}

pub fn export<R>(prefix: &str, rows: &[R], format: ExportFormat, today: NaiveDate) -> Result<ExportFile>
where
    R: ExportRow + Serialize,
{
    let content = match format {
        ExportFormat::Csv => to_csv(rows),
        ExportFormat::Json => to_json(rows)?,
    };
    Ok(ExportFile {
        file_name: export_file_name(prefix, format, today),
        mime_type: format.mime_type().to_string(),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Line {
        name: &'static str,
        note: &'static str,
    }

    impl ExportRow for Line {
        fn columns() -> &'static [&'static str] {
            &["Name", "Note"]
        }

        fn values(&self) -> Vec<String> {
            vec![self.name.to_string(), self.note.to_string()]
        }
    }

    #[test]
    fn csv_quotes_every_cell_and_escapes_quotes() {
        let rows = [
            Line { name: "Pizza", note: "large, \"extra\" cheese" },
            Line { name: "Tea", note: "" },
        ];
        let csv = to_csv(&rows);
        assert_eq!(
            csv,
            "Name,Note\n\"Pizza\",\"large, \"\"extra\"\" cheese\"\n\"Tea\",\"\""
        );
    }

    #[test]
    fn empty_export_is_just_the_header() {
        let rows: [Line; 0] = [];
        assert_eq!(to_csv(&rows), "Name,Note");
    }

    #[test]
    fn file_name_carries_date_and_extension() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(
            export_file_name("audit-logs", ExportFormat::Csv, day),
            "audit-logs-2025-01-15.csv"
        );
    }

    #[test]
    fn json_export_is_an_array() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let file = export("lines", &[Line { name: "Tea", note: "hot" }], ExportFormat::Json, day)
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&file.content).unwrap();
        assert_eq!(parsed[0]["name"], "Tea");
        assert_eq!(file.mime_type, "application/json");
    }
}
