//! CSV debug export
//!
//! Writes an enriched table to disk, one row per record and one column per
//! field, in first-seen column order. An empty table still produces a file
//! with a single placeholder column so a failed fetch leaves a visible
//! artifact rather than nothing.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use axon_core::Table;

/// Header written when the table has no rows at all.
const PLACEHOLDER_COLUMN: &str = "info";

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Write a table to `path` as CSV.
pub fn write_csv(path: &Path, table: &Table) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export directory {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut columns: Vec<String> = Vec::new();
    for record in table {
        for key in record.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    if columns.is_empty() {
        columns.push(PLACEHOLDER_COLUMN.to_string());
    }

    writer.write_record(&columns)?;
    for record in table {
        let row: Vec<String> = columns
            .iter()
            .map(|column| record.get(column).map(cell_text).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axon_core::Record;
    use serde_json::json;

    fn rec(value: Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_write_rows_and_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boards.csv");
        let table = vec![
            rec(json!({"uuid": "a", "model": "Router X", "usage_percent": 33.33})),
            rec(json!({"uuid": "b", "model": null})),
        ];

        write_csv(&path, &table).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "uuid,model,usage_percent");
        assert_eq!(lines[1], "a,Router X,33.33");
        // Null and missing cells render empty
        assert_eq!(lines[2], "b,,");
    }

    #[test]
    fn test_empty_table_still_writes_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_csv(&path, &Vec::new()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "info");
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deep/out.csv");
        write_csv(&path, &Vec::new()).unwrap();
        assert!(path.exists());
    }
}
