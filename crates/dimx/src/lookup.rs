//! 🔎 Namespace lookup over the project inventory export.
//!
//! The inventory is a `;`-delimited CSV (usually saved by a spreadsheet, so it may
//! start with a BOM). Values arrive wrapped in `[`/`]` now and then. We clean both
//! up, keep the rows whose `appName` is the project and whose namespace columns
//! mention the namespace, and hand them back as pretty JSON. No match prints
//! `No_Data`, which is what the deployment scripts downstream grep for.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// 📎 Where the inventory export lives unless told otherwise.
pub const DEFAULT_INVENTORY_CSV: &str = "ProjectsJenkinsCardifCSV.csv";

/// 🏷️ Printed when nothing matched.
pub const NO_DATA: &str = "No_Data";

/// 🧭 Columns that may hold a namespace. Missing ones are ignored.
pub const NAMESPACE_COLUMNS: [&str; 4] = ["NameSpaceDev", "NameSpaceUat", "NameSpacePrd", "NameSpaceDrs"];

/// 📂 Read the inventory from disk and run [`lookup`] over it.
pub async fn lookup_file(csv_path: &Path, project: &str, namespace: &str) -> Result<String> {
    let text = tokio::fs::read_to_string(csv_path).await.with_context(|| {
        format!(
            "💀 The inventory CSV '{}' could not be read",
            csv_path.display()
        )
    })?;
    lookup(&text, project, namespace)
}

/// 🔍 Matching rows as a 4-space-indented JSON array, or [`NO_DATA`].
pub fn lookup(csv_text: &str, project: &str, namespace: &str) -> Result<String> {
    let csv_text = csv_text.strip_prefix('\u{feff}').unwrap_or(csv_text);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("💀 The inventory CSV has no readable header row")?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let mut matches = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("💀 Inventory row {} is unreadable", line + 1))?;
        let mut row = Map::new();
        for (position, header) in headers.iter().enumerate() {
            // -- short rows pad with empty cells, long rows lose their extras
            let value = record.get(position).unwrap_or("");
            row.insert(header.clone(), Value::String(strip_brackets(value).to_string()));
        }
        if row_matches(&row, project, namespace) {
            matches.push(Value::Object(row));
        }
    }

    if matches.is_empty() {
        return Ok(NO_DATA.to_string());
    }
    to_pretty_json(&matches)
}

fn strip_brackets(value: &str) -> &str {
    value.trim_matches(|c| c == '[' || c == ']')
}

fn row_matches(row: &Map<String, Value>, project: &str, namespace: &str) -> bool {
    let cell = |column: &str| row.get(column).and_then(Value::as_str);
    cell("appName") == Some(project)
        && NAMESPACE_COLUMNS
            .iter()
            .any(|column| cell(column) == Some(namespace))
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .context("💀 Matching rows refused to become JSON")?;
    String::from_utf8(buffer).context("💀 serde_json produced something that is not UTF-8")
}
