//! Encoders turning a cleaned table into an output artifact.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::error::{CleanError, Result};
use crate::input::DataTable;
use crate::schema::Value;

/// Serializes a table to bytes in some output format.
pub trait TableEncoder: Send + Sync {
    /// Short format name (e.g. "csv").
    fn format(&self) -> &str;

    /// File extension for artifacts in this format, without the dot.
    fn extension(&self) -> &str;

    /// Encode the whole table.
    fn encode(&self, table: &DataTable) -> Result<Vec<u8>>;
}

/// CSV/TSV encoder. Nulls are written as empty cells.
pub struct DelimitedEncoder {
    delimiter: u8,
}

impl DelimitedEncoder {
    /// Comma-separated output.
    pub fn csv() -> Self {
        Self { delimiter: b',' }
    }

    /// Tab-separated output.
    pub fn tsv() -> Self {
        Self { delimiter: b'\t' }
    }
}

impl TableEncoder for DelimitedEncoder {
    fn format(&self) -> &str {
        if self.delimiter == b'\t' { "tsv" } else { "csv" }
    }

    fn extension(&self) -> &str {
        self.format()
    }

    fn encode(&self, table: &DataTable) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row.iter().map(|v| v.render().unwrap_or_default()))?;
        }

        writer
            .into_inner()
            .map_err(|e| CleanError::Encode(format!("Failed to flush delimited output: {}", e)))
    }
}

/// JSON encoder: an array of objects, keys in column order.
pub struct JsonEncoder {
    pretty: bool,
}

impl JsonEncoder {
    /// Create a JSON encoder.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TableEncoder for JsonEncoder {
    fn format(&self) -> &str {
        "json"
    }

    fn extension(&self) -> &str {
        "json"
    }

    fn encode(&self, table: &DataTable) -> Result<Vec<u8>> {
        let records = records(table, table.row_count());
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&records)?
        } else {
            serde_json::to_vec(&records)?
        };
        Ok(bytes)
    }
}

/// The first `limit` rows as ordered JSON objects.
pub fn records(table: &DataTable, limit: usize) -> Vec<IndexMap<&str, JsonValue>> {
    table
        .rows
        .iter()
        .take(limit)
        .map(|row| {
            table
                .headers
                .iter()
                .zip(row)
                .map(|(h, v)| (h.as_str(), to_json(v)))
                .collect()
        })
        .collect()
}

fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Number(n) if value.is_integral() && n.abs() < 9.0e15 => JsonValue::from(*n as i64),
        Value::Number(n) => JsonValue::from(*n),
        Value::Text(s) => JsonValue::from(s.as_str()),
    }
}
