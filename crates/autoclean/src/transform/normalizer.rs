//! Coerces resolved columns to their target types.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::DataTable;
use crate::schema::{CanonicalRole, ResolvedSchema, Value};

/// Currency symbols and thousands separators removed from prices.
static PRICE_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[$,]").expect("valid regex"));

/// Values per column that failed coercion and became the missing marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizationReport {
    pub degraded: IndexMap<String, usize>,
}

impl NormalizationReport {
    /// Total degraded values across all columns.
    pub fn total_degraded(&self) -> usize {
        self.degraded.values().sum()
    }
}

/// Converts textual values in canonical columns to clean numbers or trimmed strings.
///
/// Parse failures never raise: they degrade to `Value::Null` and are left for
/// the validity filter to drop.
pub struct ValueNormalizer;

impl ValueNormalizer {
    /// Create a new normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Normalize every resolved column of the table in place.
    pub fn normalize(&self, table: &mut DataTable, schema: &ResolvedSchema) -> NormalizationReport {
        let mut report = NormalizationReport::default();

        for (role, resolved) in &schema.roles {
            let Some(index) = table.column_index(&resolved.column) else {
                continue;
            };

            let mut degraded = 0;
            match role {
                CanonicalRole::Price => table.map_column(index, |v| {
                    let out = coerce_price(&v);
                    degraded += usize::from(!v.is_null() && out.is_null());
                    out
                }),
                CanonicalRole::Year | CanonicalRole::Mileage => table.map_column(index, |v| {
                    let out = coerce_number(&v);
                    degraded += usize::from(!v.is_null() && out.is_null());
                    out
                }),
                _ => table.map_column(index, trim_text),
            }

            if degraded > 0 {
                debug!(column = %resolved.column, degraded, "values degraded to missing");
                report.degraded.insert(resolved.column.clone(), degraded);
            }
        }

        report
    }
}

impl Default for ValueNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a number, rejecting NaN and infinities.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Strip `$` and `,`, trim, then parse.
pub fn coerce_price(value: &Value) -> Value {
    match value {
        Value::Text(s) => {
            let cleaned = PRICE_NOISE.replace_all(s, "");
            parse_number(&cleaned).map_or(Value::Null, Value::Number)
        }
        other => coerce_number(other),
    }
}

/// Parse text as a number; numbers pass through, anything else is missing.
pub fn coerce_number(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_finite() => Value::Number(*n),
        Value::Text(s) => parse_number(s).map_or(Value::Null, Value::Number),
        _ => Value::Null,
    }
}

/// Trim text, rendering numbers as strings first. Nulls stay null.
pub fn trim_text(value: Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Text(s) => {
            let trimmed = s.trim();
            if trimmed.len() == s.len() {
                Value::Text(s)
            } else {
                Value::Text(trimmed.to_string())
            }
        }
        number => Value::Text(number.to_string()),
    }
}
