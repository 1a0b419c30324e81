//! Deterministic row ordering for reproducible output.

use std::cmp::Ordering;

use crate::input::DataTable;
use crate::schema::{CanonicalRole, ResolvedSchema};

/// Sorts rows ascending by name column(s) then year.
pub struct CanonicalSorter;

impl CanonicalSorter {
    /// Create a new sorter.
    pub fn new() -> Self {
        Self
    }

    /// Column names forming the sort key, in priority order.
    pub fn sort_key<'a>(&self, schema: &'a ResolvedSchema) -> Vec<&'a str> {
        let mut key = schema.name_columns();
        key.extend(schema.column(CanonicalRole::Year));
        key
    }

    /// Sort the table in place. The sort is stable: rows with equal keys keep
    /// their relative order.
    pub fn sort(&self, table: &mut DataTable, schema: &ResolvedSchema) {
        let indices: Vec<usize> = self
            .sort_key(schema)
            .into_iter()
            .filter_map(|c| table.column_index(c))
            .collect();

        if indices.is_empty() {
            return;
        }

        table.rows.sort_by(|a, b| {
            indices
                .iter()
                .map(|&i| a[i].cmp(&b[i]))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
    }
}

impl Default for CanonicalSorter {
    fn default() -> Self {
        Self::new()
    }
}
