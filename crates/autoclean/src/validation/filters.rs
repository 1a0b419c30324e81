//! Row-elimination stages applied in a fixed, cumulative order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::rules::ValidationRules;
use crate::input::DataTable;
use crate::schema::{CanonicalRole, ResolvedSchema, Value};

/// A single row-elimination stage.
pub trait Filter: Send + Sync {
    /// Stable identifier used in reports and logs.
    fn name(&self) -> &'static str;

    /// Whether the stage's governing column exists. Stages that do not apply
    /// are skipped entirely.
    fn applies_to(&self, _schema: &ResolvedSchema) -> bool {
        true
    }

    /// Remove the rows that fail this stage.
    fn apply(&self, table: &mut DataTable, schema: &ResolvedSchema);
}

/// Surviving row count after one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCount {
    pub stage: String,
    /// False when the stage was skipped because its column was never resolved.
    pub applied: bool,
    pub rows_before: usize,
    pub rows_after: usize,
}

impl StageCount {
    /// Rows removed by this stage.
    pub fn dropped(&self) -> usize {
        self.rows_before - self.rows_after
    }
}

/// Per-stage checkpoints of a filter run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    pub input_rows: usize,
    pub output_rows: usize,
    pub stages: Vec<StageCount>,
}

impl FilterReport {
    /// Rows surviving the named stage, if it ran.
    pub fn rows_after(&self, stage: &str) -> Option<usize> {
        self.stages
            .iter()
            .find(|s| s.stage == stage && s.applied)
            .map(|s| s.rows_after)
    }

    /// Stages that actually ran.
    pub fn applied(&self) -> impl Iterator<Item = &StageCount> {
        self.stages.iter().filter(|s| s.applied)
    }
}

/// Ordered sequence of filters.
pub struct FilterChain {
    stages: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// The six standard stages, in order.
    pub fn default_chain(rules: &ValidationRules) -> Self {
        Self::new()
            .with(DuplicateFilter)
            .with(MissingCriticalFilter)
            .with(UnparseableFilter)
            .with(RangeFilter::new(rules.clone()))
            .with(MembershipFilter::new(
                "fuel_membership",
                CanonicalRole::Fuel,
                &rules.allowed_fuels,
            ))
            .with(MembershipFilter::new(
                "transmission_membership",
                CanonicalRole::Transmission,
                &rules.allowed_transmissions,
            ))
    }

    /// Append a stage.
    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.stages.push(Box::new(filter));
        self
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage in order; each stage only sees survivors of the previous.
    pub fn apply(&self, table: &mut DataTable, schema: &ResolvedSchema) -> FilterReport {
        let input_rows = table.row_count();
        let mut stages = Vec::with_capacity(self.stages.len());

        for filter in &self.stages {
            let rows_before = table.row_count();
            let applied = filter.applies_to(schema);

            if applied {
                filter.apply(table, schema);
                info!(
                    stage = filter.name(),
                    rows = table.row_count(),
                    dropped = rows_before - table.row_count(),
                    "filter stage complete"
                );
            } else {
                debug!(stage = filter.name(), "filter skipped, column not resolved");
            }

            stages.push(StageCount {
                stage: filter.name().to_string(),
                applied,
                rows_before,
                rows_after: table.row_count(),
            });
        }

        FilterReport {
            input_rows,
            output_rows: table.row_count(),
            stages,
        }
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::default_chain(&ValidationRules::default())
    }
}

/// Removes exact full-row duplicates, keeping the first occurrence.
///
/// Equality covers every column present at this point, resolved or not.
pub struct DuplicateFilter;

impl Filter for DuplicateFilter {
    fn name(&self) -> &'static str {
        "drop_duplicates"
    }

    fn apply(&self, table: &mut DataTable, _schema: &ResolvedSchema) {
        let keep: Vec<bool> = {
            let mut seen: HashSet<&[Value]> = HashSet::with_capacity(table.row_count());
            table.rows.iter().map(|row| seen.insert(row.as_slice())).collect()
        };
        let mut keep = keep.into_iter();
        table.retain_rows(|_| keep.next().unwrap_or(false));
    }
}

/// Drops rows missing price, year, or mileage when mileage was resolved.
pub struct MissingCriticalFilter;

impl Filter for MissingCriticalFilter {
    fn name(&self) -> &'static str {
        "drop_missing_critical"
    }

    fn apply(&self, table: &mut DataTable, schema: &ResolvedSchema) {
        let critical = column_indices(
            table,
            schema,
            &[CanonicalRole::Price, CanonicalRole::Year, CanonicalRole::Mileage],
        );
        table.retain_rows(|row| critical.iter().all(|&i| !row[i].is_null()));
    }
}

/// Re-checks that price and year hold numbers.
pub struct UnparseableFilter;

impl Filter for UnparseableFilter {
    fn name(&self) -> &'static str {
        "drop_unparseable"
    }

    fn apply(&self, table: &mut DataTable, schema: &ResolvedSchema) {
        let numeric = column_indices(table, schema, &[CanonicalRole::Price, CanonicalRole::Year]);
        table.retain_rows(|row| numeric.iter().all(|&i| row[i].as_f64().is_some()));
    }
}

/// Keeps positive prices, in-range years and, when present, positive mileage.
pub struct RangeFilter {
    rules: ValidationRules,
}

impl RangeFilter {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }
}

impl Filter for RangeFilter {
    fn name(&self) -> &'static str {
        "value_ranges"
    }

    fn apply(&self, table: &mut DataTable, schema: &ResolvedSchema) {
        let price = column_indices(table, schema, &[CanonicalRole::Price]);
        let year = column_indices(table, schema, &[CanonicalRole::Year]);
        let mileage = column_indices(table, schema, &[CanonicalRole::Mileage]);

        table.retain_rows(|row| {
            let positive = |i: &usize| row[*i].as_f64().is_some_and(|v| v > 0.0);
            price.iter().all(positive)
                && year
                    .iter()
                    .all(|&i| row[i].as_f64().is_some_and(|y| self.rules.year_in_range(y)))
                && mileage.iter().all(positive)
        });
    }
}

/// Keeps rows whose trimmed categorical value is in an allowed set.
pub struct MembershipFilter {
    name: &'static str,
    role: CanonicalRole,
    allowed: HashSet<String>,
}

impl MembershipFilter {
    /// Create a membership stage for a role.
    pub fn new(name: &'static str, role: CanonicalRole, allowed: &[String]) -> Self {
        Self {
            name,
            role,
            allowed: allowed.iter().cloned().collect(),
        }
    }
}

impl Filter for MembershipFilter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn applies_to(&self, schema: &ResolvedSchema) -> bool {
        schema.has(self.role)
    }

    fn apply(&self, table: &mut DataTable, schema: &ResolvedSchema) {
        let Some(index) = schema.column(self.role).and_then(|c| table.column_index(c)) else {
            return;
        };
        table.retain_rows(|row| match &row[index] {
            Value::Text(s) => self.allowed.contains(s.trim()),
            Value::Number(n) => self.allowed.contains(&n.to_string()),
            Value::Null => false,
        });
    }
}

/// Table positions of the resolved columns for `roles`, skipping unresolved ones.
fn column_indices(table: &DataTable, schema: &ResolvedSchema, roles: &[CanonicalRole]) -> Vec<usize> {
    roles
        .iter()
        .filter_map(|&role| schema.column(role))
        .filter_map(|c| table.column_index(c))
        .collect()
}
