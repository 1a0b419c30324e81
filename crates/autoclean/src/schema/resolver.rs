//! Resolves arbitrary source column names to canonical roles.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::aliases::{AliasTable, NameSynthesis};
use super::types::{CanonicalRole, Value};
use crate::error::{CleanError, Result};
use crate::input::DataTable;

/// Where a resolved column came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnOrigin {
    /// An existing source column, possibly renamed.
    Direct { source: String },
    /// Built by concatenating other columns.
    Synthesized { parts: Vec<String> },
}

/// A role bound to a column of the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedColumn {
    /// Current column name in the table.
    pub column: String,
    pub origin: ColumnOrigin,
}

/// Mapping from canonical roles to the columns that carry them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSchema {
    pub roles: IndexMap<CanonicalRole, ResolvedColumn>,
}

impl ResolvedSchema {
    /// Column name carrying a role, if the role was resolved.
    pub fn column(&self, role: CanonicalRole) -> Option<&str> {
        self.roles.get(&role).map(|r| r.column.as_str())
    }

    /// Returns true if the role was resolved.
    pub fn has(&self, role: CanonicalRole) -> bool {
        self.roles.contains_key(&role)
    }

    /// Name column(s) used as the leading sort key.
    pub fn name_columns(&self) -> Vec<&str> {
        self.column(CanonicalRole::Name).into_iter().collect()
    }
}

/// Maps input columns onto canonical roles using an alias table.
pub struct SchemaResolver {
    aliases: AliasTable,
}

impl SchemaResolver {
    /// Create a resolver with the default alias table.
    pub fn new() -> Self {
        Self::with_aliases(AliasTable::default())
    }

    /// Create a resolver with a custom alias table.
    pub fn with_aliases(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    /// Resolve roles against the table, renaming and synthesizing columns in place.
    ///
    /// Fails with [`CleanError::MissingColumn`] before touching the table if
    /// price or year cannot be resolved.
    pub fn resolve(&self, table: &mut DataTable) -> Result<ResolvedSchema> {
        let plan = self.plan(table)?;
        self.apply(table, plan)
    }

    /// Work out which source column serves each role, without mutating.
    fn plan(&self, table: &DataTable) -> Result<Vec<(CanonicalRole, PlannedColumn)>> {
        let mut plan: Vec<(CanonicalRole, PlannedColumn)> = Vec::new();

        for role in CanonicalRole::ALL {
            let taken = |column: &str| {
                plan.iter()
                    .any(|(_, p)| matches!(p, PlannedColumn::Existing(c) if c == column))
            };

            if let Some(source) = self.aliases.first_match(role, table, taken) {
                debug!(role = %role, source, "resolved column");
                plan.push((role, PlannedColumn::Existing(source.to_string())));
                continue;
            }

            if role == CanonicalRole::Name {
                if let Some(synthesis) = self
                    .aliases
                    .name_synthesis
                    .as_ref()
                    .filter(|s| s.is_available(table))
                {
                    debug!(parts = ?synthesis.parts, column = %synthesis.column, "synthesizing name column");
                    plan.push((role, PlannedColumn::Synthesized(synthesis.clone())));
                }
            }
        }

        for role in [CanonicalRole::Price, CanonicalRole::Year] {
            if !plan.iter().any(|(r, _)| *r == role) {
                return Err(CleanError::MissingColumn { role });
            }
        }

        Ok(plan)
    }

    fn apply(
        &self,
        table: &mut DataTable,
        plan: Vec<(CanonicalRole, PlannedColumn)>,
    ) -> Result<ResolvedSchema> {
        let claimed: Vec<String> = plan
            .iter()
            .filter_map(|(_, p)| match p {
                PlannedColumn::Existing(c) => Some(c.clone()),
                PlannedColumn::Synthesized(_) => None,
            })
            .collect();

        let mut schema = ResolvedSchema::default();

        for (role, planned) in plan {
            let resolved = match planned {
                PlannedColumn::Existing(source) => {
                    let column = if role.renames_column() {
                        let target = role.canonical_name();
                        if source != target {
                            make_room(table, target, &claimed)?;
                            table.rename_column(&source, target);
                        }
                        target.to_string()
                    } else {
                        source.clone()
                    };
                    ResolvedColumn {
                        column,
                        origin: ColumnOrigin::Direct { source },
                    }
                }
                PlannedColumn::Synthesized(synthesis) => {
                    make_room(table, &synthesis.column, &claimed)?;
                    let values = synthesize(table, &synthesis);
                    table.push_column(synthesis.column.clone(), values);
                    ResolvedColumn {
                        column: synthesis.column,
                        origin: ColumnOrigin::Synthesized {
                            parts: synthesis.parts,
                        },
                    }
                }
            };
            schema.roles.insert(role, resolved);
        }

        Ok(schema)
    }
}

impl Default for SchemaResolver {
    fn default() -> Self {
        Self::new()
    }
}

enum PlannedColumn {
    Existing(String),
    Synthesized(NameSynthesis),
}

/// Drop an unclaimed column that would collide with `target`.
///
/// A column already named `target` that no role claimed is a lower-priority
/// alias (e.g. `price` when `selling_price` won); keeping both would leave
/// two columns with the same canonical name.
fn make_room(table: &mut DataTable, target: &str, claimed: &[String]) -> Result<()> {
    if !table.has_column(target) {
        return Ok(());
    }
    if claimed.iter().any(|c| c == target) {
        return Err(CleanError::Config(format!(
            "column '{}' is claimed by one role and is the canonical name of another",
            target
        )));
    }
    warn!(column = target, "dropping shadowed column");
    table.remove_column(target);
    Ok(())
}

/// Concatenate the part columns of each row. Missing parts are skipped; a
/// row with no parts at all gets a null name.
fn synthesize(table: &DataTable, synthesis: &NameSynthesis) -> Vec<Value> {
    let indices: Vec<usize> = synthesis
        .parts
        .iter()
        .filter_map(|p| table.column_index(p))
        .collect();

    table
        .rows
        .iter()
        .map(|row| {
            let parts: Vec<String> = indices.iter().filter_map(|&i| row[i].render()).collect();
            if parts.is_empty() {
                Value::Null
            } else {
                Value::Text(parts.join(&synthesis.separator))
            }
        })
        .collect()
}
