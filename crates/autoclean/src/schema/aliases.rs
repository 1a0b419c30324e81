//! Priority-ordered alias lists mapping source column names to roles.

use serde::{Deserialize, Serialize};

use super::types::CanonicalRole;
use crate::input::DataTable;

/// Candidate source column names for one role, highest priority first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub role: CanonicalRole,
    pub candidates: Vec<String>,
}

/// How to build a name column when no direct name column exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameSynthesis {
    /// Columns concatenated in order (all must exist).
    pub parts: Vec<String>,
    /// Separator placed between parts.
    pub separator: String,
    /// Name of the synthesized column.
    pub column: String,
}

impl Default for NameSynthesis {
    fn default() -> Self {
        Self {
            parts: vec!["brand".to_string(), "model".to_string()],
            separator: " ".to_string(),
            column: "vehicle_name".to_string(),
        }
    }
}

impl NameSynthesis {
    /// Returns true if every part column exists in the table.
    pub fn is_available(&self, table: &DataTable) -> bool {
        !self.parts.is_empty() && self.parts.iter().all(|p| table.has_column(p))
    }
}

/// Static mapping from canonical role to its alias list.
///
/// Lookup is first-match-wins: the order of `candidates` is a priority list,
/// not a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasTable {
    pub entries: Vec<AliasEntry>,
    pub name_synthesis: Option<NameSynthesis>,
}

impl Default for AliasTable {
    fn default() -> Self {
        let entry = |role, candidates: &[&str]| AliasEntry {
            role,
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
        };

        Self {
            entries: vec![
                entry(CanonicalRole::Price, &["selling_price", "price", "Cars Prices"]),
                entry(CanonicalRole::Mileage, &["km_driven", "mileage"]),
                // Year has no aliases: only the exact name is accepted.
                entry(CanonicalRole::Year, &["year"]),
                entry(CanonicalRole::Name, &["name", "Cars Names"]),
                entry(CanonicalRole::Fuel, &["fuel", "Fuel Types"]),
                entry(CanonicalRole::Transmission, &["transmission"]),
                entry(CanonicalRole::SellerType, &["seller_type"]),
                entry(CanonicalRole::Owner, &["owner"]),
            ],
            name_synthesis: Some(NameSynthesis::default()),
        }
    }
}

impl AliasTable {
    /// Candidates for a role, in priority order. Empty if the role has no entry.
    pub fn candidates(&self, role: CanonicalRole) -> &[String] {
        self.entries
            .iter()
            .find(|e| e.role == role)
            .map(|e| e.candidates.as_slice())
            .unwrap_or(&[])
    }

    /// First candidate for `role` present in the table, skipping any column
    /// for which `taken` returns true.
    pub fn first_match<'a>(
        &'a self,
        role: CanonicalRole,
        table: &DataTable,
        taken: impl Fn(&str) -> bool,
    ) -> Option<&'a str> {
        self.candidates(role)
            .iter()
            .map(String::as_str)
            .find(|c| table.has_column(c) && !taken(c))
    }
}
