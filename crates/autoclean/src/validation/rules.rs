//! Value bounds and categorical sets enforced by the filter chain.

use serde::{Deserialize, Serialize};

/// Fuel types accepted by default (exact, case-sensitive).
pub const DEFAULT_FUELS: [&str; 8] = [
    "Petrol",
    "Diesel",
    "CNG",
    "LPG",
    "plug in hybrid",
    "Hybrid",
    "Electric",
    "Petrol/Hybrid",
];

/// Transmissions accepted by default.
pub const DEFAULT_TRANSMISSIONS: [&str; 2] = ["Manual", "Automatic"];

/// Thresholds and allowed sets for validity filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Earliest accepted model year (inclusive).
    pub min_year: f64,
    /// Latest accepted model year (inclusive).
    pub max_year: f64,
    pub allowed_fuels: Vec<String>,
    pub allowed_transmissions: Vec<String>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_year: 1900.0,
            max_year: 2030.0,
            allowed_fuels: DEFAULT_FUELS.iter().map(|s| s.to_string()).collect(),
            allowed_transmissions: DEFAULT_TRANSMISSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ValidationRules {
    /// Returns true if the year lies within the inclusive bounds.
    pub fn year_in_range(&self, year: f64) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }
}
