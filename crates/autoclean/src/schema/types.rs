//! Core type definitions for cell values and canonical roles.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A single cell in a table.
///
/// `Null` doubles as the missing marker produced by failed coercions, so a
/// legitimate zero is never confused with absent data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    /// Create a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Returns true if this is the missing marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric content, if this value is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text content, if this value is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value as a string. Nulls have no rendering.
    ///
    /// Integral numbers render without a fractional part (`2015`, not `2015.0`).
    pub fn render(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Number(n) => Some(format!("{}", n)),
            Value::Text(s) => Some(s.clone()),
        }
    }

    /// Returns true if the value is a finite number with no fractional part.
    pub fn is_integral(&self) -> bool {
        match self {
            Value::Number(n) => n.is_finite() && n.fract() == 0.0,
            _ => false,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Number(_) => 0,
            Value::Text(_) => 1,
            Value::Null => 2,
        }
    }
}

/// Fold negative zero into positive zero so equality, hashing and ordering agree.
fn canonical(n: f64) -> f64 {
    if n == 0.0 { 0.0 } else { n }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => canonical(*a).to_bits() == canonical(*b).to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Null => {}
            Value::Number(n) => canonical(*n).to_bits().hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl Ord for Value {
    /// Numbers compare numerically, text lexicographically, and nulls sort last.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => canonical(*a).total_cmp(&canonical(*b)),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Some(s) => f.write_str(&s),
            None => f.write_str(""),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// A logical field the pipeline understands regardless of source naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalRole {
    /// Listing price (numeric, required).
    Price,
    /// Model year (numeric, required).
    Year,
    /// Distance driven (numeric, optional).
    Mileage,
    /// Vehicle name (text, optional, synthesizable).
    Name,
    /// Fuel type (categorical).
    Fuel,
    /// Gearbox type (categorical).
    Transmission,
    /// Dealer or individual.
    SellerType,
    /// Ownership history.
    Owner,
}

impl CanonicalRole {
    /// Every role, in resolution order.
    pub const ALL: [CanonicalRole; 8] = [
        CanonicalRole::Price,
        CanonicalRole::Mileage,
        CanonicalRole::Year,
        CanonicalRole::Name,
        CanonicalRole::Fuel,
        CanonicalRole::Transmission,
        CanonicalRole::SellerType,
        CanonicalRole::Owner,
    ];

    /// The column name this role carries in cleaned output.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            CanonicalRole::Price => "price",
            CanonicalRole::Year => "year",
            CanonicalRole::Mileage => "mileage",
            CanonicalRole::Name => "name",
            CanonicalRole::Fuel => "fuel",
            CanonicalRole::Transmission => "transmission",
            CanonicalRole::SellerType => "seller_type",
            CanonicalRole::Owner => "owner",
        }
    }

    /// Roles whose absence halts the pipeline.
    pub fn is_mandatory(&self) -> bool {
        matches!(self, CanonicalRole::Price | CanonicalRole::Year)
    }

    /// Roles coerced to numbers by the normalizer.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            CanonicalRole::Price | CanonicalRole::Year | CanonicalRole::Mileage
        )
    }

    /// Roles whose resolved column is renamed to the canonical name.
    pub fn renames_column(&self) -> bool {
        self.is_numeric()
    }
}

impl fmt::Display for CanonicalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}
