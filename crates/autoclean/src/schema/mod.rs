//! Canonical roles, alias lists and column resolution.

mod aliases;
mod resolver;
mod types;

pub use aliases::{AliasEntry, AliasTable, NameSynthesis};
pub use resolver::{ColumnOrigin, ResolvedColumn, ResolvedSchema, SchemaResolver};
pub use types::{CanonicalRole, Value};
