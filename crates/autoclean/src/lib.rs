//! Autoclean: schema-normalizing cleaning pipeline for tabular vehicle listings.
//!
//! Source files name their columns differently (`selling_price`, `Cars Prices`,
//! `km_driven`, ...). Autoclean reconciles them to a canonical schema, drops
//! invalid and duplicate rows, and emits a deterministically ordered table.
//!
//! # Stages
//!
//! 1. **Schema resolution**: map source columns to canonical roles via
//!    priority-ordered alias lists; price and year are mandatory.
//! 2. **Normalization**: coerce numbers (stripping `$` and `,` from prices)
//!    and trim text. Failed coercions become missing values.
//! 3. **Filtering**: duplicates, missing critical fields, numeric ranges and
//!    categorical membership, each stage reporting its surviving row count.
//! 4. **Sorting**: ascending by name then year, stable.
//!
//! # Example
//!
//! ```no_run
//! use autoclean::Cleaner;
//!
//! let cleaner = Cleaner::new();
//! let outcome = cleaner.clean_file("bronze/car_details.csv").unwrap();
//!
//! println!("Rows kept: {} of {}", outcome.output_rows(), outcome.input_rows);
//! for stage in &outcome.filters.stages {
//!     println!("  {:24} {}", stage.stage, stage.rows_after);
//! }
//! ```

pub mod error;
pub mod export;
pub mod input;
pub mod job;
pub mod schema;
pub mod stats;
pub mod transform;
pub mod validation;

mod cleaner;

pub use crate::cleaner::{CleanOutcome, Cleaner, CleanerConfig};
pub use error::{CleanError, Result};
pub use export::{DelimitedEncoder, JsonEncoder, TableEncoder};
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata};
pub use job::{CleaningJob, JobResult, JobStatus, KeyLayout};
pub use schema::{AliasTable, CanonicalRole, ResolvedSchema, SchemaResolver, Value};
pub use stats::{owner_mileage_stats, OwnerStat};
pub use transform::{CanonicalSorter, NormalizationReport, ValueNormalizer};
pub use validation::{FilterChain, FilterReport, StageCount, ValidationRules};
