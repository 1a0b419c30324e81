//! Main Cleaner struct: runs the four stages over one in-memory table.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CleanError, Result};
use crate::input::{DataTable, Parser, ParserConfig};
use crate::job::KeyLayout;
use crate::schema::{AliasTable, ResolvedSchema, SchemaResolver};
use crate::transform::{CanonicalSorter, NormalizationReport, ValueNormalizer};
use crate::validation::{FilterChain, FilterReport, ValidationRules};

/// Configuration for a cleaning run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Alias lists used by the schema resolver.
    pub aliases: AliasTable,
    /// Bounds and allowed sets for the filter chain.
    pub rules: ValidationRules,
    /// Output key derivation for jobs.
    pub layout: KeyLayout,
}

impl CleanerConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use autoclean::CleanerConfig;
    /// let config = CleanerConfig::load("autoclean.json").unwrap();
    /// println!("Latest year: {}", config.rules.max_year);
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| CleanError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            CleanError::Config(format!("Failed to parse config '{}': {}", path.display(), e))
        })
    }
}

/// Result of cleaning one table.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    /// Rows in the table as read.
    pub input_rows: usize,
    /// The cleaned, sorted table.
    pub table: DataTable,
    /// Role-to-column mapping used for the run.
    pub schema: ResolvedSchema,
    /// Values degraded to the missing marker.
    pub normalization: NormalizationReport,
    /// Per-stage surviving row counts.
    pub filters: FilterReport,
}

impl CleanOutcome {
    /// Rows that survived every filter.
    pub fn output_rows(&self) -> usize {
        self.table.row_count()
    }

    /// True when filtering eliminated every row.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// The cleaning pipeline: resolve, normalize, filter, sort.
pub struct Cleaner {
    parser: Parser,
    resolver: SchemaResolver,
    normalizer: ValueNormalizer,
    filters: FilterChain,
    sorter: CanonicalSorter,
}

impl Cleaner {
    /// Create a cleaner with default configuration.
    pub fn new() -> Self {
        Self::with_config(CleanerConfig::default())
    }

    /// Create a cleaner with custom configuration.
    pub fn with_config(config: CleanerConfig) -> Self {
        Self {
            parser: Parser::with_config(config.parser),
            resolver: SchemaResolver::with_aliases(config.aliases),
            normalizer: ValueNormalizer::new(),
            filters: FilterChain::default_chain(&config.rules),
            sorter: CanonicalSorter::new(),
        }
    }

    /// Parse raw delimited bytes and clean them.
    pub fn clean_bytes(&self, bytes: &[u8]) -> Result<CleanOutcome> {
        let table = self.parser.parse_bytes(bytes)?;
        self.clean(table)
    }

    /// Read a delimited file and clean it.
    pub fn clean_file(&self, path: impl AsRef<Path>) -> Result<CleanOutcome> {
        let (table, source) = self.parser.parse_file(path)?;
        info!(file = %source.file, hash = %source.hash, "read source file");
        self.clean(table)
    }

    /// Run the four stages over a table. Each stage completes before the next
    /// begins.
    ///
    /// Returns [`CleanError::MissingColumn`] when price or year cannot be
    /// resolved. An outcome with zero rows is not an error.
    pub fn clean(&self, mut table: DataTable) -> Result<CleanOutcome> {
        let input_rows = table.row_count();
        if input_rows == 0 {
            return Err(CleanError::EmptyData("No data rows found".to_string()));
        }
        info!(
            rows = input_rows,
            columns = table.column_count(),
            "cleaning table"
        );

        let schema = self.resolver.resolve(&mut table)?;
        let normalization = self.normalizer.normalize(&mut table, &schema);
        let filters = self.filters.apply(&mut table, &schema);
        self.sorter.sort(&mut table, &schema);

        info!(
            input_rows,
            output_rows = table.row_count(),
            degraded = normalization.total_degraded(),
            "cleaning complete"
        );

        Ok(CleanOutcome {
            input_rows,
            table,
            schema,
            normalization,
            filters,
        })
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}
