//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use autoclean::{DelimitedEncoder, JsonEncoder, TableEncoder};

/// Format used when `--format` is not given.
#[cfg(feature = "parquet")]
pub const DEFAULT_FORMAT: &str = "parquet";
#[cfg(not(feature = "parquet"))]
pub const DEFAULT_FORMAT: &str = "csv";

/// Autoclean: schema-normalizing cleaner for vehicle listings
#[derive(Parser)]
#[command(name = "autoclean")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean one raw listing file and store the result
    Clean {
        /// Path to the raw data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Root of the local object store; keys are relative to it
        #[arg(short, long, default_value = ".")]
        store: PathBuf,

        /// Write the artifact here instead of the derived store key
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = DEFAULT_FORMAT)]
        format: OutputFormat,

        /// JSON file overriding parser, alias and validation settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the job result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clean every CSV file in a directory
    Batch {
        /// Directory containing raw CSV files
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output directory (default: <DIR>/data)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = DEFAULT_FORMAT)]
        format: OutputFormat,

        /// JSON file overriding parser, alias and validation settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show the resolved schema and per-stage row counts without writing output
    Inspect {
        /// Path to the raw data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON file overriding parser, alias and validation settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clean a file and serve the listings over HTTP
    Serve {
        /// Path to the raw data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Port for web server
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// JSON file overriding parser, alias and validation settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Tsv,
    Csv,
    Json,
    #[cfg(feature = "parquet")]
    Parquet,
}

impl OutputFormat {
    /// Encoder producing artifacts in this format.
    pub fn encoder(&self) -> Box<dyn TableEncoder> {
        match self {
            OutputFormat::Tsv => Box::new(DelimitedEncoder::tsv()),
            OutputFormat::Csv => Box::new(DelimitedEncoder::csv()),
            OutputFormat::Json => Box::new(JsonEncoder::default()),
            #[cfg(feature = "parquet")]
            OutputFormat::Parquet => Box::new(crate::columnar::ParquetEncoder::new()),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            #[cfg(feature = "parquet")]
            "parquet" => Ok(OutputFormat::Parquet),
            #[cfg(not(feature = "parquet"))]
            "parquet" => Err("Parquet support not enabled. Rebuild with --features parquet".to_string()),
            _ => Err(format!("Unknown format: {}. Use parquet, csv, tsv, or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Tsv => write!(f, "tsv"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
            #[cfg(feature = "parquet")]
            OutputFormat::Parquet => write!(f, "parquet"),
        }
    }
}
