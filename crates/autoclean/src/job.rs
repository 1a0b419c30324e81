//! One invocation of the pipeline: bytes in, structured result out.
//!
//! A job never returns an error. Every terminal state (success, empty
//! result, malformed input, unexpected failure) becomes a [`JobResult`]
//! carrying a status code, so callers such as an event handler or the CLI
//! can report it without further interpretation.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::cleaner::{CleanOutcome, Cleaner, CleanerConfig};
use crate::error::CleanError;
use crate::export::TableEncoder;

/// Rules for deriving an output identifier from an input identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyLayout {
    /// Path segment marking raw inputs.
    pub input_segment: String,
    /// Segment substituted for `input_segment` in output keys.
    pub output_segment: String,
    /// Appended to the file stem before the extension.
    pub suffix: String,
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self {
            input_segment: "bronze/".to_string(),
            output_segment: "silver/".to_string(),
            suffix: "_clean".to_string(),
        }
    }
}

impl KeyLayout {
    /// Derive the output key: `bronze/cars.csv` becomes `silver/cars_clean.parquet`.
    ///
    /// Every occurrence of the input segment is substituted.
    pub fn output_key(&self, input_key: &str, extension: &str) -> String {
        let key = if self.input_segment.is_empty() {
            input_key.to_string()
        } else {
            input_key.replace(&self.input_segment, &self.output_segment)
        };

        // Only a dot in the final path component starts an extension
        let file_start = key.rfind('/').map_or(0, |i| i + 1);
        let stem = match key[file_start..].rfind('.') {
            Some(dot) if dot > 0 => &key[..file_start + dot],
            _ => key.as_str(),
        };

        format!("{}{}.{}", stem, self.suffix, extension)
    }
}

/// Terminal state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Rows survived cleaning and an artifact was produced.
    Completed,
    /// Every row was filtered out; valid run, no artifact.
    Empty,
    /// The input is structurally unusable; do not retry unchanged.
    Rejected,
    /// Unexpected failure while reading or encoding.
    Failed,
}

impl JobStatus {
    /// HTTP-style status code for the outcome.
    pub fn code(&self) -> u16 {
        match self {
            JobStatus::Completed | JobStatus::Empty => 200,
            JobStatus::Rejected => 400,
            JobStatus::Failed => 500,
        }
    }

    /// True for the two successful outcomes.
    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Empty)
    }
}

/// Structured result of one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub status: JobStatus,
    pub status_code: u16,
    pub message: String,
    /// Rows read, when the input could be parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_rows: Option<usize>,
    /// Rows written, only for runs that reached the end of the pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_rows: Option<usize>,
    pub input_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_key: Option<String>,
    /// Encoded cleaned table, present only for completed runs.
    #[serde(skip)]
    pub artifact: Option<Vec<u8>>,
}

impl JobResult {
    fn new(status: JobStatus, message: impl Into<String>, input_key: &str) -> Self {
        Self {
            status,
            status_code: status.code(),
            message: message.into(),
            input_rows: None,
            output_rows: None,
            input_key: input_key.to_string(),
            output_key: None,
            artifact: None,
        }
    }

    /// JSON summary body of the result.
    pub fn body(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"message\":{:?}}}", self.message))
    }
}

/// Runs the cleaner over raw bytes and packages the outcome.
pub struct CleaningJob {
    cleaner: Cleaner,
    layout: KeyLayout,
}

impl CleaningJob {
    /// Create a job runner.
    pub fn new(cleaner: Cleaner, layout: KeyLayout) -> Self {
        Self { cleaner, layout }
    }

    /// Build a job from a loaded configuration, including its key layout.
    pub fn from_config(config: CleanerConfig) -> Self {
        let layout = config.layout.clone();
        Self::new(Cleaner::with_config(config), layout)
    }

    /// The key layout in use.
    pub fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    /// Clean `bytes` read from `input_key` and encode the result.
    pub fn run(&self, input_key: &str, bytes: &[u8], encoder: &dyn TableEncoder) -> JobResult {
        info!(input_key, bytes = bytes.len(), "processing input");

        let outcome = match self.cleaner.clean_bytes(bytes) {
            Ok(outcome) => outcome,
            Err(e) => return self.failure(input_key, e),
        };

        self.package(input_key, outcome, encoder)
    }

    /// Package an already-cleaned outcome.
    pub fn package(
        &self,
        input_key: &str,
        outcome: CleanOutcome,
        encoder: &dyn TableEncoder,
    ) -> JobResult {
        if outcome.is_empty() {
            info!(input_key, "no valid data after cleaning");
            let mut result = JobResult::new(JobStatus::Empty, "No valid data after cleaning", input_key);
            result.input_rows = Some(outcome.input_rows);
            result.output_rows = Some(0);
            return result;
        }

        let artifact = match encoder.encode(&outcome.table) {
            Ok(bytes) => bytes,
            Err(e) => {
                let mut result = self.failure(input_key, e);
                result.input_rows = Some(outcome.input_rows);
                return result;
            }
        };

        let output_key = self.layout.output_key(input_key, encoder.extension());
        info!(
            input_key,
            output_key = %output_key,
            rows = outcome.output_rows(),
            bytes = artifact.len(),
            "encoded cleaned table"
        );

        let mut result = JobResult::new(JobStatus::Completed, "ETL completed successfully", input_key);
        result.input_rows = Some(outcome.input_rows);
        result.output_rows = Some(outcome.output_rows());
        result.output_key = Some(output_key);
        result.artifact = Some(artifact);
        result
    }

    /// Result for a job that failed outside the pipeline, or inside it.
    ///
    /// Structural errors become `Rejected`; anything else, including an
    /// [`CleanError::Io`] raised while reading the input or storing the
    /// artifact, becomes `Failed` with no artifact.
    pub fn failure(&self, input_key: &str, err: CleanError) -> JobResult {
        if err.is_structural() {
            warn!(input_key, error = %err, "rejected input");
            JobResult::new(JobStatus::Rejected, err.to_string(), input_key)
        } else {
            error!(input_key, error = %err, "cleaning failed");
            JobResult::new(JobStatus::Failed, format!("Error: {}", err), input_key)
        }
    }
}

impl Default for CleaningJob {
    fn default() -> Self {
        Self::new(Cleaner::new(), KeyLayout::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::DelimitedEncoder;
    use crate::input::DataTable;

    struct FailingEncoder;

    impl TableEncoder for FailingEncoder {
        fn format(&self) -> &str {
            "broken"
        }
        fn extension(&self) -> &str {
            "bin"
        }
        fn encode(&self, _table: &DataTable) -> crate::Result<Vec<u8>> {
            Err(CleanError::Encode("disk full".to_string()))
        }
    }

    #[test]
    fn test_output_key_derivation() {
        let layout = KeyLayout::default();
        assert_eq!(layout.output_key("bronze/cars.csv", "parquet"), "silver/cars_clean.parquet");
        assert_eq!(
            layout.output_key("raw/bronze/v1.2/cars.data.csv", "csv"),
            "raw/silver/v1.2/cars.data_clean.csv"
        );
        assert_eq!(layout.output_key("bronze/cars", "parquet"), "silver/cars_clean.parquet");
        assert_eq!(layout.output_key("v1.2/cars", "json"), "v1.2/cars_clean.json");
        assert_eq!(layout.output_key("uploads/.hidden", "csv"), "uploads/.hidden_clean.csv");
        assert_eq!(
            layout.output_key("bronze/2024/bronze/cars.csv", "parquet"),
            "silver/2024/silver/cars_clean.parquet"
        );
    }

    #[test]
    fn test_job_from_config_uses_layout() {
        let config: CleanerConfig =
            serde_json::from_str(r#"{"layout": {"output_segment": "gold/", "suffix": ""}}"#).unwrap();
        let job = CleaningJob::from_config(config);
        assert_eq!(job.layout().input_segment, "bronze/");

        let result = job.run("bronze/cars.csv", b"price,year
1,2020
", &DelimitedEncoder::csv());
        assert_eq!(result.output_key.as_deref(), Some("gold/cars.csv"));
    }

    #[test]
    fn test_read_error_is_server_error() {
        let err = CleanError::Io {
            path: "bronze/cars.csv".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let result = CleaningJob::default().failure("bronze/cars.csv", err);

        assert_eq!(result.status, JobStatus::Failed);
        assert_eq!(result.status_code, 500);
        assert!(result.message.starts_with("Error: IO error for 'bronze/cars.csv'"));
        assert!(result.artifact.is_none());
        assert!(result.output_key.is_none());
        let body: serde_json::Value = serde_json::from_str(&result.body()).unwrap();
        assert_eq!(body["status"], "failed");
    }

    #[test]
    fn test_completed_job() {
        let job = CleaningJob::default();
        let result = job.run(
            "bronze/cars.csv",
            b"name,year,price\nB,2020,10\nA,2021,20\nA,2019,$30\n",
            &DelimitedEncoder::csv(),
        );

        assert_eq!(result.status, JobStatus::Completed);
        assert_eq!(result.status_code, 200);
        assert_eq!(result.input_rows, Some(3));
        assert_eq!(result.output_rows, Some(3));
        assert_eq!(result.output_key.as_deref(), Some("silver/cars_clean.csv"));
        let text = String::from_utf8(result.artifact.unwrap()).unwrap();
        assert_eq!(text, "name,year,price\nA,2019,30\nA,2021,20\nB,2020,10\n");
    }

    #[test]
    fn test_missing_price_rejected() {
        let result = CleaningJob::default().run(
            "bronze/cars.csv",
            b"name,year\nSwift,2014\n",
            &DelimitedEncoder::csv(),
        );
        assert_eq!(result.status, JobStatus::Rejected);
        assert_eq!(result.status_code, 400);
        assert_eq!(result.message, "No price column found");
        assert!(result.artifact.is_none());
        assert!(result.output_rows.is_none());
        assert!(result.output_key.is_none());
    }

    #[test]
    fn test_empty_input_rejected() {
        let result = CleaningJob::default().run("bronze/empty.csv", b"", &DelimitedEncoder::csv());
        assert_eq!(result.status, JobStatus::Rejected);
        assert!(result.artifact.is_none());
    }

    #[test]
    fn test_all_rows_filtered_is_success() {
        let result = CleaningJob::default().run(
            "bronze/old.csv",
            b"price,year\n100,1899\n200,1899\n",
            &DelimitedEncoder::csv(),
        );
        assert_eq!(result.status, JobStatus::Empty);
        assert_eq!(result.status_code, 200);
        assert_eq!(result.message, "No valid data after cleaning");
        assert_eq!(result.output_rows, Some(0));
        assert!(result.artifact.is_none());
    }

    #[test]
    fn test_encoder_failure_is_server_error() {
        let result = CleaningJob::default().run("bronze/cars.csv", b"price,year\n1,2020\n", &FailingEncoder);
        assert_eq!(result.status, JobStatus::Failed);
        assert_eq!(result.status_code, 500);
        assert_eq!(result.message, "Error: Encode error: disk full");
        assert!(result.artifact.is_none());
        assert!(result.output_key.is_none());
    }

    #[test]
    fn test_body_omits_artifact() {
        let result = CleaningJob::default().run("bronze/cars.csv", b"price,year\n1,2020\n", &DelimitedEncoder::csv());
        let body: serde_json::Value = serde_json::from_str(&result.body()).unwrap();
        assert_eq!(body["message"], "ETL completed successfully");
        assert_eq!(body["output_rows"], 1);
        assert!(body.get("artifact").is_none());
    }
}
