//! CLI command implementations.

pub mod batch;
pub mod clean;
pub mod inspect;
pub mod serve;

use std::fs;
use std::path::{Component, Path, PathBuf};

use autoclean::{CleanError, Cleaner, CleanerConfig, CleaningJob, JobResult, TableEncoder};

fn load_config(config: Option<&Path>) -> autoclean::Result<CleanerConfig> {
    match config {
        Some(path) => CleanerConfig::load(path),
        None => Ok(CleanerConfig::default()),
    }
}

/// Build a cleaner, applying a JSON config file when one is given.
pub fn load_cleaner(config: Option<&Path>) -> autoclean::Result<Cleaner> {
    Ok(Cleaner::with_config(load_config(config)?))
}

/// Build a job runner, including any key layout from the config file.
pub fn load_job(config: Option<&Path>) -> autoclean::Result<CleaningJob> {
    Ok(CleaningJob::from_config(load_config(config)?))
}

/// Run `job` over the file at `file` and store its artifact at the path
/// `destination` picks for the output key.
///
/// Read and write failures come back as a failed [`JobResult`], never as an
/// error, so the caller can report them like any other outcome.
pub fn run_job(
    job: &CleaningJob,
    input_key: &str,
    file: &Path,
    encoder: &dyn TableEncoder,
    destination: impl FnOnce(&str) -> PathBuf,
) -> (JobResult, Option<PathBuf>) {
    let result = match fs::read(file) {
        Ok(bytes) => job.run(input_key, &bytes, encoder),
        Err(e) => {
            let err = CleanError::Io {
                path: file.to_path_buf(),
                source: e,
            };
            return (job.failure(input_key, err), None);
        }
    };

    let (Some(artifact), Some(key)) = (result.artifact.as_ref(), result.output_key.as_deref()) else {
        return (result, None);
    };

    let path = destination(key);
    match write_artifact(&path, artifact) {
        Ok(()) => (result, Some(path)),
        Err(e) => {
            let err = CleanError::Io { path, source: e };
            let mut failed = job.failure(input_key, err);
            failed.input_rows = result.input_rows;
            (failed, None)
        }
    }
}

/// Object key of `file` inside the local store rooted at `store`.
///
/// Files outside the store are keyed by their file name alone.
pub fn store_key(store: &Path, file: &Path) -> String {
    let relative = match (fs::canonicalize(store), fs::canonicalize(file)) {
        (Ok(root), Ok(path)) => path.strip_prefix(&root).map(Path::to_path_buf).ok(),
        _ => None,
    };

    match relative {
        Some(path) => path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

/// Write an artifact, creating parent directories as needed.
pub fn write_artifact(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)
}
