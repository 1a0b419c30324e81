//! Clean command - run one cleaning job against the local store.

use std::path::{Path, PathBuf};

use autoclean::{JobResult, JobStatus};
use colored::Colorize;

use crate::cli::OutputFormat;

pub fn run(
    file: PathBuf,
    store: PathBuf,
    output: Option<PathBuf>,
    format: OutputFormat,
    config: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let job = super::load_job(config.as_deref())?;
    let input_key = super::store_key(&store, &file);
    let encoder = format.encoder();

    let (result, written) = super::run_job(&job, &input_key, &file, encoder.as_ref(), |key| {
        output.unwrap_or_else(|| store.join(key))
    });

    if json {
        println!("{}", result.body());
    } else {
        print_result(&result, written.as_deref());
    }

    if !result.status.is_success() {
        return Err(format!("cleaning ended with status {}", result.status_code).into());
    }

    Ok(())
}

fn print_result(result: &JobResult, written: Option<&Path>) {
    let label = match result.status {
        JobStatus::Completed => "Cleaned".green().bold(),
        JobStatus::Empty => "Empty".yellow().bold(),
        JobStatus::Rejected => "Rejected".red().bold(),
        JobStatus::Failed => "Failed".red().bold(),
    };

    println!("{} {}", label, result.input_key.cyan());
    println!("  {}", result.message);

    if let (Some(input), Some(output)) = (result.input_rows, result.output_rows) {
        println!(
            "  Rows: {} → {}",
            input.to_string().white().bold(),
            output.to_string().white().bold()
        );
    }

    if let Some(path) = written {
        println!("  Output: {}", path.display().to_string().cyan());
    }
}
