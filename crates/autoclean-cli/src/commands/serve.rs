//! Serve command - clean a file once and expose it over HTTP.

use std::path::PathBuf;

use colored::Colorize;

use crate::server::{app, state::AppState};

pub fn run(
    file: PathBuf,
    port: u16,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("Data file not found: {}", file.display()).into());
    }

    let cleaner = super::load_cleaner(config.as_deref())?;
    let outcome = cleaner.clean_file(&file)?;

    println!(
        "{} {} ({} of {} rows kept)",
        "Cleaned".green().bold(),
        file.display(),
        outcome.output_rows(),
        outcome.input_rows
    );

    let state = AppState::new(outcome);

    let url = format!("http://localhost:{}", port);
    println!();
    println!("{} {}", "Serving listings at".cyan().bold(), url.white().bold());
    println!();
    println!("  GET {}/api/cars", url);
    println!("  GET {}/api/owner-stats", url);
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state, port))
}
