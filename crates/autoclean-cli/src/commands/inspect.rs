//! Inspect command - show how a file would be cleaned.

use std::path::{Path, PathBuf};

use autoclean::schema::ColumnOrigin;
use autoclean::{CanonicalRole, CleanOutcome};
use colored::Colorize;
use serde_json::json;

pub fn run(
    file: PathBuf,
    config: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("Data file not found: {}", file.display()).into());
    }

    let cleaner = super::load_cleaner(config.as_deref())?;
    let outcome = cleaner.clean_file(&file)?;

    if json {
        let report = json!({
            "file": file.display().to_string(),
            "input_rows": outcome.input_rows,
            "output_rows": outcome.output_rows(),
            "schema": outcome.schema,
            "normalization": outcome.normalization,
            "filters": outcome.filters,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&file, &outcome);
    Ok(())
}

fn print_report(file: &Path, outcome: &CleanOutcome) {
    println!("{} {}", "Inspecting".cyan().bold(), file.display());
    println!();

    println!("{}", "Schema".white().bold());
    for role in CanonicalRole::ALL {
        match outcome.schema.roles.get(&role) {
            Some(resolved) => {
                let origin = match &resolved.origin {
                    ColumnOrigin::Direct { source } if *source == resolved.column => String::new(),
                    ColumnOrigin::Direct { source } => format!(" (from {})", source),
                    ColumnOrigin::Synthesized { parts } => format!(" (from {})", parts.join(" + ")),
                };
                println!("  {:14} {}{}", role.to_string(), resolved.column.cyan(), origin.dimmed());
            }
            None => println!("  {:14} {}", role.to_string(), "-".dimmed()),
        }
    }

    if outcome.normalization.total_degraded() > 0 {
        println!();
        println!("{}", "Unparseable values".white().bold());
        for (column, count) in &outcome.normalization.degraded {
            println!("  {:14} {}", column, count.to_string().yellow());
        }
    }

    println!();
    println!("{}", "Filters".white().bold());
    println!("  {:26} {}", "input", outcome.input_rows);
    for stage in &outcome.filters.stages {
        let dropped = if stage.dropped() > 0 {
            format!("-{}", stage.dropped()).red().to_string()
        } else {
            String::new()
        };
        let name = if stage.applied {
            stage.stage.normal()
        } else {
            stage.stage.dimmed()
        };
        println!("  {:26} {} {}", name, stage.rows_after, dropped);
    }

    println!();
    println!(
        "{} {} of {} rows kept",
        "Result:".green().bold(),
        outcome.output_rows().to_string().white().bold(),
        outcome.input_rows
    );
}
