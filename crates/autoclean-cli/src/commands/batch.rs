//! Batch command - clean every CSV file in a directory.

use std::path::{Path, PathBuf};

use autoclean::JobStatus;
use colored::Colorize;

use crate::cli::OutputFormat;

/// CSV files directly inside `dir`, sorted by name.
fn csv_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

pub fn run(
    dir: PathBuf,
    out_dir: Option<PathBuf>,
    format: OutputFormat,
    config: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !dir.is_dir() {
        return Err(format!("Directory not found: {}", dir.display()).into());
    }

    let files = csv_files(&dir)?;
    if files.is_empty() {
        println!("{} No CSV files found in {}", "Note:".yellow(), dir.display());
        return Ok(());
    }

    let out_dir = out_dir.unwrap_or_else(|| dir.join("data"));
    let job = super::load_job(config.as_deref())?;
    let encoder = format.encoder();

    println!(
        "{} {} file(s) to {}",
        "Cleaning".cyan().bold(),
        files.len().to_string().white().bold(),
        format.to_string().cyan()
    );

    let mut failed = 0;
    for file in &files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (result, written) = super::run_job(&job, &name, file, encoder.as_ref(), |key| out_dir.join(key));

        match written {
            Some(path) => {
                println!(
                    "  {} {} ({} → {} rows) → {}",
                    "✓".green(),
                    name,
                    result.input_rows.unwrap_or_default(),
                    result.output_rows.unwrap_or_default(),
                    path.display().to_string().cyan()
                );
            }
            _ if result.status == JobStatus::Empty => {
                println!("  {} {} {}", "•".yellow(), name, result.message.dimmed());
            }
            _ => {
                failed += 1;
                println!("  {} {} {}", "✗".red(), name, result.message.red());
            }
        }

        if verbose {
            println!("    {}", result.body().dimmed());
        }
    }

    println!();
    if failed > 0 {
        return Err(format!("{} of {} file(s) could not be cleaned", failed, files.len()).into());
    }

    println!("{} All files processed", "Done:".green().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_csv_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["b.csv", "a.CSV", "notes.txt"] {
            std::fs::write(dir.path().join(name), "price,year\n1,2020\n").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let names: Vec<String> = csv_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.CSV", "b.csv"]);
    }

    #[test]
    fn test_batch_writes_cleaned_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("cars.csv"), "name,year,price\nB,2020,1\nA,2019,2\n").unwrap();
        std::fs::write(dir.path().join("bad.csv"), "name,year\nA,2019\n").unwrap();
        let out = dir.path().join("out");

        let result = run(dir.path().to_path_buf(), Some(out.clone()), OutputFormat::Csv, None, false);

        assert!(result.is_err());
        let written = std::fs::read_to_string(out.join("cars_clean.csv")).unwrap();
        assert_eq!(written, "name,year,price\nA,2019,2\nB,2020,1\n");
        assert!(!out.join("bad_clean.csv").exists());
    }

    #[test]
    fn test_batch_continues_after_failed_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.csv"), "name,year,price\nA,2019,2\n").unwrap();
        std::fs::write(dir.path().join("b.csv"), "name,year,price\nB,2020,1\n").unwrap();
        let out = dir.path().join("out");
        // a.csv cannot be stored: its artifact path is already a directory
        std::fs::create_dir_all(out.join("a_clean.csv")).unwrap();

        let result = run(dir.path().to_path_buf(), Some(out.clone()), OutputFormat::Csv, None, false);

        assert_eq!(result.unwrap_err().to_string(), "1 of 2 file(s) could not be cleaned");
        let written = std::fs::read_to_string(out.join("b_clean.csv")).unwrap();
        assert_eq!(written, "name,year,price\nB,2020,1\n");
    }
}
