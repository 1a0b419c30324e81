//! Autoclean CLI - clean raw vehicle listings into a canonical table.

mod cli;
mod commands;
mod logging;
#[cfg(feature = "parquet")]
mod columnar;
mod server;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Clean {
            file,
            store,
            output,
            format,
            config,
            json,
        } => commands::clean::run(file, store, output, format, config, json),

        Commands::Batch {
            dir,
            out_dir,
            format,
            config,
        } => commands::batch::run(dir, out_dir, format, config, cli.verbose),

        Commands::Inspect { file, config, json } => commands::inspect::run(file, config, json),

        Commands::Serve { file, port, config } => commands::serve::run(file, port, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
