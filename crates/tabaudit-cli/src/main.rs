//! Tabaudit CLI - tabular data audit tool.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Audit {
            file,
            out,
            exclude,
            delimiter,
            max_rows,
        } => commands::audit::run(file, out, exclude, delimiter, max_rows, cli.verbose),

        Commands::Report {
            file,
            delimiter,
            json,
        } => commands::report::run(file, delimiter, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
