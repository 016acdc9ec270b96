//! Augur CLI - tabular data analysis tool.

use augur_cli::cli::{Cli, Commands};
use augur_cli::commands;
use clap::Parser;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            file,
            types,
            format,
        } => commands::analyze::run(file, types, format, cli.verbose),

        Commands::Chart {
            file,
            kind,
            columns,
            limit,
            format,
        } => commands::chart::run(file, kind, columns, limit, format),

        Commands::Serve { port, upload_dir } => commands::serve::run(port, upload_dir, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
