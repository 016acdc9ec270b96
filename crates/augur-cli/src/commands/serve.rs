//! Serve command - run the HTTP API server.

use std::path::PathBuf;

use colored::Colorize;

use crate::server::{app, state::AppState};

pub fn run(port: u16, upload_dir: PathBuf, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(&upload_dir)
        .map_err(|e| format!("Cannot create upload dir {}: {}", upload_dir.display(), e))?;

    let state = AppState::new(upload_dir.clone());

    println!(
        "{} {}",
        "Starting Augur API at".cyan().bold(),
        format!("http://localhost:{}", port).white().bold()
    );
    println!();
    println!("  Uploads: {}", upload_dir.display());
    if verbose {
        println!("  Endpoints: /api/datasets, /api/charts, /api/insights");
    }
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        tokio::spawn(async {
            tokio::signal::ctrl_c().await.ok();
            println!();
            println!("{}", "Shutting down...".yellow());
            std::process::exit(0);
        });

        if let Err(e) = app::run_server(state, port).await {
            eprintln!("Server error: {}", e);
        }
    });

    Ok(())
}
