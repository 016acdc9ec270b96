//! Example: Analyze a tabular data file with Augur.
//!
//! Usage:
//!   cargo run --example analyze -- <file_path>
//!
//! Example:
//!   cargo run --example analyze -- test_data/sales_ledger.csv

use std::env;
use std::path::Path;

use augur::{Augur, ChartKind, Severity};

fn main() -> augur::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example analyze -- <file_path>");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example analyze -- test_data/sales_ledger.csv");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Error: File not found: {}", file_path);
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Augur Analysis: {}", file_path);
    println!("{}", separator);
    println!();

    let augur = Augur::new();
    let result = augur.analyze(path)?;

    // Print source metadata
    println!("## Source Metadata");
    println!("  File: {}", result.source.file);
    println!("  Format: {}", result.source.format);
    println!("  Rows: {}", result.source.row_count);
    println!("  Columns: {}", result.source.column_count);
    println!();

    // Print schema summary
    println!("## Schema ({} columns)", result.columns.len());
    println!();
    for col in &result.columns {
        println!("  {:20} {:10}", col.name, format!("{:?}", col.column_type));
        if !col.sample_values.is_empty() {
            println!("                       samples: {:?}", col.sample_values);
        }
    }
    println!();

    // Print statistics
    let stats = &result.statistics;
    println!("## Statistics");
    println!("  Total rows: {}", stats.total_rows);
    println!("  Missing values: {}", stats.missing_values);
    println!("  Duplicate rows: {}", stats.duplicate_rows);
    println!();

    for col in &stats.numeric_columns {
        println!(
            "  {:20} mean={:<10} median={:<10} min={:<10} max={:<10} std={}",
            col.column, col.mean, col.median, col.min, col.max, col.std
        );
    }
    for col in &stats.categorical_columns {
        let top: Vec<String> = col
            .top_values
            .iter()
            .take(3)
            .map(|t| format!("{} ({})", t.value, t.count))
            .collect();
        println!(
            "  {:20} unique={:<5} top: {}",
            col.column,
            col.unique_values,
            top.join(", ")
        );
    }
    println!();

    // Print insights grouped by severity
    println!("## Insights ({} total)", result.insights.len());
    println!();

    for severity in [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ] {
        let matching: Vec<_> = result
            .insights
            .iter()
            .filter(|i| i.severity == severity)
            .collect();
        if matching.is_empty() {
            continue;
        }

        println!("### {:?} ({}):", severity, matching.len());
        for insight in matching {
            println!(
                "  [{}] {} (confidence: {:.0}%)",
                insight.id,
                insight.title,
                insight.confidence * 100.0
            );
            println!("       {}", insight.description);
            for rec in &insight.recommendations {
                println!("       -> {}: {}", rec.action, rec.description);
            }
        }
        println!();
    }

    // Print which charts this dataset supports
    let available = augur.available_charts(path)?;
    println!("## Available Charts ({})", available.len());
    for descriptor in &available {
        println!("  {:10} {}", descriptor.name, descriptor.description);
    }
    println!();

    // Project the first available chart as a taste of the data
    if let Some(descriptor) = available.first() {
        let payload = augur.chart(path, descriptor.chart_type, &[], Some(10))?;
        println!("## {} Preview", descriptor.name);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        println!();
    }

    println!("{}", separator);

    Ok(())
}
