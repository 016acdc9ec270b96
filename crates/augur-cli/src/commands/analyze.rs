//! Analyze command - run the full pipeline and print the result.

use std::path::PathBuf;

use augur::{Augur, InsightType, Severity};
use colored::Colorize;

use crate::cli::OutputFormat;

pub fn run(
    file: PathBuf,
    types: Option<String>,
    format: OutputFormat,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let kinds = parse_types(types.as_deref())?;

    let augur = Augur::new();
    let mut result = augur.analyze(&file)?;
    if !kinds.is_empty() {
        result.insights = augur.insights(&file, &kinds)?;
    }

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Analyzed".cyan().bold(),
        file.display().to_string().white()
    );
    println!(
        "  {} rows, {} columns ({}, {} bytes)",
        result.source.row_count.to_string().white().bold(),
        result.source.column_count.to_string().white().bold(),
        result.source.format,
        result.source.size_bytes
    );

    println!();
    println!("{}", "Schema:".yellow().bold());
    for col in &result.columns {
        println!(
            "  {:24} {:8} {}",
            col.name,
            col.column_type.as_str(),
            col.sample_values.join(", ").dimmed()
        );
    }

    println!();
    println!("{}", "Statistics:".yellow().bold());
    println!(
        "  missing values: {}, duplicate rows: {}",
        result.statistics.missing_values, result.statistics.duplicate_rows
    );
    for stats in &result.statistics.numeric_columns {
        println!(
            "  {:24} mean {:.2}  median {:.2}  min {:.2}  max {:.2}  std {:.2}",
            stats.column, stats.mean, stats.median, stats.min, stats.max, stats.std
        );
    }
    if verbose {
        for stats in &result.statistics.categorical_columns {
            let top: Vec<String> = stats
                .top_values
                .iter()
                .map(|t| format!("{} ({})", t.value, t.count))
                .collect();
            println!(
                "  {:24} {} unique; top: {}",
                stats.column,
                stats.unique_values,
                top.join(", ")
            );
        }
    }

    let high_count = result
        .insights
        .iter()
        .filter(|i| i.severity >= Severity::High)
        .count();

    println!();
    println!(
        "Generated {} insights ({} high severity)",
        result.insights.len().to_string().white().bold(),
        high_count.to_string().red()
    );
    for insight in &result.insights {
        let severity = match insight.severity {
            Severity::Low => insight.severity.as_str().blue(),
            Severity::Medium => insight.severity.as_str().yellow(),
            _ => insight.severity.as_str().red(),
        };
        println!(
            "  [{}] {} {}",
            severity,
            insight.title.white().bold(),
            format!("({:.0}%)", insight.confidence * 100.0).dimmed()
        );
        if verbose {
            println!("      {}", insight.description);
        }
    }

    if result.insights.is_empty() {
        println!("{}", "No insights triggered - data looks unremarkable.".green());
    }

    Ok(())
}

/// Parse a comma-separated insight type list.
fn parse_types(types: Option<&str>) -> Result<Vec<InsightType>, String> {
    let Some(types) = types else {
        return Ok(Vec::new());
    };
    types
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}
