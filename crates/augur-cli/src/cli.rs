//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Augur: tabular data analysis tool
#[derive(Parser)]
#[command(name = "augur")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a data file: schema, statistics and insights
    Analyze {
        /// Path to the data file (CSV/XLSX/XLS)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Insight types to generate (comma-separated; default: summary,anomaly,trend)
        #[arg(short, long)]
        types: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Project a data file into one chart payload
    Chart {
        /// Path to the data file (CSV/XLSX/XLS)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Chart kind (bar, line, pie, scatter, area, summary)
        #[arg(short, long)]
        kind: String,

        /// Columns to chart (comma-separated; default: probed from the data)
        #[arg(short, long)]
        columns: Option<String>,

        /// Maximum rows considered for the projection
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: ChartFormat,
    },

    /// Run the HTTP API server
    Serve {
        /// Port for the HTTP server
        #[arg(short, long, default_value = "4100")]
        port: u16,

        /// Directory for uploaded files
        #[arg(long, default_value = "uploads")]
        upload_dir: PathBuf,
    },
}

/// Output format for the analyze command
#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Output format for the chart command
#[derive(Clone, Debug, Default)]
pub enum ChartFormat {
    #[default]
    Json,
    Csv,
}

impl std::str::FromStr for ChartFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ChartFormat::Json),
            "csv" => Ok(ChartFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use json or csv.", s)),
        }
    }
}

impl std::fmt::Display for ChartFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartFormat::Json => write!(f, "json"),
            ChartFormat::Csv => write!(f, "csv"),
        }
    }
}
