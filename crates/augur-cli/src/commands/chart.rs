//! Chart command - project one chart payload to stdout.

use std::path::PathBuf;

use augur::{Augur, ChartKind};

use crate::cli::ChartFormat;

pub fn run(
    file: PathBuf,
    kind: String,
    columns: Option<String>,
    limit: Option<usize>,
    format: ChartFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let kind: ChartKind = kind.parse()?;
    let columns = parse_columns(columns.as_deref());

    let augur = Augur::new();
    let payload = augur.chart(&file, kind, &columns, limit)?;

    match format {
        ChartFormat::Json => println!("{}", serde_json::to_string_pretty(&payload)?),
        ChartFormat::Csv => print!("{}", payload.to_csv()?),
    }

    Ok(())
}

/// Parse a comma-separated column list.
fn parse_columns(columns: Option<&str>) -> Vec<String> {
    columns
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_columns() {
        assert!(parse_columns(None).is_empty());
        assert_eq!(
            parse_columns(Some("a, b ,c")),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
