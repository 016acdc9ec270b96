//! Projection of dataset snapshots into chart-ready payloads.
//!
//! Every projection first caps the row set at the request limit, then probes
//! or resolves columns against that capped slice only. Counting, sorting and
//! aggregation all see the same rows the caller asked for.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AugurError, Result};
use crate::schema::{ColumnDescriptor, ColumnType, DatasetSnapshot};
use crate::stats::core::{mean, median, population_std, round2};
use crate::value::{format_number, Value};

/// Row cap applied when a request does not name one.
pub const DEFAULT_CHART_LIMIT: usize = 100;

/// Supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Scatter,
    Area,
    Summary,
}

impl ChartKind {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Scatter => "scatter",
            ChartKind::Area => "area",
            ChartKind::Summary => "summary",
        }
    }
}

impl FromStr for ChartKind {
    type Err = AugurError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "pie" => Ok(ChartKind::Pie),
            "scatter" => Ok(ChartKind::Scatter),
            "area" => Ok(ChartKind::Area),
            "summary" => Ok(ChartKind::Summary),
            other => Err(AugurError::UnsupportedChartRequest(format!(
                "Unsupported chart type: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One category with its occurrence count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub value: usize,
}

/// One point of a date-ordered series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: String,
    pub value: f64,
}

/// One point of a date-ordered series with its running total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub date: String,
    pub value: f64,
    pub cumulative: f64,
}

/// One x/y pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// Descriptive statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
}

/// Datum rows of a chart payload; the shape depends on the chart kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartData {
    Categories(Vec<CategoryCount>),
    Cumulative(Vec<CumulativePoint>),
    Series(Vec<SeriesPoint>),
    Points(Vec<ScatterPoint>),
    Summaries(Vec<ColumnSummary>),
}

impl ChartData {
    /// Number of datum rows.
    pub fn len(&self) -> usize {
        match self {
            ChartData::Categories(entries) => entries.len(),
            ChartData::Cumulative(points) => points.len(),
            ChartData::Series(points) => points.len(),
            ChartData::Points(points) => points.len(),
            ChartData::Summaries(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Chart-ready projection of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    /// Kind that produced this payload.
    pub chart_type: ChartKind,
    /// Field names present in each datum.
    pub columns: Vec<String>,
    /// The datum rows.
    pub data: ChartData,
}

impl ChartPayload {
    /// Render the payload as CSV text: the field names as the header row,
    /// one line per datum. Values containing the delimiter are quoted.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;

        match &self.data {
            ChartData::Categories(entries) => {
                for e in entries {
                    writer.write_record([e.name.as_str(), &e.value.to_string()])?;
                }
            }
            ChartData::Cumulative(points) => {
                for p in points {
                    writer.write_record([
                        p.date.as_str(),
                        &format_number(p.value),
                        &format_number(p.cumulative),
                    ])?;
                }
            }
            ChartData::Series(points) => {
                for p in points {
                    writer.write_record([p.date.as_str(), &format_number(p.value)])?;
                }
            }
            ChartData::Points(points) => {
                for p in points {
                    writer.write_record([format_number(p.x), format_number(p.y)])?;
                }
            }
            ChartData::Summaries(rows) => {
                for s in rows {
                    writer.write_record([
                        s.column.as_str(),
                        &s.count.to_string(),
                        &format_number(s.mean),
                        &format_number(s.median),
                        &format_number(s.min),
                        &format_number(s.max),
                        &format_number(s.std),
                    ])?;
                }
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AugurError::Csv(csv::Error::from(e.into_error())))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// One chart kind a dataset's schema can support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTypeDescriptor {
    #[serde(rename = "type")]
    pub chart_type: ChartKind,
    pub name: String,
    pub description: String,
    pub suitable_columns: Vec<String>,
}

/// Project a snapshot into the payload for one chart kind.
///
/// `requested` names columns to chart; when it is too short for the kind,
/// suitable columns are probed from the capped slice instead.
pub fn project(
    snapshot: &DatasetSnapshot,
    kind: ChartKind,
    requested: &[String],
    limit: usize,
) -> Result<ChartPayload> {
    let rows = &snapshot.rows[..snapshot.rows.len().min(limit)];
    let columns = &snapshot.columns;

    let (field_names, data) = match kind {
        ChartKind::Bar => category_chart(columns, rows, requested, 20, "bar")?,
        ChartKind::Pie => category_chart(columns, rows, requested, 10, "pie")?,
        ChartKind::Line => line_chart(columns, rows, requested)?,
        ChartKind::Area => area_chart(columns, rows, requested)?,
        ChartKind::Scatter => scatter_chart(columns, rows, requested)?,
        ChartKind::Summary => summary_chart(columns, rows, requested)?,
    };

    Ok(ChartPayload {
        chart_type: kind,
        columns: field_names,
        data,
    })
}

/// The chart kinds a schema can support, with display metadata.
pub fn available_chart_types(columns: &[ColumnDescriptor]) -> Vec<ChartTypeDescriptor> {
    let names_of = |column_type: ColumnType| -> Vec<String> {
        columns
            .iter()
            .filter(|c| c.column_type == column_type)
            .map(|c| c.name.clone())
            .collect()
    };
    let numeric = names_of(ColumnType::Number);
    let categorical = names_of(ColumnType::String);
    let dates = names_of(ColumnType::Date);

    let mut available = Vec::new();

    if !categorical.is_empty() {
        available.push(ChartTypeDescriptor {
            chart_type: ChartKind::Bar,
            name: "Bar Chart".to_string(),
            description: "Compare categories".to_string(),
            suitable_columns: categorical.clone(),
        });
    }
    if !numeric.is_empty() && !dates.is_empty() {
        available.push(ChartTypeDescriptor {
            chart_type: ChartKind::Line,
            name: "Line Chart".to_string(),
            description: "Show trends over time".to_string(),
            suitable_columns: numeric.clone(),
        });
    }
    if !categorical.is_empty() {
        available.push(ChartTypeDescriptor {
            chart_type: ChartKind::Pie,
            name: "Pie Chart".to_string(),
            description: "Show proportions".to_string(),
            suitable_columns: categorical,
        });
    }
    if numeric.len() >= 2 {
        available.push(ChartTypeDescriptor {
            chart_type: ChartKind::Scatter,
            name: "Scatter Plot".to_string(),
            description: "Show correlation between variables".to_string(),
            suitable_columns: numeric.clone(),
        });
    }
    if !numeric.is_empty() {
        available.push(ChartTypeDescriptor {
            chart_type: ChartKind::Area,
            name: "Area Chart".to_string(),
            description: "Show cumulative data".to_string(),
            suitable_columns: numeric.clone(),
        });
        available.push(ChartTypeDescriptor {
            chart_type: ChartKind::Summary,
            name: "Summary Statistics".to_string(),
            description: "Show statistical summary".to_string(),
            suitable_columns: numeric,
        });
    }

    available
}

/// Present (non-missing) cells of one column within the capped slice.
fn present_values<'a>(rows: &'a [Vec<Value>], position: usize) -> Vec<&'a Value> {
    rows.iter()
        .filter_map(|row| row.get(position))
        .filter(|v| !v.is_missing())
        .collect()
}

/// Column positions whose present cells exist and are not all numeric.
fn probe_categorical(columns: &[ColumnDescriptor], rows: &[Vec<Value>]) -> Vec<usize> {
    columns
        .iter()
        .map(|c| c.position)
        .filter(|&p| {
            let values = present_values(rows, p);
            !values.is_empty() && !values.iter().all(|v| v.as_number().is_some())
        })
        .collect()
}

/// Column positions whose present cells all read as numbers.
fn probe_numeric(columns: &[ColumnDescriptor], rows: &[Vec<Value>]) -> Vec<usize> {
    columns
        .iter()
        .map(|c| c.position)
        .filter(|&p| {
            let values = present_values(rows, p);
            !values.is_empty() && values.iter().all(|v| v.as_number().is_some())
        })
        .collect()
}

/// Column positions whose present cells all read as dates.
fn probe_dates(columns: &[ColumnDescriptor], rows: &[Vec<Value>]) -> Vec<usize> {
    columns
        .iter()
        .map(|c| c.position)
        .filter(|&p| {
            let values = present_values(rows, p);
            !values.is_empty() && values.iter().all(|v| v.as_date().is_some())
        })
        .collect()
}

fn position_of(columns: &[ColumnDescriptor], name: &str) -> Option<usize> {
    columns.iter().find(|c| c.name == name).map(|c| c.position)
}

/// Shared projection for bar and pie charts: count occurrences of the
/// category column's values, keeping the `top` most frequent.
fn category_chart(
    columns: &[ColumnDescriptor],
    rows: &[Vec<Value>],
    requested: &[String],
    top: usize,
    kind_label: &str,
) -> Result<(Vec<String>, ChartData)> {
    // A requested column is used as-is, even when it does not exist; rows
    // then count under the Unknown bucket, the same as missing cells.
    let position = match requested.first() {
        Some(name) => position_of(columns, name),
        None => {
            let probed = probe_categorical(columns, rows);
            let Some(&first) = probed.first() else {
                return Err(AugurError::UnsupportedChartRequest(format!(
                    "No suitable categorical columns found for {} chart",
                    kind_label
                )));
            };
            Some(first)
        }
    };

    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for row in rows {
        let cell = position.and_then(|p| row.get(p)).unwrap_or(&Value::Missing);
        let name = if cell.is_missing() {
            "Unknown".to_string()
        } else {
            cell.display_text()
        };
        *counts.entry(name).or_insert(0) += 1;
    }

    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    // Stable sort: equal counts keep first-encountered order.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(top);

    let data = entries
        .into_iter()
        .map(|(name, value)| CategoryCount { name, value })
        .collect();

    Ok((
        vec!["name".to_string(), "value".to_string()],
        ChartData::Categories(data),
    ))
}

/// Resolve the (date, value) column pair for a time series projection.
fn resolve_series_columns(
    columns: &[ColumnDescriptor],
    rows: &[Vec<Value>],
    requested: &[String],
    kind_label: &str,
) -> Result<(Option<usize>, Option<usize>)> {
    if requested.len() >= 2 {
        return Ok((
            position_of(columns, &requested[0]),
            position_of(columns, &requested[1]),
        ));
    }

    let dates = probe_dates(columns, rows);
    let numerics = probe_numeric(columns, rows);
    match (dates.first(), numerics.first()) {
        (Some(&date), Some(&value)) => Ok((Some(date), Some(value))),
        _ => Err(AugurError::UnsupportedChartRequest(format!(
            "{} chart requires at least one date column and one numeric column",
            kind_label
        ))),
    }
}

/// Rows where both readings are present, sorted by parsed date. The label
/// keeps the cell's display text so source formatting survives.
fn date_ordered_series(
    rows: &[Vec<Value>],
    date_position: Option<usize>,
    value_position: Option<usize>,
) -> Vec<(NaiveDateTime, String, f64)> {
    let (Some(dp), Some(vp)) = (date_position, value_position) else {
        return Vec::new();
    };
    let mut series: Vec<(NaiveDateTime, String, f64)> = rows
        .iter()
        .filter_map(|row| {
            let date_cell = row.get(dp)?;
            let parsed = date_cell.as_date()?;
            let value = row.get(vp)?.as_number()?;
            Some((parsed, date_cell.display_text(), value))
        })
        .collect();
    series.sort_by_key(|(date, _, _)| *date);
    series
}

fn line_chart(
    columns: &[ColumnDescriptor],
    rows: &[Vec<Value>],
    requested: &[String],
) -> Result<(Vec<String>, ChartData)> {
    let (date_position, value_position) =
        resolve_series_columns(columns, rows, requested, "Line")?;
    let data = date_ordered_series(rows, date_position, value_position)
        .into_iter()
        .map(|(_, date, value)| SeriesPoint { date, value })
        .collect();

    Ok((
        vec!["date".to_string(), "value".to_string()],
        ChartData::Series(data),
    ))
}

fn area_chart(
    columns: &[ColumnDescriptor],
    rows: &[Vec<Value>],
    requested: &[String],
) -> Result<(Vec<String>, ChartData)> {
    let (date_position, value_position) =
        resolve_series_columns(columns, rows, requested, "Area")?;

    let mut cumulative = 0.0;
    let data = date_ordered_series(rows, date_position, value_position)
        .into_iter()
        .map(|(_, date, value)| {
            cumulative += value;
            CumulativePoint {
                date,
                value,
                cumulative,
            }
        })
        .collect();

    Ok((
        vec![
            "date".to_string(),
            "value".to_string(),
            "cumulative".to_string(),
        ],
        ChartData::Cumulative(data),
    ))
}

fn scatter_chart(
    columns: &[ColumnDescriptor],
    rows: &[Vec<Value>],
    requested: &[String],
) -> Result<(Vec<String>, ChartData)> {
    let (x_position, y_position) = if requested.len() >= 2 {
        (
            position_of(columns, &requested[0]),
            position_of(columns, &requested[1]),
        )
    } else {
        let numerics = probe_numeric(columns, rows);
        if numerics.len() < 2 {
            return Err(AugurError::UnsupportedChartRequest(
                "Scatter chart requires at least two numeric columns".to_string(),
            ));
        }
        (Some(numerics[0]), Some(numerics[1]))
    };

    let data = match (x_position, y_position) {
        (Some(xp), Some(yp)) => rows
            .iter()
            .filter_map(|row| {
                let x = row.get(xp)?.as_number()?;
                let y = row.get(yp)?.as_number()?;
                Some(ScatterPoint { x, y })
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok((
        vec!["x".to_string(), "y".to_string()],
        ChartData::Points(data),
    ))
}

fn summary_chart(
    columns: &[ColumnDescriptor],
    rows: &[Vec<Value>],
    requested: &[String],
) -> Result<(Vec<String>, ChartData)> {
    let names: Vec<String> = if requested.is_empty() {
        let numerics = probe_numeric(columns, rows);
        if numerics.is_empty() {
            return Err(AugurError::UnsupportedChartRequest(
                "No numeric columns found for summary statistics".to_string(),
            ));
        }
        numerics
            .into_iter()
            .map(|p| columns[p].name.clone())
            .collect()
    } else {
        requested.to_vec()
    };

    let data = names
        .into_iter()
        .map(|name| {
            let values: Vec<f64> = position_of(columns, &name)
                .map(|p| {
                    rows.iter()
                        .filter_map(|row| row.get(p).and_then(Value::as_number))
                        .collect()
                })
                .unwrap_or_default();

            if values.is_empty() {
                // Columns without numeric readings still get a row.
                return ColumnSummary {
                    column: name,
                    count: 0,
                    mean: 0.0,
                    median: 0.0,
                    min: 0.0,
                    max: 0.0,
                    std: 0.0,
                };
            }

            ColumnSummary {
                column: name,
                count: values.len(),
                mean: round2(mean(&values)),
                median: round2(median(&values)),
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                std: round2(population_std(&values)),
            }
        })
        .collect();

    Ok((
        vec![
            "column".to_string(),
            "count".to_string(),
            "mean".to_string(),
            "median".to_string(),
            "min".to_string(),
            "max".to_string(),
            "std".to_string(),
        ],
        ChartData::Summaries(data),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::TypeInference;
    use crate::input::DataTable;

    fn make_snapshot(headers: &[&str], rows: &[&[&str]]) -> DatasetSnapshot {
        let table = DataTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        );
        let columns = TypeInference::new().infer_schema(&table);
        DatasetSnapshot::build(&table, columns)
    }

    fn category_names(payload: &ChartPayload) -> Vec<String> {
        match &payload.data {
            ChartData::Categories(entries) => entries.iter().map(|e| e.name.clone()).collect(),
            other => panic!("expected categories, got {:?}", other),
        }
    }

    #[test]
    fn test_chart_kind_parsing() {
        assert_eq!("bar".parse::<ChartKind>().unwrap(), ChartKind::Bar);
        assert_eq!("SUMMARY".parse::<ChartKind>().unwrap(), ChartKind::Summary);
        let err = "heatmap".parse::<ChartKind>().unwrap_err();
        assert!(err.to_string().contains("Unsupported chart type: heatmap"));
    }

    #[test]
    fn test_bar_counts_categories() {
        let snapshot = make_snapshot(
            &["city", "n"],
            &[
                &["Paris", "1"],
                &["Lyon", "2"],
                &["Paris", "3"],
                &["Nice", "4"],
                &["Paris", "5"],
            ],
        );
        let payload = project(&snapshot, ChartKind::Bar, &[], DEFAULT_CHART_LIMIT).unwrap();

        assert_eq!(payload.columns, vec!["name", "value"]);
        match payload.data {
            ChartData::Categories(entries) => {
                assert_eq!(entries[0], CategoryCount { name: "Paris".to_string(), value: 3 });
                assert_eq!(entries.len(), 3);
            }
            other => panic!("expected categories, got {:?}", other),
        }
    }

    #[test]
    fn test_bar_ties_keep_first_encountered_order() {
        let snapshot = make_snapshot(
            &["city"],
            &[&["Lyon"], &["Nice"], &["Lyon"], &["Nice"], &["Oslo"]],
        );
        let payload = project(&snapshot, ChartKind::Bar, &[], DEFAULT_CHART_LIMIT).unwrap();
        assert_eq!(category_names(&payload), vec!["Lyon", "Nice", "Oslo"]);
    }

    #[test]
    fn test_bar_missing_cells_count_as_unknown() {
        let snapshot = make_snapshot(&["city"], &[&["Paris"], &[""], &[""]]);
        let payload = project(&snapshot, ChartKind::Bar, &[], DEFAULT_CHART_LIMIT).unwrap();
        match payload.data {
            ChartData::Categories(entries) => {
                assert_eq!(entries[0], CategoryCount { name: "Unknown".to_string(), value: 2 });
            }
            other => panic!("expected categories, got {:?}", other),
        }
    }

    #[test]
    fn test_bar_limit_caps_rows_before_counting() {
        let rows: Vec<Vec<String>> = (0..10)
            .map(|i| vec![if i < 5 { "A" } else { "B" }.to_string()])
            .collect();
        let table = DataTable::new(vec!["k".to_string()], rows);
        let columns = TypeInference::new().infer_schema(&table);
        let snapshot = DatasetSnapshot::build(&table, columns);

        // Only the first five rows are visible, so B never appears.
        let payload = project(&snapshot, ChartKind::Bar, &[], 5).unwrap();
        match payload.data {
            ChartData::Categories(entries) => {
                assert_eq!(entries, vec![CategoryCount { name: "A".to_string(), value: 5 }]);
            }
            other => panic!("expected categories, got {:?}", other),
        }
    }

    #[test]
    fn test_bar_top_twenty_cap() {
        let rows: Vec<Vec<String>> = (0..30).map(|i| vec![format!("cat{}", i)]).collect();
        let table = DataTable::new(vec!["k".to_string()], rows);
        let columns = TypeInference::new().infer_schema(&table);
        let snapshot = DatasetSnapshot::build(&table, columns);

        let payload = project(&snapshot, ChartKind::Bar, &[], DEFAULT_CHART_LIMIT).unwrap();
        assert_eq!(category_names(&payload).len(), 20);
    }

    #[test]
    fn test_pie_top_ten_cap() {
        let rows: Vec<Vec<String>> = (0..15).map(|i| vec![format!("cat{}", i)]).collect();
        let table = DataTable::new(vec!["k".to_string()], rows);
        let columns = TypeInference::new().infer_schema(&table);
        let snapshot = DatasetSnapshot::build(&table, columns);

        let payload = project(&snapshot, ChartKind::Pie, &[], DEFAULT_CHART_LIMIT).unwrap();
        assert_eq!(category_names(&payload).len(), 10);
    }

    #[test]
    fn test_bar_probe_rejects_all_numeric_dataset() {
        let snapshot = make_snapshot(&["a", "b"], &[&["1", "2"], &["3", "4"]]);
        let err = project(&snapshot, ChartKind::Bar, &[], DEFAULT_CHART_LIMIT).unwrap_err();
        assert!(err
            .to_string()
            .contains("No suitable categorical columns found for bar chart"));
    }

    #[test]
    fn test_bar_unknown_requested_column_buckets_everything() {
        let snapshot = make_snapshot(&["city"], &[&["Paris"], &["Lyon"]]);
        let payload = project(
            &snapshot,
            ChartKind::Bar,
            &["nope".to_string()],
            DEFAULT_CHART_LIMIT,
        )
        .unwrap();
        match payload.data {
            ChartData::Categories(entries) => {
                assert_eq!(entries, vec![CategoryCount { name: "Unknown".to_string(), value: 2 }]);
            }
            other => panic!("expected categories, got {:?}", other),
        }
    }

    #[test]
    fn test_line_probes_date_and_numeric_columns() {
        let snapshot = make_snapshot(
            &["label", "day", "sales"],
            &[
                &["b", "2024-01-02", "20"],
                &["a", "2024-01-01", "10"],
                &["c", "2024-01-03", "30"],
            ],
        );
        let payload = project(&snapshot, ChartKind::Line, &[], DEFAULT_CHART_LIMIT).unwrap();

        assert_eq!(payload.columns, vec!["date", "value"]);
        match payload.data {
            ChartData::Series(points) => {
                let dates: Vec<&str> = points.iter().map(|p| p.date.as_str()).collect();
                assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
                assert_eq!(points[0].value, 10.0);
            }
            other => panic!("expected series, got {:?}", other),
        }
    }

    #[test]
    fn test_line_skips_rows_with_gaps() {
        let snapshot = make_snapshot(
            &["day", "sales"],
            &[
                &["2024-01-01", "10"],
                &["2024-01-02", ""],
                &["2024-01-03", "30"],
            ],
        );
        let payload = project(&snapshot, ChartKind::Line, &[], DEFAULT_CHART_LIMIT).unwrap();
        match payload.data {
            ChartData::Series(points) => assert_eq!(points.len(), 2),
            other => panic!("expected series, got {:?}", other),
        }
    }

    #[test]
    fn test_line_requires_date_and_numeric() {
        let snapshot = make_snapshot(&["city"], &[&["Paris"], &["Lyon"]]);
        let err = project(&snapshot, ChartKind::Line, &[], DEFAULT_CHART_LIMIT).unwrap_err();
        assert!(err
            .to_string()
            .contains("Line chart requires at least one date column and one numeric column"));
    }

    #[test]
    fn test_line_unknown_requested_columns_yield_empty_series() {
        let snapshot = make_snapshot(&["city"], &[&["Paris"], &["Lyon"]]);
        let requested = vec!["no1".to_string(), "no2".to_string()];
        let payload =
            project(&snapshot, ChartKind::Line, &requested, DEFAULT_CHART_LIMIT).unwrap();
        match payload.data {
            ChartData::Series(points) => assert!(points.is_empty()),
            other => panic!("expected series, got {:?}", other),
        }
    }

    #[test]
    fn test_area_accumulates_in_date_order() {
        let snapshot = make_snapshot(
            &["day", "sales"],
            &[
                &["2024-01-02", "20"],
                &["2024-01-01", "10"],
                &["2024-01-03", "30"],
            ],
        );
        let payload = project(&snapshot, ChartKind::Area, &[], DEFAULT_CHART_LIMIT).unwrap();

        assert_eq!(payload.columns, vec!["date", "value", "cumulative"]);
        match payload.data {
            ChartData::Cumulative(points) => {
                let totals: Vec<f64> = points.iter().map(|p| p.cumulative).collect();
                assert_eq!(totals, vec![10.0, 30.0, 60.0]);
            }
            other => panic!("expected cumulative series, got {:?}", other),
        }
    }

    #[test]
    fn test_scatter_pairs_two_numeric_columns() {
        let snapshot = make_snapshot(
            &["x", "y", "label"],
            &[&["1", "2", "a"], &["3", "4", "b"], &["5", "", "c"]],
        );
        let payload = project(&snapshot, ChartKind::Scatter, &[], DEFAULT_CHART_LIMIT).unwrap();

        assert_eq!(payload.columns, vec!["x", "y"]);
        match payload.data {
            ChartData::Points(points) => {
                assert_eq!(points, vec![
                    ScatterPoint { x: 1.0, y: 2.0 },
                    ScatterPoint { x: 3.0, y: 4.0 },
                ]);
            }
            other => panic!("expected points, got {:?}", other),
        }
    }

    #[test]
    fn test_scatter_requires_two_numeric_columns() {
        let snapshot = make_snapshot(&["n", "city"], &[&["1", "Paris"], &["2", "Lyon"]]);
        let err = project(&snapshot, ChartKind::Scatter, &[], DEFAULT_CHART_LIMIT).unwrap_err();
        assert!(err
            .to_string()
            .contains("Scatter chart requires at least two numeric columns"));
    }

    #[test]
    fn test_summary_statistics_per_column() {
        let snapshot = make_snapshot(
            &["x"],
            &[&["2"], &["4"], &["4"], &["4"], &["5"], &["5"], &["7"], &["9"]],
        );
        let payload = project(&snapshot, ChartKind::Summary, &[], DEFAULT_CHART_LIMIT).unwrap();

        match payload.data {
            ChartData::Summaries(rows) => {
                assert_eq!(rows.len(), 1);
                let s = &rows[0];
                assert_eq!(s.column, "x");
                assert_eq!(s.count, 8);
                assert_eq!(s.mean, 5.0);
                assert_eq!(s.median, 4.5);
                assert_eq!(s.min, 2.0);
                assert_eq!(s.max, 9.0);
                assert_eq!(s.std, 2.0);
            }
            other => panic!("expected summaries, got {:?}", other),
        }
    }

    #[test]
    fn test_summary_non_numeric_column_gets_zero_row() {
        let snapshot = make_snapshot(&["city", "n"], &[&["Paris", "1"], &["Lyon", "2"]]);
        let requested = vec!["city".to_string()];
        let payload =
            project(&snapshot, ChartKind::Summary, &requested, DEFAULT_CHART_LIMIT).unwrap();
        match payload.data {
            ChartData::Summaries(rows) => {
                assert_eq!(rows[0].count, 0);
                assert_eq!(rows[0].mean, 0.0);
            }
            other => panic!("expected summaries, got {:?}", other),
        }
    }

    #[test]
    fn test_summary_requires_numeric_columns() {
        let snapshot = make_snapshot(&["city"], &[&["Paris"], &["Lyon"]]);
        let err = project(&snapshot, ChartKind::Summary, &[], DEFAULT_CHART_LIMIT).unwrap_err();
        assert!(err
            .to_string()
            .contains("No numeric columns found for summary statistics"));
    }

    #[test]
    fn test_available_chart_types_for_mixed_schema() {
        let snapshot = make_snapshot(
            &["city", "day", "sales", "visits"],
            &[
                &["Paris", "2024-01-01", "10", "100"],
                &["Lyon", "2024-01-02", "20", "200"],
            ],
        );
        let available = available_chart_types(&snapshot.columns);
        let kinds: Vec<ChartKind> = available.iter().map(|d| d.chart_type).collect();

        assert_eq!(
            kinds,
            vec![
                ChartKind::Bar,
                ChartKind::Line,
                ChartKind::Pie,
                ChartKind::Scatter,
                ChartKind::Area,
                ChartKind::Summary,
            ]
        );
        assert_eq!(available[0].name, "Bar Chart");
        assert_eq!(available[0].description, "Compare categories");
        assert_eq!(available[0].suitable_columns, vec!["city"]);
        assert_eq!(available[3].suitable_columns, vec!["sales", "visits"]);
    }

    #[test]
    fn test_to_csv_quotes_delimiter_values() {
        let snapshot = make_snapshot(
            &["city"],
            &[&["Paris, France"], &["Paris, France"], &["Lyon"]],
        );
        let payload = project(&snapshot, ChartKind::Bar, &[], DEFAULT_CHART_LIMIT).unwrap();
        let csv = payload.to_csv().unwrap();

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("name,value"));
        assert_eq!(lines.next(), Some("\"Paris, France\",2"));
        assert_eq!(lines.next(), Some("Lyon,1"));
    }

    #[test]
    fn test_to_csv_summary_row() {
        let snapshot = make_snapshot(&["x"], &[&["2"], &["4"]]);
        let payload = project(&snapshot, ChartKind::Summary, &[], DEFAULT_CHART_LIMIT).unwrap();
        let csv = payload.to_csv().unwrap();

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("column,count,mean,median,min,max,std"));
        assert_eq!(lines.next(), Some("x,2,3,3,2,4,1"));
    }

    #[test]
    fn test_available_chart_types_numeric_only_schema() {
        let snapshot = make_snapshot(&["a", "b"], &[&["1", "2"], &["3", "4"]]);
        let kinds: Vec<ChartKind> = available_chart_types(&snapshot.columns)
            .iter()
            .map(|d| d.chart_type)
            .collect();
        // No categorical or date columns, so only numeric-backed kinds remain.
        assert_eq!(
            kinds,
            vec![ChartKind::Scatter, ChartKind::Area, ChartKind::Summary]
        );
    }
}
