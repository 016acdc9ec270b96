//! Detection passes that turn a dataset snapshot into insights.
//!
//! Each detector inspects the typed snapshot and emits zero or more
//! [`Insight`] records. Thresholds are fixed: a detector either finds
//! something worth reporting or stays silent.

use std::panic::{self, AssertUnwindSafe};

use chrono::NaiveDateTime;
use serde_json::json;

use crate::schema::{ColumnType, DatasetSnapshot};
use crate::stats::core::{mean, pearson, population_std, slope};
use crate::stats::count_missing_values;
use crate::value::{self, Value};

use super::model::{Category, Insight, InsightType, Level, Recommendation, Severity};

/// Kinds run when a request does not name any.
pub const DEFAULT_KINDS: &[InsightType] = &[
    InsightType::Summary,
    InsightType::Anomaly,
    InsightType::Trend,
];

/// A detection pass over a dataset snapshot.
pub trait Detector {
    /// Name of this detector.
    fn name(&self) -> &'static str;

    /// Inspect the snapshot and return any insights found.
    fn detect(&self, snapshot: &DatasetSnapshot) -> Vec<Insight>;
}

/// Build the detector for one insight kind.
pub fn detector_for(kind: InsightType) -> Box<dyn Detector> {
    match kind {
        InsightType::Summary => Box::new(SummaryDetector),
        InsightType::Anomaly => Box::new(AnomalyDetector),
        InsightType::Trend => Box::new(TrendDetector),
        InsightType::Correlation => Box::new(CorrelationDetector),
        InsightType::Prediction => Box::new(PredictionDetector),
        InsightType::Recommendation => Box::new(RecommendationDetector),
    }
}

/// Run the detectors for the requested kinds against a snapshot.
///
/// Detectors run in isolation: a panicking detector contributes no insights
/// and the remaining detectors still run.
pub fn run_detectors(snapshot: &DatasetSnapshot, kinds: &[InsightType]) -> Vec<Insight> {
    let detectors: Vec<Box<dyn Detector>> = kinds.iter().copied().map(detector_for).collect();
    run_isolated(&detectors, snapshot)
}

fn run_isolated(detectors: &[Box<dyn Detector>], snapshot: &DatasetSnapshot) -> Vec<Insight> {
    let mut insights = Vec::new();
    for detector in detectors {
        if let Ok(found) = panic::catch_unwind(AssertUnwindSafe(|| detector.detect(snapshot))) {
            insights.extend(found);
        }
    }
    insights
}

/// Present numeric readings of one column, in row order.
fn numeric_values(snapshot: &DatasetSnapshot, position: usize) -> Vec<f64> {
    snapshot
        .column_values(position)
        .filter_map(Value::as_number)
        .collect()
}

/// Paired (date, number) readings where both cells are present, sorted by date.
fn date_value_series(
    snapshot: &DatasetSnapshot,
    date_position: usize,
    value_position: usize,
) -> Vec<(NaiveDateTime, f64)> {
    let mut series: Vec<(NaiveDateTime, f64)> = snapshot
        .rows
        .iter()
        .filter_map(|row| {
            let date = row.get(date_position)?.as_date()?;
            let value = row.get(value_position)?.as_number()?;
            Some((date, value))
        })
        .collect();
    series.sort_by_key(|(date, _)| *date);
    series
}

fn missing_percentage(snapshot: &DatasetSnapshot) -> (usize, usize, f64) {
    let total_cells = snapshot.row_count() * snapshot.column_count();
    let missing = count_missing_values(snapshot);
    let pct = if total_cells == 0 {
        0.0
    } else {
        missing as f64 / total_cells as f64 * 100.0
    };
    (missing, total_cells, pct)
}

/// Flags datasets with heavy missing data and notably large datasets.
pub struct SummaryDetector;

impl Detector for SummaryDetector {
    fn name(&self) -> &'static str {
        "summary"
    }

    fn detect(&self, snapshot: &DatasetSnapshot) -> Vec<Insight> {
        let mut insights = Vec::new();
        let (missing, total_cells, missing_pct) = missing_percentage(snapshot);

        if missing_pct > 10.0 {
            let severity = if missing_pct > 20.0 {
                Severity::High
            } else {
                Severity::Medium
            };
            insights.push(
                Insight::new(
                    InsightType::Summary,
                    "High Missing Data Detected",
                    format!(
                        "{:.1}% of your data contains missing values. \
                         Consider data cleaning strategies.",
                        missing_pct
                    ),
                )
                .with_confidence(0.9)
                .with_severity(severity)
                .with_category(Category::DataQuality)
                .with_data(
                    vec![
                        "Missing Values".to_string(),
                        "Total Values".to_string(),
                        "Percentage".to_string(),
                    ],
                    json!([missing, total_cells, missing_pct]),
                )
                .with_recommendations(vec![Recommendation::new(
                    "Data Cleaning",
                    "Implement data imputation strategies for missing values",
                    Level::High,
                    Level::Medium,
                )])
                .with_tags(["data-quality", "missing-values"]),
            );
        }

        if snapshot.row_count() > 10_000 {
            insights.push(
                Insight::new(
                    InsightType::Summary,
                    "Large Dataset Detected",
                    format!(
                        "Your dataset contains {} rows, which is excellent for robust analysis.",
                        snapshot.row_count()
                    ),
                )
                .with_confidence(0.95)
                .with_severity(Severity::Low)
                .with_category(Category::BusinessInsight)
                .with_data(
                    vec![
                        "Rows".to_string(),
                        "Columns".to_string(),
                        "Total Cells".to_string(),
                    ],
                    json!([snapshot.row_count(), snapshot.column_count(), total_cells]),
                )
                .with_recommendations(vec![Recommendation::new(
                    "Advanced Analytics",
                    "Consider using machine learning models for deeper insights",
                    Level::High,
                    Level::High,
                )])
                .with_tags(["large-dataset", "analytics-opportunity"]),
            );
        }

        insights
    }
}

/// Flags values more than two standard deviations from their column mean.
pub struct AnomalyDetector;

impl Detector for AnomalyDetector {
    fn name(&self) -> &'static str {
        "anomaly"
    }

    fn detect(&self, snapshot: &DatasetSnapshot) -> Vec<Insight> {
        let mut insights = Vec::new();

        for column in snapshot.columns_of_type(ColumnType::Number) {
            let values = numeric_values(snapshot, column.position);
            if values.len() < 10 {
                continue;
            }

            let avg = mean(&values);
            let std = population_std(&values);
            // Strictly greater than two sigma; boundary values are not outliers.
            let outliers: Vec<f64> = values
                .iter()
                .copied()
                .filter(|v| (v - avg).abs() > 2.0 * std)
                .collect();
            if outliers.is_empty() {
                continue;
            }

            let outlier_pct = outliers.len() as f64 / values.len() as f64 * 100.0;
            let severity = if outlier_pct > 5.0 {
                Severity::High
            } else {
                Severity::Medium
            };
            let evidence: Vec<serde_json::Value> = outliers
                .iter()
                .map(|v| json!([v, (v - avg).abs()]))
                .collect();

            insights.push(
                Insight::new(
                    InsightType::Anomaly,
                    format!("Anomalies Detected in {}", column.name),
                    format!(
                        "Found {} outliers ({:.1}%) in {}. These may indicate data quality \
                         issues or interesting patterns.",
                        outliers.len(),
                        outlier_pct,
                        column.name
                    ),
                )
                .with_confidence(0.85)
                .with_severity(severity)
                .with_category(Category::DataQuality)
                .with_data(
                    vec!["Value".to_string(), "Deviation from Mean".to_string()],
                    json!(evidence),
                )
                .with_recommendations(vec![Recommendation::new(
                    "Investigate Outliers",
                    "Review these values to determine if they are errors or legitimate anomalies",
                    Level::Medium,
                    Level::Low,
                )])
                .with_tags([
                    "anomaly".to_string(),
                    "outliers".to_string(),
                    column.name.to_lowercase(),
                ]),
            );
        }

        insights
    }
}

/// Flags a sustained direction in the first numeric column over the first
/// date column.
pub struct TrendDetector;

impl Detector for TrendDetector {
    fn name(&self) -> &'static str {
        "trend"
    }

    fn detect(&self, snapshot: &DatasetSnapshot) -> Vec<Insight> {
        let (Some(date_col), Some(numeric_col)) = (
            snapshot.first_of_type(ColumnType::Date),
            snapshot.first_of_type(ColumnType::Number),
        ) else {
            return Vec::new();
        };

        let series = date_value_series(snapshot, date_col.position, numeric_col.position);
        if series.len() < 5 {
            return Vec::new();
        }

        let values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();
        let trend = slope(&values);
        if trend.abs() <= 0.1 {
            return Vec::new();
        }

        let direction = if trend > 0.0 {
            "increasing"
        } else {
            "decreasing"
        };
        let headline = if trend > 0.0 {
            "Increasing Trend Detected"
        } else {
            "Decreasing Trend Detected"
        };
        let points: Vec<serde_json::Value> = series
            .iter()
            .map(|(date, v)| json!([value::format_date(*date), v]))
            .collect();

        vec![
            Insight::new(
                InsightType::Trend,
                headline,
                format!(
                    "{} shows a {} trend over time. This could indicate important \
                     business patterns.",
                    numeric_col.name, direction
                ),
            )
            .with_confidence(0.8)
            .with_severity(Severity::Medium)
            .with_category(Category::TrendAnalysis)
            .with_data(
                vec![date_col.name.clone(), numeric_col.name.clone()],
                json!(points),
            )
            .with_recommendations(vec![Recommendation::new(
                "Monitor Trend",
                "Continue tracking this trend to understand its business impact",
                Level::Medium,
                Level::Low,
            )])
            .with_tags([
                "trend".to_string(),
                "time-series".to_string(),
                numeric_col.name.to_lowercase(),
            ]),
        ]
    }
}

/// Flags strongly correlated numeric column pairs.
pub struct CorrelationDetector;

impl Detector for CorrelationDetector {
    fn name(&self) -> &'static str {
        "correlation"
    }

    fn detect(&self, snapshot: &DatasetSnapshot) -> Vec<Insight> {
        let mut insights = Vec::new();
        let numeric = snapshot.columns_of_type(ColumnType::Number);

        for (i, first) in numeric.iter().enumerate() {
            for second in &numeric[i + 1..] {
                // Only rows where both cells are present count as a pair.
                let pairs: Vec<(f64, f64)> = snapshot
                    .rows
                    .iter()
                    .filter_map(|row| {
                        let x = row.get(first.position)?.as_number()?;
                        let y = row.get(second.position)?.as_number()?;
                        Some((x, y))
                    })
                    .collect();
                if pairs.len() < 10 {
                    continue;
                }

                let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();
                let r = pearson(&xs, &ys);
                if r.abs() <= 0.7 {
                    continue;
                }

                let kind = if r > 0.0 { "positive" } else { "negative" };
                let evidence: Vec<serde_json::Value> = pairs
                    .iter()
                    .take(50)
                    .map(|(x, y)| json!([x, y]))
                    .collect();

                insights.push(
                    Insight::new(
                        InsightType::Correlation,
                        format!("Strong {} correlation found", kind),
                        format!(
                            "{} and {} have a strong {} correlation ({:.2}). This \
                             relationship could be valuable for analysis.",
                            first.name, second.name, kind, r
                        ),
                    )
                    .with_confidence(0.85)
                    .with_severity(Severity::Medium)
                    .with_category(Category::BusinessInsight)
                    .with_data(vec![first.name.clone(), second.name.clone()], json!(evidence))
                    .with_recommendations(vec![Recommendation::new(
                        "Investigate Relationship",
                        "Explore why these variables are correlated and how to leverage \
                         this insight",
                        Level::High,
                        Level::Medium,
                    )])
                    .with_tags([
                        "correlation".to_string(),
                        first.name.to_lowercase(),
                        second.name.to_lowercase(),
                    ]),
                );
            }
        }

        insights
    }
}

/// Projects the first numeric column three steps past its last observation.
pub struct PredictionDetector;

impl Detector for PredictionDetector {
    fn name(&self) -> &'static str {
        "prediction"
    }

    fn detect(&self, snapshot: &DatasetSnapshot) -> Vec<Insight> {
        let (Some(date_col), Some(numeric_col)) = (
            snapshot.first_of_type(ColumnType::Date),
            snapshot.first_of_type(ColumnType::Number),
        ) else {
            return Vec::new();
        };

        let series = date_value_series(snapshot, date_col.position, numeric_col.position);
        if series.len() < 10 {
            return Vec::new();
        }

        let values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();
        let trend = slope(&values);
        if trend.abs() <= 0.05 {
            return Vec::new();
        }

        let Some(&last) = values.last() else {
            return Vec::new();
        };
        let predicted = last + trend * 3.0;

        vec![
            Insight::new(
                InsightType::Prediction,
                format!("Prediction for {}", numeric_col.name),
                format!(
                    "Based on current trends, {} is predicted to be {:.2} in the next period.",
                    numeric_col.name, predicted
                ),
            )
            .with_confidence(0.7)
            .with_severity(Severity::Medium)
            .with_category(Category::BusinessInsight)
            .with_data(
                vec![
                    "Current Value".to_string(),
                    "Predicted Value".to_string(),
                    "Trend".to_string(),
                ],
                json!([[last, predicted, trend]]),
            )
            .with_recommendations(vec![Recommendation::new(
                "Validate Prediction",
                "Use this prediction to inform business decisions, but validate with \
                 additional data",
                Level::High,
                Level::Medium,
            )])
            .with_tags([
                "prediction".to_string(),
                "forecasting".to_string(),
                numeric_col.name.to_lowercase(),
            ]),
        ]
    }
}

/// Emits general data quality and analytics recommendations.
pub struct RecommendationDetector;

impl Detector for RecommendationDetector {
    fn name(&self) -> &'static str {
        "recommendation"
    }

    fn detect(&self, snapshot: &DatasetSnapshot) -> Vec<Insight> {
        let mut insights = Vec::new();
        let (missing, _, missing_pct) = missing_percentage(snapshot);

        if missing_pct > 5.0 {
            insights.push(
                Insight::new(
                    InsightType::Recommendation,
                    "Improve Data Quality",
                    "Your dataset has missing values that could affect analysis accuracy.",
                )
                .with_confidence(0.9)
                .with_severity(Severity::Medium)
                .with_category(Category::DataQuality)
                .with_data(
                    vec!["Missing Values".to_string(), "Percentage".to_string()],
                    json!([missing, missing_pct]),
                )
                .with_recommendations(vec![
                    Recommendation::new(
                        "Data Cleaning",
                        "Implement data validation and cleaning procedures",
                        Level::High,
                        Level::Medium,
                    ),
                    Recommendation::new(
                        "Data Collection",
                        "Improve data collection processes to reduce missing values",
                        Level::High,
                        Level::High,
                    ),
                ])
                .with_tags(["data-quality", "recommendations"]),
            );
        }

        if snapshot.row_count() > 1_000 {
            insights.push(
                Insight::new(
                    InsightType::Recommendation,
                    "Advanced Analytics Opportunity",
                    "Your dataset size supports advanced analytics and machine learning.",
                )
                .with_confidence(0.8)
                .with_severity(Severity::Low)
                .with_category(Category::BusinessInsight)
                .with_data(
                    vec!["Dataset Size".to_string(), "Analytics Level".to_string()],
                    json!([snapshot.row_count(), "Advanced"]),
                )
                .with_recommendations(vec![
                    Recommendation::new(
                        "Machine Learning",
                        "Consider implementing ML models for predictive analytics",
                        Level::High,
                        Level::High,
                    ),
                    Recommendation::new(
                        "Real-time Analytics",
                        "Set up real-time data processing for immediate insights",
                        Level::Medium,
                        Level::Medium,
                    ),
                ])
                .with_tags(["advanced-analytics", "machine-learning"]),
            );
        }

        insights
    }
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

    fn numeric_rows(values: &[&str]) -> Vec<Vec<String>> {
        values.iter().map(|v| vec![v.to_string()]).collect()
    }

    fn numeric_snapshot(name: &str, values: &[&str]) -> DatasetSnapshot {
        let table = DataTable::new(vec![name.to_string()], numeric_rows(values));
        let columns = TypeInference::new().infer_schema(&table);
        DatasetSnapshot::build(&table, columns)
    }

    #[test]
    fn test_summary_flags_high_missing_data() {
        let snapshot = make_snapshot(
            &["a", "b"],
            &[
                &["1", ""],
                &["2", ""],
                &["3", "x"],
                &["4", "y"],
            ],
        );
        // 2 of 8 cells missing = 25%.
        let insights = SummaryDetector.detect(&snapshot);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "High Missing Data Detected");
        assert_eq!(insights[0].severity, Severity::High);
        assert!(insights[0].description.starts_with("25.0%"));
    }

    #[test]
    fn test_summary_silent_on_clean_small_data() {
        let snapshot = make_snapshot(&["a"], &[&["1"], &["2"], &["3"]]);
        assert!(SummaryDetector.detect(&snapshot).is_empty());
    }

    #[test]
    fn test_anomaly_requires_ten_values() {
        let snapshot = numeric_snapshot("x", &["1", "2", "3", "100"]);
        assert!(AnomalyDetector.detect(&snapshot).is_empty());
    }

    #[test]
    fn test_anomaly_flags_extreme_value() {
        let mut values = vec!["10"; 11];
        values.push("1000");
        let snapshot = numeric_snapshot("price", &values);

        let insights = AnomalyDetector.detect(&snapshot);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Anomalies Detected in price");
        assert_eq!(insights[0].severity, Severity::High);
        assert!(insights[0].tags.contains(&"price".to_string()));
    }

    #[test]
    fn test_anomaly_boundary_value_not_flagged() {
        // Mean 5, sigma 2: the 9s sit at exactly mean + 2 sigma, and the
        // threshold is strict.
        let base = ["2", "4", "4", "4", "5", "5", "7", "9"];
        let mut values = Vec::new();
        values.extend_from_slice(&base);
        values.extend_from_slice(&base);
        let snapshot = numeric_snapshot("x", &values);

        let parsed = numeric_values(&snapshot, 0);
        assert_eq!(population_std(&parsed), 2.0);
        assert!(AnomalyDetector.detect(&snapshot).is_empty());
    }

    #[test]
    fn test_trend_detects_increase() {
        let rows: Vec<Vec<String>> = (1..=6)
            .map(|i| vec![format!("2024-01-{:02}", i), (i * 10).to_string()])
            .collect();
        let table = DataTable::new(vec!["day".to_string(), "sales".to_string()], rows);
        let columns = TypeInference::new().infer_schema(&table);
        let snapshot = DatasetSnapshot::build(&table, columns);

        let insights = TrendDetector.detect(&snapshot);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Increasing Trend Detected");
        assert_eq!(insights[0].category, Category::TrendAnalysis);
        assert_eq!(insights[0].data.columns, vec!["day", "sales"]);
    }

    #[test]
    fn test_trend_sorts_by_date_before_fitting() {
        // Rows arrive shuffled; in date order the series rises steadily.
        let snapshot = make_snapshot(
            &["day", "n"],
            &[
                &["2024-01-03", "30"],
                &["2024-01-01", "10"],
                &["2024-01-05", "50"],
                &["2024-01-02", "20"],
                &["2024-01-04", "40"],
            ],
        );
        let insights = TrendDetector.detect(&snapshot);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Increasing Trend Detected");
    }

    #[test]
    fn test_trend_needs_five_points() {
        let snapshot = make_snapshot(
            &["day", "n"],
            &[
                &["2024-01-01", "10"],
                &["2024-01-02", "20"],
                &["2024-01-03", "30"],
                &["2024-01-04", "40"],
            ],
        );
        assert!(TrendDetector.detect(&snapshot).is_empty());
    }

    #[test]
    fn test_correlation_perfect_positive() {
        let rows: Vec<Vec<String>> = (1..=10)
            .map(|i| vec![i.to_string(), (i * 2).to_string()])
            .collect();
        let table = DataTable::new(vec!["a".to_string(), "b".to_string()], rows);
        let columns = TypeInference::new().infer_schema(&table);
        let snapshot = DatasetSnapshot::build(&table, columns);

        let insights = CorrelationDetector.detect(&snapshot);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Strong positive correlation found");
        assert!(insights[0].description.contains("(1.00)"));
    }

    #[test]
    fn test_correlation_skips_rows_with_gaps() {
        // Nine complete pairs plus one row with a gap: below the pair minimum.
        let mut rows: Vec<Vec<String>> = (1..=9)
            .map(|i| vec![i.to_string(), (i * 2).to_string()])
            .collect();
        rows.push(vec!["10".to_string(), "".to_string()]);
        let table = DataTable::new(vec!["a".to_string(), "b".to_string()], rows);
        let columns = TypeInference::new().infer_schema(&table);
        let snapshot = DatasetSnapshot::build(&table, columns);

        assert!(CorrelationDetector.detect(&snapshot).is_empty());
    }

    #[test]
    fn test_prediction_projects_three_steps() {
        let rows: Vec<Vec<String>> = (1..=10)
            .map(|i| vec![format!("2024-01-{:02}", i), (i * 10).to_string()])
            .collect();
        let table = DataTable::new(vec!["day".to_string(), "sales".to_string()], rows);
        let columns = TypeInference::new().infer_schema(&table);
        let snapshot = DatasetSnapshot::build(&table, columns);

        let insights = PredictionDetector.detect(&snapshot);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Prediction for sales");
        // Slope 10 per step, last value 100, projected 100 + 10 * 3.
        assert!(insights[0].description.contains("130.00"));
    }

    #[test]
    fn test_recommendation_thresholds() {
        let snapshot = make_snapshot(
            &["a", "b"],
            &[&["1", ""], &["2", "x"], &["3", "y"], &["4", "z"]],
        );
        // 1 of 8 cells missing = 12.5%, above the 5% advisory threshold.
        let insights = RecommendationDetector.detect(&snapshot);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Improve Data Quality");
        assert_eq!(insights[0].recommendations.len(), 2);
    }

    #[test]
    fn test_run_detectors_default_kinds() {
        let snapshot = make_snapshot(&["a"], &[&["1"], &["2"], &["3"]]);
        // Clean tiny dataset triggers nothing, but every default detector runs.
        let insights = run_detectors(&snapshot, DEFAULT_KINDS);
        assert!(insights.is_empty());
    }

    #[test]
    fn test_panicking_detector_is_isolated() {
        struct PanickingDetector;
        impl Detector for PanickingDetector {
            fn name(&self) -> &'static str {
                "panicking"
            }
            fn detect(&self, _snapshot: &DatasetSnapshot) -> Vec<Insight> {
                panic!("boom");
            }
        }

        let snapshot = make_snapshot(
            &["a", "b"],
            &[&["1", ""], &["2", ""], &["3", "x"], &["4", "y"]],
        );
        let detectors: Vec<Box<dyn Detector>> = vec![
            Box::new(PanickingDetector),
            Box::new(SummaryDetector),
        ];

        let insights = run_isolated(&detectors, &snapshot);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "High Missing Data Detected");
    }
}
