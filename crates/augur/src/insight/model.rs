//! Insight records produced by the detectors.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Kind of insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Summary,
    Anomaly,
    Trend,
    Correlation,
    Prediction,
    Recommendation,
}

impl InsightType {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Summary => "summary",
            InsightType::Anomaly => "anomaly",
            InsightType::Trend => "trend",
            InsightType::Correlation => "correlation",
            InsightType::Prediction => "prediction",
            InsightType::Recommendation => "recommendation",
        }
    }

    /// Days until an insight of this type expires.
    fn expiry_days(&self) -> i64 {
        match self {
            InsightType::Prediction => 7,
            _ => 30,
        }
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(InsightType::Summary),
            "anomaly" => Ok(InsightType::Anomaly),
            "trend" => Ok(InsightType::Trend),
            "correlation" => Ok(InsightType::Correlation),
            "prediction" => Ok(InsightType::Prediction),
            "recommendation" => Ok(InsightType::Recommendation),
            other => Err(format!("unknown insight type: {}", other)),
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// Broad category an insight belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    DataQuality,
    BusinessInsight,
    Performance,
    Security,
    TrendAnalysis,
}

impl Category {
    /// Canonical snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::DataQuality => "data_quality",
            Category::BusinessInsight => "business_insight",
            Category::Performance => "performance",
            Category::Security => "security",
            Category::TrendAnalysis => "trend_analysis",
        }
    }
}

/// Scale used for recommendation impact and effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

/// A suggested follow-up action attached to an insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub description: String,
    pub impact: Level,
    pub effort: Level,
}

impl Recommendation {
    /// Create a recommendation.
    pub fn new(
        action: impl Into<String>,
        description: impl Into<String>,
        impact: Level,
        effort: Level,
    ) -> Self {
        Self {
            action: action.into(),
            description: description.into(),
            impact,
            effort,
        }
    }
}

/// Tabular evidence attached to an insight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightData {
    /// Display column names for the values.
    pub columns: Vec<String>,
    /// Row-like values, shape depends on the detector.
    pub values: JsonValue,
}

/// A structured observation produced by a detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    /// Unique identifier for this insight.
    pub id: String,
    /// Kind of insight.
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    /// Short headline.
    pub title: String,
    /// Human-readable description.
    pub description: String,
    /// Fixed per-detector confidence (0.0-1.0).
    pub confidence: f64,
    /// Severity level.
    pub severity: Severity,
    /// Category.
    pub category: Category,
    /// Supporting data.
    pub data: InsightData,
    /// Suggested follow-up actions.
    pub recommendations: Vec<Recommendation>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Soft-delete flag.
    pub is_active: bool,
    /// When the insight was generated.
    pub generated_at: DateTime<Utc>,
    /// When the insight expires (7 days for predictions, 30 otherwise).
    pub expires_at: DateTime<Utc>,
}

impl Insight {
    /// Create a new insight with defaults for the optional parts.
    pub fn new(
        insight_type: InsightType,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let generated_at = Utc::now();
        Self {
            id: generate_insight_id(),
            insight_type,
            title: title.into(),
            description: description.into(),
            confidence: 0.8,
            severity: Severity::Medium,
            category: Category::BusinessInsight,
            data: InsightData::default(),
            recommendations: Vec::new(),
            tags: Vec::new(),
            is_active: true,
            generated_at,
            expires_at: generated_at + Duration::days(insight_type.expiry_days()),
        }
    }

    /// Set the confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Attach supporting data.
    pub fn with_data(mut self, columns: Vec<String>, values: JsonValue) -> Self {
        self.data = InsightData { columns, values };
        self
    }

    /// Attach recommendations.
    pub fn with_recommendations(mut self, recommendations: Vec<Recommendation>) -> Self {
        self.recommendations = recommendations;
        self
    }

    /// Attach tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the insight has passed its expiry date.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Generate a unique insight ID.
fn generate_insight_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    format!("ins_{:03}", COUNTER.fetch_add(1, Ordering::SeqCst))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_insight() {
        let insight = Insight::new(
            InsightType::Anomaly,
            "Anomalies Detected in price",
            "Found 3 outliers",
        )
        .with_confidence(0.85)
        .with_severity(Severity::High)
        .with_category(Category::DataQuality)
        .with_tags(["anomaly", "outliers"]);

        assert!(insight.id.starts_with("ins_"));
        assert_eq!(insight.severity, Severity::High);
        assert!(insight.is_active);
        assert!(!insight.is_expired());
    }

    #[test]
    fn test_expiry_window_by_type() {
        let prediction = Insight::new(InsightType::Prediction, "p", "d");
        let summary = Insight::new(InsightType::Summary, "s", "d");

        assert_eq!(
            (prediction.expires_at - prediction.generated_at).num_days(),
            7
        );
        assert_eq!((summary.expires_at - summary.generated_at).num_days(), 30);
    }

    #[test]
    fn test_insight_type_round_trip() {
        for name in [
            "summary",
            "anomaly",
            "trend",
            "correlation",
            "prediction",
            "recommendation",
        ] {
            let parsed: InsightType = name.parse().unwrap();
            assert_eq!(parsed.as_str(), name);
        }
        assert!("sentiment".parse::<InsightType>().is_err());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_serializes_with_lowercase_type() {
        let insight = Insight::new(InsightType::Trend, "t", "d");
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "trend");
        assert_eq!(json["severity"], "medium");
    }
}
