//! Insight generation: typed records plus the detection passes that
//! produce them.

mod detectors;
mod model;

pub use detectors::{
    detector_for, run_detectors, AnomalyDetector, CorrelationDetector, Detector,
    PredictionDetector, RecommendationDetector, SummaryDetector, TrendDetector, DEFAULT_KINDS,
};
pub use model::{Category, Insight, InsightData, InsightType, Level, Recommendation, Severity};
