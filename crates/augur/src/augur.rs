//! Main Augur struct and public API.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::chart::{self, ChartKind, ChartPayload, ChartTypeDescriptor};
use crate::error::Result;
use crate::inference::TypeInference;
use crate::input::{Parser, ParserConfig, SourceMetadata};
use crate::insight::{run_detectors, Insight, InsightType, DEFAULT_KINDS};
use crate::schema::{ColumnDescriptor, DatasetSnapshot};
use crate::stats::{compute_statistics, DatasetStatistics};

/// Configuration for Augur analysis.
#[derive(Debug, Clone)]
pub struct AugurConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Insight kinds generated when a request does not name any.
    pub default_insights: Vec<InsightType>,
    /// Row cap applied to chart projections when a request has none.
    pub chart_limit: usize,
}

impl Default for AugurConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            default_insights: DEFAULT_KINDS.to_vec(),
            chart_limit: chart::DEFAULT_CHART_LIMIT,
        }
    }
}

/// Result of analyzing a data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// Inferred column descriptors.
    pub columns: Vec<ColumnDescriptor>,
    /// Descriptive statistics.
    pub statistics: DatasetStatistics,
    /// Generated insights.
    pub insights: Vec<Insight>,
}

/// Cache of typed snapshots keyed by content fingerprint.
///
/// Each fingerprint owns its own slot mutex: concurrent requests for the same
/// content type it once and share the result, while requests for different
/// content proceed independently. A failed build leaves the slot empty.
struct SnapshotCache {
    slots: Mutex<HashMap<String, Arc<Mutex<Option<Arc<DatasetSnapshot>>>>>>,
}

impl SnapshotCache {
    fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, key: &str) -> Arc<Mutex<Option<Arc<DatasetSnapshot>>>> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.entry(key.to_string()).or_default().clone()
    }

    fn get_or_build<F>(&self, key: &str, build: F) -> Result<Arc<DatasetSnapshot>>
    where
        F: FnOnce() -> Result<DatasetSnapshot>,
    {
        let slot = self.slot(key);
        let mut guard = slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(snapshot) = guard.as_ref() {
            return Ok(Arc::clone(snapshot));
        }
        let snapshot = Arc::new(build()?);
        *guard = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}

/// The main Augur analysis engine.
pub struct Augur {
    config: AugurConfig,
    parser: Parser,
    inference: TypeInference,
    snapshots: SnapshotCache,
}

impl Augur {
    /// Create a new Augur instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(AugurConfig::default())
    }

    /// Create an Augur instance with custom configuration.
    pub fn with_config(config: AugurConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());

        Self {
            config,
            parser,
            inference: TypeInference::new(),
            snapshots: SnapshotCache::new(),
        }
    }

    /// Parse a file and build (or reuse) its typed snapshot.
    ///
    /// The file is re-read on every call so edits are picked up; typing is
    /// reused whenever the content fingerprint matches a cached snapshot.
    pub fn snapshot(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(Arc<DatasetSnapshot>, SourceMetadata)> {
        let (table, source) = self.parser.parse_file(path.as_ref())?;
        let snapshot = self.snapshots.get_or_build(&source.hash, || {
            let columns = self.inference.infer_schema(&table);
            Ok(DatasetSnapshot::build(&table, columns))
        })?;
        Ok((snapshot, source))
    }

    /// Analyze a data file: infer its schema, compute statistics and run the
    /// default insight detectors.
    pub fn analyze(&self, path: impl AsRef<Path>) -> Result<AnalysisResult> {
        let (snapshot, source) = self.snapshot(path)?;
        let statistics = compute_statistics(&snapshot);
        let insights = run_detectors(&snapshot, &self.config.default_insights);

        Ok(AnalysisResult {
            source,
            columns: snapshot.columns.clone(),
            statistics,
            insights,
        })
    }

    /// Compute descriptive statistics for a data file.
    pub fn statistics(&self, path: impl AsRef<Path>) -> Result<DatasetStatistics> {
        let (snapshot, _) = self.snapshot(path)?;
        Ok(compute_statistics(&snapshot))
    }

    /// Run insight detectors against a data file. An empty `kinds` slice
    /// selects the configured defaults.
    pub fn insights(&self, path: impl AsRef<Path>, kinds: &[InsightType]) -> Result<Vec<Insight>> {
        let (snapshot, _) = self.snapshot(path)?;
        let kinds = if kinds.is_empty() {
            &self.config.default_insights
        } else {
            kinds
        };
        Ok(run_detectors(&snapshot, kinds))
    }

    /// Project a data file into a chart payload. `limit` caps the rows
    /// considered; `None` selects the configured default.
    pub fn chart(
        &self,
        path: impl AsRef<Path>,
        kind: ChartKind,
        columns: &[String],
        limit: Option<usize>,
    ) -> Result<ChartPayload> {
        let (snapshot, _) = self.snapshot(path)?;
        chart::project(
            &snapshot,
            kind,
            columns,
            limit.unwrap_or(self.config.chart_limit),
        )
    }

    /// The chart kinds a data file's schema can support.
    pub fn available_charts(&self, path: impl AsRef<Path>) -> Result<Vec<ChartTypeDescriptor>> {
        let (snapshot, _) = self.snapshot(path)?;
        Ok(chart::available_chart_types(&snapshot.columns))
    }
}

impl Default for Augur {
    fn default() -> Self {
        Self::new()
    }
}
