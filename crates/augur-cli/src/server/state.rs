//! Application state for the API server: the dataset store and the engine.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use augur::{Augur, ColumnDescriptor, DatasetStatistics, Insight};

/// Processing state of an uploaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetStatus {
    Uploading,
    Processing,
    Completed,
    Error,
}

impl DatasetStatus {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetStatus::Uploading => "uploading",
            DatasetStatus::Processing => "processing",
            DatasetStatus::Completed => "completed",
            DatasetStatus::Error => "error",
        }
    }
}

/// One uploaded dataset and everything derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRecord {
    /// Unique identifier.
    pub id: String,
    /// Original upload file name.
    pub name: String,
    /// Where the uploaded bytes were stored.
    pub file_path: PathBuf,
    /// Source format (csv, xlsx, xls).
    pub file_type: String,
    /// Upload size in bytes.
    pub size_bytes: u64,
    /// Processing state.
    pub status: DatasetStatus,
    /// Error recorded by a failed processing run.
    pub error_message: Option<String>,
    /// Inferred column descriptors (set on completion).
    pub columns: Vec<ColumnDescriptor>,
    /// Descriptive statistics (set on completion).
    pub statistics: Option<DatasetStatistics>,
    /// Generated insights (set on completion, replaced by re-generation).
    pub insights: Vec<Insight>,
    pub row_count: usize,
    pub column_count: usize,
    pub uploaded_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub last_accessed: DateTime<Utc>,
}

impl DatasetRecord {
    /// Create a record for a fresh upload, not yet processed. The stored
    /// file path is derived from the generated id via `with_file_path`.
    pub fn new(name: impl Into<String>, file_type: impl Into<String>, size_bytes: u64) -> Self {
        let now = Utc::now();
        Self {
            id: generate_dataset_id(),
            name: name.into(),
            file_path: PathBuf::new(),
            file_type: file_type.into(),
            size_bytes,
            status: DatasetStatus::Processing,
            error_message: None,
            columns: Vec::new(),
            statistics: None,
            insights: Vec::new(),
            row_count: 0,
            column_count: 0,
            uploaded_at: now,
            processed_at: None,
            last_accessed: now,
        }
    }

    /// Set where the uploaded bytes live.
    pub fn with_file_path(mut self, file_path: PathBuf) -> Self {
        self.file_path = file_path;
        self
    }

    /// Whether analysis results are available.
    pub fn is_ready(&self) -> bool {
        self.status == DatasetStatus::Completed
    }
}

/// Generate a unique dataset ID.
fn generate_dataset_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    format!("ds_{:03}", COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Dataset records by id.
    pub datasets: Arc<RwLock<HashMap<String, DatasetRecord>>>,
    /// The analysis engine (owns the snapshot cache).
    pub engine: Arc<Augur>,
    /// Directory where uploads are stored.
    pub upload_dir: PathBuf,
}

impl AppState {
    /// Create new application state.
    pub fn new(upload_dir: PathBuf) -> Self {
        Self {
            datasets: Arc::new(RwLock::new(HashMap::new())),
            engine: Arc::new(Augur::new()),
            upload_dir,
        }
    }

    /// Insert a record.
    pub async fn insert(&self, record: DatasetRecord) {
        let mut datasets = self.datasets.write().await;
        datasets.insert(record.id.clone(), record);
    }

    /// Clone a record by id.
    pub async fn get(&self, id: &str) -> Option<DatasetRecord> {
        let datasets = self.datasets.read().await;
        datasets.get(id).cloned()
    }

    /// Clone a record by id, bumping its access time.
    pub async fn get_and_touch(&self, id: &str) -> Option<DatasetRecord> {
        let mut datasets = self.datasets.write().await;
        let record = datasets.get_mut(id)?;
        record.last_accessed = Utc::now();
        Some(record.clone())
    }

    /// Remove a record, returning it.
    pub async fn remove(&self, id: &str) -> Option<DatasetRecord> {
        let mut datasets = self.datasets.write().await;
        datasets.remove(id)
    }

    /// Apply an edit to a record in place. Returns false when the id is
    /// unknown.
    pub async fn update<F>(&self, id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut DatasetRecord),
    {
        let mut datasets = self.datasets.write().await;
        match datasets.get_mut(id) {
            Some(record) => {
                edit(record);
                true
            }
            None => false,
        }
    }

    /// Run the analysis pipeline for a stored upload and record the outcome.
    ///
    /// Called from a detached task: the record moves to `completed` or
    /// `error` exactly once; no lock is held while the engine works.
    pub async fn process_dataset(&self, id: String) {
        let Some(record) = self.get(&id).await else {
            return;
        };

        let engine = Arc::clone(&self.engine);
        let path = record.file_path.clone();
        let outcome =
            tokio::task::spawn_blocking(move || engine.analyze(&path)).await;

        match outcome {
            Ok(Ok(result)) => {
                log::info!(
                    "dataset {} processed: {} rows, {} insights",
                    id,
                    result.source.row_count,
                    result.insights.len()
                );
                self.update(&id, |record| {
                    record.status = DatasetStatus::Completed;
                    record.row_count = result.source.row_count;
                    record.column_count = result.source.column_count;
                    record.columns = result.columns;
                    record.statistics = Some(result.statistics);
                    record.insights = result.insights;
                    record.processed_at = Some(Utc::now());
                })
                .await;
            }
            Ok(Err(e)) => {
                log::error!("dataset {} processing failed: {}", id, e);
                self.update(&id, |record| {
                    record.status = DatasetStatus::Error;
                    record.error_message = Some(e.to_string());
                    record.processed_at = Some(Utc::now());
                })
                .await;
            }
            Err(e) => {
                log::error!("dataset {} processing task panicked: {}", id, e);
                self.update(&id, |record| {
                    record.status = DatasetStatus::Error;
                    record.error_message = Some("processing failed".to_string());
                    record.processed_at = Some(Utc::now());
                })
                .await;
            }
        }
    }
}
