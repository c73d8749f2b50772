//! Result export: every finished run is handed to each configured sink.
//!
//! Sinks are isolated from each other. A sink that fails is reported in the
//! [`ExportReport`] and logged, and the remaining sinks still run.

use std::path::PathBuf;

use tracing::{debug, error};

use crate::error::Result;
use crate::schema::BenchmarkRun;

pub mod csv;
pub mod store;

pub use self::csv::CsvSink;
pub use self::store::{JsonlStore, MemoryStore, RawRow, StoreSink, SummaryRow, TableStore};

pub const DEFAULT_RUN_LABEL: &str = "default";

/// Export settings for one session.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Tags every exported row and file path.
    pub run_label: String,
    /// Root directory for CSV files; `None` disables the CSV sink.
    pub csv_root: Option<PathBuf>,
    /// Directory for the JSON-lines table store; `None` disables it.
    pub store_dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            run_label: DEFAULT_RUN_LABEL.to_string(),
            csv_root: Some(PathBuf::from("exports")),
            store_dir: None,
        }
    }
}

pub trait ResultSink {
    fn name(&self) -> &'static str;

    fn export(&mut self, run: &BenchmarkRun, run_label: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub written: Vec<&'static str>,
    pub failed: Vec<(&'static str, String)>,
}

impl ExportReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Exporter {
    run_label: String,
    sinks: Vec<Box<dyn ResultSink>>,
}

impl Exporter {
    /// An exporter with no sinks.
    pub fn new(run_label: impl Into<String>) -> Self {
        Self {
            run_label: run_label.into(),
            sinks: Vec::new(),
        }
    }

    /// Sinks touch the filesystem only when a run is exported, so a bad
    /// path surfaces per run in the [`ExportReport`].
    pub fn from_config(cfg: &ExportConfig) -> Self {
        let mut exporter = Self::new(cfg.run_label.clone());
        if let Some(dir) = &cfg.store_dir {
            exporter = exporter.with_sink(StoreSink::new(JsonlStore::new(dir)));
        }
        if let Some(root) = &cfg.csv_root {
            exporter = exporter.with_sink(CsvSink::new(root));
        }
        exporter
    }

    /// Exporter writing to an in-process store only. The returned handle
    /// shares the store's tables.
    pub fn in_memory(run_label: impl Into<String>) -> (Self, MemoryStore) {
        let store = MemoryStore::default();
        let exporter = Self::new(run_label).with_sink(StoreSink::new(store.clone()));
        (exporter, store)
    }

    pub fn with_sink(mut self, sink: impl ResultSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn run_label(&self) -> &str {
        &self.run_label
    }

    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    pub fn export(&mut self, run: &BenchmarkRun) -> ExportReport {
        let mut report = ExportReport::default();
        for sink in &mut self.sinks {
            match sink.export(run, &self.run_label) {
                Ok(()) => {
                    debug!(sink = sink.name(), algorithm = %run.result.algorithm, "exported");
                    report.written.push(sink.name());
                }
                Err(err) => {
                    error!(sink = sink.name(), algorithm = %run.result.algorithm, %err, "export failed");
                    report.failed.push((sink.name(), err.to_string()));
                }
            }
        }
        report
    }
}
