//! Structured-store export: summary and raw-timing rows in two tables.
//!
//! [`TableStore`] is the seam for a database backend. Two stores ship here:
//! an in-process [`MemoryStore`] and an append-only [`JsonlStore`] that keeps
//! one `<table>.jsonl` file per table.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::ResultSink;
use crate::error::{BenchError, Result};
use crate::schema::{BenchmarkResult, BenchmarkRun};

pub const SUMMARY_TABLE: &str = "benchmark_summary";
pub const RAW_TABLE: &str = "benchmark_results_raw";

/// One row of `benchmark_summary`: a timed operation of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub algorithm: String,
    pub category: String,
    pub operation: String,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub max_ms: f64,
    pub min_ms: f64,
    pub stddev_ms: f64,
    pub cv: f64,
    pub signature_size: Option<usize>,
    pub key_size: usize,
    pub iterations: usize,
    pub timestamp: String,
    pub system_label: String,
}

impl SummaryRow {
    pub fn from_result(result: &BenchmarkResult, system_label: &str) -> Vec<Self> {
        result
            .stats
            .entries()
            .into_iter()
            .map(|(op, s)| Self {
                algorithm: result.algorithm.clone(),
                category: result.category.as_str().to_string(),
                operation: op.as_str().to_string(),
                mean_ms: s.mean,
                median_ms: s.median,
                max_ms: s.max,
                min_ms: s.min,
                stddev_ms: s.stddev,
                cv: s.cv,
                signature_size: result.signature_size,
                key_size: result.key_size,
                iterations: result.iterations,
                timestamp: result.timestamp.clone(),
                system_label: system_label.to_string(),
            })
            .collect()
    }
}

/// One row of `benchmark_results_raw`: a single measured sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub algorithm: String,
    pub category: String,
    pub operation: String,
    pub iteration: usize,
    pub duration_ms: f64,
    /// Whether the whole run was correct, repeated on every row.
    pub correctness: bool,
    pub timestamp: String,
    pub system_label: String,
}

impl RawRow {
    pub fn from_run(run: &BenchmarkRun, system_label: &str) -> Vec<Self> {
        let result = &run.result;
        let correctness = result.correctness_rate == 1.0;
        run.raw
            .samples()
            .map(|(op, iteration, duration_ms)| Self {
                algorithm: result.algorithm.clone(),
                category: result.category.as_str().to_string(),
                operation: op.as_str().to_string(),
                iteration,
                duration_ms,
                correctness,
                timestamp: result.timestamp.clone(),
                system_label: system_label.to_string(),
            })
            .collect()
    }
}

pub trait TableStore {
    /// Insert `rows` into `table` as one batch.
    fn insert<R: Serialize>(&mut self, table: &str, rows: &[R]) -> Result<()>;
}

/// Tables held in memory. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Rc<RefCell<BTreeMap<String, Vec<serde_json::Value>>>>,
}

impl MemoryStore {
    pub fn rows(&self, table: &str) -> Vec<serde_json::Value> {
        self.tables.borrow().get(table).cloned().unwrap_or_default()
    }

    /// Rows of `table` decoded as `R`.
    pub fn typed_rows<R: for<'de> Deserialize<'de>>(&self, table: &str) -> Result<Vec<R>> {
        self.rows(table)
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(BenchError::from))
            .collect()
    }
}

impl TableStore for MemoryStore {
    fn insert<R: Serialize>(&mut self, table: &str, rows: &[R]) -> Result<()> {
        let values = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.tables
            .borrow_mut()
            .entry(table.to_string())
            .or_default()
            .extend(values);
        Ok(())
    }
}

/// Append-only JSON-lines tables in a directory. The directory is created
/// on first insert, so an unusable path fails that batch and nothing else.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    dir: PathBuf,
}

impl JsonlStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.jsonl"))
    }
}

impl TableStore for JsonlStore {
    fn insert<R: Serialize>(&mut self, table: &str, rows: &[R]) -> Result<()> {
        let io_err = |source| BenchError::Export {
            sink: "store",
            source,
        };

        // Encode the whole batch before touching the file so a bad row appends nothing.
        let mut batch = Vec::new();
        for row in rows {
            serde_json::to_writer(&mut batch, row)?;
            batch.push(b'\n');
        }

        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.table_path(table))
            .map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&batch).map_err(io_err)?;
        writer.flush().map_err(io_err)?;
        Ok(())
    }
}

/// Exports a run as summary and raw rows into a [`TableStore`].
pub struct StoreSink<S> {
    store: S,
}

impl<S: TableStore> StoreSink<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: TableStore> ResultSink for StoreSink<S> {
    fn name(&self) -> &'static str {
        "store"
    }

    fn export(&mut self, run: &BenchmarkRun, run_label: &str) -> Result<()> {
        self.store
            .insert(SUMMARY_TABLE, &SummaryRow::from_result(&run.result, run_label))?;
        self.store
            .insert(RAW_TABLE, &RawRow::from_run(run, run_label))?;
        Ok(())
    }
}
