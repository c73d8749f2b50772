//! Flat-file export: a summary and a raw CSV per algorithm run.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use super::ResultSink;
use crate::error::{BenchError, Result};
use crate::schema::{BenchmarkResult, BenchmarkRun, RawTimings};

pub const SUMMARY_HEADER: &str = "operation,mean,median,max,min,stddev,cv";
pub const RAW_HEADER: &str = "operation,iteration,duration_ms";

/// Writes `<root>/<label>/<algorithm>_<timestamp>_{summary,raw}.csv`.
#[derive(Debug, Clone)]
pub struct CsvSink {
    root: PathBuf,
}

impl CsvSink {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Summary and raw file paths for `result` under `run_label`.
    pub fn paths(&self, result: &BenchmarkResult, run_label: &str) -> (PathBuf, PathBuf) {
        let dir = self.root.join(run_label);
        let stem = format!("{}_{}", result.algorithm, file_timestamp(&result.timestamp));
        (
            dir.join(format!("{stem}_summary.csv")),
            dir.join(format!("{stem}_raw.csv")),
        )
    }
}

impl ResultSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn export(&mut self, run: &BenchmarkRun, run_label: &str) -> Result<()> {
        let io_err = |source| BenchError::Export { sink: "csv", source };

        let (summary_path, raw_path) = self.paths(&run.result, run_label);
        fs::create_dir_all(self.root.join(run_label)).map_err(io_err)?;
        fs::write(&summary_path, render_summary(&run.result)).map_err(io_err)?;
        fs::write(&raw_path, render_raw(&run.raw)).map_err(io_err)?;
        Ok(())
    }
}

/// `2025-03-14 09:26:53` -> `2025-03-14_09-26-53`.
pub fn file_timestamp(timestamp: &str) -> String {
    timestamp.replace(':', "-").replace(' ', "_")
}

fn field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// One row per timed operation, in record order.
pub fn render_summary(result: &BenchmarkResult) -> String {
    let mut out = format!("{SUMMARY_HEADER}\n");
    for (op, s) in result.stats.entries() {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            field(op.as_str()),
            s.mean,
            s.median,
            s.max,
            s.min,
            s.stddev,
            s.cv
        );
    }
    out
}

/// One row per (operation, iteration), iterations 1-based.
pub fn render_raw(raw: &RawTimings) -> String {
    let mut out = format!("{RAW_HEADER}\n");
    for (op, iteration, duration_ms) in raw.samples() {
        let _ = writeln!(out, "{},{iteration},{duration_ms}", field(op.as_str()));
    }
    out
}
