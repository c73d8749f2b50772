//! Canonical result contract shared by every algorithm family.
//!
//! The field names of [`BenchmarkResult`] and [`StatsSummary`] are part of the
//! export contract: CSV files, store rows and the session JSON report all read
//! them verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Algorithm family a mechanism belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "legacy_kem")]
    LegacyKem,
    #[serde(rename = "legacy_sig")]
    LegacySig,
    #[serde(rename = "ML-KEM")]
    MlKem,
    #[serde(rename = "HQC")]
    Hqc,
    #[serde(rename = "ML-DSA")]
    MlDsa,
    #[serde(rename = "SLH-DSA")]
    SlhDsa,
}

impl Category {
    /// Label written into result records and exported rows.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LegacyKem => "legacy_kem",
            Self::LegacySig => "legacy_sig",
            Self::MlKem => "ML-KEM",
            Self::Hqc => "HQC",
            Self::MlDsa => "ML-DSA",
            Self::SlhDsa => "SLH-DSA",
        }
    }

    /// Key used for this category inside the algorithm catalog, if it is catalog driven.
    pub fn catalog_key(self) -> Option<&'static str> {
        match self {
            Self::MlKem => Some("ml-kem"),
            Self::Hqc => Some("hqc"),
            Self::MlDsa => Some("ml-dsa"),
            Self::SlhDsa => Some("slh-dsa"),
            Self::LegacyKem | Self::LegacySig => None,
        }
    }

    pub fn from_catalog_key(key: &str) -> Option<Self> {
        match key {
            "ml-kem" => Some(Self::MlKem),
            "hqc" => Some(Self::Hqc),
            "ml-dsa" => Some(Self::MlDsa),
            "slh-dsa" => Some(Self::SlhDsa),
            _ => None,
        }
    }

    pub fn shape(self) -> OperationShape {
        match self {
            Self::LegacyKem | Self::MlKem | Self::Hqc => OperationShape::Kem,
            Self::LegacySig | Self::MlDsa | Self::SlhDsa => OperationShape::Signature,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation sequence a mechanism is benchmarked with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationShape {
    Kem,
    Signature,
}

impl OperationShape {
    pub fn operations(self) -> [Operation; 3] {
        match self {
            Self::Kem => [Operation::Keygen, Operation::Encap, Operation::Decap],
            Self::Signature => [Operation::Keygen, Operation::Sign, Operation::Verify],
        }
    }
}

/// A timed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Keygen,
    Encap,
    Decap,
    Sign,
    Verify,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keygen => "keygen",
            Self::Encap => "encap",
            Self::Decap => "decap",
            Self::Sign => "sign",
            Self::Verify => "verify",
        }
    }

    /// Name of the summary field in [`BenchmarkResult`] (`keygen_ms`, ...).
    pub fn summary_field(self) -> &'static str {
        match self {
            Self::Keygen => "keygen_ms",
            Self::Encap => "encap_ms",
            Self::Decap => "decap_ms",
            Self::Sign => "sign_ms",
            Self::Verify => "verify_ms",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive statistics over one operation's timings, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub mean: f64,
    pub median: f64,
    pub max: f64,
    pub min: f64,
    pub stddev: f64,
    pub cv: f64,
}

/// Per-operation summaries; the variant fixes which `*_ms` fields are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperationStats {
    Kem {
        keygen_ms: StatsSummary,
        encap_ms: StatsSummary,
        decap_ms: StatsSummary,
    },
    Signature {
        keygen_ms: StatsSummary,
        sign_ms: StatsSummary,
        verify_ms: StatsSummary,
    },
}

impl OperationStats {
    /// Summaries in iteration order (keygen, primary, secondary).
    pub fn entries(&self) -> [(Operation, &StatsSummary); 3] {
        match self {
            Self::Kem {
                keygen_ms,
                encap_ms,
                decap_ms,
            } => [
                (Operation::Keygen, keygen_ms),
                (Operation::Encap, encap_ms),
                (Operation::Decap, decap_ms),
            ],
            Self::Signature {
                keygen_ms,
                sign_ms,
                verify_ms,
            } => [
                (Operation::Keygen, keygen_ms),
                (Operation::Sign, sign_ms),
                (Operation::Verify, verify_ms),
            ],
        }
    }
}

/// Canonical output record of one completed algorithm run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub algorithm: String,
    pub category: Category,
    pub iterations: usize,
    pub key_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_size: Option<usize>,
    #[serde(flatten)]
    pub stats: OperationStats,
    pub correctness_rate: f64,
    /// Local time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
}

/// Raw durations of one operation, in iteration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationTimings {
    pub operation: Operation,
    pub durations_ms: Vec<f64>,
}

/// Raw per-iteration timings backing a [`BenchmarkResult`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTimings {
    pub operations: Vec<OperationTimings>,
}

impl RawTimings {
    pub fn push(&mut self, operation: Operation, durations_ms: Vec<f64>) {
        self.operations.push(OperationTimings {
            operation,
            durations_ms,
        });
    }

    pub fn get(&self, operation: Operation) -> Option<&[f64]> {
        self.operations
            .iter()
            .find(|t| t.operation == operation)
            .map(|t| t.durations_ms.as_slice())
    }

    /// `(operation, 1-based iteration, duration_ms)` in insertion order.
    pub fn samples(&self) -> impl Iterator<Item = (Operation, usize, f64)> + '_ {
        self.operations.iter().flat_map(|t| {
            t.durations_ms
                .iter()
                .enumerate()
                .map(move |(idx, &d)| (t.operation, idx + 1, d))
        })
    }
}

/// A finished run: the canonical record plus the timings it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRun {
    pub result: BenchmarkResult,
    pub raw: RawTimings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub bench_version: String,
    pub profile: String,
    pub iterations: usize,
    pub warmup_iters: usize,
    pub run_label: String,
    pub timestamp: String,
    pub git_sha: Option<String>,
}

/// An algorithm whose run was aborted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecord {
    pub algorithm: String,
    pub category: Category,
    pub error: String,
}

/// A finished run that one sink could not export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFailure {
    pub algorithm: String,
    pub sink: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub run: RunMeta,
    pub results: Vec<BenchmarkResult>,
    pub failures: Vec<FailureRecord>,
    #[serde(default)]
    pub export_failures: Vec<ExportFailure>,
}
