//! Session orchestration: validate the catalog, benchmark every enabled
//! algorithm one after another, export each run as soon as it finishes.

use tracing::{debug, error, info};

use crate::catalog::{AlgorithmCatalog, AlgorithmDescriptor};
use crate::error::Result;
use crate::export::Exporter;
use crate::harness::{self, BenchConfig};
use crate::provider::Provider;
use crate::schema::{
    BenchmarkRun, Category, ExportFailure, FailureRecord, RunMeta, SessionReport,
};
use crate::validate;
use crate::Family;

pub const SCHEMA_VERSION: u32 = 1;

/// Post-quantum families in the order they are benchmarked.
const PQ_ORDER: [Category; 4] = [
    Category::MlKem,
    Category::Hqc,
    Category::MlDsa,
    Category::SlhDsa,
];

pub struct Session {
    cfg: BenchConfig,
    exporter: Exporter,
    family: Family,
    git_sha: Option<String>,
}

impl Session {
    pub fn new(cfg: BenchConfig, exporter: Exporter) -> Self {
        Self {
            cfg,
            exporter,
            family: Family::All,
            git_sha: None,
        }
    }

    pub fn with_family(mut self, family: Family) -> Self {
        self.family = family;
        self
    }

    pub fn with_git_sha(mut self, git_sha: Option<String>) -> Self {
        self.git_sha = git_sha;
        self
    }

    pub fn run_meta(&self) -> RunMeta {
        RunMeta {
            schema_version: SCHEMA_VERSION,
            bench_version: env!("CARGO_PKG_VERSION").to_string(),
            profile: self.cfg.profile.as_str().to_string(),
            iterations: self.cfg.iterations,
            warmup_iters: self.cfg.warmup_cycles,
            run_label: self.exporter.run_label().to_string(),
            timestamp: harness::local_timestamp(),
            git_sha: self.git_sha.clone(),
        }
    }

    /// Algorithms this session will run, in order.
    pub fn plan(&self, catalog: &AlgorithmCatalog, provider: &dyn Provider) -> Vec<AlgorithmDescriptor> {
        let availability = validate::validate_with(catalog, provider);
        let classical = provider
            .classical_algorithms()
            .into_iter()
            .filter(|d| self.family.includes(d.category));
        let pq = PQ_ORDER
            .into_iter()
            .filter(|c| self.family.includes(*c))
            .flat_map(|c| availability.descriptors(c));
        classical.chain(pq).collect()
    }

    /// Run the whole session. Only an invalid configuration fails the
    /// session; a failing algorithm is recorded and the next one runs.
    pub fn run(&mut self, catalog: &AlgorithmCatalog, provider: &dyn Provider) -> Result<SessionReport> {
        self.cfg.validate()?;
        let meta = self.run_meta();
        let plan = self.plan(catalog, provider);
        info!(
            algorithms = plan.len(),
            iterations = self.cfg.iterations,
            label = %meta.run_label,
            "starting session"
        );

        let mut results = Vec::new();
        let mut failures = Vec::new();
        let mut export_failures = Vec::new();

        for descriptor in &plan {
            info!(algorithm = %descriptor.name, category = %descriptor.category, "benchmarking");
            match self.run_one(descriptor, provider) {
                Ok(run) => {
                    info!(
                        algorithm = %run.result.algorithm,
                        correctness = run.result.correctness_rate,
                        key_size = run.result.key_size,
                        "finished"
                    );
                    if let Ok(json) = serde_json::to_string_pretty(&run.result) {
                        debug!("{json}");
                    }
                    let exported = self.exporter.export(&run);
                    export_failures.extend(exported.failed.into_iter().map(|(sink, error)| {
                        ExportFailure {
                            algorithm: run.result.algorithm.clone(),
                            sink: sink.to_string(),
                            error,
                        }
                    }));
                    results.push(run.result);
                }
                Err(err) => {
                    error!(algorithm = %descriptor.name, %err, "benchmark aborted");
                    failures.push(FailureRecord {
                        algorithm: descriptor.name.clone(),
                        category: descriptor.category,
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            completed = results.len(),
            failed = failures.len(),
            export_failures = export_failures.len(),
            "session finished"
        );
        Ok(SessionReport {
            run: meta,
            results,
            failures,
            export_failures,
        })
    }

    fn run_one(&self, descriptor: &AlgorithmDescriptor, provider: &dyn Provider) -> Result<BenchmarkRun> {
        let mut bench = provider.open(descriptor)?;
        bench.run(descriptor, &self.cfg)
    }
}
