use clap::{Parser, Subcommand, ValueEnum};
use pqc_bench::catalog::AlgorithmCatalog;
use pqc_bench::export::{ExportConfig, Exporter, DEFAULT_RUN_LABEL};
use pqc_bench::harness::{BenchConfig, Profile, DEFAULT_MESSAGE_LEN, DEFAULT_WARMUP_CYCLES};
use pqc_bench::orchestrator::Session;
use pqc_bench::provider::{NativeProvider, Provider};
use pqc_bench::{validate, Family, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileArg {
    Quick,
    Full,
}

impl From<ProfileArg> for Profile {
    fn from(v: ProfileArg) -> Self {
        match v {
            ProfileArg::Quick => Profile::Quick,
            ProfileArg::Full => Profile::Full,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Benchmark every enabled algorithm and export the results.
    Run {
        /// Algorithm catalog (JSON). Defaults to the built-in NIST parameter sets.
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Which algorithm family to benchmark.
        #[arg(long, value_enum, default_value_t = Family::All)]
        family: Family,

        /// Root directory for CSV exports; files go under `<DIR>/<run-label>/`.
        #[arg(long, value_name = "DIR", default_value = "exports")]
        export_dir: PathBuf,

        /// Skip the CSV export.
        #[arg(long, default_value_t = false)]
        no_csv: bool,

        /// Directory of the JSON-lines table store.
        #[arg(long, value_name = "DIR", env = "PQC_BENCH_STORE_DIR")]
        store_dir: Option<PathBuf>,
    },

    /// Check a catalog against the mechanisms this build provides.
    Validate {
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
    },

    /// List the mechanisms this build provides.
    Mechanisms,
}

#[derive(Parser, Debug)]
#[command(name = "pqc-bench")]
#[command(about = "Timing and correctness benchmarks for classical and post-quantum KEMs and signatures (JSON output)")]
struct Args {
    #[arg(long, value_enum, default_value_t = ProfileArg::Full, global = true)]
    profile: ProfileArg,

    /// Measured iterations per algorithm; overrides the profile.
    #[arg(long, global = true)]
    iterations: Option<usize>,

    /// Discarded warmup cycles before measurement.
    #[arg(long, default_value_t = DEFAULT_WARMUP_CYCLES, global = true)]
    warmup: usize,

    /// Length of the message signed by signature benchmarks.
    #[arg(long, default_value_t = DEFAULT_MESSAGE_LEN, global = true)]
    message_len: usize,

    /// Tags every exported row and file path.
    #[arg(long, env = "SYSTEM_LABEL", default_value = DEFAULT_RUN_LABEL, global = true)]
    run_label: String,

    /// Where to write the JSON report. If omitted, prints to stdout.
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

fn git_sha_short() -> Option<String> {
    std::env::var("GIT_SHA")
        .ok()
        .or_else(|| std::env::var("GITHUB_SHA").ok())
        .map(|s| s.chars().take(12).collect())
}

fn load_catalog(path: Option<&Path>) -> Result<AlgorithmCatalog> {
    match path {
        Some(path) => AlgorithmCatalog::load(path),
        None => Ok(AlgorithmCatalog::builtin()),
    }
}

fn write_report(json: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(out) => {
            fs::write(out, json)?;
            info!(path = %out.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let profile: Profile = args.profile.into();
    let mut cfg = BenchConfig::from_profile(profile);
    if let Some(iterations) = args.iterations {
        cfg = cfg.with_iterations(iterations);
    }
    cfg.warmup_cycles = args.warmup;
    cfg.message_len = args.message_len;
    cfg.validate()?;

    let provider = NativeProvider;

    match args.cmd {
        Command::Run {
            catalog,
            family,
            export_dir,
            no_csv,
            store_dir,
        } => {
            let catalog = load_catalog(catalog.as_deref())?;
            let export = ExportConfig {
                run_label: args.run_label,
                csv_root: (!no_csv).then_some(export_dir),
                store_dir,
            };
            let exporter = Exporter::from_config(&export);
            let mut session = Session::new(cfg, exporter)
                .with_family(family)
                .with_git_sha(git_sha_short());

            let report = session.run(&catalog, &provider)?;
            if !report.failures.is_empty() {
                error!(
                    failed = report.failures.len(),
                    "some algorithms were aborted; see the report's failures"
                );
            }
            if !report.export_failures.is_empty() {
                error!(
                    failed = report.export_failures.len(),
                    "some results were not exported; see the report's export_failures"
                );
            }
            write_report(&serde_json::to_string_pretty(&report)?, args.out.as_deref())
        }
        Command::Validate { catalog } => {
            let catalog = load_catalog(catalog.as_deref())?;
            let availability = validate::validate_with(&catalog, &provider);
            let listing: Vec<_> = availability
                .entries()
                .map(|e| {
                    serde_json::json!({
                        "algorithm": e.name,
                        "catalog_key": e.catalog_key,
                        "category": e.category,
                        "enabled": e.enabled,
                    })
                })
                .collect();
            write_report(&serde_json::to_string_pretty(&listing)?, args.out.as_deref())
        }
        Command::Mechanisms => {
            let listing = serde_json::json!({
                "kems": provider.enabled_kem_mechanisms(),
                "signatures": provider.enabled_sig_mechanisms(),
                "classical": provider
                    .classical_algorithms()
                    .iter()
                    .map(|d| d.name.as_str())
                    .collect::<Vec<_>>(),
            });
            write_report(&serde_json::to_string_pretty(&listing)?, args.out.as_deref())
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pqc_bench=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "pqc-bench failed");
            ExitCode::FAILURE
        }
    }
}
