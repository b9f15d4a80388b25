//! nonbscan entrypoint: CLI over the scan engine.

use anyhow::{Context, Result};
use clap::Parser;
use core_engine::{ScanConfig, ScanEngine};
use core_store::ResultStore;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

mod fasta;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "nonbscan", version, about = "Non-B DNA motif scanner")]
struct Args {
    /// FASTA (or plain-text) sequence file to scan.
    pub input: PathBuf,
    /// Output NDJSON path (default: <input>.motifs.ndjson).
    #[arg(long = "out", short = 'o')]
    pub out: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `nonbscan.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Comma-separated class whitelist (canonical names or aliases).
    #[arg(long = "classes")]
    pub classes: Option<String>,
    /// Worker-thread cap (default: CPU count).
    #[arg(long = "workers")]
    pub workers: Option<usize>,
    /// Per-sequence wall-clock cap, milliseconds.
    #[arg(long = "timeout-ms")]
    pub timeout_ms: Option<u64>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(".", "nonbscan.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        Err(_err) => {
            // Global subscriber already installed; drop the guard so the
            // writer shuts down.
            None
        }
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            error!(target: "runtime", "panic: {info}");
            previous(info);
        }));
    });
}

/// Discovery order: --config, then ./nonbscan.toml, then defaults.
fn load_config(args: &Args) -> Result<ScanConfig> {
    let mut cfg = match &args.config {
        Some(path) => ScanConfig::load_from(path)?,
        None => {
            let discovered = Path::new("nonbscan.toml");
            if discovered.exists() {
                ScanConfig::load_from(discovered)?
            } else {
                ScanConfig::default()
            }
        }
    };
    if let Some(classes) = &args.classes {
        cfg.enabled_classes = Some(classes.split(',').map(|s| s.trim().to_string()).collect());
    }
    if let Some(workers) = args.workers {
        cfg.max_workers = workers;
    }
    if let Some(timeout) = args.timeout_ms {
        cfg.per_sequence_timeout_ms = Some(timeout);
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    let args = Args::parse();
    info!(target: "runtime", input = %args.input.display(), "startup");

    let config = load_config(&args)?;
    let engine = ScanEngine::new(config).context("building scan engine")?;

    let records = fasta::read_fasta(&args.input)?;
    info!(target: "runtime", sequences = records.len(), "input_parsed");

    let out_path = args.out.clone().unwrap_or_else(|| {
        let mut p = args.input.as_os_str().to_owned();
        p.push(".motifs.ndjson");
        PathBuf::from(p)
    });
    let mut store = ResultStore::create(&out_path)
        .with_context(|| format!("creating result store {}", out_path.display()))?;

    let summary = engine
        .run(records, &mut store)
        .context("scan pipeline failed")?;
    store.flush()?;

    let store_summary = store.summary();
    info!(
        target: "runtime",
        motifs = store_summary.total_count,
        coverage_bp = store_summary.coverage_bp,
        "run_complete"
    );
    print!("{summary}");
    println!("motifs written: {} → {}", store_summary.total_count, out_path.display());
    for (class, count) in &store_summary.class_distribution {
        println!("  {class}: {count}");
    }
    Ok(())
}
