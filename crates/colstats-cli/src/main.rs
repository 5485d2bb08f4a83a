//! colstats CLI: aggregate one column across many CSV files.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colstats_core::config::{ConfigOverrides, StatsConfig};
use colstats_exec::run_with_config;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "colstats")]
#[command(about = "Compute sum/avg/min/max of a CSV column across files in parallel", long_about = None)]
struct Cli {
    /// Operation to perform: sum, avg, min, max
    #[arg(long, default_value = "sum")]
    op: String,

    /// 1-based column to process
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    col: i64,

    /// Worker threads (overrides config and COLSTATS_WORKERS)
    #[arg(long)]
    workers: Option<usize>,

    /// JSON config file with workers / read_buffer_bytes / delimiter
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input CSV files
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = build_config(&cli).and_then(|cfg| {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        run_with_config(cli.files.as_slice(), &cli.op, cli.col, &cfg, &mut out)?;
        out.flush().map_err(colstats_core::Error::Write)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Defaults, then environment, then config file, then flags.
fn build_config(cli: &Cli) -> colstats_core::Result<StatsConfig> {
    let mut cfg = StatsConfig::from_env();
    if let Some(path) = &cli.config {
        cfg.apply(&ConfigOverrides::from_json_file(path)?);
    }
    apply_flags(&mut cfg, cli);
    Ok(cfg)
}

fn apply_flags(cfg: &mut StatsConfig, cli: &Cli) {
    if let Some(workers) = cli.workers {
        cfg.workers = workers;
    }
}

/// Logs go to stderr so stdout carries only the result line.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_flags() {
        let cli = Cli::parse_from(["colstats", "a.csv", "b.csv"]);
        assert_eq!(cli.op, "sum");
        assert_eq!(cli.col, 1);
        assert_eq!(cli.files.len(), 2);
        assert!(cli.workers.is_none());
    }

    #[test]
    fn negative_column_reaches_validation() {
        let cli = Cli::parse_from(["colstats", "--col", "-2", "--op", "avg", "a.csv"]);
        assert_eq!(cli.col, -2);
        assert_eq!(cli.op, "avg");
    }

    #[test]
    fn workers_flag_overrides_config() {
        let cli = Cli::parse_from(["colstats", "--workers", "3", "a.csv"]);
        let mut cfg = StatsConfig::default();
        cfg.apply(&ConfigOverrides {
            workers: Some(7),
            ..Default::default()
        });
        assert_eq!(cfg.workers, 7);
        apply_flags(&mut cfg, &cli);
        assert_eq!(cfg.workers, 3);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["colstats", "--config", "/nonexistent/colstats.json", "a.csv"]);
        let err = build_config(&cli).unwrap_err();
        assert_eq!(err.kind(), colstats_core::ErrorKind::Config);
    }
}
