//! Entry point: validate arguments, collect, reduce, write one line.

use std::io::Write;
use std::path::Path;

use colstats_core::column::ColumnIndex;
use colstats_core::config::StatsConfig;
use colstats_core::error::{Error, Result};
use colstats_core::ops::Operation;

use crate::collector::ParallelCollector;

/// Run with the default configuration. See [`run_with_config`].
pub fn run<P, W>(filenames: &[P], op: &str, column: i64, out: &mut W) -> Result<()>
where
    P: AsRef<Path>,
    W: Write + ?Sized,
{
    run_with_config(filenames, op, column, &StatsConfig::default(), out)
}

/// Aggregate `column` of every file with `op` and write the result followed
/// by a newline to `out`.
///
/// Arguments are checked in order (files, column, operation) before any
/// file is opened. Nothing is written unless every file was read cleanly.
pub fn run_with_config<P, W>(
    filenames: &[P],
    op: &str,
    column: i64,
    cfg: &StatsConfig,
    out: &mut W,
) -> Result<()>
where
    P: AsRef<Path>,
    W: Write + ?Sized,
{
    if filenames.is_empty() {
        return Err(Error::NoFiles);
    }
    let column = ColumnIndex::new(column)?;
    let op: Operation = op.parse()?;
    cfg.validate()?;

    let result = ParallelCollector::with_config(cfg).collect_and_apply(filenames, column, op)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(%op, %column, result, "aggregated");

    writeln!(out, "{result}").map_err(Error::Write)
}
