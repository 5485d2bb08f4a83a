#![forbid(unsafe_code)]
//! colstats: parallel column statistics over CSV files.
//!
//! Facade over the workspace crates so integration tests and benches can
//! depend on a single package.

pub use colstats_core::prelude::*;
pub use colstats_exec::{run, run_with_config, ParallelCollector};
pub use colstats_io::{extract_column, ColumnExtractor};
