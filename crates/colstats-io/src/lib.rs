#![forbid(unsafe_code)]
//! colstats-io: readers that turn delimited text into column batches.

pub mod readers;

pub use readers::csv::{extract_column, ColumnExtractor};
