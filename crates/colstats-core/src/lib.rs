#![forbid(unsafe_code)]
//! colstats-core: shared types for the column statistics engine.
//!
//! No threads and no file IO live here; `colstats-io` parses files and
//! `colstats-exec` schedules them.

pub mod column;
pub mod config;
pub mod error;
pub mod ops;
pub mod prelude;

pub use column::ColumnIndex;
pub use error::{Error, ErrorKind, NumberError, Result};
pub use ops::Operation;
