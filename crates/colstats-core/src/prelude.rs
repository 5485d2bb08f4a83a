//! Convenient re-exports for downstream crates.

pub use crate::column::ColumnIndex;
pub use crate::config::{ConfigOverrides, StatsConfig};
pub use crate::error::{Error, ErrorKind, NumberError, Result};
pub use crate::ops::Operation;
