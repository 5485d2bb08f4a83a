//! 1-based column indices as accepted on the command line.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A validated, 1-based column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ColumnIndex(usize);

impl ColumnIndex {
    pub fn new(column: i64) -> Result<Self> {
        if column < 1 {
            return Err(Error::InvalidColumn(column));
        }
        // Only fails where `usize` is narrower than `i64`.
        usize::try_from(column)
            .map(Self)
            .map_err(|_| Error::InvalidColumn(column))
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }

    /// 0-based offset into a record.
    #[inline]
    pub fn offset(self) -> usize {
        self.0 - 1
    }
}

impl TryFrom<i64> for ColumnIndex {
    type Error = Error;

    fn try_from(column: i64) -> Result<Self> {
        Self::new(column)
    }
}

impl From<ColumnIndex> for i64 {
    fn from(c: ColumnIndex) -> Self {
        c.0 as i64
    }
}

impl fmt::Display for ColumnIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
