use std::io;
use std::num::ParseFloatError;
use std::str::Utf8Error;
use std::path::PathBuf;

use thiserror::Error;

/// Canonical result for colstats.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no files to process")]
    NoFiles,

    #[error("invalid column: {0}")]
    InvalidColumn(i64),

    /// A data row is narrower than the requested column.
    #[error("invalid column: row {row} has too few fields: [{fields}]")]
    ColumnOutOfRange { row: u64, fields: String },

    #[error("invalid operation: {0:?}")]
    InvalidOperation(String),

    #[error("not a number: {source}")]
    NotANumber {
        #[source]
        source: NumberError,
    },

    #[error("error reading row {row}: {source}")]
    Read {
        row: u64,
        #[source]
        source: io::Error,
    },

    #[error("error opening file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error writing result: {0}")]
    Write(#[source] io::Error),

    #[error("failed to spawn {role} thread: {source}")]
    Spawn {
        role: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Why a selected field is not a usable `f64`.
#[derive(Debug, Error)]
pub enum NumberError {
    #[error(transparent)]
    Parse(#[from] ParseFloatError),

    #[error("invalid UTF-8 in field: {0}")]
    Utf8(#[from] Utf8Error),

    /// A finite literal whose magnitude does not fit in an `f64`.
    #[error("value out of range: {0:?}")]
    OutOfRange(String),
}

/// Coarse error categories. Several variants share a kind, e.g. both a
/// column index below 1 and a too-narrow row are `InvalidColumn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NoFiles,
    InvalidColumn,
    InvalidOperation,
    NotANumber,
    Io,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoFiles => ErrorKind::NoFiles,
            Error::InvalidColumn(_) | Error::ColumnOutOfRange { .. } => ErrorKind::InvalidColumn,
            Error::InvalidOperation(_) => ErrorKind::InvalidOperation,
            Error::NotANumber { .. } => ErrorKind::NotANumber,
            Error::Read { .. } | Error::Open { .. } | Error::Write(_) | Error::Spawn { .. } => {
                ErrorKind::Io
            }
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// The underlying `io::ErrorKind` for I/O failures.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Error::Read { source, .. }
            | Error::Open { source, .. }
            | Error::Write(source)
            | Error::Spawn { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
