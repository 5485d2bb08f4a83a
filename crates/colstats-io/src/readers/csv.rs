//! Column extraction over CSV input.
//!
//! The first record is always treated as a header and discarded. Every later
//! record must be wide enough for the requested column and the selected field
//! must parse as `f64`; the first record that violates either ends the read.
//!
//! Records are read as raw bytes. Only the selected field is decoded, so
//! non-UTF-8 bytes in the header or in unread columns are ignored.

use std::io::{self, Read};

use csv::{ByteRecord, ReaderBuilder};

use colstats_core::column::ColumnIndex;
use colstats_core::config::{StatsConfig, DEFAULT_READ_BUFFER_BYTES};
use colstats_core::error::{Error, NumberError, Result};

/// Extracts a single numeric column from delimited text.
#[derive(Debug, Clone, Copy)]
pub struct ColumnExtractor {
    column: ColumnIndex,
    delimiter: u8,
    buffer_capacity: usize,
}

impl ColumnExtractor {
    pub fn new(column: ColumnIndex) -> Self {
        Self {
            column,
            delimiter: b',',
            buffer_capacity: DEFAULT_READ_BUFFER_BYTES,
        }
    }

    /// Build an extractor using the delimiter and buffer size from `cfg`.
    pub fn with_config(column: ColumnIndex, cfg: &StatsConfig) -> Self {
        Self::new(column)
            .delimiter(cfg.delimiter)
            .buffer_capacity(cfg.read_buffer_bytes)
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn buffer_capacity(mut self, bytes: usize) -> Self {
        self.buffer_capacity = bytes.max(1);
        self
    }

    pub fn column(&self) -> ColumnIndex {
        self.column
    }

    /// Read `reader` to the end and return the column values in row order.
    pub fn extract<R: Read>(&self, reader: R) -> Result<Vec<f64>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .buffer_capacity(self.buffer_capacity)
            .from_reader(reader);

        let offset = self.column.offset();
        let mut record = ByteRecord::new();
        let mut data = Vec::new();

        for row in 0u64.. {
            let more = rdr
                .read_byte_record(&mut record)
                .map_err(|e| Error::Read {
                    row,
                    source: into_io_error(e),
                })?;
            if !more {
                break;
            }
            // header
            if row == 0 {
                continue;
            }

            let field = record.get(offset).ok_or_else(|| Error::ColumnOutOfRange {
                row,
                fields: record
                    .iter()
                    .map(String::from_utf8_lossy)
                    .collect::<Vec<_>>()
                    .join(","),
            })?;

            let value = parse_field(field).map_err(|source| Error::NotANumber { source })?;
            data.push(value);
        }

        Ok(data)
    }
}

/// Parse one field as `f64`. Finite literals too large for `f64` are
/// rejected instead of becoming infinities.
fn parse_field(field: &[u8]) -> std::result::Result<f64, NumberError> {
    let text = std::str::from_utf8(field)?;
    let value = text.parse::<f64>()?;
    if value.is_infinite() && !is_infinity_literal(text) {
        return Err(NumberError::OutOfRange(text.to_string()));
    }
    Ok(value)
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Extract `column` from `reader` with default settings.
pub fn extract_column<R: Read>(reader: R, column: ColumnIndex) -> Result<Vec<f64>> {
    ColumnExtractor::new(column).extract(reader)
}

fn into_io_error(e: csv::Error) -> io::Error {
    if !e.is_io_error() {
        return io::Error::new(io::ErrorKind::InvalidData, e);
    }
    match e.into_kind() {
        csv::ErrorKind::Io(err) => err,
        other => io::Error::new(io::ErrorKind::Other, format!("{other:?}")),
    }
}
