//! Runtime configuration shared by the collector and the CLI.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_READ_BUFFER_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Size of the worker pool. Fixed for the duration of one run.
    pub workers: usize,

    /// Capacity of each worker's buffered file reader.
    pub read_buffer_bytes: usize,

    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            read_buffer_bytes: DEFAULT_READ_BUFFER_BYTES,
            delimiter: b',',
        }
    }
}

/// Number of available processing units, at least 1.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl StatsConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `COLSTATS_WORKERS`: worker pool size
    /// - `COLSTATS_READ_BUFFER_BYTES`: per-worker read buffer capacity
    /// - `COLSTATS_DELIMITER`: single-byte field delimiter
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("COLSTATS_WORKERS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.workers = v;
            }
        }

        if let Ok(s) = std::env::var("COLSTATS_READ_BUFFER_BYTES") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.read_buffer_bytes = v;
            }
        }

        if let Ok(s) = std::env::var("COLSTATS_DELIMITER") {
            if let [b] = s.as_bytes() {
                cfg.delimiter = *b;
            }
        }

        cfg
    }

    /// Layer `overrides` on top of this config. Unset fields are kept.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(workers) = overrides.workers {
            self.workers = workers;
        }
        if let Some(bytes) = overrides.read_buffer_bytes {
            self.read_buffer_bytes = bytes;
        }
        if let Some(delimiter) = overrides.delimiter {
            self.delimiter = delimiter;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::Config("workers must be at least 1".into()));
        }
        if self.read_buffer_bytes == 0 {
            return Err(Error::Config("read_buffer_bytes must be at least 1".into()));
        }
        Ok(())
    }
}

/// Optional settings read from a JSON config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub workers: Option<usize>,
    pub read_buffer_bytes: Option<usize>,
    /// Must be a single ASCII character, e.g. `";"`.
    #[serde(with = "delimiter_char")]
    pub delimiter: Option<u8>,
}

impl ConfigOverrides {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Ok(serde_json::from_str(&text)?)
    }
}

mod delimiter_char {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &Option<u8>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(b) => s.serialize_some(&(*b as char).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u8>, D::Error> {
        let Some(text) = Option::<String>::deserialize(d)? else {
            return Ok(None);
        };
        match text.as_bytes() {
            [b] if b.is_ascii() => Ok(Some(*b)),
            _ => Err(D::Error::custom(format!(
                "delimiter must be one ASCII character, got {text:?}"
            ))),
        }
    }
}
