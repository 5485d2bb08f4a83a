//! Fan-out/fan-in over a fixed pool of worker threads.
//!
//! Layout of one `collect` call:
//! - a feeder thread hands filenames one at a time to the pool,
//! - `workers` threads each open a file, extract the column, and report a
//!   batch or an error,
//! - a coordinator thread joins the pool and then closes `done`,
//! - the calling thread selects over batches, errors, and `done`.
//!
//! Every channel has zero capacity, so a send completes only once the
//! collector has taken the message. The first error ends the call; workers
//! still running find the result channels disconnected and keep draining
//! the filename queue with their results discarded.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{bounded, select, Receiver, Sender};

use colstats_core::column::ColumnIndex;
use colstats_core::config::StatsConfig;
use colstats_core::error::{Error, Result};
use colstats_core::ops::Operation;
use colstats_io::ColumnExtractor;

use crate::metrics::emit_span;

/// Extracts one column from many files in parallel.
#[derive(Debug, Clone)]
pub struct ParallelCollector {
    workers: usize,
    cfg: StatsConfig,
}

impl Default for ParallelCollector {
    fn default() -> Self {
        Self::with_config(&StatsConfig::default())
    }
}

impl ParallelCollector {
    pub fn new(workers: usize) -> Self {
        let cfg = StatsConfig {
            workers: workers.max(1),
            ..StatsConfig::default()
        };
        Self::with_config(&cfg)
    }

    pub fn with_config(cfg: &StatsConfig) -> Self {
        Self {
            workers: cfg.workers.max(1),
            cfg: cfg.clone(),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Extract `column` from every file and concatenate the batches in
    /// arrival order.
    ///
    /// Batches from different files may arrive in any order; rows within a
    /// batch keep file order. If any file fails, the first error received
    /// is returned and nothing is merged.
    pub fn collect<P: AsRef<Path>>(&self, filenames: &[P], column: ColumnIndex) -> Result<Vec<f64>> {
        if filenames.is_empty() {
            return Err(Error::NoFiles);
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "collect",
            files = filenames.len(),
            workers = self.workers,
            column = column.get()
        )
        .entered();

        let paths: Vec<PathBuf> = filenames.iter().map(|p| p.as_ref().to_path_buf()).collect();
        let extractor = ColumnExtractor::with_config(column, &self.cfg);

        let (file_tx, file_rx) = bounded::<PathBuf>(0);
        let (batch_tx, batch_rx) = bounded::<Vec<f64>>(0);
        let (err_tx, err_rx) = bounded::<Error>(0);
        let (done_tx, done_rx) = bounded::<()>(0);

        let mut handles = Vec::with_capacity(self.workers);
        for id in 0..self.workers {
            let file_rx = file_rx.clone();
            let batch_tx = batch_tx.clone();
            let err_tx = err_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("colstats-worker-{id}"))
                .spawn(move || worker_loop(extractor, file_rx, batch_tx, err_tx))
                .map_err(|source| Error::Spawn {
                    role: "worker",
                    source,
                })?;
            handles.push(handle);
        }
        // Only workers hold these now, so disconnection means the pool exited.
        drop(file_rx);
        drop(batch_tx);
        drop(err_tx);

        thread::Builder::new()
            .name("colstats-feeder".into())
            .spawn(move || {
                for path in paths {
                    if file_tx.send(path).is_err() {
                        break;
                    }
                }
            })
            .map_err(|source| Error::Spawn {
                role: "feeder",
                source,
            })?;

        thread::Builder::new()
            .name("colstats-join".into())
            .spawn(move || {
                for handle in handles {
                    let _ = handle.join();
                }
                drop(done_tx);
            })
            .map_err(|source| Error::Spawn {
                role: "coordinator",
                source,
            })?;

        let mut merged = Vec::new();
        let mut batches = 0usize;
        loop {
            select! {
                recv(batch_rx) -> msg => match msg {
                    Ok(batch) => {
                        batches += 1;
                        merged.extend(batch);
                    }
                    // every worker has exited and every send has landed
                    Err(_) => break,
                },
                recv(err_rx) -> msg => match msg {
                    Ok(err) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(error = %err, "stopping on first error");
                        return Err(err);
                    }
                    Err(_) => break,
                },
                recv(done_rx) -> _ => break,
            }
        }

        emit_span(
            "collect",
            &[
                ("files", filenames.len().to_string()),
                ("batches", batches.to_string()),
                ("values", merged.len().to_string()),
            ],
        );
        Ok(merged)
    }

    /// `collect` followed by a single application of `op`.
    pub fn collect_and_apply<P: AsRef<Path>>(
        &self,
        filenames: &[P],
        column: ColumnIndex,
        op: Operation,
    ) -> Result<f64> {
        let merged = self.collect(filenames, column)?;
        Ok(op.apply(&merged))
    }
}

/// Body of one pool thread.
///
/// A failed file is reported and the loop moves on to the next filename
/// rather than exiting the thread.
fn worker_loop(
    extractor: ColumnExtractor,
    file_rx: Receiver<PathBuf>,
    batch_tx: Sender<Vec<f64>>,
    err_tx: Sender<Error>,
) {
    for path in file_rx.iter() {
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(source) => {
                let _ = err_tx.send(Error::Open { path, source });
                continue;
            }
        };

        // The reader owns `file`; it is closed when `extract` returns.
        match extractor.extract(file) {
            Ok(batch) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(path = %path.display(), rows = batch.len(), "extracted batch");
                let _ = batch_tx.send(batch);
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(path = %path.display(), error = %err, "extraction failed");
                let _ = err_tx.send(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colstats_core::error::ErrorKind;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    fn col(n: i64) -> ColumnIndex {
        ColumnIndex::new(n).unwrap()
    }

    #[test]
    fn merges_all_files() {
        let dir = TempDir::new().unwrap();
        let a = write_csv(&dir, "a.csv", "h1,h2\n1,10\n2,20\n");
        let b = write_csv(&dir, "b.csv", "h1,h2\n3,30\n");
        let c = write_csv(&dir, "c.csv", "h1,h2\n");

        for workers in [1, 2, 8] {
            let mut merged = ParallelCollector::new(workers)
                .collect(&[&a, &b, &c], col(2))
                .unwrap();
            merged.sort_by(|x, y| x.partial_cmp(y).unwrap());
            assert_eq!(merged, vec![10.0, 20.0, 30.0], "workers={workers}");
        }
    }

    #[test]
    fn empty_file_list() {
        let files: [&str; 0] = [];
        let err = ParallelCollector::new(2).collect(&files, col(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoFiles);
    }

    #[test]
    fn first_error_is_returned() {
        let dir = TempDir::new().unwrap();
        let good = write_csv(&dir, "good.csv", "x\n1\n2\n");
        let bad = write_csv(&dir, "bad.csv", "x\nnope\n");
        let err = ParallelCollector::new(2)
            .collect(&[&good, &bad, &good], col(1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotANumber);
    }

    #[test]
    fn any_valid_error_when_several_files_fail() {
        let dir = TempDir::new().unwrap();
        let narrow = write_csv(&dir, "narrow.csv", "a,b\n1\n");
        let nan = write_csv(&dir, "nan.csv", "a,b\n1,x\n");
        let missing = dir.path().join("missing.csv");
        let err = ParallelCollector::new(4)
            .collect(&[&narrow, &nan, &missing], col(2))
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidColumn | ErrorKind::NotANumber | ErrorKind::Io
        ));
    }

    #[test]
    fn worker_keeps_going_after_a_failed_file() {
        let dir = TempDir::new().unwrap();
        let good = write_csv(&dir, "good.csv", "x\n4\n");
        let missing = dir.path().join("missing.csv");

        let (file_tx, file_rx) = bounded(0);
        let (batch_tx, batch_rx) = bounded(0);
        let (err_tx, err_rx) = bounded(0);
        let worker = thread::spawn(move || {
            worker_loop(ColumnExtractor::new(col(1)), file_rx, batch_tx, err_tx)
        });
        let feeder = thread::spawn(move || {
            file_tx.send(missing).unwrap();
            file_tx.send(good).unwrap();
        });

        let err = err_rx.recv().unwrap();
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
        assert_eq!(batch_rx.recv().unwrap(), vec![4.0]);

        feeder.join().unwrap();
        worker.join().unwrap();
        assert!(batch_rx.recv().is_err());
    }

    #[test]
    fn worker_exits_quietly_when_collector_is_gone() {
        let dir = TempDir::new().unwrap();
        let good = write_csv(&dir, "good.csv", "x\n1\n");

        let (file_tx, file_rx) = bounded(0);
        let (batch_tx, batch_rx) = bounded::<Vec<f64>>(0);
        let (err_tx, err_rx) = bounded::<Error>(0);
        drop(batch_rx);
        drop(err_rx);

        let worker = thread::spawn(move || {
            worker_loop(ColumnExtractor::new(col(1)), file_rx, batch_tx, err_tx)
        });
        file_tx.send(good.clone()).unwrap();
        file_tx.send(good).unwrap();
        drop(file_tx);
        worker.join().unwrap();
    }

    #[test]
    fn collect_and_apply_reduces_once() {
        let dir = TempDir::new().unwrap();
        let a = write_csv(&dir, "a.csv", "v\n1\n5\n");
        let b = write_csv(&dir, "b.csv", "v\n-3\n");
        let c = ParallelCollector::new(3);
        assert_eq!(c.collect_and_apply(&[&a, &b], col(1), Operation::Sum).unwrap(), 3.0);
        assert_eq!(c.collect_and_apply(&[&a, &b], col(1), Operation::Min).unwrap(), -3.0);
        assert_eq!(c.collect_and_apply(&[&a, &b], col(1), Operation::Max).unwrap(), 5.0);
    }

    #[test]
    fn zero_workers_clamped_to_one() {
        assert_eq!(ParallelCollector::new(0).workers(), 1);
    }
}
