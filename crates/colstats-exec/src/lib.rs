#![forbid(unsafe_code)]
//! colstats-exec: bounded worker pool, first-error fan-in, and the runner.
//!
//! Workers communicate only through rendezvous channels. The collector
//! returns on the first error it sees and leaves the remaining workers to
//! drain their queue in the background.

pub mod collector;
pub mod metrics;
pub mod runner;

pub use collector::ParallelCollector;
pub use runner::{run, run_with_config};
