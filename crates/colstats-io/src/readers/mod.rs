//! Streaming readers that produce one `Vec<f64>` batch per input.
//!
//! Only delimited text is supported. Each reader owns its input exclusively
//! and never shares a handle across threads.

pub mod csv;
