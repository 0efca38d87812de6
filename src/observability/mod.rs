//! Observability subsystem
//!
//! Structured, synchronous JSON logging. No metrics layer.

mod logger;

pub use logger::{Logger, Severity};
