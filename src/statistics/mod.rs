//! Differential statistics.
//!
//! This module collects how often each operation was compared across execution
//! strategies and how often the strategies disagreed, and writes the tally out
//! as a JSON report.

mod stats;
pub use stats::*;
