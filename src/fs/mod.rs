//! File system I/O.
//!
//! Recorded lane values are stored as 2-d `float32` NumPy arrays, one row per
//! operand. The differential harness replays them in place of random inputs.

mod lane_rows;

pub use lane_rows::*;
