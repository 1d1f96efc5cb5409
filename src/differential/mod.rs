//! Differential harness.
//!
//! Every operation of the vector API is run once per execution strategy on the
//! same random (or replayed) operands, and the results are compared bit for bit.
//! Agreement is tallied in [`DifferentialStats`](crate::statistics::DifferentialStats).

mod inputs;
mod sweep;

pub use inputs::{SweepInputs, random_lane, random_mask, random_shuffle, random_vector, vector_from_row};
pub use sweep::{replay_descriptor, sweep, sweep_descriptor};
