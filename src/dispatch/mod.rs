//! Operation dispatch.
//!
//! Every lane-wise computation is routed through one of two interchangeable
//! [`ExecutionStrategy`] implementations: the [`ScalarLoop`] reference
//! interpreter, and [`PortableSimd`], which uses `std::simd` for the lane counts
//! and operators it can reproduce bit for bit. Which one runs is decided by the
//! configured [`Backend`], optionally overridden per thread with
//! [`with_backend`]. The choice never changes a result.

mod backend;
pub(crate) mod dispatcher;
mod portable;
mod scalar;
mod strategy;

pub use backend::{Backend, active_backend, compare_backends, with_backend};
pub use portable::{PortableLanes, PortableSimd};
pub use scalar::ScalarLoop;
pub use strategy::ExecutionStrategy;
