//! Lane masks: which lanes of a species an operation touches.

#[allow(clippy::module_inception)]
mod mask;

pub use mask::{Mask, MaskOp};
