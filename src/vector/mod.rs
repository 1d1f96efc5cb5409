//! The vector value family.
//!
//! A [`Vector<E>`] is an immutable register of `E` lanes shaped by a
//! [`Species`](crate::species::Species). Algebra, comparisons and reductions are
//! driven by the operator tags in this module and executed through
//! [`dispatch`](crate::dispatch); loads, stores and permutations live in the
//! sibling files.

mod lanewise;
mod memory;
mod operators;
mod permute;
#[allow(clippy::module_inception)]
mod vector;

pub use operators::{BinaryOp, Comparison, LaneOperator, ReductionOp, TernaryOp, UnaryOp};
pub use vector::Vector;
