//! Lane-level building blocks shared by every vector family.
//!
//! This module defines the supported element kinds and their scalar semantics,
//! the 64-byte aligned lane storage every value owns, byte ordering for memory
//! I/O, and the shuffle index wrapping policy.

mod aligned_block;
mod byte_order;
mod element;
pub mod wrap;

pub use aligned_block::{AlignedBlock, MAX_BIT_WIDTH, MAX_BYTES, MAX_LANES};
pub use byte_order::ByteOrder;
pub use element::{Element, ElementKind, ScalarValue};
