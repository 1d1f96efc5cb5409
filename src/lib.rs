#![feature(portable_simd)]

pub mod config;
pub mod conversion;
pub mod differential;
pub mod dispatch;
pub mod error;
pub mod fs;
pub mod mask;
pub mod numerics;
pub mod shuffle;
pub mod species;
pub mod statistics;
pub mod vector;

pub use error::{Result, VectorError};
pub use mask::{Mask, MaskOp};
pub use numerics::{ByteOrder, Element, ElementKind};
pub use shuffle::Shuffle;
pub use species::{Shape, Species, SpeciesDescriptor};
pub use vector::{BinaryOp, Comparison, ReductionOp, TernaryOp, UnaryOp, Vector};
