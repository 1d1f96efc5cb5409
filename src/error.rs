//! Error taxonomy shared by every vector, mask, shuffle and conversion operation.
//!
//! All failures are synchronous: an operation either returns a fully formed new
//! value or one of these errors, and never touches its inputs.

use thiserror::Error;

use crate::numerics::ElementKind;
use crate::species::SpeciesDescriptor;

pub type Result<T> = std::result::Result<T, VectorError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VectorError {
    /// An operand does not share the receiver's species.
    #[error("species mismatch: expected {expected}, found {found}")]
    MismatchedSpecies {
        expected: SpeciesDescriptor,
        found: SpeciesDescriptor,
    },

    /// A conversion target cannot hold the source's lanes.
    #[error("shape mismatch: cannot convert {from} to {to}")]
    ShapeMismatch {
        from: SpeciesDescriptor,
        to: SpeciesDescriptor,
    },

    #[error("unsupported shape: {kind} lanes at {bit_width} bits")]
    UnsupportedShape { kind: ElementKind, bit_width: usize },

    #[error("index {index} out of range for length {length}")]
    IndexOutOfRange { index: i64, length: usize },

    #[error("shuffle index {index} outside [-{lane_count}, {lane_count})")]
    InvalidShuffleIndex { index: i32, lane_count: usize },

    #[error("{op} is not defined on {kind} lanes")]
    UnsupportedOperation { op: &'static str, kind: ElementKind },

    #[error("integer division by zero in lane {lane}")]
    DivisionByZero { lane: usize },

    #[error("{lanes} lanes do not fit in a {bits}-bit mask")]
    MaskTooWide { lanes: usize, bits: u32 },

    /// The externally supplied per-lane kernel reported a failure status.
    #[error("lane kernel failed on lane {lane} with status {status}")]
    KernelFailure { lane: usize, status: i32 },
}

impl VectorError {
    pub(crate) fn index(index: impl TryInto<i64>, length: usize) -> Self {
        VectorError::IndexOutOfRange {
            index: index.try_into().unwrap_or(i64::MAX),
            length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Shape;

    #[test]
    fn test_messages_name_the_offending_values() {
        let err = VectorError::InvalidShuffleIndex {
            index: 9,
            lane_count: 4,
        };
        assert_eq!(err.to_string(), "shuffle index 9 outside [-4, 4)");

        let err = VectorError::UnsupportedShape {
            kind: ElementKind::I32,
            bit_width: 96,
        };
        assert_eq!(err.to_string(), "unsupported shape: i32 lanes at 96 bits");
    }

    #[test]
    fn test_species_mismatch_displays_both_sides() {
        let err = VectorError::MismatchedSpecies {
            expected: SpeciesDescriptor::new(ElementKind::I32, Shape::S128Bit),
            found: SpeciesDescriptor::new(ElementKind::I32, Shape::S256Bit),
        };
        let msg = err.to_string();
        assert!(msg.contains("i32x4"), "{msg}");
        assert!(msg.contains("i32x8"), "{msg}");
    }

    #[test]
    fn test_index_helper_saturates_huge_indices() {
        assert_eq!(
            VectorError::index(usize::MAX, 3),
            VectorError::IndexOutOfRange {
                index: i64::MAX,
                length: 3
            }
        );
    }
}
