use std::fmt::{self, Display};

use crate::numerics::{ElementKind, MAX_BIT_WIDTH};

/// Register widths a vector can occupy.
///
/// The four fixed shapes mirror common hardware registers. `Scalable` models
/// the widest register of the running platform and may hold a lane count that
/// is not a power of two (e.g. 192 bits of `i32` is six lanes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    S64Bit,
    S128Bit,
    S256Bit,
    S512Bit,
    Scalable(ScalableWidth),
}

/// Bit width of a scalable shape, always a multiple of 64 in `[64, 512]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScalableWidth(usize);

impl ScalableWidth {
    pub fn new(bits: usize) -> Option<Self> {
        ((64..=MAX_BIT_WIDTH).contains(&bits) && bits.is_multiple_of(64)).then_some(Self(bits))
    }

    pub fn bits(self) -> usize {
        self.0
    }
}

impl Shape {
    pub const FIXED: [Shape; 4] = [Shape::S64Bit, Shape::S128Bit, Shape::S256Bit, Shape::S512Bit];

    /// The fixed shape of exactly `bits` bits, if there is one.
    pub fn fixed(bits: usize) -> Option<Shape> {
        Shape::FIXED.into_iter().find(|s| s.bit_width() == bits)
    }

    pub fn scalable(bits: usize) -> Option<Shape> {
        ScalableWidth::new(bits).map(Shape::Scalable)
    }

    pub const fn bit_width(self) -> usize {
        match self {
            Shape::S64Bit => 64,
            Shape::S128Bit => 128,
            Shape::S256Bit => 256,
            Shape::S512Bit => 512,
            Shape::Scalable(width) => width.0,
        }
    }

    pub const fn byte_size(self) -> usize {
        self.bit_width() / 8
    }

    pub const fn lane_count(self, kind: ElementKind) -> usize {
        self.bit_width() / kind.bit_size()
    }

    pub const fn is_scalable(self) -> bool {
        matches!(self, Shape::Scalable(_))
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalable(width) => write!(f, "scalable {}-bit", width.0),
            fixed => write!(f, "{}-bit", fixed.bit_width()),
        }
    }
}
