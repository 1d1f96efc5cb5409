use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::config;
use crate::error::{Result, VectorError};
use crate::mask::Mask;
use crate::numerics::{Element, ElementKind};
use crate::shuffle::Shuffle;
use crate::species::Shape;
use crate::vector::Vector;

/// Untyped species: an element kind at a given shape.
///
/// Two descriptors are equal when kind, lane count and bit width agree, so a
/// scalable shape equals the fixed shape of the same width.
#[derive(Debug, Clone, Copy)]
pub struct SpeciesDescriptor {
    kind: ElementKind,
    shape: Shape,
}

impl SpeciesDescriptor {
    pub const fn new(kind: ElementKind, shape: Shape) -> Self {
        SpeciesDescriptor { kind, shape }
    }

    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    pub const fn shape(&self) -> Shape {
        self.shape
    }

    pub const fn lane_count(&self) -> usize {
        self.shape.lane_count(self.kind)
    }

    pub const fn bit_width(&self) -> usize {
        self.shape.bit_width()
    }
}

impl PartialEq for SpeciesDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.lane_count() == other.lane_count()
            && self.bit_width() == other.bit_width()
    }
}

impl Eq for SpeciesDescriptor {}

impl Hash for SpeciesDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.kind, self.lane_count(), self.bit_width()).hash(state);
    }
}

impl Display for SpeciesDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} ({})", self.kind, self.lane_count(), self.shape)
    }
}

/// Resolves a species from an element kind and a bit width.
///
/// Fixed widths up to the configured maximum resolve to their fixed shape. The
/// configured maximum itself resolves to a fixed shape when one exists, and to a
/// scalable shape otherwise.
pub fn by_species(kind: ElementKind, bit_width: usize) -> Result<SpeciesDescriptor> {
    resolve_within(kind, bit_width, config::current().max_bit_width)
}

fn resolve_within(kind: ElementKind, bit_width: usize, max: usize) -> Result<SpeciesDescriptor> {
    let unsupported = VectorError::UnsupportedShape { kind, bit_width };

    if bit_width > max {
        return Err(unsupported);
    }
    let shape = match Shape::fixed(bit_width) {
        Some(shape) => shape,
        None if bit_width == max => Shape::scalable(bit_width).ok_or(unsupported)?,
        None => return Err(unsupported),
    };
    Ok(SpeciesDescriptor::new(kind, shape))
}

fn preferred_shape(max: usize) -> Shape {
    Shape::FIXED
        .into_iter()
        .rev()
        .find(|s| s.bit_width() <= max)
        .unwrap_or(Shape::S64Bit)
}

fn max_shape(max: usize) -> Shape {
    // config validation keeps the width encodable
    Shape::scalable(max).unwrap_or(Shape::S512Bit)
}

/// Typed species, with the element kind fixed by `E` and the shape chosen at runtime.
pub struct Species<E: Element> {
    shape: Shape,
    _element: PhantomData<fn() -> E>,
}

impl<E: Element> Species<E> {
    pub const fn of(shape: Shape) -> Self {
        Species {
            shape,
            _element: PhantomData,
        }
    }

    pub fn by_width(bit_width: usize) -> Result<Self> {
        by_species(E::KIND, bit_width).map(|desc| Species::of(desc.shape))
    }

    /// Largest fixed shape within the configured maximum.
    pub fn preferred() -> Self {
        Species::of(preferred_shape(config::current().max_bit_width))
    }

    /// Scalable shape spanning the configured maximum width.
    pub fn max() -> Self {
        Species::of(max_shape(config::current().max_bit_width))
    }

    pub fn from_descriptor(desc: SpeciesDescriptor) -> Result<Self> {
        if desc.kind != E::KIND {
            return Err(VectorError::MismatchedSpecies {
                expected: SpeciesDescriptor::new(E::KIND, desc.shape),
                found: desc,
            });
        }
        Ok(Species::of(desc.shape))
    }

    pub const fn descriptor(&self) -> SpeciesDescriptor {
        SpeciesDescriptor::new(E::KIND, self.shape)
    }

    pub const fn kind(&self) -> ElementKind {
        E::KIND
    }

    pub const fn shape(&self) -> Shape {
        self.shape
    }

    pub const fn lane_count(&self) -> usize {
        self.shape.lane_count(E::KIND)
    }

    pub const fn bit_width(&self) -> usize {
        self.shape.bit_width()
    }

    pub const fn byte_size(&self) -> usize {
        self.shape.byte_size()
    }

    /// Fails with `MismatchedSpecies` unless `other` is this species.
    pub fn check(&self, other: &Species<E>) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(VectorError::MismatchedSpecies {
                expected: self.descriptor(),
                found: other.descriptor(),
            })
        }
    }

    pub fn zero(&self) -> Vector<E> {
        Vector::zero(*self)
    }

    pub fn broadcast(&self, value: E) -> Vector<E> {
        Vector::broadcast(*self, value)
    }

    pub fn iota(&self) -> Vector<E> {
        Vector::iota(*self)
    }

    pub fn mask_all(&self, bit: bool) -> Mask<E> {
        Mask::all(*self, bit)
    }

    pub fn iota_shuffle(&self) -> Shuffle<E> {
        Shuffle::iota(*self)
    }
}

impl<E: Element> Clone for Species<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Element> Copy for Species<E> {}

impl<E: Element> PartialEq for Species<E> {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor() == other.descriptor()
    }
}

impl<E: Element> Eq for Species<E> {}

impl<E: Element> Hash for Species<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.descriptor().hash(state);
    }
}

impl<E: Element> Debug for Species<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Species({})", self.descriptor())
    }
}

impl<E: Element> Display for Species<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.descriptor(), f)
    }
}
