use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};

use crate::error::{Result, VectorError};
use crate::numerics::{AlignedBlock, Element};
use crate::species::Species;

/// An immutable, fixed-width vector of `E` lanes.
///
/// The lanes live in an exclusively owned aligned block; lanes past the
/// species' lane count are always zero. Every operation returns a new value.
#[derive(Clone, Copy)]
pub struct Vector<E: Element> {
    species: Species<E>,
    lanes: AlignedBlock<E>,
}

impl<E: Element> Vector<E> {
    /// Wraps a block whose tail past the lane count must already be zero.
    pub(crate) fn from_block(species: Species<E>, lanes: AlignedBlock<E>) -> Self {
        debug_assert!(
            lanes.data[species.lane_count()..]
                .iter()
                .all(|x| x.to_bits() == 0)
        );
        Vector { species, lanes }
    }

    pub fn zero(species: Species<E>) -> Self {
        Vector::from_block(species, AlignedBlock::zeroed())
    }

    pub fn broadcast(species: Species<E>, value: E) -> Self {
        Vector::from_block(species, AlignedBlock::from_fn(species.lane_count(), |_| value))
    }

    /// Lane `i` holds `i`.
    pub fn iota(species: Species<E>) -> Self {
        Vector::from_fn(species, |i| E::from_index(i as i64))
    }

    pub fn from_fn(species: Species<E>, f: impl FnMut(usize) -> E) -> Self {
        Vector::from_block(species, AlignedBlock::from_fn(species.lane_count(), f))
    }

    pub fn species(&self) -> Species<E> {
        self.species
    }

    pub fn lane_count(&self) -> usize {
        self.species.lane_count()
    }

    pub fn lane(&self, lane: usize) -> Result<E> {
        if lane >= self.lane_count() {
            return Err(VectorError::index(lane, self.lane_count()));
        }
        Ok(self.lanes.data[lane])
    }

    /// A copy of this vector with `lane` replaced by `value`.
    pub fn with_lane(&self, lane: usize, value: E) -> Result<Self> {
        if lane >= self.lane_count() {
            return Err(VectorError::index(lane, self.lane_count()));
        }
        let mut lanes = self.lanes;
        lanes.data[lane] = value;
        Ok(Vector::from_block(self.species, lanes))
    }

    pub fn as_slice(&self) -> &[E] {
        &self.lanes.data[..self.lane_count()]
    }

    pub fn to_vec(&self) -> Vec<E> {
        self.as_slice().to_vec()
    }

    pub(crate) fn block(&self) -> &AlignedBlock<E> {
        &self.lanes
    }
}

/// Bitwise equality: NaN lanes with equal payloads compare equal, `-0.0` and `+0.0` do not.
impl<E: Element> PartialEq for Vector<E> {
    fn eq(&self, other: &Self) -> bool {
        self.species == other.species
            && self
                .as_slice()
                .iter()
                .zip(other.as_slice())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl<E: Element> Eq for Vector<E> {}

impl<E: Element> Hash for Vector<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.species.hash(state);
        for lane in self.as_slice() {
            lane.to_bits().hash(state);
        }
    }
}

impl<E: Element> Debug for Vector<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector<{}>{:?}", self.species, self.as_slice())
    }
}

impl<E: Element> Display for Vector<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, lane) in self.as_slice().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{lane}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Shape;

    #[test]
    fn test_factories() {
        let species = Species::<i16>::of(Shape::S64Bit);
        assert_eq!(Vector::zero(species).as_slice(), &[0; 4]);
        assert_eq!(Vector::broadcast(species, 7).as_slice(), &[7; 4]);
        assert_eq!(Vector::iota(species).as_slice(), &[0, 1, 2, 3]);
        assert_eq!(species.iota(), Vector::iota(species));
    }

    #[test]
    fn test_lane_access() {
        let v = Vector::iota(Species::<f64>::of(Shape::S256Bit));
        assert_eq!(v.lane(3), Ok(3.0));
        assert_eq!(
            v.lane(4),
            Err(VectorError::IndexOutOfRange {
                index: 4,
                length: 4
            })
        );
        let w = v.with_lane(0, -1.5).unwrap();
        assert_eq!(w.as_slice(), &[-1.5, 1.0, 2.0, 3.0]);
        // the original is untouched
        assert_eq!(v.lane(0), Ok(0.0));
        assert!(v.with_lane(9, 0.0).is_err());
    }

    #[test]
    fn test_equality_is_bitwise() {
        let species = Species::<f32>::of(Shape::S64Bit);
        let nan = Vector::broadcast(species, f32::NAN);
        assert_eq!(nan, nan);
        assert_ne!(Vector::broadcast(species, 0.0), Vector::broadcast(species, -0.0));
    }

    #[test]
    fn test_display() {
        let v = Vector::iota(Species::<i32>::of(Shape::S128Bit));
        assert_eq!(v.to_string(), "[0, 1, 2, 3]");
    }
}
