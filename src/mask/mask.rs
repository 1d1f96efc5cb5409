use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};

use crate::dispatch::dispatcher;
use crate::error::{Result, VectorError};
use crate::numerics::{AlignedBlock, Element, MAX_LANES};
use crate::species::Species;
use crate::vector::Vector;

/// Lane-wise boolean combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskOp {
    And,
    Or,
    Xor,
    AndNot,
}

impl MaskOp {
    pub const ALL: [MaskOp; 4] = [MaskOp::And, MaskOp::Or, MaskOp::Xor, MaskOp::AndNot];

    #[inline]
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            MaskOp::And => a & b,
            MaskOp::Or => a | b,
            MaskOp::Xor => a ^ b,
            MaskOp::AndNot => a & !b,
        }
    }
}

/// One boolean per lane of a species. Lanes past the lane count are always unset.
#[derive(Clone, Copy)]
pub struct Mask<E: Element> {
    species: Species<E>,
    bits: [bool; MAX_LANES],
}

impl<E: Element> Mask<E> {
    pub(crate) fn from_lanes(species: Species<E>, mut bits: [bool; MAX_LANES]) -> Self {
        bits[species.lane_count()..].fill(false);
        Mask { species, bits }
    }

    pub fn all(species: Species<E>, bit: bool) -> Self {
        Mask::from_lanes(species, [bit; MAX_LANES])
    }

    /// Reads one lane per bool of `src`, starting at `offset`.
    pub fn from_slice(species: Species<E>, src: &[bool], offset: usize) -> Result<Self> {
        let n = species.lane_count();
        let end = offset
            .checked_add(n)
            .filter(|&end| end <= src.len())
            .ok_or_else(|| VectorError::index(offset, src.len()))?;

        let mut bits = [false; MAX_LANES];
        bits[..n].copy_from_slice(&src[offset..end]);
        Ok(Mask::from_lanes(species, bits))
    }

    /// Lane `i` is set iff bit `i` of `bits` is. Bits past the lane count are ignored.
    pub fn from_bits(species: Species<E>, bits: u64) -> Self {
        let lanes = std::array::from_fn(|i| (bits >> i) & 1 == 1);
        Mask::from_lanes(species, lanes)
    }

    /// Lane `i` is set iff `0 <= offset + i < limit`, for bounds checks on loop tails.
    pub fn index_in_range(species: Species<E>, offset: i64, limit: i64) -> Self {
        let lanes = std::array::from_fn(|i| {
            let index = offset.saturating_add(i as i64);
            0 <= index && index < limit
        });
        Mask::from_lanes(species, lanes)
    }

    pub fn species(&self) -> Species<E> {
        self.species
    }

    pub fn lane_count(&self) -> usize {
        self.species.lane_count()
    }

    pub fn lane_is_set(&self, lane: usize) -> Result<bool> {
        if lane >= self.lane_count() {
            return Err(VectorError::index(lane, self.lane_count()));
        }
        Ok(self.bits[lane])
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits[..self.lane_count()]
    }

    pub(crate) fn lanes(&self) -> &[bool; MAX_LANES] {
        &self.bits
    }

    /// Combines two masks of the same species lane by lane.
    pub fn combine(&self, op: MaskOp, other: &Mask<E>) -> Result<Self> {
        self.species.check(&other.species)?;
        let bits = dispatcher::mask_binary(op, &self.bits, &other.bits, self.lane_count());
        Ok(Mask::from_lanes(self.species, bits))
    }

    pub fn and(&self, other: &Mask<E>) -> Result<Self> {
        self.combine(MaskOp::And, other)
    }

    pub fn or(&self, other: &Mask<E>) -> Result<Self> {
        self.combine(MaskOp::Or, other)
    }

    pub fn xor(&self, other: &Mask<E>) -> Result<Self> {
        self.combine(MaskOp::Xor, other)
    }

    pub fn and_not(&self, other: &Mask<E>) -> Result<Self> {
        self.combine(MaskOp::AndNot, other)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(&self) -> Self {
        let all = Mask::all(self.species, true);
        let bits = dispatcher::mask_binary(MaskOp::Xor, &self.bits, &all.bits, self.lane_count());
        Mask::from_lanes(self.species, bits)
    }

    pub fn true_count(&self) -> usize {
        self.as_slice().iter().filter(|&&b| b).count()
    }

    pub fn first_true(&self) -> Option<usize> {
        self.as_slice().iter().position(|&b| b)
    }

    pub fn last_true(&self) -> Option<usize> {
        self.as_slice().iter().rposition(|&b| b)
    }

    pub fn any_true(&self) -> bool {
        self.as_slice().contains(&true)
    }

    pub fn all_true(&self) -> bool {
        self.as_slice().iter().all(|&b| b)
    }

    /// Packs the lanes into an integer, lane `i` at bit `i`.
    pub fn to_bits(&self) -> Result<u64> {
        let n = self.lane_count();
        if n > u64::BITS as usize {
            return Err(VectorError::MaskTooWide {
                lanes: n,
                bits: u64::BITS,
            });
        }
        Ok(self
            .as_slice()
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &b)| acc | ((b as u64) << i)))
    }

    /// Moves the set lanes to a contiguous prefix.
    pub fn compress(&self) -> Self {
        let count = self.true_count();
        Mask::from_lanes(self.species, std::array::from_fn(|i| i < count))
    }

    /// All bits set on set lanes, zero elsewhere.
    pub fn to_vector(&self) -> Vector<E> {
        let ones = E::from_bits(u64::MAX);
        let n = self.lane_count();
        Vector::from_block(
            self.species,
            AlignedBlock::from_fn(n, |i| if self.bits[i] { ones } else { E::ZERO }),
        )
    }
}

impl<E: Element> PartialEq for Mask<E> {
    fn eq(&self, other: &Self) -> bool {
        self.species == other.species && self.bits == other.bits
    }
}

impl<E: Element> Eq for Mask<E> {}

impl<E: Element> Hash for Mask<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.species.hash(state);
        self.as_slice().hash(state);
    }
}

impl<E: Element> Debug for Mask<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mask<{}>", self.species)?;
        f.debug_list()
            .entries(self.as_slice().iter().map(|&b| if b { 'T' } else { '.' }))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Shape;

    fn i32x4() -> Species<i32> {
        Species::of(Shape::S128Bit)
    }

    fn mask(bits: &[bool]) -> Mask<i32> {
        Mask::from_slice(i32x4(), bits, 0).unwrap()
    }

    #[test]
    fn test_not_is_xor_with_all_true() {
        let m = mask(&[true, false, false, true]);
        assert_eq!(m.not(), mask(&[false, true, true, false]));
        assert_eq!(m.not().not(), m);
        assert_eq!(m.not(), m.xor(&Mask::all(i32x4(), true)).unwrap());
    }

    #[test]
    fn test_combinators() {
        let a = mask(&[true, true, false, false]);
        let b = mask(&[true, false, true, false]);
        assert_eq!(a.and(&b).unwrap(), mask(&[true, false, false, false]));
        assert_eq!(a.or(&b).unwrap(), mask(&[true, true, true, false]));
        assert_eq!(a.xor(&b).unwrap(), mask(&[false, true, true, false]));
        assert_eq!(a.and_not(&b).unwrap(), mask(&[false, true, false, false]));
    }

    #[test]
    fn test_combining_different_species_fails() {
        let a = mask(&[true; 4]);
        let b = Mask::<i32>::all(Species::of(Shape::S256Bit), true);
        assert!(matches!(a.and(&b), Err(VectorError::MismatchedSpecies { .. })));
    }

    #[test]
    fn test_queries() {
        let m = mask(&[false, true, false, true]);
        assert_eq!(m.true_count(), 2);
        assert_eq!(m.first_true(), Some(1));
        assert_eq!(m.last_true(), Some(3));
        assert!(m.any_true());
        assert!(!m.all_true());
        let none = Mask::all(i32x4(), false);
        assert_eq!(none.first_true(), None);
        assert_eq!(none.last_true(), None);
        assert!(!none.any_true());
    }

    #[test]
    fn test_bits_round_trip() {
        let m = mask(&[true, false, true, true]);
        assert_eq!(m.to_bits().unwrap(), 0b1101);
        assert_eq!(Mask::from_bits(i32x4(), 0b1101), m);
        // high bits beyond the lane count are dropped
        assert_eq!(Mask::from_bits(i32x4(), u64::MAX).to_bits().unwrap(), 0b1111);

        let wide = Mask::<i8>::all(Species::of(Shape::S512Bit), true);
        assert_eq!(wide.to_bits().unwrap(), u64::MAX);
    }

    #[test]
    fn test_index_in_range() {
        let m = Mask::index_in_range(i32x4(), 6, 8);
        assert_eq!(m, mask(&[true, true, false, false]));
        let m = Mask::index_in_range(i32x4(), -1, 8);
        assert_eq!(m, mask(&[false, true, true, true]));
    }

    #[test]
    fn test_lane_access() {
        let m = mask(&[false, true, false, false]);
        assert_eq!(m.lane_is_set(1), Ok(true));
        assert_eq!(
            m.lane_is_set(4),
            Err(VectorError::IndexOutOfRange {
                index: 4,
                length: 4
            })
        );
    }

    #[test]
    fn test_from_slice_bounds() {
        let src = [true, false, true, false, true];
        assert_eq!(
            Mask::from_slice(i32x4(), &src, 1).unwrap(),
            mask(&[false, true, false, true])
        );
        assert!(Mask::from_slice(i32x4(), &src, 2).is_err());
    }

    #[test]
    fn test_compress_and_to_vector() {
        let m = mask(&[false, true, false, true]);
        assert_eq!(m.compress(), mask(&[true, true, false, false]));
        assert_eq!(m.to_vector().as_slice(), &[0, -1, 0, -1]);
    }
}
