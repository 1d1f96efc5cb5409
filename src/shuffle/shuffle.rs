use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};

use crate::error::{Result, VectorError};
use crate::mask::Mask;
use crate::numerics::{AlignedBlock, Element, MAX_LANES, wrap};
use crate::species::Species;
use crate::vector::Vector;

/// A table of source lane indices, one per lane of a species.
///
/// Entries in `[0, lane_count)` are valid. Entries in `[-lane_count, 0)` are
/// exceptional: they stand for an out-of-range source whose wrapped index is
/// `entry + lane_count`.
#[derive(Clone, Copy)]
pub struct Shuffle<E: Element> {
    species: Species<E>,
    indices: [i32; MAX_LANES],
}

impl<E: Element> Shuffle<E> {
    /// Assumes every active entry is already encodable.
    pub(crate) fn from_indices(species: Species<E>, mut indices: [i32; MAX_LANES]) -> Self {
        indices[species.lane_count()..].fill(0);
        Shuffle { species, indices }
    }

    /// Reads entries starting at `offset`, rejecting any outside `[-lane_count, lane_count)`.
    pub fn from_slice(species: Species<E>, src: &[i32], offset: usize) -> Result<Self> {
        let n = species.lane_count();
        let entries = read_window(src, offset, n)?;
        if let Some(&bad) = entries.iter().find(|&&e| !wrap::is_encodable(e, n)) {
            return Err(VectorError::InvalidShuffleIndex {
                index: bad,
                lane_count: n,
            });
        }
        let mut indices = [0; MAX_LANES];
        indices[..n].copy_from_slice(entries);
        Ok(Shuffle::from_indices(species, indices))
    }

    /// Reads entries starting at `offset`, partially wrapping any out-of-range entry.
    pub fn from_slice_wrapping(species: Species<E>, src: &[i32], offset: usize) -> Result<Self> {
        let n = species.lane_count();
        let entries = read_window(src, offset, n)?;
        Ok(Shuffle::from_fn(species, |i| entries[i]))
    }

    /// Lane `i` takes `f(i)`, partially wrapped.
    pub fn from_fn(species: Species<E>, mut f: impl FnMut(usize) -> i32) -> Self {
        let n = species.lane_count();
        let mut indices = [0; MAX_LANES];
        for (i, entry) in indices[..n].iter_mut().enumerate() {
            *entry = wrap::partially_wrap(f(i), n);
        }
        Shuffle::from_indices(species, indices)
    }

    /// The identity shuffle.
    pub fn iota(species: Species<E>) -> Self {
        Shuffle::from_fn(species, |i| i as i32)
    }

    /// Lane `i` reads `start + i * step`. With `wrap` the result is folded into
    /// `[0, lane_count)`, otherwise out-of-range lanes become exceptional.
    pub fn iota_with(species: Species<E>, start: i32, step: i32, wrap: bool) -> Self {
        let n = species.lane_count();
        let shuffle = Shuffle::from_fn(species, |i| start.wrapping_add(step.wrapping_mul(i as i32)));
        if wrap {
            shuffle.wrap_indexes()
        } else {
            debug_assert!(shuffle.as_slice().iter().all(|&e| wrap::is_encodable(e, n)));
            shuffle
        }
    }

    pub fn species(&self) -> Species<E> {
        self.species
    }

    pub fn lane_count(&self) -> usize {
        self.species.lane_count()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.indices[..self.lane_count()]
    }

    pub(crate) fn entries(&self) -> &[i32; MAX_LANES] {
        &self.indices
    }

    pub fn lane_source(&self, lane: usize) -> Result<i32> {
        if lane >= self.lane_count() {
            return Err(VectorError::index(lane, self.lane_count()));
        }
        Ok(self.indices[lane])
    }

    /// Set on lanes whose entry is a valid index.
    pub fn lane_is_valid(&self) -> Mask<E> {
        Mask::from_lanes(self.species, std::array::from_fn(|i| self.indices[i] >= 0))
    }

    /// Replaces every exceptional entry by its wrapped index.
    pub fn wrap_indexes(&self) -> Self {
        let n = self.lane_count();
        let mut indices = self.indices;
        for entry in indices[..n].iter_mut() {
            *entry = wrap::normalize_exceptional(*entry, n);
        }
        Shuffle::from_indices(self.species, indices)
    }

    /// Returns the shuffle unchanged if no entry is exceptional.
    pub fn check_indexes(&self) -> Result<Self> {
        match self.as_slice().iter().find(|&&e| e < 0) {
            Some(&e) => Err(VectorError::index(e, self.lane_count())),
            None => Ok(*self),
        }
    }

    /// Wrapped source index per lane, valid or not.
    pub(crate) fn wrapped_sources(&self) -> [usize; MAX_LANES] {
        let n = self.lane_count();
        std::array::from_fn(|i| {
            if i < n {
                wrap::normalize_exceptional(self.indices[i], n) as usize
            } else {
                0
            }
        })
    }

    /// Entries as lane values, exceptional entries kept negative.
    pub fn to_vector(&self) -> Vector<E> {
        let n = self.lane_count();
        Vector::from_block(
            self.species,
            AlignedBlock::from_fn(n, |i| E::from_index(self.indices[i] as i64)),
        )
    }

    /// Composition: lane `i` of the result is `self[other[i]]`.
    ///
    /// Fails with `IndexOutOfRange` if `other` has an exceptional entry.
    pub fn rearrange(&self, other: &Shuffle<E>) -> Result<Self> {
        self.species.check(&other.species)?;
        let other = other.check_indexes()?;
        let n = self.lane_count();
        let mut indices = [0; MAX_LANES];
        for (i, entry) in indices[..n].iter_mut().enumerate() {
            *entry = self.indices[other.indices[i] as usize];
        }
        Ok(Shuffle::from_indices(self.species, indices))
    }
}

fn read_window(src: &[i32], offset: usize, n: usize) -> Result<&[i32]> {
    offset
        .checked_add(n)
        .filter(|&end| end <= src.len())
        .map(|end| &src[offset..end])
        .ok_or_else(|| VectorError::index(offset, src.len()))
}

impl<E: Element> PartialEq for Shuffle<E> {
    fn eq(&self, other: &Self) -> bool {
        self.species == other.species && self.indices == other.indices
    }
}

impl<E: Element> Eq for Shuffle<E> {}

impl<E: Element> Hash for Shuffle<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.species.hash(state);
        self.as_slice().hash(state);
    }
}

impl<E: Element> Debug for Shuffle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shuffle<{}>{:?}", self.species, self.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Shape;

    fn i32x4() -> Species<i32> {
        Species::of(Shape::S128Bit)
    }

    fn i32x6() -> Species<i32> {
        Species::of(Shape::scalable(192).unwrap())
    }

    #[test]
    fn test_from_slice_validates_range() {
        let s = Shuffle::from_slice(i32x4(), &[3, -4, 0, -1], 0).unwrap();
        assert_eq!(s.as_slice(), &[3, -4, 0, -1]);
        assert_eq!(
            Shuffle::from_slice(i32x4(), &[0, 1, 4, 2], 0),
            Err(VectorError::InvalidShuffleIndex {
                index: 4,
                lane_count: 4
            })
        );
        assert!(Shuffle::from_slice(i32x4(), &[0, -5, 1, 2], 0).is_err());
        assert!(Shuffle::from_slice(i32x4(), &[0, 1, 2], 0).is_err());
    }

    #[test]
    fn test_wrapping_constructors_mark_exceptional_entries() {
        let s = Shuffle::from_slice_wrapping(i32x4(), &[9, 0, 1, 4, 5], 1).unwrap();
        assert_eq!(s.as_slice(), &[0, 1, -4, -3]);
        assert_eq!(s.lane_is_valid().as_slice(), &[true, true, false, false]);

        let s = Shuffle::from_fn(i32x6(), |i| i as i32 * 2);
        assert_eq!(s.as_slice(), &[0, 2, 4, -6, -4, -2]);
    }

    #[test]
    fn test_wrap_indexes_for_both_lane_count_kinds() {
        let s = Shuffle::from_fn(i32x4(), |i| i as i32 + 2);
        assert_eq!(s.wrap_indexes().as_slice(), &[2, 3, 0, 1]);
        let s = Shuffle::from_fn(i32x6(), |i| i as i32 + 4);
        assert_eq!(s.wrap_indexes().as_slice(), &[4, 5, 0, 1, 2, 3]);
    }

    #[test]
    fn test_iota_with() {
        let s = Shuffle::iota_with(i32x4(), 1, 2, false);
        assert_eq!(s.as_slice(), &[1, 3, -3, -1]);
        let s = Shuffle::iota_with(i32x4(), 1, 2, true);
        assert_eq!(s.as_slice(), &[1, 3, 1, 3]);
        assert_eq!(Shuffle::iota(i32x4()).as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_check_indexes() {
        assert!(Shuffle::iota(i32x4()).check_indexes().is_ok());
        let s = Shuffle::from_fn(i32x4(), |i| i as i32 - 1);
        assert_eq!(
            s.check_indexes(),
            Err(VectorError::IndexOutOfRange {
                index: -1,
                length: 4
            })
        );
    }

    #[test]
    fn test_rearrange_composes() {
        let reverse = Shuffle::from_slice(i32x4(), &[3, 2, 1, 0], 0).unwrap();
        let rotate = Shuffle::from_slice(i32x4(), &[1, 2, 3, 0], 0).unwrap();
        assert_eq!(reverse.rearrange(&rotate).unwrap().as_slice(), &[2, 1, 0, 3]);
        assert_eq!(
            reverse.rearrange(&reverse).unwrap(),
            Shuffle::iota(i32x4())
        );
        let bad = Shuffle::from_fn(i32x4(), |i| i as i32 + 1);
        assert!(reverse.rearrange(&bad).is_err());
    }

    #[test]
    fn test_to_vector_and_lane_source() {
        let s = Shuffle::from_slice(i32x4(), &[2, -1, 0, 3], 0).unwrap();
        assert_eq!(s.to_vector().as_slice(), &[2, -1, 0, 3]);
        assert_eq!(s.lane_source(1), Ok(-1));
        assert!(s.lane_source(4).is_err());
    }
}
