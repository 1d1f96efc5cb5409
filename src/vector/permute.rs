use crate::dispatch::dispatcher;
use crate::error::{Result, VectorError};
use crate::mask::Mask;
use crate::numerics::Element;
use crate::shuffle::Shuffle;
use crate::vector::Vector;

impl<E: Element> Vector<E> {
    fn gather(&self, shuffle: &Shuffle<E>) -> Vector<E> {
        let lanes = dispatcher::gather(self.block(), &shuffle.wrapped_sources(), self.lane_count());
        Vector::from_block(self.species(), lanes)
    }

    /// Lane `i` of the result is lane `shuffle[i]` of this vector.
    ///
    /// Fails with `IndexOutOfRange` if the shuffle has an exceptional entry.
    pub fn rearrange(&self, shuffle: &Shuffle<E>) -> Result<Self> {
        self.species().check(&shuffle.species())?;
        let shuffle = shuffle.check_indexes()?;
        Ok(self.gather(&shuffle))
    }

    /// Rearranges the selected lanes and zeroes the rest. Exceptional entries
    /// are only an error on selected lanes.
    pub fn rearrange_masked(&self, shuffle: &Shuffle<E>, mask: &Mask<E>) -> Result<Self> {
        self.species().check(&shuffle.species())?;
        self.species().check(&mask.species())?;
        let n = self.lane_count();
        let exceptional = shuffle
            .as_slice()
            .iter()
            .zip(mask.as_slice())
            .find(|&(&e, &set)| set && e < 0);
        if let Some((&e, _)) = exceptional {
            return Err(VectorError::index(e, n));
        }
        let gathered = self.gather(shuffle);
        Vector::zero(self.species()).blend(&gathered, mask)
    }

    /// Valid entries read from this vector, exceptional entries read `fallback`
    /// at the wrapped index.
    pub fn rearrange_with(&self, shuffle: &Shuffle<E>, fallback: &Vector<E>) -> Result<Self> {
        self.species().check(&shuffle.species())?;
        self.species().check(&fallback.species())?;
        let from_self = self.gather(shuffle);
        let from_fallback = fallback.gather(shuffle);
        from_fallback.blend(&from_self, &shuffle.lane_is_valid())
    }

    /// Uses this vector's lanes as indices into `v`: lane `i` is `v[self[i]]`.
    pub fn select_from(&self, v: &Vector<E>) -> Result<Self> {
        v.rearrange(&self.to_shuffle())
    }

    /// Lanes `origin..origin + lane_count` of this vector followed by `v`.
    pub fn slice(&self, origin: usize, v: &Vector<E>) -> Result<Self> {
        let n = self.lane_count();
        if origin > n {
            return Err(VectorError::index(origin, n + 1));
        }
        let window = Shuffle::iota_with(self.species(), origin as i32, 1, false);
        self.rearrange_with(&window, v)
    }

    /// Shifts lanes down by `origin`, filling the top with zeroes.
    pub fn slice_zero(&self, origin: usize) -> Result<Self> {
        self.slice(origin, &Vector::zero(self.species()))
    }

    /// Packs the selected lanes into the low lanes, zeroing the rest.
    pub fn compress(&self, mask: &Mask<E>) -> Result<Self> {
        self.species().check(&mask.species())?;
        let lanes = dispatcher::compress(self.block(), mask.lanes(), self.lane_count());
        Ok(Vector::from_block(self.species(), lanes))
    }

    /// Inverse of [`Vector::compress`]: the low lanes are spread over the selected lanes.
    pub fn expand(&self, mask: &Mask<E>) -> Result<Self> {
        self.species().check(&mask.species())?;
        let lanes = dispatcher::expand(self.block(), mask.lanes(), self.lane_count());
        Ok(Vector::from_block(self.species(), lanes))
    }

    /// Lane values as shuffle entries, partially wrapped. Floating lanes are
    /// truncated toward zero, values beyond `i32` saturate.
    pub fn to_shuffle(&self) -> Shuffle<E> {
        let lanes = self.as_slice();
        Shuffle::from_fn(self.species(), |i| {
            lanes[i].to_index().clamp(i32::MIN as i64, i32::MAX as i64) as i32
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::{Shape, Species};

    fn i32x4() -> Species<i32> {
        Species::of(Shape::S128Bit)
    }

    fn v(lanes: &[i32]) -> Vector<i32> {
        Vector::from_slice(i32x4(), lanes, 0).unwrap()
    }

    fn s(entries: &[i32]) -> Shuffle<i32> {
        Shuffle::from_slice(i32x4(), entries, 0).unwrap()
    }

    fn m(bits: &[bool]) -> Mask<i32> {
        Mask::from_slice(i32x4(), bits, 0).unwrap()
    }

    #[test]
    fn test_rearrange() {
        let a = v(&[1, 2, 3, 4]);
        assert_eq!(a.rearrange(&s(&[3, 2, 1, 0])).unwrap(), v(&[4, 3, 2, 1]));
        assert_eq!(a.rearrange(&Shuffle::iota(i32x4())).unwrap(), a);
        assert_eq!(
            a.rearrange(&s(&[0, -2, 1, 1])),
            Err(VectorError::IndexOutOfRange {
                index: -2,
                length: 4
            })
        );
    }

    #[test]
    fn test_rearrange_masked() {
        let a = v(&[1, 2, 3, 4]);
        let shuffle = s(&[3, -1, 0, 0]);
        let r = a
            .rearrange_masked(&shuffle, &m(&[true, false, true, false]))
            .unwrap();
        assert_eq!(r, v(&[4, 0, 1, 0]));
        assert!(a.rearrange_masked(&shuffle, &m(&[false, true, false, false])).is_err());
    }

    #[test]
    fn test_rearrange_with_reads_fallback_for_exceptional_entries() {
        let a = v(&[1, 2, 3, 4]);
        let b = v(&[10, 20, 30, 40]);
        let r = a.rearrange_with(&s(&[0, -4, 2, -1]), &b).unwrap();
        assert_eq!(r, v(&[1, 10, 3, 40]));
    }

    #[test]
    fn test_slice() {
        let a = v(&[1, 2, 3, 4]);
        let b = v(&[5, 6, 7, 8]);
        assert_eq!(a.slice(0, &b).unwrap(), a);
        assert_eq!(a.slice(1, &b).unwrap(), v(&[2, 3, 4, 5]));
        assert_eq!(a.slice(3, &b).unwrap(), v(&[4, 5, 6, 7]));
        assert_eq!(a.slice(4, &b).unwrap(), b);
        assert!(a.slice(5, &b).is_err());
        assert_eq!(a.slice_zero(2).unwrap(), v(&[3, 4, 0, 0]));
    }

    #[test]
    fn test_slice_on_non_power_of_two_lanes() {
        let species = Species::<i64>::of(Shape::scalable(384).unwrap());
        let a = Vector::iota(species);
        let b = Vector::broadcast(species, -1);
        assert_eq!(a.slice(4, &b).unwrap().as_slice(), &[4, 5, -1, -1, -1, -1]);
    }

    #[test]
    fn test_select_from() {
        let indices = v(&[2, 2, 0, 3]);
        let table = v(&[10, 20, 30, 40]);
        assert_eq!(indices.select_from(&table).unwrap(), v(&[30, 30, 10, 40]));
        assert!(v(&[0, 1, 2, 4]).select_from(&table).is_err());
    }

    #[test]
    fn test_compress_expand() {
        let a = v(&[1, 2, 3, 4]);
        let mask = m(&[false, true, false, true]);
        let packed = a.compress(&mask).unwrap();
        assert_eq!(packed, v(&[2, 4, 0, 0]));
        assert_eq!(packed.expand(&mask).unwrap(), v(&[0, 2, 0, 4]));
    }

    #[test]
    fn test_to_shuffle_wraps_partially() {
        let shuffle = v(&[1, 5, -1, -6]).to_shuffle();
        assert_eq!(shuffle.as_slice(), &[1, -3, -1, -2]);
        let species = Species::<f32>::of(Shape::S64Bit);
        let f = Vector::from_slice(species, &[1.9, 1e20], 0).unwrap();
        assert_eq!(f.to_shuffle().as_slice(), &[1, -1]);
    }
}
