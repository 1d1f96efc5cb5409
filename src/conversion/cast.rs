use crate::conversion::part::{PartLayout, part_layout};
use crate::error::{Result, VectorError};
use crate::mask::Mask;
use crate::numerics::{AlignedBlock, Element};
use crate::shuffle::Shuffle;
use crate::species::Species;
use crate::vector::Vector;

impl<E: Element> Vector<E> {
    /// Value conversion to `F` lanes at this vector's shape.
    pub fn convert<F: Element>(&self, part: i32) -> Result<Vector<F>> {
        self.convert_shape(Species::of(self.species().shape()), part)
    }

    /// Value conversion into `species`, lanes converted with `as` semantics.
    ///
    /// When `species` has fewer lanes, `part` picks which block of this vector is
    /// converted. When it has more, `part` picks where the converted lanes land.
    pub fn convert_shape<F: Element>(&self, species: Species<F>, part: i32) -> Result<Vector<F>> {
        let (n, m) = (self.lane_count(), species.lane_count());
        let src = self.as_slice();
        let lanes = match part_layout(n, m, part)? {
            PartLayout::Extract { offset } => AlignedBlock::from_fn(m, |j| {
                src.get(offset + j)
                    .map_or(F::ZERO, |x| F::from_scalar(x.to_scalar()))
            }),
            PartLayout::Insert { offset } => {
                let mut lanes = AlignedBlock::zeroed();
                for (out, x) in lanes.data[offset..offset + n].iter_mut().zip(src) {
                    *out = F::from_scalar(x.to_scalar());
                }
                lanes
            }
        };
        Ok(Vector::from_block(species, lanes))
    }

    /// Lane-for-lane conversion; the lane counts must match.
    pub fn cast_species<F: Element>(&self, species: Species<F>) -> Result<Vector<F>> {
        if species.lane_count() != self.lane_count() {
            return Err(VectorError::ShapeMismatch {
                from: self.species().descriptor(),
                to: species.descriptor(),
            });
        }
        self.convert_shape(species, 0)
    }
}

impl<E: Element> Mask<E> {
    pub fn cast<F: Element>(&self, species: Species<F>) -> Result<Mask<F>> {
        if species.lane_count() != self.lane_count() {
            return Err(VectorError::ShapeMismatch {
                from: self.species().descriptor(),
                to: species.descriptor(),
            });
        }
        Ok(Mask::from_lanes(species, *self.lanes()))
    }
}

impl<E: Element> Shuffle<E> {
    pub fn cast<F: Element>(&self, species: Species<F>) -> Result<Shuffle<F>> {
        if species.lane_count() != self.lane_count() {
            return Err(VectorError::ShapeMismatch {
                from: self.species().descriptor(),
                to: species.descriptor(),
            });
        }
        Ok(Shuffle::from_indices(species, *self.entries()))
    }
}
