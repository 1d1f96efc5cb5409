//! Loads and stores against element slices and byte buffers.
//!
//! Every access is bounds-checked up front, so a failing load or store never
//! reads or writes a partial vector. Masked variants only check and touch the
//! selected lanes; unselected lanes load as zero and leave the destination as is.

use crate::error::{Result, VectorError};
use crate::mask::Mask;
use crate::numerics::{AlignedBlock, ByteOrder, Element};
use crate::species::Species;
use crate::vector::Vector;

/// Checks that `count` units starting at `offset` fit in `len`.
fn check_window(offset: usize, count: usize, len: usize) -> Result<()> {
    match offset.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(VectorError::index(offset, len)),
    }
}

/// Checks that every lane selected by `mask` fits, lane `i` spanning
/// `unit` units starting at `offset + i * unit`.
fn check_selected<E: Element>(mask: &Mask<E>, offset: usize, unit: usize, len: usize) -> Result<()> {
    for (i, _) in mask.as_slice().iter().enumerate().filter(|&(_, &set)| set) {
        let start = offset.saturating_add(i * unit);
        check_window(start, unit, len)?;
    }
    Ok(())
}

impl<E: Element> Vector<E> {
    pub fn from_slice(species: Species<E>, src: &[E], offset: usize) -> Result<Self> {
        let n = species.lane_count();
        check_window(offset, n, src.len())?;
        Ok(Vector::from_block(
            species,
            AlignedBlock::from_padded(&src[offset..offset + n]),
        ))
    }

    pub fn from_slice_masked(
        species: Species<E>,
        src: &[E],
        offset: usize,
        mask: &Mask<E>,
    ) -> Result<Self> {
        species.check(&mask.species())?;
        check_selected(mask, offset, 1, src.len())?;
        let lanes = mask.lanes();
        Ok(Vector::from_fn(species, |i| {
            if lanes[i] { src[offset + i] } else { E::ZERO }
        }))
    }

    pub fn into_slice(&self, dst: &mut [E], offset: usize) -> Result<()> {
        let n = self.lane_count();
        check_window(offset, n, dst.len())?;
        dst[offset..offset + n].copy_from_slice(self.as_slice());
        Ok(())
    }

    pub fn into_slice_masked(&self, dst: &mut [E], offset: usize, mask: &Mask<E>) -> Result<()> {
        self.species().check(&mask.species())?;
        check_selected(mask, offset, 1, dst.len())?;
        for (i, &lane) in self.as_slice().iter().enumerate() {
            if mask.lanes()[i] {
                dst[offset + i] = lane;
            }
        }
        Ok(())
    }

    pub fn from_bytes(species: Species<E>, src: &[u8], offset: usize, order: ByteOrder) -> Result<Self> {
        check_window(offset, species.byte_size(), src.len())?;
        let size = E::KIND.byte_size();
        Ok(Vector::from_fn(species, |i| {
            E::read_bytes(&src[offset + i * size..], order)
        }))
    }

    pub fn from_bytes_masked(
        species: Species<E>,
        src: &[u8],
        offset: usize,
        order: ByteOrder,
        mask: &Mask<E>,
    ) -> Result<Self> {
        species.check(&mask.species())?;
        let size = E::KIND.byte_size();
        check_selected(mask, offset, size, src.len())?;
        let lanes = mask.lanes();
        Ok(Vector::from_fn(species, |i| {
            if lanes[i] {
                E::read_bytes(&src[offset + i * size..], order)
            } else {
                E::ZERO
            }
        }))
    }

    pub fn into_bytes(&self, dst: &mut [u8], offset: usize, order: ByteOrder) -> Result<()> {
        check_window(offset, self.species().byte_size(), dst.len())?;
        let size = E::KIND.byte_size();
        for (i, lane) in self.as_slice().iter().enumerate() {
            lane.write_bytes(&mut dst[offset + i * size..], order);
        }
        Ok(())
    }

    pub fn into_bytes_masked(
        &self,
        dst: &mut [u8],
        offset: usize,
        order: ByteOrder,
        mask: &Mask<E>,
    ) -> Result<()> {
        self.species().check(&mask.species())?;
        let size = E::KIND.byte_size();
        check_selected(mask, offset, size, dst.len())?;
        for (i, lane) in self.as_slice().iter().enumerate() {
            if mask.lanes()[i] {
                lane.write_bytes(&mut dst[offset + i * size..], order);
            }
        }
        Ok(())
    }
}
