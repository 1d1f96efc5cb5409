use crate::conversion::part::{PartLayout, part_layout};
use crate::error::Result;
use crate::numerics::{ByteOrder, Element, MAX_BYTES};
use crate::species::Species;
use crate::vector::Vector;

impl<E: Element> Vector<E> {
    /// The lanes' bytes in native order, zero past the species' byte size.
    fn byte_image(&self) -> [u8; MAX_BYTES] {
        let mut bytes = [0u8; MAX_BYTES];
        let size = E::KIND.byte_size();
        for (i, lane) in self.as_slice().iter().enumerate() {
            lane.write_bytes(&mut bytes[i * size..], ByteOrder::native());
        }
        bytes
    }

    fn from_byte_image(species: Species<E>, bytes: &[u8; MAX_BYTES]) -> Self {
        let size = E::KIND.byte_size();
        Vector::from_fn(species, |i| E::read_bytes(&bytes[i * size..], ByteOrder::native()))
    }

    /// Views the same bits as `F` lanes at this vector's shape.
    pub fn reinterpret_as<F: Element>(&self) -> Vector<F> {
        Vector::from_byte_image(Species::of(self.species().shape()), &self.byte_image())
    }

    /// Views the same bits in `species`. A narrower target takes the `part`-th
    /// block of bytes, a wider one receives the bytes at block `-part` and is
    /// zero elsewhere.
    pub fn reinterpret_shape<F: Element>(&self, species: Species<F>, part: i32) -> Result<Vector<F>> {
        let (src, dst) = (self.species().byte_size(), species.byte_size());
        let image = self.byte_image();
        let mut out = [0u8; MAX_BYTES];
        match part_layout(src, dst, part)? {
            PartLayout::Extract { offset } => {
                let end = (offset + dst).min(src);
                out[..end - offset].copy_from_slice(&image[offset..end]);
            }
            PartLayout::Insert { offset } => {
                out[offset..offset + src].copy_from_slice(&image[..src]);
            }
        }
        Ok(Vector::from_byte_image(species, &out))
    }
}
