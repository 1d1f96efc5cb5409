use crate::numerics::Element;

/// Widest supported register in bits.
pub const MAX_BIT_WIDTH: usize = 512;

/// Lane capacity of every buffer: a 512-bit register of 8-bit lanes.
pub const MAX_LANES: usize = MAX_BIT_WIDTH / 8;

/// Byte capacity of a 512-bit register.
pub const MAX_BYTES: usize = MAX_BIT_WIDTH / 8;

/// Fixed-capacity lane storage owned by exactly one vector value.
///
/// Only the first `lane_count` entries of a species are meaningful, the tail is
/// kept at zero so that whole-buffer comparisons stay valid.
#[repr(C, align(64))]
#[derive(Debug, Clone, Copy)]
pub struct AlignedBlock<E: Element> {
    pub data: [E; MAX_LANES],
}

impl<E: Element> AlignedBlock<E> {
    pub fn zeroed() -> Self {
        AlignedBlock {
            data: [E::ZERO; MAX_LANES],
        }
    }

    /// Copies `lanes` into the head of a fresh block and zero-pads the rest.
    ///
    /// # Panics
    ///
    /// Panics if `lanes` is longer than [`MAX_LANES`].
    pub fn from_padded(lanes: &[E]) -> Self {
        assert!(lanes.len() <= MAX_LANES, "too many lanes for one block");

        let mut block = Self::zeroed();
        block.data[..lanes.len()].copy_from_slice(lanes);
        block
    }

    pub fn from_fn(len: usize, mut f: impl FnMut(usize) -> E) -> Self {
        let mut block = Self::zeroed();
        for (i, lane) in block.data[..len].iter_mut().enumerate() {
            *lane = f(i);
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignedblock_is_aligned_on_simd() {
        assert_eq!(align_of::<AlignedBlock<i8>>(), MAX_BIT_WIDTH / 8);
        assert_eq!(align_of::<AlignedBlock<f64>>(), MAX_BIT_WIDTH / 8);
        // repr(align(XX)) requires an integer *literal*, so the 64 above has to be kept
        // in sync with MAX_BIT_WIDTH by hand. This test is the sanity check.
    }

    #[test]
    fn test_from_padded() {
        let block = AlignedBlock::<i32>::from_padded(&[1, 2, 3, 4, 5]);
        assert_eq!(block.data[0..5], [1, 2, 3, 4, 5]);
        assert!(block.data[5..].iter().all(|&x| x == 0));

        let full: Vec<i8> = (0..MAX_LANES as i8).collect();
        let block = AlignedBlock::<i8>::from_padded(&full);
        assert_eq!(block.data[..], full[..]);
    }

    #[test]
    #[should_panic(expected = "too many lanes for one block")]
    fn test_from_padded_rejects_overflow() {
        let lanes = vec![0.0f32; MAX_LANES + 1];
        let _ = AlignedBlock::<f32>::from_padded(&lanes);
    }

    #[test]
    fn test_from_fn_leaves_tail_zeroed() {
        let block = AlignedBlock::<i64>::from_fn(3, |i| i as i64 + 10);
        assert_eq!(block.data[..3], [10, 11, 12]);
        assert!(block.data[3..].iter().all(|&x| x == 0));
    }
}
