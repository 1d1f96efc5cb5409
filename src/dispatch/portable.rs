use std::simd::{
    Mask, Select, Simd, StdFloat,
    cmp::{SimdOrd, SimdPartialEq, SimdPartialOrd},
    num::{SimdFloat, SimdInt, SimdUint},
};

use crate::dispatch::ExecutionStrategy;
use crate::mask::MaskOp;
use crate::numerics::Element;
use crate::vector::{BinaryOp, Comparison, ReductionOp, TernaryOp, UnaryOp};

/// `std::simd` execution over one register of `N` lanes.
///
/// Only lane counts `std::simd` can hold in a single vector are recognized;
/// scalable shapes with other lane counts fall back. Operations whose vector
/// form does not match the scalar reference bit for bit are declined: integral
/// division, floating min/max (NaN and signed zero handling differ) and
/// floating reductions (the vector reductions reassociate).
#[derive(Debug, Clone, Copy, Default)]
pub struct PortableSimd;

/// Per-element `std::simd` kernels. Implemented for every [`Element`] type.
#[doc(hidden)]
pub trait PortableLanes: Sized {
    fn simd_unary(op: UnaryOp, a: &[Self], out: &mut [Self]) -> bool;
    fn simd_binary(op: BinaryOp, a: &[Self], b: &[Self], out: &mut [Self]) -> bool;
    fn simd_ternary(op: TernaryOp, a: &[Self], b: &[Self], c: &[Self], out: &mut [Self]) -> bool;
    fn simd_compare(op: Comparison, a: &[Self], b: &[Self], out: &mut [bool]) -> bool;
    fn simd_blend(a: &[Self], b: &[Self], mask: &[bool], out: &mut [Self]) -> bool;
    fn simd_reduce(op: ReductionOp, a: &[Self]) -> Option<Self>;
    fn simd_gather(src: &[Self], indices: &[usize], out: &mut [Self]) -> bool;
}

/// Binds `$n` to the runtime lane count as a const, or evaluates `$fallback`
/// when no single `Simd` type has that many lanes.
macro_rules! with_lane_count {
    ($len:expr, |$n:ident| $body:block, $fallback:expr) => {
        match $len {
            1 => {
                const $n: usize = 1;
                $body
            }
            2 => {
                const $n: usize = 2;
                $body
            }
            4 => {
                const $n: usize = 4;
                $body
            }
            8 => {
                const $n: usize = 8;
                $body
            }
            16 => {
                const $n: usize = 16;
                $body
            }
            32 => {
                const $n: usize = 32;
                $body
            }
            64 => {
                const $n: usize = 64;
                $body
            }
            _ => $fallback,
        }
    };
}

/// Kernels shared by integral and floating lanes.
macro_rules! common_kernels {
    ($t:ty, $m:ty) => {
        fn simd_compare(op: Comparison, a: &[Self], b: &[Self], out: &mut [bool]) -> bool {
            with_lane_count!(a.len(), |N| {
                let va = Simd::<$t, N>::from_slice(a);
                let vb = Simd::<$t, N>::from_slice(b);
                let r = match op {
                    Comparison::Eq => va.simd_eq(vb),
                    Comparison::Ne => va.simd_ne(vb),
                    Comparison::Lt => va.simd_lt(vb),
                    Comparison::Le => va.simd_le(vb),
                    Comparison::Gt => va.simd_gt(vb),
                    Comparison::Ge => va.simd_ge(vb),
                };
                out.copy_from_slice(&r.to_array());
                true
            }, false)
        }

        fn simd_blend(a: &[Self], b: &[Self], mask: &[bool], out: &mut [Self]) -> bool {
            with_lane_count!(a.len(), |N| {
                let va = Simd::<$t, N>::from_slice(a);
                let vb = Simd::<$t, N>::from_slice(b);
                let selector = Mask::<$m, N>::from_array(std::array::from_fn(|i| mask[i]));
                selector.select(vb, va).copy_to_slice(out);
                true
            }, false)
        }

        fn simd_gather(src: &[Self], indices: &[usize], out: &mut [Self]) -> bool {
            with_lane_count!(indices.len(), |N| {
                let idxs = Simd::<usize, N>::from_slice(indices);
                Simd::<$t, N>::gather_or_default(src, idxs).copy_to_slice(out);
                true
            }, false)
        }
    };
}

macro_rules! impl_portable_integral {
    ($t:ty, $u:ty) => {
        impl PortableLanes for $t {
            fn simd_unary(op: UnaryOp, a: &[Self], out: &mut [Self]) -> bool {
                with_lane_count!(a.len(), |N| {
                    let va = Simd::<$t, N>::from_slice(a);
                    let zero = Simd::<$t, N>::splat(0);
                    let r = match op {
                        UnaryOp::Neg => zero - va,
                        UnaryOp::Abs => va.simd_lt(zero).select(zero - va, va),
                        UnaryOp::Not => !va,
                        UnaryOp::Sqrt => return false,
                    };
                    r.copy_to_slice(out);
                    true
                }, false)
            }

            fn simd_binary(op: BinaryOp, a: &[Self], b: &[Self], out: &mut [Self]) -> bool {
                with_lane_count!(a.len(), |N| {
                    let va = Simd::<$t, N>::from_slice(a);
                    let vb = Simd::<$t, N>::from_slice(b);
                    let count = vb & Simd::<$t, N>::splat(<$t>::BITS as $t - 1);
                    let r = match op {
                        BinaryOp::Add => va + vb,
                        BinaryOp::Sub => va - vb,
                        BinaryOp::Mul => va * vb,
                        BinaryOp::Div => return false,
                        BinaryOp::Min => va.simd_min(vb),
                        BinaryOp::Max => va.simd_max(vb),
                        BinaryOp::And => va & vb,
                        BinaryOp::Or => va | vb,
                        BinaryOp::Xor => va ^ vb,
                        BinaryOp::AndNot => va & !vb,
                        BinaryOp::Lshl => va << count,
                        BinaryOp::Ashr => va >> count,
                        BinaryOp::Lshr => (va.cast::<$u>() >> count.cast::<$u>()).cast::<$t>(),
                    };
                    r.copy_to_slice(out);
                    true
                }, false)
            }

            fn simd_ternary(
                op: TernaryOp,
                a: &[Self],
                b: &[Self],
                c: &[Self],
                out: &mut [Self],
            ) -> bool {
                with_lane_count!(a.len(), |N| {
                    let va = Simd::<$t, N>::from_slice(a);
                    let vb = Simd::<$t, N>::from_slice(b);
                    let vc = Simd::<$t, N>::from_slice(c);
                    let r = match op {
                        TernaryOp::Fma => va * vb + vc,
                        TernaryOp::BitwiseBlend => va ^ ((va ^ vb) & vc),
                    };
                    r.copy_to_slice(out);
                    true
                }, false)
            }

            fn simd_reduce(op: ReductionOp, a: &[Self]) -> Option<Self> {
                with_lane_count!(a.len(), |N| {
                    let va = Simd::<$t, N>::from_slice(a);
                    Some(match op {
                        ReductionOp::Add => va.reduce_sum(),
                        ReductionOp::Mul => va.reduce_product(),
                        ReductionOp::Min => va.reduce_min(),
                        ReductionOp::Max => va.reduce_max(),
                        ReductionOp::And => va.reduce_and(),
                        ReductionOp::Or => va.reduce_or(),
                        ReductionOp::Xor => va.reduce_xor(),
                    })
                }, None)
            }

            common_kernels!($t, $t);
        }
    };
}

macro_rules! impl_portable_floating {
    ($t:ty, $m:ty) => {
        impl PortableLanes for $t {
            fn simd_unary(op: UnaryOp, a: &[Self], out: &mut [Self]) -> bool {
                with_lane_count!(a.len(), |N| {
                    let va = Simd::<$t, N>::from_slice(a);
                    let r = match op {
                        UnaryOp::Neg => -va,
                        UnaryOp::Abs => va.abs(),
                        UnaryOp::Sqrt => va.sqrt(),
                        UnaryOp::Not => return false,
                    };
                    r.copy_to_slice(out);
                    true
                }, false)
            }

            fn simd_binary(op: BinaryOp, a: &[Self], b: &[Self], out: &mut [Self]) -> bool {
                with_lane_count!(a.len(), |N| {
                    let va = Simd::<$t, N>::from_slice(a);
                    let vb = Simd::<$t, N>::from_slice(b);
                    let r = match op {
                        BinaryOp::Add => va + vb,
                        BinaryOp::Sub => va - vb,
                        BinaryOp::Mul => va * vb,
                        BinaryOp::Div => va / vb,
                        _ => return false,
                    };
                    r.copy_to_slice(out);
                    true
                }, false)
            }

            fn simd_ternary(
                op: TernaryOp,
                a: &[Self],
                b: &[Self],
                c: &[Self],
                out: &mut [Self],
            ) -> bool {
                with_lane_count!(a.len(), |N| {
                    let va = Simd::<$t, N>::from_slice(a);
                    let vb = Simd::<$t, N>::from_slice(b);
                    let vc = Simd::<$t, N>::from_slice(c);
                    let r = match op {
                        TernaryOp::Fma => va.mul_add(vb, vc),
                        TernaryOp::BitwiseBlend => return false,
                    };
                    r.copy_to_slice(out);
                    true
                }, false)
            }

            fn simd_reduce(_op: ReductionOp, _a: &[Self]) -> Option<Self> {
                None
            }

            common_kernels!($t, $m);
        }
    };
}

impl_portable_integral!(i8, u8);
impl_portable_integral!(i16, u16);
impl_portable_integral!(i32, u32);
impl_portable_integral!(i64, u64);
impl_portable_floating!(f32, i32);
impl_portable_floating!(f64, i64);

impl ExecutionStrategy for PortableSimd {
    fn unary<E: Element>(&self, op: UnaryOp, a: &[E], out: &mut [E]) -> bool {
        E::simd_unary(op, a, out)
    }

    fn binary<E: Element>(&self, op: BinaryOp, a: &[E], b: &[E], out: &mut [E]) -> bool {
        E::simd_binary(op, a, b, out)
    }

    fn ternary<E: Element>(
        &self,
        op: TernaryOp,
        a: &[E],
        b: &[E],
        c: &[E],
        out: &mut [E],
    ) -> bool {
        E::simd_ternary(op, a, b, c, out)
    }

    fn compare<E: Element>(&self, op: Comparison, a: &[E], b: &[E], out: &mut [bool]) -> bool {
        E::simd_compare(op, a, b, out)
    }

    fn blend<E: Element>(&self, a: &[E], b: &[E], mask: &[bool], out: &mut [E]) -> bool {
        E::simd_blend(a, b, mask, out)
    }

    fn reduce<E: Element>(&self, op: ReductionOp, a: &[E]) -> Option<E> {
        E::simd_reduce(op, a)
    }

    fn gather<E: Element>(&self, src: &[E], indices: &[usize], out: &mut [E]) -> bool {
        E::simd_gather(src, indices, out)
    }

    // no single-register form
    fn compress<E: Element>(&self, _a: &[E], _mask: &[bool], _out: &mut [E]) -> bool {
        false
    }

    fn expand<E: Element>(&self, _a: &[E], _mask: &[bool], _out: &mut [E]) -> bool {
        false
    }

    fn mask_binary(&self, op: MaskOp, a: &[bool], b: &[bool], out: &mut [bool]) -> bool {
        with_lane_count!(a.len(), |N| {
            let ma = Mask::<i8, N>::from_array(std::array::from_fn(|i| a[i]));
            let mb = Mask::<i8, N>::from_array(std::array::from_fn(|i| b[i]));
            let r = match op {
                MaskOp::And => ma & mb,
                MaskOp::Or => ma | mb,
                MaskOp::Xor => ma ^ mb,
                MaskOp::AndNot => ma & !mb,
            };
            out.copy_from_slice(&r.to_array());
            true
        }, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::ScalarLoop;

    #[test]
    fn test_declines_non_register_lane_counts() {
        let a = [1i32; 6];
        let mut out = [0i32; 6];
        assert!(!PortableSimd.binary(BinaryOp::Add, &a, &a, &mut out));
        assert_eq!(out, [0; 6]);
        assert!(PortableSimd.binary(BinaryOp::Add, &a[..4], &a[..4], &mut out[..4]));
        assert_eq!(out[..4], [2; 4]);
    }

    #[test]
    fn test_declines_lanes_without_bit_exact_vector_form() {
        let mut out = [0.0f32; 4];
        assert!(!PortableSimd.binary(BinaryOp::Min, &[0.0; 4], &[-0.0; 4], &mut out));
        assert!(PortableSimd.reduce(ReductionOp::Add, &[1.0f64; 4]).is_none());
        let mut out = [0i8; 8];
        assert!(!PortableSimd.binary(BinaryOp::Div, &[1; 8], &[1; 8], &mut out));
    }

    #[test]
    fn test_shifts_match_scalar_for_oversized_counts() {
        let a = [1i16, -1, i16::MIN, 12345, 7, -7, 0, 99];
        let counts = [0i16, 1, 15, 16, 17, -1, 300, -16];
        for op in [BinaryOp::Lshl, BinaryOp::Lshr, BinaryOp::Ashr] {
            let mut simd = [0i16; 8];
            let mut scalar = [0i16; 8];
            assert!(PortableSimd.binary(op, &a, &counts, &mut simd));
            ScalarLoop.binary(op, &a, &counts, &mut scalar);
            assert_eq!(simd, scalar, "{op:?}");
        }
    }

    #[test]
    fn test_integral_abs_and_neg_wrap() {
        let a = [i32::MIN, -5, 0, 5];
        let mut out = [0; 4];
        assert!(PortableSimd.unary(UnaryOp::Abs, &a, &mut out));
        assert_eq!(out, [i32::MIN, 5, 0, 5]);
        assert!(PortableSimd.unary(UnaryOp::Neg, &a, &mut out));
        assert_eq!(out, [i32::MIN, 5, 0, -5]);
    }

    #[test]
    fn test_integral_reductions_wrap() {
        let a = [i8::MAX, 1, 0, 0];
        assert_eq!(PortableSimd.reduce(ReductionOp::Add, &a), Some(i8::MIN));
        assert_eq!(PortableSimd.reduce(ReductionOp::And, &[-1i64, 6]), Some(6));
    }

    #[test]
    fn test_float_blend_and_compare() {
        let mut out = [0.0f64; 2];
        assert!(PortableSimd.blend(&[1.0, 2.0], &[3.0, 4.0], &[false, true], &mut out));
        assert_eq!(out, [1.0, 4.0]);
        let mut bits = [false; 2];
        assert!(PortableSimd.compare(Comparison::Ne, &[f64::NAN, 1.0], &[f64::NAN, 1.0], &mut bits));
        assert_eq!(bits, [true, false]);
    }

    #[test]
    fn test_mask_ops() {
        let mut out = [false; 4];
        let a = [true, true, false, false];
        let b = [true, false, true, false];
        assert!(PortableSimd.mask_binary(MaskOp::AndNot, &a, &b, &mut out));
        assert_eq!(out, [false, true, false, false]);
    }
}
