use crate::dispatch::ExecutionStrategy;
use crate::mask::MaskOp;
use crate::numerics::Element;
use crate::vector::{BinaryOp, Comparison, LaneOperator, ReductionOp, TernaryOp, UnaryOp};

/// The reference interpreter: one lane at a time through [`Element`]'s scalar
/// semantics. Recognizes every operation defined on `E`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarLoop;

impl ExecutionStrategy for ScalarLoop {
    fn unary<E: Element>(&self, op: UnaryOp, a: &[E], out: &mut [E]) -> bool {
        if !op.supports(E::KIND) {
            return false;
        }
        for (o, &x) in out.iter_mut().zip(a) {
            *o = E::apply_unary(op, x);
        }
        true
    }

    fn binary<E: Element>(&self, op: BinaryOp, a: &[E], b: &[E], out: &mut [E]) -> bool {
        if !op.supports(E::KIND) {
            return false;
        }
        for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
            *o = E::apply_binary(op, x, y);
        }
        true
    }

    fn ternary<E: Element>(
        &self,
        op: TernaryOp,
        a: &[E],
        b: &[E],
        c: &[E],
        out: &mut [E],
    ) -> bool {
        if !op.supports(E::KIND) {
            return false;
        }
        for (i, o) in out.iter_mut().enumerate() {
            *o = E::apply_ternary(op, a[i], b[i], c[i]);
        }
        true
    }

    fn compare<E: Element>(&self, op: Comparison, a: &[E], b: &[E], out: &mut [bool]) -> bool {
        for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
            *o = op.test(x, y);
        }
        true
    }

    fn blend<E: Element>(&self, a: &[E], b: &[E], mask: &[bool], out: &mut [E]) -> bool {
        for (i, o) in out.iter_mut().enumerate() {
            *o = if mask[i] { b[i] } else { a[i] };
        }
        true
    }

    fn reduce<E: Element>(&self, op: ReductionOp, a: &[E]) -> Option<E> {
        if !op.supports(E::KIND) {
            return None;
        }
        let combiner = op.combiner();
        Some(
            a.iter()
                .fold(op.identity::<E>(), |acc, &x| E::apply_binary(combiner, acc, x)),
        )
    }

    fn gather<E: Element>(&self, src: &[E], indices: &[usize], out: &mut [E]) -> bool {
        for (o, &i) in out.iter_mut().zip(indices) {
            *o = src[i];
        }
        true
    }

    fn compress<E: Element>(&self, a: &[E], mask: &[bool], out: &mut [E]) -> bool {
        out.fill(E::ZERO);
        let selected = a.iter().zip(mask).filter(|&(_, &m)| m).map(|(&x, _)| x);
        for (o, x) in out.iter_mut().zip(selected) {
            *o = x;
        }
        true
    }

    fn expand<E: Element>(&self, a: &[E], mask: &[bool], out: &mut [E]) -> bool {
        let mut next = 0;
        for (o, &m) in out.iter_mut().zip(mask) {
            if m {
                *o = a[next];
                next += 1;
            } else {
                *o = E::ZERO;
            }
        }
        true
    }

    fn mask_binary(&self, op: MaskOp, a: &[bool], b: &[bool], out: &mut [bool]) -> bool {
        for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
            *o = op.apply(x, y);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_folds_from_identity_in_order() {
        let lanes = [1.0e8f32, 1.0, -1.0e8, 1.0];
        // strict left fold: ((0 + 1e8) + 1) - 1e8 + 1 loses the first 1.0
        assert_eq!(ScalarLoop.reduce(ReductionOp::Add, &lanes), Some(1.0));
        assert_eq!(ScalarLoop.reduce(ReductionOp::Max, &[3i8, -4, 7]), Some(7));
        assert_eq!(ScalarLoop.reduce::<i32>(ReductionOp::Mul, &[]), Some(1));
    }

    #[test]
    fn test_ops_undefined_on_the_kind_are_declined() {
        let mut out = [7.0f32];
        assert!(!ScalarLoop.binary(BinaryOp::Xor, &[1.0f32], &[2.0], &mut out));
        assert!(!ScalarLoop.unary(UnaryOp::Not, &[1.0f32], &mut out));
        assert!(!ScalarLoop.ternary(TernaryOp::BitwiseBlend, &[1.0f32], &[2.0], &[3.0], &mut out));
        assert_eq!(out, [7.0]);
        assert_eq!(ScalarLoop.reduce::<f32>(ReductionOp::Or, &[1.0, 2.0]), None);
        assert!(!ScalarLoop.unary(UnaryOp::Sqrt, &[4i32], &mut [0]));
        assert!(ScalarLoop.binary(BinaryOp::Xor, &[6i32], &[3], &mut [0]));
    }

    #[test]
    fn test_compress_and_expand() {
        let lanes = [10i32, 20, 30, 40];
        let mask = [false, true, false, true];
        let mut out = [7; 4];
        ScalarLoop.compress(&lanes, &mask, &mut out);
        assert_eq!(out, [20, 40, 0, 0]);
        ScalarLoop.expand(&lanes, &mask, &mut out);
        assert_eq!(out, [0, 10, 0, 20]);
    }

    #[test]
    fn test_blend_and_gather() {
        let mut out = [0i16; 3];
        ScalarLoop.blend(&[1, 2, 3], &[4, 5, 6], &[true, false, true], &mut out);
        assert_eq!(out, [4, 2, 6]);
        ScalarLoop.gather(&[1, 2, 3], &[2, 2, 0], &mut out);
        assert_eq!(out, [3, 3, 1]);
    }
}
