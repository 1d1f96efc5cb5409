use crate::mask::MaskOp;
use crate::numerics::Element;
use crate::vector::{BinaryOp, Comparison, ReductionOp, TernaryOp, UnaryOp};

/// One way of computing lane-wise operations over the active lanes of a value.
///
/// Every slice handed to a strategy holds exactly the active lanes of one
/// species. A strategy returns `false` (or `None`) when it does not recognize
/// an operation, in which case it must not have written anything and the
/// caller falls back to the scalar loop. Recognized operations must produce
/// the same bits as [`ScalarLoop`](crate::dispatch::ScalarLoop).
pub trait ExecutionStrategy {
    fn unary<E: Element>(&self, op: UnaryOp, a: &[E], out: &mut [E]) -> bool;

    fn binary<E: Element>(&self, op: BinaryOp, a: &[E], b: &[E], out: &mut [E]) -> bool;

    fn ternary<E: Element>(&self, op: TernaryOp, a: &[E], b: &[E], c: &[E], out: &mut [E])
    -> bool;

    fn compare<E: Element>(&self, op: Comparison, a: &[E], b: &[E], out: &mut [bool]) -> bool;

    /// Lane `i` of `out` is `b[i]` where `mask[i]` is set and `a[i]` elsewhere.
    fn blend<E: Element>(&self, a: &[E], b: &[E], mask: &[bool], out: &mut [E]) -> bool;

    /// Folds all lanes in increasing index order, starting from the operator's identity.
    fn reduce<E: Element>(&self, op: ReductionOp, a: &[E]) -> Option<E>;

    /// `out[i] = src[indices[i]]`. Every index is below `src.len()`.
    fn gather<E: Element>(&self, src: &[E], indices: &[usize], out: &mut [E]) -> bool;

    /// Packs the lanes selected by `mask` into the low lanes of a zeroed `out`.
    fn compress<E: Element>(&self, a: &[E], mask: &[bool], out: &mut [E]) -> bool;

    /// Spreads the low lanes of `a` over the lanes selected by `mask`, zeroing the rest.
    fn expand<E: Element>(&self, a: &[E], mask: &[bool], out: &mut [E]) -> bool;

    fn mask_binary(&self, op: MaskOp, a: &[bool], b: &[bool], out: &mut [bool]) -> bool;
}
