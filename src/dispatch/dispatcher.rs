//! Entry points used by the value types. Each one tries the portable strategy
//! when it is active and runs the scalar loop otherwise, or when it declines.

use tracing::trace;

use crate::dispatch::{Backend, ExecutionStrategy, PortableSimd, ScalarLoop, active_backend};
use crate::mask::MaskOp;
use crate::numerics::{AlignedBlock, Element, MAX_LANES};
use crate::vector::{BinaryOp, Comparison, ReductionOp, TernaryOp, UnaryOp};

fn try_portable<R>(
    op: &'static str,
    lanes: usize,
    run: impl FnOnce(&PortableSimd) -> Option<R>,
) -> Option<R> {
    if active_backend() != Backend::PortableSimd {
        return None;
    }
    let result = run(&PortableSimd);
    if result.is_none() {
        trace!(op, lanes, "portable strategy declined, running scalar loop");
    }
    result
}

pub(crate) fn unary<E: Element>(op: UnaryOp, a: &AlignedBlock<E>, n: usize) -> AlignedBlock<E> {
    let mut out = AlignedBlock::zeroed();
    let (a, dst) = (&a.data[..n], &mut out.data[..n]);
    if try_portable("unary", n, |s| s.unary(op, a, dst).then_some(())).is_none() {
        ScalarLoop.unary(op, a, dst);
    }
    out
}

pub(crate) fn binary<E: Element>(
    op: BinaryOp,
    a: &AlignedBlock<E>,
    b: &AlignedBlock<E>,
    n: usize,
) -> AlignedBlock<E> {
    let mut out = AlignedBlock::zeroed();
    let (a, b, dst) = (&a.data[..n], &b.data[..n], &mut out.data[..n]);
    if try_portable("binary", n, |s| s.binary(op, a, b, dst).then_some(())).is_none() {
        ScalarLoop.binary(op, a, b, dst);
    }
    out
}

pub(crate) fn ternary<E: Element>(
    op: TernaryOp,
    a: &AlignedBlock<E>,
    b: &AlignedBlock<E>,
    c: &AlignedBlock<E>,
    n: usize,
) -> AlignedBlock<E> {
    let mut out = AlignedBlock::zeroed();
    let (a, b, c) = (&a.data[..n], &b.data[..n], &c.data[..n]);
    let dst = &mut out.data[..n];
    if try_portable("ternary", n, |s| s.ternary(op, a, b, c, dst).then_some(())).is_none() {
        ScalarLoop.ternary(op, a, b, c, dst);
    }
    out
}

pub(crate) fn compare<E: Element>(
    op: Comparison,
    a: &AlignedBlock<E>,
    b: &AlignedBlock<E>,
    n: usize,
) -> [bool; MAX_LANES] {
    let mut out = [false; MAX_LANES];
    let (a, b, dst) = (&a.data[..n], &b.data[..n], &mut out[..n]);
    if try_portable("compare", n, |s| s.compare(op, a, b, dst).then_some(())).is_none() {
        ScalarLoop.compare(op, a, b, dst);
    }
    out
}

/// Lanes of `b` where `mask` is set, lanes of `a` elsewhere.
pub(crate) fn blend<E: Element>(
    a: &AlignedBlock<E>,
    b: &AlignedBlock<E>,
    mask: &[bool; MAX_LANES],
    n: usize,
) -> AlignedBlock<E> {
    let mut out = AlignedBlock::zeroed();
    let (a, b, m, dst) = (&a.data[..n], &b.data[..n], &mask[..n], &mut out.data[..n]);
    if try_portable("blend", n, |s| s.blend(a, b, m, dst).then_some(())).is_none() {
        ScalarLoop.blend(a, b, m, dst);
    }
    out
}

pub(crate) fn reduce<E: Element>(op: ReductionOp, a: &AlignedBlock<E>, n: usize) -> E {
    let a = &a.data[..n];
    try_portable("reduce", n, |s| s.reduce(op, a))
        .or_else(|| ScalarLoop.reduce(op, a))
        .unwrap_or_else(|| op.identity())
}

/// `out[i] = src[indices[i]]` with every index already inside `[0, n)`.
pub(crate) fn gather<E: Element>(
    src: &AlignedBlock<E>,
    indices: &[usize; MAX_LANES],
    n: usize,
) -> AlignedBlock<E> {
    let mut out = AlignedBlock::zeroed();
    let (src, idx, dst) = (&src.data[..n], &indices[..n], &mut out.data[..n]);
    if try_portable("gather", n, |s| s.gather(src, idx, dst).then_some(())).is_none() {
        ScalarLoop.gather(src, idx, dst);
    }
    out
}

pub(crate) fn compress<E: Element>(
    a: &AlignedBlock<E>,
    mask: &[bool; MAX_LANES],
    n: usize,
) -> AlignedBlock<E> {
    let mut out = AlignedBlock::zeroed();
    let (a, m, dst) = (&a.data[..n], &mask[..n], &mut out.data[..n]);
    if try_portable("compress", n, |s| s.compress(a, m, dst).then_some(())).is_none() {
        ScalarLoop.compress(a, m, dst);
    }
    out
}

pub(crate) fn expand<E: Element>(
    a: &AlignedBlock<E>,
    mask: &[bool; MAX_LANES],
    n: usize,
) -> AlignedBlock<E> {
    let mut out = AlignedBlock::zeroed();
    let (a, m, dst) = (&a.data[..n], &mask[..n], &mut out.data[..n]);
    if try_portable("expand", n, |s| s.expand(a, m, dst).then_some(())).is_none() {
        ScalarLoop.expand(a, m, dst);
    }
    out
}

pub(crate) fn mask_binary(
    op: MaskOp,
    a: &[bool; MAX_LANES],
    b: &[bool; MAX_LANES],
    n: usize,
) -> [bool; MAX_LANES] {
    let mut out = [false; MAX_LANES];
    let (a, b, dst) = (&a[..n], &b[..n], &mut out[..n]);
    if try_portable("mask", n, |s| s.mask_binary(op, a, b, dst).then_some(())).is_none() {
        ScalarLoop.mask_binary(op, a, b, dst);
    }
    out
}
