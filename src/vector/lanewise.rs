use crate::dispatch::dispatcher;
use crate::error::{Result, VectorError};
use crate::mask::Mask;
use crate::numerics::{AlignedBlock, Element};
use crate::vector::{
    BinaryOp, Comparison, LaneOperator, ReductionOp, TernaryOp, UnaryOp, Vector,
};

impl<E: Element> Vector<E> {
    fn checked(&self, other: &Vector<E>) -> Result<()> {
        self.species().check(&other.species())
    }

    fn checked_mask(&self, mask: &Mask<E>) -> Result<()> {
        self.species().check(&mask.species())
    }

    /// Keeps this vector's lanes where `mask` is unset and `computed`'s elsewhere.
    fn merge(&self, computed: &AlignedBlock<E>, mask: &Mask<E>) -> Self {
        let lanes = dispatcher::blend(self.block(), computed, mask.lanes(), self.lane_count());
        Vector::from_block(self.species(), lanes)
    }

    pub fn lanewise_unary(&self, op: UnaryOp) -> Result<Self> {
        op.ensure_supported(E::KIND)?;
        let lanes = dispatcher::unary(op, self.block(), self.lane_count());
        Ok(Vector::from_block(self.species(), lanes))
    }

    pub fn lanewise_unary_masked(&self, op: UnaryOp, mask: &Mask<E>) -> Result<Self> {
        self.checked_mask(mask)?;
        let computed = self.lanewise_unary(op)?;
        Ok(self.merge(computed.block(), mask))
    }

    /// Applies `op` lane by lane with `other` as the right operand.
    ///
    /// Integral division fails with `DivisionByZero` on the first zero divisor.
    pub fn lanewise(&self, op: BinaryOp, other: &Vector<E>) -> Result<Self> {
        self.checked(other)?;
        op.ensure_supported(E::KIND)?;
        if op == BinaryOp::Div
            && !E::KIND.is_floating()
            && let Some(lane) = other.as_slice().iter().position(|x| x.is_zero())
        {
            return Err(VectorError::DivisionByZero { lane });
        }
        let lanes = dispatcher::binary(op, self.block(), other.block(), self.lane_count());
        Ok(Vector::from_block(self.species(), lanes))
    }

    /// Like [`Vector::lanewise`] on the lanes selected by `mask`; other lanes keep
    /// this vector's value. Only selected divisors are checked for zero.
    pub fn lanewise_masked(&self, op: BinaryOp, other: &Vector<E>, mask: &Mask<E>) -> Result<Self> {
        self.checked(other)?;
        self.checked_mask(mask)?;
        let computed = if op == BinaryOp::Div && !E::KIND.is_floating() {
            let ones = Vector::broadcast(other.species(), E::ONE);
            let divisors = other.merge(ones.block(), &mask.not());
            self.lanewise(op, &divisors)?
        } else {
            self.lanewise(op, other)?
        };
        Ok(self.merge(computed.block(), mask))
    }

    pub fn lanewise_scalar(&self, op: BinaryOp, value: E) -> Result<Self> {
        self.lanewise(op, &Vector::broadcast(self.species(), value))
    }

    pub fn lanewise_scalar_masked(&self, op: BinaryOp, value: E, mask: &Mask<E>) -> Result<Self> {
        self.lanewise_masked(op, &Vector::broadcast(self.species(), value), mask)
    }

    pub fn lanewise_ternary(&self, op: TernaryOp, b: &Vector<E>, c: &Vector<E>) -> Result<Self> {
        self.checked(b)?;
        self.checked(c)?;
        op.ensure_supported(E::KIND)?;
        let lanes = dispatcher::ternary(op, self.block(), b.block(), c.block(), self.lane_count());
        Ok(Vector::from_block(self.species(), lanes))
    }

    pub fn lanewise_ternary_masked(
        &self,
        op: TernaryOp,
        b: &Vector<E>,
        c: &Vector<E>,
        mask: &Mask<E>,
    ) -> Result<Self> {
        self.checked_mask(mask)?;
        let computed = self.lanewise_ternary(op, b, c)?;
        Ok(self.merge(computed.block(), mask))
    }

    /// Runs an opaque scalar kernel on every lane, in lane order.
    ///
    /// The first failing lane aborts the whole operation with `KernelFailure`.
    pub fn lanewise_kernel(&self, kernel: impl Fn(E) -> std::result::Result<E, i32>) -> Result<Self> {
        let mut lanes = AlignedBlock::zeroed();
        for (lane, (out, &x)) in lanes.data.iter_mut().zip(self.as_slice()).enumerate() {
            *out = kernel(x).map_err(|status| VectorError::KernelFailure { lane, status })?;
        }
        Ok(Vector::from_block(self.species(), lanes))
    }

    /// Lanes of `other` where `mask` is set, lanes of `self` elsewhere.
    pub fn blend(&self, other: &Vector<E>, mask: &Mask<E>) -> Result<Self> {
        self.checked(other)?;
        self.checked_mask(mask)?;
        Ok(self.merge(other.block(), mask))
    }

    pub fn compare(&self, op: Comparison, other: &Vector<E>) -> Result<Mask<E>> {
        self.checked(other)?;
        let bits = dispatcher::compare(op, self.block(), other.block(), self.lane_count());
        Ok(Mask::from_lanes(self.species(), bits))
    }

    /// Unselected lanes report false.
    pub fn compare_masked(&self, op: Comparison, other: &Vector<E>, mask: &Mask<E>) -> Result<Mask<E>> {
        self.checked_mask(mask)?;
        self.compare(op, other)?.and(mask)
    }

    pub fn compare_scalar(&self, op: Comparison, value: E) -> Result<Mask<E>> {
        self.compare(op, &Vector::broadcast(self.species(), value))
    }

    /// Folds every lane in increasing index order, starting from the operator's identity.
    pub fn reduce_lanes(&self, op: ReductionOp) -> Result<E> {
        op.ensure_supported(E::KIND)?;
        Ok(dispatcher::reduce(op, self.block(), self.lane_count()))
    }

    /// As [`Vector::reduce_lanes`] with the identity substituted on unselected lanes.
    pub fn reduce_lanes_masked(&self, op: ReductionOp, mask: &Mask<E>) -> Result<E> {
        self.checked_mask(mask)?;
        op.ensure_supported(E::KIND)?;
        let identity = Vector::broadcast(self.species(), op.identity::<E>());
        let selected = identity.merge(self.block(), mask);
        Ok(dispatcher::reduce(op, selected.block(), self.lane_count()))
    }

    /// Lane `i` becomes `lane(i) + i * scale`.
    pub fn add_index(&self, scale: i64) -> Result<Self> {
        let offsets = Vector::from_fn(self.species(), |i| E::from_index((i as i64).wrapping_mul(scale)));
        self.lanewise(BinaryOp::Add, &offsets)
    }
}
