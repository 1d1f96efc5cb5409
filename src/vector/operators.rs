use serde::{Deserialize, Serialize};

use crate::error::{Result, VectorError};
use crate::numerics::{Element, ElementKind};

/// Shared surface of the operator tags.
pub trait LaneOperator: Copy {
    fn name(self) -> &'static str;

    /// Whether the operator is defined on lanes of `kind`.
    fn supports(self, kind: ElementKind) -> bool;

    fn ensure_supported(self, kind: ElementKind) -> Result<()> {
        if self.supports(kind) {
            Ok(())
        } else {
            Err(VectorError::UnsupportedOperation {
                op: self.name(),
                kind,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Neg,
    Abs,
    Not,
    Sqrt,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 4] = [UnaryOp::Neg, UnaryOp::Abs, UnaryOp::Not, UnaryOp::Sqrt];
}

impl LaneOperator for UnaryOp {
    fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Abs => "abs",
            UnaryOp::Not => "not",
            UnaryOp::Sqrt => "sqrt",
        }
    }

    fn supports(self, kind: ElementKind) -> bool {
        match self {
            UnaryOp::Neg | UnaryOp::Abs => true,
            UnaryOp::Not => !kind.is_floating(),
            UnaryOp::Sqrt => kind.is_floating(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Min,
    Max,
    And,
    Or,
    Xor,
    AndNot,
    Lshl,
    Lshr,
    Ashr,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 13] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Min,
        BinaryOp::Max,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Xor,
        BinaryOp::AndNot,
        BinaryOp::Lshl,
        BinaryOp::Lshr,
        BinaryOp::Ashr,
    ];

    pub const fn is_bitwise(self) -> bool {
        matches!(
            self,
            BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Xor
                | BinaryOp::AndNot
                | BinaryOp::Lshl
                | BinaryOp::Lshr
                | BinaryOp::Ashr
        )
    }
}

impl LaneOperator for BinaryOp {
    fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::Min => "min",
            BinaryOp::Max => "max",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::AndNot => "and_not",
            BinaryOp::Lshl => "lshl",
            BinaryOp::Lshr => "lshr",
            BinaryOp::Ashr => "ashr",
        }
    }

    fn supports(self, kind: ElementKind) -> bool {
        !(self.is_bitwise() && kind.is_floating())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TernaryOp {
    /// `a * b + c`, fused for floating lanes.
    Fma,
    /// Bits of `b` where `c` is set, bits of `a` elsewhere.
    BitwiseBlend,
}

impl TernaryOp {
    pub const ALL: [TernaryOp; 2] = [TernaryOp::Fma, TernaryOp::BitwiseBlend];
}

impl LaneOperator for TernaryOp {
    fn name(self) -> &'static str {
        match self {
            TernaryOp::Fma => "fma",
            TernaryOp::BitwiseBlend => "bitwise_blend",
        }
    }

    fn supports(self, kind: ElementKind) -> bool {
        match self {
            TernaryOp::Fma => true,
            TernaryOp::BitwiseBlend => !kind.is_floating(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    pub const ALL: [Comparison; 6] = [
        Comparison::Eq,
        Comparison::Ne,
        Comparison::Lt,
        Comparison::Le,
        Comparison::Gt,
        Comparison::Ge,
    ];

    /// IEEE semantics for floats: every ordered test against NaN is false, `Ne` is true.
    #[inline]
    pub fn test<E: Element>(self, a: E, b: E) -> bool {
        match self {
            Comparison::Eq => a == b,
            Comparison::Ne => a != b,
            Comparison::Lt => a < b,
            Comparison::Le => a <= b,
            Comparison::Gt => a > b,
            Comparison::Ge => a >= b,
        }
    }
}

impl LaneOperator for Comparison {
    fn name(self) -> &'static str {
        match self {
            Comparison::Eq => "eq",
            Comparison::Ne => "ne",
            Comparison::Lt => "lt",
            Comparison::Le => "le",
            Comparison::Gt => "gt",
            Comparison::Ge => "ge",
        }
    }

    fn supports(self, _kind: ElementKind) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionOp {
    Add,
    Mul,
    Min,
    Max,
    And,
    Or,
    Xor,
}

impl ReductionOp {
    pub const ALL: [ReductionOp; 7] = [
        ReductionOp::Add,
        ReductionOp::Mul,
        ReductionOp::Min,
        ReductionOp::Max,
        ReductionOp::And,
        ReductionOp::Or,
        ReductionOp::Xor,
    ];

    /// The lane-wise operator this reduction folds with.
    pub const fn combiner(self) -> BinaryOp {
        match self {
            ReductionOp::Add => BinaryOp::Add,
            ReductionOp::Mul => BinaryOp::Mul,
            ReductionOp::Min => BinaryOp::Min,
            ReductionOp::Max => BinaryOp::Max,
            ReductionOp::And => BinaryOp::And,
            ReductionOp::Or => BinaryOp::Or,
            ReductionOp::Xor => BinaryOp::Xor,
        }
    }

    /// Neutral element of the fold, also substituted for excluded lanes.
    pub fn identity<E: Element>(self) -> E {
        match self {
            ReductionOp::Add | ReductionOp::Or | ReductionOp::Xor => E::ZERO,
            ReductionOp::Mul => E::ONE,
            ReductionOp::Min => E::MAX_VALUE,
            ReductionOp::Max => E::MIN_VALUE,
            ReductionOp::And => E::from_bits(u64::MAX),
        }
    }
}

impl LaneOperator for ReductionOp {
    fn name(self) -> &'static str {
        match self {
            ReductionOp::Add => "reduce_add",
            ReductionOp::Mul => "reduce_mul",
            ReductionOp::Min => "reduce_min",
            ReductionOp::Max => "reduce_max",
            ReductionOp::And => "reduce_and",
            ReductionOp::Or => "reduce_or",
            ReductionOp::Xor => "reduce_xor",
        }
    }

    fn supports(self, kind: ElementKind) -> bool {
        self.combiner().supports(kind)
    }
}
