use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

use crate::dispatch::PortableLanes;
use crate::numerics::ByteOrder;
use crate::vector::{BinaryOp, TernaryOp, UnaryOp};

/// The lane types a species can be built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl ElementKind {
    pub const ALL: [ElementKind; 6] = [
        ElementKind::I8,
        ElementKind::I16,
        ElementKind::I32,
        ElementKind::I64,
        ElementKind::F32,
        ElementKind::F64,
    ];

    pub const fn bit_size(self) -> usize {
        match self {
            ElementKind::I8 => 8,
            ElementKind::I16 => 16,
            ElementKind::I32 | ElementKind::F32 => 32,
            ElementKind::I64 | ElementKind::F64 => 64,
        }
    }

    pub const fn byte_size(self) -> usize {
        self.bit_size() / 8
    }

    pub const fn is_floating(self) -> bool {
        matches!(self, ElementKind::F32 | ElementKind::F64)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ElementKind::I8 => "i8",
            ElementKind::I16 => "i16",
            ElementKind::I32 => "i32",
            ElementKind::I64 => "i64",
            ElementKind::F32 => "f32",
            ElementKind::F64 => "f64",
        }
    }
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Widest lossless carrier for one lane, used as the pivot of numeric casts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    Integral(i64),
    Floating(f64),
}

mod sealed {
    pub trait Sealed {}
}

/// A primitive lane type together with its scalar lane semantics.
///
/// The scalar methods here are the reference behavior: the scalar execution
/// loop calls them lane by lane, and every other execution path must produce
/// the same bits.
///
/// Integral arithmetic wraps, shift counts are masked to `BITS - 1`, and
/// floating `Min`/`Max` propagate NaN and treat `-0.0` as smaller than `+0.0`.
pub trait Element:
    Copy
    + Default
    + PartialEq
    + PartialOrd
    + Debug
    + Display
    + Send
    + Sync
    + 'static
    + sealed::Sealed
    + PortableLanes
{
    const KIND: ElementKind;
    const BITS: u32;
    const ZERO: Self;
    const ONE: Self;
    /// Neutral element of `Max`: the type minimum, or `-inf` for floats.
    const MIN_VALUE: Self;
    /// Neutral element of `Min`: the type maximum, or `+inf` for floats.
    const MAX_VALUE: Self;

    /// Raw lane bits, zero-extended.
    fn to_bits(self) -> u64;
    /// Rebuilds a lane from the low `BITS` bits of `bits`.
    fn from_bits(bits: u64) -> Self;

    fn to_scalar(self) -> ScalarValue;
    /// Value conversion with `as` semantics: integral truncation, saturating
    /// float-to-int (NaN becomes zero), round-to-nearest otherwise.
    fn from_scalar(value: ScalarValue) -> Self;

    /// Lane value for an integral lane index, wrapping for integral kinds.
    fn from_index(index: i64) -> Self;
    /// Lane value read back as a lane index (saturating for floats).
    fn to_index(self) -> i64;

    fn write_bytes(self, dst: &mut [u8], order: ByteOrder);
    fn read_bytes(src: &[u8], order: ByteOrder) -> Self;

    /// Scalar semantics of one lane.
    ///
    /// # Panics
    ///
    /// The `apply_*` functions panic on an operator that is not defined for
    /// this kind; check [`LaneOperator::supports`](crate::vector::LaneOperator::supports) first.
    fn apply_unary(op: UnaryOp, a: Self) -> Self;
    fn apply_binary(op: BinaryOp, a: Self, b: Self) -> Self;
    fn apply_ternary(op: TernaryOp, a: Self, b: Self, c: Self) -> Self;

    fn is_zero(self) -> bool {
        self.to_bits() == 0
    }
}

macro_rules! byte_io {
    ($t:ty) => {
        fn write_bytes(self, dst: &mut [u8], order: ByteOrder) {
            let bytes = match order {
                ByteOrder::LittleEndian => self.to_le_bytes(),
                ByteOrder::BigEndian => self.to_be_bytes(),
            };
            dst[..bytes.len()].copy_from_slice(&bytes);
        }

        fn read_bytes(src: &[u8], order: ByteOrder) -> Self {
            let mut bytes = [0u8; size_of::<$t>()];
            bytes.copy_from_slice(&src[..size_of::<$t>()]);
            match order {
                ByteOrder::LittleEndian => <$t>::from_le_bytes(bytes),
                ByteOrder::BigEndian => <$t>::from_be_bytes(bytes),
            }
        }
    };
}

macro_rules! impl_integral_element {
    ($t:ty, $u:ty, $kind:expr) => {
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const KIND: ElementKind = $kind;
            const BITS: u32 = <$t>::BITS;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const MIN_VALUE: Self = <$t>::MIN;
            const MAX_VALUE: Self = <$t>::MAX;

            fn to_bits(self) -> u64 {
                self as $u as u64
            }

            fn from_bits(bits: u64) -> Self {
                bits as $u as $t
            }

            fn to_scalar(self) -> ScalarValue {
                ScalarValue::Integral(self as i64)
            }

            fn from_scalar(value: ScalarValue) -> Self {
                match value {
                    ScalarValue::Integral(v) => v as $t,
                    ScalarValue::Floating(v) => v as $t,
                }
            }

            fn from_index(index: i64) -> Self {
                index as $t
            }

            fn to_index(self) -> i64 {
                self as i64
            }

            byte_io!($t);

            fn apply_unary(op: UnaryOp, a: Self) -> Self {
                match op {
                    UnaryOp::Neg => a.wrapping_neg(),
                    UnaryOp::Abs => a.wrapping_abs(),
                    UnaryOp::Not => !a,
                    UnaryOp::Sqrt => unreachable!("sqrt is rejected for integral lanes"),
                }
            }

            fn apply_binary(op: BinaryOp, a: Self, b: Self) -> Self {
                match op {
                    BinaryOp::Add => a.wrapping_add(b),
                    BinaryOp::Sub => a.wrapping_sub(b),
                    BinaryOp::Mul => a.wrapping_mul(b),
                    // zero divisors are rejected before any lane runs
                    BinaryOp::Div => if b == 0 { 0 } else { a.wrapping_div(b) },
                    BinaryOp::Min => a.min(b),
                    BinaryOp::Max => a.max(b),
                    BinaryOp::And => a & b,
                    BinaryOp::Or => a | b,
                    BinaryOp::Xor => a ^ b,
                    BinaryOp::AndNot => a & !b,
                    BinaryOp::Lshl => a.wrapping_shl(b as u32),
                    BinaryOp::Ashr => a.wrapping_shr(b as u32),
                    BinaryOp::Lshr => (a as $u).wrapping_shr(b as u32) as $t,
                }
            }

            fn apply_ternary(op: TernaryOp, a: Self, b: Self, c: Self) -> Self {
                match op {
                    TernaryOp::Fma => a.wrapping_mul(b).wrapping_add(c),
                    TernaryOp::BitwiseBlend => a ^ ((a ^ b) & c),
                }
            }
        }
    };
}

macro_rules! impl_floating_element {
    ($t:ty, $bits:expr, $kind:expr) => {
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const KIND: ElementKind = $kind;
            const BITS: u32 = $bits;
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const MIN_VALUE: Self = <$t>::NEG_INFINITY;
            const MAX_VALUE: Self = <$t>::INFINITY;

            fn to_bits(self) -> u64 {
                <$t>::to_bits(self) as u64
            }

            fn from_bits(bits: u64) -> Self {
                <$t>::from_bits(bits as _)
            }

            fn to_scalar(self) -> ScalarValue {
                ScalarValue::Floating(self as f64)
            }

            fn from_scalar(value: ScalarValue) -> Self {
                match value {
                    ScalarValue::Integral(v) => v as $t,
                    ScalarValue::Floating(v) => v as $t,
                }
            }

            fn from_index(index: i64) -> Self {
                index as $t
            }

            fn to_index(self) -> i64 {
                self as i64
            }

            byte_io!($t);

            fn apply_unary(op: UnaryOp, a: Self) -> Self {
                match op {
                    UnaryOp::Neg => -a,
                    UnaryOp::Abs => a.abs(),
                    UnaryOp::Sqrt => a.sqrt(),
                    UnaryOp::Not => unreachable!("not is rejected for floating lanes"),
                }
            }

            fn apply_binary(op: BinaryOp, a: Self, b: Self) -> Self {
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Min => {
                        if a.is_nan() || b.is_nan() {
                            <$t>::NAN
                        } else if a == b {
                            // only differs for signed zeros
                            if a.is_sign_negative() { a } else { b }
                        } else if a < b {
                            a
                        } else {
                            b
                        }
                    }
                    BinaryOp::Max => {
                        if a.is_nan() || b.is_nan() {
                            <$t>::NAN
                        } else if a == b {
                            if a.is_sign_negative() { b } else { a }
                        } else if a > b {
                            a
                        } else {
                            b
                        }
                    }
                    BinaryOp::And
                    | BinaryOp::Or
                    | BinaryOp::Xor
                    | BinaryOp::AndNot
                    | BinaryOp::Lshl
                    | BinaryOp::Lshr
                    | BinaryOp::Ashr => unreachable!("bitwise ops are rejected for floating lanes"),
                }
            }

            fn apply_ternary(op: TernaryOp, a: Self, b: Self, c: Self) -> Self {
                match op {
                    TernaryOp::Fma => a.mul_add(b, c),
                    TernaryOp::BitwiseBlend => {
                        unreachable!("bitwise blend is rejected for floating lanes")
                    }
                }
            }
        }
    };
}

impl_integral_element!(i8, u8, ElementKind::I8);
impl_integral_element!(i16, u16, ElementKind::I16);
impl_integral_element!(i32, u32, ElementKind::I32);
impl_integral_element!(i64, u64, ElementKind::I64);
impl_floating_element!(f32, 32, ElementKind::F32);
impl_floating_element!(f64, 64, ElementKind::F64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_match_kind_size() {
        assert_eq!(i8::BITS as usize, ElementKind::I8.bit_size());
        assert_eq!(<i16 as Element>::BITS as usize, ElementKind::I16.bit_size());
        assert_eq!(<f32 as Element>::BITS as usize, ElementKind::F32.bit_size());
        assert_eq!(<f64 as Element>::BITS as usize, ElementKind::F64.bit_size());
    }

    #[test]
    fn test_bits_round_trip_preserves_payloads() {
        let nan = f32::from_bits(0x7fc0_1234);
        assert_eq!(<f32 as Element>::to_bits(nan), 0x7fc0_1234);
        assert_eq!(<f32 as Element>::from_bits(0x7fc0_1234).to_bits(), 0x7fc0_1234);
        assert_eq!(<i8 as Element>::to_bits(-1), 0xff);
        assert_eq!(<i16 as Element>::from_bits(0xdead_8001), -32767);
    }

    #[test]
    fn test_integral_arithmetic_wraps() {
        assert_eq!(i8::apply_binary(BinaryOp::Add, 127, 1), -128);
        assert_eq!(i32::apply_binary(BinaryOp::Mul, i32::MAX, 2), -2);
        assert_eq!(i32::apply_binary(BinaryOp::Div, i32::MIN, -1), i32::MIN);
        assert_eq!(i64::apply_unary(UnaryOp::Abs, i64::MIN), i64::MIN);
        assert_eq!(i16::apply_unary(UnaryOp::Neg, i16::MIN), i16::MIN);
    }

    #[test]
    fn test_shift_counts_are_masked() {
        assert_eq!(i32::apply_binary(BinaryOp::Lshl, 1, 33), 2);
        assert_eq!(i8::apply_binary(BinaryOp::Lshl, 1, 9), 2);
        assert_eq!(i8::apply_binary(BinaryOp::Ashr, -128, 7), -1);
        assert_eq!(i8::apply_binary(BinaryOp::Lshr, -128, 7), 1);
        // negative counts keep their low bits
        assert_eq!(i32::apply_binary(BinaryOp::Lshl, 1, -1), i32::MIN);
    }

    #[test]
    fn test_bitwise_blend_takes_second_operand_where_selector_set() {
        let r = i32::apply_ternary(TernaryOp::BitwiseBlend, 0x0f0f, 0x3333, 0x00ff);
        assert_eq!(r, 0x0f33);
    }

    #[test]
    fn test_float_min_max_order_signed_zero_and_propagate_nan() {
        let min = f64::apply_binary(BinaryOp::Min, 0.0, -0.0);
        assert!(min == 0.0 && min.is_sign_negative());
        let max = f64::apply_binary(BinaryOp::Max, -0.0, 0.0);
        assert!(max == 0.0 && max.is_sign_positive());
        assert!(f32::apply_binary(BinaryOp::Min, f32::NAN, 1.0).is_nan());
        assert!(f32::apply_binary(BinaryOp::Max, 1.0, f32::NAN).is_nan());
        assert_eq!(f32::apply_binary(BinaryOp::Min, 2.0, -3.0), -3.0);
    }

    #[test]
    fn test_scalar_casts_follow_as_semantics() {
        assert_eq!(i8::from_scalar(ScalarValue::Integral(300)), 44);
        assert_eq!(i32::from_scalar(ScalarValue::Floating(f64::NAN)), 0);
        assert_eq!(i16::from_scalar(ScalarValue::Floating(1e9)), i16::MAX);
        assert_eq!(f32::from_scalar(ScalarValue::Integral(16_777_217)), 16_777_216.0);
        assert_eq!(f64::from_scalar(1.5f32.to_scalar()), 1.5);
    }

    #[test]
    fn test_byte_io_honours_order() {
        let mut buf = [0u8; 4];
        0x0102_0304i32.write_bytes(&mut buf, ByteOrder::BigEndian);
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(i32::read_bytes(&buf, ByteOrder::LittleEndian), 0x0403_0201);
        let mut buf = [0u8; 8];
        (-2.5f64).write_bytes(&mut buf, ByteOrder::LittleEndian);
        assert_eq!(f64::read_bytes(&buf, ByteOrder::LittleEndian), -2.5);
    }

    #[test]
    fn test_kind_metadata() {
        assert!(ElementKind::F32.is_floating());
        assert!(!ElementKind::I64.is_floating());
        assert_eq!(ElementKind::I16.byte_size(), 2);
        assert_eq!(ElementKind::F64.to_string(), "f64");
        let json = serde_json::to_string(&ElementKind::I32).unwrap();
        assert_eq!(json, "\"i32\"");
    }
}
