//! Conversions between species.
//!
//! Casts convert lane values, reinterpretations reuse the native byte image.
//! Both share one `part` convention: a smaller target selects a block of the
//! source, low to high, and a larger target receives the source at block
//! `-part`. See [`Vector::convert_shape`](crate::vector::Vector::convert_shape)
//! and [`Vector::reinterpret_shape`](crate::vector::Vector::reinterpret_shape).

mod cast;
mod part;
mod reinterpret;
