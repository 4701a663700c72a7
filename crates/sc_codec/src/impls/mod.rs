//! [`Data`](crate::Data) implementations for built-in scalar types.

mod complex;
mod native;

/// Bits of a float for hashing, with `-0.0` folded into `0.0`.
///
/// `NaN` never equals itself, so its bits need no folding.
#[inline]
pub(crate) fn float_bits(value: f64) -> u64 {
    if value == 0.0 { 0 } else { value.to_bits() }
}
