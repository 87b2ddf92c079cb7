//! The conversion engine shared by [`Q`](crate::Q) and
//! [`QFormat`](crate::QFormat).

use num_traits::AsPrimitive;

use crate::{Limits, Word};

/// Direction in which a float-to-fixed conversion saturated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Saturation {
    /// The input was `>= float_max` and converted to the largest stored value.
    High,

    /// The input was `< float_min` and converted to the smallest stored value.
    Low,
}

/// Reports whether `x` saturates against the float bounds
/// `float_min..float_max`.
///
/// The upper bound is exclusive and the lower bound inclusive: `float_max`
/// itself saturates, `float_min` does not.  Positive infinity saturates high
/// and negative infinity low.  NaN compares false against both bounds and
/// does not saturate.
#[inline]
pub fn saturation(float_min: f32, float_max: f32, x: f32) -> Option<Saturation> {
    if x >= float_max {
        Some(Saturation::High)
    } else if x < float_min {
        Some(Saturation::Low)
    } else {
        None
    }
}

/// Converts `x` to a stored value under `limits`, saturating out-of-range
/// input and otherwise truncating `x * scale` toward zero.
///
/// NaN converts to 0.
///
/// # Examples
///
/// ```
/// use qformat::{convert::to_fixed, Limits};
///
/// let q12 = Limits::<i16>::new(12).unwrap();
/// assert_eq!(to_fixed(&q12, 1.2), 4915); // 1.2 * 4096 = 4915.2
/// assert_eq!(to_fixed(&q12, -1.2), -4915);
/// assert_eq!(to_fixed(&q12, 8.0), i16::MAX);
/// assert_eq!(to_fixed(&q12, -8.0), i16::MIN);
/// assert_eq!(to_fixed(&q12, -9.0), i16::MIN);
/// ```
#[inline]
pub fn to_fixed<T: Word>(limits: &Limits<T>, x: f32) -> T {
    match saturation(limits.float_min, limits.float_max, x) {
        Some(Saturation::High) => limits.fixed_max,
        Some(Saturation::Low) => limits.fixed_min,
        None => T::truncate_f32(x * limits.scale_f32()),
    }
}

/// Converts stored value `v` under `limits` to `f32`, as `v / scale`.
///
/// This never saturates.  The result is exact when `v` has at most 24
/// significant bits, and otherwise rounded to the nearest `f32`.
#[inline]
pub fn to_float<T: Word>(limits: &Limits<T>, v: T) -> f32 {
    let v: f32 = v.as_();
    v / limits.scale_f32()
}
