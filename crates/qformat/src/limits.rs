use num_traits::{AsPrimitive, One};

use crate::{FormatError, Word};

/// Scale factor and saturation bounds of one Q-format.
///
/// For a word of `W` bits with `N` fractional bits:
///
/// | Field       | Value                |
/// |:------------|:---------------------|
/// | `scale`     | `2**N`               |
/// | `fixed_max` | `2**(W-1) - 1`       |
/// | `fixed_min` | `-2**(W-1)`          |
/// | `float_max` | `2**(W-1-N)`         |
/// | `float_min` | `-2**(W-1-N)`        |
///
/// The float bounds are symmetric although the stored range is not.
/// [`to_fixed`](crate::convert::to_fixed) saturates high when its input is
/// `>= float_max` and low when it is `< float_min`, which yields the
/// asymmetric clamp.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Limits<T: Word> {
    /// `2**N`.
    pub scale: T::Unsigned,

    /// Largest stored value.
    pub fixed_max: T,

    /// Smallest stored value.
    pub fixed_min: T,

    /// Smallest float that saturates high.
    pub float_max: f32,

    /// Negation of `float_max`.  Floats below this saturate low.
    pub float_min: f32,
}

impl<T: Word> Limits<T> {
    /// Returns the limits for `T` words with `frac_bits` fractional bits, or
    /// an error if `frac_bits` leaves no room for the sign bit.
    pub fn new(frac_bits: u32) -> Result<Self, FormatError> {
        if frac_bits < T::BITS {
            Ok(Self::compute(frac_bits))
        } else {
            Err(FormatError::FracBitsOutOfRange {
                width: T::WIDTH,
                frac_bits,
            })
        }
    }

    /// Computes the limits.  The caller must ensure `frac_bits < T::BITS`.
    pub(crate) fn compute(frac_bits: u32) -> Self {
        debug_assert!(frac_bits < T::BITS);
        let one = T::Unsigned::one();
        let float_max: f32 = (one << (T::BITS - 1 - frac_bits) as usize).as_();
        Self {
            scale: one << frac_bits as usize,
            fixed_max: T::MAX,
            fixed_min: T::MIN,
            float_max,
            float_min: -float_max,
        }
    }

    /// Returns the scale factor as `f32`.  Every scale is a power of two no
    /// greater than `2**63`, so this is exact.
    #[inline]
    pub fn scale_f32(&self) -> f32 {
        self.scale.as_()
    }
}
