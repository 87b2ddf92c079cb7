use std::fmt::{Debug, Display};

use crate::{convert, Limits, Word};

/// Signed fixed-point number with `N` fractional bits stored in a `T` word.
///
/// `Q<T, N>`, where `T` is one of `i8`, `i16`, `i32`, or `i64` and `N` is
/// in `0..T::BITS`, represents the real value `raw / 2**N`.  One bit is the
/// sign, `N` bits follow the binary point, and the remaining `T::BITS - 1 -
/// N` bits precede it.  The table below shows a few formats:
///
/// |          Type |  Scale  |          Smallest |               Largest |
/// |:--------------|--------:|------------------:|----------------------:|
/// | `Q<i8, 7>`    |   `128` |              `-1` |           `0.9921875` |
/// | `Q<i16, 15>`  | `32768` |              `-1` |     `0.999969482421875` |
/// | `Q<i16, 12>`  |  `4096` |              `-8` |      `7.999755859375` |
/// | `Q<i32, 30>`  |  `2**30`|              `-2` |       `1.99999999907` |
/// | `Q<i64, 47>`  |  `2**47`|          `-65536` |     `65535.999999999993` |
///
/// # Construction
///
/// [`Q::from_f32`] converts with saturation: inputs at or beyond the format's
/// range yield [`Q::MAX`] or [`Q::MIN`], and in-range inputs are scaled and
/// truncated toward zero.  [`Q::from_raw`] wraps an existing stored value.
///
/// A format with `N >= T::BITS` has no sign bit and is rejected at compile
/// time as soon as any of its constants or conversions is used:
///
/// ```compile_fail
/// use qformat::Q;
///
/// let _ = Q::<i8, 8>::from_f32(0.5);
/// ```
///
/// The same holds for the default value:
///
/// ```compile_fail
/// use qformat::Q;
///
/// let _ = Q::<i8, 8>::default();
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Q<T, const N: u32>(T);

impl<T: Word, const N: u32> Q<T, N> {
    const VALID: () = assert!(N < T::BITS, "Q<T, N> requires N < T::BITS");

    /// The number of fractional bits, `N`.
    pub const FRAC_BITS: u32 = {
        let () = Self::VALID;
        N
    };

    /// The number of integer bits, excluding the sign bit.
    pub const INT_BITS: u32 = T::BITS - 1 - Self::FRAC_BITS;

    /// Largest value, `(2**(W-1) - 1) / 2**N`.
    pub const MAX: Self = {
        let () = Self::VALID;
        Self(T::MAX)
    };

    /// Smallest value, `-2**(W-1) / 2**N`.
    pub const MIN: Self = {
        let () = Self::VALID;
        Self(T::MIN)
    };

    /// Zero.
    pub const ZERO: Self = {
        let () = Self::VALID;
        Self(T::ZERO)
    };

    /// Smallest float that [`Q::from_f32`] saturates to [`Q::MAX`],
    /// `2**(W-1-N)`.
    pub const FLOAT_MAX: f32 = (1u64 << Self::INT_BITS) as f32;

    /// Negation of [`Q::FLOAT_MAX`].  Floats strictly below this saturate to
    /// [`Q::MIN`].
    pub const FLOAT_MIN: f32 = -Self::FLOAT_MAX;

    /// Returns the scale factor and saturation bounds of this format.
    #[inline]
    pub fn limits() -> Limits<T> {
        let () = Self::VALID;
        Limits::compute(N)
    }

    /// Converts `x` to this format, saturating if it is out of range and
    /// otherwise truncating toward zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use qformat::Q;
    ///
    /// assert_eq!(Q::<i8, 7>::from_f32(0.1).raw(), 12); // 0.1 * 128 = 12.8
    /// assert_eq!(Q::<i16, 12>::from_f32(1.2).raw(), 4915); // 1.2 * 4096 = 4915.2
    /// assert_eq!(Q::<i16, 12>::from_f32(100.0), Q::MAX);
    /// assert_eq!(Q::<i16, 12>::from_f32(f32::NEG_INFINITY), Q::MIN);
    /// ```
    #[inline]
    pub fn from_f32(x: f32) -> Self {
        Self(convert::to_fixed(&Self::limits(), x))
    }

    /// Wraps stored value `raw`, which represents `raw / 2**N`.
    #[inline]
    pub fn from_raw(raw: T) -> Self {
        let () = Self::VALID;
        Self(raw)
    }

    /// Returns the stored value.
    #[inline]
    pub fn raw(self) -> T {
        self.0
    }

    /// Returns this value as `f32`, rounded if it has more than 24
    /// significant bits.
    #[inline]
    pub fn to_f32(self) -> f32 {
        convert::to_float(&Self::limits(), self.0)
    }

    /// Returns true if this value is negative, false if it is zero or positive.
    pub fn is_negative(self) -> bool {
        self.0 < T::zero()
    }

    /// Returns true if this is [`Q::MAX`] or [`Q::MIN`], the values that
    /// out-of-range conversions saturate to.
    pub fn is_saturated(self) -> bool {
        self.0 == T::MAX || self.0 == T::MIN
    }
}

impl<T: Word, const N: u32> Default for Q<T, N> {
    /// Returns [`Q::ZERO`].
    fn default() -> Self {
        Self::ZERO
    }
}

impl<T: Word, const N: u32> From<Q<T, N>> for f32 {
    fn from(value: Q<T, N>) -> Self {
        value.to_f32()
    }
}

impl<T: Word, const N: u32> Debug for Q<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Q{N}({:?})", self.to_f32())
    }
}

impl<T: Word, const N: u32> Display for Q<T, N> {
    /// Formats the float view, honoring width, precision, and sign flags.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.to_f32(), f)
    }
}

/// An 8-bit fixed-point number with `N` fractional bits.
pub type Fix8<const N: u32> = Q<i8, N>;

/// A 16-bit fixed-point number with `N` fractional bits.
pub type Fix16<const N: u32> = Q<i16, N>;

/// A 32-bit fixed-point number with `N` fractional bits.
pub type Fix32<const N: u32> = Q<i32, N>;

/// A 64-bit fixed-point number with `N` fractional bits.
pub type Fix64<const N: u32> = Q<i64, N>;
