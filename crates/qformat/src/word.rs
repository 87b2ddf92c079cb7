use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

use num_traits::{AsPrimitive, PrimInt, Signed, Unsigned};

use crate::FormatError;

/// One of the four supported word widths.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WordWidth {
    /// 8-bit words, stored as `i8`.
    W8,
    /// 16-bit words, stored as `i16`.
    W16,
    /// 32-bit words, stored as `i32`.
    W32,
    /// 64-bit words, stored as `i64`.
    W64,
}

impl WordWidth {
    /// All supported widths, narrowest first.
    pub const ALL: [WordWidth; 4] = [Self::W8, Self::W16, Self::W32, Self::W64];

    /// Returns the number of bits in a word of this width.
    pub const fn bits(self) -> u32 {
        match self {
            Self::W8 => 8,
            Self::W16 => 16,
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }

    /// Returns the largest number of fractional bits a word of this width can
    /// hold, which leaves exactly one bit for the sign.
    pub const fn max_frac_bits(self) -> u32 {
        self.bits() - 1
    }

    /// Returns the largest stored value, `2**(W-1) - 1`.
    pub const fn raw_max(self) -> i64 {
        match self {
            Self::W8 => i8::MAX as i64,
            Self::W16 => i16::MAX as i64,
            Self::W32 => i32::MAX as i64,
            Self::W64 => i64::MAX,
        }
    }

    /// Returns the smallest stored value, `-2**(W-1)`.
    pub const fn raw_min(self) -> i64 {
        match self {
            Self::W8 => i8::MIN as i64,
            Self::W16 => i16::MIN as i64,
            Self::W32 => i32::MIN as i64,
            Self::W64 => i64::MIN,
        }
    }

    /// Returns the width implied by the bare `Qn` shorthand: the narrowest
    /// word whose fraction can hold `frac_bits` bits, so that `Q7` is an
    /// 8-bit format, `Q15` a 16-bit one, and `Q47` a 64-bit one.
    ///
    /// # Examples
    ///
    /// ```
    /// use qformat::WordWidth;
    ///
    /// assert_eq!(WordWidth::narrowest_for(0), Ok(WordWidth::W8));
    /// assert_eq!(WordWidth::narrowest_for(8), Ok(WordWidth::W16));
    /// assert_eq!(WordWidth::narrowest_for(31), Ok(WordWidth::W32));
    /// assert_eq!(WordWidth::narrowest_for(47), Ok(WordWidth::W64));
    /// assert!(WordWidth::narrowest_for(64).is_err());
    /// ```
    pub fn narrowest_for(frac_bits: u32) -> Result<Self, FormatError> {
        Self::ALL
            .into_iter()
            .find(|width| frac_bits <= width.max_frac_bits())
            .ok_or(FormatError::NoWidthFor(frac_bits))
    }
}

impl TryFrom<u32> for WordWidth {
    type Error = FormatError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(Self::W8),
            16 => Ok(Self::W16),
            32 => Ok(Self::W32),
            64 => Ok(Self::W64),
            _ => Err(FormatError::UnsupportedWidth(bits)),
        }
    }
}

impl Display for WordWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.bits(), f)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Signed integer that can store a fixed-point value.
///
/// Implemented for exactly `i8`, `i16`, `i32`, and `i64`.  The trait is
/// sealed, so an unsupported storage type is rejected by the type checker.
pub trait Word:
    PrimInt
    + Signed
    + AsPrimitive<f32>
    + Default
    + Hash
    + Debug
    + Display
    + Send
    + Sync
    + sealed::Sealed
{
    /// Unsigned integer of the same width, which holds the scale factor.
    type Unsigned: PrimInt + Unsigned + AsPrimitive<f32> + Debug + Display + Send + Sync;

    /// The width of this word.
    const WIDTH: WordWidth;

    /// `WIDTH.bits()`, for use in constant expressions.
    const BITS: u32;

    /// Largest stored value.
    const MAX: Self;

    /// Smallest stored value.
    const MIN: Self;

    /// Zero, for use in constant expressions.
    const ZERO: Self;

    /// Converts `x` to this type with Rust's float-to-integer cast, which
    /// truncates toward zero, saturates at the type's bounds, and maps NaN
    /// to zero.
    fn truncate_f32(x: f32) -> Self;

    /// Sign-extends this value to `i64`.
    fn widen(self) -> i64;

    /// Narrows `raw` to this type, or returns `None` if it does not fit.
    fn narrow(raw: i64) -> Option<Self>;
}

macro_rules! word {
    ($signed:ty, $unsigned:ty, $width:ident) => {
        impl sealed::Sealed for $signed {}

        impl Word for $signed {
            type Unsigned = $unsigned;
            const WIDTH: WordWidth = WordWidth::$width;
            const BITS: u32 = <$signed>::BITS;
            const MAX: Self = <$signed>::MAX;
            const MIN: Self = <$signed>::MIN;
            const ZERO: Self = 0;

            #[inline]
            fn truncate_f32(x: f32) -> Self {
                x as $signed
            }

            #[inline]
            fn widen(self) -> i64 {
                i64::from(self)
            }

            #[inline]
            fn narrow(raw: i64) -> Option<Self> {
                <$signed>::try_from(raw).ok()
            }
        }
    };
}

word!(i8, u8, W8);
word!(i16, u16, W16);
word!(i32, u32, W32);
word!(i64, u64, W64);

#[cfg(test)]
mod test {
    use super::{Word, WordWidth};
    use crate::FormatError;

    #[test]
    fn widths() {
        for (bits, width) in [
            (8, WordWidth::W8),
            (16, WordWidth::W16),
            (32, WordWidth::W32),
            (64, WordWidth::W64),
        ] {
            assert_eq!(WordWidth::try_from(bits), Ok(width));
            assert_eq!(width.bits(), bits);
            assert_eq!(width.to_string(), bits.to_string());
        }
        for bits in [0, 1, 7, 12, 24, 48, 128] {
            assert_eq!(
                WordWidth::try_from(bits),
                Err(FormatError::UnsupportedWidth(bits))
            );
        }
    }

    #[test]
    fn ranges() {
        fn check<T: Word>() {
            assert_eq!(T::WIDTH.bits(), T::BITS);
            assert_eq!(T::WIDTH.raw_max(), T::MAX.widen());
            assert_eq!(T::WIDTH.raw_min(), T::MIN.widen());
            assert_eq!(T::narrow(T::MAX.widen()), Some(T::MAX));
            assert_eq!(T::narrow(T::MIN.widen()), Some(T::MIN));
        }
        check::<i8>();
        check::<i16>();
        check::<i32>();
        check::<i64>();

        assert_eq!(i8::narrow(128), None);
        assert_eq!(i8::narrow(-129), None);
        assert_eq!(i32::narrow(i64::from(i32::MAX) + 1), None);
    }

    #[test]
    fn truncation() {
        assert_eq!(i16::truncate_f32(4915.2), 4915);
        assert_eq!(i16::truncate_f32(-4915.9), -4915);
        assert_eq!(i8::truncate_f32(f32::NAN), 0);
        assert_eq!(i8::truncate_f32(1000.0), i8::MAX);
    }

    #[test]
    fn shorthand() {
        for n in 0..=7 {
            assert_eq!(WordWidth::narrowest_for(n), Ok(WordWidth::W8));
        }
        for n in 8..=15 {
            assert_eq!(WordWidth::narrowest_for(n), Ok(WordWidth::W16));
        }
        for n in 16..=31 {
            assert_eq!(WordWidth::narrowest_for(n), Ok(WordWidth::W32));
        }
        for n in 32..=63 {
            assert_eq!(WordWidth::narrowest_for(n), Ok(WordWidth::W64));
        }
        assert_eq!(
            WordWidth::narrowest_for(64),
            Err(FormatError::NoWidthFor(64))
        );
    }
}
