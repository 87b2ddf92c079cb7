// Warn about missing docs, but not for item declared with `#[cfg(test)]`.
#![cfg_attr(not(test), warn(missing_docs))]

//! Q-format fixed-point numbers.
//!
//! A Q-format stores a real number as a signed integer word of 8, 16, 32, or
//! 64 bits, of which `N` bits follow the binary point.  The stored value
//! `raw` represents `raw / 2**N`.
//!
//! This crate primarily provides the [Q] type, with the word type and `N`
//! supplied as type parameters, and the [Fix8], [Fix16], [Fix32], and [Fix64]
//! aliases.  It also provides [QFormat] and [DynamicFixed], which choose the
//! format at run time, for example from a command line or a configuration
//! file.
//!
//! Conversion from `f32` saturates: an input at or beyond the format's range
//! becomes the largest or smallest stored value, instead of wrapping.  An
//! in-range input is scaled by `2**N` and truncated toward zero.  Conversion
//! back to `f32` never saturates.
//!
//! The [render] module prints fixed-point values as floats for debugging, and
//! [q_debug!] and [q_debug_array!] print a variable under its own name.
//!
//! ```
//! use qformat::{Fix16, Fix8};
//!
//! let coeff = Fix16::<12>::from_f32(1.2);
//! assert_eq!(coeff.raw(), 4915);
//! assert_eq!(coeff.to_f32(), 1.199951171875);
//!
//! assert_eq!(Fix8::<7>::from_f32(3.0), Fix8::<7>::MAX);
//! ```

use thiserror::Error;

pub mod convert;
pub mod render;

mod dynamic;
pub use dynamic::{DynamicFixed, DynamicLimits, QFormat};

mod limits;
pub use limits::Limits;

mod q;
pub use q::{Fix16, Fix32, Fix64, Fix8, Q};

mod word;
pub use word::{Word, WordWidth};

/// Converts `x` to a `T` word with `N` fractional bits.
///
/// This is [`Q::from_f32`] for callers that work with bare words.
///
/// ```
/// assert_eq!(qformat::to_fixed::<i16, 12>(1.2), 4915);
/// assert_eq!(qformat::to_fixed::<i16, 12>(-100.0), i16::MIN);
/// ```
#[inline]
pub fn to_fixed<T: Word, const N: u32>(x: f32) -> T {
    Q::<T, N>::from_f32(x).raw()
}

/// Converts the `T` word `v` with `N` fractional bits to `f32`.
///
/// This is [`Q::to_f32`] for callers that work with bare words.
#[inline]
pub fn to_float<T: Word, const N: u32>(v: T) -> f32 {
    Q::<T, N>::from_raw(v).to_f32()
}

/// Error for an invalid Q-format or a value that does not fit one.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The word width is not 8, 16, 32, or 64 bits.
    #[error("unsupported word width {0} (expected 8, 16, 32, or 64)")]
    UnsupportedWidth(u32),

    /// The number of fractional bits leaves no room for the sign bit.
    #[error("{width}-bit words hold at most {} fractional bits, not {frac_bits}", .width.max_frac_bits())]
    FracBitsOutOfRange {
        /// Word width.
        width: WordWidth,
        /// Requested number of fractional bits.
        frac_bits: u32,
    },

    /// No supported word width has room for this many fractional bits.
    #[error("no supported word width holds {0} fractional bits")]
    NoWidthFor(u32),

    /// A stored value does not fit the word width.
    #[error("stored value {raw} does not fit in a {width}-bit word")]
    RawOutOfRange {
        /// Word width.
        width: WordWidth,
        /// Stored value.
        raw: i64,
    },

    /// The text is not `Q<n>` or `Q<n>_b<w>`.
    #[error("invalid Q-format {0:?} (expected Q<n> or Q<n>_b<w>)")]
    Syntax(String),
}

/// Error rendering a fixed-point array.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The index is not less than the length of the array.
    #[error("index {index} is out of bounds for an array of length {len}")]
    OutOfBounds {
        /// Requested index.
        index: usize,
        /// Array length.
        len: usize,
    },

    /// Writing the rendering failed.
    #[error("failed to write rendering: {0}")]
    Io(#[from] std::io::Error),
}

/// Prints a fixed-point value to standard output under the text of the
/// expression, as rendered by [`render::render_value`].
///
/// Evaluates to the [`std::io::Result`] of the write.
///
/// ```
/// use qformat::{q_debug, Fix16};
///
/// let varc = Fix16::<15>::from_raw(12);
/// q_debug!(varc).unwrap();
/// // Q15	- varc                                            :     0.000366210937500000000
/// ```
#[macro_export]
macro_rules! q_debug {
    ($value:expr) => {
        $crate::render::print_value(stringify!($value), $value)
    };
}

/// Prints elements `start..=stop` of a fixed-point array or slice to
/// standard output under the text of the expression, as rendered by
/// [`render::render_array_range`].
///
/// Evaluates to the [`Result`] of the rendering, which fails without
/// printing anything if `stop` is out of bounds.
///
/// ```
/// use qformat::{q_debug_array, Fix8};
///
/// let coeffs = [Fix8::<7>::from_f32(-0.75), Fix8::<7>::from_f32(0.5)];
/// q_debug_array!(coeffs, 0, 1).unwrap();
/// // Q7 - coeffs[ 0]: -0.750000000000000000000
/// // Q7 - coeffs[ 1]: +0.500000000000000000000
/// // ...
/// assert!(q_debug_array!(coeffs, 0, 2).is_err());
/// ```
#[macro_export]
macro_rules! q_debug_array {
    ($array:expr, $start:expr, $stop:expr) => {
        $crate::render::print_array_range(stringify!($array), &$array[..], $start, $stop)
    };
}

#[cfg(test)]
mod test {
    use crate::{to_fixed, to_float, FormatError, QFormat, RenderError, WordWidth};

    #[test]
    fn free_functions() {
        assert_eq!(to_fixed::<i8, 7>(0.1), 12);
        assert_eq!(to_fixed::<i16, 12>(1.2), 4915);
        assert_eq!(to_fixed::<i32, 30>(1.2), 1_288_490_240);
        assert_eq!(to_fixed::<i64, 47>(1245.6), 175_302_612_059_422_720);
        assert_eq!(to_fixed::<i8, 7>(1.0), i8::MAX);
        assert_eq!(to_fixed::<i8, 7>(-2.0), i8::MIN);

        assert_eq!(to_float::<i16, 15>(12), 12.0 / 32768.0);
        assert_eq!(to_float::<i8, 7>(i8::MIN), -1.0);
        assert_eq!(to_float::<i64, 0>(-5), -5.0);
    }

    #[test]
    fn macros() {
        let varc = crate::Fix16::<15>::from_raw(12);
        q_debug!(varc).unwrap();

        let v = vec![crate::Fix32::<16>::from_f32(2.5); 3];
        q_debug_array!(v, 0, 2).unwrap();
        q_debug_array!(v, 2, 1).unwrap();
        assert!(matches!(
            q_debug_array!(v, 1, 3),
            Err(RenderError::OutOfBounds { index: 3, len: 3 })
        ));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            FormatError::UnsupportedWidth(12).to_string(),
            "unsupported word width 12 (expected 8, 16, 32, or 64)"
        );
        assert_eq!(
            FormatError::FracBitsOutOfRange {
                width: WordWidth::W16,
                frac_bits: 16
            }
            .to_string(),
            "16-bit words hold at most 15 fractional bits, not 16"
        );
        assert_eq!(
            "Q64".parse::<QFormat>().unwrap_err().to_string(),
            "no supported word width holds 64 fractional bits"
        );
        assert_eq!(
            FormatError::Syntax("X7".into()).to_string(),
            "invalid Q-format \"X7\" (expected Q<n> or Q<n>_b<w>)"
        );
        assert_eq!(
            RenderError::OutOfBounds { index: 4, len: 4 }.to_string(),
            "index 4 is out of bounds for an array of length 4"
        );
    }
}
