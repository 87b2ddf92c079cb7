use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

use log::trace;

use crate::{
    convert::{self, Saturation},
    FormatError, Limits, Word, WordWidth, Q,
};

/// A Q-format chosen at run time: a word width and a fractional-bit count.
///
/// Constructing a `QFormat` validates `frac_bits <= width.bits() - 1`, so
/// every `QFormat` in existence is usable.  Conversions dispatch on the width
/// to the same generic code that [`Q`] uses, so they produce identical
/// results.
///
/// # Textual form
///
/// `QFormat` parses from and displays as the names used for these formats
/// in C headers:
///
/// * `Q12_b16` (also `Q12b16`, `q12_b16`) is 16 bits with 12 fractional bits.
///
/// * `Q12` alone selects the narrowest word with room for 12 fractional
///   bits, as given by [`WordWidth::narrowest_for`].
///
/// ```
/// use qformat::{QFormat, WordWidth};
///
/// let q: QFormat = "Q12".parse().unwrap();
/// assert_eq!(q, QFormat::new(WordWidth::W16, 12).unwrap());
/// assert_eq!(q.to_string(), "Q12_b16");
/// assert_eq!("Q47".parse::<QFormat>().unwrap().width(), WordWidth::W64);
/// assert!("Q8_b8".parse::<QFormat>().is_err());
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct QFormat {
    width: WordWidth,
    frac_bits: u32,
}

impl QFormat {
    /// Returns the format for `width`-bit words with `frac_bits` fractional
    /// bits, or an error if that leaves no room for the sign bit.
    pub fn new(width: WordWidth, frac_bits: u32) -> Result<Self, FormatError> {
        if frac_bits <= width.max_frac_bits() {
            Ok(Self { width, frac_bits })
        } else {
            Err(FormatError::FracBitsOutOfRange { width, frac_bits })
        }
    }

    /// Returns the format with `frac_bits` fractional bits in the narrowest
    /// word that holds them.
    pub fn shorthand(frac_bits: u32) -> Result<Self, FormatError> {
        Self::new(WordWidth::narrowest_for(frac_bits)?, frac_bits)
    }

    /// Returns the format of `Q<T, N>`.
    pub fn of<T: Word, const N: u32>() -> Self {
        Self {
            width: T::WIDTH,
            frac_bits: Q::<T, N>::FRAC_BITS,
        }
    }

    /// Returns the word width.
    pub fn width(&self) -> WordWidth {
        self.width
    }

    /// Returns the number of fractional bits.
    pub fn frac_bits(&self) -> u32 {
        self.frac_bits
    }

    /// Returns the number of integer bits, excluding the sign bit.
    pub fn int_bits(&self) -> u32 {
        self.width.max_frac_bits() - self.frac_bits
    }

    /// Returns the scale factor and saturation bounds of this format.
    pub fn limits(&self) -> DynamicLimits {
        match self.width {
            WordWidth::W8 => self.typed_limits::<i8>().into(),
            WordWidth::W16 => self.typed_limits::<i16>().into(),
            WordWidth::W32 => self.typed_limits::<i32>().into(),
            WordWidth::W64 => self.typed_limits::<i64>().into(),
        }
    }

    /// Converts `x` to this format, saturating if it is out of range and
    /// otherwise truncating toward zero.
    pub fn to_fixed(&self, x: f32) -> DynamicFixed {
        let raw = match self.width {
            WordWidth::W8 => convert::to_fixed(&self.typed_limits::<i8>(), x).widen(),
            WordWidth::W16 => convert::to_fixed(&self.typed_limits::<i16>(), x).widen(),
            WordWidth::W32 => convert::to_fixed(&self.typed_limits::<i32>(), x).widen(),
            WordWidth::W64 => convert::to_fixed(&self.typed_limits::<i64>(), x).widen(),
        };
        DynamicFixed { format: *self, raw }
    }

    /// Reports whether [`to_fixed`](Self::to_fixed) saturates `x`.
    pub fn saturation(&self, x: f32) -> Option<Saturation> {
        self.limits().saturation(x)
    }

    fn typed_limits<T: Word>(&self) -> Limits<T> {
        debug_assert_eq!(T::WIDTH, self.width);
        Limits::compute(self.frac_bits)
    }

    fn typed_to_float<T: Word>(&self, raw: i64) -> f32 {
        // `DynamicFixed` keeps `raw` within the word's range.
        let raw = T::narrow(raw).unwrap_or(if raw < 0 { T::MIN } else { T::MAX });
        convert::to_float(&self.typed_limits::<T>(), raw)
    }
}

impl Debug for QFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for QFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Q{}_b{}", self.frac_bits, self.width)
    }
}

impl FromStr for QFormat {
    type Err = FormatError;

    /// Parses `Q<n>` or `Q<n>_b<w>`; see [the type documentation](QFormat).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = || FormatError::Syntax(s.into());

        let body = s
            .trim()
            .strip_prefix(|c: char| c == 'Q' || c == 'q')
            .ok_or_else(syntax)?;
        let (frac_bits, width) = match body.find(|c: char| c == '_' || c == 'b' || c == 'B') {
            Some(index) => {
                let (frac_bits, rest) = body.split_at(index);
                let rest = rest.strip_prefix('_').unwrap_or(rest);
                let width = rest
                    .strip_prefix(|c: char| c == 'b' || c == 'B')
                    .ok_or_else(syntax)?;
                (frac_bits, Some(width))
            }
            None => (body, None),
        };
        if frac_bits.is_empty() || !frac_bits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(syntax());
        }
        let frac_bits: u32 = frac_bits.parse().map_err(|_| syntax())?;

        let format = match width {
            Some(width) => {
                if width.is_empty() || !width.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(syntax());
                }
                let bits: u32 = width.parse().map_err(|_| syntax())?;
                Self::new(WordWidth::try_from(bits)?, frac_bits)?
            }
            None => Self::shorthand(frac_bits)?,
        };
        trace!("parsed {s:?} as {format}");
        Ok(format)
    }
}

/// [`Limits`] of a [`QFormat`], widened to the 64-bit types.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DynamicLimits {
    /// `2**N`.
    pub scale: u64,

    /// Largest stored value.
    pub fixed_max: i64,

    /// Smallest stored value.
    pub fixed_min: i64,

    /// Smallest float that saturates high.
    pub float_max: f32,

    /// Negation of `float_max`.  Floats below this saturate low.
    pub float_min: f32,
}

impl DynamicLimits {
    /// Reports whether converting `x` under these limits saturates.
    pub fn saturation(&self, x: f32) -> Option<Saturation> {
        convert::saturation(self.float_min, self.float_max, x)
    }
}

impl<T: Word> From<Limits<T>> for DynamicLimits
where
    T::Unsigned: Into<u64>,
{
    fn from(limits: Limits<T>) -> Self {
        Self {
            scale: limits.scale.into(),
            fixed_max: limits.fixed_max.widen(),
            fixed_min: limits.fixed_min.widen(),
            float_max: limits.float_max,
            float_min: limits.float_min,
        }
    }
}

/// A fixed-point value together with its run-time [`QFormat`].
///
/// The stored value is kept sign-extended in an `i64` and always lies within
/// the range of the format's word.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct DynamicFixed {
    format: QFormat,
    raw: i64,
}

impl DynamicFixed {
    /// Wraps stored value `raw` in `format`, or returns an error if `raw` does
    /// not fit the format's word.
    ///
    /// ```
    /// use qformat::{DynamicFixed, QFormat};
    ///
    /// let q7: QFormat = "Q7".parse().unwrap();
    /// assert_eq!(DynamicFixed::from_raw(q7, -64).unwrap().to_f32(), -0.5);
    /// assert!(DynamicFixed::from_raw(q7, 128).is_err());
    /// ```
    pub fn from_raw(format: QFormat, raw: i64) -> Result<Self, FormatError> {
        let width = format.width();
        if (width.raw_min()..=width.raw_max()).contains(&raw) {
            Ok(Self { format, raw })
        } else {
            Err(FormatError::RawOutOfRange { width, raw })
        }
    }

    /// Returns the format.
    pub fn format(&self) -> QFormat {
        self.format
    }

    /// Returns the stored value, sign-extended.
    pub fn raw(&self) -> i64 {
        self.raw
    }

    /// Returns the stored value's two's-complement bit pattern in the low
    /// `width` bits.
    pub fn to_bits(&self) -> u64 {
        let bits = self.format.width.bits();
        let mask = u64::MAX >> (u64::BITS - bits);
        self.raw as u64 & mask
    }

    /// Returns this value as `f32`.
    pub fn to_f32(&self) -> f32 {
        let format = &self.format;
        match format.width {
            WordWidth::W8 => format.typed_to_float::<i8>(self.raw),
            WordWidth::W16 => format.typed_to_float::<i16>(self.raw),
            WordWidth::W32 => format.typed_to_float::<i32>(self.raw),
            WordWidth::W64 => format.typed_to_float::<i64>(self.raw),
        }
    }

    /// Returns true if this is the largest or smallest stored value of its
    /// format.
    pub fn is_saturated(&self) -> bool {
        let width = self.format.width;
        self.raw == width.raw_max() || self.raw == width.raw_min()
    }
}

impl<T: Word, const N: u32> From<Q<T, N>> for DynamicFixed {
    fn from(value: Q<T, N>) -> Self {
        Self {
            format: QFormat::of::<T, N>(),
            raw: value.raw().widen(),
        }
    }
}

impl From<DynamicFixed> for f32 {
    fn from(value: DynamicFixed) -> Self {
        value.to_f32()
    }
}

impl Debug for DynamicFixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:?})", self.format, self.to_f32())
    }
}

impl Display for DynamicFixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.to_f32(), f)
    }
}

#[cfg(test)]
mod test {
    use itertools::iproduct;

    use super::{DynamicFixed, DynamicLimits, QFormat};
    use crate::{
        convert::Saturation, Fix16, Fix32, Fix64, Fix8, FormatError, Word, WordWidth, Q,
    };

    fn q(s: &str) -> QFormat {
        s.parse().unwrap()
    }

    #[test]
    fn new() {
        for width in WordWidth::ALL {
            for n in 0..width.bits() {
                let format = QFormat::new(width, n).unwrap();
                assert_eq!(format.width(), width);
                assert_eq!(format.frac_bits(), n);
                assert_eq!(format.int_bits(), width.bits() - 1 - n);
            }
            assert_eq!(
                QFormat::new(width, width.bits()),
                Err(FormatError::FracBitsOutOfRange {
                    width,
                    frac_bits: width.bits()
                })
            );
        }
    }

    #[test]
    fn from_str() {
        for (s, expect) in [
            ("Q7", Ok((WordWidth::W8, 7))),
            ("Q0", Ok((WordWidth::W8, 0))),
            ("q1", Ok((WordWidth::W8, 1))),
            ("Q8", Ok((WordWidth::W16, 8))),
            ("Q15", Ok((WordWidth::W16, 15))),
            ("Q16", Ok((WordWidth::W32, 16))),
            ("Q31", Ok((WordWidth::W32, 31))),
            ("Q32", Ok((WordWidth::W64, 32))),
            ("Q63", Ok((WordWidth::W64, 63))),
            ("Q7_b8", Ok((WordWidth::W8, 7))),
            ("Q7_b16", Ok((WordWidth::W16, 7))),
            ("Q7b32", Ok((WordWidth::W32, 7))),
            ("Q7B64", Ok((WordWidth::W64, 7))),
            (" Q12_b16 ", Ok((WordWidth::W16, 12))),
            ("Q64", Err(FormatError::NoWidthFor(64))),
            (
                "Q8_b8",
                Err(FormatError::FracBitsOutOfRange {
                    width: WordWidth::W8,
                    frac_bits: 8,
                }),
            ),
            ("Q7_b12", Err(FormatError::UnsupportedWidth(12))),
            ("Q", Err(FormatError::Syntax("Q".into()))),
            ("12", Err(FormatError::Syntax("12".into()))),
            ("Q-1", Err(FormatError::Syntax("Q-1".into()))),
            ("Q+1", Err(FormatError::Syntax("Q+1".into()))),
            ("Q7_", Err(FormatError::Syntax("Q7_".into()))),
            ("Q7_b", Err(FormatError::Syntax("Q7_b".into()))),
            ("Q7_x8", Err(FormatError::Syntax("Q7_x8".into()))),
            ("Q_b8", Err(FormatError::Syntax("Q_b8".into()))),
            ("Q99999999999", Err(FormatError::Syntax("Q99999999999".into()))),
        ] {
            let expect = expect.map(|(width, n)| QFormat::new(width, n).unwrap());
            assert_eq!(s.parse::<QFormat>(), expect, "parsing {s:?}");
        }
    }

    #[test]
    fn display() {
        for (width, n) in iproduct!(WordWidth::ALL, 0..64u32) {
            if let Ok(format) = QFormat::new(width, n) {
                let s = format.to_string();
                assert_eq!(s, format!("Q{n}_b{width}"));
                assert_eq!(s.parse::<QFormat>(), Ok(format));
            }
        }
        assert_eq!(format!("{:?}", q("Q15")), "Q15_b16");
    }

    #[test]
    fn limits() {
        assert_eq!(
            q("Q12_b16").limits(),
            DynamicLimits {
                scale: 4096,
                fixed_max: 32767,
                fixed_min: -32768,
                float_max: 8.0,
                float_min: -8.0,
            }
        );
        assert_eq!(
            q("Q63").limits(),
            DynamicLimits {
                scale: 1 << 63,
                fixed_max: i64::MAX,
                fixed_min: i64::MIN,
                float_max: 1.0,
                float_min: -1.0,
            }
        );
        assert_eq!(
            q("Q30").limits(),
            DynamicLimits::from(Q::<i32, 30>::limits())
        );
    }

    #[test]
    fn matches_static() {
        fn check<T: Word, const N: u32>(x: f32) {
            let typed = Q::<T, N>::from_f32(x);
            let dynamic = QFormat::of::<T, N>().to_fixed(x);
            assert_eq!(dynamic, DynamicFixed::from(typed));
            assert_eq!(dynamic.raw(), typed.raw().widen());
            assert_eq!(dynamic.to_f32(), typed.to_f32());
        }
        for x in [0.0, 0.1, -0.1, 1.2, -1.2, 1245.6, 1e9, -1e9, f32::NAN] {
            check::<i8, 0>(x);
            check::<i8, 7>(x);
            check::<i16, 12>(x);
            check::<i16, 15>(x);
            check::<i32, 16>(x);
            check::<i32, 30>(x);
            check::<i64, 32>(x);
            check::<i64, 47>(x);
            check::<i64, 63>(x);
        }
    }

    #[test]
    fn examples() {
        assert_eq!(q("Q47").to_fixed(1245.6).raw(), 10_203_955i64 << 34);
        assert_eq!(q("Q30").to_fixed(1.2).raw(), 1_288_490_240);
        assert_eq!(q("Q12").to_fixed(1.2).raw(), 4915);
        assert_eq!(q("Q7").to_fixed(0.1).raw(), 12);
    }

    #[test]
    fn saturation() {
        let format = q("Q7");
        assert_eq!(format.saturation(1.0), Some(Saturation::High));
        assert_eq!(format.saturation(-1.0), None);
        assert_eq!(format.saturation(-1.01), Some(Saturation::Low));
        assert_eq!(format.to_fixed(1.0).raw(), 127);
        assert!(format.to_fixed(1.0).is_saturated());
        assert_eq!(format.to_fixed(-1.0).raw(), -128);
        assert!(!format.to_fixed(0.5).is_saturated());
    }

    #[test]
    fn from_raw() {
        let format = q("Q7_b8");
        assert_eq!(DynamicFixed::from_raw(format, 127).unwrap().raw(), 127);
        assert_eq!(DynamicFixed::from_raw(format, -128).unwrap().raw(), -128);
        assert_eq!(
            DynamicFixed::from_raw(format, 128),
            Err(FormatError::RawOutOfRange {
                width: WordWidth::W8,
                raw: 128
            })
        );
        assert_eq!(
            DynamicFixed::from_raw(format, -129),
            Err(FormatError::RawOutOfRange {
                width: WordWidth::W8,
                raw: -129
            })
        );
        let wide = q("Q63");
        assert!(DynamicFixed::from_raw(wide, i64::MIN).is_ok());
        assert!(DynamicFixed::from_raw(wide, i64::MAX).is_ok());
    }

    #[test]
    fn bits() {
        let value = |s: &str, raw: i64| DynamicFixed::from_raw(q(s), raw).unwrap().to_bits();
        assert_eq!(value("Q7_b8", -1), 0xff);
        assert_eq!(value("Q7_b8", -128), 0x80);
        assert_eq!(value("Q12_b16", -4915), 0xeccd);
        assert_eq!(value("Q30_b32", 1_288_490_240), 0x4ccc_cd00);
        assert_eq!(value("Q63_b64", -1), u64::MAX);
    }

    #[test]
    fn conversions() {
        assert_eq!(
            DynamicFixed::from(Fix8::<7>::from_raw(-64)).to_f32(),
            -0.5
        );
        assert_eq!(f32::from(DynamicFixed::from(Fix16::<12>::from_raw(4915))), 4915.0 / 4096.0);
        assert_eq!(
            DynamicFixed::from(Fix32::<30>::MAX).format(),
            q("Q30_b32")
        );
        assert_eq!(DynamicFixed::from(Fix64::<0>::MIN).raw(), i64::MIN);
        assert_eq!(
            format!("{:?}", DynamicFixed::from(Fix16::<15>::from_raw(16384))),
            "Q15_b16(0.5)"
        );
        assert_eq!(
            format!("{:.3}", DynamicFixed::from(Fix16::<12>::from_raw(4915))),
            "1.200"
        );
    }
}
