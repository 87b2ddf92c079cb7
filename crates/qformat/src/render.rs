//! Debug rendering of fixed-point values as floats.
//!
//! Every line shows the `Q<N>` tag of the value's format, the name it was
//! given, and its float view with 21 decimals, in fixed-width columns so that
//! adjacent lines can be compared by eye:
//!
//! ```text
//! Q15	- varc                                            :     0.000366210937500000000
//! Q7 - coeffs[ 0]: -0.750000000000000000000
//! Q7 - coeffs[ 1]: +0.500000000000000000000
//! ...
//! ```
//!
//! The `render_*` functions build the lines.  The `write_*`, `print_*`, and
//! `log_*` functions send them to an [`io::Write`], to standard output, or to
//! the [`log`] facade at debug level.  [`q_debug!`](crate::q_debug) and
//! [`q_debug_array!`](crate::q_debug_array) print a variable under its own
//! name.

use std::{
    fmt::{self, Display},
    io::{self, Write},
    iter,
};

use log::debug;

use crate::{DynamicFixed, RenderError, Word, Q};

/// Line that ends an array rendering.
pub const TERMINATOR: &str = "...";

const NAME_WIDTH: usize = 48;
const VALUE_WIDTH: usize = 27;
const DECIMALS: usize = 21;

/// A fixed-point value whose float view can be rendered.
pub trait FixedPoint: Copy {
    /// Returns the number of fractional bits of the value's format.
    fn frac_bits(&self) -> u32;

    /// Returns the value as `f32`.
    fn to_f32(&self) -> f32;
}

impl<T: Word, const N: u32> FixedPoint for Q<T, N> {
    fn frac_bits(&self) -> u32 {
        Self::FRAC_BITS
    }

    fn to_f32(&self) -> f32 {
        Q::<T, N>::to_f32(*self)
    }
}

impl FixedPoint for DynamicFixed {
    fn frac_bits(&self) -> u32 {
        self.format().frac_bits()
    }

    fn to_f32(&self) -> f32 {
        DynamicFixed::to_f32(self)
    }
}

/// One rendered scalar, formatted on demand.
#[derive(Copy, Clone, Debug)]
pub struct ValueLine<'a, V> {
    name: &'a str,
    value: V,
}

impl<'a, V: FixedPoint> ValueLine<'a, V> {
    /// Returns the rendering of `value` under `name`.
    pub fn new(name: &'a str, value: V) -> Self {
        Self { name, value }
    }
}

impl<V: FixedPoint> Display for ValueLine<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Q{}\t- {:<name_width$}: {:value_width$.decimals$}  ",
            self.value.frac_bits(),
            self.name,
            self.value.to_f32(),
            name_width = NAME_WIDTH,
            value_width = VALUE_WIDTH,
            decimals = DECIMALS,
        )
    }
}

/// One rendered array element, formatted on demand.
#[derive(Copy, Clone, Debug)]
pub struct ElementLine<'a, V> {
    name: &'a str,
    index: usize,
    value: V,
}

impl<V: FixedPoint> Display for ElementLine<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Q{} - {}[{:2}]: {:+.decimals$} ",
            self.value.frac_bits(),
            self.name,
            self.index,
            self.value.to_f32(),
            decimals = DECIMALS,
        )
    }
}

fn element<'a, V: FixedPoint>(
    name: &'a str,
    array: &[V],
    index: usize,
) -> Result<ElementLine<'a, V>, RenderError> {
    let value = *array.get(index).ok_or(RenderError::OutOfBounds {
        index,
        len: array.len(),
    })?;
    Ok(ElementLine { name, index, value })
}

/// Renders `value` under `name`.
///
/// ```
/// use qformat::{render::render_value, Fix16};
///
/// let line = render_value("varc", Fix16::<15>::from_raw(12));
/// assert!(line.starts_with("Q15\t- varc "));
/// assert!(line.ends_with(":     0.000366210937500000000  "));
/// ```
pub fn render_value<V: FixedPoint>(name: &str, value: V) -> String {
    ValueLine::new(name, value).to_string()
}

/// Renders `array[index]` under `name`, or returns an error if `index` is out
/// of bounds.
pub fn render_array_element<V: FixedPoint>(
    name: &str,
    array: &[V],
    index: usize,
) -> Result<String, RenderError> {
    Ok(element(name, array, index)?.to_string())
}

/// Renders `array[start..=stop]` under `name`, one line per element in
/// ascending index order, followed by [`TERMINATOR`].
///
/// The range includes `stop`.  If `start > stop`, the rendering consists of
/// the terminator alone.  If `stop` is out of bounds, this returns an error
/// before rendering anything.
///
/// The lines are produced lazily.  Cloning the iterator restarts the
/// rendering from the clone's position.
pub fn render_array_range<'a, V: FixedPoint>(
    name: &'a str,
    array: &'a [V],
    start: usize,
    stop: usize,
) -> Result<impl Iterator<Item = String> + Clone + 'a, RenderError> {
    if start <= stop && stop >= array.len() {
        return Err(RenderError::OutOfBounds {
            index: stop,
            len: array.len(),
        });
    }
    Ok((start..=stop)
        .map(move |index| {
            ElementLine {
                name,
                index,
                value: array[index],
            }
            .to_string()
        })
        .chain(iter::once(TERMINATOR.to_string())))
}

/// Writes the rendering of `value` as one line to `out`.
pub fn write_value<W, V>(out: &mut W, name: &str, value: V) -> io::Result<()>
where
    W: Write + ?Sized,
    V: FixedPoint,
{
    writeln!(out, "{}", ValueLine::new(name, value))
}

/// Writes the rendering of `array[index]` as one line to `out`.
pub fn write_array_element<W, V>(
    out: &mut W,
    name: &str,
    array: &[V],
    index: usize,
) -> Result<(), RenderError>
where
    W: Write + ?Sized,
    V: FixedPoint,
{
    writeln!(out, "{}", element(name, array, index)?)?;
    Ok(())
}

/// Writes the rendering of `array[start..=stop]` to `out`, one line each.
pub fn write_array_range<W, V>(
    out: &mut W,
    name: &str,
    array: &[V],
    start: usize,
    stop: usize,
) -> Result<(), RenderError>
where
    W: Write + ?Sized,
    V: FixedPoint,
{
    for line in render_array_range(name, array, start, stop)? {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Prints the rendering of `value` to standard output.
pub fn print_value<V: FixedPoint>(name: &str, value: V) -> io::Result<()> {
    write_value(&mut io::stdout().lock(), name, value)
}

/// Prints the rendering of `array[start..=stop]` to standard output.
///
/// Standard output stays locked until the terminator is written, so
/// renderings from concurrent callers do not interleave.
pub fn print_array_range<V: FixedPoint>(
    name: &str,
    array: &[V],
    start: usize,
    stop: usize,
) -> Result<(), RenderError> {
    write_array_range(&mut io::stdout().lock(), name, array, start, stop)
}

/// Logs the rendering of `value` at debug level.
pub fn log_value<V: FixedPoint>(name: &str, value: V) {
    debug!("{}", ValueLine::new(name, value));
}

/// Logs the rendering of `array[start..=stop]` at debug level, one record
/// per line.
pub fn log_array_range<V: FixedPoint>(
    name: &str,
    array: &[V],
    start: usize,
    stop: usize,
) -> Result<(), RenderError> {
    for line in render_array_range(name, array, start, stop)? {
        debug!("{line}");
    }
    Ok(())
}
