use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Display;

use qformat::QFormat;

#[derive(Parser)]
#[command(
    name = "qfmt",
    about = "Inspect Q-format fixed-point conversions.",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Where renderings from `render` and `examples` go.
    ///
    /// With `log`, each line becomes a debug-level log record, which is only
    /// visible with `RUST_LOG=debug`.
    #[arg(
        long,
        env = "QFMT_SINK",
        global = true,
        help_heading = "Global Options",
        default_value = "stdout"
    )]
    pub sink: Sink,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
#[value(rename_all = "snake_case")]
pub enum Sink {
    /// Write renderings to standard output.
    Stdout,
    /// Send renderings to the logger at debug level.
    Log,
}

impl Display for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let output = match self {
            Sink::Stdout => "stdout",
            Sink::Log => "log",
        };
        write!(f, "{}", output)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert floats to a fixed-point format and back.
    ///
    /// Prints, for each value, the stored integer, its bit pattern, the float
    /// it represents, and whether the conversion saturated.
    Convert {
        /// The fixed-point format, as `Q<n>` or `Q<n>_b<w>`.
        #[arg(long, short, env = "QFMT_FORMAT")]
        format: QFormat,
        /// The floats to convert.
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f32>,
    },
    /// Print the scale factor and saturation bounds of a format.
    Limits {
        /// The fixed-point format, as `Q<n>` or `Q<n>_b<w>`.
        #[arg(long, short, env = "QFMT_FORMAT")]
        format: QFormat,
    },
    /// Render an array of stored values as floats.
    Render {
        /// The fixed-point format, as `Q<n>` or `Q<n>_b<w>`.
        #[arg(long, short, env = "QFMT_FORMAT")]
        format: QFormat,
        /// The name to render the array under.
        #[arg(long, default_value = "array")]
        name: String,
        /// The first index to render.
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// The last index to render, inclusive.
        ///
        /// Defaults to the last element.
        #[arg(long)]
        stop: Option<usize>,
        /// The stored values.
        #[arg(required = true, allow_negative_numbers = true)]
        raw: Vec<i64>,
    },
    /// Convert and render the classic example values.
    ///
    /// These are 1245.6 in Q47, 1.2 in Q30 and in Q12, and 0.1 in Q7.
    Examples,
}
