//! The `qfmt` command: conversions, limits, and renderings of Q-format
//! fixed-point values.

use std::io::Write;

use anyhow::{Context, Result};
use log::debug;
use qformat::{convert::Saturation, render, DynamicFixed, Fix16, Fix32, Fix64, Fix8, QFormat};

pub mod cli;
use cli::{Cli, Commands, Sink};

/// Runs `cli`, writing its output to `out`.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Convert { format, values } => convert(format, &values, out),
        Commands::Limits { format } => limits(format, out),
        Commands::Render {
            format,
            name,
            start,
            stop,
            raw,
        } => render_array(format, &name, start, stop, &raw, cli.sink, out),
        Commands::Examples => examples(cli.sink, out),
    }
}

fn convert(format: QFormat, values: &[f32], out: &mut dyn Write) -> Result<()> {
    debug!("Converting {} value(s) to {format}", values.len());
    let digits = format.width().bits() as usize / 4;
    for &x in values {
        let fixed = format.to_fixed(x);
        let saturated = match format.saturation(x) {
            Some(Saturation::High) => " (saturated high)",
            Some(Saturation::Low) => " (saturated low)",
            None => "",
        };
        writeln!(
            out,
            "{x} -> {} 0x{:0digits$x} = {fixed}{saturated}",
            fixed.raw(),
            fixed.to_bits(),
        )?;
    }
    Ok(())
}

fn limits(format: QFormat, out: &mut dyn Write) -> Result<()> {
    let limits = format.limits();
    writeln!(out, "format     {format}")?;
    writeln!(out, "int_bits   {}", format.int_bits())?;
    writeln!(out, "scale      {}", limits.scale)?;
    writeln!(out, "fixed_max  {}", limits.fixed_max)?;
    writeln!(out, "fixed_min  {}", limits.fixed_min)?;
    writeln!(out, "float_max  {}", limits.float_max)?;
    writeln!(out, "float_min  {}", limits.float_min)?;
    Ok(())
}

fn render_array(
    format: QFormat,
    name: &str,
    start: usize,
    stop: Option<usize>,
    raw: &[i64],
    sink: Sink,
    out: &mut dyn Write,
) -> Result<()> {
    let array = raw
        .iter()
        .map(|&raw| DynamicFixed::from_raw(format, raw))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid stored value for {format}"))?;
    let stop = stop.unwrap_or(array.len().saturating_sub(1));
    debug!("Rendering {name}[{start}..={stop}] to {sink}");
    let result = match sink {
        Sink::Stdout => render::write_array_range(out, name, &array, start, stop),
        Sink::Log => render::log_array_range(name, &array, start, stop),
    };
    result.with_context(|| format!("Failed to render {name}[{start}..={stop}]"))
}

fn examples(sink: Sink, out: &mut dyn Write) -> Result<()> {
    let vara = Fix64::<47>::from_f32(1245.6);
    let varb = Fix32::<30>::from_f32(1.2);
    let varc = Fix16::<12>::from_f32(1.2);
    let vard = Fix8::<7>::from_f32(0.1);

    let values: [(&str, DynamicFixed); 4] = [
        ("vara", vara.into()),
        ("varb", varb.into()),
        ("varc", varc.into()),
        ("vard", vard.into()),
    ];
    for (name, value) in values {
        match sink {
            Sink::Stdout => render::write_value(out, name, value)?,
            Sink::Log => render::log_value(name, value),
        }
    }
    Ok(())
}
