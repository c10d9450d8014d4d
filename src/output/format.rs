//! Text layouts of the result files.

use std::io::{self, Write};

use super::Snapshot;

/// Legacy VTK structured grid with one temperature per node.
pub fn write_vtk<W: Write>(out: &mut W, snapshot: &Snapshot<'_>) -> io::Result<()> {
    let n = snapshot.nodes.len();
    writeln!(out, "# vtk DataFile Version 2.0")?;
    writeln!(out, "current time is {:.6}", snapshot.time)?;
    writeln!(out, "ASCII")?;
    writeln!(out, "DATASET STRUCTURED_GRID")?;
    writeln!(out, "DIMENSIONS {} {} 1", snapshot.nx, snapshot.ny)?;
    writeln!(out, "POINTS {} double", n)?;
    for node in snapshot.nodes {
        writeln!(out, "{:.8}  {:.8}  0.0", node.x, node.y)?;
    }
    writeln!(out)?;
    writeln!(out, "POINT_DATA {}", n)?;
    writeln!(out, "SCALARS temperature double")?;
    writeln!(out, "LOOKUP_TABLE default")?;
    for t in snapshot.temperatures {
        writeln!(out, "{:.8}", t)?;
    }
    Ok(())
}

/// Surface temperature profile, one `offset<TAB>temperature` row per node.
pub fn write_plot_data<W: Write>(out: &mut W, snapshot: &Snapshot<'_>) -> io::Result<()> {
    writeln!(out, "current time is {:.6}", snapshot.time)?;
    for (x, t) in &snapshot.surface {
        writeln!(out, "{:.8}\t{:.10}\t", x, t)?;
    }
    Ok(())
}

/// Heater current densities in A/cm^2.
pub fn write_current_densities<W: Write>(out: &mut W, densities: &[f64]) -> io::Result<()> {
    writeln!(out, "units are A/cm^2")?;
    for j in densities {
        writeln!(out, "{}", scientific(*j))?;
    }
    Ok(())
}

/// `d.dddddde+XX` with a signed, at least two digit exponent.
fn scientific(value: f64) -> String {
    let text = format!("{:.6e}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}
