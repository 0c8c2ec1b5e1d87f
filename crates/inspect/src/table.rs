use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::Write;

/// Write rows as left-aligned, space-padded columns under a header line.
pub(crate) fn write_table<const N: usize>(
    writer: &mut impl Write,
    headers: [&str; N],
    rows: &[[String; N]],
) -> Result<()> {
    let mut widths = headers.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }
    write_row(writer, &widths, headers.iter().copied())?;
    for row in rows {
        write_row(writer, &widths, row.iter().map(String::as_str))?;
    }
    Ok(())
}

fn write_row<'a>(writer: &mut impl Write, widths: &[usize], cells: impl Iterator<Item = &'a str>) -> Result<()> {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(writer, "{}", line.trim_end()).or_raise(|| ErrorKind::Io)
}
