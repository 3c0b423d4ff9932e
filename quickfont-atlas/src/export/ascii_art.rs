use std::io::{self, Write};

use quickfont_data::{GlyphCell, GlyphTable};

/// Writes the cell size followed by every glyph as rows of `.` and `@`.
///
/// ```text
/// 6
/// 11
///
/// ......    <- ' '
/// ...
///
/// ..@...    <- '!'
/// ```
///
/// Glyphs are separated by a blank line; there is none after the last glyph.
pub fn write<W: Write>(table: &GlyphTable, mut out: W) -> io::Result<()> {
    writeln!(out, "{}", GlyphCell::WIDTH)?;
    writeln!(out, "{}", GlyphCell::HEIGHT)?;
    writeln!(out)?;

    for (idx, (_, cell)) in table.iter().enumerate() {
        if idx > 0 {
            writeln!(out)?;
        }

        for row in cell.rows() {
            let line: String = row
                .iter()
                .map(|&on| if on { GlyphCell::ON } else { GlyphCell::OFF })
                .collect();
            writeln!(out, "{line}")?;
        }
    }

    Ok(())
}
