//! Text serializers for a [`GlyphTable`](quickfont_data::GlyphTable).
//!
//! Every exporter is a pure function from the table (and, for the pixel-array header,
//! the alpha atlas) to bytes written into any [`std::io::Write`].

pub mod ascii_art;
pub mod pixel_header;
pub mod rect_header;

use std::io::{self, Write};

use quickfont_data::{GlyphCell, GlyphTable};

fn write_include_guard_open<W: Write>(out: &mut W, guard: &str) -> io::Result<()> {
    writeln!(out, "#ifndef {guard}")?;
    writeln!(out, "#define {guard}")?;
    writeln!(out)
}

fn write_size_defines<W: Write>(out: &mut W, prefix: &str) -> io::Result<()> {
    writeln!(out, "#define {prefix}_NUM_GLYPHS {}", GlyphTable::GLYPH_COUNT)?;
    writeln!(out, "#define {prefix}_GLYPH_WIDTH {}", GlyphCell::WIDTH)?;
    writeln!(out, "#define {prefix}_GLYPH_HEIGHT {}", GlyphCell::HEIGHT)?;
    writeln!(out)
}

/// `/* 'A' (65) */`
fn glyph_comment(symbol: char) -> String {
    format!("/* '{symbol}' ({}) */", symbol as u32)
}
