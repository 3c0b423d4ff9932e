//! The general-purpose embeddable header: atlas UV helper, glyphs at three pixel
//! depths and the packed alpha atlas.

use std::io::{self, Write};

use quickfont_data::{BitmapImage, GlyphTable};

use super::{glyph_comment, write_include_guard_open, write_size_defines};

const GUARD: &str = "INCLUDE_QUICKFONT_H_";
const PREFIX: &str = "QF";

/// Atlas words per output line, after the first line which carries one more.
const WORDS_PER_LINE: usize = 32;

const ATLAS_UV: &str = r#"static void qf_atlas_uv(char c, float *x0, float *y0, float *x1, float *y1) {
    if (c < 32 || c > 126) {
        c = ' ';
    }
    c -= 32;
    *x0 = (float)(c * QF_GLYPH_WIDTH) / (float)QF_ATLAS_WIDTH;
    *x1 = (float)((c+1) * QF_GLYPH_WIDTH) / (float)QF_ATLAS_WIDTH;
    *y0 = 0.0f;
    *y1 = 1.0f;
}
"#;

/// Writes `quickfont.h`.
///
/// `alpha_atlas` is the alpha-variant raster; its pixels are emitted as the
/// little-endian 32-bit words a `uint32_t` view of the bitmap file would read.
pub fn write<W: Write>(table: &GlyphTable, alpha_atlas: &BitmapImage, mut out: W) -> io::Result<()> {
    write_include_guard_open(&mut out, GUARD)?;
    write_size_defines(&mut out, PREFIX)?;

    writeln!(out, "#define QF_ATLAS_WIDTH (QF_NUM_GLYPHS * QF_GLYPH_WIDTH)")?;
    writeln!(out, "#define QF_ATLAS_HEIGHT QF_GLYPH_HEIGHT")?;
    writeln!(out)?;

    out.write_all(ATLAS_UV.as_bytes())?;
    writeln!(out)?;

    writeln!(out, "static const char *qf_glyphs_str[] = {{")?;
    for (symbol, cell) in table {
        writeln!(out, "    {} \"{}\",", glyph_comment(symbol), cell.to_packed_art())?;
    }
    writeln!(out, "}};\n")?;

    write_glyph_array(&mut out, table, "unsigned char", "qf_glyphs_8bpp", 1, |on| {
        if on { "255" } else { "0" }
    })?;
    write_glyph_array(&mut out, table, "unsigned char", "qf_glyphs_24bpp", 3, |on| {
        if on { "255" } else { "0" }
    })?;
    write_glyph_array(&mut out, table, "unsigned int", "qf_glyphs_32bpp", 1, |on| {
        if on { "0xFFFFFFFF" } else { "0" }
    })?;

    write_atlas_words(&mut out, alpha_atlas)?;

    writeln!(out, "#endif")
}

/// One brace-enclosed entry per glyph, each pixel repeated `channels` times.
fn write_glyph_array<W: Write>(
    out: &mut W,
    table: &GlyphTable,
    element: &str,
    name: &str,
    channels: usize,
    value: impl Fn(bool) -> &'static str,
) -> io::Result<()> {
    let extent = match channels {
        1 => "QF_GLYPH_WIDTH*QF_GLYPH_HEIGHT".to_string(),
        n => format!("QF_GLYPH_WIDTH*QF_GLYPH_HEIGHT*{n}"),
    };
    writeln!(out, "static const {element} {name}[][{extent}] = {{")?;

    for (symbol, cell) in table {
        let values: Vec<&str> = cell
            .pixels()
            .flat_map(|on| std::iter::repeat_n(value(on), channels))
            .collect();
        writeln!(out, "    {} {{{}}},", glyph_comment(symbol), values.join(", "))?;
    }

    writeln!(out, "}};\n")
}

fn write_atlas_words<W: Write>(out: &mut W, atlas: &BitmapImage) -> io::Result<()> {
    write!(out, "static const unsigned int qf_atlas_32bpp[] = {{\n    ")?;
    for (i, pixel) in atlas.pixels().iter().enumerate() {
        write!(out, "{:#x}, ", pixel.to_le_u32())?;
        if i > 0 && i % WORDS_PER_LINE == 0 {
            write!(out, "\n    ")?;
        }
    }
    writeln!(out, "\n}};\n")
}

#[cfg(test)]
mod tests {
    use quickfont_data::{GlyphCell, PRINTABLE_ASCII, Rgba};

    use super::*;

    fn table_with_lit(symbol: char) -> GlyphTable {
        let mut builder = GlyphTable::builder();
        for c in PRINTABLE_ASCII {
            let mut cell = GlyphCell::empty();
            if c == symbol {
                cell.set(1, 0, true);
            }
            builder.insert(c as u32, cell).unwrap();
        }
        builder.build().unwrap()
    }

    fn render(table: &GlyphTable, atlas: &BitmapImage) -> String {
        let mut out = Vec::new();
        write(table, atlas, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn entry<'a>(text: &'a str, array: &str, symbol: char) -> &'a str {
        let start = text.find(array).unwrap();
        let comment = glyph_comment(symbol);
        text[start..]
            .lines()
            .find(|line| line.trim_start().starts_with(&comment))
            .unwrap()
    }

    #[test]
    fn defines_and_uv_helper() {
        let atlas = BitmapImage::new(GlyphTable::ATLAS_WIDTH, GlyphTable::ATLAS_HEIGHT);
        let text = render(&table_with_lit('A'), &atlas);

        assert!(text.starts_with("#ifndef INCLUDE_QUICKFONT_H_\n#define INCLUDE_QUICKFONT_H_\n\n"));
        assert!(text.contains("#define QF_NUM_GLYPHS 95\n"));
        assert!(text.contains("#define QF_ATLAS_WIDTH (QF_NUM_GLYPHS * QF_GLYPH_WIDTH)\n"));
        assert!(text.contains("#define QF_ATLAS_HEIGHT QF_GLYPH_HEIGHT\n"));
        assert!(text.contains("static void qf_atlas_uv(char c, float *x0"));
        assert!(text.ends_with("\n};\n\n#endif\n"));
    }

    #[test]
    fn glyph_entries_at_every_depth() {
        let atlas = BitmapImage::new(GlyphTable::ATLAS_WIDTH, GlyphTable::ATLAS_HEIGHT);
        let text = render(&table_with_lit('A'), &atlas);

        let rest = ".".repeat(GlyphCell::PIXEL_COUNT - 2);
        assert_eq!(
            entry(&text, "qf_glyphs_str", 'A'),
            format!("    /* 'A' (65) */ \".@{rest}\",")
        );

        let eight = entry(&text, "qf_glyphs_8bpp", 'A');
        assert!(eight.starts_with("    /* 'A' (65) */ {0, 255, 0, "));
        assert!(eight.ends_with(", 0},"));
        assert_eq!(eight.matches(", ").count(), GlyphCell::PIXEL_COUNT - 1);

        let twenty_four = entry(&text, "qf_glyphs_24bpp", 'A');
        assert!(twenty_four.starts_with("    /* 'A' (65) */ {0, 0, 0, 255, 255, 255, 0, "));
        assert_eq!(twenty_four.matches(", ").count(), GlyphCell::PIXEL_COUNT * 3 - 1);

        let thirty_two = entry(&text, "qf_glyphs_32bpp", 'A');
        assert!(thirty_two.starts_with("    /* 'A' (65) */ {0, 0xFFFFFFFF, 0, "));

        assert!(text.contains("static const unsigned char qf_glyphs_24bpp[][QF_GLYPH_WIDTH*QF_GLYPH_HEIGHT*3] = {"));
        assert!(text.contains("static const unsigned int qf_glyphs_32bpp[][QF_GLYPH_WIDTH*QF_GLYPH_HEIGHT] = {"));
    }

    #[test]
    fn atlas_words_are_little_endian_and_wrapped() {
        let mut atlas = BitmapImage::new(GlyphTable::ATLAS_WIDTH, GlyphTable::ATLAS_HEIGHT);
        atlas.set_pixel(0, 0, Rgba::WHITE);
        atlas.set_pixel(1, 0, Rgba::new(0x11, 0x22, 0x33, 0x44));
        let text = render(&table_with_lit('A'), &atlas);

        let start = text.find("qf_atlas_32bpp[] = {\n").unwrap();
        let body = &text[start..];
        let lines: Vec<&str> = body.lines().skip(1).collect();

        // index 0..=32 on the first line, then 32 per line
        assert_eq!(lines[0].matches(", ").count(), 33);
        assert_eq!(lines[1].matches(", ").count(), 32);
        assert!(lines[0].starts_with("    0xffffffff, 0x44332211, 0x0, "));

        let words: usize = body.matches("0x").count();
        assert_eq!(words, GlyphTable::ATLAS_WIDTH * GlyphTable::ATLAS_HEIGHT);
    }
}
