use crate::{GlyphCell, GlyphTable};

/// Error categories for glyph data and bitmap images.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Glyph table construction errors.
    #[error("Glyph table error: {0}")]
    Table(String),

    /// Malformed glyph cell descriptions.
    #[error("Glyph cell error: {0}")]
    Cell(String),

    /// Bitmap image decoding errors.
    #[error("Bitmap image error: {0}")]
    Image(String),
}

impl Error {
    // Table errors
    pub(crate) fn duplicate_glyph(symbol: char) -> Self {
        Self::Table(format!("duplicate glyph for {symbol:?} ({})", symbol as u32))
    }

    pub(crate) fn not_printable(codepoint: u32) -> Self {
        Self::Table(format!("codepoint {codepoint} is outside the printable ASCII range"))
    }

    pub(crate) fn missing_glyphs(missing: &[char]) -> Self {
        let symbols: String = missing.iter().collect();
        Self::Table(format!(
            "font is missing {} printable glyph(s): {symbols:?}",
            missing.len()
        ))
    }

    // Cell errors
    pub(crate) fn cell_shape(rows: usize, columns: usize) -> Self {
        Self::Cell(format!(
            "expected a {}x{} glyph, got {rows} row(s) with a widest row of {columns} pixel(s)",
            GlyphCell::WIDTH,
            GlyphCell::HEIGHT,
        ))
    }

    pub(crate) fn cell_pixel(symbol: char) -> Self {
        Self::Cell(format!("unexpected pixel symbol {symbol:?}, expected '.' or '@'"))
    }

    // Image errors
    pub(crate) fn image_truncated(expected: usize, actual: usize) -> Self {
        Self::Image(format!("expected at least {expected} bytes, got {actual}"))
    }

    pub(crate) fn image_signature(signature: u16) -> Self {
        Self::Image(format!("bad file signature 0x{signature:04X}, expected \"BM\""))
    }

    pub(crate) fn atlas_size(width: usize, height: usize) -> Self {
        Self::Image(format!(
            "expected a {}x{} atlas, got {width}x{height}",
            GlyphTable::ATLAS_WIDTH,
            GlyphTable::ATLAS_HEIGHT,
        ))
    }

    pub(crate) fn image_unsupported(detail: &str) -> Self {
        Self::Image(format!("unsupported bitmap layout: {detail}"))
    }
}
