use std::fmt;

use crate::Error;

/// A fixed-size monochrome glyph bitmap.
///
/// Every cell is exactly [`GlyphCell::WIDTH`] x [`GlyphCell::HEIGHT`] pixels, stored
/// row-major, regardless of the bounding box the glyph was declared with in the source
/// font. Pixels outside the source bitmap stay off.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GlyphCell {
    pixels: [bool; GlyphCell::PIXEL_COUNT],
}

#[rustfmt::skip]
impl GlyphCell {
    /// Width of every cell in pixels.
    pub const WIDTH: usize       = 6;
    /// Height of every cell in pixels.
    pub const HEIGHT: usize      = 11;
    /// Number of pixels in a cell.
    pub const PIXEL_COUNT: usize = Self::WIDTH * Self::HEIGHT;

    /// Character used for unset pixels in ASCII-art renditions.
    pub const OFF: char = '.';
    /// Character used for set pixels in ASCII-art renditions.
    pub const ON: char  = '@';
}

impl GlyphCell {
    /// Creates a cell with every pixel off.
    #[must_use]
    pub const fn empty() -> Self {
        Self { pixels: [false; Self::PIXEL_COUNT] }
    }

    /// Parses a cell from ASCII art: one line per row, `.` for off and `@` for on.
    ///
    /// Blank lines and surrounding whitespace are ignored, so indented multi-line
    /// string literals can be used directly.
    ///
    /// # Errors
    /// Returns [`Error::Cell`] if the art is not exactly `WIDTH` x `HEIGHT` or contains
    /// characters other than `.` and `@`.
    pub fn from_ascii_art(art: &str) -> Result<Self, Error> {
        let rows: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();

        let widest = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        if rows.len() != Self::HEIGHT || rows.iter().any(|r| r.chars().count() != Self::WIDTH) {
            return Err(Error::cell_shape(rows.len(), widest));
        }

        let mut cell = Self::empty();
        for (y, row) in rows.iter().enumerate() {
            for (x, symbol) in row.chars().enumerate() {
                match symbol {
                    Self::OFF => {},
                    Self::ON => cell.set(x, y, true),
                    other => return Err(Error::cell_pixel(other)),
                }
            }
        }

        Ok(cell)
    }

    /// Returns true if `(x, y)` lies inside the cell.
    #[must_use]
    pub fn contains(x: i32, y: i32) -> bool {
        (0..Self::WIDTH as i32).contains(&x) && (0..Self::HEIGHT as i32).contains(&y)
    }

    /// Returns the pixel at `(x, y)`; coordinates outside the cell read as off.
    #[must_use]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < Self::WIDTH && y < Self::HEIGHT && self.pixels[y * Self::WIDTH + x]
    }

    /// Sets the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the cell.
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        assert!(
            x < Self::WIDTH && y < Self::HEIGHT,
            "pixel ({x}, {y}) outside of {}x{} cell",
            Self::WIDTH,
            Self::HEIGHT
        );
        self.pixels[y * Self::WIDTH + x] = on;
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        self.pixels.iter().copied()
    }

    /// The rows of the cell, top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[bool]> + '_ {
        self.pixels.chunks_exact(Self::WIDTH)
    }

    /// Number of pixels that are on.
    #[must_use]
    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&on| on).count()
    }

    /// The cell as a single packed line of `.` and `@`, row-major.
    #[must_use]
    pub fn to_packed_art(&self) -> String {
        self.pixels()
            .map(|on| if on { Self::ON } else { Self::OFF })
            .collect()
    }
}

impl Default for GlyphCell {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for GlyphCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GlyphCell {{")?;
        for row in self.rows() {
            let line: String = row
                .iter()
                .map(|&on| if on { Self::ON } else { Self::OFF })
                .collect();
            writeln!(f, "    {line}")?;
        }
        write!(f, "}}")
    }
}
