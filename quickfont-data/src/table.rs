use std::ops::RangeInclusive;

use crate::{BitmapImage, Error, GlyphCell, Rgba};

/// The printable ASCII range covered by every glyph table.
pub const PRINTABLE_ASCII: RangeInclusive<char> = ' '..='~';

/// One [`GlyphCell`] for every printable ASCII character, indexed by codepoint.
///
/// Tables are only obtainable through [`GlyphTableBuilder::build`], which guarantees
/// that every codepoint in [`PRINTABLE_ASCII`] is populated exactly once. The table is
/// read-only afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct GlyphTable {
    cells: Box<[GlyphCell]>,
}

impl GlyphTable {
    /// Number of glyphs in a table.
    pub const GLYPH_COUNT: usize =
        (*PRINTABLE_ASCII.end() as usize) - (*PRINTABLE_ASCII.start() as usize) + 1;

    /// Width of the single-row atlas holding every glyph side by side.
    pub const ATLAS_WIDTH: usize = Self::GLYPH_COUNT * GlyphCell::WIDTH;
    /// Height of the single-row atlas.
    pub const ATLAS_HEIGHT: usize = GlyphCell::HEIGHT;

    /// Starts building a new table.
    #[must_use]
    pub fn builder() -> GlyphTableBuilder {
        GlyphTableBuilder::default()
    }

    /// Returns the table index of `codepoint`, if it is printable ASCII.
    #[must_use]
    pub fn index_of(codepoint: u32) -> Option<usize> {
        let first = *PRINTABLE_ASCII.start() as u32;
        let last = *PRINTABLE_ASCII.end() as u32;
        (first..=last)
            .contains(&codepoint)
            .then(|| (codepoint - first) as usize)
    }

    /// Returns the cell for `symbol`, or `None` if it is not printable ASCII.
    #[must_use]
    pub fn get(&self, symbol: char) -> Option<&GlyphCell> {
        Self::index_of(symbol as u32).map(|idx| &self.cells[idx])
    }

    /// Recovers a table from a single-row atlas image, such as one decoded from a
    /// written bitmap. A pixel is on if any of its color channels is non-zero.
    ///
    /// # Errors
    /// Returns [`Error::Image`] if the image is not `ATLAS_WIDTH` x `ATLAS_HEIGHT`.
    pub fn from_atlas(image: &BitmapImage) -> Result<Self, Error> {
        if (image.width(), image.height()) != (Self::ATLAS_WIDTH, Self::ATLAS_HEIGHT) {
            return Err(Error::atlas_size(image.width(), image.height()));
        }

        let cells = (0..Self::GLYPH_COUNT)
            .map(|idx| {
                let mut cell = GlyphCell::empty();
                for y in 0..GlyphCell::HEIGHT {
                    for x in 0..GlyphCell::WIDTH {
                        let lit = image
                            .pixel(idx * GlyphCell::WIDTH + x, y)
                            .is_some_and(Rgba::is_lit);
                        cell.set(x, y, lit);
                    }
                }
                cell
            })
            .collect();

        Ok(Self { cells })
    }

    /// Iterates over `(symbol, cell)` pairs in codepoint order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (char, &GlyphCell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (symbol_at(idx), cell))
    }
}

impl<'a> IntoIterator for &'a GlyphTable {
    type Item = (char, &'a GlyphCell);
    type IntoIter = Box<dyn ExactSizeIterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl std::fmt::Debug for GlyphTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphTable")
            .field("glyph_count", &self.cells.len())
            .field("cell_size", &(GlyphCell::WIDTH, GlyphCell::HEIGHT))
            .field(
                "lit_pixels",
                &self.cells.iter().map(GlyphCell::lit_count).sum::<usize>(),
            )
            .finish()
    }
}

/// Collects glyph cells until every printable ASCII codepoint is present.
#[derive(Debug)]
pub struct GlyphTableBuilder {
    cells: Vec<Option<GlyphCell>>,
    filled: usize,
}

impl Default for GlyphTableBuilder {
    fn default() -> Self {
        Self {
            cells: vec![None; GlyphTable::GLYPH_COUNT],
            filled: 0,
        }
    }
}

impl GlyphTableBuilder {
    /// Adds the cell for `codepoint`.
    ///
    /// # Errors
    /// Fails if `codepoint` is not printable ASCII or already has a cell; existing
    /// cells are never overwritten.
    pub fn insert(&mut self, codepoint: u32, cell: GlyphCell) -> Result<(), Error> {
        let idx = GlyphTable::index_of(codepoint).ok_or_else(|| Error::not_printable(codepoint))?;

        let slot = &mut self.cells[idx];
        if slot.is_some() {
            return Err(Error::duplicate_glyph(symbol_at(idx)));
        }

        *slot = Some(cell);
        self.filled += 1;
        Ok(())
    }

    /// Number of codepoints populated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filled
    }

    /// Returns true if no cell has been added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Returns true once every printable codepoint is populated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.filled == GlyphTable::GLYPH_COUNT
    }

    /// Printable symbols that still lack a cell.
    pub fn missing(&self) -> impl Iterator<Item = char> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(idx, _)| symbol_at(idx))
    }

    /// Finishes the table.
    ///
    /// # Errors
    /// Fails if any printable codepoint is missing.
    pub fn build(self) -> Result<GlyphTable, Error> {
        if !self.is_complete() {
            let missing: Vec<char> = self.missing().collect();
            return Err(Error::missing_glyphs(&missing));
        }

        let cells = self.cells.into_iter().flatten().collect();
        Ok(GlyphTable { cells })
    }
}

fn symbol_at(idx: usize) -> char {
    char::from(*PRINTABLE_ASCII.start() as u8 + idx as u8)
}
