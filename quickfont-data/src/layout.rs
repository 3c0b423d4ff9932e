use crate::{GlyphCell, GlyphTable, PRINTABLE_ASCII};

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

/// Normalized `(x0, y0, x1, y1)` texture coordinates of `symbol` within the single-row
/// atlas. Characters outside printable ASCII map to the space glyph.
#[must_use]
pub fn atlas_uv(symbol: char) -> (f32, f32, f32, f32) {
    let idx = GlyphTable::index_of(symbol as u32).unwrap_or(0);
    let atlas_width = GlyphTable::ATLAS_WIDTH as f32;

    let x0 = (idx * GlyphCell::WIDTH) as f32 / atlas_width;
    let x1 = ((idx + 1) * GlyphCell::WIDTH) as f32 / atlas_width;
    (x0, 0.0, x1, 1.0)
}

/// Lays out text as a list of filled unit squares, one per lit glyph pixel.
///
/// The rectangle list lives in a scratch buffer owned by the layout. It is grown to the
/// worst case for the text being laid out (every pixel of every glyph lit) and reused
/// across calls, so repeated layouts of similar text do not allocate.
#[derive(Debug)]
pub struct TextLayout<'a> {
    table: &'a GlyphTable,
    rects: Vec<Rect>,
}

impl<'a> TextLayout<'a> {
    /// Creates a layout over the glyphs of `table`.
    #[must_use]
    pub fn new(table: &'a GlyphTable) -> Self {
        Self { table, rects: Vec::new() }
    }

    /// Lays out `text` with its top-left corner at `(x, y)`, each glyph pixel scaled to a
    /// `scale` x `scale` square; `scale` is clamped to at least 1.
    ///
    /// Every character advances the cursor by one cell width, `'\n'` returns to `x` and
    /// moves down one cell height, and characters outside printable ASCII render as a
    /// space.
    pub fn layout(&mut self, x: i32, y: i32, scale: i32, text: &str) -> &[Rect] {
        self.layout_with_bounds(x, y, scale, text).0
    }

    /// Returns the bounding box of `text` as laid out by [`TextLayout::layout`].
    ///
    /// The box starts at `(x, y)`; its width is the furthest horizontal advance of any
    /// line and its height is one cell height per line.
    pub fn bounding_box(&mut self, x: i32, y: i32, scale: i32, text: &str) -> Rect {
        self.layout_with_bounds(x, y, scale, text).1
    }

    /// Lays out `text` and computes its bounding box in one pass.
    pub fn layout_with_bounds(
        &mut self,
        x: i32,
        y: i32,
        scale: i32,
        text: &str,
    ) -> (&[Rect], Rect) {
        let scale = scale.max(1);
        let advance_x = GlyphCell::WIDTH as i32 * scale;
        let advance_y = GlyphCell::HEIGHT as i32 * scale;

        let mut bounds = Rect::new(x, y, 0, 0);
        let (mut at_x, mut at_y) = (x, y);

        self.rects.clear();
        self.rects.reserve(text.len() * GlyphCell::PIXEL_COUNT);

        for (i, ch) in text.chars().enumerate() {
            if i == 0 {
                bounds.h = advance_y;
            }

            if ch == '\n' {
                at_x = x;
                at_y += advance_y;
                bounds.h += advance_y;
                continue;
            }

            let symbol = if PRINTABLE_ASCII.contains(&ch) { ch } else { ' ' };
            if let Some(cell) = self.table.get(symbol) {
                for (gy, row) in cell.rows().enumerate() {
                    let lit = row.iter().enumerate().filter(|(_, on)| **on);
                    for (gx, _) in lit {
                        self.rects.push(Rect::new(
                            at_x + gx as i32 * scale,
                            at_y + gy as i32 * scale,
                            scale,
                            scale,
                        ));
                    }
                }
            }

            at_x += advance_x;
            bounds.w = bounds.w.max(at_x - x);
        }

        (&self.rects, bounds)
    }

    /// Current capacity of the scratch buffer, in rectangles.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.rects.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A table where every glyph is empty except `'#'` (fully lit) and `'.'`
    /// (a single pixel at the top-left corner).
    fn table() -> GlyphTable {
        let mut builder = GlyphTable::builder();
        for c in PRINTABLE_ASCII {
            let mut cell = GlyphCell::empty();
            match c {
                '#' => (0..GlyphCell::HEIGHT)
                    .for_each(|y| (0..GlyphCell::WIDTH).for_each(|x| cell.set(x, y, true))),
                '.' => cell.set(0, 0, true),
                _ => {},
            }
            builder.insert(c as u32, cell).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn single_pixel_glyph() {
        let table = table();
        let mut layout = TextLayout::new(&table);

        assert_eq!(layout.layout(10, 20, 1, "."), &[Rect::new(10, 20, 1, 1)]);
        assert_eq!(layout.layout(10, 20, 3, ".."), &[
            Rect::new(10, 20, 3, 3),
            Rect::new(10 + 6 * 3, 20, 3, 3),
        ]);
    }

    #[test]
    fn fully_lit_glyph_emits_every_pixel() {
        let table = table();
        let mut layout = TextLayout::new(&table);

        let rects = layout.layout(0, 0, 2, "#");
        assert_eq!(rects.len(), GlyphCell::PIXEL_COUNT);
        assert!(rects.iter().all(|r| r.w == 2 && r.h == 2));
        assert_eq!(rects.last(), Some(&Rect::new(10, 20, 2, 2)));
    }

    #[test]
    fn newline_resets_x_and_advances_y() {
        let table = table();
        let mut layout = TextLayout::new(&table);

        let rects = layout.layout(5, 5, 1, ".\n .");
        assert_eq!(rects, &[Rect::new(5, 5, 1, 1), Rect::new(5 + 6, 5 + 11, 1, 1)]);
    }

    #[test]
    fn scale_is_clamped_to_one() {
        let table = table();
        let mut layout = TextLayout::new(&table);

        assert_eq!(layout.layout(0, 0, 0, "."), &[Rect::new(0, 0, 1, 1)]);
        assert_eq!(layout.layout(0, 0, -4, "."), &[Rect::new(0, 0, 1, 1)]);
    }

    #[test]
    fn non_printable_characters_render_as_space() {
        let table = table();
        let mut layout = TextLayout::new(&table);

        // '\t' and 'é' both advance like a space and emit nothing
        let rects = layout.layout(0, 0, 1, "\té.");
        assert_eq!(rects, &[Rect::new(12, 0, 1, 1)]);
    }

    #[test]
    fn bounding_box_tracks_widest_line() {
        let table = table();
        let mut layout = TextLayout::new(&table);

        assert_eq!(layout.bounding_box(3, 4, 1, ""), Rect::new(3, 4, 0, 0));
        assert_eq!(layout.bounding_box(3, 4, 1, "abc"), Rect::new(3, 4, 18, 11));
        assert_eq!(layout.bounding_box(3, 4, 2, "a\nabcd\nab"), Rect::new(3, 4, 48, 66));
        assert_eq!(layout.bounding_box(0, 0, 1, "a\n"), Rect::new(0, 0, 6, 22));
    }

    #[test]
    fn repeated_layouts_are_identical_and_reuse_the_buffer() {
        let table = table();
        let mut layout = TextLayout::new(&table);

        let first = layout.layout(1, 2, 2, "#.#\n.#").to_vec();
        let capacity = layout.capacity();
        assert!(capacity >= 5 * GlyphCell::PIXEL_COUNT);

        let second = layout.layout(1, 2, 2, "#.#\n.#").to_vec();
        assert_eq!(first, second);
        assert_eq!(layout.capacity(), capacity);

        // shorter text fits in the existing allocation
        layout.layout(0, 0, 1, "#");
        assert_eq!(layout.capacity(), capacity);
    }

    #[test]
    fn uv_rectangles_span_one_cell() {
        let (x0, y0, x1, y1) = atlas_uv(' ');
        assert_eq!((x0, y0, y1), (0.0, 0.0, 1.0));
        assert!((x1 - 6.0 / 570.0).abs() < f32::EPSILON);

        let (x0, _, x1, _) = atlas_uv('~');
        assert!((x0 - 564.0 / 570.0).abs() < f32::EPSILON);
        assert!((x1 - 1.0).abs() < f32::EPSILON);

        assert_eq!(atlas_uv('\u{7F}'), atlas_uv(' '));
    }
}
