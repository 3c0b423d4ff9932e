use quickfont_data::{BitmapImage, GlyphCell, GlyphTable, Rgba};
use tracing::debug;

/// Pixel encoding of an atlas image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// White glyphs on an opaque black background.
    Opaque,
    /// White glyphs on a transparent background; alpha carries the glyph coverage.
    Alpha,
}

impl Variant {
    fn pixel(self, on: bool) -> Rgba {
        let v = if on { 0xFF } else { 0 };
        match self {
            Variant::Opaque => Rgba::new(v, v, v, 0xFF),
            Variant::Alpha => Rgba::new(v, v, v, v),
        }
    }
}

/// Both atlas images, rendered from the same glyph table.
#[derive(Debug)]
pub struct AtlasRasters {
    pub opaque: BitmapImage,
    pub alpha: BitmapImage,
}

impl AtlasRasters {
    pub fn render(table: &GlyphTable) -> Self {
        Self {
            opaque: rasterize(table, Variant::Opaque),
            alpha: rasterize(table, Variant::Alpha),
        }
    }
}

/// Lays the glyphs out left to right in codepoint order, one cell-wide band per glyph.
pub fn rasterize(table: &GlyphTable, variant: Variant) -> BitmapImage {
    let mut image = BitmapImage::new(GlyphTable::ATLAS_WIDTH, GlyphTable::ATLAS_HEIGHT);

    for (idx, (_, cell)) in table.iter().enumerate() {
        let band_x = idx * GlyphCell::WIDTH;
        for (y, row) in cell.rows().enumerate() {
            for (x, &on) in row.iter().enumerate() {
                image.set_pixel(band_x + x, y, variant.pixel(on));
            }
        }
    }

    debug!(
        variant = ?variant,
        width = image.width(),
        height = image.height(),
        "Rasterized glyph atlas"
    );

    image
}

#[cfg(test)]
mod tests {
    use quickfont_data::PRINTABLE_ASCII;

    use super::*;

    /// Every glyph lights the pixel at (idx % 6, idx % 11), `'A'` is fully lit.
    fn table() -> GlyphTable {
        let mut builder = GlyphTable::builder();
        for (idx, c) in PRINTABLE_ASCII.enumerate() {
            let mut cell = GlyphCell::empty();
            if c == 'A' {
                for y in 0..GlyphCell::HEIGHT {
                    for x in 0..GlyphCell::WIDTH {
                        cell.set(x, y, true);
                    }
                }
            } else {
                cell.set(idx % GlyphCell::WIDTH, idx % GlyphCell::HEIGHT, true);
            }
            builder.insert(c as u32, cell).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn atlas_dimensions() {
        let image = rasterize(&table(), Variant::Opaque);
        assert_eq!(image.width(), 95 * 6);
        assert_eq!(image.height(), 11);
    }

    #[test]
    fn opaque_variant_has_black_background() {
        let rasters = AtlasRasters::render(&table());

        // ' ' lights (0, 0), so (1, 0) is background
        assert_eq!(rasters.opaque.pixel(0, 0), Some(Rgba::WHITE));
        assert_eq!(rasters.opaque.pixel(1, 0), Some(Rgba::BLACK));
        assert!(rasters.opaque.pixels().iter().all(|px| px.a == 0xFF));
    }

    #[test]
    fn alpha_variant_is_transparent_where_off() {
        let rasters = AtlasRasters::render(&table());

        assert_eq!(rasters.alpha.pixel(0, 0), Some(Rgba::WHITE));
        assert_eq!(rasters.alpha.pixel(1, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn fully_lit_glyph_fills_its_band() {
        let rasters = AtlasRasters::render(&table());
        let band = GlyphTable::index_of('A' as u32).unwrap() * GlyphCell::WIDTH;

        for y in 0..GlyphCell::HEIGHT {
            for x in band..band + GlyphCell::WIDTH {
                assert_eq!(rasters.opaque.pixel(x, y), Some(Rgba::WHITE));
                assert_eq!(rasters.alpha.pixel(x, y), Some(Rgba::WHITE));
            }
        }
    }

    #[test]
    fn decoded_atlas_reproduces_the_table() {
        let table = table();
        for variant in [Variant::Opaque, Variant::Alpha] {
            let bytes = rasterize(&table, variant).encode();
            let image = BitmapImage::decode(&bytes).unwrap();

            assert_eq!(GlyphTable::from_atlas(&image).unwrap(), table);
        }
    }
}
