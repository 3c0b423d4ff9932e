use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result};
use quickfont_data::GlyphTable;
use tracing::info;

use crate::{
    bdf,
    export::{ascii_art, pixel_header, rect_header},
    raster::AtlasRasters,
};

/// Locations of the five generated files; the names themselves are fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub ascii_art: PathBuf,
    pub opaque_bitmap: PathBuf,
    pub alpha_bitmap: PathBuf,
    pub rect_header: PathBuf,
    pub pixel_header: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            ascii_art: dir.join("quickfont.txt"),
            opaque_bitmap: dir.join("quickfont.bmp"),
            alpha_bitmap: dir.join("quickfont_alpha.bmp"),
            rect_header: dir.join("quickfont_sdl2.h"),
            pixel_header: dir.join("quickfont.h"),
        }
    }

    /// In the order they are written.
    pub fn all(&self) -> [&Path; 5] {
        [
            &self.ascii_art,
            &self.opaque_bitmap,
            &self.alpha_bitmap,
            &self.rect_header,
            &self.pixel_header,
        ]
    }
}

/// Parses a BDF font into the printable-ASCII glyph table.
pub fn load_font(path: &Path) -> Result<GlyphTable> {
    let file = File::open(path)
        .wrap_err_with(|| format!("Failed to open font file: {}", path.display()))?;

    let table = bdf::parse_font(BufReader::new(file))
        .wrap_err_with(|| format!("Failed to parse font file: {}", path.display()))?;

    info!(
        path = %path.display(),
        glyph_count = GlyphTable::GLYPH_COUNT,
        "Loaded font"
    );

    Ok(table)
}

/// Writes every output, in order: ASCII art, opaque and alpha bitmaps, the SDL2
/// rectangle header and finally the pixel-array header.
///
/// The first failure aborts the run; files written before it are left in place.
pub fn generate(table: &GlyphTable, paths: &OutputPaths) -> Result<()> {
    for parent in paths.all().iter().filter_map(|path| path.parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    write_output(&paths.ascii_art, |out| ascii_art::write(table, out))?;

    let rasters = AtlasRasters::render(table);
    write_output(&paths.opaque_bitmap, |out| rasters.opaque.write_to(out))?;
    write_output(&paths.alpha_bitmap, |out| rasters.alpha.write_to(out))?;

    write_output(&paths.rect_header, |out| rect_header::write(table, out))?;
    write_output(&paths.pixel_header, |out| {
        pixel_header::write(table, &rasters.alpha, out)
    })?;

    Ok(())
}

fn write_output(
    path: &Path,
    emit: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("Failed to create output file: {}", path.display()))?;

    let mut out = BufWriter::new(file);
    emit(&mut out)
        .and_then(|()| out.flush())
        .wrap_err_with(|| format!("Failed to write output file: {}", path.display()))?;

    let bytes = out.get_ref().metadata().map(|m| m.len()).unwrap_or_default();
    info!(path = %path.display(), bytes, "Wrote output");

    Ok(())
}
