use std::{fmt::Write, path::PathBuf};

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use colored::Colorize;
use quickfont_data::{BitmapImage, GlyphCell, GlyphTable, PRINTABLE_ASCII, Rect, Rgba, TextLayout};

const CELLS_PER_ROW: usize = 16;

#[derive(Parser, Debug)]
#[command(
    name = "verify-atlas",
    about = "Previews a generated quickfont atlas bitmap in the terminal"
)]
struct Args {
    /// Atlas bitmap to inspect
    #[arg(default_value = "quickfont.bmp", value_name = "PATH")]
    atlas: PathBuf,

    /// Lay out this text with the decoded glyphs and draw the resulting rectangles
    #[arg(short, long)]
    text: Option<String>,

    /// Scale factor passed to the text layout
    #[arg(short, long, default_value_t = 1)]
    scale: i32,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let bytes = std::fs::read(&args.atlas)
        .wrap_err_with(|| format!("Failed to read atlas: {}", args.atlas.display()))?;
    let image = BitmapImage::decode(&bytes)
        .wrap_err_with(|| format!("Failed to decode atlas: {}", args.atlas.display()))?;

    println!("=== Glyph Atlas Viewer ===");
    println!(
        "Image: {}x{} ({} cells of {}x{})",
        image.width(),
        image.height(),
        GlyphTable::GLYPH_COUNT,
        GlyphCell::WIDTH,
        GlyphCell::HEIGHT
    );

    let table = GlyphTable::from_atlas(&image)?;

    let symbols: Vec<char> = PRINTABLE_ASCII.collect();
    for (row, chunk) in symbols.chunks(CELLS_PER_ROW).enumerate() {
        let first = row * CELLS_PER_ROW;
        println!("\n  Cells {}-{}", first, first + chunk.len() - 1);
        print!("{}", render_cells(&image, first, chunk));
    }

    if let Some(text) = &args.text {
        let mut layout = TextLayout::new(&table);
        let (rects, bounds) = layout.layout_with_bounds(0, 0, args.scale, text);
        println!(
            "\n=== Layout: {} rects, bounding box {}x{} ===",
            rects.len(),
            bounds.w,
            bounds.h
        );
        print!("{}", render_rects(rects, bounds));
    }

    Ok(())
}

/// Half-block rendering of consecutive atlas cells, two pixel rows per line.
fn render_cells(image: &BitmapImage, first: usize, symbols: &[char]) -> String {
    let mut output = String::new();

    // column markers
    write!(&mut output, "   ").ok();
    for symbol in symbols {
        write!(&mut output, "{}", format!("{symbol:<width$}", width = GlyphCell::WIDTH).blue()).ok();
    }
    writeln!(&mut output).ok();

    for y in (0..image.height()).step_by(2) {
        write!(&mut output, "{}", format!("{y:2} ").blue()).ok();

        for cell in first..first + symbols.len() {
            for x in 0..GlyphCell::WIDTH {
                let px = cell * GlyphCell::WIDTH + x;
                let top = image.pixel(px, y).unwrap_or(Rgba::TRANSPARENT);
                let bottom = image.pixel(px, y + 1).unwrap_or(Rgba::TRANSPARENT);
                write_half_block(&mut output, top, bottom, x == 0);
            }
        }

        writeln!(&mut output).ok();
    }

    output
}

fn write_half_block(output: &mut String, top: Rgba, bottom: Rgba, cell_edge: bool) {
    match (top.is_lit(), bottom.is_lit()) {
        (true, true) => {
            let (r1, g1, b1) = rgb_components(top);
            let (r2, g2, b2) = rgb_components(bottom);
            write!(output, "{}", "▀".truecolor(r1, g1, b1).on_truecolor(r2, g2, b2)).ok();
        },
        (true, false) => {
            let (r, g, b) = rgb_components(top);
            write!(output, "{}", "▀".truecolor(r, g, b)).ok();
        },
        (false, true) => {
            let (r, g, b) = rgb_components(bottom);
            write!(output, "{}", "▄".truecolor(r, g, b)).ok();
        },
        (false, false) if cell_edge => {
            write!(output, "{}", "·".bright_black()).ok();
        },
        (false, false) => {
            output.push(' ');
        },
    }
}

/// Alpha-premultiplied colour; opaque atlases keep their colour as-is.
fn rgb_components(px: Rgba) -> (u8, u8, u8) {
    let a = u32::from(px.a);
    let scale = |c: u8| ((u32::from(c) * a) / 0xFF) as u8;
    (scale(px.r), scale(px.g), scale(px.b))
}

/// Draws the unit rectangles of a layout into a character grid, one cell per
/// rectangle pixel.
fn render_rects(rects: &[Rect], bounds: Rect) -> String {
    let width = usize::try_from(bounds.w).unwrap_or(0);
    let height = usize::try_from(bounds.h).unwrap_or(0);
    let mut grid = vec![vec![false; width]; height];

    for rect in rects {
        for dy in 0..rect.h {
            for dx in 0..rect.w {
                let x = usize::try_from(rect.x - bounds.x + dx).ok();
                let y = usize::try_from(rect.y - bounds.y + dy).ok();
                if let Some(slot) = y
                    .zip(x)
                    .and_then(|(y, x)| grid.get_mut(y).and_then(|row| row.get_mut(x)))
                {
                    *slot = true;
                }
            }
        }
    }

    let mut output = String::new();
    for row in &grid {
        let line: String = row.iter().map(|&on| if on { '█' } else { ' ' }).collect();
        writeln!(&mut output, "{}", line.trim_end()).ok();
    }
    output
}
