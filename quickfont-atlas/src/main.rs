mod bdf;
mod cli;
mod export;
mod logging;
mod pipeline;
mod raster;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use quickfont_data::{GlyphCell, GlyphTable};

use crate::{
    cli::Cli,
    logging::{LoggingConfig, init_logging},
    pipeline::OutputPaths,
};

fn main() -> Result<()> {
    // panic hook
    color_eyre::install()?;

    let logging_config = LoggingConfig::from_env();
    let _guard = init_logging(&logging_config).wrap_err("Failed to initialize logging")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "quickfont-atlas starting up"
    );

    let cli = Cli::parse();
    cli.validate()?;
    cli.print_summary();

    let table = pipeline::load_font(&cli.input)?;
    let paths = cli.output_paths();
    pipeline::generate(&table, &paths)?;

    report(&table, &paths);

    Ok(())
}

fn report(table: &GlyphTable, paths: &OutputPaths) {
    let lit = table.iter().filter(|(_, cell)| cell.lit_count() > 0).count();

    println!("\nGlyph atlas generated!");
    println!(
        "Glyph count: {} ({lit} with lit pixels)",
        GlyphTable::GLYPH_COUNT
    );
    println!("Cell size: {}x{}", GlyphCell::WIDTH, GlyphCell::HEIGHT);
    println!(
        "Atlas size: {}x{}",
        GlyphTable::ATLAS_WIDTH,
        GlyphTable::ATLAS_HEIGHT
    );
    println!("Files:");
    for path in paths.all() {
        println!("  {}", path.display());
    }
}
