//! Core data structures for the quickfont bitmap font pipeline.
//!
//! A BDF font is folded into a [`GlyphTable`] of fixed-size [`GlyphCell`]s, one per
//! printable ASCII character. The table is read-only once built and is shared by every
//! exporter: the [`BitmapImage`] writer, the C header generators and the native
//! [`TextLayout`] routine.

mod bitmap;
mod error;
mod glyph;
mod layout;
mod table;

pub use bitmap::{BitmapImage, Rgba};
pub use error::Error;
pub use glyph::GlyphCell;
pub use layout::{Rect, TextLayout, atlas_uv};
pub use table::{GlyphTable, GlyphTableBuilder, PRINTABLE_ASCII};
