//! The SDL2 rectangle-lookup header.
//!
//! Glyphs are stored as `.`/`@` strings and drawn as one filled rectangle per lit
//! pixel, so the header has no dependency on textures or surfaces beyond what
//! `SDL_RenderFillRects` and `SDL_FillRects` need.

use std::io::{self, Write};

use quickfont_data::GlyphTable;

use super::{write_include_guard_open, write_size_defines};

const GUARD: &str = "INCLUDE_QUICKFONT_SDL2_H_";
const PREFIX: &str = "QFSDL2";

/// Lays out `text` into unit rectangles; mirrors [`quickfont_data::TextLayout`].
///
/// The rectangle buffer lives in function-local statics and only grows. Works on
/// bytes: every byte outside `' '..='~'` other than `'\n'` is drawn as a space.
const LAYOUT_ROUTINE: &str = r#"static SDL_Rect *qfsdl2__get_text_rects(int x, int y, int scale, const char *text, int *num, SDL_Rect *bb) {
    if (scale < 1) {
        scale = 1;
    }

    int at_x = x;
    int at_y = y;

    if (bb) {
        bb->x = x;
        bb->y = y;
        bb->w = 0;
        bb->h = 0;
    }

    int text_len = (int)SDL_strlen(text);

    /* grows to the largest text seen so far; never shrinks */
    static int capacity = 0;
    static SDL_Rect *rects = 0;

    int worst_case = text_len * QFSDL2_GLYPH_WIDTH * QFSDL2_GLYPH_HEIGHT;
    if (capacity < worst_case) {
        SDL_free(rects);
        rects = (SDL_Rect *)SDL_malloc(sizeof(SDL_Rect) * worst_case);
        capacity = worst_case;
    }

    int num_rects = 0;

    for (int i = 0; i < text_len; ++i) {
        unsigned char c = (unsigned char)text[i];

        if (i == 0 && bb) {
            bb->h = QFSDL2_GLYPH_HEIGHT * scale;
        }

        if (c == '\n') {
            int adv = QFSDL2_GLYPH_HEIGHT * scale;
            at_x = x;
            at_y += adv;
            if (bb) {
                bb->h += adv;
            }
            continue;
        }

        if (c < ' ' || c > '~') {
            c = ' ';
        }

        const char *glyph = qfsdl2__data[c - ' '];
        for (int gy = 0; gy < QFSDL2_GLYPH_HEIGHT; ++gy) {
            for (int gx = 0; gx < QFSDL2_GLYPH_WIDTH; ++gx) {
                if (glyph[gy * QFSDL2_GLYPH_WIDTH + gx] == '@') {
                    SDL_Rect rect;
                    rect.x = at_x + gx * scale;
                    rect.y = at_y + gy * scale;
                    rect.w = scale;
                    rect.h = scale;
                    rects[num_rects++] = rect;
                }
            }
        }

        at_x += QFSDL2_GLYPH_WIDTH * scale;
        if (bb && (at_x - x) > bb->w) {
            bb->w = at_x - x;
        }
    }

    *num = num_rects;
    return rects;
}

static void qfsdl2_render_text(SDL_Renderer *renderer, const char *text, int x, int y, int scale) {
    int num_rects = 0;
    SDL_Rect *rects = qfsdl2__get_text_rects(x, y, scale, text, &num_rects, 0);
    SDL_RenderFillRects(renderer, rects, num_rects);
}

static void qfsdl2_surface_render_text(SDL_Surface *surface, const char *text, int x, int y, int scale, Uint32 color) {
    int num_rects = 0;
    SDL_Rect *rects = qfsdl2__get_text_rects(x, y, scale, text, &num_rects, 0);
    SDL_FillRects(surface, rects, num_rects, color);
}

static SDL_Rect qfsdl2_get_text_bounding_box(const char *text, int x, int y, int scale) {
    SDL_Rect bb = {0};
    int num_rects = 0;
    qfsdl2__get_text_rects(x, y, scale, text, &num_rects, &bb);
    return bb;
}
"#;

/// Writes `quickfont_sdl2.h`.
pub fn write<W: Write>(table: &GlyphTable, mut out: W) -> io::Result<()> {
    write_include_guard_open(&mut out, GUARD)?;
    write_size_defines(&mut out, PREFIX)?;

    writeln!(
        out,
        "static const char qfsdl2__data[{PREFIX}_NUM_GLYPHS][{PREFIX}_GLYPH_WIDTH*{PREFIX}_GLYPH_HEIGHT + 1] = {{"
    )?;
    for (_, cell) in table {
        writeln!(out, "    {{\"{}\"}},", cell.to_packed_art())?;
    }
    writeln!(out, "}};")?;
    writeln!(out)?;

    out.write_all(LAYOUT_ROUTINE.as_bytes())?;
    writeln!(out)?;
    writeln!(out, "#endif")
}
