//! BDF glyph parser.
//!
//! Only the records needed to rebuild printable ASCII glyphs are interpreted:
//! `STARTCHAR`/`ENDCHAR` blocks with their `ENCODING`, `BBX` and `BITMAP` records, and
//! the terminating `ENDFONT`. Everything else is skipped. Each glyph is repositioned
//! into a fixed [`GlyphCell`] relative to a shared baseline anchor, see [`place`].

use std::io::BufRead;

use quickfont_data::{GlyphCell, GlyphTable, GlyphTableBuilder};
use tracing::{debug, info, trace};

/// Lines longer than this are rejected as malformed.
const MAX_LINE_LEN: usize = 512;

/// Largest `BBX` width or height accepted; a bitmap row can never hold more bits.
const MAX_GLYPH_EXTENT: i32 = (MAX_LINE_LEN * 4) as i32;

/// Baseline anchor of the output cell: where a glyph's origin lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub x: i32,
    pub y: i32,
}

impl Origin {
    /// Anchor for tewi-medium-11: baseline on row 9, leaving two rows for descenders.
    pub const TEWI: Origin = Origin { x: 0, y: 9 };
}

impl Default for Origin {
    fn default() -> Self {
        Self::TEWI
    }
}

/// A glyph's `BBX` record: bitmap size and offset from the glyph origin, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub width: i32,
    pub height: i32,
    pub x_offset: i32,
    pub y_offset: i32,
}

/// Maps bitmap pixel `(x, y)` of a glyph, counted from the top-left of its own bitmap,
/// to cell coordinates. `None` if the coordinates do not fit in an `i32`.
pub fn place(origin: Origin, bbx: BoundingBox, x: i32, y: i32) -> Option<(i32, i32)> {
    let cell_x = origin.x.checked_add(x)?.checked_add(bbx.x_offset)?;
    let top = bbx.y_offset.checked_add(bbx.height)?;
    let cell_y = origin.y.checked_sub(top)?.checked_add(y)?;
    Some((cell_x, cell_y))
}

#[derive(thiserror::Error, Debug)]
pub enum BdfError {
    /// The font could not be read.
    #[error("failed to read font: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be parsed.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// A glyph block is structurally valid but cannot be placed in the table.
    #[error("line {line}: glyph {name:?}: {message}")]
    Glyph {
        line: usize,
        name: String,
        message: String,
    },

    /// The input ended in the middle of the font.
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// The parsed glyphs do not form a complete table.
    #[error(transparent)]
    Table(#[from] quickfont_data::Error),
}

/// The kinds of line the parser distinguishes outside of bitmap data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Record<'a> {
    StartChar(&'a str),
    Encoding(i32),
    Bbx(BoundingBox),
    Bitmap,
    EndChar,
    EndFont,
    Comment,
    Other(&'a str),
}

impl<'a> Record<'a> {
    fn parse(line: &'a str) -> Result<Self, String> {
        let (keyword, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(k, r)| (k, r.trim()));

        let record = match keyword {
            "STARTCHAR" => Record::StartChar(rest),
            "ENCODING" => {
                // a second, font-specific encoding may follow the standard one
                let encoding = rest
                    .split_whitespace()
                    .next()
                    .ok_or_else(|| "ENCODING without a value".to_string())?;
                Record::Encoding(parse_int("ENCODING", encoding)?)
            },
            "BBX" => Record::Bbx(parse_bbx(rest)?),
            "BITMAP" => Record::Bitmap,
            "ENDCHAR" => Record::EndChar,
            "ENDFONT" => Record::EndFont,
            "COMMENT" => Record::Comment,
            _ => Record::Other(keyword),
        };

        Ok(record)
    }
}

/// Integers as C's `%i` reads them: decimal, `0x` hexadecimal or `0` octal, with an
/// optional sign.
fn parse_int(field: &str, s: &str) -> Result<i32, String> {
    let malformed = || format!("malformed {field} value {s:?}");

    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };

    // from_str_radix would accept a second sign
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(malformed());
    }

    let magnitude = i64::from_str_radix(digits, radix).map_err(|_| malformed())?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).map_err(|_| malformed())
}

fn parse_bbx(rest: &str) -> Result<BoundingBox, String> {
    let values = rest
        .split_whitespace()
        .map(|v| parse_int("BBX", v))
        .collect::<Result<Vec<_>, _>>()?;

    let [width, height, x_offset, y_offset] = values[..] else {
        return Err(format!("BBX expects 4 values, got {}", values.len()));
    };
    if width < 0 || height < 0 {
        return Err(format!("BBX with negative size {width}x{height}"));
    }
    if width > MAX_GLYPH_EXTENT || height > MAX_GLYPH_EXTENT {
        return Err(format!(
            "BBX size {width}x{height} exceeds the {MAX_GLYPH_EXTENT}x{MAX_GLYPH_EXTENT} limit"
        ));
    }

    Ok(BoundingBox { width, height, x_offset, y_offset })
}

/// Expands a line of hex digits to bits, most significant bit of each digit first.
fn hex_to_bits(line: &str) -> Result<Vec<bool>, String> {
    let mut bits = Vec::with_capacity(line.len() * 4);
    for c in line.chars() {
        let nibble = c
            .to_digit(16)
            .ok_or_else(|| format!("not a hex digit: {c:?}"))?;
        bits.extend((0..4).rev().map(|bit| nibble & (1 << bit) != 0));
    }

    Ok(bits)
}

#[derive(Debug)]
struct BitmapRow {
    line: usize,
    bits: Vec<bool>,
}

/// A glyph block as read from the font, before it is folded into a cell.
#[derive(Debug)]
struct GlyphDefinition {
    name: String,
    line: usize,
    encoding: Option<i32>,
    bbx: Option<BoundingBox>,
    rows: Option<Vec<BitmapRow>>,
}

impl GlyphDefinition {
    fn new(name: &str, line: usize) -> Self {
        Self {
            name: name.to_string(),
            line,
            encoding: None,
            bbx: None,
            rows: None,
        }
    }

    fn error(&self, line: usize, message: impl Into<String>) -> BdfError {
        BdfError::Glyph {
            line,
            name: self.name.clone(),
            message: message.into(),
        }
    }

    /// Folds the definition into a cell. Returns `None` for glyphs outside printable
    /// ASCII, which are validated structurally but never placed.
    fn into_cell(self, origin: Origin) -> Result<Option<(u32, GlyphCell)>, BdfError> {
        let (Some(encoding), Some(bbx), Some(rows)) = (self.encoding, self.bbx, &self.rows) else {
            return Err(self.error(self.line, "glyph did not contain ENCODING, BBX or BITMAP"));
        };

        let Some(codepoint) = u32::try_from(encoding)
            .ok()
            .filter(|&cp| GlyphTable::index_of(cp).is_some())
        else {
            trace!(name = %self.name, encoding, "Skipping glyph outside printable ASCII");
            return Ok(None);
        };

        let mut cell = GlyphCell::empty();
        for (y, row) in (0..).zip(rows) {
            if row.bits.len() < bbx.width as usize {
                return Err(self.error(row.line, "bitmap row too small"));
            }

            for (x, &on) in (0..bbx.width).zip(&row.bits) {
                let outside = |at: String| {
                    self.error(
                        row.line,
                        format!(
                            "pixel ({x}, {y}) lands at {at}, outside the {}x{} cell",
                            GlyphCell::WIDTH,
                            GlyphCell::HEIGHT
                        ),
                    )
                };

                let Some((cell_x, cell_y)) = place(origin, bbx, x, y) else {
                    return Err(outside("an unrepresentable position".to_string()));
                };
                if !GlyphCell::contains(cell_x, cell_y) {
                    return Err(outside(format!("({cell_x}, {cell_y})")));
                }
                cell.set(cell_x as usize, cell_y as usize, on);
            }
        }

        debug!(
            name = %self.name,
            codepoint,
            bbx = ?bbx,
            lit_pixels = cell.lit_count(),
            "Parsed glyph"
        );

        Ok(Some((codepoint, cell)))
    }
}

/// Parser states; each line read moves the parser from one state to the next.
#[derive(Debug)]
enum State {
    /// Outside any glyph block.
    Idle,
    /// Inside a `STARTCHAR` block, before `BITMAP`.
    Glyph(GlyphDefinition),
    /// Reading bitmap rows; `remaining` rows are still expected.
    Bitmap { glyph: GlyphDefinition, remaining: usize },
    /// All bitmap rows read; the next line must be `ENDCHAR`.
    EndChar(GlyphDefinition),
}

/// Line-oriented BDF reader producing a [`GlyphTable`].
pub struct BdfParser<R> {
    reader: R,
    origin: Origin,
    line_no: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> BdfParser<R> {
    pub fn new(reader: R) -> Self {
        Self::with_origin(reader, Origin::default())
    }

    pub fn with_origin(reader: R, origin: Origin) -> Self {
        Self { reader, origin, line_no: 0, buf: Vec::with_capacity(MAX_LINE_LEN) }
    }

    /// Parses the font until `ENDFONT`, or until every printable glyph has been found.
    ///
    /// # Errors
    /// Any I/O failure, malformed record, misplaced glyph, duplicate or missing glyph
    /// aborts parsing; there is no partial result.
    pub fn parse(mut self) -> Result<GlyphTable, BdfError> {
        let mut table = GlyphTable::builder();
        let mut state = State::Idle;

        while !table.is_complete() {
            let Some(line) = self.next_line()? else {
                return Err(match state {
                    State::Idle => BdfError::UnexpectedEof("missing ENDFONT".to_string()),
                    State::Glyph(g) | State::Bitmap { glyph: g, .. } | State::EndChar(g) => {
                        BdfError::UnexpectedEof(format!(
                            "glyph {:?} starting on line {} is missing ENDCHAR",
                            g.name, g.line
                        ))
                    },
                });
            };

            state = match self.advance(state, &line, &mut table)? {
                Some(next) => next,
                None => break,
            };
        }

        if table.is_complete() {
            debug!(line = self.line_no, "All printable glyphs found, stopping early");
        }

        let table = table.build()?;
        info!(
            glyph_count = GlyphTable::GLYPH_COUNT,
            lines_read = self.line_no,
            "Parsed BDF font"
        );

        Ok(table)
    }

    /// Consumes one line. Returns the next state, or `None` once `ENDFONT` is reached.
    fn advance(
        &self,
        state: State,
        line: &str,
        table: &mut GlyphTableBuilder,
    ) -> Result<Option<State>, BdfError> {
        let next = match state {
            State::Bitmap { mut glyph, remaining } => {
                let bits = hex_to_bits(line.trim()).map_err(|m| self.syntax(m))?;
                let rows = glyph.rows.get_or_insert_with(Vec::new);
                rows.push(BitmapRow { line: self.line_no, bits });

                if remaining > 1 {
                    State::Bitmap { glyph, remaining: remaining - 1 }
                } else {
                    State::EndChar(glyph)
                }
            },

            State::EndChar(glyph) => match Record::parse(line) {
                Ok(Record::EndChar) => {
                    self.finish_glyph(glyph, table)?;
                    State::Idle
                },
                _ => return Err(self.syntax("expected ENDCHAR")),
            },

            State::Idle => match self.record(line)? {
                Record::EndFont => return Ok(None),
                Record::StartChar(name) => {
                    trace!(line = self.line_no, name, "STARTCHAR");
                    State::Glyph(GlyphDefinition::new(name, self.line_no))
                },
                Record::EndChar => return Err(self.syntax("ENDCHAR outside of a glyph")),
                _ => State::Idle,
            },

            State::Glyph(mut glyph) => match self.record(line)? {
                Record::Encoding(encoding) => {
                    glyph.encoding = Some(encoding);
                    State::Glyph(glyph)
                },
                Record::Bbx(bbx) => {
                    glyph.bbx = Some(bbx);
                    State::Glyph(glyph)
                },
                Record::Bitmap => {
                    let bbx = glyph
                        .bbx
                        .ok_or_else(|| self.syntax("need BBX before BITMAP"))?;
                    glyph.rows = Some(Vec::new());

                    match bbx.height as usize {
                        0 => State::EndChar(glyph),
                        remaining => State::Bitmap { glyph, remaining },
                    }
                },
                Record::EndChar => {
                    self.finish_glyph(glyph, table)?;
                    State::Idle
                },
                Record::StartChar(_) | Record::EndFont => {
                    return Err(self.syntax(format!(
                        "glyph {:?} starting on line {} is missing ENDCHAR",
                        glyph.name, glyph.line
                    )));
                },
                Record::Comment | Record::Other(_) => State::Glyph(glyph),
            },
        };

        Ok(Some(next))
    }

    fn finish_glyph(
        &self,
        glyph: GlyphDefinition,
        table: &mut GlyphTableBuilder,
    ) -> Result<(), BdfError> {
        let (name, line) = (glyph.name.clone(), glyph.line);
        if let Some((codepoint, cell)) = glyph.into_cell(self.origin)? {
            table
                .insert(codepoint, cell)
                .map_err(|e| BdfError::Glyph { line, name, message: e.to_string() })?;
        }

        Ok(())
    }

    fn record<'l>(&self, line: &'l str) -> Result<Record<'l>, BdfError> {
        Record::parse(line).map_err(|m| self.syntax(m))
    }

    fn syntax(&self, message: impl Into<String>) -> BdfError {
        BdfError::Syntax { line: self.line_no, message: message.into() }
    }

    /// Reads the next line without its line terminator.
    fn next_line(&mut self) -> Result<Option<String>, BdfError> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;

        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if line.len() > MAX_LINE_LEN {
            return Err(self.syntax(format!(
                "line is {} bytes long, limit is {MAX_LINE_LEN}",
                line.len()
            )));
        }

        Ok(Some(line.to_string()))
    }
}

/// Parses a BDF font into a glyph table, anchoring glyphs at [`Origin::TEWI`].
///
/// # Errors
/// See [`BdfParser::parse`].
pub fn parse_font<R: BufRead>(reader: R) -> Result<GlyphTable, BdfError> {
    BdfParser::new(reader).parse()
}
