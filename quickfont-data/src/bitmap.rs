use std::io::{self, Write};

use crate::Error;

/// A 4-channel, 8 bits per channel pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 255 is fully opaque.
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 0xFF);
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(0xFF, 0xFF, 0xFF, 0xFF);

    /// Creates a pixel from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// The pixel as stored in a bitmap file: channel bytes R, G, B, A read as a
    /// little-endian 32-bit word.
    #[must_use]
    pub const fn to_le_u32(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    /// Returns true if any color channel is non-zero.
    #[must_use]
    pub const fn is_lit(self) -> bool {
        self.r != 0 || self.g != 0 || self.b != 0
    }
}

/// An in-memory 32 bits per pixel image, serialized as an uncompressed top-down bitmap.
///
/// The file layout is a 14 byte file header followed by a 56 byte info header declaring
/// `BI_BITFIELDS` compression with 8-8-8-8 channel masks (red in the lowest byte), and then
/// the raw pixel rows: no row padding, no compression. The height is stored negated so
/// rows run top to bottom.
#[derive(Clone, PartialEq, Eq)]
pub struct BitmapImage {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

#[rustfmt::skip]
impl BitmapImage {
    /// Size of the file header.
    pub const FILE_HEADER_SIZE: usize = 14;
    /// Size of the info header, including the channel masks.
    pub const INFO_HEADER_SIZE: usize = 56;
    /// Offset of the pixel data in every file written by [`BitmapImage::encode`].
    pub const HEADER_SIZE: usize      = Self::FILE_HEADER_SIZE + Self::INFO_HEADER_SIZE;

    const SIGNATURE: u16      = 0x4D42; // "BM"
    const BITS_PER_PIXEL: u16 = 32;
    const BI_BITFIELDS: u32   = 3;
    const RESOLUTION: i32     = 1024;

    const RED_MASK: u32       = 0x0000_00FF;
    const GREEN_MASK: u32     = 0x0000_FF00;
    const BLUE_MASK: u32      = 0x00FF_0000;
    const ALPHA_MASK: u32     = 0xFF00_0000;
}

impl BitmapImage {
    /// Creates a fully transparent image.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    /// Creates an image with every pixel set to `fill`.
    #[must_use]
    pub fn filled(width: usize, height: usize, fill: Rgba) -> Self {
        Self { width, height, pixels: vec![fill; width * height] }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// All pixels, row-major from the top-left corner.
    #[must_use]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Sets the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the image.
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: Rgba) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside of {}x{} image",
            self.width,
            self.height
        );
        self.pixels[y * self.width + x] = pixel;
    }

    /// Size in bytes of the pixel data.
    #[must_use]
    pub fn image_size(&self) -> usize {
        self.pixels.len() * 4
    }

    /// Serializes the image into bitmap file bytes.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::HEADER_SIZE + self.image_size());
        self.write_header(&mut bytes);
        for px in &self.pixels {
            bytes.extend_from_slice(&[px.r, px.g, px.b, px.a]);
        }

        bytes
    }

    /// Writes the encoded image to `writer`.
    ///
    /// # Errors
    /// Propagates any I/O error from `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.encode())?;
        writer.flush()
    }

    fn write_header(&self, out: &mut Vec<u8>) {
        let image_size = self.image_size() as u32;

        // file header
        out.extend_from_slice(&Self::SIGNATURE.to_le_bytes());
        out.extend_from_slice(&(Self::HEADER_SIZE as u32 + image_size).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // reserved
        out.extend_from_slice(&0u16.to_le_bytes()); // reserved
        out.extend_from_slice(&(Self::HEADER_SIZE as u32).to_le_bytes());

        // info header
        out.extend_from_slice(&(Self::INFO_HEADER_SIZE as u32).to_le_bytes());
        out.extend_from_slice(&(self.width as i32).to_le_bytes());
        out.extend_from_slice(&(-(self.height as i32)).to_le_bytes()); // top-down
        out.extend_from_slice(&1u16.to_le_bytes()); // color planes
        out.extend_from_slice(&Self::BITS_PER_PIXEL.to_le_bytes());
        out.extend_from_slice(&Self::BI_BITFIELDS.to_le_bytes());
        out.extend_from_slice(&image_size.to_le_bytes());
        out.extend_from_slice(&Self::RESOLUTION.to_le_bytes());
        out.extend_from_slice(&Self::RESOLUTION.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // colors used
        out.extend_from_slice(&0u32.to_le_bytes()); // important colors
        out.extend_from_slice(&Self::RED_MASK.to_le_bytes());
        out.extend_from_slice(&Self::GREEN_MASK.to_le_bytes());
        out.extend_from_slice(&Self::BLUE_MASK.to_le_bytes());
        out.extend_from_slice(&Self::ALPHA_MASK.to_le_bytes());
    }

    /// Decodes a 32 bits per pixel bitfield bitmap, such as those written by
    /// [`BitmapImage::encode`].
    ///
    /// The pixel data is located through the offset declared in the file header, and
    /// bottom-up images (positive height) are flipped into top-down order.
    ///
    /// # Errors
    /// Returns [`Error::Image`] if the bytes are truncated, lack the `BM` signature or use
    /// a pixel format other than 32 bit RGBA bitfields.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < Self::HEADER_SIZE {
            return Err(Error::image_truncated(Self::HEADER_SIZE, bytes.len()));
        }
        let header = HeaderReader { bytes };

        let signature = header.u16_at(0);
        if signature != Self::SIGNATURE {
            return Err(Error::image_signature(signature));
        }

        let pixel_offset = header.u32_at(10) as usize;
        let width = header.i32_at(18);
        let height = header.i32_at(22);
        let bits_per_pixel = header.u16_at(28);
        let compression = header.u32_at(30);

        if bits_per_pixel != Self::BITS_PER_PIXEL {
            return Err(Error::image_unsupported(&format!("{bits_per_pixel} bits per pixel")));
        }
        if compression != Self::BI_BITFIELDS {
            return Err(Error::image_unsupported(&format!("compression {compression}")));
        }
        let masks = [header.u32_at(54), header.u32_at(58), header.u32_at(62), header.u32_at(66)];
        if masks != [Self::RED_MASK, Self::GREEN_MASK, Self::BLUE_MASK, Self::ALPHA_MASK] {
            return Err(Error::image_unsupported(&format!("channel masks {masks:08X?}")));
        }
        if width < 0 {
            return Err(Error::image_unsupported(&format!("negative width {width}")));
        }

        let (w, h) = (width as usize, height.unsigned_abs() as usize);
        let expected = pixel_offset + w * h * 4;
        if bytes.len() < expected {
            return Err(Error::image_truncated(expected, bytes.len()));
        }

        let mut pixels: Vec<Rgba> = bytes[pixel_offset..expected]
            .chunks_exact(4)
            .map(|c| Rgba::new(c[0], c[1], c[2], c[3]))
            .collect();

        if height > 0 && w > 0 {
            pixels = pixels
                .chunks_exact(w)
                .rev()
                .flatten()
                .copied()
                .collect();
        }

        Ok(Self { width: w, height: h, pixels })
    }
}

impl std::fmt::Debug for BitmapImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitmapImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("image_size", &self.image_size())
            .finish()
    }
}

struct HeaderReader<'a> {
    bytes: &'a [u8],
}

impl HeaderReader<'_> {
    fn array<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.bytes[offset..offset + N]);
        buf
    }

    fn u16_at(&self, offset: usize) -> u16 {
        u16::from_le_bytes(self.array(offset))
    }

    fn u32_at(&self, offset: usize) -> u32 {
        u32::from_le_bytes(self.array(offset))
    }

    fn i32_at(&self, offset: usize) -> i32 {
        i32::from_le_bytes(self.array(offset))
    }
}
