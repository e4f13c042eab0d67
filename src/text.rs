//! Bitmap fonts and the text blitter
//!
//! A font blob is a two byte header `[width, height]` followed by one block per
//! glyph, starting at `' '`. Glyph bits are LSB first, like display RAM.
//!
//! - narrow fonts (`width <= 8`) store one byte per glyph row, upper bits zero
//! - wide fonts pack `width * height` bits row after row with no row padding,
//!   rounded up to a whole byte per glyph
//!
//! Text is drawn one display row at a time. Glyph row bits are packed into an
//! accumulator and streamed out as whole bytes; the bytes at either end of the
//! run are merged with what is already on screen.

use crate::driver::Lc7981;
use crate::error::Error;
use crate::interface::Transport;

/// First character of every glyph table
const FIRST_CHAR: u32 = ' ' as u32;

/// Borrowed bitmap font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Font<'a> {
    width: u8,
    height: u8,
    data: &'a [u8],
}

impl<'a> Font<'a> {
    /// Font from its dimensions and the glyph table without header
    pub fn new(width: u8, height: u8, data: &'a [u8]) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidFont);
        }
        let font = Font {
            width,
            height,
            data,
        };
        let per_glyph = font.bytes_per_glyph();
        if data.len() < per_glyph || data.len() % per_glyph != 0 {
            return Err(Error::InvalidFont);
        }
        Ok(font)
    }

    /// Font from a blob with the `[width, height]` header
    pub fn from_blob(blob: &'a [u8]) -> Result<Self, Error> {
        match blob {
            [width, height, data @ ..] => Font::new(*width, *height, data),
            _ => Err(Error::InvalidFont),
        }
    }

    /// Glyph width in pixels
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Glyph height in pixels
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Whether rows are stored one byte each
    pub fn is_narrow(&self) -> bool {
        self.width <= 8
    }

    /// Size of one glyph block
    pub fn bytes_per_glyph(&self) -> usize {
        if self.is_narrow() {
            usize::from(self.height)
        } else {
            (usize::from(self.width) * usize::from(self.height) + 7) / 8
        }
    }

    /// Number of glyphs in the table
    pub fn glyph_count(&self) -> usize {
        self.data.len() / self.bytes_per_glyph()
    }

    /// Glyph block for a character
    pub fn glyph(&self, c: char) -> Result<&'a [u8], Error> {
        let index = (c as u32)
            .checked_sub(FIRST_CHAR)
            .map(|i| i as usize)
            .filter(|&i| i < self.glyph_count())
            .ok_or(Error::MissingGlyph(c))?;
        let per_glyph = self.bytes_per_glyph();
        Ok(&self.data[index * per_glyph..(index + 1) * per_glyph])
    }

    /// Width in pixels of a rendered string
    pub fn text_width(&self, text: &str) -> u32 {
        text.chars().count() as u32 * u32::from(self.width)
    }

    /// Bits of glyph row `row`, as `(bits, count)` chunks that never cross a
    /// source byte
    fn row_chunks<'g>(&self, glyph: &'g [u8], row: u8) -> RowChunks<'g> {
        let stride = if self.is_narrow() {
            8
        } else {
            usize::from(self.width)
        };
        RowChunks {
            glyph,
            bit: usize::from(row) * stride,
            remaining: self.width,
        }
    }
}

struct RowChunks<'g> {
    glyph: &'g [u8],
    bit: usize,
    remaining: u8,
}

impl Iterator for RowChunks<'_> {
    type Item = (u8, u8);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let shift = (self.bit % 8) as u8;
        let take = self.remaining.min(8 - shift);
        let bits = self.glyph[self.bit / 8] >> shift;
        self.bit += usize::from(take);
        self.remaining -= take;
        Some((bits, take))
    }
}

/// Packs variable length bit runs into whole bytes, LSB first
#[derive(Debug, Default)]
struct BitAccumulator {
    acc: u16,
    pending: u8,
}

impl BitAccumulator {
    /// Accumulator already holding the low `count` bits of `bits`
    fn seeded(bits: u8, count: u8) -> Self {
        let mut acc = BitAccumulator::default();
        acc.push(bits, count);
        acc
    }

    /// Append the low `count` bits (at most 8) of `bits`; returns a byte once
    /// eight are pending
    fn push(&mut self, bits: u8, count: u8) -> Option<u8> {
        let bits = u16::from(bits) & ((1u16 << count) - 1);
        self.acc |= bits << self.pending;
        self.pending += count;
        if self.pending >= 8 {
            let out = self.acc as u8;
            self.acc >>= 8;
            self.pending -= 8;
            Some(out)
        } else {
            None
        }
    }
}

impl<T> Lc7981<T>
where
    T: Transport,
{
    /// Draw a string with its top-left corner at `(x, y)`
    ///
    /// Glyphs are drawn opaque: both set and clear bits of the glyph box are
    /// written. Pixels outside the box keep their contents. Fails with
    /// [`Error::MissingGlyph`] before drawing anything if the font lacks a
    /// character.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, font: &Font<'_>) -> Result<(), Error> {
        for c in text.chars() {
            font.glyph(c)?;
        }
        let width = u16::try_from(font.text_width(text)).map_err(|_| Error::OutOfBounds)?;
        self.check_area(x, y, width, u16::from(font.height()))?;
        if text.is_empty() {
            return Ok(());
        }

        #[cfg(feature = "font-8x16")]
        if font.width() == 8 && font.height() == 16 {
            log::debug!("Drawing {:?} at ({}, {}) with the 8x16 path", text, x, y);
            return self.draw_text_8x16(x, y, text, font);
        }

        log::debug!(
            "Drawing {:?} at ({}, {}) with a {}x{} {} font",
            text,
            x,
            y,
            font.width(),
            font.height(),
            if font.is_narrow() { "narrow" } else { "wide" }
        );
        self.draw_text_packed(x, y, width, text, font)
    }

    /// Accumulator path for any glyph size
    fn draw_text_packed(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        text: &str,
        font: &Font<'_>,
    ) -> Result<(), Error> {
        let offset = (x % 8) as u8;
        for row in 0..font.height() {
            let start = self.address_of(x, y + u16::from(row));

            let mut acc = if offset != 0 {
                self.set_cursor_address(start)?;
                let background = self.read_single_byte()?;
                BitAccumulator::seeded(background, offset)
            } else {
                BitAccumulator::default()
            };

            self.set_cursor_address(start)?;
            self.write_start()?;
            for c in text.chars() {
                let glyph = font.glyph(c)?;
                for (bits, count) in font.row_chunks(glyph, row) {
                    if let Some(byte) = acc.push(bits, count) {
                        self.write_next_byte(byte)?;
                    }
                }
            }

            if acc.pending > 0 {
                let end = start + (u16::from(offset) + width) / 8;
                self.set_cursor_address(end)?;
                let background = self.read_single_byte()?;
                let byte = acc.acc as u8 | (background & (0xFF << acc.pending));
                self.set_cursor_address(end)?;
                self.write_single_byte(byte)?;
            }
        }
        Ok(())
    }

    /// Every glyph row is exactly one byte, so rows are shifted instead of packed
    #[cfg(feature = "font-8x16")]
    fn draw_text_8x16(&mut self, x: u16, y: u16, text: &str, font: &Font<'_>) -> Result<(), Error> {
        let shift = (x % 8) as u8;
        let mask = 0xFFu8 << shift;
        let len = text.chars().count() as u16;

        for row in 0..16u8 {
            let start = self.address_of(x, y + u16::from(row));
            let mut glyph_rows = text
                .chars()
                .map(|c| font.glyph(c).map(|glyph| glyph[usize::from(row)]));

            if shift == 0 {
                self.set_cursor_address(start)?;
                self.write_start()?;
                for bits in glyph_rows {
                    self.write_next_byte(bits?)?;
                }
                continue;
            }

            let Some(first) = glyph_rows.next() else {
                continue;
            };
            let mut prev = first?;

            self.set_cursor_address(start)?;
            let current = self.read_single_byte()?;
            self.set_cursor_address(start)?;
            self.write_start()?;
            self.write_next_byte((current & !mask) | (prev << shift))?;
            for next in glyph_rows {
                let next = next?;
                self.write_next_byte((prev >> (8 - shift)) | (next << shift))?;
                prev = next;
            }

            let end = start + len;
            self.set_cursor_address(end)?;
            let current = self.read_single_byte()?;
            self.set_cursor_address(end)?;
            self.write_single_byte((prev >> (8 - shift)) | (current & mask))?;
        }
        Ok(())
    }
}
