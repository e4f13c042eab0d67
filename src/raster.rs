//! Lines, rectangles and fills
//!
//! Horizontal runs are streamed a byte at a time. A run that starts or ends
//! inside a byte merges that byte with its current contents, so only the bits
//! under the run change. Vertical runs cross a byte boundary on every row and
//! fall back to one bit command per pixel.

use crate::color::Color;
use crate::driver::Lc7981;
use crate::error::Error;
use crate::interface::Transport;
use crate::pattern::{presets, Pattern};

/// Mask of `bits` set bits starting at bit `offset`
fn span_mask(offset: u8, bits: u8) -> u8 {
    (((1u16 << bits) - 1) << offset) as u8
}

impl<T> Lc7981<T>
where
    T: Transport,
{
    /// Replace the bits under `mask` in the byte at `address`, leaving the
    /// controller in write mode just past it
    fn merge_byte(&mut self, address: u16, value: u8, mask: u8) -> Result<(), Error> {
        self.set_cursor_address(address)?;
        let current = self.read_single_byte()?;
        self.set_cursor_address(address)?;
        self.write_start()?;
        self.write_next_byte((value & mask) | (current & !mask))
    }

    /// Draw a horizontal run of `length` pixels from `(x, y)`, using bit `x % 8`
    /// of `pattern` for every pixel `x`
    pub fn draw_horizontal_line(
        &mut self,
        x: u16,
        y: u16,
        length: u16,
        pattern: u8,
    ) -> Result<(), Error> {
        self.check_area(x, y, length, 1)?;
        if length == 0 {
            return Ok(());
        }

        let address = self.address_of(x, y);
        let offset = (x % 8) as u8;
        let mut remaining = length;

        if offset != 0 {
            let bits = remaining.min(u16::from(8 - offset)) as u8;
            self.merge_byte(address, pattern, span_mask(offset, bits))?;
            remaining -= u16::from(bits);
        } else {
            self.set_cursor_address(address)?;
            self.write_start()?;
        }

        while remaining >= 8 {
            self.write_next_byte(pattern)?;
            remaining -= 8;
        }

        if remaining > 0 {
            let last = self.address_of(x + length - 1, y);
            self.merge_byte(last, pattern, span_mask(0, remaining as u8))?;
        }
        Ok(())
    }

    /// Draw a black horizontal run
    pub fn draw_black_horizontal_line(&mut self, x: u16, y: u16, length: u16) -> Result<(), Error> {
        self.draw_horizontal_line(x, y, length, Color::Black.fill_byte())
    }

    /// Draw a white horizontal run
    pub fn draw_white_horizontal_line(&mut self, x: u16, y: u16, length: u16) -> Result<(), Error> {
        self.draw_horizontal_line(x, y, length, Color::White.fill_byte())
    }

    /// Draw a vertical run of `length` pixels downwards from `(x, y)`
    pub fn draw_vertical_line(
        &mut self,
        x: u16,
        y: u16,
        length: u16,
        color: Color,
    ) -> Result<(), Error> {
        self.check_area(x, y, 1, length)?;
        let bit = (x % 8) as u8;
        for row in y..y + length {
            let address = self.address_of(x, row);
            self.set_cursor_address(address)?;
            self.set_data_bit_color(bit, color)?;
        }
        Ok(())
    }

    /// Draw a line between two points, both included
    pub fn draw_line(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    ) -> Result<(), Error> {
        self.check_point(x0, y0)?;
        self.check_point(x1, y1)?;
        if x0 > x1 {
            return self.draw_line(x1, y1, x0, y0, color);
        }

        let dx = x1 - x0;
        if y0 == y1 {
            return self.draw_horizontal_line(x0, y0, dx + 1, color.fill_byte());
        }
        if dx == 0 {
            return self.draw_vertical_line(x0, y0.min(y1), y0.abs_diff(y1) + 1, color);
        }

        let step_y = if y1 > y0 { 1 } else { -1 };
        self.trace_line(x0, y0, x1, y1, step_y, color)
    }

    /// Integer Bresenham for `x0 < x1`; `step_y` is +1 going down, -1 going up
    fn trace_line(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        step_y: i32,
        color: Color,
    ) -> Result<(), Error> {
        let dx = i32::from(x1 - x0);
        let dy = i32::from(y0.abs_diff(y1));
        let (end_x, end_y) = (i32::from(x1), i32::from(y1));
        let (mut x, mut y) = (i32::from(x0), i32::from(y0));
        let mut err = dx - dy;

        loop {
            self.set_pixel(x as u16, y as u16, color)?;
            if x == end_x && y == end_y {
                return Ok(());
            }
            let e2 = 2 * err;
            if -e2 <= dy {
                err -= dy;
                x += 1;
            }
            if e2 <= dx {
                err += dx;
                y += step_y;
            }
        }
    }

    /// Draw a black line
    pub fn draw_black_line(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), Error> {
        self.draw_line(x0, y0, x1, y1, Color::Black)
    }

    /// Draw a white line
    pub fn draw_white_line(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), Error> {
        self.draw_line(x0, y0, x1, y1, Color::White)
    }

    /// Draw the outline of a `w` x `h` rectangle with its top-left corner at `(x, y)`
    pub fn draw_rectangle(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        color: Color,
    ) -> Result<(), Error> {
        self.check_area(x, y, w, h)?;
        if w == 0 || h == 0 {
            return Ok(());
        }

        let byte = color.fill_byte();
        self.draw_horizontal_line(x, y, w, byte)?;
        if h > 1 {
            self.draw_horizontal_line(x, y + h - 1, w, byte)?;
        }
        // Sides skip the corners the horizontal lines already drew
        if h > 2 {
            self.draw_vertical_line(x, y + 1, h - 2, color)?;
            if w > 1 {
                self.draw_vertical_line(x + w - 1, y + 1, h - 2, color)?;
            }
        }
        Ok(())
    }

    /// Fill a `w` x `h` rectangle
    pub fn fill_rectangle(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        color: Color,
    ) -> Result<(), Error> {
        self.check_area(x, y, w, h)?;
        let byte = color.fill_byte();
        for row in y..y + h {
            self.draw_horizontal_line(x, row, w, byte)?;
        }
        Ok(())
    }

    /// Fill a rectangle with a pattern; row `i` uses pattern row `i & mask`
    pub fn fill_pattern(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        pattern: &Pattern<'_>,
    ) -> Result<(), Error> {
        self.check_area(x, y, w, h)?;
        for row in y..y + h {
            self.draw_horizontal_line(x, row, w, pattern.row(row))?;
        }
        Ok(())
    }

    /// Fill a rectangle with a 50% checkerboard
    pub fn fill_gray(&mut self, x: u16, y: u16, w: u16, h: u16) -> Result<(), Error> {
        self.fill_pattern(x, y, w, h, &presets::GRAY)
    }
}
