//! [`embedded_graphics`] support
//!
//! Pixels go straight to display RAM with bit commands. Solid fills and clears
//! use the byte streaming paths instead. Out-of-range pixels are skipped, as
//! embedded-graphics expects from a draw target.
//!
//! The inherent [`Lc7981::clear`] takes a fill byte; call
//! `DrawTarget::clear(&mut display, color)` for the color version.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::color::Color;
use crate::driver::Lc7981;
use crate::error::Error;
use crate::interface::Transport;

impl<T> OriginDimensions for Lc7981<T> {
    fn size(&self) -> Size {
        Size::new(u32::from(self.width()), u32::from(self.height()))
    }
}

impl<T> DrawTarget for Lc7981<T>
where
    T: Transport,
{
    type Color = BinaryColor;
    type Error = Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if bounds.contains(point) {
                self.set_pixel(point.x as u16, point.y as u16, Color::from(color))?;
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if area.is_zero_sized() {
            return Ok(());
        }
        self.fill_rectangle(
            area.top_left.x as u16,
            area.top_left.y as u16,
            area.size.width as u16,
            area.size.height as u16,
            Color::from(color),
        )
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        Lc7981::clear(self, Color::from(color).fill_byte())
    }
}
