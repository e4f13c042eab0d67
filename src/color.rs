//! Pixel colors
//!
//! The panel is monochrome. A set bit in display RAM is a dark (black) pixel.

use embedded_graphics::pixelcolor::BinaryColor;

/// Color of a single pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Cleared bit
    #[default]
    White,
    /// Set bit
    Black,
}

impl Color {
    /// Byte with every pixel in this color
    pub fn fill_byte(self) -> u8 {
        match self {
            Color::White => 0x00,
            Color::Black => 0xFF,
        }
    }

    /// The other color
    pub fn inverse(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Whether the RAM bit is set for this color
    pub fn is_set(self) -> bool {
        self == Color::Black
    }
}

impl From<bool> for Color {
    fn from(black: bool) -> Self {
        if black {
            Color::Black
        } else {
            Color::White
        }
    }
}

impl From<BinaryColor> for Color {
    fn from(color: BinaryColor) -> Self {
        match color {
            BinaryColor::On => Color::Black,
            BinaryColor::Off => Color::White,
        }
    }
}

impl From<Color> for BinaryColor {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => BinaryColor::On,
            Color::White => BinaryColor::Off,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_bytes() {
        assert_eq!(Color::Black.fill_byte(), 0xFF);
        assert_eq!(Color::White.fill_byte(), 0x00);
        assert_eq!(Color::Black.inverse(), Color::White);
        assert!(Color::Black.is_set());
        assert!(!Color::White.is_set());
    }

    #[test]
    fn binary_color_maps_on_to_black() {
        assert_eq!(Color::from(BinaryColor::On), Color::Black);
        assert_eq!(BinaryColor::from(Color::White), BinaryColor::Off);
        assert_eq!(Color::from(true), Color::Black);
    }
}
