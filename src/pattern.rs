//! Fill patterns
//!
//! A pattern is a short list of row bytes tiled vertically: display row `y`
//! is drawn with row `y & mask`. Every row byte is repeated across the whole
//! span of a line, so horizontal structure is limited to what fits in 8 pixels.
//! The row count has to be a power of two for the mask to tile cleanly.

use crate::error::Error;

/// Borrowed dithering pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern<'a> {
    rows: &'a [u8],
}

impl<'a> Pattern<'a> {
    /// Pattern from its row bytes
    pub fn new(rows: &'a [u8]) -> Result<Self, Error> {
        if rows.is_empty() || !rows.len().is_power_of_two() || rows.len() > 256 {
            log::warn!("Rejecting pattern with {} rows", rows.len());
            return Err(Error::InvalidPattern);
        }
        Ok(Pattern { rows })
    }

    /// Pattern from the blob layout: `row_count - 1` followed by the rows
    pub fn from_blob(blob: &'a [u8]) -> Result<Self, Error> {
        let (&mask, rows) = blob.split_first().ok_or(Error::InvalidPattern)?;
        let count = usize::from(mask) + 1;
        if rows.len() < count {
            return Err(Error::InvalidPattern);
        }
        Self::new(&rows[..count])
    }

    /// Number of rows before the pattern repeats
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Mask applied to the display row index
    pub fn mask(&self) -> u8 {
        (self.rows.len() - 1) as u8
    }

    /// Byte used on display row `y`
    pub fn row(&self, y: u16) -> u8 {
        self.rows[usize::from(y) & usize::from(self.mask())]
    }

    /// The row bytes
    pub fn rows(&self) -> &'a [u8] {
        self.rows
    }
}

/// Stock patterns
///
/// `GRAYSCALE_n` sets `n` of every 16 pixels. Solid white and black are better
/// drawn with the solid fills; their entries are here for completeness.
#[allow(missing_docs)]
pub mod presets {
    use super::Pattern;

    pub const GRAYSCALE_0: Pattern<'static> = Pattern { rows: &[0b0000_0000] };
    pub const GRAYSCALE_1: Pattern<'static> = Pattern {
        rows: &[0b0000_0000, 0b0100_0000, 0b0000_0000, 0b0000_0100],
    };
    pub const GRAYSCALE_2: Pattern<'static> = Pattern {
        rows: &[0b1000_1000, 0b0000_0000, 0b0010_0010, 0b0000_0000],
    };
    pub const GRAYSCALE_3: Pattern<'static> = Pattern {
        rows: &[0b1000_1000, 0b0000_0000, 0b1010_1010, 0b0000_0000],
    };
    pub const GRAYSCALE_4: Pattern<'static> = Pattern {
        rows: &[0b0000_0000, 0b0101_0101, 0b0000_0000, 0b1010_1010],
    };
    /// Honeycomb
    pub const GRAYSCALE_5: Pattern<'static> = Pattern {
        rows: &[0b0100_0100, 0b0011_1000, 0b0100_0100, 0b1000_0011],
    };
    pub const GRAYSCALE_6: Pattern<'static> = Pattern {
        rows: &[0b1000_1000, 0b0101_0101, 0b0010_0010, 0b0101_0101],
    };
    pub const GRAYSCALE_7: Pattern<'static> = Pattern {
        rows: &[0b1010_0010, 0b0101_0101, 0b0010_1010, 0b0101_0101],
    };
    pub const GRAYSCALE_8: Pattern<'static> = GRAY;
    pub const GRAYSCALE_9: Pattern<'static> = Pattern {
        rows: &[0b0101_1101, 0b1010_1010, 0b1101_0101, 0b1010_1010],
    };
    pub const GRAYSCALE_10: Pattern<'static> = Pattern {
        rows: &[0b0111_0111, 0b1010_1010, 0b1101_1101, 0b1010_1010],
    };
    /// Honeycomb
    pub const GRAYSCALE_11: Pattern<'static> = Pattern {
        rows: &[0b1011_1011, 0b1100_0111, 0b1011_1011, 0b0111_1100],
    };
    pub const GRAYSCALE_12: Pattern<'static> = Pattern {
        rows: &[0b1111_1111, 0b1010_1010, 0b1111_1111, 0b0101_0101],
    };
    pub const GRAYSCALE_13: Pattern<'static> = Pattern {
        rows: &[0b0111_0111, 0b1111_1111, 0b0101_0101, 0b1111_1111],
    };
    pub const GRAYSCALE_14: Pattern<'static> = Pattern {
        rows: &[0b0111_0111, 0b1111_1111, 0b1101_1101, 0b1111_1111],
    };
    pub const GRAYSCALE_15: Pattern<'static> = Pattern {
        rows: &[0b1111_1111, 0b1011_1111, 0b1111_1111, 0b1111_1011],
    };
    pub const GRAYSCALE_16: Pattern<'static> = Pattern { rows: &[0b1111_1111] };

    /// Checkerboard, half of the pixels set
    pub const GRAY: Pattern<'static> = Pattern {
        rows: &[0b0101_0101, 0b1010_1010],
    };
    pub const GRAY_BIG: Pattern<'static> = Pattern {
        rows: &[0b0011_0011, 0b0011_0011, 0b1100_1100, 0b1100_1100],
    };
    pub const GRAY_WIDE: Pattern<'static> = Pattern {
        rows: &[0b0011_0011, 0b1100_1100, 0b0011_0011, 0b1100_1100],
    };
    pub const GRAY_TALL: Pattern<'static> = Pattern {
        rows: &[0b0101_0101, 0b0101_0101, 0b1010_1010, 0b1010_1010],
    };

    pub const LINES_HORIZONTAL: Pattern<'static> = Pattern {
        rows: &[0b0000_0000, 0b1111_1111, 0b0000_0000, 0b1111_1111],
    };
    pub const LINES_VERTICAL: Pattern<'static> = Pattern { rows: &[0b0101_0101] };
    pub const LINES_HORIZONTAL_THICK: Pattern<'static> = Pattern {
        rows: &[0b0000_0000, 0b1111_1111, 0b1111_1111, 0b0000_0000],
    };
    pub const LINES_VERTICAL_THICK: Pattern<'static> = Pattern { rows: &[0b0110_0110] };
    pub const LINES_LEFT: Pattern<'static> = Pattern {
        rows: &[0b0001_0001, 0b0010_0010, 0b0100_0100, 0b1000_1000],
    };
    pub const LINES_RIGHT: Pattern<'static> = Pattern {
        rows: &[0b1000_1000, 0b0100_0100, 0b0010_0010, 0b0001_0001],
    };

    pub const WAVES_HORIZONTAL: Pattern<'static> = Pattern {
        rows: &[0b0110_0000, 0b1001_0000, 0b0000_1001, 0b0000_0110],
    };
    pub const WAVES_VERTICAL: Pattern<'static> = Pattern {
        rows: &[
            0b0100_0100,
            0b1000_1000,
            0b1000_1000,
            0b0100_0100,
            0b0010_0010,
            0b0001_0001,
            0b0001_0001,
            0b0010_0010,
        ],
    };
    pub const WAVES_HORIZONTAL_THICK: Pattern<'static> = Pattern {
        rows: &[0b0110_0110, 0b1111_0000, 0b1001_1001, 0b0000_1111],
    };
    pub const WAVES_VERTICAL_THICK: Pattern<'static> = Pattern {
        rows: &[
            0b0110_0110,
            0b1100_1100,
            0b1100_1100,
            0b0110_0110,
            0b0011_0011,
            0b1001_1001,
            0b1001_1001,
            0b0011_0011,
        ],
    };
    pub const WAVES_LEFT: Pattern<'static> = Pattern {
        rows: &[
            0b0000_0001,
            0b0000_0001,
            0b0000_0001,
            0b0000_1110,
            0b0111_0000,
            0b1000_0000,
            0b1000_0000,
            0b1000_0000,
        ],
    };
    pub const WAVES_RIGHT: Pattern<'static> = Pattern {
        rows: &[
            0b1000_0000,
            0b1000_0000,
            0b1000_0000,
            0b0111_0000,
            0b0000_1110,
            0b0000_0001,
            0b0000_0001,
            0b0000_0001,
        ],
    };
    pub const WAVES_LEFT_DENSE: Pattern<'static> = Pattern {
        rows: &[
            0b0001_0001,
            0b0001_0001,
            0b0010_0010,
            0b1100_1100,
            0b0011_0011,
            0b0100_0100,
            0b1000_1000,
            0b1000_1000,
        ],
    };
    pub const WAVES_RIGHT_DENSE: Pattern<'static> = Pattern {
        rows: &[
            0b1000_1000,
            0b1000_1000,
            0b0100_0100,
            0b0011_0011,
            0b1100_1100,
            0b0010_0010,
            0b0001_0001,
            0b0001_0001,
        ],
    };

    /// Every stock pattern with a lowercase name
    pub const ALL: &[(&str, Pattern<'static>)] = &[
        ("grayscale_0", GRAYSCALE_0),
        ("grayscale_1", GRAYSCALE_1),
        ("grayscale_2", GRAYSCALE_2),
        ("grayscale_3", GRAYSCALE_3),
        ("grayscale_4", GRAYSCALE_4),
        ("grayscale_5", GRAYSCALE_5),
        ("grayscale_6", GRAYSCALE_6),
        ("grayscale_7", GRAYSCALE_7),
        ("grayscale_8", GRAYSCALE_8),
        ("grayscale_9", GRAYSCALE_9),
        ("grayscale_10", GRAYSCALE_10),
        ("grayscale_11", GRAYSCALE_11),
        ("grayscale_12", GRAYSCALE_12),
        ("grayscale_13", GRAYSCALE_13),
        ("grayscale_14", GRAYSCALE_14),
        ("grayscale_15", GRAYSCALE_15),
        ("grayscale_16", GRAYSCALE_16),
        ("gray", GRAY),
        ("gray_big", GRAY_BIG),
        ("gray_wide", GRAY_WIDE),
        ("gray_tall", GRAY_TALL),
        ("lines_horizontal", LINES_HORIZONTAL),
        ("lines_vertical", LINES_VERTICAL),
        ("lines_horizontal_thick", LINES_HORIZONTAL_THICK),
        ("lines_vertical_thick", LINES_VERTICAL_THICK),
        ("lines_left", LINES_LEFT),
        ("lines_right", LINES_RIGHT),
        ("waves_horizontal", WAVES_HORIZONTAL),
        ("waves_vertical", WAVES_VERTICAL),
        ("waves_horizontal_thick", WAVES_HORIZONTAL_THICK),
        ("waves_vertical_thick", WAVES_VERTICAL_THICK),
        ("waves_left", WAVES_LEFT),
        ("waves_right", WAVES_RIGHT),
        ("waves_left_dense", WAVES_LEFT_DENSE),
        ("waves_right_dense", WAVES_RIGHT_DENSE),
    ];

    /// Look up a stock pattern by name
    pub fn by_name(name: &str) -> Option<Pattern<'static>> {
        ALL.iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, pattern)| *pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_power_of_two() {
        assert_eq!(Pattern::new(&[]), Err(Error::InvalidPattern));
        assert_eq!(Pattern::new(&[1, 2, 3]), Err(Error::InvalidPattern));
        assert!(Pattern::new(&[1, 2, 3, 4]).is_ok());
    }

    #[test]
    fn blob_layout() {
        let blob = [0b1, 0b0101_0101, 0b1010_1010, 0xEE];
        let pattern = Pattern::from_blob(&blob).unwrap();
        assert_eq!(pattern.rows(), &[0b0101_0101, 0b1010_1010]);
        assert_eq!(pattern.mask(), 1);

        assert_eq!(Pattern::from_blob(&[]), Err(Error::InvalidPattern));
        assert_eq!(Pattern::from_blob(&[3, 1, 2]), Err(Error::InvalidPattern));
        assert_eq!(Pattern::from_blob(&[2, 1, 2, 3]), Err(Error::InvalidPattern));
    }

    #[test]
    fn rows_tile_by_mask() {
        let pattern = presets::WAVES_VERTICAL;
        for y in 0..64u16 {
            assert_eq!(pattern.row(y), pattern.row(y + 8));
            assert_eq!(pattern.row(y), pattern.rows()[usize::from(y % 8)]);
        }
    }

    #[test]
    fn stock_patterns_are_valid() {
        for (name, pattern) in presets::ALL {
            assert!(
                Pattern::new(pattern.rows()).is_ok(),
                "{} has {} rows",
                name,
                pattern.row_count()
            );
        }
        assert_eq!(presets::by_name("gray"), Some(presets::GRAY));
        assert_eq!(presets::by_name("plaid"), None);
    }

    #[test]
    fn grayscale_density_matches_name() {
        let ramp = [
            presets::GRAYSCALE_0,
            presets::GRAYSCALE_1,
            presets::GRAYSCALE_2,
            presets::GRAYSCALE_3,
            presets::GRAYSCALE_4,
            presets::GRAYSCALE_6,
            presets::GRAYSCALE_8,
            presets::GRAYSCALE_12,
            presets::GRAYSCALE_16,
        ];
        let expected = [0, 1, 2, 3, 4, 6, 8, 12, 16];
        for (pattern, want) in ramp.iter().zip(expected) {
            // Pixels set in a 4x4 tile
            let set: u32 = (0..4u16)
                .map(|y| (pattern.row(y) & 0x0F).count_ones())
                .sum();
            assert_eq!(set, want);
        }
    }
}
