//! Errors reported by the driver
//!
//! Every public drawing operation validates its arguments before the first bus
//! transaction, so a rejected call leaves display RAM untouched.

pub use display_interface::DisplayError;

/// Driver errors
#[derive(Debug, Clone)]
pub enum Error {
    /// The transport failed to complete a register transaction
    Transport(DisplayError),
    /// A coordinate or length reaches outside the display surface
    OutOfBounds,
    /// Pattern row count is not a power of two, or the pattern blob is truncated
    InvalidPattern,
    /// Font header is unusable or the glyph table is truncated
    InvalidFont,
    /// The font has no glyph for this character
    MissingGlyph(char),
    /// Display dimensions the controller cannot address
    InvalidConfig,
    /// The controller kept reporting busy past the allowed wait
    Timeout,
}

// DisplayError has no PartialEq, so transport errors compare by variant
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Transport(a), Self::Transport(b)) => {
                core::mem::discriminant(a) == core::mem::discriminant(b)
            }
            (Self::MissingGlyph(a), Self::MissingGlyph(b)) => a == b,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl Eq for Error {}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Error::Transport(e)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Register transaction failed: {:?}", e),
            Self::OutOfBounds => write!(f, "Coordinates outside the display surface"),
            Self::InvalidPattern => write!(f, "Pattern row count must be a power of two"),
            Self::InvalidFont => write!(f, "Invalid font data"),
            Self::MissingGlyph(c) => write!(f, "No glyph for character {:?}", c),
            Self::InvalidConfig => write!(f, "Unsupported display dimensions"),
            Self::Timeout => write!(f, "Display stayed busy too long"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
