//! Display configuration
//!
//! The same driver serves every panel size; dimensions and timing bounds live
//! here instead of in constants.

use crate::error::Error;
use crate::{DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_WIDTH};

/// Default bound for [`crate::Lc7981::wait_busy`], in microseconds
pub const DEFAULT_BUSY_TIMEOUT_US: u32 = 100_000;

/// Default interval between busy flag polls, in microseconds
pub const DEFAULT_BUSY_POLL_US: u32 = 10;

/// Validated display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    width: u16,
    height: u16,
    duty: u8,
    busy_timeout_us: u32,
    busy_poll_us: u32,
}

impl Config {
    /// Width in pixels, always a multiple of 8
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Time division value written during mode setup
    pub fn duty(&self) -> u8 {
        self.duty
    }

    /// Upper bound for a busy wait, in microseconds
    pub fn busy_timeout_us(&self) -> u32 {
        self.busy_timeout_us
    }

    /// Delay between busy flag polls, in microseconds
    pub fn busy_poll_us(&self) -> u32 {
        self.busy_poll_us
    }

    /// Bytes in one display row
    pub fn bytes_per_row(&self) -> u16 {
        self.width / 8
    }

    /// Bytes of display RAM covered by the surface
    pub fn buffer_size(&self) -> usize {
        usize::from(self.bytes_per_row()) * usize::from(self.height)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            duty: default_duty(DEFAULT_HEIGHT),
            busy_timeout_us: DEFAULT_BUSY_TIMEOUT_US,
            busy_poll_us: DEFAULT_BUSY_POLL_US,
        }
    }
}

/// Full duty for the given number of rows, limited to what the register holds
fn default_duty(height: u16) -> u8 {
    height.saturating_sub(1).min(u16::from(u8::MAX)) as u8
}

/// Builder for [`Config`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Builder {
    width: Option<u16>,
    height: Option<u16>,
    duty: Option<u8>,
    busy_timeout_us: Option<u32>,
    busy_poll_us: Option<u32>,
}

impl Builder {
    /// Start from the 240x128 defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Panel size in pixels
    pub fn dimensions(mut self, width: u16, height: u16) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Time division value; defaults to `height - 1`
    pub fn duty(mut self, duty: u8) -> Self {
        self.duty = Some(duty);
        self
    }

    /// Upper bound for busy waits
    pub fn busy_timeout_us(mut self, timeout: u32) -> Self {
        self.busy_timeout_us = Some(timeout);
        self
    }

    /// Interval between busy flag polls
    pub fn busy_poll_us(mut self, interval: u32) -> Self {
        self.busy_poll_us = Some(interval);
        self
    }

    /// Validate and produce the configuration
    pub fn build(self) -> Result<Config, Error> {
        let width = self.width.unwrap_or(DEFAULT_WIDTH);
        let height = self.height.unwrap_or(DEFAULT_HEIGHT);

        if width == 0 || height == 0 || width % 8 != 0 || width > MAX_WIDTH {
            log::warn!("Rejecting display size {}x{}", width, height);
            return Err(Error::InvalidConfig);
        }
        // Cursor addresses are 16 bits wide
        if u32::from(width / 8) * u32::from(height) > 0x1_0000 {
            log::warn!("Display size {}x{} exceeds the address space", width, height);
            return Err(Error::InvalidConfig);
        }

        Ok(Config {
            width,
            height,
            duty: self.duty.unwrap_or_else(|| default_duty(height)),
            busy_timeout_us: self.busy_timeout_us.unwrap_or(DEFAULT_BUSY_TIMEOUT_US),
            busy_poll_us: self.busy_poll_us.unwrap_or(DEFAULT_BUSY_POLL_US).max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_common_panel() {
        let config = Builder::new().build().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.width(), 240);
        assert_eq!(config.height(), 128);
        assert_eq!(config.duty(), 127);
        assert_eq!(config.bytes_per_row(), 30);
        assert_eq!(config.buffer_size(), 3840);
    }

    #[test]
    fn rejects_unaligned_width() {
        assert_eq!(
            Builder::new().dimensions(241, 128).build(),
            Err(Error::InvalidConfig)
        );
        assert_eq!(
            Builder::new().dimensions(0, 128).build(),
            Err(Error::InvalidConfig)
        );
        assert_eq!(
            Builder::new().dimensions(240, 0).build(),
            Err(Error::InvalidConfig)
        );
    }

    #[test]
    fn rejects_oversized_surface() {
        assert_eq!(
            Builder::new().dimensions(MAX_WIDTH + 8, 8).build(),
            Err(Error::InvalidConfig)
        );
        assert_eq!(
            Builder::new().dimensions(2048, 300).build(),
            Err(Error::InvalidConfig)
        );
        assert!(Builder::new().dimensions(2048, 256).build().is_ok());
    }

    #[test]
    fn duty_follows_height_unless_set() {
        let tall = Builder::new().dimensions(64, 400).build().unwrap();
        assert_eq!(tall.duty(), 255);
        let small = Builder::new().dimensions(64, 32).build().unwrap();
        assert_eq!(small.duty(), 31);
        let custom = Builder::new().duty(63).build().unwrap();
        assert_eq!(custom.duty(), 63);
    }
}
