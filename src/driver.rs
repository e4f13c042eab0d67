//! LC7981 Display Driver Implementation
//!
//! This module contains the driver struct, the cursor bookkeeping and the byte
//! level transactions every drawing operation is built from.
//!
//! ## Architecture
//!
//! ### Initialization Functions
//! - `new()` - Wrap a transport and a configuration
//! - `init()` - Bus setup followed by the graphic mode register list
//!
//! ### Cursor and Byte Transactions
//! - `set_cursor_address()` - Move the read/write cursor
//! - `write_start()` / `write_next_byte()` / `write_single_byte()`
//! - `read_start()` / `read_next_byte()` / `read_single_byte()`
//! - `set_data_bit()` / `clear_data_bit()` - Single bit commands
//!
//! ### Whole Screen
//! - `clear()` and the white/black/gray shorthands
//! - `set_display_duty()`, `set_display_start()`
//!
//! Lines, fills and text live in [`crate::raster`] and [`crate::text`].
//!
//! ## Critical Implementation Details
//!
//! ### Dummy Read
//!
//! The controller answers the first data read after a cursor move with stale
//! latch contents. [`Cursor`] remembers that a move happened and `read_start()`
//! spends exactly one throwaway read before the real one. Skipping it shifts
//! every read after a cursor move by one byte.
//!
//! ### Bit Order
//!
//! Pixel `x` lives in bit `x % 8` of its byte: the least significant bit is the
//! leftmost pixel. A set bit is black.

use embedded_hal::delay::DelayNs;

use crate::cmd::Cmd;
use crate::color::Color;
use crate::config::Config;
use crate::error::Error;
use crate::flag::Flag;
use crate::interface::{Register, Transport};

/// Shadow of the controller's read/write cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    address: u16,
    need_dummy_read: bool,
}

impl Cursor {
    /// Controller cursor, advanced by every data read and write
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Whether the next read sequence has to start with a throwaway read
    pub fn needs_dummy_read(&self) -> bool {
        self.need_dummy_read
    }
}

/// LC7981 Graphic LCD Driver
///
/// Owns the transport and the cursor shadow. Pattern and font data are only
/// borrowed for the duration of a call.
pub struct Lc7981<T> {
    /// The register transport
    interface: T,
    /// Display geometry and timing bounds
    config: Config,
    /// Cursor shadow
    cursor: Cursor,
}

impl<T> Lc7981<T> {
    /// Wrap a transport. Call [`Lc7981::init`] before drawing.
    pub fn new(interface: T, config: Config) -> Self {
        Lc7981 {
            interface,
            config,
            cursor: Cursor::default(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.config.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.config.height()
    }

    /// Cursor shadow state
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Borrow the transport
    pub fn interface(&self) -> &T {
        &self.interface
    }

    /// Borrow the transport mutably
    ///
    /// Register traffic sent this way bypasses the cursor shadow; call
    /// [`Lc7981::set_cursor_address`] afterwards.
    pub fn interface_mut(&mut self) -> &mut T {
        &mut self.interface
    }

    /// Give the transport back
    pub fn release(self) -> T {
        self.interface
    }
}

impl<T> Lc7981<T>
where
    T: Transport,
{
    /// Prepare the bus and switch the controller to graphic mode
    pub fn init(&mut self) -> Result<(), Error> {
        log::info!(
            "Initializing LC7981 in graphic mode ({}x{})",
            self.config.width(),
            self.config.height()
        );
        self.interface.init()?;

        // Display ON, master mode, graphic mode
        self.cmd_with_data(Cmd::MODE_CONTROL, Flag::MODE_DISPLAY_ON_MASTER_GRAPHIC)?;

        // Use all 8 bits of a byte as 8 dots
        self.cmd_with_data(Cmd::CHARACTER_PITCH, Flag::CHARACTER_PITCH_8_DOTS)?;

        // Bytes per row - 1
        self.cmd_with_data(
            Cmd::NUMBER_OF_CHARACTERS,
            (self.config.bytes_per_row() - 1) as u8,
        )?;

        self.cmd_with_data(Cmd::TIME_DIVISION, self.config.duty())?;

        self.set_display_start(0)?;

        // Mode setup leaves the controller cursor wherever it was
        self.cursor = Cursor {
            address: 0,
            need_dummy_read: true,
        };
        Ok(())
    }

    /// Basic function for sending an instruction
    fn cmd(&mut self, command: u8) -> Result<(), Error> {
        self.interface.write(Register::Command, command)?;
        Ok(())
    }

    /// Basic function for sending one data byte
    fn data(&mut self, value: u8) -> Result<(), Error> {
        self.interface.write(Register::Data, value)?;
        Ok(())
    }

    /// Instruction followed by its argument
    fn cmd_with_data(&mut self, command: u8, value: u8) -> Result<(), Error> {
        self.cmd(command)?;
        self.data(value)
    }

    /// Set display duty to `1 / (value + 1)`
    ///
    /// The controller accepts up to 1:256 but glitches above 1:128 on most panels.
    pub fn set_display_duty(&mut self, value: u8) -> Result<(), Error> {
        log::info!("Setting display duty to 1/{}", u16::from(value) + 1);
        self.cmd_with_data(Cmd::TIME_DIVISION, value)
    }

    /// Set the RAM address shown in the top-left corner
    ///
    /// Moving it by whole rows scrolls the picture without redrawing.
    pub fn set_display_start(&mut self, address: u16) -> Result<(), Error> {
        log::debug!("Setting display start address to {}", address);
        self.cmd_with_data(Cmd::DISPLAY_START_LOW, (address & 0xFF) as u8)?;
        self.cmd_with_data(Cmd::DISPLAY_START_HIGH, (address >> 8) as u8)
    }

    /// Move the data read/write cursor
    pub fn set_cursor_address(&mut self, address: u16) -> Result<(), Error> {
        log::trace!("Cursor -> {}", address);
        self.cmd_with_data(Cmd::CURSOR_ADDRESS_LOW, (address & 0xFF) as u8)?;
        self.cmd_with_data(Cmd::CURSOR_ADDRESS_HIGH, (address >> 8) as u8)?;
        self.cursor = Cursor {
            address,
            need_dummy_read: true,
        };
        Ok(())
    }

    /// Start writing at the cursor
    pub fn write_start(&mut self) -> Result<(), Error> {
        self.cmd(Cmd::WRITE_DISPLAY_DATA)
    }

    /// Write the next byte after [`Lc7981::write_start`]; the cursor advances
    pub fn write_next_byte(&mut self, value: u8) -> Result<(), Error> {
        self.data(value)?;
        self.cursor.address = self.cursor.address.wrapping_add(1);
        Ok(())
    }

    /// Write one byte at the cursor
    pub fn write_single_byte(&mut self, value: u8) -> Result<(), Error> {
        self.write_start()?;
        self.write_next_byte(value)
    }

    /// Start reading at the cursor, spending the dummy read if one is owed
    pub fn read_start(&mut self) -> Result<(), Error> {
        if self.cursor.need_dummy_read {
            self.cursor.need_dummy_read = false;
            self.cmd(Cmd::READ_DISPLAY_DATA)?;
            let _ = self.interface.read(Register::Data)?;
            // The throwaway read still advances the controller cursor
            self.cursor.address = self.cursor.address.wrapping_add(1);
        }
        self.cmd(Cmd::READ_DISPLAY_DATA)
    }

    /// Read the next byte after [`Lc7981::read_start`]; the cursor advances
    pub fn read_next_byte(&mut self) -> Result<u8, Error> {
        let value = self.interface.read(Register::Data)?;
        self.cursor.address = self.cursor.address.wrapping_add(1);
        Ok(value)
    }

    /// Read one byte at the cursor
    pub fn read_single_byte(&mut self) -> Result<u8, Error> {
        self.read_start()?;
        self.read_next_byte()
    }

    /// Stream bytes into display RAM starting at `address`
    pub fn write_bytes(&mut self, address: u16, bytes: &[u8]) -> Result<(), Error> {
        self.check_span(address, bytes.len())?;
        if bytes.is_empty() {
            return Ok(());
        }
        self.set_cursor_address(address)?;
        self.write_start()?;
        for &byte in bytes {
            self.write_next_byte(byte)?;
        }
        Ok(())
    }

    /// Stream bytes out of display RAM starting at `address`
    pub fn read_bytes(&mut self, address: u16, buffer: &mut [u8]) -> Result<(), Error> {
        self.check_span(address, buffer.len())?;
        if buffer.is_empty() {
            return Ok(());
        }
        self.set_cursor_address(address)?;
        self.read_start()?;
        for byte in buffer.iter_mut() {
            *byte = self.read_next_byte()?;
        }
        Ok(())
    }

    /// Set bit `which` of the byte at the cursor
    pub fn set_data_bit(&mut self, which: u8) -> Result<(), Error> {
        self.set_data_bit_color(which, Color::Black)
    }

    /// Clear bit `which` of the byte at the cursor
    pub fn clear_data_bit(&mut self, which: u8) -> Result<(), Error> {
        self.set_data_bit_color(which, Color::White)
    }

    /// Set or clear bit `which` of the byte at the cursor
    pub fn set_data_bit_color(&mut self, which: u8, color: Color) -> Result<(), Error> {
        if which > 7 {
            return Err(Error::OutOfBounds);
        }
        let command = if color.is_set() {
            Cmd::SET_BIT
        } else {
            Cmd::CLEAR_BIT
        };
        self.cmd_with_data(command, which)
    }

    /// Address of the byte holding pixel `(x, y)`
    pub fn pixel_address(&self, x: u16, y: u16) -> Result<u16, Error> {
        self.check_point(x, y)?;
        Ok(self.address_of(x, y))
    }

    /// Set a single pixel
    ///
    /// Costs a cursor move and a bit command; prefer lines and fills for runs.
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), Error> {
        let address = self.pixel_address(x, y)?;
        self.set_cursor_address(address)?;
        self.set_data_bit_color((x % 8) as u8, color)
    }

    /// Read a single pixel back from display RAM
    pub fn get_pixel(&mut self, x: u16, y: u16) -> Result<Color, Error> {
        let address = self.pixel_address(x, y)?;
        self.set_cursor_address(address)?;
        let byte = self.read_single_byte()?;
        Ok(Color::from(byte & (1 << (x % 8)) != 0))
    }

    /// Fill the whole display with one byte pattern
    pub fn clear(&mut self, pattern: u8) -> Result<(), Error> {
        log::debug!("Clearing display with pattern 0x{:02X}", pattern);
        self.set_cursor_address(0)?;
        self.write_start()?;
        for _ in 0..self.config.buffer_size() {
            self.write_next_byte(pattern)?;
        }
        Ok(())
    }

    /// Clear the whole display white (empty)
    pub fn clear_white(&mut self) -> Result<(), Error> {
        self.clear(Flag::FILL_WHITE)
    }

    /// Clear the whole display black (filled)
    pub fn clear_black(&mut self) -> Result<(), Error> {
        self.clear(Flag::FILL_BLACK)
    }

    /// Clear the whole display gray (checkerboard)
    pub fn clear_gray(&mut self) -> Result<(), Error> {
        log::debug!("Clearing display gray");
        let bytes_per_row = self.config.bytes_per_row();
        self.set_cursor_address(0)?;
        self.write_start()?;
        for y in 0..self.config.height() {
            let pattern = if y % 2 == 0 {
                Flag::FILL_GRAY_EVEN
            } else {
                Flag::FILL_GRAY_ODD
            };
            for _ in 0..bytes_per_row {
                self.write_next_byte(pattern)?;
            }
        }
        Ok(())
    }

    /// Wait until the controller reports ready, bounded by the configured timeout
    pub fn wait_busy(&mut self, delay: &mut impl DelayNs) -> Result<(), Error> {
        let timeout = self.config.busy_timeout_us();
        self.wait_busy_for(delay, timeout)
    }

    /// Wait until the controller reports ready, giving up after `timeout_us`
    pub fn wait_busy_for(&mut self, delay: &mut impl DelayNs, timeout_us: u32) -> Result<(), Error> {
        let poll = self.config.busy_poll_us();
        let mut waited = 0u32;
        loop {
            if !self.interface.busy()? {
                return Ok(());
            }
            if waited >= timeout_us {
                log::error!("LC7981 still busy after {}us, giving up", waited);
                return Err(Error::Timeout);
            }
            delay.delay_us(poll);
            waited = waited.saturating_add(poll);
        }
    }
}

// Geometry helpers shared by the drawing modules
impl<T> Lc7981<T> {
    /// Address of the byte holding `(x, y)`, no bounds check
    pub(crate) fn address_of(&self, x: u16, y: u16) -> u16 {
        self.config.bytes_per_row() * y + x / 8
    }

    pub(crate) fn check_point(&self, x: u16, y: u16) -> Result<(), Error> {
        if x < self.config.width() && y < self.config.height() {
            Ok(())
        } else {
            Err(Error::OutOfBounds)
        }
    }

    /// Rectangle `[x, x+w) x [y, y+h)` must fit the surface
    pub(crate) fn check_area(&self, x: u16, y: u16, w: u16, h: u16) -> Result<(), Error> {
        let right = u32::from(x) + u32::from(w);
        let bottom = u32::from(y) + u32::from(h);
        if right <= u32::from(self.config.width()) && bottom <= u32::from(self.config.height()) {
            Ok(())
        } else {
            Err(Error::OutOfBounds)
        }
    }

    fn check_span(&self, address: u16, len: usize) -> Result<(), Error> {
        if usize::from(address) + len <= self.config.buffer_size() {
            Ok(())
        } else {
            Err(Error::OutOfBounds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Builder;
    use crate::sim::{Op, Simulator};

    fn display() -> Lc7981<Simulator> {
        let config = Builder::new().dimensions(240, 128).build().unwrap();
        let mut display = Lc7981::new(Simulator::new(240, 128), config);
        display.init().unwrap();
        display.interface_mut().clear_log();
        display
    }

    #[test]
    fn init_writes_graphic_mode_registers() {
        let config = Builder::new().dimensions(160, 80).build().unwrap();
        let mut display = Lc7981::new(Simulator::new(160, 80), config);
        display.init().unwrap();

        let sim = display.interface();
        assert!(sim.initialized());
        assert_eq!(sim.instruction(Cmd::MODE_CONTROL), 0b0011_0010);
        assert_eq!(sim.instruction(Cmd::CHARACTER_PITCH), 0b0000_0111);
        assert_eq!(sim.instruction(Cmd::NUMBER_OF_CHARACTERS), 19);
        assert_eq!(sim.instruction(Cmd::TIME_DIVISION), 79);
        assert_eq!(sim.display_start(), 0);
    }

    #[test]
    fn cursor_address_is_split_low_then_high() {
        let mut display = display();
        display.set_cursor_address(0x0E2A).unwrap();

        assert_eq!(
            display.interface().log(),
            &[
                Op::Write(Register::Command, Cmd::CURSOR_ADDRESS_LOW),
                Op::Write(Register::Data, 0x2A),
                Op::Write(Register::Command, Cmd::CURSOR_ADDRESS_HIGH),
                Op::Write(Register::Data, 0x0E),
            ]
        );
        assert!(display.cursor().needs_dummy_read());
        assert_eq!(display.cursor().address(), 0x0E2A);
    }

    #[test]
    fn one_dummy_read_after_cursor_move() {
        let mut display = display();
        display.interface_mut().poke(100, 0x11);
        display.interface_mut().poke(101, 0x22);

        display.set_cursor_address(100).unwrap();
        display.interface_mut().clear_log();
        assert_eq!(display.read_single_byte().unwrap(), 0x11);
        assert_eq!(display.interface().data_reads(), 2);
        assert!(!display.cursor().needs_dummy_read());

        display.interface_mut().clear_log();
        assert_eq!(display.read_single_byte().unwrap(), 0x22);
        assert_eq!(display.interface().data_reads(), 1);
    }

    #[test]
    fn cursor_shadow_follows_controller_through_reads() {
        let mut display = display();
        display.set_cursor_address(100).unwrap();
        display.read_single_byte().unwrap();
        assert_eq!(display.cursor().address(), display.interface().cursor());
        assert_eq!(display.cursor().address(), 102);

        display.read_single_byte().unwrap();
        assert_eq!(display.cursor().address(), display.interface().cursor());

        display.set_cursor_address(7).unwrap();
        display.write_single_byte(0xAA).unwrap();
        assert_eq!(display.cursor().address(), display.interface().cursor());
    }

    #[test]
    fn streamed_bytes_round_trip() {
        let mut display = display();
        display.write_bytes(29, &[1, 2, 3, 4]).unwrap();
        let mut back = [0u8; 4];
        display.read_bytes(29, &mut back).unwrap();
        assert_eq!(back, [1, 2, 3, 4]);
        assert_eq!(display.interface().byte(30), 2);
    }

    #[test]
    fn streamed_bytes_respect_surface() {
        let mut display = display();
        assert_eq!(
            display.write_bytes(3839, &[1, 2]),
            Err(Error::OutOfBounds)
        );
        assert!(display.interface().log().is_empty());
    }

    #[test]
    fn pixels_use_bit_commands() {
        let mut display = display();
        display.set_pixel(13, 2, Color::Black).unwrap();
        assert_eq!(display.interface().byte(61), 0b0010_0000);
        assert_eq!(display.get_pixel(13, 2).unwrap(), Color::Black);

        display.set_pixel(13, 2, Color::White).unwrap();
        assert_eq!(display.interface().byte(61), 0);
        assert_eq!(display.set_pixel(240, 0, Color::Black), Err(Error::OutOfBounds));
        assert_eq!(display.set_data_bit(8), Err(Error::OutOfBounds));
    }

    #[test]
    fn clears_cover_whole_surface() {
        let mut display = display();
        display.clear_black().unwrap();
        assert!(display.interface().memory().iter().all(|&b| b == 0xFF));

        display.clear_gray().unwrap();
        assert_eq!(display.interface().byte(0), 0b1010_1010);
        assert_eq!(display.interface().byte(29), 0b1010_1010);
        assert_eq!(display.interface().byte(30), 0b0101_0101);
        assert_eq!(display.interface().byte(3839), 0b0101_0101);

        display.clear_white().unwrap();
        assert!(display.interface().memory().iter().all(|&b| b == 0));
    }

    #[test]
    fn busy_wait_returns_once_ready() {
        let mut display = display();
        display.interface_mut().set_busy_polls(3);
        let mut delay = crate::sim::NoDelay;
        display.wait_busy(&mut delay).unwrap();
        assert_eq!(display.interface().busy_polls_seen(), 4);
    }

    #[test]
    fn busy_wait_times_out() {
        let config = Builder::new()
            .busy_timeout_us(50)
            .busy_poll_us(10)
            .build()
            .unwrap();
        let mut display = Lc7981::new(Simulator::new(240, 128), config);
        display.interface_mut().set_stuck_busy(true);
        let mut delay = crate::sim::NoDelay;
        assert_eq!(display.wait_busy(&mut delay), Err(Error::Timeout));
        // Polls at 0, 10, .., 50us
        assert_eq!(display.interface().busy_polls_seen(), 6);
    }

    #[test]
    fn display_start_scrolls() {
        let mut display = display();
        display.set_display_start(30 * 8).unwrap();
        assert_eq!(display.interface().display_start(), 240);
        display.set_display_duty(63).unwrap();
        assert_eq!(display.interface().instruction(Cmd::TIME_DIVISION), 63);
    }
}
