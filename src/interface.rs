//! Register transport for the LC7981 parallel bus
//!
//! The controller exposes two logical registers selected with the RS line:
//! Data (RS low) and Command (RS high). Everything the driver does is built
//! from single-byte reads and writes on those two registers.
use crate::flag::Flag;
use core::convert::Infallible;
use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};

/// Address set-up time before the enable pulse
const SETUP_DELAY_NS: u32 = 90;
/// Data delay time while reading, enable high to valid data
const READ_DATA_DELAY_NS: u32 = 140;
/// Data set-up time while writing, enable pulse width
const WRITE_DATA_DELAY_NS: u32 = 220;

/// Logical register selected by the RS line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    /// Display data and instruction arguments (RS low)
    Data = 0,
    /// Instruction register and busy flag (RS high)
    Command = 1,
}

/// Synchronous access to the controller registers
///
/// Implementations own the board wiring. Every call must finish the complete
/// electrical handshake before returning.
pub trait Transport {
    /// Prepare the bus. Called once before any other operation.
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Write one byte to a register
    fn write(&mut self, reg: Register, value: u8) -> Result<(), DisplayError>;

    /// Read one byte from a register
    fn read(&mut self, reg: Register) -> Result<u8, DisplayError>;

    /// Sample the busy flag once
    fn busy(&mut self) -> Result<bool, DisplayError> {
        Ok(self.read(Register::Command)? & Flag::STATUS_BUSY_BIT != 0)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn init(&mut self) -> Result<(), DisplayError> {
        (**self).init()
    }

    fn write(&mut self, reg: Register, value: u8) -> Result<(), DisplayError> {
        (**self).write(reg, value)
    }

    fn read(&mut self, reg: Register) -> Result<u8, DisplayError> {
        (**self).read(reg)
    }

    fn busy(&mut self) -> Result<bool, DisplayError> {
        (**self).busy()
    }
}

/// The 8-bit data bus DB0..DB7
///
/// Switching the bus direction is board specific, so it lives behind this trait.
pub trait DataBus {
    /// Release the bus so the controller can drive it
    fn set_input(&mut self) -> Result<(), DisplayError>;
    /// Take the bus back for writing
    fn set_output(&mut self) -> Result<(), DisplayError>;
    /// Sample all eight lines, DB0 is the least significant bit
    fn read(&mut self) -> Result<u8, DisplayError>;
    /// Drive all eight lines, DB0 is the least significant bit
    fn write(&mut self, value: u8) -> Result<(), DisplayError>;
}

/// Data bus made of eight open-drain pins
///
/// Releasing a line means driving it high, which lets the controller pull it
/// down while reading.
pub struct OpenDrainBus<P> {
    pins: [P; 8],
}

impl<P> OpenDrainBus<P> {
    /// Create the bus from DB0..DB7
    pub fn new(pins: [P; 8]) -> Self {
        OpenDrainBus { pins }
    }

    /// Give the pins back
    pub fn release(self) -> [P; 8] {
        self.pins
    }
}

impl<P> DataBus for OpenDrainBus<P>
where
    P: InputPin + OutputPin,
{
    fn set_input(&mut self) -> Result<(), DisplayError> {
        self.write(0xFF)
    }

    fn set_output(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn read(&mut self) -> Result<u8, DisplayError> {
        let mut out = 0u8;
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            // DisplayError has no read variant
            if pin.is_high().map_err(|_| DisplayError::BusWriteError)? {
                out |= 1 << bit;
            }
        }
        Ok(out)
    }

    fn write(&mut self, value: u8) -> Result<(), DisplayError> {
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            let level = if value & (1 << bit) != 0 {
                pin.set_high()
            } else {
                pin.set_low()
            };
            level.map_err(|_| DisplayError::BusWriteError)?;
        }
        Ok(())
    }
}

/// Stand-in for a chip select line that is tied low on the board
#[derive(Debug, Default, Clone, Copy)]
pub struct NoChipSelect;

impl ErrorType for NoChipSelect {
    type Error = Infallible;
}

impl OutputPin for NoChipSelect {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// The Connection Interface of the LC7981 with its 6800-style parallel bus
///
pub struct ParallelInterface<BUS, EN, RS, RW, CS, DELAY> {
    /// DB0..DB7
    bus: BUS,
    /// Enable, data is latched on the falling edge
    en: EN,
    /// Register select (High for command, Low for data)
    rs: RS,
    /// Read/Write (High for read, Low for write)
    rw: RW,
    /// Chip select, active low
    cs: CS,
    /// Delay provider for the bus timings
    delay: DELAY,
    /// Keep CS asserted between transactions
    chip_always_selected: bool,
}

impl<BUS, EN, RS, RW, CS, DELAY> ParallelInterface<BUS, EN, RS, RW, CS, DELAY> {
    /// Create the interface. The chip stays selected between transactions.
    pub fn new(bus: BUS, en: EN, rs: RS, rw: RW, cs: CS, delay: DELAY) -> Self {
        ParallelInterface {
            bus,
            en,
            rs,
            rw,
            cs,
            delay,
            chip_always_selected: true,
        }
    }

    /// Deselect the chip after every transaction, freeing the data lines for
    /// other devices
    pub fn with_shared_bus(mut self) -> Self {
        self.chip_always_selected = false;
        self
    }

    /// Give the pins back
    pub fn release(self) -> (BUS, EN, RS, RW, CS, DELAY) {
        (self.bus, self.en, self.rs, self.rw, self.cs, self.delay)
    }
}

impl<BUS, EN, RS, RW, CS, DELAY> ParallelInterface<BUS, EN, RS, RW, CS, DELAY>
where
    BUS: DataBus,
    EN: OutputPin,
    RS: OutputPin,
    RW: OutputPin,
    CS: OutputPin,
    DELAY: DelayNs,
{
    fn enable(&mut self, high: bool) -> Result<(), DisplayError> {
        let result = if high {
            self.en.set_high()
        } else {
            self.en.set_low()
        };
        result.map_err(|_| DisplayError::BusWriteError)
    }

    fn select_register(&mut self, reg: Register) -> Result<(), DisplayError> {
        let result = match reg {
            Register::Command => self.rs.set_high(),
            Register::Data => self.rs.set_low(),
        };
        result.map_err(|_| DisplayError::DCError)
    }

    fn select_chip(&mut self) -> Result<(), DisplayError> {
        if self.chip_always_selected {
            return Ok(());
        }
        self.cs.set_low().map_err(|_| DisplayError::CSError)
    }

    fn deselect_chip(&mut self) -> Result<(), DisplayError> {
        if self.chip_always_selected {
            return Ok(());
        }
        self.cs.set_high().map_err(|_| DisplayError::CSError)
    }
}

impl<BUS, EN, RS, RW, CS, DELAY> Transport for ParallelInterface<BUS, EN, RS, RW, CS, DELAY>
where
    BUS: DataBus,
    EN: OutputPin,
    RS: OutputPin,
    RW: OutputPin,
    CS: OutputPin,
    DELAY: DelayNs,
{
    fn init(&mut self) -> Result<(), DisplayError> {
        log::info!(
            "Initializing LC7981 parallel bus (chip always selected: {})",
            self.chip_always_selected
        );
        self.enable(false)?;
        let chip = if self.chip_always_selected {
            self.cs.set_low()
        } else {
            self.cs.set_high()
        };
        chip.map_err(|_| DisplayError::CSError)?;
        self.bus.set_output()
    }

    fn write(&mut self, reg: Register, value: u8) -> Result<(), DisplayError> {
        self.enable(false)?;
        self.bus.write(value)?;

        self.select_chip()?;
        self.rw.set_low().map_err(|_| DisplayError::BusWriteError)?;
        self.select_register(reg)?;
        self.delay.delay_ns(SETUP_DELAY_NS);

        self.enable(true)?;
        self.delay.delay_ns(WRITE_DATA_DELAY_NS);
        self.enable(false)?;

        self.deselect_chip()
    }

    fn read(&mut self, reg: Register) -> Result<u8, DisplayError> {
        self.enable(false)?;

        // Data bus is input only inside `read`, as writes are more common
        self.bus.set_input()?;

        self.select_chip()?;
        self.rw.set_high().map_err(|_| DisplayError::BusWriteError)?;
        self.select_register(reg)?;
        self.delay.delay_ns(SETUP_DELAY_NS);

        self.enable(true)?;
        self.delay.delay_ns(READ_DATA_DELAY_NS);
        let out = self.bus.read();
        self.enable(false)?;

        self.deselect_chip()?;
        self.bus.set_output()?;
        out
    }
}
