//! Software model of the LC7981 register interface
//!
//! [`Simulator`] implements [`Transport`] on top of a plain byte array, so the
//! driver can run without hardware: in tests, and for rendering previews on a
//! host. It reproduces the controller behaviour the driver depends on:
//!
//! - the cursor advances after every data read or write
//! - reads go through a one-byte latch, so the first read after a cursor move
//!   returns stale data
//! - bit set/clear instructions modify the byte at the cursor in place
//! - the busy flag can be held for a number of polls, or forever
//!
//! Every register transaction is appended to a log that tests can inspect.

use std::vec;
use std::vec::Vec;

use display_interface::DisplayError;
use embedded_hal::delay::DelayNs;

use crate::cmd::Cmd;
use crate::flag::Flag;
use crate::interface::{Register, Transport};

/// Display RAM the controller can address
const RAM_SIZE: usize = 0x1_0000;

/// One register transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Byte written to a register
    Write(Register, u8),
    /// Byte read from a register
    Read(Register, u8),
}

/// Byte-array model of the controller
#[derive(Debug, Clone)]
pub struct Simulator {
    width: u16,
    height: u16,
    ram: Vec<u8>,
    cursor: u16,
    latch: u8,
    latch_fresh: bool,
    instruction: u8,
    registers: [u8; 16],
    initialized: bool,
    busy_polls: u32,
    stuck_busy: bool,
    busy_polls_seen: u32,
    stale_reads: u32,
    log: Vec<Op>,
}

impl Simulator {
    /// Blank (white) display of the given size in pixels
    pub fn new(width: u16, height: u16) -> Self {
        Simulator {
            width,
            height,
            ram: vec![0; RAM_SIZE],
            cursor: 0,
            latch: 0,
            latch_fresh: false,
            instruction: 0,
            registers: [0; 16],
            initialized: false,
            busy_polls: 0,
            stuck_busy: false,
            busy_polls_seen: 0,
            stale_reads: 0,
            log: Vec::new(),
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    fn bytes_per_row(&self) -> usize {
        usize::from(self.width / 8)
    }

    /// Visible part of display RAM, row after row
    pub fn memory(&self) -> &[u8] {
        &self.ram[..self.bytes_per_row() * usize::from(self.height)]
    }

    /// Bytes of one display row
    pub fn row(&self, y: u16) -> &[u8] {
        let start = self.bytes_per_row() * usize::from(y);
        &self.ram[start..start + self.bytes_per_row()]
    }

    /// Byte at a RAM address
    pub fn byte(&self, address: u16) -> u8 {
        self.ram[usize::from(address)]
    }

    /// Overwrite a RAM byte without going through the register interface
    pub fn poke(&mut self, address: u16, value: u8) {
        self.ram[usize::from(address)] = value;
    }

    /// Fill the visible surface without going through the register interface
    pub fn fill(&mut self, value: u8) {
        let len = self.memory().len();
        self.ram[..len].fill(value);
    }

    /// Whether pixel `(x, y)` is black
    pub fn pixel(&self, x: u16, y: u16) -> bool {
        let address = self.bytes_per_row() * usize::from(y) + usize::from(x / 8);
        self.ram[address] & (1 << (x % 8)) != 0
    }

    /// Whether [`Transport::init`] ran
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// Last argument written for an instruction
    pub fn instruction(&self, command: u8) -> u8 {
        self.registers[usize::from(command & 0x0F)]
    }

    /// Display start address from the two start registers
    pub fn display_start(&self) -> u16 {
        u16::from_le_bytes([
            self.registers[usize::from(Cmd::DISPLAY_START_LOW)],
            self.registers[usize::from(Cmd::DISPLAY_START_HIGH)],
        ])
    }

    /// Controller-side cursor
    pub fn cursor(&self) -> u16 {
        self.cursor
    }

    /// Report busy for the next `polls` status reads
    pub fn set_busy_polls(&mut self, polls: u32) {
        self.busy_polls = polls;
    }

    /// Report busy on every status read
    pub fn set_stuck_busy(&mut self, stuck: bool) {
        self.stuck_busy = stuck;
    }

    /// Status reads served so far
    pub fn busy_polls_seen(&self) -> u32 {
        self.busy_polls_seen
    }

    /// Data reads that returned stale latch contents
    pub fn stale_reads(&self) -> u32 {
        self.stale_reads
    }

    /// Register transactions since the last [`Simulator::clear_log`]
    pub fn log(&self) -> &[Op] {
        &self.log
    }

    /// Forget the logged transactions
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Data register reads in the log
    pub fn data_reads(&self) -> usize {
        self.log
            .iter()
            .filter(|op| matches!(op, Op::Read(Register::Data, _)))
            .count()
    }

    /// Data register writes in the log
    pub fn data_writes(&self) -> usize {
        self.log
            .iter()
            .filter(|op| matches!(op, Op::Write(Register::Data, _)))
            .count()
    }

    fn write_data(&mut self, value: u8) {
        match self.instruction {
            Cmd::CURSOR_ADDRESS_LOW => {
                self.cursor = (self.cursor & 0xFF00) | u16::from(value);
                self.latch_fresh = false;
            }
            Cmd::CURSOR_ADDRESS_HIGH => {
                self.cursor = (self.cursor & 0x00FF) | (u16::from(value) << 8);
                self.latch_fresh = false;
            }
            Cmd::WRITE_DISPLAY_DATA => {
                self.ram[usize::from(self.cursor)] = value;
                self.cursor = self.cursor.wrapping_add(1);
                self.latch_fresh = false;
            }
            Cmd::SET_BIT => self.ram[usize::from(self.cursor)] |= 1 << (value & 7),
            Cmd::CLEAR_BIT => self.ram[usize::from(self.cursor)] &= !(1 << (value & 7)),
            Cmd::READ_DISPLAY_DATA => {}
            other => self.registers[usize::from(other)] = value,
        }
    }

    fn read_data(&mut self) -> u8 {
        if self.instruction != Cmd::READ_DISPLAY_DATA {
            return self.latch;
        }
        if !self.latch_fresh {
            self.stale_reads += 1;
        }
        let out = self.latch;
        self.latch = self.ram[usize::from(self.cursor)];
        self.latch_fresh = true;
        self.cursor = self.cursor.wrapping_add(1);
        out
    }

    fn read_status(&mut self) -> u8 {
        self.busy_polls_seen += 1;
        if self.stuck_busy {
            return Flag::STATUS_BUSY_BIT;
        }
        if self.busy_polls > 0 {
            self.busy_polls -= 1;
            return Flag::STATUS_BUSY_BIT;
        }
        0
    }
}

impl Transport for Simulator {
    fn init(&mut self) -> Result<(), DisplayError> {
        self.initialized = true;
        Ok(())
    }

    fn write(&mut self, reg: Register, value: u8) -> Result<(), DisplayError> {
        self.log.push(Op::Write(reg, value));
        match reg {
            Register::Command => self.instruction = value & 0x0F,
            Register::Data => self.write_data(value),
        }
        Ok(())
    }

    fn read(&mut self, reg: Register) -> Result<u8, DisplayError> {
        let value = match reg {
            Register::Command => self.read_status(),
            Register::Data => self.read_data(),
        };
        self.log.push(Op::Read(reg, value));
        Ok(value)
    }
}

/// Delay provider that returns immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_read_after_cursor_move_is_stale() {
        let mut sim = Simulator::new(16, 4);
        sim.poke(5, 0x42);
        sim.write(Register::Command, Cmd::CURSOR_ADDRESS_LOW).unwrap();
        sim.write(Register::Data, 5).unwrap();
        sim.write(Register::Command, Cmd::READ_DISPLAY_DATA).unwrap();

        assert_eq!(sim.read(Register::Data).unwrap(), 0);
        assert_eq!(sim.stale_reads(), 1);
        assert_eq!(sim.read(Register::Data).unwrap(), 0x42);
        assert_eq!(sim.stale_reads(), 1);
    }

    #[test]
    fn writes_advance_cursor() {
        let mut sim = Simulator::new(16, 4);
        sim.write(Register::Command, Cmd::WRITE_DISPLAY_DATA).unwrap();
        sim.write(Register::Data, 0xAA).unwrap();
        sim.write(Register::Data, 0xBB).unwrap();
        assert_eq!(sim.memory()[..3], [0xAA, 0xBB, 0]);
        assert_eq!(sim.cursor(), 2);
        assert!(!sim.pixel(0, 0));
        assert!(sim.pixel(1, 0));
        assert_eq!(sim.data_writes(), 2);
    }

    #[test]
    fn bit_commands_keep_cursor() {
        let mut sim = Simulator::new(16, 4);
        sim.write(Register::Command, Cmd::SET_BIT).unwrap();
        sim.write(Register::Data, 3).unwrap();
        sim.write(Register::Data, 4).unwrap();
        assert_eq!(sim.byte(0), 0b0001_1000);
        sim.write(Register::Command, Cmd::CLEAR_BIT).unwrap();
        sim.write(Register::Data, 3).unwrap();
        assert_eq!(sim.byte(0), 0b0001_0000);
        assert_eq!(sim.cursor(), 0);
    }
}
