//! LC7981 Graphic LCD Driver
//!
//! Used in 240x128 panels such as the EW24D40, wired over an 8-bit parallel bus.
//!
//! The controller keeps the only copy of the picture. There is no framebuffer in
//! this driver: every primitive is translated into cursor moves, byte streams and
//! single-bit commands against display RAM. Anything that does not start or end on
//! an 8-pixel boundary is merged with a read-modify-write, so neighbouring pixels
//! are never disturbed.
//!
//!
//! ### Usage
//! 1. implement [`interface::Transport`] for your board, or wire the pins into
//!    [`interface::ParallelInterface`]
//! 1. build a [`config::Config`] and create the driver with [`driver::Lc7981::new`]
//! 1. call [`driver::Lc7981::init`] once, then draw with the line, fill and text
//!    operations, or through [`embedded_graphics`]
//!
//! ```
//! use lc7981::{sim::Simulator, Builder, Color, Lc7981};
//!
//! let config = Builder::new().dimensions(240, 128).build().unwrap();
//! let mut display = Lc7981::new(Simulator::new(240, 128), config);
//! display.init().unwrap();
//! display.draw_horizontal_line(3, 0, 10, 0xFF).unwrap();
//! display.draw_rectangle(10, 10, 50, 20, Color::Black).unwrap();
//! assert_eq!(display.interface().byte(0), 0b1111_1000);
//! ```
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]
#![allow(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod color;
pub mod config;
pub mod driver;
pub mod error;
pub mod graphics;
pub mod interface;
pub mod pattern;
pub mod raster;
pub mod text;

#[cfg(any(test, feature = "std"))]
pub mod sim;

mod cmd;
mod flag;

pub use color::Color;
pub use config::{Builder, Config};
pub use driver::{Cursor, Lc7981};
pub use error::Error;
pub use interface::{Register, Transport};
pub use pattern::Pattern;
pub use text::Font;

/// Panel width most LC7981 modules ship with
pub const DEFAULT_WIDTH: u16 = 240;

/// Panel height most LC7981 modules ship with
pub const DEFAULT_HEIGHT: u16 = 128;

/// Widest surface the 8-bit "number of characters" register can describe
pub const MAX_WIDTH: u16 = 256 * 8;
