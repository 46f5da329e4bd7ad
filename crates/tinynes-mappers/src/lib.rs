//! NES cartridge loading and mapper implementations.
//!
//! This crate parses iNES ROM images and provides the cartridge-side
//! address translation ("mapper") that the CPU and PPU consult when an
//! access falls in cartridge-owned space.
//!
//! # Supported mappers
//!
//! | Mapper | Name | Description |
//! |--------|------|-------------|
//! | 0 | NROM | No banking, fixed PRG/CHR |
//!
//! Mapper 000 is the only implementation; [`Mapper`] is a closed enum so
//! adding another mapper later is an additive change, not a rewrite of the
//! dispatch call sites.
//!
//! # Example
//!
//! ```no_run
//! use tinynes_mappers::Cartridge;
//!
//! let cart = Cartridge::load("game.nes").expect("failed to load ROM");
//! let opcode = cart.cpu_read(0x8000);
//! ```

pub mod cartridge;
pub mod mapper;
pub mod rom;

pub use cartridge::{Cartridge, CartridgeError};
pub use mapper::{Mapper, Mirroring};
pub use rom::{Rom, RomError, RomHeader};
