//! NES 2C02 PPU (Picture Processing Unit) emulation.
//!
//! This crate provides a dot-accurate implementation of the NES PPU's
//! background rendering pipeline.
//!
//! # Overview
//!
//! The PPU operates at 3x the CPU clock rate and generates a 256x240 pixel
//! image. It consists of several subsystems:
//!
//! - **Registers**: Control, Mask, Status, OAM Address, Scroll, Address, Data
//! - **Background rendering**: Nametables, pattern tables, attribute tables
//! - **Palette**: 32-byte palette RAM with mirroring, driving the fixed
//!   64-color system palette
//!
//! Sprite evaluation and rendering are not implemented; `cpu_read`/
//! `cpu_write` expose OAMADDR/OAMDATA as a plain 256-byte store with no
//! per-scanline evaluation or sprite-zero-hit detection.
//!
//! # Timing
//!
//! NTSC timing (the primary target):
//! - Master clock: 21.477272 MHz
//! - PPU clock: 5.369318 MHz (master / 4)
//! - 341 dots per scanline
//! - 262 scanlines per frame (numbered -1..=260, -1 being pre-render)
//!
//! # Usage
//!
//! ```no_run
//! use tinynes_ppu::Ppu;
//! use tinynes_mappers::Mirroring;
//!
//! let mut ppu = Ppu::new(Mirroring::Horizontal);
//!
//! // Advance one dot, resolving pattern-table reads against cartridge CHR.
//! ppu.tick(|addr| {
//!     // read CHR-ROM/RAM at `addr`
//!     0u8
//! });
//!
//! if ppu.nmi() {
//!     ppu.set_nmi(false);
//!     // deliver NMI to the CPU
//! }
//!
//! if ppu.frame_complete() {
//!     ppu.clear_frame_complete();
//!     let _pixels = ppu.screen();
//! }
//! ```

mod background;
mod ctrl;
mod loopy;
mod mask;
mod palette;
mod ppu;
mod status;

pub use background::Background;
pub use ctrl::Ctrl;
pub use loopy::LoopyRegister;
pub use mask::Mask;
pub use palette::{SYSTEM_PALETTE, color};
pub use ppu::{FRAME_HEIGHT, FRAME_SIZE, FRAME_WIDTH, Ppu};
pub use status::Status;
