//! NES emulation core: integrates the CPU, PPU, APU stub, and cartridge
//! mapper crates behind a single tick-driven bus.
//!
//! The core is strictly single-threaded: [`Nes::tick`] is the only
//! advancement operator, and it returns synchronously. Within one tick, the
//! PPU advances one dot, then the CPU advances one cycle (or OAM-DMA
//! consumes the cycle instead), then a pending NMI is delivered, then the
//! tick counter increments. No operation within a tick observes state
//! written later in the same tick.
//!
//! # Example
//!
//! ```no_run
//! use tinynes_core::Nes;
//!
//! let mut nes = Nes::new("game.nes").expect("failed to load ROM");
//! nes.step_frame();
//! let pixels = nes.screen();
//! assert_eq!(pixels.len(), tinynes_ppu::FRAME_SIZE);
//! ```

mod bus;
mod console;

pub use bus::ControllerState;
pub use console::{Nes, NesError};

pub use tinynes_cpu::disassemble::DisassembledLine;
pub use tinynes_mappers::{Cartridge, CartridgeError, Mirroring};

/// Screen geometry shared by the PPU's framebuffer and any host renderer.
pub mod screen {
    /// Framebuffer width in pixels.
    pub const WIDTH: usize = tinynes_ppu::FRAME_WIDTH;
    /// Framebuffer height in pixels.
    pub const HEIGHT: usize = tinynes_ppu::FRAME_HEIGHT;
    /// Total pixel count (`WIDTH * HEIGHT`).
    pub const PIXELS: usize = tinynes_ppu::FRAME_SIZE;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nrom_image() -> Vec<u8> {
        let mut data = vec![0x4E, 0x45, 0x53, 0x1A, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        data.extend(vec![0xEAu8; 32768]);
        data.extend(vec![0u8; 8192]);
        data
    }

    #[test]
    fn screen_constants_match_ppu_geometry() {
        assert_eq!(screen::WIDTH, 256);
        assert_eq!(screen::HEIGHT, 240);
        assert_eq!(screen::PIXELS, 256 * 240);
    }

    #[test]
    fn nes_from_rom_bytes_boots() {
        let nes = Nes::from_rom_bytes(&nrom_image()).unwrap();
        assert_eq!(nes.screen().len(), screen::PIXELS);
    }
}
