//! The top-level NES machine: owns the CPU and bus, and drives the
//! tick-by-tick master loop.

use std::path::Path;

use tinynes_cpu::disassemble::{self, DisassembledLine};
use tinynes_cpu::Cpu;
use tinynes_mappers::{Cartridge, CartridgeError};

use crate::bus::{ControllerState, NesBus};

/// Error constructing or loading into an [`Nes`].
#[derive(Debug, thiserror::Error)]
pub enum NesError {
    /// The ROM could not be loaded.
    #[error("cartridge error: {0}")]
    Cartridge(#[from] CartridgeError),
}

/// A complete NES machine: CPU, PPU, APU stub, cartridge, and controllers.
pub struct Nes {
    cpu: Cpu,
    bus: NesBus,
    tick_count: u64,
}

impl Nes {
    /// Load a cartridge from disk and power on.
    ///
    /// # Errors
    ///
    /// Returns [`NesError`] if the ROM file cannot be read or parsed.
    pub fn new(rom_path: impl AsRef<Path>) -> Result<Self, NesError> {
        let cartridge = Cartridge::load(rom_path)?;
        Ok(Self::with_cartridge(cartridge))
    }

    /// Parse a cartridge from an in-memory iNES image and power on.
    ///
    /// # Errors
    ///
    /// Returns [`NesError`] if the image is malformed or names an
    /// unsupported mapper.
    pub fn from_rom_bytes(data: &[u8]) -> Result<Self, NesError> {
        let cartridge = Cartridge::from_bytes(data).map_err(CartridgeError::InvalidImage)?;
        Ok(Self::with_cartridge(cartridge))
    }

    /// Build a machine around an already-loaded cartridge.
    #[must_use]
    pub fn with_cartridge(cartridge: Cartridge) -> Self {
        let mut machine = Self {
            cpu: Cpu::new(),
            bus: NesBus::new(cartridge),
            tick_count: 0,
        };
        machine.cpu.reset(&mut machine.bus);
        machine
    }

    /// Swap in a new cartridge and reset.
    pub fn attach_cartridge(&mut self, cartridge: Cartridge) {
        self.bus.attach_cartridge(cartridge);
        self.reset();
    }

    /// Reset the cartridge, CPU, and PPU, and zero the tick counter.
    pub fn reset(&mut self) {
        self.bus.reset();
        self.cpu.reset(&mut self.bus);
        self.tick_count = 0;
    }

    /// Advance the machine by one bus cycle.
    ///
    /// Ordering: the PPU advances one dot, then either an OAM-DMA cycle or a
    /// CPU cycle runs (on cycles where `tick_count % 3 == 0`), then a
    /// pending NMI is delivered, then the tick counter increments.
    pub fn tick(&mut self) {
        self.bus.tick_ppu();

        if self.tick_count % 3 == 0 {
            if self.bus.dma_active() {
                self.bus.tick_dma();
            } else {
                self.cpu.tick(&mut self.bus);
            }
            self.bus.tick_apu();
            self.bus.advance_cpu_cycle_count();
        }

        if self.bus.take_nmi_latch() {
            log::trace!("nmi latch observed, delivering to cpu");
            self.cpu.nmi(&mut self.bus);
        }

        self.tick_count = self.tick_count.wrapping_add(1);
    }

    /// Run until the current frame completes, then clear the latch.
    pub fn step_frame(&mut self) {
        while !self.bus.ppu().frame_complete() {
            self.tick();
        }
        self.bus.ppu_mut().clear_frame_complete();
    }

    /// Run until the in-flight CPU instruction finishes.
    pub fn step_instruction(&mut self) {
        self.tick();
        while !self.cpu.is_complete() {
            self.tick();
        }
    }

    /// The rendered framebuffer, 256x240 pixels, row-major, RGBA8888.
    #[must_use]
    pub fn screen(&self) -> &[u32] {
        self.bus.ppu().screen()
    }

    /// Whether the PPU has completed a frame since the last clear.
    #[must_use]
    pub fn frame_complete(&self) -> bool {
        self.bus.ppu().frame_complete()
    }

    /// Clear the frame-complete latch.
    pub fn clear_frame_complete(&mut self) {
        self.bus.ppu_mut().clear_frame_complete();
    }

    /// Render one 128x128 pattern table for debugging, using the given
    /// palette selection.
    #[must_use]
    pub fn pattern_table(&self, which: u8, palette: u8) -> Vec<u32> {
        self.bus.pattern_table(which, palette)
    }

    /// Mutable access to both controller ports.
    pub fn controllers(&mut self) -> (&mut ControllerState, &mut ControllerState) {
        self.bus.controllers_mut()
    }

    /// Controller 1 state.
    #[must_use]
    pub fn controller1(&self) -> ControllerState {
        self.bus.controller1()
    }

    /// Controller 2 state.
    #[must_use]
    pub fn controller2(&self) -> ControllerState {
        self.bus.controller2()
    }

    /// Disassemble the address range `[start, stop]` without disturbing
    /// machine state.
    #[must_use]
    pub fn disassemble(&self, start: u16, stop: u16) -> Vec<DisassembledLine> {
        disassemble::disassemble(&self.bus, start, stop)
    }

    /// Read memory without side effects.
    #[must_use]
    pub fn peek(&self, addr: u16) -> u8 {
        self.bus.peek(addr)
    }

    /// Reference to the CPU, for debugging/tracing.
    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Total bus ticks since the last reset.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nrom_image_with_reset_vector(reset_lo: u8, reset_hi: u8) -> Vec<u8> {
        let mut data = vec![0x4E, 0x45, 0x53, 0x1A, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut prg = vec![0xEAu8; 32768];
        prg[0x7FFC] = reset_lo;
        prg[0x7FFD] = reset_hi;
        data.extend(prg);
        data.extend(vec![0u8; 8192]);
        data
    }

    fn test_nes() -> Nes {
        Nes::from_rom_bytes(&nrom_image_with_reset_vector(0x00, 0x80)).unwrap()
    }

    #[test]
    fn reset_vector_loads_into_pc() {
        let nes = test_nes();
        assert_eq!(nes.cpu().pc, 0x8000);
    }

    #[test]
    fn ticking_advances_tick_count() {
        let mut nes = test_nes();
        for _ in 0..30 {
            nes.tick();
        }
        assert_eq!(nes.tick_count(), 30);
    }

    #[test]
    fn step_instruction_executes_a_full_nop() {
        let mut nes = test_nes();
        nes.step_instruction();
        assert!(nes.cpu().pc > 0x8000);
    }

    #[test]
    fn step_frame_produces_a_complete_frame() {
        let mut nes = test_nes();
        nes.step_frame();
        assert!(!nes.frame_complete());
        assert_eq!(nes.screen().len(), crate::screen::PIXELS);
    }

    #[test]
    fn controller_state_round_trips() {
        let mut nes = test_nes();
        {
            let (p1, _p2) = nes.controllers();
            p1.buttons = ControllerState::A | ControllerState::START;
        }
        assert_eq!(
            nes.controller1().buttons,
            ControllerState::A | ControllerState::START
        );
    }

    #[test]
    fn disassemble_reads_without_side_effects() {
        let nes = test_nes();
        let lines = nes.disassemble(0x8000, 0x8002);
        assert_eq!(lines[0].text, "NOP");
    }

    #[test]
    fn reset_restores_tick_count_and_pc() {
        let mut nes = test_nes();
        for _ in 0..100 {
            nes.tick();
        }
        nes.reset();
        assert_eq!(nes.tick_count(), 0);
        assert_eq!(nes.cpu().pc, 0x8000);
    }
}
