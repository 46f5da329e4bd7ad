//! NES system bus: RAM, PPU/APU register decoding, controllers, and OAM-DMA.
//!
//! - $0000-$1FFF: 2 KiB internal RAM, mirrored every 2 KiB
//! - $2000-$3FFF: PPU registers, mirrored every 8 bytes
//! - $4000-$4013, $4015, $4017: APU stub registers
//! - $4014: OAM-DMA trigger (write-only)
//! - $4016-$4017: controller ports (read), shared strobe (write to $4016)
//! - $4020-$FFFF: cartridge space, dispatched through the mapper

use tinynes_apu::Apu;
use tinynes_cpu::Bus;
use tinynes_mappers::Cartridge;
use tinynes_ppu::Ppu;

/// Controller input state: one byte per port.
///
/// Bit order matches the shift-register read contract: bit 7 = A, bit 6 = B,
/// bit 5 = Select, bit 4 = Start, bits 3-0 = Up/Down/Left/Right. Each read of
/// the port shifts the latched snapshot left one bit and returns the old
/// bit 7.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerState {
    /// Current button states.
    pub buttons: u8,
}

impl ControllerState {
    /// A button mask.
    pub const A: u8 = 0x80;
    /// B button mask.
    pub const B: u8 = 0x40;
    /// Select button mask.
    pub const SELECT: u8 = 0x20;
    /// Start button mask.
    pub const START: u8 = 0x10;
    /// Up button mask.
    pub const UP: u8 = 0x08;
    /// Down button mask.
    pub const DOWN: u8 = 0x04;
    /// Left button mask.
    pub const LEFT: u8 = 0x02;
    /// Right button mask.
    pub const RIGHT: u8 = 0x01;
}

/// OAM-DMA tick-driven state machine.
///
/// Writing a page to $4014 halts the CPU and copies 256 bytes from
/// `page << 8` into OAM over 512 bus cycles at the CPU cadence, preceded by
/// one alignment cycle (two if the transfer starts on an odd CPU cycle).
#[derive(Debug, Clone, Copy, Default)]
struct OamDma {
    active: bool,
    page: u8,
    addr: u8,
    data: u8,
    wait: u8,
    read_phase: bool,
}

impl OamDma {
    fn start(&mut self, page: u8, started_on_odd_cycle: bool) {
        self.active = true;
        self.page = page;
        self.addr = 0;
        self.wait = if started_on_odd_cycle { 2 } else { 1 };
        self.read_phase = true;
    }
}

/// NES system bus connecting RAM, PPU, APU, controllers, and the cartridge.
pub struct NesBus {
    ram: [u8; 2048],
    ppu: Ppu,
    apu: Apu,
    cartridge: Cartridge,
    controller1: ControllerState,
    controller2: ControllerState,
    controller1_shift: u8,
    controller2_shift: u8,
    controller_strobe: bool,
    dma: OamDma,
    /// Count of CPU-cadence cycles (every third bus tick), used for OAM-DMA
    /// alignment and APU/mapper clocking.
    cpu_cycle_count: u64,
    last_bus_value: u8,
}

impl NesBus {
    /// Build a bus around an already-loaded cartridge.
    pub fn new(cartridge: Cartridge) -> Self {
        let mirroring = cartridge.mirroring();
        Self {
            ram: [0; 2048],
            ppu: Ppu::new(mirroring),
            apu: Apu::new(),
            cartridge,
            controller1: ControllerState::default(),
            controller2: ControllerState::default(),
            controller1_shift: 0,
            controller2_shift: 0,
            controller_strobe: false,
            dma: OamDma::default(),
            cpu_cycle_count: 0,
            last_bus_value: 0,
        }
    }

    /// Replace the attached cartridge, resetting downstream PPU mirroring.
    pub fn attach_cartridge(&mut self, cartridge: Cartridge) {
        self.ppu.set_mirroring(cartridge.mirroring());
        self.cartridge = cartridge;
    }

    /// Reset the bus, PPU, APU, and cartridge to power-up state.
    pub fn reset(&mut self) {
        self.cartridge.reset();
        self.ppu.reset();
        self.apu.reset();
        self.controller1_shift = 0;
        self.controller2_shift = 0;
        self.controller_strobe = false;
        self.dma = OamDma::default();
        self.cpu_cycle_count = 0;
        self.last_bus_value = 0;
        log::debug!("bus reset");
    }

    /// Controller 1 state.
    #[must_use]
    pub fn controller1(&self) -> ControllerState {
        self.controller1
    }

    /// Controller 2 state.
    #[must_use]
    pub fn controller2(&self) -> ControllerState {
        self.controller2
    }

    /// Mutable access to both controllers.
    pub fn controllers_mut(&mut self) -> (&mut ControllerState, &mut ControllerState) {
        (&mut self.controller1, &mut self.controller2)
    }

    /// The PPU, for screen/pattern-table access.
    #[must_use]
    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    /// Mutable access to the PPU, for clearing the frame-complete latch.
    pub fn ppu_mut(&mut self) -> &mut Ppu {
        &mut self.ppu
    }

    /// Render a 128x128 pattern table for debugging.
    #[must_use]
    pub fn pattern_table(&self, which: u8, palette: u8) -> Vec<u32> {
        let cartridge = &self.cartridge;
        self.ppu
            .pattern_table(which, palette, |addr| cartridge.ppu_read(addr))
    }

    /// The APU, for pulling audio samples.
    #[must_use]
    pub fn apu(&self) -> &Apu {
        &self.apu
    }

    /// Advance the PPU by one dot, forwarding CHR reads to the cartridge.
    pub(crate) fn tick_ppu(&mut self) {
        let cartridge = &self.cartridge;
        self.ppu.tick(|addr| cartridge.ppu_read(addr));
    }

    /// If the PPU's NMI latch is set, lower it and report true.
    pub(crate) fn take_nmi_latch(&mut self) -> bool {
        if self.ppu.nmi() {
            self.ppu.set_nmi(false);
            true
        } else {
            false
        }
    }

    /// True while an OAM-DMA transfer is in progress; the CPU does not tick
    /// while this holds.
    #[must_use]
    pub(crate) fn dma_active(&self) -> bool {
        self.dma.active
    }

    /// Consume one CPU-cadence cycle of the in-flight OAM-DMA transfer.
    pub(crate) fn tick_dma(&mut self) {
        if self.dma.wait > 0 {
            self.dma.wait -= 1;
            return;
        }

        if self.dma.read_phase {
            let addr = (u16::from(self.dma.page) << 8) | u16::from(self.dma.addr);
            self.dma.data = <Self as Bus>::read(self, addr);
        } else {
            self.ppu.oam_dma_write(self.dma.addr, self.dma.data);
            self.dma.addr = self.dma.addr.wrapping_add(1);
            if self.dma.addr == 0 {
                self.dma.active = false;
            }
        }
        self.dma.read_phase = !self.dma.read_phase;
    }

    /// Clock the APU stub by one CPU cycle.
    pub(crate) fn tick_apu(&mut self) {
        self.apu.clock();
    }

    /// Advance the CPU-cadence cycle counter. Called once per CPU-cadence
    /// bus tick, whether the cycle was spent on a CPU instruction or on
    /// OAM-DMA, since DMA alignment depends on the real elapsed cycle count.
    pub(crate) fn advance_cpu_cycle_count(&mut self) {
        self.cpu_cycle_count = self.cpu_cycle_count.wrapping_add(1);
    }

    /// The running count of CPU-cadence cycles (every third bus tick).
    #[must_use]
    pub(crate) fn cpu_cycle_count(&self) -> u64 {
        self.cpu_cycle_count
    }

    fn read_controller(&mut self, port: u8) -> u8 {
        if self.controller_strobe {
            let buttons = if port == 0 {
                self.controller1.buttons
            } else {
                self.controller2.buttons
            };
            return (buttons >> 7) & 1;
        }
        let shift = if port == 0 {
            &mut self.controller1_shift
        } else {
            &mut self.controller2_shift
        };
        let bit = (*shift >> 7) & 1;
        *shift <<= 1;
        bit
    }

    fn write_controller_strobe(&mut self, value: u8) {
        let new_strobe = value & 1 != 0;
        if !new_strobe {
            self.controller1_shift = self.controller1.buttons;
            self.controller2_shift = self.controller2.buttons;
        }
        self.controller_strobe = new_strobe;
    }

    /// Read memory without side effects, for the disassembler and debuggers.
    #[must_use]
    pub fn peek(&self, addr: u16) -> u8 {
        <Self as Bus>::peek(self, addr)
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u16) -> u8 {
        let value = match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            0x2000..=0x3FFF => {
                let cartridge = &self.cartridge;
                self.ppu
                    .cpu_read(addr & 0x0007, |a| cartridge.ppu_read(a))
            }
            0x4000..=0x4013 | 0x4018..=0x401F => self.last_bus_value,
            0x4015 => self.apu.read_status(),
            0x4016 => self.read_controller(0),
            0x4017 => self.read_controller(1),
            0x4014 => self.last_bus_value,
            0x4020..=0xFFFF => self
                .cartridge
                .cpu_read(addr)
                .unwrap_or(self.last_bus_value),
        };
        self.last_bus_value = value;
        value
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.last_bus_value = value;
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize] = value,
            0x2000..=0x3FFF => {
                let cartridge = &mut self.cartridge;
                self.ppu
                    .cpu_write(addr & 0x0007, value, |a, v| cartridge.ppu_write(a, v));
            }
            0x4000..=0x4013 | 0x4015 | 0x4017 => self.apu.write(addr, value),
            0x4014 => {
                let started_on_odd_cycle = self.cpu_cycle_count % 2 == 1;
                self.dma.start(value, started_on_odd_cycle);
            }
            0x4016 => self.write_controller_strobe(value),
            0x4018..=0x401F => {}
            0x4020..=0xFFFF => self.cartridge.cpu_write(addr, value),
        }
    }

    fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            0x2000..=0x3FFF => self.last_bus_value,
            0x4000..=0x401F => self.last_bus_value,
            0x4020..=0xFFFF => self
                .cartridge
                .cpu_read(addr)
                .unwrap_or(self.last_bus_value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nrom_image() -> Vec<u8> {
        let mut data = vec![0x4E, 0x45, 0x53, 0x1A, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        data.extend(vec![0xEA; 32768]);
        data.extend(vec![0u8; 8192]);
        data
    }

    fn test_bus() -> NesBus {
        let cart = Cartridge::from_bytes(&nrom_image()).unwrap();
        NesBus::new(cart)
    }

    #[test]
    fn ram_mirrors_every_2kib() {
        let mut bus = test_bus();
        Bus::write(&mut bus, 0x0000, 0x42);
        assert_eq!(Bus::read(&mut bus, 0x0800), 0x42);
        assert_eq!(Bus::read(&mut bus, 0x1000), 0x42);
        assert_eq!(Bus::read(&mut bus, 0x1800), 0x42);
    }

    #[test]
    fn controller_strobe_and_shift_read() {
        let mut bus = test_bus();
        bus.controller1.buttons = ControllerState::A | ControllerState::DOWN;

        Bus::write(&mut bus, 0x4016, 1);
        Bus::write(&mut bus, 0x4016, 0);

        let bits: Vec<u8> = (0..8).map(|_| Bus::read(&mut bus, 0x4016) & 1).collect();
        assert_eq!(bits, [1, 0, 0, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn controller_read_returns_only_zero_bits_after_eight_reads() {
        let mut bus = test_bus();
        bus.controller1.buttons = 0xFF;
        Bus::write(&mut bus, 0x4016, 1);
        Bus::write(&mut bus, 0x4016, 0);
        for _ in 0..8 {
            Bus::read(&mut bus, 0x4016);
        }
        assert_eq!(Bus::read(&mut bus, 0x4016) & 1, 0);
    }

    #[test]
    fn oam_dma_transfers_256_bytes_in_513_or_514_cycles() {
        let mut bus = test_bus();
        for i in 0..256u16 {
            Bus::write(&mut bus, 0x0200 + i, i as u8);
        }

        Bus::write(&mut bus, 0x4014, 0x02);
        assert!(bus.dma_active());

        let mut cycles = 0;
        while bus.dma_active() {
            bus.tick_dma();
            cycles += 1;
        }
        assert!(cycles == 513 || cycles == 514);
        assert_eq!(bus.ppu().screen().len(), tinynes_ppu::FRAME_SIZE);
    }

    #[test]
    fn oam_dma_starting_on_odd_cycle_takes_one_extra_wait_cycle() {
        let mut even = test_bus();
        Bus::write(&mut even, 0x4014, 0x02);
        let mut even_cycles = 0;
        while even.dma_active() {
            even.tick_dma();
            even_cycles += 1;
        }

        let mut odd = test_bus();
        odd.cpu_cycle_count = 1;
        Bus::write(&mut odd, 0x4014, 0x02);
        let mut odd_cycles = 0;
        while odd.dma_active() {
            odd.tick_dma();
            odd_cycles += 1;
        }

        assert_eq!(odd_cycles, even_cycles + 1);
    }

    #[test]
    fn reset_clears_dma_and_cycle_count() {
        let mut bus = test_bus();
        Bus::write(&mut bus, 0x4014, 0x02);
        bus.cpu_cycle_count = 10;

        bus.reset();

        assert!(!bus.dma_active());
        assert_eq!(bus.cpu_cycle_count(), 0);
    }

    #[test]
    fn peek_has_no_side_effects_on_ram() {
        let mut bus = test_bus();
        Bus::write(&mut bus, 0x0100, 0x77);
        assert_eq!(bus.peek(0x0100), 0x77);
        assert_eq!(bus.peek(0x0900), 0x77);
    }

    #[test]
    fn cartridge_space_reads_prg_rom() {
        let mut bus = test_bus();
        assert_eq!(Bus::read(&mut bus, 0x8000), 0xEA);
    }
}
