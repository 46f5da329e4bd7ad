//! Cartridge mapper dispatch.
//!
//! A mapper translates a guest CPU or PPU address into an offset within the
//! cartridge's PRG or CHR memory, or reports that it does not claim the
//! address at all. Real cartridges implement this with bank-switching
//! hardware selected by writes into the CPU's ROM window; this crate models
//! only Mapper 000 (NROM), which has no banking registers at all, but the
//! dispatch shape is built to admit more mappers as additional enum
//! variants without touching the call sites in `Cartridge`.

use crate::Rom;

/// Nametable mirroring mode, as reported by the cartridge to the PPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mirroring {
    /// Horizontal mirroring: the two nametables stack vertically on screen.
    #[default]
    Horizontal,
    /// Vertical mirroring: the two nametables sit side by side on screen.
    Vertical,
    /// Single screen, using the lower physical nametable for all four slots.
    OneScreenLo,
    /// Single screen, using the upper physical nametable for all four slots.
    OneScreenHi,
}

/// State for Mapper 000 (NROM): no bank-switching registers at all.
#[derive(Debug, Clone, Copy)]
pub struct NromState {
    /// Mask applied to a $8000-$FFFF address to index into `prg_rom`.
    ///
    /// `0x3FFF` for 16 KiB PRG (mirrors the single bank across the CPU's
    /// 32 KiB ROM window); `0x7FFF` for 32 KiB PRG (no mirroring).
    prg_mask: u16,
    /// True when the cartridge has no CHR-ROM and PPU writes should land in
    /// writable CHR-RAM instead of being ignored.
    chr_is_ram: bool,
}

/// A cartridge's mapper, as a closed tagged variant rather than a trait
/// object: there is exactly one implemented mapper, and adding another
/// later is a new enum arm, not a new allocation site.
#[derive(Debug, Clone, Copy)]
pub enum Mapper {
    /// Mapper 000, NROM.
    Nrom(NromState),
}

impl Mapper {
    /// Construct the mapper named by a parsed ROM header.
    ///
    /// # Errors
    ///
    /// Returns `RomError::UnsupportedMapper` for any mapper number other
    /// than 0.
    pub fn new(rom: &Rom) -> Result<Self, crate::RomError> {
        match rom.header.mapper_number {
            0 => Ok(Self::Nrom(NromState {
                prg_mask: if rom.prg_rom.len() > 16384 {
                    0x7FFF
                } else {
                    0x3FFF
                },
                chr_is_ram: rom.chr_rom.is_empty(),
            })),
            n => Err(crate::RomError::UnsupportedMapper(n)),
        }
    }

    /// Reset mapper-internal state (bank registers, IRQ counters) to power-on
    /// values. NROM has none, so this is a no-op.
    pub fn reset(&mut self) {
        match self {
            Self::Nrom(_) => {}
        }
    }

    /// Translate a CPU read address into a PRG-ROM offset, if this mapper
    /// claims it.
    #[must_use]
    pub fn cpu_read(&self, addr: u16) -> Option<u32> {
        match self {
            Self::Nrom(state) => {
                if addr >= 0x8000 {
                    Some(u32::from(addr & state.prg_mask))
                } else {
                    None
                }
            }
        }
    }

    /// Translate a CPU write address into a PRG-ROM offset, if this mapper
    /// has a writable register or PRG-RAM at that address. NROM has neither,
    /// so CPU writes are never accepted.
    #[must_use]
    pub fn cpu_write(&mut self, _addr: u16, _value: u8) -> Option<u32> {
        match self {
            Self::Nrom(_) => None,
        }
    }

    /// Translate a PPU read address ($0000-$1FFF) into a CHR offset.
    #[must_use]
    pub fn ppu_read(&self, addr: u16) -> Option<u32> {
        match self {
            Self::Nrom(_) => {
                if addr <= 0x1FFF {
                    Some(u32::from(addr))
                } else {
                    None
                }
            }
        }
    }

    /// Translate a PPU write address into a CHR offset, accepted only when
    /// the cartridge has CHR-RAM.
    #[must_use]
    pub fn ppu_write(&mut self, addr: u16) -> Option<u32> {
        match self {
            Self::Nrom(state) => {
                if addr <= 0x1FFF && state.chr_is_ram {
                    Some(u32::from(addr))
                } else {
                    None
                }
            }
        }
    }

    /// The iNES mapper number this variant implements.
    #[must_use]
    pub fn number(&self) -> u16 {
        match self {
            Self::Nrom(_) => 0,
        }
    }

    /// Human-readable mapper name, for logging and debug output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nrom(_) => "NROM",
        }
    }
}
