//! Cartridge: owns PRG/CHR memory and the mapper, and loads ROM images.

use std::path::Path;

use crate::{Mapper, Mirroring, Rom, RomError};

/// Errors that can occur while loading a cartridge.
#[derive(Debug, thiserror::Error)]
pub enum CartridgeError {
    /// The ROM file could not be read from disk.
    #[error("could not read ROM file: {0}")]
    Io(#[from] std::io::Error),
    /// The file's contents are not a valid iNES image.
    #[error("invalid ROM image: {0}")]
    InvalidImage(#[from] RomError),
}

/// A loaded NES cartridge: PRG-ROM, CHR-ROM or CHR-RAM, and a mapper.
#[derive(Debug, Clone)]
pub struct Cartridge {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    mapper: Mapper,
    mirroring: Mirroring,
}

impl Cartridge {
    /// Load a cartridge from a `.nes` file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`CartridgeError::Io`] if the file cannot be read, or
    /// [`CartridgeError::InvalidImage`] if its contents are not a valid
    /// iNES image or declare an unsupported mapper.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CartridgeError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data).map_err(CartridgeError::InvalidImage)
    }

    /// Parse a cartridge from an in-memory `.nes` image.
    ///
    /// # Errors
    ///
    /// Returns [`RomError`] if the image is malformed or names an
    /// unsupported mapper.
    pub fn from_bytes(data: &[u8]) -> Result<Self, RomError> {
        let rom = Rom::load(data)?;
        let mapper = Mapper::new(&rom)?;
        log::info!(
            "attached cartridge: mapper {} ({}), {:?} mirroring",
            mapper.number(),
            mapper.name(),
            rom.header.mirroring
        );

        let chr = if rom.chr_rom.is_empty() {
            vec![0; 8192]
        } else {
            rom.chr_rom
        };

        Ok(Self {
            prg_rom: rom.prg_rom,
            chr,
            mapper,
            mirroring: rom.header.mirroring,
        })
    }

    /// Reset mapper-internal state.
    pub fn reset(&mut self) {
        self.mapper.reset();
    }

    /// Read a byte from cartridge space at a CPU address ($4020-$FFFF).
    /// Returns `None` if no mapper-claimed PRG memory exists at this
    /// address (open bus).
    #[must_use]
    pub fn cpu_read(&self, addr: u16) -> Option<u8> {
        self.mapper
            .cpu_read(addr)
            .map(|offset| self.prg_rom[offset as usize % self.prg_rom.len()])
    }

    /// Write a byte to cartridge space at a CPU address. NROM has no
    /// writable PRG window, so this is always a no-op.
    pub fn cpu_write(&mut self, addr: u16, value: u8) {
        let _ = self.mapper.cpu_write(addr, value);
    }

    /// Read a byte from the pattern-table address space ($0000-$1FFF).
    #[must_use]
    pub fn ppu_read(&self, addr: u16) -> u8 {
        match self.mapper.ppu_read(addr) {
            Some(offset) => self.chr[offset as usize % self.chr.len()],
            None => 0,
        }
    }

    /// Write a byte into CHR-RAM, if present; ignored for CHR-ROM.
    pub fn ppu_write(&mut self, addr: u16, value: u8) {
        if let Some(offset) = self.mapper.ppu_write(addr) {
            let len = self.chr.len();
            self.chr[offset as usize % len] = value;
        }
    }

    /// Current nametable mirroring mode.
    #[must_use]
    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nrom_256_image() -> Vec<u8> {
        let mut data = vec![0x4E, 0x45, 0x53, 0x1A, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        data.extend((0..32768).map(|i| (i & 0xFF) as u8));
        data.extend((0..8192).map(|i| (i & 0xFF) as u8));
        data
    }

    #[test]
    fn loads_and_reads_prg() {
        let cart = Cartridge::from_bytes(&nrom_256_image()).unwrap();
        assert_eq!(cart.cpu_read(0x8000), Some(0x00));
        assert_eq!(cart.cpu_read(0x8001), Some(0x01));
        assert_eq!(cart.cpu_read(0x4000), None);
    }

    #[test]
    fn chr_ram_is_writable_when_no_chr_rom() {
        let mut data = vec![0x4E, 0x45, 0x53, 0x1A, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        data.extend([0u8; 16384]);
        let mut cart = Cartridge::from_bytes(&data).unwrap();
        cart.ppu_write(0x0100, 0xAB);
        assert_eq!(cart.ppu_read(0x0100), 0xAB);
    }

    #[test]
    fn unsupported_mapper_is_rejected() {
        let mut data = vec![0x4E, 0x45, 0x53, 0x1A, 1, 1, 0x40, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        data.extend([0u8; 16384]);
        data.extend([0u8; 8192]);
        assert!(matches!(
            Cartridge::from_bytes(&data),
            Err(RomError::UnsupportedMapper(4))
        ));
    }
}
