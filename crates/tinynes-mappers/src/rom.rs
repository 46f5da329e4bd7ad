//! iNES ROM file format parsing.
//!
//! This module handles loading and parsing NES ROM files in the original
//! iNES container format: a fixed 16-byte header followed by an optional
//! 512-byte trainer, the PRG-ROM banks, and the CHR-ROM banks.

use crate::Mirroring;

/// Errors that can occur when parsing an iNES ROM file.
#[derive(Debug, thiserror::Error)]
pub enum RomError {
    /// ROM file is too small to contain a valid header.
    #[error("ROM file too small: expected at least 16 bytes, got {0}")]
    FileTooSmall(usize),

    /// Invalid iNES magic number in header.
    #[error("Invalid iNES magic number: expected [4E 45 53 1A], got {0:02X?}")]
    InvalidMagic([u8; 4]),

    /// PRG-ROM size declared in the header was zero.
    #[error("Invalid PRG-ROM size: {0}")]
    InvalidPrgSize(String),

    /// ROM file size doesn't match the header's declared bank counts.
    #[error("ROM file size mismatch: expected {expected} bytes, got {actual} bytes")]
    SizeMismatch {
        /// Expected file size in bytes.
        expected: usize,
        /// Actual file size in bytes.
        actual: usize,
    },

    /// The declared mapper number has no implementation in this crate.
    #[error("Unsupported mapper: {0}")]
    UnsupportedMapper(u16),
}

/// iNES v1 ROM header (the 16 bytes at the start of every `.nes` file).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RomHeader {
    /// PRG-ROM size in bytes (always a multiple of 16 KiB).
    pub prg_rom_size: usize,
    /// CHR-ROM size in bytes (0 indicates CHR-RAM).
    pub chr_rom_size: usize,
    /// iNES mapper number.
    pub mapper_number: u16,
    /// Nametable mirroring mode declared by the header.
    pub mirroring: Mirroring,
    /// Battery-backed PRG-RAM present.
    pub has_battery: bool,
    /// 512-byte trainer present before PRG-ROM.
    pub has_trainer: bool,
}

impl RomHeader {
    /// iNES magic number: "NES" followed by MS-DOS EOF.
    const MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];

    /// Parse a ROM header from the first 16 bytes of a `.nes` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is too short, the magic number does not
    /// match, or the declared PRG-ROM size is zero.
    pub fn parse(data: &[u8]) -> Result<Self, RomError> {
        if data.len() < 16 {
            return Err(RomError::FileTooSmall(data.len()));
        }

        let magic = [data[0], data[1], data[2], data[3]];
        if magic != Self::MAGIC {
            return Err(RomError::InvalidMagic(magic));
        }

        let prg_rom_size = data[4] as usize * 16384;
        let chr_rom_size = data[5] as usize * 8192;
        if prg_rom_size == 0 {
            return Err(RomError::InvalidPrgSize(
                "PRG-ROM size cannot be 0".to_string(),
            ));
        }

        let flags6 = data[6];
        let flags7 = data[7];
        let mapper_number = u16::from((flags7 & 0xF0) | (flags6 >> 4));
        let mirroring = if (flags6 & 0x01) != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };
        let has_battery = (flags6 & 0x02) != 0;
        let has_trainer = (flags6 & 0x04) != 0;

        Ok(Self {
            prg_rom_size,
            chr_rom_size,
            mapper_number,
            mirroring,
            has_battery,
            has_trainer,
        })
    }
}

/// A parsed NES ROM image: header plus raw PRG/CHR bank data.
#[derive(Debug, Clone)]
pub struct Rom {
    /// Parsed header.
    pub header: RomHeader,
    /// 512-byte trainer data, if the header declared one present.
    pub trainer: Option<Vec<u8>>,
    /// PRG-ROM bank data.
    pub prg_rom: Vec<u8>,
    /// CHR-ROM bank data; empty when the cartridge uses CHR-RAM instead.
    pub chr_rom: Vec<u8>,
}

impl Rom {
    /// Parse a complete `.nes` file image.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is invalid or the file is truncated
    /// relative to the bank counts the header declares.
    pub fn load(data: &[u8]) -> Result<Self, RomError> {
        let header = RomHeader::parse(data)?;
        let mut offset = 16;

        let trainer = if header.has_trainer {
            if data.len() < offset + 512 {
                return Err(RomError::FileTooSmall(data.len()));
            }
            let trainer_data = data[offset..offset + 512].to_vec();
            offset += 512;
            Some(trainer_data)
        } else {
            None
        };

        if data.len() < offset + header.prg_rom_size {
            return Err(RomError::SizeMismatch {
                expected: offset + header.prg_rom_size,
                actual: data.len(),
            });
        }
        let prg_rom = data[offset..offset + header.prg_rom_size].to_vec();
        offset += header.prg_rom_size;

        let chr_rom = if header.chr_rom_size > 0 {
            if data.len() < offset + header.chr_rom_size {
                return Err(RomError::SizeMismatch {
                    expected: offset + header.chr_rom_size,
                    actual: data.len(),
                });
            }
            data[offset..offset + header.chr_rom_size].to_vec()
        } else {
            Vec::new()
        };

        log::debug!(
            "loaded ROM: mapper {}, {} KiB PRG, {} KiB CHR, {:?}",
            header.mapper_number,
            header.prg_rom_size / 1024,
            header.chr_rom_size / 1024,
            header.mirroring
        );

        Ok(Self {
            header,
            trainer,
            prg_rom,
            chr_rom,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_header(prg_banks: u8, chr_banks: u8, mapper: u8, mirroring: u8, battery: bool) -> Vec<u8> {
        let mut header = vec![0x4E, 0x45, 0x53, 0x1A];
        header.push(prg_banks);
        header.push(chr_banks);
        header.push(((mapper & 0x0F) << 4) | mirroring | if battery { 0x02 } else { 0x00 });
        header.push(mapper & 0xF0);
        header.extend_from_slice(&[0; 8]);
        header
    }

    #[test]
    fn parses_valid_header() {
        let header = test_header(2, 1, 0, 0, false);
        let parsed = RomHeader::parse(&header).unwrap();
        assert_eq!(parsed.prg_rom_size, 32768);
        assert_eq!(parsed.chr_rom_size, 8192);
        assert_eq!(parsed.mapper_number, 0);
        assert_eq!(parsed.mirroring, Mirroring::Horizontal);
        assert!(!parsed.has_battery);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut header = test_header(1, 1, 0, 0, false);
        header[0] = 0x00;
        assert!(matches!(
            RomHeader::parse(&header),
            Err(RomError::InvalidMagic(_))
        ));
    }

    #[test]
    fn rejects_truncated_header() {
        assert!(matches!(
            RomHeader::parse(&[0x4E, 0x45, 0x53]),
            Err(RomError::FileTooSmall(3))
        ));
    }

    #[test]
    fn splits_mapper_number_across_both_flag_bytes() {
        let header = test_header(1, 1, 0x42, 0, false);
        assert_eq!(RomHeader::parse(&header).unwrap().mapper_number, 0x42);
    }

    #[test]
    fn vertical_mirroring_bit() {
        let header = test_header(1, 1, 0, 0x01, false);
        assert_eq!(
            RomHeader::parse(&header).unwrap().mirroring,
            Mirroring::Vertical
        );
    }

    #[test]
    fn battery_flag() {
        let header = test_header(1, 1, 0, 0, true);
        assert!(RomHeader::parse(&header).unwrap().has_battery);
    }

    #[test]
    fn loads_full_rom_image() {
        let mut data = test_header(1, 1, 0, 0, false);
        data.extend_from_slice(&[0x42; 16384]);
        data.extend_from_slice(&[0x55; 8192]);

        let rom = Rom::load(&data).unwrap();
        assert_eq!(rom.prg_rom.len(), 16384);
        assert_eq!(rom.chr_rom.len(), 8192);
        assert_eq!(rom.prg_rom[0], 0x42);
        assert_eq!(rom.chr_rom[0], 0x55);
    }

    #[test]
    fn loads_rom_with_trainer() {
        let mut header = test_header(1, 0, 0, 0, false);
        header[6] |= 0x04;

        let mut data = header;
        data.extend_from_slice(&[0xFF; 512]);
        data.extend_from_slice(&[0x42; 16384]);

        let rom = Rom::load(&data).unwrap();
        assert!(rom.header.has_trainer);
        assert_eq!(rom.trainer.unwrap().len(), 512);
    }

    #[test]
    fn rejects_truncated_body() {
        let mut data = test_header(2, 1, 0, 0, false);
        data.extend_from_slice(&[0x42; 1024]);
        assert!(matches!(Rom::load(&data), Err(RomError::SizeMismatch { .. })));
    }
}
