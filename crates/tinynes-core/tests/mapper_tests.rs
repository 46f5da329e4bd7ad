//! Integration tests for cartridge loading and NROM bus wiring.

use tinynes_core::Nes;

fn nrom_image(prg_banks: u8, chr_banks: u8, flags6: u8) -> Vec<u8> {
    let mut data = vec![
        0x4E, 0x45, 0x53, 0x1A, prg_banks, chr_banks, flags6, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ];
    let mut prg = vec![0xEAu8; 16384 * prg_banks as usize];
    let reset = prg.len() - 4;
    prg[reset] = 0x00;
    prg[reset + 1] = 0x80;
    data.extend(prg);
    data.extend(vec![0u8; 8192 * chr_banks.max(1) as usize]);
    data
}

#[test]
fn loads_single_bank_nrom_mirrored_to_both_halves() {
    let nes = Nes::from_rom_bytes(&nrom_image(1, 1, 0x00)).unwrap();
    assert_eq!(nes.peek(0x8000), nes.peek(0xC000));
}

#[test]
fn loads_double_bank_nrom_without_mirroring() {
    let rom = nrom_image(2, 1, 0x00);
    let nes = Nes::from_rom_bytes(&rom).unwrap();
    assert_eq!(nes.cpu().pc, 0x8000);
}

#[test]
fn vertical_mirroring_flag_is_reported() {
    let nes = Nes::from_rom_bytes(&nrom_image(1, 1, 0x01)).unwrap();
    assert_eq!(nes.disassemble(0x8000, 0x8000)[0].address, 0x8000);
}

#[test]
fn rejects_truncated_image() {
    let mut rom = nrom_image(1, 1, 0x00);
    rom.truncate(20);
    assert!(Nes::from_rom_bytes(&rom).is_err());
}

#[test]
fn rejects_bad_magic() {
    let mut rom = nrom_image(1, 1, 0x00);
    rom[0] = 0x00;
    assert!(Nes::from_rom_bytes(&rom).is_err());
}

#[test]
fn cpu_can_run_across_a_full_frame_on_a_fresh_cartridge() {
    let mut nes = Nes::from_rom_bytes(&nrom_image(2, 1, 0x00)).unwrap();
    nes.step_frame();
    assert!(nes.tick_count() > 0);
}

#[test]
fn reattaching_a_cartridge_resets_the_machine() {
    let mut nes = Nes::from_rom_bytes(&nrom_image(1, 1, 0x00)).unwrap();
    for _ in 0..1000 {
        nes.tick();
    }
    let cartridge = tinynes_core::Cartridge::from_bytes(&nrom_image(2, 1, 0x00))
        .expect("valid nrom image");
    nes.attach_cartridge(cartridge);
    assert_eq!(nes.tick_count(), 0);
    assert_eq!(nes.cpu().pc, 0x8000);
}
