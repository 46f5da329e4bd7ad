//! The 256-entry opcode dispatch table.
//!
//! Each entry binds a mnemonic (for disassembly), an [`Operation`], an
//! [`AddrMode`], and the instruction's base cycle count. `Cpu::tick`
//! consults this table once per instruction boundary and dispatches
//! through a single `match` on `Operation` -- no function pointers, no
//! heap allocation, fully `const`-constructible.

use crate::addressing::AddrMode;

/// The operation performed by an instruction, independent of its addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Operation {
    Brk,
    Ora,
    Xxx,
    Asl,
    Php,
    Bpl,
    Clc,
    IllegalNop,
    Jsr,
    And,
    Bit,
    Rol,
    Plp,
    Bmi,
    Sec,
    Rti,
    Eor,
    Lsr,
    Pha,
    Jmp,
    Bvc,
    Cli,
    Rts,
    Adc,
    Ror,
    Pla,
    Bvs,
    Sei,
    Sta,
    Sty,
    Stx,
    Dey,
    Txa,
    Bcc,
    Tya,
    Txs,
    Ldy,
    Lda,
    Ldx,
    Tay,
    Tax,
    Bcs,
    Clv,
    Tsx,
    Cpy,
    Cmp,
    Dec,
    Iny,
    Dex,
    Bne,
    Cld,
    Cpx,
    Sbc,
    Inc,
    Inx,
    Nop,
    Beq,
    Sed,
}

/// One entry in the 256-entry opcode table.
#[derive(Debug, Clone, Copy)]
pub struct Instruction {
    /// Three-character mnemonic, used by the disassembler.
    pub mnemonic: &'static str,
    /// The operation this opcode performs.
    pub op: Operation,
    /// The addressing mode used to form the operand's effective address.
    pub mode: AddrMode,
    /// Base cycle count, before any addressing/operation extra-cycle bit.
    pub cycles: u8,
}

macro_rules! instr {
    ($mnemonic:literal, $op:ident, $mode:ident, $cycles:literal) => {
        Instruction {
            mnemonic: $mnemonic,
            op: Operation::$op,
            mode: AddrMode::$mode,
            cycles: $cycles,
        }
    };
}

/// The full 256-entry opcode table, indexed by opcode byte.
#[rustfmt::skip]
pub static OPCODE_TABLE: [Instruction; 256] = [
    instr!("BRK", Brk, Imp, 7), // 0x00
    instr!("ORA", Ora, Izx, 6), // 0x01
    instr!("???", Xxx, Imp, 2), // 0x02
    instr!("???", Xxx, Imp, 2), // 0x03
    instr!("???", Xxx, Imp, 2), // 0x04
    instr!("ORA", Ora, Zp0, 3), // 0x05
    instr!("ASL", Asl, Zp0, 5), // 0x06
    instr!("???", Xxx, Imp, 2), // 0x07
    instr!("PHP", Php, Imp, 3), // 0x08
    instr!("ORA", Ora, Imm, 2), // 0x09
    instr!("ASL", Asl, Imp, 2), // 0x0A
    instr!("???", Xxx, Imp, 2), // 0x0B
    instr!("???", Xxx, Imp, 2), // 0x0C
    instr!("ORA", Ora, Abs, 4), // 0x0D
    instr!("ASL", Asl, Abs, 6), // 0x0E
    instr!("???", Xxx, Imp, 2), // 0x0F
    instr!("BPL", Bpl, Rel, 2), // 0x10
    instr!("ORA", Ora, Izy, 5), // 0x11
    instr!("???", Xxx, Imp, 2), // 0x12
    instr!("???", Xxx, Imp, 2), // 0x13
    instr!("???", Xxx, Imp, 2), // 0x14
    instr!("ORA", Ora, Zpx, 4), // 0x15
    instr!("ASL", Asl, Zpx, 6), // 0x16
    instr!("???", Xxx, Imp, 2), // 0x17
    instr!("CLC", Clc, Imp, 2), // 0x18
    instr!("ORA", Ora, Aby, 4), // 0x19
    instr!("???", Xxx, Imp, 2), // 0x1A
    instr!("???", Xxx, Imp, 2), // 0x1B
    instr!("NOP", IllegalNop, Abx, 4), // 0x1C
    instr!("ORA", Ora, Abx, 4), // 0x1D
    instr!("ASL", Asl, Abx, 7), // 0x1E
    instr!("???", Xxx, Imp, 2), // 0x1F
    instr!("JSR", Jsr, Abs, 6), // 0x20
    instr!("AND", And, Izx, 6), // 0x21
    instr!("???", Xxx, Imp, 2), // 0x22
    instr!("???", Xxx, Imp, 2), // 0x23
    instr!("BIT", Bit, Zp0, 3), // 0x24
    instr!("AND", And, Zp0, 3), // 0x25
    instr!("ROL", Rol, Zp0, 5), // 0x26
    instr!("???", Xxx, Imp, 2), // 0x27
    instr!("PLP", Plp, Imp, 4), // 0x28
    instr!("AND", And, Imm, 2), // 0x29
    instr!("ROL", Rol, Imp, 2), // 0x2A
    instr!("???", Xxx, Imp, 2), // 0x2B
    instr!("BIT", Bit, Abs, 4), // 0x2C
    instr!("AND", And, Abs, 4), // 0x2D
    instr!("ROL", Rol, Abs, 6), // 0x2E
    instr!("???", Xxx, Imp, 2), // 0x2F
    instr!("BMI", Bmi, Rel, 2), // 0x30
    instr!("AND", And, Izy, 5), // 0x31
    instr!("???", Xxx, Imp, 2), // 0x32
    instr!("???", Xxx, Imp, 2), // 0x33
    instr!("???", Xxx, Imp, 2), // 0x34
    instr!("AND", And, Zpx, 4), // 0x35
    instr!("ROL", Rol, Zpx, 6), // 0x36
    instr!("???", Xxx, Imp, 2), // 0x37
    instr!("SEC", Sec, Imp, 2), // 0x38
    instr!("AND", And, Aby, 4), // 0x39
    instr!("???", Xxx, Imp, 2), // 0x3A
    instr!("???", Xxx, Imp, 2), // 0x3B
    instr!("NOP", IllegalNop, Abx, 4), // 0x3C
    instr!("AND", And, Abx, 4), // 0x3D
    instr!("ROL", Rol, Abx, 7), // 0x3E
    instr!("???", Xxx, Imp, 2), // 0x3F
    instr!("RTI", Rti, Imp, 6), // 0x40
    instr!("EOR", Eor, Izx, 6), // 0x41
    instr!("???", Xxx, Imp, 2), // 0x42
    instr!("???", Xxx, Imp, 2), // 0x43
    instr!("???", Xxx, Imp, 2), // 0x44
    instr!("EOR", Eor, Zp0, 3), // 0x45
    instr!("LSR", Lsr, Zp0, 5), // 0x46
    instr!("???", Xxx, Imp, 2), // 0x47
    instr!("PHA", Pha, Imp, 3), // 0x48
    instr!("EOR", Eor, Imm, 2), // 0x49
    instr!("LSR", Lsr, Imp, 2), // 0x4A
    instr!("???", Xxx, Imp, 2), // 0x4B
    instr!("JMP", Jmp, Abs, 3), // 0x4C
    instr!("EOR", Eor, Abs, 4), // 0x4D
    instr!("LSR", Lsr, Abs, 6), // 0x4E
    instr!("???", Xxx, Imp, 2), // 0x4F
    instr!("BVC", Bvc, Rel, 2), // 0x50
    instr!("EOR", Eor, Izy, 5), // 0x51
    instr!("???", Xxx, Imp, 2), // 0x52
    instr!("???", Xxx, Imp, 2), // 0x53
    instr!("???", Xxx, Imp, 2), // 0x54
    instr!("EOR", Eor, Zpx, 4), // 0x55
    instr!("LSR", Lsr, Zpx, 6), // 0x56
    instr!("???", Xxx, Imp, 2), // 0x57
    instr!("CLI", Cli, Imp, 2), // 0x58
    instr!("EOR", Eor, Aby, 4), // 0x59
    instr!("???", Xxx, Imp, 2), // 0x5A
    instr!("???", Xxx, Imp, 2), // 0x5B
    instr!("NOP", IllegalNop, Abx, 4), // 0x5C
    instr!("EOR", Eor, Abx, 4), // 0x5D
    instr!("LSR", Lsr, Abx, 7), // 0x5E
    instr!("???", Xxx, Imp, 2), // 0x5F
    instr!("RTS", Rts, Imp, 6), // 0x60
    instr!("ADC", Adc, Izx, 6), // 0x61
    instr!("???", Xxx, Imp, 2), // 0x62
    instr!("???", Xxx, Imp, 2), // 0x63
    instr!("???", Xxx, Imp, 2), // 0x64
    instr!("ADC", Adc, Zp0, 3), // 0x65
    instr!("ROR", Ror, Zp0, 5), // 0x66
    instr!("???", Xxx, Imp, 2), // 0x67
    instr!("PLA", Pla, Imp, 4), // 0x68
    instr!("ADC", Adc, Imm, 2), // 0x69
    instr!("ROR", Ror, Imp, 2), // 0x6A
    instr!("???", Xxx, Imp, 2), // 0x6B
    instr!("JMP", Jmp, Ind, 5), // 0x6C
    instr!("ADC", Adc, Abs, 4), // 0x6D
    instr!("ROR", Ror, Abs, 6), // 0x6E
    instr!("???", Xxx, Imp, 2), // 0x6F
    instr!("BVS", Bvs, Rel, 2), // 0x70
    instr!("ADC", Adc, Izy, 5), // 0x71
    instr!("???", Xxx, Imp, 2), // 0x72
    instr!("???", Xxx, Imp, 2), // 0x73
    instr!("???", Xxx, Imp, 2), // 0x74
    instr!("ADC", Adc, Zpx, 4), // 0x75
    instr!("ROR", Ror, Zpx, 6), // 0x76
    instr!("???", Xxx, Imp, 2), // 0x77
    instr!("SEI", Sei, Imp, 2), // 0x78
    instr!("ADC", Adc, Aby, 4), // 0x79
    instr!("???", Xxx, Imp, 2), // 0x7A
    instr!("???", Xxx, Imp, 2), // 0x7B
    instr!("NOP", IllegalNop, Abx, 4), // 0x7C
    instr!("ADC", Adc, Abx, 4), // 0x7D
    instr!("ROR", Ror, Abx, 7), // 0x7E
    instr!("???", Xxx, Imp, 2), // 0x7F
    instr!("???", Xxx, Imp, 2), // 0x80
    instr!("STA", Sta, Izx, 6), // 0x81
    instr!("???", Xxx, Imp, 2), // 0x82
    instr!("???", Xxx, Imp, 2), // 0x83
    instr!("STY", Sty, Zp0, 3), // 0x84
    instr!("STA", Sta, Zp0, 3), // 0x85
    instr!("STX", Stx, Zp0, 3), // 0x86
    instr!("???", Xxx, Imp, 2), // 0x87
    instr!("DEY", Dey, Imp, 2), // 0x88
    instr!("???", Xxx, Imp, 2), // 0x89
    instr!("TXA", Txa, Imp, 2), // 0x8A
    instr!("???", Xxx, Imp, 2), // 0x8B
    instr!("STY", Sty, Abs, 4), // 0x8C
    instr!("STA", Sta, Abs, 4), // 0x8D
    instr!("STX", Stx, Abs, 4), // 0x8E
    instr!("???", Xxx, Imp, 2), // 0x8F
    instr!("BCC", Bcc, Rel, 2), // 0x90
    instr!("STA", Sta, Izy, 6), // 0x91
    instr!("???", Xxx, Imp, 2), // 0x92
    instr!("???", Xxx, Imp, 2), // 0x93
    instr!("STY", Sty, Zpx, 4), // 0x94
    instr!("STA", Sta, Zpx, 4), // 0x95
    instr!("STX", Stx, Zpy, 4), // 0x96
    instr!("???", Xxx, Imp, 2), // 0x97
    instr!("TYA", Tya, Imp, 2), // 0x98
    instr!("STA", Sta, Aby, 5), // 0x99
    instr!("TXS", Txs, Imp, 2), // 0x9A
    instr!("???", Xxx, Imp, 2), // 0x9B
    instr!("???", Xxx, Imp, 2), // 0x9C
    instr!("STA", Sta, Abx, 5), // 0x9D
    instr!("???", Xxx, Imp, 2), // 0x9E
    instr!("???", Xxx, Imp, 2), // 0x9F
    instr!("LDY", Ldy, Imm, 2), // 0xA0
    instr!("LDA", Lda, Izx, 6), // 0xA1
    instr!("LDX", Ldx, Imm, 2), // 0xA2
    instr!("???", Xxx, Imp, 2), // 0xA3
    instr!("LDY", Ldy, Zp0, 3), // 0xA4
    instr!("LDA", Lda, Zp0, 3), // 0xA5
    instr!("LDX", Ldx, Zp0, 3), // 0xA6
    instr!("???", Xxx, Imp, 2), // 0xA7
    instr!("TAY", Tay, Imp, 2), // 0xA8
    instr!("LDA", Lda, Imm, 2), // 0xA9
    instr!("TAX", Tax, Imp, 2), // 0xAA
    instr!("???", Xxx, Imp, 2), // 0xAB
    instr!("LDY", Ldy, Abs, 4), // 0xAC
    instr!("LDA", Lda, Abs, 4), // 0xAD
    instr!("LDX", Ldx, Abs, 4), // 0xAE
    instr!("???", Xxx, Imp, 2), // 0xAF
    instr!("BCS", Bcs, Rel, 2), // 0xB0
    instr!("LDA", Lda, Izy, 5), // 0xB1
    instr!("???", Xxx, Imp, 2), // 0xB2
    instr!("???", Xxx, Imp, 2), // 0xB3
    instr!("LDY", Ldy, Zpx, 4), // 0xB4
    instr!("LDA", Lda, Zpx, 4), // 0xB5
    instr!("LDX", Ldx, Zpy, 4), // 0xB6
    instr!("???", Xxx, Imp, 2), // 0xB7
    instr!("CLV", Clv, Imp, 2), // 0xB8
    instr!("LDA", Lda, Aby, 4), // 0xB9
    instr!("TSX", Tsx, Imp, 2), // 0xBA
    instr!("???", Xxx, Imp, 2), // 0xBB
    instr!("LDY", Ldy, Abx, 4), // 0xBC
    instr!("LDA", Lda, Abx, 4), // 0xBD
    instr!("LDX", Ldx, Aby, 4), // 0xBE
    instr!("???", Xxx, Imp, 2), // 0xBF
    instr!("CPY", Cpy, Imm, 2), // 0xC0
    instr!("CMP", Cmp, Izx, 6), // 0xC1
    instr!("???", Xxx, Imp, 2), // 0xC2
    instr!("???", Xxx, Imp, 2), // 0xC3
    instr!("CPY", Cpy, Zp0, 3), // 0xC4
    instr!("CMP", Cmp, Zp0, 3), // 0xC5
    instr!("DEC", Dec, Zp0, 5), // 0xC6
    instr!("???", Xxx, Imp, 2), // 0xC7
    instr!("INY", Iny, Imp, 2), // 0xC8
    instr!("CMP", Cmp, Imm, 2), // 0xC9
    instr!("DEX", Dex, Imp, 2), // 0xCA
    instr!("???", Xxx, Imp, 2), // 0xCB
    instr!("CPY", Cpy, Abs, 4), // 0xCC
    instr!("CMP", Cmp, Abs, 4), // 0xCD
    instr!("DEC", Dec, Abs, 6), // 0xCE
    instr!("???", Xxx, Imp, 2), // 0xCF
    instr!("BNE", Bne, Rel, 2), // 0xD0
    instr!("CMP", Cmp, Izy, 5), // 0xD1
    instr!("???", Xxx, Imp, 2), // 0xD2
    instr!("???", Xxx, Imp, 2), // 0xD3
    instr!("???", Xxx, Imp, 2), // 0xD4
    instr!("CMP", Cmp, Zpx, 4), // 0xD5
    instr!("DEC", Dec, Zpx, 6), // 0xD6
    instr!("???", Xxx, Imp, 2), // 0xD7
    instr!("CLD", Cld, Imp, 2), // 0xD8
    instr!("CMP", Cmp, Aby, 4), // 0xD9
    instr!("???", Xxx, Imp, 2), // 0xDA
    instr!("???", Xxx, Imp, 2), // 0xDB
    instr!("NOP", IllegalNop, Abx, 4), // 0xDC
    instr!("CMP", Cmp, Abx, 4), // 0xDD
    instr!("DEC", Dec, Abx, 7), // 0xDE
    instr!("???", Xxx, Imp, 2), // 0xDF
    instr!("CPX", Cpx, Imm, 2), // 0xE0
    instr!("SBC", Sbc, Izx, 6), // 0xE1
    instr!("???", Xxx, Imp, 2), // 0xE2
    instr!("???", Xxx, Imp, 2), // 0xE3
    instr!("CPX", Cpx, Zp0, 3), // 0xE4
    instr!("SBC", Sbc, Zp0, 3), // 0xE5
    instr!("INC", Inc, Zp0, 5), // 0xE6
    instr!("???", Xxx, Imp, 2), // 0xE7
    instr!("INX", Inx, Imp, 2), // 0xE8
    instr!("SBC", Sbc, Imm, 2), // 0xE9
    instr!("NOP", Nop, Imp, 2), // 0xEA
    instr!("SBC", Sbc, Imm, 2), // 0xEB
    instr!("CPX", Cpx, Abs, 4), // 0xEC
    instr!("SBC", Sbc, Abs, 4), // 0xED
    instr!("INC", Inc, Abs, 6), // 0xEE
    instr!("???", Xxx, Imp, 2), // 0xEF
    instr!("BEQ", Beq, Rel, 2), // 0xF0
    instr!("SBC", Sbc, Izy, 5), // 0xF1
    instr!("???", Xxx, Imp, 2), // 0xF2
    instr!("???", Xxx, Imp, 2), // 0xF3
    instr!("???", Xxx, Imp, 2), // 0xF4
    instr!("SBC", Sbc, Zpx, 4), // 0xF5
    instr!("INC", Inc, Zpx, 6), // 0xF6
    instr!("???", Xxx, Imp, 2), // 0xF7
    instr!("SED", Sed, Imp, 2), // 0xF8
    instr!("SBC", Sbc, Aby, 4), // 0xF9
    instr!("???", Xxx, Imp, 2), // 0xFA
    instr!("???", Xxx, Imp, 2), // 0xFB
    instr!("NOP", IllegalNop, Abx, 4), // 0xFC
    instr!("SBC", Sbc, Abx, 4), // 0xFD
    instr!("INC", Inc, Abx, 7), // 0xFE
    instr!("???", Xxx, Imp, 2), // 0xFF
];

