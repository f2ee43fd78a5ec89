use once_cell::sync::Lazy;
use std::collections::HashMap;
use strum::Display;

use crate::mode::AddrMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Mnemonic {
    ADC,
    ANC,
    AND,
    ASL,
    BBR0,
    BBR1,
    BBR2,
    BBR3,
    BBR4,
    BBR5,
    BBR6,
    BBR7,
    BBS0,
    BBS1,
    BBS2,
    BBS3,
    BBS4,
    BBS5,
    BBS6,
    BBS7,
    BCC,
    BCS,
    BEQ,
    BIT,
    BMI,
    BNE,
    BPL,
    BRA,
    BRK,
    BVC,
    BVS,
    CLC,
    CLD,
    CLI,
    CLV,
    CMP,
    CPX,
    CPY,
    DEC,
    DEX,
    DEY,
    EOR,
    INC,
    INX,
    INY,
    JMP,
    JSR,
    LDA,
    LDX,
    LDY,
    LSR,
    NOP,
    ORA,
    PHA,
    PHP,
    PLA,
    PLP,
    RMB0,
    RMB1,
    RMB2,
    RMB3,
    RMB4,
    RMB5,
    RMB6,
    RMB7,
    ROL,
    ROR,
    RTI,
    RTS,
    SBC,
    SEC,
    SED,
    SEI,
    SMB0,
    SMB1,
    SMB2,
    SMB3,
    SMB4,
    SMB5,
    SMB6,
    SMB7,
    STA,
    STX,
    STY,
    TAX,
    TAY,
    TSX,
    TXA,
    TXS,
    TYA,
}

/// Control transfer class of a mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Branch,
    Jump,
    Neither,
}

impl Mnemonic {
    pub fn flow(&self) -> Flow {
        use Mnemonic::*;
        match self {
            BPL | BMI | BVC | BVS | BRA | BCC | BCS | BNE | BEQ => Flow::Branch,
            BBR0 | BBR1 | BBR2 | BBR3 | BBR4 | BBR5 | BBR6 | BBR7 => Flow::Branch,
            BBS0 | BBS1 | BBS2 | BBS3 | BBS4 | BBS5 | BBS6 | BBS7 => Flow::Branch,
            JMP | JSR => Flow::Jump,
            _ => Flow::Neither,
        }
    }

    /// Undocumented or unstable ops. BeebAsm cannot be relied on to assemble
    /// them, so they are always emitted as data.
    pub fn is_undocumented(&self) -> bool {
        *self == Mnemonic::ANC
    }
}

// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub value: u8,
    pub mnemonic: Mnemonic,
    /// Encoded length in bytes, opcode byte included.
    pub len: usize,
    pub mode: AddrMode,
}

impl Opcode {
    pub const JMP_ABSOLUTE: u8 = 0x4C;
    pub const JMP_INDIRECT: u8 = 0x6C;
    pub const JSR_ABSOLUTE: u8 = 0x20;

    pub fn lookup(byte: u8) -> Option<&'static Opcode> {
        TABLE.get(&byte)
    }

    pub fn all() -> &'static [Opcode] {
        OPCODES
    }

    pub fn flow(&self) -> Flow {
        self.mnemonic.flow()
    }

    pub fn is_documented(&self) -> bool {
        !self.mnemonic.is_undocumented()
    }

    /// `JMP &1234` or `JSR &1234`.
    pub fn is_absolute_call(&self) -> bool {
        self.value == Opcode::JMP_ABSOLUTE || self.value == Opcode::JSR_ABSOLUTE
    }

    /// Little-endian operand word of a 3-byte instruction.
    pub fn word(bytes: &[u8]) -> u16 {
        u16::from_le_bytes([bytes[1], bytes[2]])
    }

    /// Branch displacement measured from the first byte of the instruction.
    ///
    /// The CPU adds the signed relative byte to the address following the
    /// instruction, so the instruction length is folded in here. Plain
    /// branches carry the relative byte second, the 65C02 BBR/BBS forms carry
    /// it third after the zero page operand.
    pub fn branch_offset(&self, bytes: &[u8]) -> i32 {
        let rel = if self.len == 3 { bytes[2] } else { bytes[1] };
        rel as i8 as i32 + self.len as i32
    }

    /// The address operand of an instruction that reads or writes memory
    /// through a 16-bit address. Absolute JMP/JSR are excluded: their operand
    /// is a control transfer target, not a data reference.
    pub fn data_word(&self, bytes: &[u8]) -> Option<u16> {
        if self.mode.has_word_operand() && !self.is_absolute_call() && self.flow() != Flow::Branch
        {
            Some(Opcode::word(bytes))
        } else {
            None
        }
    }
}

macro_rules! opcodes {
    ($(($value:expr, $mnemonic:ident, $len:expr, $mode:ident),)*) => {
        &[$(Opcode {
            value: $value,
            mnemonic: Mnemonic::$mnemonic,
            len: $len,
            mode: AddrMode::$mode,
        },)*]
    };
}

// Documented 6502 set, the 65C02 extensions found on the BBC Master and a
// couple of undocumented NMOS instructions.
#[rustfmt::skip]
const OPCODES: &[Opcode] = opcodes![
    (0x69, ADC, 2, Immediate),
    (0x65, ADC, 2, ZeroPage),
    (0x75, ADC, 2, ZeroPageX),
    (0x6D, ADC, 3, Absolute),
    (0x7D, ADC, 3, AbsoluteX),
    (0x79, ADC, 3, AbsoluteY),
    (0x61, ADC, 2, IndirectX),
    (0x71, ADC, 2, IndirectY),
    (0x72, ADC, 2, IndirectZP),

    (0x0B, ANC, 2, Immediate),
    (0x2B, ANC, 2, Immediate),

    (0x29, AND, 2, Immediate),
    (0x25, AND, 2, ZeroPage),
    (0x35, AND, 2, ZeroPageX),
    (0x2D, AND, 3, Absolute),
    (0x3D, AND, 3, AbsoluteX),
    (0x39, AND, 3, AbsoluteY),
    (0x21, AND, 2, IndirectX),
    (0x31, AND, 2, IndirectY),
    (0x32, AND, 2, IndirectZP),

    (0x0A, ASL, 1, Accumulator),
    (0x06, ASL, 2, ZeroPage),
    (0x16, ASL, 2, ZeroPageX),
    (0x0E, ASL, 3, Absolute),
    (0x1E, ASL, 3, AbsoluteX),

    (0x0F, BBR0, 3, Implied),
    (0x1F, BBR1, 3, Implied),
    (0x2F, BBR2, 3, Implied),
    (0x3F, BBR3, 3, Implied),
    (0x4F, BBR4, 3, Implied),
    (0x5F, BBR5, 3, Implied),
    (0x6F, BBR6, 3, Implied),
    (0x7F, BBR7, 3, Implied),
    (0x8F, BBS0, 3, Implied),
    (0x9F, BBS1, 3, Implied),
    (0xAF, BBS2, 3, Implied),
    (0xBF, BBS3, 3, Implied),
    (0xCF, BBS4, 3, Implied),
    (0xDF, BBS5, 3, Implied),
    (0xEF, BBS6, 3, Implied),
    (0xFF, BBS7, 3, Implied),

    (0x24, BIT, 2, ZeroPage),
    (0x2C, BIT, 3, Absolute),

    (0x10, BPL, 2, Implied), // branches render their own operand
    (0x30, BMI, 2, Implied),
    (0x50, BVC, 2, Implied),
    (0x70, BVS, 2, Implied),
    (0x80, BRA, 2, Implied),
    (0x90, BCC, 2, Implied),
    (0xB0, BCS, 2, Implied),
    (0xD0, BNE, 2, Implied),
    (0xF0, BEQ, 2, Implied),

    (0x00, BRK, 1, Implied),

    (0xC9, CMP, 2, Immediate),
    (0xC5, CMP, 2, ZeroPage),
    (0xD5, CMP, 2, ZeroPageX),
    (0xCD, CMP, 3, Absolute),
    (0xDD, CMP, 3, AbsoluteX),
    (0xD9, CMP, 3, AbsoluteY),
    (0xC1, CMP, 2, IndirectX),
    (0xD1, CMP, 2, IndirectY),

    (0xE0, CPX, 2, Immediate),
    (0xE4, CPX, 2, ZeroPage),
    (0xEC, CPX, 3, Absolute),

    (0xC0, CPY, 2, Immediate),
    (0xC4, CPY, 2, ZeroPage),
    (0xCC, CPY, 3, Absolute),

    (0xC6, DEC, 2, ZeroPage),
    (0xD6, DEC, 2, ZeroPageX),
    (0xCE, DEC, 3, Absolute),
    (0xDE, DEC, 3, AbsoluteX),

    (0x49, EOR, 2, Immediate),
    (0x45, EOR, 2, ZeroPage),
    (0x55, EOR, 2, ZeroPageX),
    (0x4D, EOR, 3, Absolute),
    (0x5D, EOR, 3, AbsoluteX),
    (0x59, EOR, 3, AbsoluteY),
    (0x41, EOR, 2, IndirectX),
    (0x51, EOR, 2, IndirectY),

    (0x18, CLC, 1, Implied),
    (0x38, SEC, 1, Implied),
    (0x58, CLI, 1, Implied),
    (0x78, SEI, 1, Implied),
    (0xB8, CLV, 1, Implied),
    (0xD8, CLD, 1, Implied),
    (0xF8, SED, 1, Implied),

    (0xE6, INC, 2, ZeroPage),
    (0xF6, INC, 2, ZeroPageX),
    (0xEE, INC, 3, Absolute),
    (0xFE, INC, 3, AbsoluteX),

    (0x4C, JMP, 3, Absolute), // decoded through the OS call table
    (0x6C, JMP, 3, Indirect),

    (0x20, JSR, 3, Absolute), // decoded through the OS call table

    (0xA9, LDA, 2, Immediate),
    (0xA5, LDA, 2, ZeroPage),
    (0xB5, LDA, 2, ZeroPageX),
    (0xAD, LDA, 3, Absolute),
    (0xBD, LDA, 3, AbsoluteX),
    (0xB9, LDA, 3, AbsoluteY),
    (0xA1, LDA, 2, IndirectX),
    (0xB1, LDA, 2, IndirectY),

    (0xA2, LDX, 2, Immediate),
    (0xA6, LDX, 2, ZeroPage),
    (0xB6, LDX, 2, ZeroPageY),
    (0xAE, LDX, 3, Absolute),
    (0xBE, LDX, 3, AbsoluteY),

    (0xA0, LDY, 2, Immediate),
    (0xA4, LDY, 2, ZeroPage),
    (0xB4, LDY, 2, ZeroPageX),
    (0xAC, LDY, 3, Absolute),
    (0xBC, LDY, 3, AbsoluteX),

    (0x4A, LSR, 1, Accumulator),
    (0x46, LSR, 2, ZeroPage),
    (0x56, LSR, 2, ZeroPageX),
    (0x4E, LSR, 3, Absolute),
    (0x5E, LSR, 3, AbsoluteX),

    (0xEA, NOP, 1, Implied),

    (0x09, ORA, 2, Immediate),
    (0x05, ORA, 2, ZeroPage),
    (0x15, ORA, 2, ZeroPageX),
    (0x0D, ORA, 3, Absolute),
    (0x1D, ORA, 3, AbsoluteX),
    (0x19, ORA, 3, AbsoluteY),
    (0x01, ORA, 2, IndirectX),
    (0x11, ORA, 2, IndirectY),

    (0xAA, TAX, 1, Implied),
    (0x8A, TXA, 1, Implied),
    (0xCA, DEX, 1, Implied),
    (0xE8, INX, 1, Implied),
    (0xA8, TAY, 1, Implied),
    (0x98, TYA, 1, Implied),
    (0x88, DEY, 1, Implied),
    (0xC8, INY, 1, Implied),

    (0x07, RMB0, 2, ZeroPage),
    (0x17, RMB1, 2, ZeroPage),
    (0x27, RMB2, 2, ZeroPage),
    (0x37, RMB3, 2, ZeroPage),
    (0x47, RMB4, 2, ZeroPage),
    (0x57, RMB5, 2, ZeroPage),
    (0x67, RMB6, 2, ZeroPage),
    (0x77, RMB7, 2, ZeroPage),

    (0x2A, ROL, 1, Accumulator),
    (0x26, ROL, 2, ZeroPage),
    (0x36, ROL, 2, ZeroPageX),
    (0x2E, ROL, 3, Absolute),
    (0x3E, ROL, 3, AbsoluteX),

    (0x6A, ROR, 1, Accumulator),
    (0x66, ROR, 2, ZeroPage),
    (0x76, ROR, 2, ZeroPageX),
    (0x6E, ROR, 3, Absolute),
    (0x7E, ROR, 3, AbsoluteX),

    (0x40, RTI, 1, Implied),

    (0x60, RTS, 1, Implied),

    (0xE9, SBC, 2, Immediate),
    (0xE5, SBC, 2, ZeroPage),
    (0xF5, SBC, 2, ZeroPageX),
    (0xED, SBC, 3, Absolute),
    (0xFD, SBC, 3, AbsoluteX),
    (0xF9, SBC, 3, AbsoluteY),
    (0xE1, SBC, 2, IndirectX),
    (0xF1, SBC, 2, IndirectY),

    (0x87, SMB0, 2, ZeroPage),
    (0x97, SMB1, 2, ZeroPage),
    (0xA7, SMB2, 2, ZeroPage),
    (0xB7, SMB3, 2, ZeroPage),
    (0xC7, SMB4, 2, ZeroPage),
    (0xD7, SMB5, 2, ZeroPage),
    (0xE7, SMB6, 2, ZeroPage),
    (0xF7, SMB7, 2, ZeroPage),

    (0x85, STA, 2, ZeroPage),
    (0x95, STA, 2, ZeroPageX),
    (0x8D, STA, 3, Absolute),
    (0x9D, STA, 3, AbsoluteX),
    (0x99, STA, 3, AbsoluteY),
    (0x81, STA, 2, IndirectX),
    (0x91, STA, 2, IndirectY),

    (0x9A, TXS, 1, Implied),
    (0xBA, TSX, 1, Implied),
    (0x48, PHA, 1, Implied),
    (0x68, PLA, 1, Implied),
    (0x08, PHP, 1, Implied),
    (0x28, PLP, 1, Implied),

    (0x86, STX, 2, ZeroPage),
    (0x96, STX, 2, ZeroPageY),
    (0x8E, STX, 3, Absolute),

    (0x84, STY, 2, ZeroPage),
    (0x94, STY, 2, ZeroPageX),
    (0x8C, STY, 3, Absolute),

];

static TABLE: Lazy<HashMap<u8, Opcode>> =
    Lazy::new(|| OPCODES.iter().map(|op| (op.value, *op)).collect());
