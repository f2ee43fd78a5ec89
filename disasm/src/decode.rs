use arch::{os, AddrMode, Flow, Opcode};

use crate::analysis::{label_name, Analysis};
use crate::program::Program;
use crate::vars::Variables;

/// Renders the operand field of an instruction.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    program: &'a Program<'a>,
    analysis: &'a Analysis,
    vars: &'a Variables,
}

impl<'a> Decoder<'a> {
    pub fn new(program: &'a Program<'a>, analysis: &'a Analysis, vars: &'a Variables) -> Self {
        Decoder {
            program,
            analysis,
            vars,
        }
    }

    /// Operand text for the instruction `bytes` starting at `cursor`.
    pub fn decode(&self, op: &Opcode, bytes: &[u8], cursor: usize) -> String {
        if op.is_absolute_call() {
            return self.call(bytes);
        }
        if op.flow() == Flow::Branch {
            return self.branch(op, bytes, cursor);
        }

        match op.mode {
            AddrMode::Implied => String::new(),
            AddrMode::Accumulator => "A".to_string(),
            AddrMode::Immediate => format!("#&{:02X}", bytes[1]),
            AddrMode::Absolute => self.word(Opcode::word(bytes)),
            AddrMode::AbsoluteX => format!("{},X", self.word(Opcode::word(bytes))),
            AddrMode::AbsoluteY => format!("{},Y", self.word(Opcode::word(bytes))),
            AddrMode::Indirect => format!("({})", self.word(Opcode::word(bytes))),
            AddrMode::ZeroPage => self.zp(bytes[1]),
            AddrMode::ZeroPageX => format!("{},X", self.zp(bytes[1])),
            AddrMode::ZeroPageY => format!("{},Y", self.zp(bytes[1])),
            AddrMode::ZeroPageRel => format!("{},#{:02X}", self.zp(bytes[1]), bytes[2]),
            AddrMode::IndirectX => format!("({},X)", self.zp(bytes[1])),
            AddrMode::IndirectY => format!("({}),Y", self.zp(bytes[1])),
            AddrMode::IndirectZP => format!("({})", self.zp(bytes[1])),
        }
    }

    // JMP &1234 / JSR &1234: OS entry point, then label, then literal.
    fn call(&self, bytes: &[u8]) -> String {
        let target = Opcode::word(bytes);
        if let Some(name) = os::call_name(target) {
            return name.to_string();
        }
        match self.analysis.label(target as u32) {
            Some(idx) => label_name(idx),
            None => format!("&{:04X}", target),
        }
    }

    fn branch(&self, op: &Opcode, bytes: &[u8], cursor: usize) -> String {
        let offset = op.branch_offset(bytes);
        let target = self
            .program
            .relative(cursor, offset)
            .and_then(|addr| self.analysis.label(addr))
            .map(label_name)
            // BeebAsm reads a bare number as an absolute address, so an
            // unlabelled target is written relative to the program counter.
            .unwrap_or_else(|| format!("P%{:+}", offset));
        if op.len == 3 {
            format!("&{:02X},{}", bytes[1], target)
        } else {
            target
        }
    }

    fn word(&self, value: u16) -> String {
        if let Some(vector) = os::vector_ref(value) {
            return vector.symbol();
        }
        match self.vars.lookup(value) {
            Some(name) => name.to_string(),
            None => format!("&{:04X}", value),
        }
    }

    fn zp(&self, value: u8) -> String {
        match self.vars.lookup(value as u16) {
            Some(name) => name.to_string(),
            None => format!("&{:02X}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::CodeAddrs;
    use crate::walk::Walker;

    fn operand(bytes: &[u8], cursor: usize, vars: &Variables) -> String {
        let program = Program::new(bytes, 0, bytes.len(), 0).unwrap();
        let code = CodeAddrs::default();
        let analysis = Analysis::run(&Walker::new(&program, &code));
        let decoder = Decoder::new(&program, &analysis, vars);
        let op = Opcode::lookup(bytes[cursor]).unwrap();
        decoder.decode(op, &bytes[cursor..cursor + op.len], cursor)
    }

    macro_rules! test_operand {
        ($($name:ident: $bytes:expr => $expect:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(operand(&$bytes, 0, &Variables::new()), $expect);
                }
            )*
        }
    }

    test_operand! {
        test_implied: [0x00] => "",
        test_accumulator: [0x0A] => "A",
        test_immediate: [0xA9, 0x05] => "#&05",
        test_absolute: [0xAD, 0x34, 0x12] => "&1234",
        test_absolute_x: [0xBD, 0x34, 0x12] => "&1234,X",
        test_absolute_y: [0xB9, 0x34, 0x12] => "&1234,Y",
        test_zero_page: [0xA5, 0x70] => "&70",
        test_zero_page_x: [0xB5, 0x70] => "&70,X",
        test_zero_page_y: [0xB6, 0x70] => "&70,Y",
        test_indirect: [0x6C, 0x00, 0x30] => "(&3000)",
        test_indirect_x: [0xA1, 0x70] => "(&70,X)",
        test_indirect_y: [0xB1, 0x70] => "(&70),Y",
        test_indirect_zp: [0x72, 0x70] => "(&70)",
        test_jmp_literal: [0x4C, 0x00, 0x02] => "&0200",
        test_jsr_os_call: [0x20, 0xEE, 0xFF] => "OSWRCH",
        test_jmp_self: [0x4C, 0x00, 0x00] => "label_0",
        test_vector: [0x8D, 0x0E, 0x02] => "WRCHV",
        test_vector_high: [0x8D, 0x0F, 0x02] => "WRCHV+1",
        test_vector_indirect: [0x6C, 0x0E, 0x02] => "(WRCHV)",
        test_vector_indexed: [0xBD, 0x00, 0x02] => "USERV,X",
        test_branch_forward: [0xD0, 0x10] => "P%+18",
        test_branch_backward: [0xD0, 0xF0] => "P%-14",
        test_branch_self: [0x90, 0xFE] => "label_0",
        test_bbr_unlabelled: [0x0F, 0x70, 0x10] => "&70,P%+19",
        test_bbr_self: [0x0F, 0x70, 0xFD] => "&70,label_0",
    }

    #[test]
    fn variables_replace_operands() {
        let mut vars = Variables::new();
        vars.define("PTR", "&70").unwrap();
        vars.define("SCREEN", "&3000").unwrap();
        assert_eq!(operand(&[0xA5, 0x70], 0, &vars), "PTR");
        assert_eq!(operand(&[0xB1, 0x70], 0, &vars), "(PTR),Y");
        assert_eq!(operand(&[0xA1, 0x70], 0, &vars), "(PTR,X)");
        assert_eq!(operand(&[0x9D, 0x00, 0x30], 0, &vars), "SCREEN,X");
        assert_eq!(operand(&[0x6C, 0x00, 0x30], 0, &vars), "(SCREEN)");
        // Immediates are left alone.
        assert_eq!(operand(&[0xA9, 0x70], 0, &vars), "#&70");
        // Jump targets are not variables.
        assert_eq!(operand(&[0x4C, 0x00, 0x30], 0, &vars), "&3000");
    }

    #[test]
    fn vectors_win_over_variables() {
        let mut vars = Variables::new();
        vars.define("MYVEC", "&20E").unwrap();
        assert_eq!(operand(&[0xAD, 0x0E, 0x02], 0, &vars), "WRCHV");
    }

    #[test]
    fn branch_to_label_ahead() {
        // BNE +1 / NOP / RTS
        let bytes = [0xD0, 0x01, 0xEA, 0x60];
        assert_eq!(operand(&bytes, 0, &Variables::new()), "label_0");
    }
}
