use arch::{os, Opcode};
use std::fmt::Write as _;
use std::io::{self, Write};

use crate::analysis::{label_name, Analysis};
use crate::decode::Decoder;
use crate::fidelity::{is_opcode_documented, will_assemble_identically};
use crate::program::Program;
use crate::vars::Variables;
use crate::walk::{Step, Visit, Walker};

const COMMENT_COLUMN: usize = 24;
const PRINTABLE_COLUMN: usize = 44;

const BANNER: &str = "\
\\ ******************************************************************************
\\
\\ This disassembly was produced by beebdis
\\
\\ ******************************************************************************
";

/// Second pass: turns the window into BeebAsm source.
pub struct Renderer<'a> {
    program: &'a Program<'a>,
    analysis: &'a Analysis,
    vars: &'a Variables,
    decoder: Decoder<'a>,
}

impl<'a> Renderer<'a> {
    pub fn new(program: &'a Program<'a>, analysis: &'a Analysis, vars: &'a Variables) -> Self {
        Renderer {
            program,
            analysis,
            vars,
            decoder: Decoder::new(program, analysis, vars),
        }
    }

    pub fn header<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "{}", BANNER)?;

        let calls: Vec<_> = self.analysis.os_calls().collect();
        if !calls.is_empty() {
            writeln!(w, "\\ OS Call Addresses")?;
            for addr in calls {
                let name = os::call_name(addr).unwrap_or_default();
                writeln!(w, "{:<6} = &{:X}", name, addr)?;
            }
            writeln!(w)?;
        }

        let vectors: Vec<_> = self.analysis.os_vectors().collect();
        if !vectors.is_empty() {
            writeln!(w, "\\ OS Vector Addresses")?;
            for addr in vectors {
                let name = os::vector_name(addr).unwrap_or_default();
                writeln!(w, "{:<5} = &{:X}", name, addr)?;
            }
            writeln!(w)?;
        }

        if !self.vars.is_empty() {
            writeln!(w, "\\ Defined Variables")?;
            for (name, def) in self.vars.iter() {
                writeln!(w, "{:<5} = {}", name, def.literal)?;
            }
            writeln!(w)?;
        }

        // Labels are real addresses, so the origin must match the first
        // real address of the window.
        match (self.program.load(), self.program.start()) {
            (0, 0) => {}
            (0, offset) => {
                writeln!(w, "ORG &{:X}", offset)?;
                writeln!(w)?;
            }
            (load, offset) => {
                writeln!(w, "CODE% = &{:X}", load)?;
                writeln!(w)?;
                match offset {
                    0 => writeln!(w, "ORG CODE%")?,
                    offset => writeln!(w, "ORG CODE%+&{:X}", offset)?,
                }
                writeln!(w)?;
            }
        }
        Ok(())
    }

    /// Render every position of the window. Stops writing at the first
    /// I/O error and returns it.
    pub fn body<W: Write>(&self, walker: &Walker, w: &mut W) -> io::Result<()> {
        let mut result = Ok(());
        walker.walk(Visit::All, |step| {
            let (text, consumed) = self.step(step);
            if result.is_ok() {
                result = w.write_all(text.as_bytes());
            }
            consumed
        });
        result
    }

    /// Text for one position, label line included, and the bytes it covers.
    pub fn step(&self, step: &Step) -> (String, usize) {
        let real = self.program.real(step.cursor);
        let mut out = String::new();
        if let Some(idx) = self.analysis.label(real) {
            let _ = writeln!(out, ".{}", label_name(idx));
        }

        let (line, consumed) = match step.op {
            Some(op) => self.opcode(step, op),
            None => (data_line(&[step.byte], real, None), 1),
        };
        out.push_str(&line);
        out.push('\n');
        (out, consumed)
    }

    fn opcode(&self, step: &Step, op: &Opcode) -> (String, usize) {
        let real = self.program.real(step.cursor);
        let straddles = step.straddles();
        let bytes = match straddles {
            true => self.program.slice(step.cursor, step.boundary - step.cursor),
            false => self.program.slice(step.cursor, op.len),
        };
        let documented = is_opcode_documented(op);

        if documented && !straddles && will_assemble_identically(op, bytes) {
            let operand = self.decoder.decode(op, bytes, step.cursor);
            return (instruction_line(op, &operand, bytes, real), bytes.len());
        }

        let undocumented = if documented { None } else { Some(op) };
        (data_line(bytes, real, undocumented), bytes.len())
    }
}

// MNEMONIC OPERAND       \ &ADDR OP OP OP       printable
//                        ^ column 24          ^ column 44
fn instruction_line(op: &Opcode, operand: &str, bytes: &[u8], real: u32) -> String {
    let mut line = format!(" {} {}", op.mnemonic, operand);
    pad(&mut line, COMMENT_COLUMN);
    let _ = write!(line, "\\ &{:04X}", real);
    for byte in bytes {
        let _ = write!(line, " {:02X}", byte);
    }
    append_printable(&mut line, bytes);
    line
}

// EQUB &XX,&YY           \ &ADDR XX YY          printable
// EQUB &XX,&YY           \ &ADDR UD MNEMONIC    printable
fn data_line(bytes: &[u8], real: u32, undocumented: Option<&Opcode>) -> String {
    let data: Vec<String> = bytes.iter().map(|b| format!("&{:02X}", b)).collect();
    let mut line = format!(" EQUB {}", data.join(","));
    pad(&mut line, COMMENT_COLUMN);
    let _ = write!(line, "\\ &{:04X}", real);
    match undocumented {
        None => {
            for byte in bytes {
                let _ = write!(line, " {:02X}", byte);
            }
            line.push(' ');
        }
        Some(op) => {
            let _ = write!(line, " UD {}", op.mnemonic);
        }
    }
    append_printable(&mut line, bytes);
    line
}

fn pad(line: &mut String, column: usize) {
    let spaces = column.saturating_sub(line.len()).max(1);
    line.extend(std::iter::repeat(' ').take(spaces));
}

fn append_printable(line: &mut String, bytes: &[u8]) {
    pad(line, PRINTABLE_COLUMN);
    line.extend(bytes.iter().map(|&b| printable(b)));
}

fn printable(b: u8) -> char {
    match b {
        0x20..=0x7E => b as char,
        _ => '.',
    }
}
