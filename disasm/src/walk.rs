use arch::Opcode;
use log::trace;

use crate::program::{CodeAddrs, Program};

/// Which interpretations a walk visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Only positions that decode as whole instructions. An instruction that
    /// would cross a code boundary is skipped and the walk resumes at the
    /// boundary.
    Code,
    /// Every position, instruction or data.
    All,
}

/// One position handed to a walk visitor.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub cursor: usize,
    /// Buffer offset the instruction at `cursor` must not cross: the next
    /// forced code address or the end of the window.
    pub boundary: usize,
    pub byte: u8,
    pub op: Option<&'static Opcode>,
}

impl Step {
    pub fn straddles(&self) -> bool {
        self.op
            .map_or(false, |op| self.cursor + op.len > self.boundary)
    }
}

/// Sequential traversal of a program window shared by both passes.
#[derive(Debug, Clone, Copy)]
pub struct Walker<'a> {
    program: &'a Program<'a>,
    code: &'a CodeAddrs,
}

impl<'a> Walker<'a> {
    pub fn new(program: &'a Program<'a>, code: &'a CodeAddrs) -> Self {
        Walker { program, code }
    }

    pub fn program(&self) -> &'a Program<'a> {
        self.program
    }

    /// Visit positions from the start of the window to its end. The visitor
    /// returns the number of bytes it consumed, at least one.
    pub fn walk<F>(&self, visit: Visit, mut f: F)
    where
        F: FnMut(&Step) -> usize,
    {
        let end = self.program.end();
        let mut cursor = self.program.start();
        let mut idx = self.code.first_from(cursor);

        while cursor < end {
            // A previous step consumed bytes past the next code address.
            if let Some(addr) = self.code.get(idx) {
                if cursor > addr {
                    trace!(
                        "Realign &{:04X} -> &{:04X}",
                        self.program.real(cursor),
                        self.program.real(addr)
                    );
                    cursor = addr;
                }
            }
            while self.code.get(idx).is_some_and(|addr| addr <= cursor) {
                idx += 1;
            }

            let byte = self.program.byte(cursor);
            let step = Step {
                cursor,
                boundary: self.code.get(idx).map_or(end, |addr| addr.min(end)),
                byte,
                op: Opcode::lookup(byte),
            };

            if visit == Visit::Code && step.straddles() {
                trace!(
                    "Skip &{:04X}: instruction crosses &{:04X}",
                    self.program.real(cursor),
                    self.program.real(step.boundary)
                );
                cursor = step.boundary;
                continue;
            }

            let consumed = f(&step);
            debug_assert!(consumed > 0, "visitor must consume at least one byte");
            cursor += consumed.max(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursors(bytes: &[u8], code: &[u32], visit: Visit) -> Vec<usize> {
        let program = Program::new(bytes, 0, bytes.len(), 0).unwrap();
        let code = CodeAddrs::normalize(code, 0);
        let mut visited = vec![];
        Walker::new(&program, &code).walk(visit, |step| {
            visited.push(step.cursor);
            step.op.map_or(1, |op| op.len)
        });
        visited
    }

    #[test]
    fn sequential() {
        // LDA #&05 / NOP / JMP &1234 / unknown
        let bytes = [0xA9, 0x05, 0xEA, 0x4C, 0x34, 0x12, 0x02];
        assert_eq!(cursors(&bytes, &[], Visit::All), vec![0, 2, 3, 6]);
        assert_eq!(cursors(&bytes, &[], Visit::Code), vec![0, 2, 3, 6]);
    }

    #[test]
    fn straddle_in_code_mode_skips_to_boundary() {
        // JMP at 0 would swallow the forced address 2.
        let bytes = [0x4C, 0xEA, 0xEA, 0xEA];
        assert_eq!(cursors(&bytes, &[2], Visit::Code), vec![2, 3]);
    }

    #[test]
    fn straddle_in_all_mode_is_visited() {
        let bytes = [0x4C, 0xEA, 0xEA, 0xEA];
        let program = Program::new(&bytes, 0, bytes.len(), 0).unwrap();
        let code = CodeAddrs::normalize(&[2], 0);
        let mut steps = vec![];
        Walker::new(&program, &code).walk(Visit::All, |step| {
            steps.push((step.cursor, step.straddles(), step.boundary));
            match step.straddles() {
                true => step.boundary - step.cursor,
                false => step.op.map_or(1, |op| op.len),
            }
        });
        assert_eq!(steps, vec![(0, true, 2), (2, false, 4), (3, false, 4)]);
    }

    #[test]
    fn overshoot_is_pulled_back() {
        // The visitor deliberately consumes three bytes from 0, past address 1.
        let bytes = [0xEA, 0xEA, 0xEA, 0xEA];
        let program = Program::new(&bytes, 0, bytes.len(), 0).unwrap();
        let code = CodeAddrs::normalize(&[1], 0);
        let mut visited = vec![];
        Walker::new(&program, &code).walk(Visit::All, |step| {
            visited.push(step.cursor);
            if step.cursor == 0 {
                3
            } else {
                1
            }
        });
        assert_eq!(visited, vec![0, 1, 2, 3]);
    }

    #[test]
    fn ending_on_boundary_is_not_a_straddle() {
        // LDA #&05 ends exactly at the forced address 2.
        let bytes = [0xA9, 0x05, 0xEA];
        assert_eq!(cursors(&bytes, &[2], Visit::Code), vec![0, 2]);
    }

    #[test]
    fn forced_address_at_window_start() {
        let bytes = [0xEA, 0xEA];
        assert_eq!(cursors(&bytes, &[0], Visit::Code), vec![0, 1]);
    }

    #[test]
    fn window_end_is_a_boundary() {
        // JSR with only one operand byte left in the window.
        let bytes = [0xEA, 0x20, 0x00];
        assert_eq!(cursors(&bytes, &[], Visit::Code), vec![0]);
        assert_eq!(cursors(&bytes, &[], Visit::All), vec![0, 1]);
    }

    #[test]
    fn window_offset() {
        let bytes = [0x02, 0x02, 0xEA, 0xEA, 0x02];
        let program = Program::new(&bytes, 2, 2, 0).unwrap();
        let code = CodeAddrs::default();
        let mut visited = vec![];
        Walker::new(&program, &code).walk(Visit::All, |step| {
            visited.push(step.cursor);
            1
        });
        assert_eq!(visited, vec![2, 3]);
    }
}
