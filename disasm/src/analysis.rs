use arch::{os, Flow, Opcode};
use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::walk::{Visit, Walker};

/// Result of the first pass: labelled branch targets and the OS symbols the
/// program references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    targets: BTreeMap<u32, usize>,
    os_calls: BTreeSet<u16>,
    os_vectors: BTreeSet<u16>,
}

impl Analysis {
    /// Walk the code only interpretation of the window and collect every
    /// branch and jump target that lands on the start of an instruction.
    pub fn run(walker: &Walker) -> Self {
        let program = walker.program();
        let mut reachable = HashSet::new();
        let mut found = BTreeSet::new();
        let mut os_calls = BTreeSet::new();
        let mut os_vectors = BTreeSet::new();

        walker.walk(Visit::Code, |step| {
            reachable.insert(program.real(step.cursor));
            let op = match step.op {
                Some(op) => op,
                None => return 1,
            };
            let bytes = program.slice(step.cursor, op.len);

            match op.flow() {
                Flow::Branch => {
                    if let Some(target) = program.relative(step.cursor, op.branch_offset(bytes)) {
                        found.insert(target);
                    }
                }
                // The target of JMP (ind) is not known statically.
                Flow::Jump if op.value != Opcode::JMP_INDIRECT => {
                    let target = Opcode::word(bytes);
                    found.insert(target as u32);
                    if os::call_name(target).is_some() {
                        os_calls.insert(target);
                    }
                }
                _ => {}
            }
            if let Some(vector) = op.data_word(bytes).and_then(os::vector_ref) {
                os_vectors.insert(vector.base);
            }
            op.len
        });

        // Branch arithmetic over data bytes can point anywhere, keep only
        // targets that start an instruction.
        let total = found.len();
        let targets: BTreeMap<u32, usize> = found
            .into_iter()
            .filter(|addr| reachable.contains(addr))
            .enumerate()
            .map(|(idx, addr)| (addr, idx))
            .collect();

        debug!(
            "Pass 1: {} instructions, {} labels ({} targets rejected)",
            reachable.len(),
            targets.len(),
            total - targets.len()
        );

        Analysis {
            targets,
            os_calls,
            os_vectors,
        }
    }

    /// Label index of a real address.
    pub fn label(&self, addr: u32) -> Option<usize> {
        self.targets.get(&addr).copied()
    }

    /// `(address, label index)` in ascending address order.
    pub fn labels(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.targets.iter().map(|(&addr, &idx)| (addr, idx))
    }

    pub fn os_calls(&self) -> impl Iterator<Item = u16> + '_ {
        self.os_calls.iter().copied()
    }

    pub fn os_vectors(&self) -> impl Iterator<Item = u16> + '_ {
        self.os_vectors.iter().copied()
    }
}

pub fn label_name(idx: usize) -> String {
    format!("label_{}", idx)
}

/// Names of the form [`label_name`] produces.
pub fn is_label_name(name: &str) -> bool {
    name.strip_prefix("label_")
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{CodeAddrs, Program};

    fn analyse(bytes: &[u8], load: u32, code: &[u32]) -> Analysis {
        let program = Program::new(bytes, 0, bytes.len(), load).unwrap();
        let code = CodeAddrs::normalize(code, load);
        Analysis::run(&Walker::new(&program, &code))
    }

    #[test]
    fn backward_branch_to_self() {
        let a = analyse(&[0xA9, 0x05, 0x90, 0xFE], 0, &[]);
        assert_eq!(a.labels().collect::<Vec<_>>(), vec![(2, 0)]);
    }

    #[test]
    fn labels_follow_address_order() {
        // 0: JMP &0009 / 3: BNE -5 (-> 0) / 5: NOP... / 9: RTS
        let bytes = [0x4C, 0x09, 0x00, 0xD0, 0xFB, 0xEA, 0xEA, 0xEA, 0xEA, 0x60];
        let a = analyse(&bytes, 0, &[]);
        assert_eq!(a.labels().collect::<Vec<_>>(), vec![(0, 0), (9, 1)]);
    }

    #[test]
    fn load_address_applies_to_branches() {
        // BEQ +0 at &1900 targets &1902.
        let a = analyse(&[0xF0, 0x00, 0x60], 0x1900, &[]);
        assert_eq!(a.label(0x1902), Some(0));
        assert_eq!(a.label(0x0002), None);
    }

    #[test]
    fn unreachable_targets_are_dropped() {
        // BNE +1 lands in the middle of LDA #&EA.
        let a = analyse(&[0xD0, 0x01, 0xA9, 0xEA, 0x60], 0, &[]);
        assert_eq!(a.labels().count(), 0);
        // Jump outside the window.
        let a = analyse(&[0x4C, 0x00, 0x30], 0, &[]);
        assert_eq!(a.labels().count(), 0);
    }

    #[test]
    fn forced_address_makes_target_reachable() {
        let bytes = [0xD0, 0x01, 0xA9, 0xEA, 0x60];
        let a = analyse(&bytes, 0, &[3]);
        assert_eq!(a.label(3), Some(0));
    }

    #[test]
    fn indirect_jump_has_no_target() {
        let a = analyse(&[0x6C, 0x00, 0x00], 0, &[]);
        assert_eq!(a.labels().count(), 0);
    }

    #[test]
    fn os_symbols() {
        // JSR OSWRCH / JMP (WRCHV) / STA BRKV+1 / LDA &0204,X
        let bytes = [
            0x20, 0xEE, 0xFF, 0x6C, 0x0E, 0x02, 0x8D, 0x03, 0x02, 0xBD, 0x04, 0x02,
        ];
        let a = analyse(&bytes, 0, &[]);
        assert_eq!(a.os_calls().collect::<Vec<_>>(), vec![0xFFEE]);
        assert_eq!(
            a.os_vectors().collect::<Vec<_>>(),
            vec![0x0202, 0x0204, 0x020E]
        );
    }

    #[test]
    fn deterministic() {
        let bytes = [0xD0, 0x02, 0xF0, 0xFC, 0x90, 0xFA, 0x60];
        assert_eq!(analyse(&bytes, 0x2000, &[]), analyse(&bytes, 0x2000, &[]));
    }
}
