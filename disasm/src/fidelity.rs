//! Checks that an instruction survives a trip through BeebAsm unchanged.

use arch::Opcode;

/// BeebAsm assembles `LDA &0012` as `LDA &12` when the zero page form exists,
/// which changes the instruction length. Absolute operands below &100 are
/// therefore never emitted as instructions.
pub fn will_assemble_identically(op: &Opcode, bytes: &[u8]) -> bool {
    !(op.mode.is_absolute() && Opcode::word(bytes) < 0x100)
}

pub fn is_opcode_documented(op: &Opcode) -> bool {
    op.is_documented()
}
