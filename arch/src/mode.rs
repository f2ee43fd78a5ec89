use strum::Display;

// Implied      - BRK
// Accumulator  - ASL A
// Immediate    - LDA #&FF
// Absolute     - LDA &1234
// ZeroPage     - LDA &12
// ZeroPageX    - LDA &12,X
// ZeroPageY    - LDX &12,Y
// ZeroPageRel  - BBR6 &12,#34
// Indirect     - JMP (&1234)
// AbsoluteX    - LDA &1234,X
// AbsoluteY    - LDA &1234,Y
// IndirectX    - LDA (&80,X)
// IndirectY    - LDA (&80),Y
// IndirectZP   - LDA (&80)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum AddrMode {
    Implied,
    Accumulator,
    Immediate,
    Absolute,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    ZeroPageRel,
    Indirect,
    AbsoluteX,
    AbsoluteY,
    IndirectX,
    IndirectY,
    IndirectZP,
}

impl AddrMode {
    /// Plain, X- and Y-indexed absolute. BeebAsm folds these to the zero page
    /// encoding whenever the operand fits in a byte.
    pub fn is_absolute(&self) -> bool {
        matches!(
            self,
            AddrMode::Absolute | AddrMode::AbsoluteX | AddrMode::AbsoluteY
        )
    }

    /// Modes whose operand is a 16-bit little-endian address.
    pub fn has_word_operand(&self) -> bool {
        self.is_absolute() || *self == AddrMode::Indirect
    }

    /// Operand bytes following the opcode byte.
    pub fn operand_len(&self) -> usize {
        use AddrMode::*;
        match self {
            Implied | Accumulator => 0,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY | IndirectX | IndirectY | IndirectZP => 1,
            Absolute | AbsoluteX | AbsoluteY | Indirect | ZeroPageRel => 2,
        }
    }
}

#[test]
fn test() {
    assert!(AddrMode::AbsoluteY.is_absolute());
    assert!(!AddrMode::Indirect.is_absolute());
    assert!(AddrMode::Indirect.has_word_operand());
    assert!(!AddrMode::ZeroPage.has_word_operand());
    assert_eq!(AddrMode::ZeroPageX.to_string(), "ZeroPageX");
}
