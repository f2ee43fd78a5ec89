pub mod mode;
pub mod op;
pub mod os;

pub use mode::AddrMode;
pub use op::{Flow, Mnemonic, Opcode};
