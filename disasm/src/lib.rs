mod analysis;
mod config;
mod decode;
mod disassembler;
mod error;
mod fidelity;
mod program;
mod render;
mod vars;
mod walk;

pub use analysis::{is_label_name, label_name, Analysis};
pub use config::{Config, Number};
pub use decode::Decoder;
pub use disassembler::Disassembler;
pub use error::Error;
pub use fidelity::{is_opcode_documented, will_assemble_identically};
pub use program::{CodeAddrs, Program};
pub use render::Renderer;
pub use vars::{parse_literal, split_definition, VarDef, Variables};
pub use walk::{Step, Visit, Walker};
