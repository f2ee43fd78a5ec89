use color_print::ceprintln;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot parse `{0}` as a number")]
    ParseLiteral(String, #[source] std::num::ParseIntError),

    #[error("Value `{0}` does not fit in 16 bits")]
    OutOfRange(String),

    #[error("Expected NAME=VALUE, found `{0}`")]
    MalformedDefinition(String),

    #[error("Invalid variable name: `{0}`")]
    InvalidName(String),

    #[error("Variable name `{0}` is reserved for a generated symbol")]
    ReservedName(String),

    #[error("Re-defined variable: `{0}`")]
    RedefinedVariable(String),

    #[error("Variables `{0}` and `{1}` share the value &{2:04X}")]
    DuplicateValue(String, String, u16),

    #[error("Window &{offset:X}+&{len:X} exceeds the {size} byte program")]
    WindowOutOfBounds {
        offset: usize,
        len: usize,
        size: usize,
    },

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Config(String, #[source] serde_yaml::Error),

    #[error("Failed to write output")]
    Write(#[from] std::io::Error),
}

impl Error {
    /// Print the error and its chain of causes.
    pub fn print_diag(&self) {
        ceprintln!("<red,bold>error</>: {}", self);
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            ceprintln!("     <blue>--></> {}", cause);
            source = cause.source();
        }
    }
}
