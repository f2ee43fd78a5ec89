use bimap::BiMap;
use std::collections::BTreeMap;

use crate::analysis::is_label_name;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDef {
    /// The literal as written by the user, echoed into the header.
    pub literal: String,
    pub value: u16,
}

/// User supplied symbols substituted for matching operands.
///
/// Names and values are both unique, so each operand value resolves to at
/// most one name.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    defs: BTreeMap<String, VarDef>,
    index: BiMap<String, u16>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name` from a decimal or `&`-prefixed hexadecimal literal.
    pub fn define(&mut self, name: &str, literal: &str) -> Result<(), Error> {
        if !is_symbol(name) {
            return Err(Error::InvalidName(name.to_string()));
        }
        if arch::os::is_reserved(name) || is_label_name(name) {
            return Err(Error::ReservedName(name.to_string()));
        }
        let value = parse_literal(literal)?;
        let value = u16::try_from(value).map_err(|_| Error::OutOfRange(literal.to_string()))?;

        if self.index.contains_left(name) {
            return Err(Error::RedefinedVariable(name.to_string()));
        }
        if let Some(other) = self.index.get_by_right(&value) {
            return Err(Error::DuplicateValue(other.clone(), name.to_string(), value));
        }

        // BeebAsm has no `0x` prefix.
        let literal = match literal.starts_with("0x") || literal.starts_with("0X") {
            true => format!("&{:X}", value),
            false => literal.to_string(),
        };
        self.index.insert(name.to_string(), value);
        self.defs.insert(name.to_string(), VarDef { literal, value });
        Ok(())
    }

    /// Define a variable from `NAME=VALUE`.
    pub fn define_pair(&mut self, def: &str) -> Result<(), Error> {
        let (name, literal) = split_definition(def)?;
        self.define(name, literal)
    }

    pub fn lookup(&self, value: u16) -> Option<&str> {
        self.index.get_by_right(&value).map(|name| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&VarDef> {
        self.defs.get(name)
    }

    /// Definitions ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VarDef)> {
        self.defs.iter().map(|(name, def)| (name.as_str(), def))
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

pub fn split_definition(def: &str) -> Result<(&str, &str), Error> {
    match def.split_once('=') {
        Some((name, literal)) if !name.trim().is_empty() && !literal.trim().is_empty() => {
            Ok((name.trim(), literal.trim()))
        }
        _ => Err(Error::MalformedDefinition(def.to_string())),
    }
}

/// Parse `123`, `&7B` or `0x7B`.
pub fn parse_literal(s: &str) -> Result<u32, Error> {
    let (digits, radix) = if let Some(hex) = s.strip_prefix('&') {
        (hex, 16)
    } else if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else {
        (s, 10)
    };
    u32::from_str_radix(digits, radix).map_err(|err| Error::ParseLiteral(s.to_string(), err))
}

// BeebAsm symbols: a letter or underscore, then letters, digits or underscores.
fn is_symbol(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(head) if head.is_ascii_alphabetic() || head == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
