use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;

use crate::disassembler::Disassembler;
use crate::error::Error;
use crate::vars::parse_literal;

/// A number written either as a YAML integer or as a `&1900` style string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(u32),
    Text(String),
}

impl Number {
    pub fn value(&self) -> Result<u32, Error> {
        match self {
            Number::Int(v) => Ok(*v),
            Number::Text(s) => parse_literal(s.trim()),
        }
    }

    pub fn literal(&self) -> String {
        match self {
            Number::Int(v) => v.to_string(),
            Number::Text(s) => s.trim().to_string(),
        }
    }
}

/// Disassembly settings, read from a YAML file and/or the command line.
///
/// ```yaml
/// load: "&1900"
/// code: ["&1A00", "&1B40"]
/// vars:
///   PTR: "&70"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub offset: Option<Number>,
    pub length: Option<Number>,
    pub load: Option<Number>,
    pub code: Vec<Number>,
    pub vars: IndexMap<String, Number>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Error> {
        let file = File::open(path).map_err(|err| Error::FileOpen(path.to_string(), err))?;
        serde_yaml::from_reader(BufReader::new(file))
            .map_err(|err| Error::Config(path.to_string(), err))
    }

    pub fn parse(yaml: &str) -> Result<Self, Error> {
        serde_yaml::from_str(yaml).map_err(|err| Error::Config("<inline>".to_string(), err))
    }

    /// Layer `other` on top of `self`. Scalars in `other` win, code addresses
    /// and variables are appended.
    pub fn merge(&mut self, other: Config) {
        if other.offset.is_some() {
            self.offset = other.offset;
        }
        if other.length.is_some() {
            self.length = other.length;
        }
        if other.load.is_some() {
            self.load = other.load;
        }
        self.code.extend(other.code);
        self.vars.extend(other.vars);
    }

    pub fn build<'a>(&self, program: &'a [u8]) -> Result<Disassembler<'a>, Error> {
        let mut disasm = Disassembler::new(program);
        if let Some(offset) = &self.offset {
            disasm = disasm.offset(offset.value()? as usize);
        }
        if let Some(length) = &self.length {
            disasm = disasm.length(length.value()? as usize);
        }
        if let Some(load) = &self.load {
            disasm = disasm.load_addr(load.value()?);
        }
        for addr in &self.code {
            disasm = disasm.code_addr(addr.value()?);
        }
        for (name, value) in &self.vars {
            disasm.add_var(name, &value.literal())?;
        }
        Ok(disasm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_yaml() {
        let config = Config::parse(
            "load: \"&1900\"\noffset: 16\ncode: [\"&1A00\", 6912]\nvars:\n  PTR: \"&70\"\n  COUNT: 3\n",
        )
        .unwrap();
        assert_eq!(config.load, Some(Number::Text("&1900".into())));
        assert_eq!(config.offset, Some(Number::Int(16)));
        assert_eq!(config.code[0].value().unwrap(), 0x1A00);
        assert_eq!(config.code[1].value().unwrap(), 0x1B00);
        let names: Vec<_> = config.vars.keys().cloned().collect();
        assert_eq!(names, vec!["PTR", "COUNT"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            Config::parse("lode: 1\n"),
            Err(Error::Config(..))
        ));
    }

    #[test]
    fn merge_overrides_scalars() {
        let mut base = Config::parse("load: 100\ncode: [1]\n").unwrap();
        let cli = Config {
            load: Some(Number::Text("&1900".into())),
            code: vec![Number::Int(2)],
            ..Config::default()
        };
        base.merge(cli);
        assert_eq!(base.load.unwrap().value().unwrap(), 0x1900);
        assert_eq!(base.code, vec![Number::Int(1), Number::Int(2)]);
    }

    #[test]
    fn build_reports_bad_literals() {
        let config = Config {
            vars: [("PTR".to_string(), Number::Text("&7G".into()))]
                .into_iter()
                .collect(),
            ..Config::default()
        };
        assert!(matches!(config.build(&[0x00]), Err(Error::ParseLiteral(..))));
    }

    #[test]
    fn build_applies_settings() {
        let config = Config::parse("load: \"&1900\"\nvars:\n  PTR: \"&70\"\n").unwrap();
        let disasm = config.build(&[0xA5, 0x70]).unwrap();
        assert_eq!(disasm.vars().lookup(0x70), Some("PTR"));
        let text = disasm.disassemble_to_string().unwrap();
        assert!(text.contains("CODE% = &1900"));
        assert!(text.contains(" LDA PTR"));
    }
}
