use std::io::Write;

use crate::analysis::Analysis;
use crate::error::Error;
use crate::program::{CodeAddrs, Program};
use crate::render::Renderer;
use crate::vars::Variables;
use crate::walk::Walker;

/// Converts a 6502 program image into BeebAsm source that reassembles to the
/// same bytes.
#[derive(Debug, Clone)]
pub struct Disassembler<'a> {
    program: &'a [u8],
    offset: usize,
    length: Option<usize>,
    load: u32,
    code_addrs: Vec<u32>,
    vars: Variables,
}

impl<'a> Disassembler<'a> {
    pub fn new(program: &'a [u8]) -> Self {
        Disassembler {
            program,
            offset: 0,
            length: None,
            load: 0,
            code_addrs: vec![],
            vars: Variables::new(),
        }
    }

    /// Buffer offset of the first byte to disassemble.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Number of bytes to disassemble. Defaults to the rest of the buffer.
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Address the image is loaded at.
    pub fn load_addr(mut self, load: u32) -> Self {
        self.load = load;
        self
    }

    /// Real address that must be decoded as the start of an instruction.
    pub fn code_addr(mut self, addr: u32) -> Self {
        self.code_addrs.push(addr);
        self
    }

    pub fn add_var(&mut self, name: &str, literal: &str) -> Result<(), Error> {
        self.vars.define(name, literal)
    }

    pub fn vars(&self) -> &Variables {
        &self.vars
    }

    fn window(&self) -> Result<Program<'a>, Error> {
        let length = self
            .length
            .unwrap_or_else(|| self.program.len().saturating_sub(self.offset));
        Program::new(self.program, self.offset, length, self.load)
    }

    /// Run the first pass only.
    pub fn analyse(&self) -> Result<Analysis, Error> {
        let program = self.window()?;
        let code = CodeAddrs::normalize(&self.code_addrs, self.load);
        Ok(Analysis::run(&Walker::new(&program, &code)))
    }

    /// Write the header and the disassembly of the window to `w`.
    pub fn disassemble<W: Write>(&self, w: &mut W) -> Result<(), Error> {
        let program = self.window()?;
        let code = CodeAddrs::normalize(&self.code_addrs, self.load);
        let walker = Walker::new(&program, &code);

        let analysis = Analysis::run(&walker);
        let renderer = Renderer::new(&program, &analysis, &self.vars);
        renderer.header(w)?;
        renderer.body(&walker, w)?;
        Ok(())
    }

    pub fn disassemble_to_string(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        self.disassemble(&mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
