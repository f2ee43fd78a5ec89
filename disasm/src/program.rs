use log::warn;

use crate::error::Error;

/// The slice of a program image being disassembled.
///
/// Cursors are offsets into the whole buffer. Adding the load address to a
/// cursor gives the real address the byte occupies once loaded.
#[derive(Debug, Clone, Copy)]
pub struct Program<'a> {
    bytes: &'a [u8],
    offset: usize,
    len: usize,
    load: u32,
}

impl<'a> Program<'a> {
    pub fn new(bytes: &'a [u8], offset: usize, len: usize, load: u32) -> Result<Self, Error> {
        match offset.checked_add(len) {
            Some(end) if end <= bytes.len() => Ok(Program {
                bytes,
                offset,
                len,
                load,
            }),
            _ => Err(Error::WindowOutOfBounds {
                offset,
                len,
                size: bytes.len(),
            }),
        }
    }

    pub fn start(&self) -> usize {
        self.offset
    }

    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    pub fn load(&self) -> u32 {
        self.load
    }

    pub fn byte(&self, cursor: usize) -> u8 {
        self.bytes[cursor]
    }

    /// Up to `len` bytes from `cursor`, never reaching past the window.
    pub fn slice(&self, cursor: usize, len: usize) -> &'a [u8] {
        let end = (cursor + len).min(self.end());
        &self.bytes[cursor..end]
    }

    pub fn real(&self, cursor: usize) -> u32 {
        cursor as u32 + self.load
    }

    /// Real address `offset` bytes away from the instruction at `cursor`.
    /// `None` when the arithmetic leaves the address space.
    pub fn relative(&self, cursor: usize, offset: i32) -> Option<u32> {
        u32::try_from(self.real(cursor) as i64 + offset as i64).ok()
    }
}

/// Buffer offsets that must start an instruction, ascending and unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeAddrs(Vec<usize>);

impl CodeAddrs {
    /// Convert real addresses into buffer offsets by removing the load
    /// address. Addresses below the load address cannot be in the buffer and
    /// are dropped.
    pub fn normalize(addrs: &[u32], load: u32) -> Self {
        let mut offsets: Vec<usize> = addrs
            .iter()
            .filter_map(|&addr| match addr.checked_sub(load) {
                Some(offset) => Some(offset as usize),
                None => {
                    warn!(
                        "Ignoring code address &{:04X} below load address &{:04X}",
                        addr, load
                    );
                    None
                }
            })
            .collect();
        offsets.sort_unstable();
        offsets.dedup();
        CodeAddrs(offsets)
    }

    pub fn get(&self, idx: usize) -> Option<usize> {
        self.0.get(idx).copied()
    }

    /// Index of the first offset at or after `cursor`.
    pub fn first_from(&self, cursor: usize) -> usize {
        self.0.partition_point(|&offset| offset < cursor)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
