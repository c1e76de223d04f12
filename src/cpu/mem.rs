// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Mem represents the CPU's memory
//!
//! Contains the memory map constants, the built-in font, and some handy utils
//! for reading and writing

use crate::error::{Error, Result};
use std::{
    fmt::{Debug, Formatter},
    slice::SliceIndex,
};

/// Size of the address space, in bytes
pub const MEMORY_SIZE: usize = 0x1000;
/// Location of the built-in hex font
pub const FONT_ADDR: u16 = 0x050;
/// Location programs are loaded to, and where execution begins
pub const PROGRAM_ADDR: u16 = 0x200;
/// Number of bytes available to a program
pub const PROGRAM_CAPACITY: usize = MEMORY_SIZE - PROGRAM_ADDR as usize;
/// Size of one font glyph, in bytes
pub const GLYPH_SIZE: u16 = 5;

/// The 4x5 hex digit glyphs `0`..=`F`, one byte per row, high nibble used
#[rustfmt::skip]
pub const FONT: [u8; 80] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];

/// 4 KiB of flat, byte-addressed memory.
///
/// Addresses wrap at the end of the address space, so `I`-relative accesses
/// near `0xfff` never leave the array.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mem {
    memory: Vec<u8>,
}

impl Mem {
    /// Constructs a zeroed mem, with the font installed
    /// # Examples
    /// ```rust
    ///# use chip8vm::cpu::mem::*;
    /// let mem = Mem::new();
    /// assert_eq!(&FONT[..], mem.grab(0x50..0xa0).unwrap());
    /// assert!(mem.grab(0x200..).unwrap().iter().all(|&b| b == 0));
    /// ```
    pub fn new() -> Self {
        let mut mem = Mem {
            memory: vec![0; MEMORY_SIZE],
        };
        mem.load_charset();
        mem
    }

    /// Zeroes all of memory, and reinstalls the font
    pub fn reset(&mut self) {
        self.memory.fill(0);
        self.load_charset();
    }

    /// Copies the built-in font to [FONT_ADDR]
    pub fn load_charset(&mut self) {
        let start = FONT_ADDR as usize;
        self.memory[start..start + FONT.len()].copy_from_slice(&FONT);
    }

    /// Copies `rom` to [PROGRAM_ADDR].
    ///
    /// Returns [Error::ProgramTooLarge], and leaves memory untouched,
    /// if `rom` is longer than [PROGRAM_CAPACITY].
    /// # Examples
    /// ```rust
    ///# use chip8vm::cpu::mem::*;
    ///# fn main() -> chip8vm::Result<()> {
    /// let mut mem = Mem::new();
    /// mem.load_program(&[0x12, 0x00])?;
    /// assert_eq!(0x1200, mem.read_word(0x200));
    /// assert!(mem.load_program(&[0; PROGRAM_CAPACITY + 1]).is_err());
    ///#    Ok(())
    ///# }
    /// ```
    pub fn load_program(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > PROGRAM_CAPACITY {
            return Err(Error::ProgramTooLarge {
                len: rom.len(),
                capacity: PROGRAM_CAPACITY,
            });
        }
        let start = PROGRAM_ADDR as usize;
        self.memory[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    /// Reads the byte at `addr`
    #[inline(always)]
    pub fn read(&self, addr: u16) -> u8 {
        self.memory[addr as usize % MEMORY_SIZE]
    }

    /// Writes `value` to `addr`
    #[inline(always)]
    pub fn write(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize % MEMORY_SIZE] = value;
    }

    /// Reads a big-endian word starting at `addr`
    #[inline(always)]
    pub fn read_word(&self, addr: u16) -> u16 {
        u16::from_be_bytes([self.read(addr), self.read(addr.wrapping_add(1))])
    }

    /// Writes a big-endian word starting at `addr`
    pub fn write_word(&mut self, addr: u16, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.write(addr, hi);
        self.write(addr.wrapping_add(1), lo);
    }

    /// Gets a slice of [Mem] memory
    #[inline(always)]
    pub fn grab<I>(&self, index: I) -> Option<&<I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.memory.get(index)
    }

    /// Gets the entire address space as a slice
    pub fn as_slice(&self) -> &[u8] {
        &self.memory
    }
}

impl Default for Mem {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Mem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mem")
            .field("len", &self.memory.len())
            .finish_non_exhaustive()
    }
}
