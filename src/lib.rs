// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! This crate implements a Chip-8 virtual machine as a plain state machine.
//!
//! The host owns a [CPU], loads a program into it, and advances it one
//! instruction at a time with [CPU::do_cycle]. Between cycles the host pushes
//! keypad state in with [CPU::load_key] and pulls the framebuffer out with
//! [CPU::load_screen] whenever [CPU::draw_flag] says something changed.
//!
//! There is no timing thread: how often the host calls [CPU::do_cycle] decides
//! how fast the program (and, by default, its timers) run.

pub mod cpu;
pub mod error;
pub mod keypad;
pub mod screen;

pub use cpu::{
    debug::DebugInfo,
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    quirks::Quirks,
    CPU,
};
pub use error::Result;
pub use screen::Screen;

/// Common imports for chip8vm
pub mod prelude {
    use super::*;
    pub use cpu::{
        mem::{FONT, FONT_ADDR, MEMORY_SIZE, PROGRAM_ADDR, PROGRAM_CAPACITY},
        CPU,
    };
    pub use error::{Error, Result};
    pub use keypad::{identify_key, parse_keys};
    pub use screen::{Screen, SCREEN_HEIGHT, SCREEN_SIZE, SCREEN_WIDTH};
    pub use super::{DebugInfo, Dis, Disassembler, Flags, Insn, Quirks};
}
