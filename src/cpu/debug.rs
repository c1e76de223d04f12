// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! A read-only snapshot of the CPU, for inspection tooling

use owo_colors::{OwoColorize, Style};
use std::fmt::{Display, Formatter};

/// Basic debugging info for a Chip-8 machine, copied out of a [CPU](super::CPU)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugInfo {
    /// Program counter
    pub pc: u16,
    /// The most recently fetched instruction word
    pub opcode: u16,
    /// General purpose registers v0..=vF
    pub v: [u8; 16],
    /// Index register
    pub i: u16,
    /// Delay timer
    pub delay: u8,
    /// Sound timer
    pub sound: u8,
}

/// Prints the snapshot as a register dump
/// ```text
/// PC: 0200, OP: 0000, I: 0000
/// v0: 00 v1: 00 v2: 00 v3: 00
/// v4: 00 v5: 00 v6: 00 v7: 00
/// v8: 00 v9: 00 vA: 00 vB: 00
/// vC: 00 vD: 00 vE: 00 vF: 00
/// DLY: 0, SND: 0
/// ```
impl Display for DebugInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = Style::new().bright_black();
        writeln!(
            f,
            "{} {:04x}, {} {:04x}, {} {:04x}",
            "PC:".style(label),
            self.pc,
            "OP:".style(label),
            self.opcode,
            "I:".style(label),
            self.i
        )?;
        for (i, gpr) in self.v.iter().enumerate() {
            write!(f, "{} {gpr:02x}", format_args!("v{i:X}:").style(label))?;
            match i % 4 {
                3 => writeln!(f)?,
                _ => write!(f, " ")?,
            }
        }
        write!(
            f,
            "{} {}, {} {}",
            "DLY:".style(label),
            self.delay,
            "SND:".style(label),
            self.sound
        )
    }
}
