//! Represents flags that aid in implementation but aren't a part of the Chip-8 machine

use super::quirks::Quirks;

/// The default number of instructions executed per timer decrement
pub const CYCLES_PER_TIMER_TICK: usize = 8;

/// Represents flags that aid in operation, but aren't inherent to the CPU
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags {
    /// Set when debug (live disassembly) mode enabled
    pub debug: bool,
    /// Set when the emulator is paused by the user and should not update
    pub pause: bool,
    /// Set while the program is blocked in `Fx0A`, waiting for a keypress
    pub keypause: bool,
    /// Represents the set of emulator [Quirks] to enable
    pub quirks: Quirks,
    /// Represents the number of instructions to run per tick of the internal timer.
    ///
    /// When `None`, the timers only move when the host calls
    /// [CPU::tick_timers](super::CPU::tick_timers), e.g. at 60Hz wall-clock time.
    pub monotonic: Option<usize>,
}

impl Flags {
    /// Toggles debug mode
    ///
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(false, cpu.flags.debug);
    /// // Toggle debug mode
    /// cpu.flags.debug();
    /// assert_eq!(true, cpu.flags.debug);
    /// ```
    pub fn debug(&mut self) {
        self.debug = !self.debug
    }

    /// Toggles pause
    ///
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(false, cpu.flags.pause);
    /// // Pause the cpu
    /// cpu.flags.pause();
    /// assert_eq!(true, cpu.flags.pause);
    /// ```
    pub fn pause(&mut self) {
        self.pause = !self.pause
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags {
            debug: false,
            pause: false,
            keypause: false,
            quirks: Quirks::default(),
            monotonic: Some(CYCLES_PER_TIMER_TICK),
        }
    }
}
