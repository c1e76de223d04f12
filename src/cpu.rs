// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod debug;
pub mod flags;
pub mod instruction;
pub mod mem;
pub mod quirks;

use self::{
    debug::DebugInfo,
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    mem::{Mem, PROGRAM_ADDR},
};
use crate::{
    error::{Error, Result},
    screen::{Screen, SCREEN_SIZE},
};
use owo_colors::OwoColorize;
use std::fmt::Debug;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Number of return addresses the stack can hold
pub const STACK_DEPTH: usize = 16;

/// Represents the internal state of the CPU interpreter
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes [Quirks](quirks::Quirks), timer rate, etc.
    pub flags: Flags,
    // memory
    mem: Mem,
    screen: Screen,
    stack: [Adr; STACK_DEPTH],
    sp: usize,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // I/O
    keys: [bool; 16],
    draw_flag: bool,
    // Execution data
    opcode: u16,
    timer_phase: usize,
    cycle: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    disassembler: Dis,
}

// public interface
impl CPU {
    /// Constructs a new, initialized CPU
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let cpu = CPU::new(Dis::default(), Flags::default());
    /// assert_eq!(0x200, cpu.pc());
    /// dbg!(cpu);
    /// ```
    pub fn new(disassembler: Dis, flags: Flags) -> Self {
        CPU {
            flags,
            mem: Mem::new(),
            screen: Screen::new(),
            stack: [0; STACK_DEPTH],
            sp: 0,
            pc: PROGRAM_ADDR,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            keys: [false; 16],
            draw_flag: false,
            opcode: 0,
            timer_phase: 0,
            cycle: 0,
            disassembler,
        }
    }

    /// Resets the machine to a clean state, ready for a new program.
    ///
    /// Zeroes memory (then reinstalls the font), registers, stack, timers,
    /// keys, and the screen, and points the program counter at 0x200.
    ///
    /// Does not touch [Flags] other than releasing keypause.
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    ///# fn main() -> Result<()> {
    /// let mut cpu = CPU::default();
    /// cpu.load_program(&[0x12, 0x34])?.do_cycle()?;
    /// assert_eq!(0x234, cpu.pc());
    /// cpu.initialize();
    /// assert_eq!(0x200, cpu.pc());
    /// assert_eq!(0, cpu.mem().read_word(0x200));
    ///#    Ok(())
    ///# }
    /// ```
    pub fn initialize(&mut self) {
        self.flags.keypause = false;
        self.mem.reset();
        self.screen.clear();
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        self.pc = PROGRAM_ADDR;
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        self.keys = [false; 16];
        self.draw_flag = false;
        self.opcode = 0;
        self.timer_phase = 0;
        self.cycle = 0;
    }

    /// Loads a program into the CPU's program space
    pub fn load_program_file(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        self.load_program(&std::fs::read(rom)?)
    }

    /// Loads bytes into the CPU's program space, starting at 0x200.
    ///
    /// Returns [Error::ProgramTooLarge] if the program doesn't fit.
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// assert!(cpu.load_program(&[0xa2, 0x2a]).is_ok());
    /// assert!(cpu.load_program(&[0; 0xe01]).is_err());
    /// ```
    pub fn load_program(&mut self, rom: &[u8]) -> Result<&mut Self> {
        self.mem.load_program(rom)?;
        Ok(self)
    }

    /// Replaces the state of all 16 keys at once
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// let mut keys = [false; 16];
    /// keys[0xa] = true;
    /// cpu.load_key(keys);
    /// assert_eq!(&keys, cpu.keys());
    /// ```
    pub fn load_key(&mut self, keys: [bool; 16]) {
        self.keys = keys;
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    ///
    /// // press key `7`
    /// let did_press = cpu.press(0x7).unwrap();
    /// assert!(did_press);
    ///
    /// // press key `7` again, even though it's already pressed
    /// let did_press = cpu.press(0x7).unwrap();
    /// // it was already pressed, so nothing's changed.
    /// assert!(!did_press);
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        Ok(!std::mem::replace(keyref, true))
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// // press key `7`
    /// cpu.press(0x7).unwrap();
    /// // release key `7`
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(changed); // key released
    /// // try releasing `7` again
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(!changed); // key was not held
    /// ```
    pub fn release(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        Ok(std::mem::replace(keyref, false))
    }

    /// Gets the state of every key
    pub fn keys(&self) -> &[bool; 16] {
        &self.keys
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// // Create a new CPU, and set v4 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// assert!(cpu.set_v(0x10, 0x41).is_err());
    /// // Dump the CPU registers
    /// cpu.dump();
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        if let Some(gpr) = self.v.get_mut(reg) {
            *gpr = value;
            Ok(())
        } else {
            Err(Error::InvalidRegister { reg })
        }
    }

    /// Gets a slice of the entire general purpose registers
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// // Create a new CPU, and set v4 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x0, 0x41);
    /// assert_eq!(
    ///     cpu.v(),
    ///     [0x41, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    /// )
    /// ```
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0, cpu.i());
    /// ```
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the stack pointer (the number of return addresses on the stack)
    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Gets the most recently fetched instruction word
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    ///# fn main() -> Result<()> {
    /// let mut cpu = CPU::default();
    /// assert_eq!(0, cpu.opcode());
    /// cpu.load_program(&[0x12, 0x34])?.do_cycle()?;
    /// assert_eq!(0x1234, cpu.opcode());
    ///#    Ok(())
    ///# }
    /// ```
    pub fn opcode(&self) -> u16 {
        self.opcode
    }

    /// Gets the value in the Sound Timer register
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0, cpu.sound());
    /// ```
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Reports whether the buzzer should be sounding
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }

    /// Gets the value in the Delay Timer register
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0, cpu.delay());
    /// ```
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Gets the number of cycles the CPU has executed since [CPU::initialize]
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0x0, cpu.cycle());
    /// ```
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Gets a read-only view of memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Gets a read-only view of the framebuffer
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Copies the framebuffer (row-major, 64x32, one byte per pixel) into `buffer`
    pub fn load_screen(&self, buffer: &mut [u8; SCREEN_SIZE]) {
        self.screen.copy_to(buffer)
    }

    /// Reports whether the most recent cycle modified the framebuffer
    pub fn draw_flag(&self) -> bool {
        self.draw_flag
    }

    /// Reads and clears the draw flag
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    ///# fn main() -> Result<()> {
    /// let mut cpu = CPU::default();
    /// cpu.load_program(&[0x00, 0xe0])?.do_cycle()?;
    /// assert!(cpu.take_draw_flag());
    /// assert!(!cpu.take_draw_flag());
    ///#    Ok(())
    ///# }
    /// ```
    pub fn take_draw_flag(&mut self) -> bool {
        std::mem::take(&mut self.draw_flag)
    }

    /// Copies out the registers an inspection tool is interested in
    pub fn debug_info(&self) -> DebugInfo {
        DebugInfo {
            pc: self.pc,
            opcode: self.opcode,
            v: self.v,
            i: self.i,
            delay: self.delay,
            sound: self.sound,
        }
    }

    /// Decrements both timers by one, stopping at zero.
    ///
    /// Called automatically every [Flags::monotonic] cycles. Hosts which
    /// set `monotonic` to `None` should call this at 60Hz instead.
    pub fn tick_timers(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// Runs `steps` cycles, unless paused
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.multistep(0x20)
    ///     .expect("The program should not fault.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(0x20, cpu.cycle());
    /// ```
    pub fn multistep(&mut self, steps: usize) -> Result<&mut Self> {
        if self.flags.pause {
            return Ok(self);
        }
        for _ in 0..steps {
            self.do_cycle()?;
        }
        Ok(self)
    }

    /// Executes a single instruction
    ///
    /// Words which don't decode to an instruction, including `0aaa` machine
    /// code calls, are skipped over as no-ops.
    ///
    /// Returns [Error::StackOverflow] or [Error::StackUnderflow] if a call or
    /// return faults. The program counter is left on the faulting instruction.
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program(&[
    ///     0x00, 0xe0, // cls
    ///     0x22, 0x02, // call 0x202 (pc)
    /// ]).unwrap();
    /// cpu.do_cycle()
    ///     .expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// ```
    /// A runaway recursion eventually overflows the stack:
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program(&[0x22, 0x00]).unwrap(); // call 0x200
    /// dbg!(cpu.multistep(17))
    ///     .expect_err("Should return Error::StackOverflow { pc: 0x200 }");
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn do_cycle(&mut self) -> Result<&mut Self> {
        let addr = self.pc;
        // fetch opcode
        self.opcode = self.mem.read_word(addr);
        self.pc = addr.wrapping_add(2);
        self.draw_flag = false;
        self.cycle += 1;

        // timers run at a fixed fraction of the instruction rate
        if let Some(rate) = self.flags.monotonic {
            self.timer_phase = (self.timer_phase + 1) % rate.max(1);
            if self.timer_phase == 0 {
                self.tick_timers();
            }
        }

        // Print opcode disassembly:
        if self.flags.debug {
            std::println!(
                "{:3} {:03x}: {:<36}",
                self.cycle.bright_black(),
                addr,
                self.disassembler.once(self.opcode)
            );
        }

        // decode opcode
        if let Some(insn) = Insn::from_word(self.opcode) {
            if let Err(e) = self.execute(insn) {
                self.pc = addr;
                return Err(e);
            }
        }
        Ok(self)
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, OP: 0000, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0
    /// SP: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "{}\n{} {:x}, {} {:6}",
            self.debug_info(),
            "SP:".bright_black(),
            self.sp,
            "CYC:".bright_black(),
            self.cycle,
        );
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("stack", &&self.stack[..self.sp])
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("keys", &self.keys)
            .field("draw_flag", &self.draw_flag)
            .field("opcode", &self.opcode)
            .field("cycle", &self.cycle)
            .field("screen", &self.screen)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU with the default [Flags]: debug off, and timers
    /// decrementing once every 8 cycles
    ///
    /// # Examples
    /// ```rust
    /// use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// ```
    fn default() -> Self {
        CPU::new(Dis::default(), Flags::default())
    }
}
