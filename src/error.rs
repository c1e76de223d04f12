// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for chip8vm

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for chip8vm.
#[derive(Debug, Error)]
pub enum Error {
    /// Tried to load a program that doesn't fit above the program base address
    #[error("program is {len} bytes, but only {capacity} bytes of program memory exist")]
    ProgramTooLarge {
        /// The length of the rejected program
        len: usize,
        /// The number of bytes available at the program base address
        capacity: usize,
    },
    /// A subroutine call was made with every stack slot already in use
    #[error("stack overflow: call at {pc:03x} with all 16 stack slots in use")]
    StackOverflow {
        /// The address of the offending call
        pc: u16,
    },
    /// A subroutine return was made with an empty stack
    #[error("stack underflow: return at {pc:03x} with an empty stack")]
    StackUnderflow {
        /// The address of the offending return
        pc: u16,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Tried to map a host key name onto the keypad, but it did not match.
    #[error("no keypad key corresponds to \"{name}\"")]
    InvalidKeyName {
        /// The string which failed to become a key
        name: String,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
