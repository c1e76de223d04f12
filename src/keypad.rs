// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Maps host keys onto the 16-key hex keypad
//!
//! The keypad is laid out like so, and mapped onto the left side of a QWERTY keyboard:
//! ```text
//! 1 2 3 C      1 2 3 4
//! 4 5 6 D  ->  Q W E R
//! 7 8 9 E      A S D F
//! A 0 B F      Z X C V
//! ```

use crate::error::{Error, Result};

/// Identifies the keypad key bound to a host key, ignoring case
/// # Examples
/// ```rust
///# use chip8vm::keypad::identify_key;
/// assert_eq!(Some(0xc), identify_key('4'));
/// assert_eq!(Some(0x0), identify_key('x'));
/// assert_eq!(None, identify_key('p'));
/// ```
pub fn identify_key(key: char) -> Option<usize> {
    match key.to_ascii_lowercase() {
        '1' => Some(0x1),
        '2' => Some(0x2),
        '3' => Some(0x3),
        '4' => Some(0xc),
        'q' => Some(0x4),
        'w' => Some(0x5),
        'e' => Some(0x6),
        'r' => Some(0xd),
        'a' => Some(0x7),
        's' => Some(0x8),
        'd' => Some(0x9),
        'f' => Some(0xe),
        'z' => Some(0xa),
        'x' => Some(0x0),
        'c' => Some(0xb),
        'v' => Some(0xf),
        _ => None,
    }
}

/// Builds a full keypad state from a comma-separated list of keys.
///
/// Each entry is either a keypad digit written as `#X` (hex), or a single host key
/// which is mapped with [identify_key].
/// # Examples
/// ```rust
///# use chip8vm::keypad::parse_keys;
///# fn main() -> chip8vm::Result<()> {
/// let keys = parse_keys("#a, w")?;
/// assert!(keys[0xa] && keys[0x5]);
/// assert_eq!(2, keys.iter().filter(|&&k| k).count());
/// assert!(parse_keys("#10").is_err());
///#    Ok(())
///# }
/// ```
pub fn parse_keys(list: &str) -> Result<[bool; 16]> {
    let mut keys = [false; 16];
    for name in list.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let key = if let Some(digit) = name.strip_prefix('#') {
            usize::from_str_radix(digit, 16)
                .ok()
                .filter(|&key| key < keys.len())
        } else {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => identify_key(c),
                _ => None,
            }
        };
        match key {
            Some(key) => keys[key] = true,
            None => {
                return Err(Error::InvalidKeyName {
                    name: name.to_string(),
                })
            }
        }
    }
    Ok(keys)
}
