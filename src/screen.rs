// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's framebuffer

use std::fmt::{Display, Formatter, Result};

/// Width of the screen, in pixels
pub const SCREEN_WIDTH: usize = 64;
/// Height of the screen, in pixels
pub const SCREEN_HEIGHT: usize = 32;
/// Number of pixels on the screen
pub const SCREEN_SIZE: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// A 64x32 monochrome framebuffer, one byte (`0` or `1`) per pixel, row-major
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Screen {
    pixels: Vec<u8>,
}

impl Screen {
    /// Constructs a blank screen
    pub fn new() -> Self {
        Screen {
            pixels: vec![0; SCREEN_SIZE],
        }
    }

    /// Turns every pixel off
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Gets the pixel at (`x`, `y`), if it's on the screen
    /// # Examples
    /// ```rust
    ///# use chip8vm::Screen;
    /// let screen = Screen::new();
    /// assert_eq!(Some(false), screen.get(63, 31));
    /// assert_eq!(None, screen.get(64, 0));
    /// ```
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return None;
        }
        Some(self.pixels[y * SCREEN_WIDTH + x] != 0)
    }

    /// XORs `bit` into the pixel at the linear `index`.
    ///
    /// Returns `Some(collided)`, where `collided` is true when the old pixel
    /// and `bit` were both set, or `None` if `index` is off the end of the screen.
    #[inline(always)]
    pub fn xor(&mut self, index: usize, bit: u8) -> Option<bool> {
        let pixel = self.pixels.get_mut(index)?;
        let collided = *pixel & bit != 0;
        *pixel ^= bit;
        Some(collided)
    }

    /// Gets the framebuffer as a slice of [SCREEN_SIZE] pixels
    pub fn as_slice(&self) -> &[u8] {
        &self.pixels
    }

    /// Copies the framebuffer into `buffer`
    pub fn copy_to(&self, buffer: &mut [u8; SCREEN_SIZE]) {
        buffer.copy_from_slice(&self.pixels);
    }

    /// Expands the framebuffer into packed 24-bit RGB, `fg` for lit pixels and `bg` otherwise
    /// # Examples
    /// ```rust
    ///# use chip8vm::Screen;
    /// let rgb = Screen::new().to_rgb([0xff; 3], [0x10, 0x20, 0x30]);
    /// assert_eq!(64 * 32 * 3, rgb.len());
    /// assert_eq!(&[0x10_u8, 0x20, 0x30], &rgb[0..3]);
    /// ```
    pub fn to_rgb(&self, fg: [u8; 3], bg: [u8; 3]) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&pixel| if pixel != 0 { fg } else { bg })
            .collect()
    }

    /// Prints the screen to stdout
    ///
    /// Uses braille characters when the `drawille` feature is enabled
    pub fn print_screen(&self) {
        #[cfg(feature = "drawille")]
        {
            use drawille::Canvas;
            let mut canvas = Canvas::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32);
            self.pixels
                .iter()
                .enumerate()
                .filter(|(_, &pixel)| pixel != 0)
                .for_each(|(index, _)| {
                    canvas.set(
                        (index % SCREEN_WIDTH) as u32,
                        (index / SCREEN_WIDTH) as u32,
                    )
                });
            println!("{}", canvas.frame());
        }
        #[cfg(not(feature = "drawille"))]
        println!("{self}");
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("Screen")
            .field("lit", &self.pixels.iter().filter(|&&p| p != 0).count())
            .finish_non_exhaustive()
    }
}

/// Renders the screen as rows of block characters
impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for row in self.pixels.chunks_exact(SCREEN_WIDTH) {
            for &pixel in row {
                write!(f, "{}", if pixel != 0 { '█' } else { ' ' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
