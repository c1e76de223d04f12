//! Controls the [Quirks] behavior of the CPU on a granular level.

/// Controls the quirk behavior of the CPU on a granular level.
///
/// `false` everywhere is the behavior this interpreter pins by default:
/// bitwise ops leave vF alone, shifts operate on vX, `Fx55`/`Fx65` leave I
/// untouched, and sprites are drawn without wrapping at the screen edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quirks {
    /// Cosmac VIP: Binary ops in `8xy`(`1`, `2`, `3`) should set vF to 0
    pub bin_ops: bool,
    /// Cosmac VIP: Shift ops in `8xy`(`6`, `E`) should source from vY instead of vX
    pub shift: bool,
    /// Cosmac VIP: DMA instructions `Fx55`/`Fx65` should change I to I + x + 1
    pub dma_inc: bool,
    /// Draw operations should wrap from bottom to top and side to side
    pub screen_wrap: bool,
}

impl From<bool> for Quirks {
    fn from(value: bool) -> Self {
        if value {
            Quirks {
                bin_ops: true,
                shift: true,
                dma_inc: true,
                screen_wrap: true,
            }
        } else {
            Quirks {
                bin_ops: false,
                shift: false,
                dma_inc: false,
                screen_wrap: false,
            }
        }
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Self::from(false)
    }
}
