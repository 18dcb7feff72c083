//! DAC output contract and drivers.
//!
//! The engine only needs [`DacOutput`]: a bounded-time synchronous write of
//! one 12-bit code to one channel. Chip-specific framing lives in the
//! drivers.
//!
//! # Feature gate
//!
//! The MCP4822 driver is available when the `mcp4822` feature is enabled
//! (on by default).

#[cfg(feature = "mcp4822")]
pub(crate) mod registers;
#[cfg(feature = "mcp4822")]
mod mcp4822;

#[cfg(feature = "mcp4822")]
pub use mcp4822::{command_word, Gain, Mcp4822, Mcp4822Error};

/// DAC output selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Primary output (in-phase).
    A,
    /// Secondary output (quadrature in dual-channel mode).
    B,
}

/// A converter that accepts 12-bit codes on two channels.
pub trait DacOutput {
    /// Error type for a failed transfer.
    type Error;

    /// Write `code` (lower 12 bits) to `channel`.
    ///
    /// Must complete in bounded time: it is called from the sample interrupt.
    fn write(&mut self, code: u16, channel: Channel) -> Result<(), Self::Error>;
}

impl<D: DacOutput + ?Sized> DacOutput for &mut D {
    type Error = D::Error;

    #[inline(always)]
    fn write(&mut self, code: u16, channel: Channel) -> Result<(), Self::Error> {
        (**self).write(code, channel)
    }
}
