//! MCP4822 dual 12-bit SPI DAC driver.
//!
//! The driver is generic over any [`embedded_hal::spi::SpiDevice`] (which owns
//! chip select) and an [`embedded_hal::digital::OutputPin`] wired to LDAC.
//! LDAC is held high while a word is shifted in and pulled low afterwards,
//! which latches the new code onto the output.
//!
//! # Example
//!
//! ```ignore
//! let mut dac = Mcp4822::new(spi, ldac);
//! dac.init()?;
//! dac.write_code(0x800, Channel::A)?;   // mid-scale on A
//! dac.shutdown(Channel::B)?;            // B output to high impedance
//! ```

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use super::registers as reg;
use super::{Channel, DacOutput};

/// Output amplifier gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gain {
    /// 1×: full scale is the 2.048 V reference.
    Unity,
    /// 2×: full scale is 4.096 V (limited by VDD).
    Double,
}

/// Failure on either the SPI bus or the LDAC pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mcp4822Error<S, P> {
    /// SPI transfer failed.
    Spi(S),
    /// LDAC pin could not be driven.
    Pin(P),
}

/// MCP4822 driver.
pub struct Mcp4822<SPI, LDAC> {
    spi: SPI,
    ldac: LDAC,
    gain: Gain,
}

impl<SPI, LDAC> Mcp4822<SPI, LDAC>
where
    SPI: SpiDevice,
    LDAC: OutputPin,
{
    /// Create a driver with 2× gain.
    pub fn new(spi: SPI, ldac: LDAC) -> Self {
        Self {
            spi,
            ldac,
            gain: Gain::Double,
        }
    }

    /// Create a driver with an explicit gain.
    pub fn new_with_gain(spi: SPI, ldac: LDAC, gain: Gain) -> Self {
        Self { spi, ldac, gain }
    }

    /// Currently configured gain.
    pub fn gain(&self) -> Gain {
        self.gain
    }

    /// Change the gain used by subsequent writes.
    pub fn set_gain(&mut self, gain: Gain) {
        self.gain = gain;
    }

    /// Park LDAC high so no partial transfer is latched.
    pub fn init(&mut self) -> Result<(), Mcp4822Error<SPI::Error, LDAC::Error>> {
        self.ldac.set_high().map_err(Mcp4822Error::Pin)
    }

    /// Write a 12-bit code to `channel` and latch it.
    ///
    /// Bits above the 12-bit data field are discarded.
    pub fn write_code(
        &mut self,
        code: u16,
        channel: Channel,
    ) -> Result<(), Mcp4822Error<SPI::Error, LDAC::Error>> {
        self.transfer(command_word(code, channel, self.gain, true))
    }

    /// Shut `channel` down (output goes high impedance until the next write).
    pub fn shutdown(&mut self, channel: Channel) -> Result<(), Mcp4822Error<SPI::Error, LDAC::Error>> {
        self.transfer(command_word(0, channel, self.gain, false))
    }

    /// Consume the driver and return the bus and pin.
    pub fn release(self) -> (SPI, LDAC) {
        (self.spi, self.ldac)
    }

    fn transfer(&mut self, word: u16) -> Result<(), Mcp4822Error<SPI::Error, LDAC::Error>> {
        self.ldac.set_high().map_err(Mcp4822Error::Pin)?;
        self.spi
            .write(&word.to_be_bytes())
            .map_err(Mcp4822Error::Spi)?;
        self.ldac.set_low().map_err(Mcp4822Error::Pin)
    }
}

impl<SPI, LDAC> DacOutput for Mcp4822<SPI, LDAC>
where
    SPI: SpiDevice,
    LDAC: OutputPin,
{
    type Error = Mcp4822Error<SPI::Error, LDAC::Error>;

    #[inline]
    fn write(&mut self, code: u16, channel: Channel) -> Result<(), Self::Error> {
        self.write_code(code, channel)
    }
}

/// Build the 16-bit command word for one transfer.
pub const fn command_word(code: u16, channel: Channel, gain: Gain, active: bool) -> u16 {
    let mut word = code & reg::DATA_MASK;
    if let Channel::B = channel {
        word |= reg::CHANNEL_BIT;
    }
    if let Gain::Unity = gain {
        word |= reg::GAIN_BIT;
    }
    if active {
        word |= reg::ACTIVE_BIT;
    }
    word
}
