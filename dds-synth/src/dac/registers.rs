//! MCP4822 command word layout.
//!
//! Every transfer is one 16-bit word, most significant byte first:
//!
//! | Bit | Name | Meaning |
//! |-----|------|---------|
//! | 15 | A/B | 0 = channel A, 1 = channel B |
//! | 14 | — | don't care |
//! | 13 | GA | 1 = 1× gain, 0 = 2× gain |
//! | 12 | SHDN | 1 = output active, 0 = output shut down |
//! | 11:0 | D | 12-bit data |

/// Channel select bit (set for channel B).
pub const CHANNEL_BIT: u16 = 1 << 15;

/// Gain select bit (set for 1×, clear for 2×).
pub const GAIN_BIT: u16 = 1 << 13;

/// Output active bit (clear shuts the channel down).
pub const ACTIVE_BIT: u16 = 1 << 12;

/// Data field mask.
pub const DATA_MASK: u16 = 0x0FFF;
