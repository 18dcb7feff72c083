/// Number of fractional bits in a Q16.16 phase value.
pub const PHASE_FRAC_BITS: u32 = 16;

/// Mask selecting the fractional bits of a Q16.16 phase value.
pub const PHASE_FRAC_MASK: u32 = (1 << PHASE_FRAC_BITS) - 1;

/// Timer interrupt rate in Hz: one engine tick (and one sample per channel) per firing.
pub const SAMPLE_RATE: u32 = 11_363;

/// Frequency added per raw ADC count, Q16.16 Hz (~0.2 Hz).
pub const FREQ_POT_SCALE: u32 = 12_800;

/// Lowest target frequency, Q16.16 Hz (~0.03 Hz).
pub const MIN_FREQUENCY: u32 = 2_000;

/// Highest target frequency, Q16.16 Hz (200 Hz).
pub const MAX_FREQUENCY: u32 = 200 << PHASE_FRAC_BITS;

/// Left shift that widens an 8-bit wavetable sample to a 12-bit DAC code.
pub const DAC_SAMPLE_SHIFT: u32 = 4;

/// Delay between foreground loop iterations in milliseconds.
pub const CONTROL_INTERVAL_MS: u32 = 2;
