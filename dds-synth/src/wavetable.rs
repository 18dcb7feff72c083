//! Single-cycle wavetables.
//!
//! A [`Wavetable`] holds one full cycle of 8-bit unsigned samples. Its length
//! is a const generic so the engine's wraparound modulus and quarter-cycle
//! offset are known at compile time.

use crate::constants::{DAC_SAMPLE_SHIFT, PHASE_FRAC_BITS};

/// Immutable single-cycle table of 8-bit samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wavetable<const N: usize> {
    samples: [u8; N],
}

impl<const N: usize> Wavetable<N> {
    /// Wrap a sample array.
    ///
    /// # Panics
    ///
    /// `N` must be non-zero and fit the 16-bit integer part of a phase.
    /// Evaluated at compile time when used in a `const` or `static`.
    pub const fn new(samples: [u8; N]) -> Self {
        assert!(N > 0, "wavetable must not be empty");
        assert!(N <= 1 << PHASE_FRAC_BITS, "wavetable longer than the phase index range");
        Wavetable { samples }
    }

    /// Number of entries (the phase wraparound modulus).
    #[inline(always)]
    pub const fn len(&self) -> usize {
        N
    }

    /// Always false; empty tables are rejected by [`new()`](Self::new).
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Raw 8-bit sample at `index`.
    #[inline(always)]
    pub fn sample(&self, index: usize) -> u8 {
        self.samples[index]
    }

    /// Sample at `index` widened to a 12-bit DAC code.
    #[inline(always)]
    pub fn dac_code(&self, index: usize) -> u16 {
        widen(self.samples[index])
    }

    /// Index one quarter cycle ahead of `index`, wrapping at the table end.
    #[inline(always)]
    pub const fn quadrature_index(&self, index: usize) -> usize {
        (index + N / 4) % N
    }

    /// The underlying samples.
    pub const fn samples(&self) -> &[u8; N] {
        &self.samples
    }
}

/// Widen an 8-bit sample to the 12-bit DAC range.
#[inline(always)]
pub const fn widen(sample: u8) -> u16 {
    (sample as u16) << DAC_SAMPLE_SHIFT
}

/// Compute one sine cycle of `N` samples for a `bits`-wide output.
///
/// Amplitude is `2^(bits-1) / 2` around a midpoint of the same value, each
/// sample truncated toward zero. `bits = 8` gives samples in `0..=128`.
///
/// # Panics
///
/// If `bits` is not in `1..=8`.
pub fn sine_table<const N: usize>(bits: u32) -> Wavetable<N> {
    assert!((1..=8).contains(&bits), "sample width must be 1..=8 bits");
    let amplitude = (1u32 << (bits - 1)) as f64 / 2.0;
    let step = 2.0 * core::f64::consts::PI / N as f64;
    let mut samples = [0u8; N];
    for (i, s) in samples.iter_mut().enumerate() {
        *s = (amplitude * libm::sin(step * i as f64) + amplitude) as u8;
    }
    Wavetable::new(samples)
}

/// 256-entry sine cycle, `sine_table::<256>(8)` baked at build time.
pub static SINE_TABLE: Wavetable<256> = Wavetable::new([
    0x40, 0x41, 0x43, 0x44, 0x46, 0x47, 0x49, 0x4a, 0x4c, 0x4e, 0x4f, 0x51, 0x52, 0x54, 0x55, 0x57,
    0x58, 0x59, 0x5b, 0x5c, 0x5e, 0x5f, 0x60, 0x62, 0x63, 0x64, 0x66, 0x67, 0x68, 0x69, 0x6a, 0x6c,
    0x6d, 0x6e, 0x6f, 0x70, 0x71, 0x72, 0x73, 0x74, 0x75, 0x76, 0x76, 0x77, 0x78, 0x79, 0x79, 0x7a,
    0x7b, 0x7b, 0x7c, 0x7c, 0x7d, 0x7d, 0x7e, 0x7e, 0x7e, 0x7f, 0x7f, 0x7f, 0x7f, 0x7f, 0x7f, 0x7f,
    0x80, 0x7f, 0x7f, 0x7f, 0x7f, 0x7f, 0x7f, 0x7f, 0x7e, 0x7e, 0x7e, 0x7d, 0x7d, 0x7c, 0x7c, 0x7b,
    0x7b, 0x7a, 0x79, 0x79, 0x78, 0x77, 0x76, 0x76, 0x75, 0x74, 0x73, 0x72, 0x71, 0x70, 0x6f, 0x6e,
    0x6d, 0x6c, 0x6a, 0x69, 0x68, 0x67, 0x66, 0x64, 0x63, 0x62, 0x60, 0x5f, 0x5e, 0x5c, 0x5b, 0x59,
    0x58, 0x57, 0x55, 0x54, 0x52, 0x51, 0x4f, 0x4e, 0x4c, 0x4a, 0x49, 0x47, 0x46, 0x44, 0x43, 0x41,
    0x40, 0x3e, 0x3c, 0x3b, 0x39, 0x38, 0x36, 0x35, 0x33, 0x31, 0x30, 0x2e, 0x2d, 0x2b, 0x2a, 0x28,
    0x27, 0x26, 0x24, 0x23, 0x21, 0x20, 0x1f, 0x1d, 0x1c, 0x1b, 0x19, 0x18, 0x17, 0x16, 0x15, 0x13,
    0x12, 0x11, 0x10, 0x0f, 0x0e, 0x0d, 0x0c, 0x0b, 0x0a, 0x09, 0x09, 0x08, 0x07, 0x06, 0x06, 0x05,
    0x04, 0x04, 0x03, 0x03, 0x02, 0x02, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01, 0x01, 0x02, 0x02, 0x03, 0x03, 0x04,
    0x04, 0x05, 0x06, 0x06, 0x07, 0x08, 0x09, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x10, 0x11,
    0x12, 0x13, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1b, 0x1c, 0x1d, 0x1f, 0x20, 0x21, 0x23, 0x24, 0x26,
    0x27, 0x28, 0x2a, 0x2b, 0x2d, 0x2e, 0x30, 0x31, 0x33, 0x35, 0x36, 0x38, 0x39, 0x3b, 0x3c, 0x3e,
]);
