//! Potentiometer-driven frequency control.
//!
//! Runs in the foreground loop: one blocking conversion per iteration, mapped
//! to a [`PhaseDelta`] and published to the [`SharedState`].
//!
//! ## Mapping
//!
//! ```text
//! raw        = max(read_raw(), 1)
//! frequency  = clamp(raw × scale, min_frequency, max_frequency)    // Q16.16 Hz
//! phase_delta = table_len × frequency / sample_rate                // Q16.16 entries/tick
//! ```
//!
//! The product is taken in 64 bits before the truncating division, so the
//! resolution loss is below one Q16.16 step. That truncation is the limit on
//! frequency resolution: one step of phase delta is
//! `sample_rate / (table_len × 65536)` Hz.

use crate::constants::{
    FREQ_POT_SCALE, MAX_FREQUENCY, MIN_FREQUENCY, PHASE_FRAC_BITS, PHASE_FRAC_MASK, SAMPLE_RATE,
};
use crate::phase::PhaseDelta;
use crate::shared::SharedState;

/// A blocking analog-to-digital converter channel.
pub trait AnalogInput {
    /// Error type for a failed conversion.
    type Error;

    /// Start a conversion and block until it completes.
    ///
    /// Returns the reading in the converter's native resolution.
    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}

/// Raw-reading-to-frequency mapping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyConfig {
    scale: u32,
    sample_rate: u32,
    min_frequency: u32,
    max_frequency: u32,
}

impl FrequencyConfig {
    /// 10-bit potentiometer, ~0.2 Hz per count, 11363 Hz sample rate,
    /// frequency limited to ~0.03..200 Hz.
    pub const DEFAULT: FrequencyConfig = FrequencyConfig::new(FREQ_POT_SCALE, SAMPLE_RATE);

    /// Mapping with the default frequency limits.
    ///
    /// `scale` is Q16.16 Hz per raw count, `sample_rate` is timer firings
    /// per second.
    ///
    /// # Panics
    ///
    /// If either argument is zero.
    pub const fn new(scale: u32, sample_rate: u32) -> Self {
        assert!(scale > 0, "frequency scale must be non-zero");
        assert!(sample_rate > 0, "sample rate must be non-zero");
        FrequencyConfig {
            scale,
            sample_rate,
            min_frequency: MIN_FREQUENCY,
            max_frequency: MAX_FREQUENCY,
        }
    }

    /// Replace the frequency limits (Q16.16 Hz, inclusive).
    ///
    /// # Panics
    ///
    /// If `min > max`.
    pub const fn with_limits(mut self, min: u32, max: u32) -> Self {
        assert!(min <= max, "minimum frequency above maximum");
        self.min_frequency = min;
        self.max_frequency = max;
        self
    }

    /// Q16.16 Hz per raw count.
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Timer firings per second.
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Target frequency for a raw reading, Q16.16 Hz.
    ///
    /// A zero reading is treated as one, so the result is never derived from
    /// zero.
    pub const fn frequency(&self, raw: u16) -> u32 {
        let raw = if raw == 0 { 1 } else { raw as u32 };
        let freq = raw.saturating_mul(self.scale);
        if freq < self.min_frequency {
            self.min_frequency
        } else if freq > self.max_frequency {
            self.max_frequency
        } else {
            freq
        }
    }

    /// Phase increment that plays `frequency` from a `table_len`-entry table.
    pub const fn phase_delta_for_frequency(&self, frequency: u32, table_len: usize) -> PhaseDelta {
        let delta = (table_len as u64 * frequency as u64) / self.sample_rate as u64;
        let delta = if delta > u32::MAX as u64 { u32::MAX } else { delta as u32 };
        PhaseDelta::from_bits(delta)
    }

    /// Phase increment for a raw reading.
    pub const fn phase_delta(&self, raw: u16, table_len: usize) -> PhaseDelta {
        self.phase_delta_for_frequency(self.frequency(raw), table_len)
    }
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Samples an [`AnalogInput`] and publishes the matching phase increment.
///
/// `N` is the wavetable length the engine plays.
pub struct FrequencyController<A, const N: usize> {
    input: A,
    config: FrequencyConfig,
    /// Last value published, for change logging.
    published: Option<PhaseDelta>,
}

impl<A: AnalogInput, const N: usize> FrequencyController<A, N> {
    /// Controller with the default mapping.
    pub fn new(input: A) -> Self {
        Self::new_with_config(input, FrequencyConfig::DEFAULT)
    }

    /// Controller with an explicit mapping.
    pub fn new_with_config(input: A, config: FrequencyConfig) -> Self {
        FrequencyController {
            input,
            config,
            published: None,
        }
    }

    /// The mapping in use.
    pub fn config(&self) -> &FrequencyConfig {
        &self.config
    }

    /// Last published phase increment, if any.
    pub fn published(&self) -> Option<PhaseDelta> {
        self.published
    }

    /// Convert once and publish.
    ///
    /// Blocks for one conversion. Returns the published increment.
    pub fn poll(&mut self, state: &SharedState) -> Result<PhaseDelta, A::Error> {
        let raw = self.input.read_raw()?;
        let freq = self.config.frequency(raw);
        let delta = self.config.phase_delta_for_frequency(freq, N);
        state.publish_phase_delta(delta);

        if self.published != Some(delta) {
            log::debug!(
                "raw {} -> {}.{:04} Hz, phase delta {:#010x}",
                raw,
                freq >> PHASE_FRAC_BITS,
                ((freq & PHASE_FRAC_MASK) as u64 * 10_000) >> PHASE_FRAC_BITS,
                delta.to_bits()
            );
            self.published = Some(delta);
        }
        Ok(delta)
    }

    /// Consume the controller and return the input.
    pub fn release(self) -> A {
        self.input
    }
}
