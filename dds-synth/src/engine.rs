//! Phase-accumulator engine, run once per timer interrupt.
//!
//! Each [`tick()`](DdsEngine::tick):
//!
//! ```text
//! phase  ← reduce(phase + phase_delta)        // one critical section
//! index  ← phase >> 16
//! DAC A  ← table[index] << 4
//! DAC B  ← table[(index + N/4) mod N] << 4    // quadrature mode only
//! ```
//!
//! Both channels come from the same accumulator, so the quadrature output
//! is always exactly a quarter cycle ahead of channel A. The work per tick is
//! constant regardless of the phase increment.

use crate::dac::{Channel, DacOutput};
use crate::phase::Phase;
use crate::shared::SharedState;
use crate::wavetable::Wavetable;

/// Number of DAC channels driven per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Channel A only.
    Single,
    /// Channel A plus channel B a quarter cycle ahead.
    Quadrature,
}

/// Wavetable indices used by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutput {
    /// Index written to channel A.
    pub index: usize,
    /// Index written to channel B, in quadrature mode.
    pub quadrature_index: Option<usize>,
}

/// Reload value for a down-counting tick timer that fires every
/// `reload + 1` clock cycles, chosen so the tick rate is as close to
/// `rate_hz` as the clock allows.
pub const fn timer_reload(clock_hz: u32, rate_hz: u32) -> u32 {
    assert!(rate_hz > 0 && rate_hz <= clock_hz, "tick rate must be within the timer clock");
    (clock_hz + rate_hz / 2) / rate_hz - 1
}

/// Tick rate produced by a timer loaded with `reload`.
pub const fn timer_rate(clock_hz: u32, reload: u32) -> u32 {
    clock_hz / (reload + 1)
}

/// Wavetable oscillator driven by the shared phase state.
///
/// Holds no phase of its own: phase and increment live in [`SharedState`] so
/// the foreground loop can retune and reset it.
pub struct DdsEngine<'a, const N: usize> {
    table: &'a Wavetable<N>,
    state: &'a SharedState,
    mode: OutputMode,
}

impl<'a, const N: usize> DdsEngine<'a, N> {
    /// Create an engine playing `table` from `state`.
    pub const fn new(table: &'a Wavetable<N>, state: &'a SharedState, mode: OutputMode) -> Self {
        DdsEngine { table, state, mode }
    }

    /// Current output mode.
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Switch between single and quadrature output.
    pub fn set_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    /// The table being played.
    pub fn table(&self) -> &'a Wavetable<N> {
        self.table
    }

    /// Advance the phase without touching the DAC.
    ///
    /// Returns the new phase; its index is always below `N`.
    #[inline(always)]
    pub fn step(&self) -> Phase {
        self.state.advance_with(|phase, delta| phase.advance(delta, N))
    }

    /// Produce one output sample (two in quadrature mode).
    ///
    /// Called from the timer interrupt. The phase is advanced before the DAC
    /// is written, so a failed transfer still keeps the oscillator in time.
    /// Both channels are attempted; the first failure is returned.
    pub fn tick<D: DacOutput>(&mut self, dac: &mut D) -> Result<TickOutput, D::Error> {
        let index = self.step().index();
        let written = dac.write(self.table.dac_code(index), Channel::A);

        let (quadrature_index, written) = match self.mode {
            OutputMode::Single => (None, written),
            OutputMode::Quadrature => {
                let q = self.table.quadrature_index(index);
                let b = dac.write(self.table.dac_code(q), Channel::B);
                (Some(q), written.and(b))
            }
        };

        written.map(|()| TickOutput {
            index,
            quadrature_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::PhaseDelta;
    use crate::wavetable::SINE_TABLE;

    /// Records the last code per channel and counts writes.
    #[derive(Default)]
    struct MockDac {
        a: Option<u16>,
        b: Option<u16>,
        writes: usize,
        fail_a: bool,
        fail_b: bool,
    }

    impl DacOutput for MockDac {
        type Error = Channel;

        fn write(&mut self, code: u16, channel: Channel) -> Result<(), Channel> {
            self.writes += 1;
            match channel {
                Channel::A if self.fail_a => return Err(Channel::A),
                Channel::A => self.a = Some(code),
                Channel::B if self.fail_b => return Err(Channel::B),
                Channel::B => self.b = Some(code),
            }
            Ok(())
        }
    }

    fn ramp<const N: usize>() -> Wavetable<N> {
        let mut samples = [0u8; N];
        for (i, s) in samples.iter_mut().enumerate() {
            *s = i as u8;
        }
        Wavetable::new(samples)
    }

    #[test]
    fn single_mode_writes_channel_a_only() {
        let state = SharedState::new();
        state.publish_phase_delta(PhaseDelta::from_bits(3 << 16));
        let table = ramp::<16>();
        let mut engine = DdsEngine::new(&table, &state, OutputMode::Single);
        let mut dac = MockDac::default();

        let out = engine.tick(&mut dac).unwrap();
        assert_eq!(out, TickOutput { index: 3, quadrature_index: None });
        assert_eq!(dac.a, Some(3 << 4));
        assert_eq!(dac.b, None);
        assert_eq!(dac.writes, 1);
    }

    #[test]
    fn quadrature_mode_leads_by_quarter_table() {
        let state = SharedState::new();
        state.publish_phase_delta(PhaseDelta::from_bits(1 << 16));
        let table = ramp::<16>();
        let mut engine = DdsEngine::new(&table, &state, OutputMode::Quadrature);
        let mut dac = MockDac::default();

        for tick in 1..=40usize {
            let out = engine.tick(&mut dac).unwrap();
            let expected = tick % 16;
            assert_eq!(out.index, expected);
            assert_eq!(out.quadrature_index, Some((expected + 4) % 16));
            assert_eq!(dac.a, Some((expected as u16) << 4));
            assert_eq!(dac.b, Some((((expected + 4) % 16) as u16) << 4));
        }
    }

    #[test]
    fn quadrature_outputs_same_shape_offset() {
        let state = SharedState::new();
        state.publish_phase_delta(PhaseDelta::from_bits(0x0001_8000));
        let mut engine = DdsEngine::new(&SINE_TABLE, &state, OutputMode::Quadrature);
        let mut dac = MockDac::default();

        for _ in 0..1_000 {
            let out = engine.tick(&mut dac).unwrap();
            let q = out.quadrature_index.unwrap();
            assert_eq!(q, (out.index + 64) % 256);
            assert_eq!(dac.b, Some(SINE_TABLE.dac_code(q)));
        }
    }

    #[test]
    fn zero_delta_holds_output() {
        let state = SharedState::new();
        let mut engine = DdsEngine::new(&SINE_TABLE, &state, OutputMode::Single);
        let mut dac = MockDac::default();

        let first = engine.tick(&mut dac).unwrap();
        for _ in 0..50 {
            assert_eq!(engine.tick(&mut dac).unwrap(), first);
        }
        assert_eq!(dac.a, Some(SINE_TABLE.dac_code(0)));
    }

    #[test]
    fn dac_error_still_advances_phase() {
        let state = SharedState::new();
        state.publish_phase_delta(PhaseDelta::from_bits(2 << 16));
        let mut engine = DdsEngine::new(&SINE_TABLE, &state, OutputMode::Quadrature);
        let mut dac = MockDac { fail_b: true, ..Default::default() };

        assert_eq!(engine.tick(&mut dac), Err(Channel::B));
        assert_eq!(state.phase().index(), 2);
        assert_eq!(dac.a, Some(SINE_TABLE.dac_code(2)));
    }

    #[test]
    fn failed_channel_a_still_writes_channel_b() {
        let state = SharedState::new();
        state.publish_phase_delta(PhaseDelta::from_bits(5 << 16));
        let mut engine = DdsEngine::new(&SINE_TABLE, &state, OutputMode::Quadrature);
        let mut dac = MockDac { fail_a: true, ..Default::default() };

        assert_eq!(engine.tick(&mut dac), Err(Channel::A));
        assert_eq!(dac.writes, 2);
        assert_eq!(dac.a, None);
        assert_eq!(dac.b, Some(SINE_TABLE.dac_code(69)));
    }

    #[test]
    fn both_channels_failing_reports_channel_a() {
        let state = SharedState::new();
        let mut engine = DdsEngine::new(&SINE_TABLE, &state, OutputMode::Quadrature);
        let mut dac = MockDac { fail_a: true, fail_b: true, ..Default::default() };

        assert_eq!(engine.tick(&mut dac), Err(Channel::A));
        assert_eq!(dac.writes, 2);
    }

    #[test]
    fn mode_switch_at_runtime() {
        let state = SharedState::new();
        let mut engine = DdsEngine::new(&SINE_TABLE, &state, OutputMode::Single);
        let mut dac = MockDac::default();
        engine.set_mode(OutputMode::Quadrature);
        assert_eq!(engine.mode(), OutputMode::Quadrature);
        assert_eq!(engine.tick(&mut dac).unwrap().quadrature_index, Some(64));
        assert_eq!(engine.table().len(), 256);
    }

    #[test]
    fn timer_reload_counts_reload_plus_one() {
        // 24 MHz peripheral clock
        let reload = timer_reload(24_000_000, crate::constants::SAMPLE_RATE);
        assert_eq!(reload, 2111);
        assert_eq!(timer_rate(24_000_000, reload), 11_363);

        assert_eq!(timer_reload(1_000, 1_000), 0);
        assert_eq!(timer_rate(1_000, 0), 1_000);
        assert_eq!(timer_reload(1_000, 3), 332);
    }

    #[test]
    fn works_through_mutable_reference() {
        let state = SharedState::new();
        let mut engine = DdsEngine::new(&SINE_TABLE, &state, OutputMode::Single);
        let mut dac = MockDac::default();
        let mut by_ref = &mut dac;
        engine.tick(&mut by_ref).unwrap();
        assert_eq!(dac.writes, 1);
    }
}
