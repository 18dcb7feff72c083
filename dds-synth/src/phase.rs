//! Q16.16 fixed-point phase and phase increment.
//!
//! The upper 16 bits of a [`Phase`] index the wavetable, the lower 16 bits
//! carry sub-sample position so small increments still move the output
//! smoothly. A [`PhaseDelta`] uses the same representation and is added to
//! the phase once per timer tick.

use crate::constants::{PHASE_FRAC_BITS, PHASE_FRAC_MASK};

/// Running position within one wavetable cycle, Q16.16.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Phase(u32);

/// Phase advance per timer tick, Q16.16. Zero holds the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhaseDelta(u32);

impl Phase {
    /// Phase zero: the first wavetable entry.
    pub const ZERO: Phase = Phase(0);

    /// Wrap a raw Q16.16 word.
    pub const fn from_bits(bits: u32) -> Self {
        Phase(bits)
    }

    /// The raw Q16.16 word.
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// Phase pointing exactly at wavetable entry `index`.
    pub const fn from_index(index: u16) -> Self {
        Phase((index as u32) << PHASE_FRAC_BITS)
    }

    /// Integer part (truncating).
    #[inline(always)]
    pub const fn index(self) -> usize {
        (self.0 >> PHASE_FRAC_BITS) as usize
    }

    /// Fractional part, in 1/65536ths of a table entry.
    #[inline(always)]
    pub const fn fraction(self) -> u16 {
        (self.0 & PHASE_FRAC_MASK) as u16
    }

    /// Advance by `delta` and reduce into a table of `table_len` entries.
    ///
    /// The 32-bit addition wraps. When the integer part lands at or past
    /// `table_len` it is reduced modulo the table length and the fractional
    /// bits are kept, so the waveform stays phase-continuous for any table
    /// length. The reduction is one division regardless of how many table
    /// lengths `delta` spans.
    ///
    /// `table_len` must be in `1..=65536`; [`Wavetable`](crate::wavetable::Wavetable)
    /// enforces this at construction.
    #[inline(always)]
    pub fn advance(self, delta: PhaseDelta, table_len: usize) -> Phase {
        let next = self.0.wrapping_add(delta.0);
        let index = next >> PHASE_FRAC_BITS;
        let len = table_len as u32;
        if index < len {
            return Phase(next);
        }
        let wrapped = index % len;
        Phase((wrapped << PHASE_FRAC_BITS) | (next & PHASE_FRAC_MASK))
    }
}

impl PhaseDelta {
    /// No advance: the output holds its current sample.
    pub const ZERO: PhaseDelta = PhaseDelta(0);

    /// Wrap a raw Q16.16 word.
    pub const fn from_bits(bits: u32) -> Self {
        PhaseDelta(bits)
    }

    /// The raw Q16.16 word.
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// True when the delta holds the output still.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: u32 = 1 << PHASE_FRAC_BITS;

    #[test]
    fn index_and_fraction_split() {
        let p = Phase::from_bits(0x0012_8000);
        assert_eq!(p.index(), 0x12);
        assert_eq!(p.fraction(), 0x8000);
        assert_eq!(Phase::from_index(7).to_bits(), 7 * ONE);
    }

    #[test]
    fn advance_without_wrap_is_plain_addition() {
        let p = Phase::from_bits(3 * ONE + 100).advance(PhaseDelta::from_bits(ONE + 50), 256);
        assert_eq!(p.to_bits(), 4 * ONE + 150);
    }

    #[test]
    fn wrap_keeps_fractional_bits() {
        let start = Phase::from_bits(255 * ONE + 0xC000);
        let delta = PhaseDelta::from_bits(0x8123);
        let naive = start.to_bits().wrapping_add(delta.to_bits());
        let p = start.advance(delta, 256);
        assert_eq!(p.index(), 0);
        assert_eq!(p.fraction() as u32, naive & PHASE_FRAC_MASK);
    }

    #[test]
    fn wrap_works_for_non_power_of_two_tables() {
        // 99.5 + 1.0 = 100.5 -> 0.5 in a 100-entry table
        let p = Phase::from_bits(99 * ONE + 0x8000).advance(PhaseDelta::from_bits(ONE), 100);
        assert_eq!(p.index(), 0);
        assert_eq!(p.fraction(), 0x8000);

        // 98 + 5 = 103 -> 3
        let p = Phase::from_index(98).advance(PhaseDelta::from_bits(5 * ONE), 100);
        assert_eq!(p.index(), 3);
    }

    #[test]
    fn delta_spanning_several_tables_stays_in_range() {
        let p = Phase::ZERO.advance(PhaseDelta::from_bits(600 * ONE + 7), 256);
        assert_eq!(p.index(), 600 % 256);
        assert_eq!(p.fraction(), 7);
    }

    #[test]
    fn out_of_range_initial_phase_is_reduced() {
        let p = Phase::from_bits(u16::MAX as u32 * ONE).advance(PhaseDelta::from_bits(1), 256);
        assert!(p.index() < 256);
    }

    #[test]
    fn index_never_leaves_table() {
        let deltas = [1u32, 3, 288, 0x7FFF, ONE, ONE + 1, 37 * ONE + 12345, 300 * ONE];
        let starts = [0u32, 1, 0xFFFF, 255 * ONE, 255 * ONE + 0xFFFF, 1000 * ONE];
        for &len in &[256usize, 100, 7, 1] {
            for &d in &deltas {
                for &s in &starts {
                    let mut p = Phase::from_bits(s);
                    for _ in 0..2_000 {
                        p = p.advance(PhaseDelta::from_bits(d), len);
                        assert!(p.index() < len, "len={} delta={} start={}", len, d, s);
                    }
                }
            }
        }
    }

    #[test]
    fn zero_delta_holds() {
        let start = Phase::from_bits(42 * ONE + 9);
        let mut p = start;
        for _ in 0..100 {
            p = p.advance(PhaseDelta::ZERO, 256);
        }
        assert_eq!(p, start);
        assert!(PhaseDelta::ZERO.is_zero());
    }
}
