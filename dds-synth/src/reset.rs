//! Level-triggered phase reset input.

use embedded_hal::digital::InputPin;

use crate::shared::SharedState;

/// Which input level counts as "reset asserted".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// High level asserts reset.
    ActiveHigh,
    /// Low level asserts reset (pull-up wiring to a push button).
    ActiveLow,
}

/// Polls a digital input and holds the phase at zero while it is asserted.
///
/// Level-triggered: every poll that sees the line asserted zeroes the phase
/// and keeps the engine on wavetable entry 0 until a poll sees it released.
pub struct ResetMonitor<P> {
    pin: P,
    polarity: Polarity,
    asserted: bool,
}

impl<P: InputPin> ResetMonitor<P> {
    /// Active-high monitor.
    pub fn new(pin: P) -> Self {
        Self::new_with_polarity(pin, Polarity::ActiveHigh)
    }

    /// Monitor with explicit polarity.
    pub fn new_with_polarity(pin: P, polarity: Polarity) -> Self {
        ResetMonitor {
            pin,
            polarity,
            asserted: false,
        }
    }

    /// Whether the previous poll saw the line asserted.
    pub fn is_asserted(&self) -> bool {
        self.asserted
    }

    /// Read the line once; reset the phase if asserted.
    ///
    /// Returns whether the line was asserted.
    pub fn poll(&mut self, state: &SharedState) -> Result<bool, P::Error> {
        let asserted = match self.polarity {
            Polarity::ActiveHigh => self.pin.is_high()?,
            Polarity::ActiveLow => self.pin.is_low()?,
        };
        state.set_reset(asserted);
        if asserted && !self.asserted {
            log::info!("phase reset asserted");
        } else if !asserted && self.asserted {
            log::info!("phase reset released");
        }
        self.asserted = asserted;
        Ok(asserted)
    }

    /// Consume the monitor and return the pin.
    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{Phase, PhaseDelta};
    use core::cell::Cell;
    use embedded_hal::digital::{self, ErrorType};

    /// Input pin whose level is set from the test body.
    struct MockPin<'a> {
        level: &'a Cell<bool>,
    }

    impl ErrorType for MockPin<'_> {
        type Error = digital::ErrorKind;
    }

    impl InputPin for MockPin<'_> {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.level.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.level.get())
        }
    }

    fn moved_state() -> SharedState {
        let s = SharedState::new();
        s.publish_phase_delta(PhaseDelta::from_bits(1 << 16));
        s.advance_with(|_, _| Phase::from_index(40));
        s
    }

    #[test]
    fn released_line_leaves_phase() {
        let level = Cell::new(false);
        let state = moved_state();
        let mut mon = ResetMonitor::new(MockPin { level: &level });
        assert_eq!(mon.poll(&state), Ok(false));
        assert_eq!(state.phase().index(), 40);
    }

    #[test]
    fn asserted_line_zeroes_phase() {
        let level = Cell::new(true);
        let state = moved_state();
        let mut mon = ResetMonitor::new(MockPin { level: &level });
        assert_eq!(mon.poll(&state), Ok(true));
        assert_eq!(state.phase(), Phase::ZERO);
        assert!(mon.is_asserted());
    }

    #[test]
    fn held_line_keeps_resetting() {
        let level = Cell::new(true);
        let state = moved_state();
        let mut mon = ResetMonitor::new(MockPin { level: &level });
        for _ in 0..3 {
            mon.poll(&state).unwrap();
            // Ticks between polls do not move the phase
            state.advance_with(|_, _| Phase::from_index(9));
            assert_eq!(state.phase(), Phase::ZERO);
            assert!(state.is_reset_held());
        }
        level.set(false);
        assert_eq!(mon.poll(&state), Ok(false));
        assert!(!mon.is_asserted());
        assert!(!state.is_reset_held());
        assert_eq!(state.advance_with(|_, _| Phase::from_index(9)), Phase::ZERO);
        assert_eq!(state.advance_with(|_, _| Phase::from_index(9)).index(), 9);
    }

    #[test]
    fn active_low_polarity() {
        let level = Cell::new(true);
        let state = moved_state();
        let mut mon = ResetMonitor::new_with_polarity(MockPin { level: &level }, Polarity::ActiveLow);
        assert_eq!(mon.poll(&state), Ok(false));
        assert_eq!(state.phase().index(), 40);

        level.set(false);
        assert_eq!(mon.poll(&state), Ok(true));
        assert_eq!(state.phase(), Phase::ZERO);
    }
}
