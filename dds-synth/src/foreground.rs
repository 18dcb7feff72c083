//! Foreground control loop.
//!
//! One [`step()`](ControlLoop::step) is one iteration of the main loop:
//! convert the potentiometer, publish the new phase increment, poll the reset
//! line, then sleep for the fixed interval. This is the only code that writes
//! the shared state from outside the timer interrupt.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::constants::CONTROL_INTERVAL_MS;
use crate::controller::{AnalogInput, FrequencyController};
use crate::reset::ResetMonitor;
use crate::shared::SharedState;

/// Failure of one of the foreground inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError<A, P> {
    /// Analog conversion failed; the previous phase increment stays in effect.
    Analog(A),
    /// Reset line could not be read.
    Reset(P),
}

/// Controller, reset monitor and inter-iteration delay.
pub struct ControlLoop<A, P, D, const N: usize> {
    controller: FrequencyController<A, N>,
    reset: ResetMonitor<P>,
    delay: D,
    interval_ms: u32,
}

impl<A, P, D, const N: usize> ControlLoop<A, P, D, N>
where
    A: AnalogInput,
    P: InputPin,
    D: DelayNs,
{
    /// Loop with the default 2 ms interval.
    pub fn new(controller: FrequencyController<A, N>, reset: ResetMonitor<P>, delay: D) -> Self {
        ControlLoop {
            controller,
            reset,
            delay,
            interval_ms: CONTROL_INTERVAL_MS,
        }
    }

    /// Change the sleep between iterations.
    ///
    /// Keep it at or above the converter's settling time.
    pub fn set_interval_ms(&mut self, ms: u32) {
        self.interval_ms = ms;
    }

    /// The frequency controller.
    pub fn controller(&self) -> &FrequencyController<A, N> {
        &self.controller
    }

    /// The reset monitor.
    pub fn reset(&self) -> &ResetMonitor<P> {
        &self.reset
    }

    /// Run one iteration.
    ///
    /// An analog failure skips the publish but still polls the reset line
    /// and sleeps; the first error encountered is returned.
    pub fn step(&mut self, state: &SharedState) -> Result<(), ControlError<A::Error, P::Error>> {
        let analog = self.controller.poll(state).map(|_| ()).map_err(ControlError::Analog);
        let reset = self.reset.poll(state).map(|_| ()).map_err(ControlError::Reset);
        self.delay.delay_ms(self.interval_ms);
        analog.and(reset)
    }

    /// Run forever, handing each failed iteration to `on_error`.
    pub fn run<F>(&mut self, state: &SharedState, mut on_error: F) -> !
    where
        F: FnMut(ControlError<A::Error, P::Error>),
    {
        loop {
            if let Err(e) = self.step(state) {
                on_error(e);
            }
        }
    }
}
