//! Phase state shared between the foreground loop and the timer interrupt.
//!
//! # Safety Contract
//!
//! - Only the foreground loop publishes a new [`PhaseDelta`] or resets the phase.
//! - Only the timer interrupt advances the phase.
//! - Every access, on either side, runs inside a critical section, so a
//!   32-bit value is never observed half-written on targets whose native
//!   word is narrower, and the compiler cannot elide or reorder it.
//!
//! The foreground side is last-writer-wins: there is no queue, the
//! interrupt always sees the most recently published value.

use core::cell::Cell;

use critical_section::Mutex;

use crate::phase::{Phase, PhaseDelta};

/// How the next tick treats the phase after a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hold {
    /// Normal advance.
    Running,
    /// Output entry 0 on the next tick, then resume.
    Once,
    /// Output entry 0 on every tick until released.
    Held,
}

/// Single-slot phase and phase-increment cells.
///
/// Intended to live in a `static` so both execution contexts can reach it.
pub struct SharedState {
    phase: Mutex<Cell<Phase>>,
    phase_delta: Mutex<Cell<PhaseDelta>>,
    hold: Mutex<Cell<Hold>>,
}

impl SharedState {
    /// Phase zero, increment zero (silent until the first publish).
    pub const fn new() -> Self {
        SharedState {
            phase: Mutex::new(Cell::new(Phase::ZERO)),
            phase_delta: Mutex::new(Cell::new(PhaseDelta::ZERO)),
            hold: Mutex::new(Cell::new(Hold::Running)),
        }
    }

    /// Replace the phase increment (foreground side).
    pub fn publish_phase_delta(&self, delta: PhaseDelta) {
        critical_section::with(|cs| self.phase_delta.borrow(cs).set(delta));
    }

    /// Force the phase back to zero once (foreground side).
    ///
    /// The next tick outputs entry 0 and advancing resumes on the tick after.
    pub fn reset_phase(&self) {
        critical_section::with(|cs| {
            self.phase.borrow(cs).set(Phase::ZERO);
            let hold = self.hold.borrow(cs);
            if hold.get() == Hold::Running {
                hold.set(Hold::Once);
            }
        });
    }

    /// Assert or release a held reset (foreground side).
    ///
    /// While asserted the phase is zero and every tick outputs entry 0.
    /// Releasing still leaves one tick on entry 0, so an assert and release
    /// with no tick in between is not lost.
    pub fn set_reset(&self, asserted: bool) {
        critical_section::with(|cs| {
            let hold = self.hold.borrow(cs);
            if asserted {
                self.phase.borrow(cs).set(Phase::ZERO);
                hold.set(Hold::Held);
            } else if hold.get() == Hold::Held {
                hold.set(Hold::Once);
            }
        });
    }

    /// Whether a held reset is currently asserted.
    pub fn is_reset_held(&self) -> bool {
        critical_section::with(|cs| self.hold.borrow(cs).get() == Hold::Held)
    }

    /// Snapshot of the current phase.
    pub fn phase(&self) -> Phase {
        critical_section::with(|cs| self.phase.borrow(cs).get())
    }

    /// Snapshot of the current phase increment.
    pub fn phase_delta(&self) -> PhaseDelta {
        critical_section::with(|cs| self.phase_delta.borrow(cs).get())
    }

    /// Read-modify-write of the phase in one critical section (interrupt side).
    ///
    /// `step` receives the current phase and increment and returns the new
    /// phase, which is stored and returned. A reset from the foreground can
    /// land before or after this call, never between the read and the store.
    /// While a reset is pending or held `step` is not called and the phase
    /// stays at zero.
    #[inline(always)]
    pub fn advance_with<F>(&self, step: F) -> Phase
    where
        F: FnOnce(Phase, PhaseDelta) -> Phase,
    {
        critical_section::with(|cs| {
            let phase = self.phase.borrow(cs);
            let hold = self.hold.borrow(cs);
            let next = match hold.get() {
                Hold::Running => step(phase.get(), self.phase_delta.borrow(cs).get()),
                Hold::Once => {
                    hold.set(Hold::Running);
                    Phase::ZERO
                }
                Hold::Held => Phase::ZERO,
            };
            phase.set(next);
            next
        })
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
