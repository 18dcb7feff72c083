//! # dds-synth
//!
//! A `no_std`, zero-allocation direct digital synthesis (DDS) core for
//! microcontrollers. A Q16.16 phase accumulator, advanced once per timer
//! interrupt, indexes a single-cycle wavetable and feeds a 12-bit DAC on one
//! channel, or two channels a quarter cycle apart. A potentiometer sets the
//! frequency and a digital input resets the phase; both are polled from the
//! foreground loop.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Data | [`phase`] / [`wavetable`] | Q16.16 phase arithmetic, single-cycle sample tables |
//! | Sharing | [`shared`] | Critical-section cells between loop and interrupt |
//! | Core | [`engine`] | Per-tick phase advance, table lookup, DAC writes |
//! | Control | [`controller`] / [`reset`] / [`foreground`] | ADC → phase increment, reset line, main loop |
//! | Output | [`dac`] | DAC contract and MCP4822 driver (feature-gated) |
//!
//! ## Quick start
//!
//! ```ignore
//! use dds_synth::prelude::*;
//!
//! static STATE: SharedState = SharedState::new();
//!
//! // Timer interrupt, SAMPLE_RATE times per second:
//! let mut engine = DdsEngine::new(&SINE_TABLE, &STATE, OutputMode::Quadrature);
//! engine.tick(&mut dac).ok();
//!
//! // Main loop:
//! let mut control = ControlLoop::new(
//!     FrequencyController::<_, 256>::new(pot),
//!     ResetMonitor::new(reset_pin),
//!     delay,
//! );
//! control.run(&STATE, |e| log::warn!("{:?}", e));
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `mcp4822` | yes | MCP4822 SPI DAC driver |
//!
//! ## Signal parameters
//!
//! - **Sample rate:** 11 363 Hz ([`constants::SAMPLE_RATE`])
//! - **Phase format:** Q16.16 in a `u32`
//! - **Sample format:** `u8` in the table, `<< 4` to a 12-bit DAC code
//! - **Frequency range:** ~0.03 Hz to 200 Hz ([`controller::FrequencyConfig`])

#![no_std]

pub mod constants;
pub mod phase;
pub mod wavetable;
pub mod shared;
pub mod engine;
pub mod controller;
pub mod reset;
pub mod foreground;
pub mod dac;


/// Common imports for wiring a generator.
pub mod prelude {
    pub use crate::controller::{AnalogInput, FrequencyConfig, FrequencyController};
    pub use crate::dac::{Channel, DacOutput};
    pub use crate::engine::{DdsEngine, OutputMode, TickOutput};
    pub use crate::foreground::{ControlError, ControlLoop};
    pub use crate::phase::{Phase, PhaseDelta};
    pub use crate::reset::{Polarity, ResetMonitor};
    pub use crate::shared::SharedState;
    pub use crate::wavetable::{Wavetable, SINE_TABLE};

    #[cfg(feature = "mcp4822")]
    pub use crate::dac::{Gain, Mcp4822, Mcp4822Error};
}
