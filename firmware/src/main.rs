//! Quadrature DDS waveform generator.
//!
//! Plays the 256-entry sine table on both outputs of an MCP4822, channel B a
//! quarter cycle ahead of channel A. A potentiometer sets the frequency
//! (~0.2 Hz to 200 Hz) and a push button holds the phase at zero.
//!
//! Hardware: Teensy 4.1 + MCP4822 dual 12-bit DAC
//!
//! ```text
//!   PIT ch0 @ 11 363 Hz ──► DdsEngine::tick() ──► MCP4822 (A + B)
//!   idle loop ──► ADC pot ──► SharedState ◄── reset button
//! ```
//!
//! Pins:
//!   p10: LPSPI4_PCS0 → DAC CS    p11: LPSPI4_SDO → DAC SDI
//!   p13: LPSPI4_SCK  → DAC SCK   p9:  GPIO       → DAC LDAC
//!   p14: ADC1 (A0)   ← pot wiper p2:  GPIO       ← reset button (active high)
//!
//! Diagnostics are logged over USB serial.

#![no_std]
#![no_main]

use teensy4_panic as _;

use dds_synth::shared::SharedState;

/// Phase state shared by the idle loop and the sample interrupt.
static STATE: SharedState = SharedState::new();

// ── Spin-loop delay for the control loop (implements embedded-hal 1.0) ──

/// ARM `NOP` spin-loop delay, rounded up.
struct AsmDelay;

impl embedded_hal::delay::DelayNs for AsmDelay {
    fn delay_ns(&mut self, ns: u32) {
        // Teensy 4.1 @ 600 MHz → 1 ns ≈ 0.6 cycles.
        let cycles = (ns as u64 * 6 + 9) / 10;
        cortex_m::asm::delay(cycles as u32);
    }
}

/// Potentiometer on an ADC1 pin, read in 10-bit mode.
struct PotInput<P> {
    adc: teensy4_bsp::hal::adc::Adc<1>,
    pin: teensy4_bsp::hal::adc::AnalogInput<P, 1>,
}

impl<P> dds_synth::controller::AnalogInput for PotInput<P>
where
    P: teensy4_bsp::hal::iomuxc::adc::Pin<1>,
{
    type Error = core::convert::Infallible;

    fn read_raw(&mut self) -> Result<u16, Self::Error> {
        Ok(self.adc.read_blocking(&mut self.pin))
    }
}

#[rtic::app(device = teensy4_bsp, peripherals = true)]
mod app {
    use super::{AsmDelay, PotInput, STATE};
    use bsp::board;
    use bsp::hal;
    use bsp::pins::t41::{P14, P2, P9};
    use teensy4_bsp as bsp;

    use dds_synth::constants::SAMPLE_RATE;
    use dds_synth::engine::{timer_rate, timer_reload};
    use dds_synth::prelude::*;

    const TABLE_LEN: usize = 256;
    const SPI_BAUD_HZ: u32 = 4_000_000;

    type Dac = Mcp4822<board::Lpspi4, hal::gpio::Output<P9>>;
    type Control = ControlLoop<PotInput<P14>, hal::gpio::Input<P2>, AsmDelay, TABLE_LEN>;

    // ── RTIC resources ───────────────────────────────────────────────

    #[local]
    struct Local {
        pit: hal::pit::Pit<0>,
        engine: DdsEngine<'static, TABLE_LEN>,
        dac: Dac,
        control: Control,
        poller: imxrt_log::Poller,
    }

    #[shared]
    struct Shared {}

    // ── Init ─────────────────────────────────────────────────────────

    #[init]
    fn init(cx: init::Context) -> (Shared, Local) {
        let board::Resources {
            mut gpio2,
            mut gpio4,
            pins,
            lpspi4,
            adc1,
            usb,
            pit: (mut pit, _, _, _),
            ..
        } = board::t41(cx.device);

        // ── USB serial logger ───────────────────────────────────────
        let poller = imxrt_log::log::usbd(usb, imxrt_log::Interrupts::Enabled)
            .expect("USB logger");

        // ── MCP4822 on LPSPI4 ───────────────────────────────────────
        let spi = board::lpspi(
            lpspi4,
            board::LpspiPins {
                pcs0: pins.p10,
                sck: pins.p13,
                sdo: pins.p11,
                sdi: pins.p12,
            },
            SPI_BAUD_HZ,
        );
        let ldac = gpio2.output(pins.p9);
        let mut dac = Mcp4822::new(spi, ldac);
        dac.init().expect("MCP4822 init");

        // ── Potentiometer + reset button ────────────────────────────
        let mut adc = hal::adc::Adc::new(
            adc1,
            hal::adc::ClockSelect::ADACK,
            hal::adc::ClockDivision::Div2,
        );
        adc.set_resolution(hal::adc::ResolutionBits::Res10);
        let pot = PotInput {
            adc,
            pin: hal::adc::AnalogInput::new(pins.p14),
        };
        let reset = gpio4.input(pins.p2);

        let control = ControlLoop::new(
            FrequencyController::new(pot),
            ResetMonitor::new(reset),
            AsmDelay,
        );

        // ── Engine + sample timer ───────────────────────────────────
        let engine = DdsEngine::new(&SINE_TABLE, &STATE, OutputMode::Quadrature);

        // The PIT fires every LDVAL + 1 cycles.
        let load = timer_reload(board::PERCLK_FREQUENCY, SAMPLE_RATE);
        pit.set_load_timer_value(load);
        pit.set_interrupt_enable(true);
        pit.enable();

        log::info!(
            "DDS running: {} Hz sample rate, {}-entry table, quadrature output",
            timer_rate(board::PERCLK_FREQUENCY, load),
            TABLE_LEN
        );

        (
            Shared {},
            Local {
                pit,
                engine,
                dac,
                control,
                poller,
            },
        )
    }

    // ── Foreground: pot, reset button, 2 ms delay ────────────────────

    #[idle(local = [control])]
    fn idle(cx: idle::Context) -> ! {
        cx.local
            .control
            .run(&STATE, |e| log::warn!("control input failed: {:?}", e))
    }

    // ── PIT ISR: one sample per channel ──────────────────────────────

    #[task(binds = PIT, local = [pit, engine, dac], priority = 2)]
    fn sample_tick(cx: sample_tick::Context) {
        let pit = cx.local.pit;
        while pit.is_elapsed() {
            pit.clear_elapsed();
        }

        // No error path out of the interrupt: a failed transfer is
        // superseded by the next sample.
        let _ = cx.local.engine.tick(cx.local.dac);
    }

    // ── USB logger ───────────────────────────────────────────────────

    #[task(binds = USB_OTG1, local = [poller], priority = 1)]
    fn usb_log(cx: usb_log::Context) {
        cx.local.poller.poll();
    }
}
