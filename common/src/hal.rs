//! Driver traits consumed by the control loop.
//!
//! The firmware implements these over embassy-rp peripherals, the simulator
//! over its engine model. Calls are best-effort: a driver that hits a
//! hardware error handles it internally (e.g. repeats its last sample)
//! rather than stalling the loop.

use crate::fuel::PulseWidth;
use crate::sensors::SensorChannel;

/// Analog-to-digital converter.
pub trait AnalogInput {
    /// Latest sample of `channel`, in `0..=RAW_MAX`.
    fn read_raw(
        &mut self,
        channel: SensorChannel,
    ) -> u16;
}

/// Injector PWM output with a fixed period.
pub trait InjectorOutput {
    /// Set the active time per period. Widths beyond the period saturate.
    fn set_pulse_width(
        &mut self,
        pulse_width: PulseWidth,
    );

    fn enable(&mut self);

    fn disable(&mut self);
}

/// Status line on the character display.
pub trait StatusDisplay {
    /// Replace the status line with `text` (ASCII, at most a display line).
    fn show(
        &mut self,
        text: &str,
    );
}

/// Engine on/off switch.
pub trait EngineSwitch {
    fn is_engine_running(&mut self) -> bool;
}

/// The set of drivers one control loop iteration needs.
pub struct Drivers<A, O, D, S> {
    pub adc: A,
    pub injector: O,
    pub display: D,
    pub switch: S,
}

impl<A, O, D, S> Drivers<A, O, D, S>
where
    A: AnalogInput,
    O: InjectorOutput,
    D: StatusDisplay,
    S: EngineSwitch,
{
    pub const fn new(
        adc: A,
        injector: O,
        display: D,
        switch: S,
    ) -> Self {
        Self {
            adc,
            injector,
            display,
            switch,
        }
    }
}
