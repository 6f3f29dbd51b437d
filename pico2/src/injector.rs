//! Injector PWM timing.
//!
//! The injector runs on a fixed 80 ms PWM period; the pulse width sets the
//! channel compare value. This module holds the output state and the
//! pulse-width to compare conversion; `main.rs` pushes the result into the
//! PWM slice.

use efi_common::PulseWidth;
use efi_common::config::INJECTOR_PERIOD_S;

use crate::config::pwm::PWM_TICKS;

/// Compare value for `pulse_width`, rounded to the nearest counter tick.
///
/// Widths beyond the period saturate at `TOP + 1` (output always high);
/// negative or NaN widths give 0.
pub fn compare_for(pulse_width: PulseWidth) -> u16 {
    let duty = pulse_width.duty(INJECTOR_PERIOD_S);
    let ticks = (duty * PWM_TICKS as f32 + 0.5) as u32;
    ticks.min(PWM_TICKS) as u16
}

/// Requested injector output: enable flag plus the compare value to apply.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct InjectorTiming {
    enabled: bool,
    compare: u16,
}

impl InjectorTiming {
    /// Disabled, zero pulse width.
    pub const fn new() -> Self {
        Self {
            enabled: false,
            compare: 0,
        }
    }

    pub fn set_pulse_width(
        &mut self,
        pulse_width: PulseWidth,
    ) {
        self.compare = compare_for(pulse_width);
    }

    pub fn enable(&mut self) { self.enabled = true; }

    /// Disable the output. The stored pulse width is kept for the next enable.
    pub fn disable(&mut self) { self.enabled = false; }

    #[inline]
    pub const fn is_enabled(&self) -> bool { self.enabled }

    /// Compare value to program: the pulse width while enabled, 0 otherwise.
    #[inline]
    pub const fn compare(&self) -> u16 { if self.enabled { self.compare } else { 0 } }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_half_period() {
        assert_eq!(compare_for(PulseWidth::from_secs(0.040)), 24_000);
    }

    #[test]
    fn test_compare_typical_pulse() {
        // 38.492 ms of 80 ms = 23095.2 ticks
        assert_eq!(compare_for(PulseWidth::from_secs(0.038_492)), 23_095);
    }

    #[test]
    fn test_compare_saturates() {
        assert_eq!(compare_for(PulseWidth::from_secs(0.5)), 48_000);
        assert_eq!(compare_for(PulseWidth::from_secs(-0.01)), 0);
        assert_eq!(compare_for(PulseWidth::from_secs(f32::NAN)), 0);
        assert_eq!(compare_for(PulseWidth::ZERO), 0);
    }

    #[test]
    fn test_timing_disabled_outputs_zero() {
        let mut timing = InjectorTiming::new();
        timing.set_pulse_width(PulseWidth::from_secs(0.040));
        assert_eq!(timing.compare(), 0);

        timing.enable();
        assert!(timing.is_enabled());
        assert_eq!(timing.compare(), 24_000);

        timing.disable();
        assert_eq!(timing.compare(), 0);

        // Pulse width survives a stop/start
        timing.enable();
        assert_eq!(timing.compare(), 24_000);
    }
}
