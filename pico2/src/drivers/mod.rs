//! Hardware drivers for the controller.
//!
//! Each driver wraps embassy-rp peripherals behind one of the control loop
//! traits from `efi_common::hal`:
//!
//! - [`AdcSensors`]: the four analog sensors (blocking ADC, last-good hold)
//! - [`PwmInjector`]: injector output on PWM slice 0 channel A
//! - [`LcdStatus`]: HD44780 status line
//! - [`SwitchInput`]: active-low engine switch

use defmt::warn;
use efi_common::{AnalogInput, EngineSwitch, InjectorOutput, PulseWidth, SensorChannel, StatusDisplay};
use efi_pico2::hd44780::Hd44780;
use efi_pico2::injector::InjectorTiming;
use efi_pico2::sampling::SampleHold;
use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_rp::gpio::{Input, Output};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::Delay;

// =============================================================================
// Sensors
// =============================================================================

/// Blocking ADC with one channel per sensor, indexed by [`SensorChannel::index`].
pub struct AdcSensors<'d> {
    adc: Adc<'d, Blocking>,
    channels: [Channel<'d>; SensorChannel::COUNT],
    hold: SampleHold,
}

impl<'d> AdcSensors<'d> {
    pub fn new(
        adc: Adc<'d, Blocking>,
        channels: [Channel<'d>; SensorChannel::COUNT],
    ) -> Self {
        Self {
            adc,
            channels,
            hold: SampleHold::new(),
        }
    }
}

impl AnalogInput for AdcSensors<'_> {
    fn read_raw(
        &mut self,
        channel: SensorChannel,
    ) -> u16 {
        match self.adc.blocking_read(&mut self.channels[channel.index()]) {
            Ok(sample) => self.hold.update(channel, Some(sample)),
            Err(_) => {
                warn!(
                    "ADC conversion failed on {}, holding {} ({} failures)",
                    channel,
                    self.hold.last(channel),
                    self.hold.failures().saturating_add(1)
                );
                self.hold.update(channel, None)
            }
        }
    }
}

// =============================================================================
// Injector
// =============================================================================

/// Injector driver output on a PWM slice configured for the 80 ms period.
pub struct PwmInjector<'d> {
    pwm: Pwm<'d>,
    config: PwmConfig,
    timing: InjectorTiming,
}

impl<'d> PwmInjector<'d> {
    /// Wrap a PWM slice created with `config`. The output starts disabled.
    pub fn new(
        pwm: Pwm<'d>,
        config: PwmConfig,
    ) -> Self {
        let mut injector = Self {
            pwm,
            config,
            timing: InjectorTiming::new(),
        };
        injector.apply();
        injector
    }

    fn apply(&mut self) {
        self.config.enable = self.timing.is_enabled();
        self.config.compare_a = self.timing.compare();
        self.pwm.set_config(&self.config);
    }
}

impl InjectorOutput for PwmInjector<'_> {
    fn set_pulse_width(
        &mut self,
        pulse_width: PulseWidth,
    ) {
        self.timing.set_pulse_width(pulse_width);
        self.apply();
    }

    fn enable(&mut self) {
        if !self.timing.is_enabled() {
            self.timing.enable();
            self.apply();
        }
    }

    fn disable(&mut self) {
        if self.timing.is_enabled() {
            self.timing.disable();
            self.apply();
        }
    }
}

// =============================================================================
// Display
// =============================================================================

/// HD44780 status line on GPIO output pins.
pub struct LcdStatus<'d> {
    lcd: Hd44780<Output<'d>, Delay>,
}

impl<'d> LcdStatus<'d> {
    /// Initialize the LCD and take it over as the status display.
    pub fn new(mut lcd: Hd44780<Output<'d>, Delay>) -> Self {
        let Ok(()) = lcd.init();
        Self { lcd }
    }
}

impl StatusDisplay for LcdStatus<'_> {
    fn show(
        &mut self,
        text: &str,
    ) {
        let Ok(()) = self.lcd.show(text);
    }
}

// =============================================================================
// Engine Switch
// =============================================================================

/// Engine switch to ground with the internal pull-up enabled.
pub struct SwitchInput<'d> {
    input: Input<'d>,
}

impl<'d> SwitchInput<'d> {
    pub fn new(input: Input<'d>) -> Self { Self { input } }
}

impl EngineSwitch for SwitchInput<'_> {
    /// Switch closed (pin pulled low) means the engine is running.
    fn is_engine_running(&mut self) -> bool { self.input.is_low() }
}
