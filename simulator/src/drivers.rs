//! Simulated drivers for the control loop.
//!
//! The main loop copies the engine model's state into these before each
//! controller step; the controller then talks to them exactly as it talks to
//! the board peripherals.

use efi_common::config::INJECTOR_PERIOD_S;
use efi_common::{AnalogInput, EngineSwitch, InjectorOutput, PulseWidth, SensorChannel};

// =============================================================================
// ADC
// =============================================================================

/// ADC returning the samples last loaded from the engine model.
#[derive(Default)]
pub struct SimAdc {
    samples: [u16; SensorChannel::COUNT],
    reads: u32,
}

impl SimAdc {
    pub fn new() -> Self { Self::default() }

    pub fn set_samples(
        &mut self,
        samples: [u16; SensorChannel::COUNT],
    ) {
        self.samples = samples;
    }

    /// Channel reads since start.
    pub fn reads(&self) -> u32 { self.reads }
}

impl AnalogInput for SimAdc {
    fn read_raw(
        &mut self,
        channel: SensorChannel,
    ) -> u16 {
        self.reads = self.reads.wrapping_add(1);
        self.samples[channel.index()]
    }
}

// =============================================================================
// Injector
// =============================================================================

/// Injector output that records what the controller programmed.
#[derive(Default)]
pub struct SimInjector {
    enabled: bool,
    pulse_width: PulseWidth,
}

impl SimInjector {
    pub fn new() -> Self { Self::default() }

    pub fn is_enabled(&self) -> bool { self.enabled }

    pub fn pulse_width(&self) -> PulseWidth { self.pulse_width }

    /// Fraction of the PWM period the injector is open (0 while disabled).
    pub fn duty(&self) -> f32 { if self.enabled { self.pulse_width.duty(INJECTOR_PERIOD_S) } else { 0.0 } }
}

impl InjectorOutput for SimInjector {
    fn set_pulse_width(
        &mut self,
        pulse_width: PulseWidth,
    ) {
        self.pulse_width = pulse_width;
    }

    fn enable(&mut self) { self.enabled = true; }

    fn disable(&mut self) { self.enabled = false; }
}

// =============================================================================
// Engine Switch
// =============================================================================

/// Ignition switch position.
#[derive(Default)]
pub struct SimSwitch {
    on: bool,
}

impl SimSwitch {
    pub fn new() -> Self { Self::default() }

    pub fn set(
        &mut self,
        on: bool,
    ) {
        self.on = on;
    }
}

impl EngineSwitch for SimSwitch {
    fn is_engine_running(&mut self) -> bool { self.on }
}

// =============================================================================
// Unit Tests
// =============================================================================
