//! Simple engine model that feeds the simulated ADC.
//!
//! Each quantity follows its target with a first-order lag:
//! - Manifold pressure follows the throttle quickly (idle vacuum to boost).
//! - Engine speed follows the throttle more slowly and spins down when stopped.
//! - Coolant warms toward operating temperature while running and cools toward
//!   ambient when stopped.
//! - The oxygen sensor switches around stoichiometric while running.
//!
//! Values are physical; [`EngineModel::raw_samples`] converts them back to
//! 10-bit ADC samples with the inverse of the controller's scaling.

use std::f32::consts::TAU;

use efi_common::SensorChannel;
use efi_common::config::RAW_MAX;

// =============================================================================
// Model Parameters
// =============================================================================

/// Manifold pressure with the engine stopped (kPa).
const ATMOSPHERIC_KPA: f32 = 101.3;

/// Manifold pressure at idle (kPa).
const IDLE_LOAD_KPA: f32 = 30.0;

/// Manifold pressure at full throttle with boost (kPa).
const FULL_LOAD_KPA: f32 = 240.0;

/// Idle speed (RPM).
const IDLE_RPM: f32 = 800.0;

/// Speed at full throttle (RPM).
const FULL_THROTTLE_RPM: f32 = 7000.0;

/// Coolant temperature of a cold engine (K).
pub const AMBIENT_K: f32 = 293.0;

/// Thermostat-regulated coolant temperature (K).
const OPERATING_K: f32 = 363.0;

/// Oxygen sensor reading in free air (stopped engine).
const FREE_AIR_OXYGEN: f32 = 0.2;

/// Centre and amplitude of the oxygen sensor switching.
const OXYGEN_CENTRE: f32 = 0.45;
const OXYGEN_SWING: f32 = 0.15;

/// Oxygen sensor switching frequency (Hz).
const OXYGEN_SWITCH_HZ: f32 = 1.5;

/// Time constants (s).
const LOAD_TAU_S: f32 = 0.2;
const RPM_TAU_S: f32 = 0.8;
const WARM_UP_TAU_S: f32 = 60.0;
const COOL_DOWN_TAU_S: f32 = 300.0;

// =============================================================================
// Engine Model
// =============================================================================

/// Engine state driven by the throttle and the ignition.
pub struct EngineModel {
    throttle: f32,
    running: bool,
    load_kpa: f32,
    speed_rpm: f32,
    coolant_k: f32,
    oxygen: f32,
    time_s: f32,
}

impl EngineModel {
    /// Cold engine, stopped, throttle closed.
    pub fn new() -> Self {
        Self {
            throttle: 0.0,
            running: false,
            load_kpa: ATMOSPHERIC_KPA,
            speed_rpm: 0.0,
            coolant_k: AMBIENT_K,
            oxygen: FREE_AIR_OXYGEN,
            time_s: 0.0,
        }
    }

    /// Throttle position, limited to `0.0..=1.0`.
    pub fn set_throttle(
        &mut self,
        throttle: f32,
    ) {
        self.throttle = throttle.clamp(0.0, 1.0);
    }

    pub fn set_running(
        &mut self,
        running: bool,
    ) {
        self.running = running;
    }

    pub fn throttle(&self) -> f32 { self.throttle }

    pub fn is_running(&self) -> bool { self.running }

    pub fn load_kpa(&self) -> f32 { self.load_kpa }

    pub fn speed_rpm(&self) -> f32 { self.speed_rpm }

    pub fn coolant_k(&self) -> f32 { self.coolant_k }

    pub fn oxygen(&self) -> f32 { self.oxygen }

    /// Advance the model by `dt_s` seconds.
    pub fn step(
        &mut self,
        dt_s: f32,
    ) {
        self.time_s += dt_s;

        let (load_target, rpm_target, coolant_target, coolant_tau) = if self.running {
            (
                IDLE_LOAD_KPA + self.throttle * (FULL_LOAD_KPA - IDLE_LOAD_KPA),
                IDLE_RPM + self.throttle * (FULL_THROTTLE_RPM - IDLE_RPM),
                OPERATING_K,
                WARM_UP_TAU_S,
            )
        } else {
            (ATMOSPHERIC_KPA, 0.0, AMBIENT_K, COOL_DOWN_TAU_S)
        };

        self.load_kpa = lag(self.load_kpa, load_target, LOAD_TAU_S, dt_s);
        self.speed_rpm = lag(self.speed_rpm, rpm_target, RPM_TAU_S, dt_s);
        self.coolant_k = lag(self.coolant_k, coolant_target, coolant_tau, dt_s);

        self.oxygen = if self.running {
            (TAU * OXYGEN_SWITCH_HZ * self.time_s).sin().mul_add(OXYGEN_SWING, OXYGEN_CENTRE)
        } else {
            FREE_AIR_OXYGEN
        };
    }

    /// Current values as 10-bit ADC samples, in [`SensorChannel`] order.
    pub fn raw_samples(&self) -> [u16; SensorChannel::COUNT] {
        SensorChannel::ALL.map(|channel| {
            let value = match channel {
                SensorChannel::Load => self.load_kpa,
                SensorChannel::Speed => self.speed_rpm,
                SensorChannel::Temperature => self.coolant_k,
                SensorChannel::Oxygen => self.oxygen,
            };
            to_raw(channel, value)
        })
    }
}

impl Default for EngineModel {
    fn default() -> Self { Self::new() }
}

/// First-order lag of `current` toward `target`.
fn lag(
    current: f32,
    target: f32,
    tau_s: f32,
    dt_s: f32,
) -> f32 {
    let alpha = 1.0 - (-dt_s / tau_s).exp();
    current + (target - current) * alpha
}

/// Inverse of the controller's scaling, rounded and limited to `0..=RAW_MAX`.
pub fn to_raw(
    channel: SensorChannel,
    value: f32,
) -> u16 {
    let scale = channel.scale();
    let raw = ((value - scale.offset) * f32::from(RAW_MAX) / scale.range).round();
    raw.clamp(0.0, f32::from(RAW_MAX)) as u16
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        model: &mut EngineModel,
        seconds: f32,
    ) {
        let steps = (seconds / 0.1) as u32;
        for _ in 0..steps {
            model.step(0.1);
        }
    }

    #[test]
    fn test_starts_cold_and_stopped() {
        let model = EngineModel::new();
        assert!(!model.is_running());
        assert_eq!(model.speed_rpm(), 0.0);
        assert_eq!(model.coolant_k(), AMBIENT_K);
    }

    #[test]
    fn test_idle_settles() {
        let mut model = EngineModel::new();
        model.set_running(true);
        run(&mut model, 10.0);
        assert!((model.speed_rpm() - IDLE_RPM).abs() < 5.0);
        assert!((model.load_kpa() - IDLE_LOAD_KPA).abs() < 1.0);
    }

    #[test]
    fn test_warm_up_and_cool_down() {
        let mut model = EngineModel::new();
        model.set_running(true);
        run(&mut model, 30.0);
        let warm = model.coolant_k();
        assert!(warm > AMBIENT_K + 10.0);

        model.set_running(false);
        run(&mut model, 30.0);
        assert!(model.coolant_k() < warm);
        assert!(model.speed_rpm() < 1.0);
    }

    #[test]
    fn test_throttle_clamped() {
        let mut model = EngineModel::new();
        model.set_throttle(1.5);
        assert_eq!(model.throttle(), 1.0);
        model.set_throttle(-0.5);
        assert_eq!(model.throttle(), 0.0);
    }

    #[test]
    fn test_oxygen_switches_while_running() {
        let mut model = EngineModel::new();
        model.set_running(true);
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for _ in 0..20 {
            model.step(0.1);
            min = min.min(model.oxygen());
            max = max.max(model.oxygen());
        }
        assert!(min < 0.4 && max > 0.5);
    }

    #[test]
    fn test_to_raw_inverts_scaling() {
        for channel in SensorChannel::ALL {
            let scale = channel.scale();
            assert_eq!(to_raw(channel, scale.min()), 0);
            assert_eq!(to_raw(channel, scale.max()), RAW_MAX);
            for raw in [1u16, 378, 512, 1000] {
                assert_eq!(to_raw(channel, scale.apply(raw)), raw);
            }
        }
    }

    #[test]
    fn test_to_raw_clamps() {
        assert_eq!(to_raw(SensorChannel::Speed, -50.0), 0);
        assert_eq!(to_raw(SensorChannel::Load, 400.0), RAW_MAX);
    }

    #[test]
    fn test_raw_samples_order() {
        let model = EngineModel::new();
        let raw = model.raw_samples();
        assert_eq!(raw[SensorChannel::Speed.index()], 0);
        assert_eq!(raw[SensorChannel::Temperature.index()], to_raw(SensorChannel::Temperature, AMBIENT_K));
    }
}
