//! Sensor channels and raw-sample scaling.
//!
//! Every sensor uses the same linear transform:
//!
//! ```text
//! physical = raw * (range / RAW_MAX) + offset
//! ```
//!
//! The transform is not clamped. A raw value above [`RAW_MAX`] yields a
//! physical value above the sensor domain; the bin tables deal with that.

use core::fmt;

use crate::config::{LOAD_SCALE, OXYGEN_SCALE, RAW_MAX, SPEED_SCALE, TEMPERATURE_SCALE};

// =============================================================================
// Sensor Channels
// =============================================================================

/// Analog inputs of the controller, in the order the control loop samples them.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SensorChannel {
    /// Manifold absolute pressure sensor, used as engine load (kPa).
    Load = 0,
    /// Engine speed (RPM).
    Speed = 1,
    /// Coolant temperature (K).
    Temperature = 2,
    /// Exhaust gas oxygen sensor (fraction).
    Oxygen = 3,
}

impl SensorChannel {
    /// Number of analog channels.
    pub const COUNT: usize = 4;

    /// All channels in sampling order.
    pub const ALL: [Self; Self::COUNT] = [Self::Load, Self::Speed, Self::Temperature, Self::Oxygen];

    /// Position of this channel in per-channel arrays.
    #[inline]
    pub const fn index(self) -> usize { self as usize }

    /// Linear scaling parameters for this channel.
    pub const fn scale(self) -> SensorScale {
        match self {
            Self::Load => LOAD_SCALE,
            Self::Speed => SPEED_SCALE,
            Self::Temperature => TEMPERATURE_SCALE,
            Self::Oxygen => OXYGEN_SCALE,
        }
    }

    /// Short name used in logs and on the simulator panel.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Speed => "speed",
            Self::Temperature => "coolant",
            Self::Oxygen => "ego",
        }
    }

    /// Physical unit after scaling.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Load => "kPa",
            Self::Speed => "rpm",
            Self::Temperature => "K",
            Self::Oxygen => "",
        }
    }
}

impl fmt::Display for SensorChannel {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Scaling
// =============================================================================

/// Linear transform from a raw sample to a physical value.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SensorScale {
    /// Span of the physical domain covered by `0..=RAW_MAX`.
    pub range: f32,
    /// Physical value at raw sample 0.
    pub offset: f32,
}

impl SensorScale {
    pub const fn new(
        range: f32,
        offset: f32,
    ) -> Self {
        Self { range, offset }
    }

    /// Physical value at raw sample 0.
    #[inline]
    pub const fn min(&self) -> f32 { self.offset }

    /// Physical value at raw sample [`RAW_MAX`].
    #[inline]
    pub const fn max(&self) -> f32 { self.offset + self.range }

    /// Convert a raw sample to the physical unit.
    #[inline]
    pub fn apply(
        &self,
        raw: u16,
    ) -> f32 {
        f32::from(raw) * (self.range / f32::from(RAW_MAX)) + self.offset
    }
}

/// Convert a raw sample from `channel` to its physical unit.
#[inline]
pub fn scale(
    channel: SensorChannel,
    raw: u16,
) -> f32 {
    channel.scale().apply(raw)
}

// =============================================================================
// Sensor Readings
// =============================================================================

/// Physical values of all four sensors for one control loop iteration.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct SensorReadings {
    /// Manifold absolute pressure (kPa).
    pub load_kpa: f32,
    /// Engine speed (RPM).
    pub speed_rpm: f32,
    /// Coolant temperature (K).
    pub coolant_k: f32,
    /// Exhaust oxygen level (fraction).
    pub oxygen: f32,
}

impl SensorReadings {
    /// Scale one raw sample per channel, indexed by [`SensorChannel::index`].
    pub fn from_raw(raw: [u16; SensorChannel::COUNT]) -> Self {
        Self {
            load_kpa: scale(SensorChannel::Load, raw[SensorChannel::Load.index()]),
            speed_rpm: scale(SensorChannel::Speed, raw[SensorChannel::Speed.index()]),
            coolant_k: scale(SensorChannel::Temperature, raw[SensorChannel::Temperature.index()]),
            oxygen: scale(SensorChannel::Oxygen, raw[SensorChannel::Oxygen.index()]),
        }
    }

    /// Physical value for a channel.
    pub const fn get(
        &self,
        channel: SensorChannel,
    ) -> f32 {
        match channel {
            SensorChannel::Load => self.load_kpa,
            SensorChannel::Speed => self.speed_rpm,
            SensorChannel::Temperature => self.coolant_k,
            SensorChannel::Oxygen => self.oxygen,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(
        actual: f32,
        expected: f32,
        tolerance: f32,
    ) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_scale_endpoints() {
        for channel in SensorChannel::ALL {
            let scale = channel.scale();
            assert_close(scale.apply(0), scale.min(), 1e-6);
            assert_close(scale.apply(RAW_MAX), scale.max(), 1e-2);
        }
    }

    #[test]
    fn test_scale_domains() {
        assert_close(SensorChannel::Load.scale().max(), 250.0, 1e-3);
        assert_close(SensorChannel::Speed.scale().max(), 8000.0, 1e-3);
        assert_close(SensorChannel::Temperature.scale().min(), 273.0, 1e-3);
        assert_close(SensorChannel::Temperature.scale().max(), 383.0, 1e-3);
        assert_close(SensorChannel::Oxygen.scale().min(), 0.2, 1e-6);
        assert_close(SensorChannel::Oxygen.scale().max(), 0.8, 1e-6);
    }

    #[test]
    fn test_scale_midpoint() {
        let readings = SensorReadings::from_raw([512; SensorChannel::COUNT]);
        assert_close(readings.load_kpa, 135.112, 0.01);
        assert_close(readings.speed_rpm, 4003.91, 0.05);
        assert_close(readings.coolant_k, 328.05, 0.01);
        assert_close(readings.oxygen, 0.5003, 0.0005);
    }

    #[test]
    fn test_scale_is_not_clamped() {
        // Out-of-range raw samples pass straight through the transform
        let speed = scale(SensorChannel::Speed, 2046);
        assert!(speed > 15_000.0);
    }

    #[test]
    fn test_readings_get_matches_fields() {
        let readings = SensorReadings::from_raw([100, 200, 300, 400]);
        assert_eq!(readings.get(SensorChannel::Load), readings.load_kpa);
        assert_eq!(readings.get(SensorChannel::Speed), readings.speed_rpm);
        assert_eq!(readings.get(SensorChannel::Temperature), readings.coolant_k);
        assert_eq!(readings.get(SensorChannel::Oxygen), readings.oxygen);
    }

    #[test]
    fn test_channel_order() {
        for (i, channel) in SensorChannel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
        }
    }
}
