//! ADC sample conditioning.
//!
//! The RP2350 converter returns 12-bit samples; the scaler works on 10-bit
//! values in `0..=RAW_MAX`. A failed conversion repeats the channel's last
//! good sample so one bad read never reaches the fuel computation.

use efi_common::SensorChannel;
use efi_common::config::RAW_MAX;

use crate::config::ADC_SAMPLE_SHIFT;

/// Reduce a 12-bit ADC sample to the 10-bit range the scaler expects.
#[inline]
pub fn to_raw10(sample: u16) -> u16 { (sample >> ADC_SAMPLE_SHIFT).min(RAW_MAX) }

/// Last good 10-bit sample per channel.
#[derive(Clone, Debug, Default)]
pub struct SampleHold {
    last: [u16; SensorChannel::COUNT],
    failures: u32,
}

impl SampleHold {
    pub const fn new() -> Self {
        Self {
            last: [0; SensorChannel::COUNT],
            failures: 0,
        }
    }

    /// Take a conversion result for `channel` and return the value to use.
    ///
    /// `None` marks a failed conversion; the held value is returned instead.
    pub fn update(
        &mut self,
        channel: SensorChannel,
        sample: Option<u16>,
    ) -> u16 {
        let slot = &mut self.last[channel.index()];
        match sample {
            Some(sample) => *slot = to_raw10(sample),
            None => self.failures = self.failures.wrapping_add(1),
        }
        *slot
    }

    /// Last value handed out for `channel`.
    #[inline]
    pub const fn last(
        &self,
        channel: SensorChannel,
    ) -> u16 {
        self.last[channel.index()]
    }

    /// Failed conversions since start.
    #[inline]
    pub const fn failures(&self) -> u32 { self.failures }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_raw10() {
        assert_eq!(to_raw10(0), 0);
        assert_eq!(to_raw10(2048), 512);
        assert_eq!(to_raw10(4095), 1023);
        // Samples wider than 12 bits never exceed the scaler range
        assert_eq!(to_raw10(u16::MAX), RAW_MAX);
    }

    #[test]
    fn test_hold_repeats_last_good_sample() {
        let mut hold = SampleHold::new();
        assert_eq!(hold.update(SensorChannel::Load, Some(2048)), 512);
        assert_eq!(hold.update(SensorChannel::Load, None), 512);
        assert_eq!(hold.failures(), 1);
        assert_eq!(hold.last(SensorChannel::Load), 512);
    }

    #[test]
    fn test_hold_channels_independent() {
        let mut hold = SampleHold::new();
        hold.update(SensorChannel::Speed, Some(4000));
        assert_eq!(hold.update(SensorChannel::Oxygen, None), 0);
        assert_eq!(hold.last(SensorChannel::Speed), 1000);
    }
}
