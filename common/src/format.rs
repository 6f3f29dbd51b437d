//! Status line text for the character LCD.
//!
//! Formatting avoids `core::fmt` float support: the pulse width is converted
//! to hundredths of a millisecond with a truncating cast and printed from
//! integers, which keeps the firmware free of the float formatting code.

use heapless::String;

use crate::config::{DISPLAY_TEXT_LEN, ENGINE_OFF_TEXT};
use crate::fuel::PulseWidth;

/// One status line.
pub type DisplayText = String<DISPLAY_TEXT_LEN>;

/// Pulse width in milliseconds with two decimals, truncated (38.492 ms -> "38.49").
///
/// Negative or NaN widths print as "0.00".
pub fn pulse_width_text(pulse_width: PulseWidth) -> DisplayText {
    let mut text = DisplayText::new();
    let ms = pulse_width.as_millis();
    let hundredths = if ms > 0.0 { (ms * 100.0) as u32 } else { 0 };

    push_u32(&mut text, hundredths / 100);
    text.push('.').ok();
    let fraction = hundredths % 100;
    if fraction < 10 {
        text.push('0').ok();
    }
    push_u32(&mut text, fraction);
    text
}

/// Status line while the engine is stopped.
pub fn engine_off_text() -> DisplayText {
    let mut text = DisplayText::new();
    text.push_str(ENGINE_OFF_TEXT).ok();
    text
}

/// Push a u32 value to a heapless string (no format! macro).
pub fn push_u32<const N: usize>(
    s: &mut String<N>,
    mut val: u32,
) {
    if val == 0 {
        s.push('0').ok();
        return;
    }

    // Build digits in reverse
    let mut digits = [0u8; 10];
    let mut i = 0;
    while val > 0 {
        digits[i] = (val % 10) as u8;
        val /= 10;
        i += 1;
    }

    while i > 0 {
        i -= 1;
        s.push((b'0' + digits[i]) as char).ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_width_text_truncates() {
        assert_eq!(pulse_width_text(PulseWidth::from_secs(0.038_492)).as_str(), "38.49");
        assert_eq!(pulse_width_text(PulseWidth::from_secs(0.033_119)).as_str(), "33.11");
    }

    #[test]
    fn test_pulse_width_text_pads_fraction() {
        assert_eq!(pulse_width_text(PulseWidth::from_secs(0.041_055)).as_str(), "41.05");
        assert_eq!(pulse_width_text(PulseWidth::from_secs(0.012_004)).as_str(), "12.00");
    }

    #[test]
    fn test_pulse_width_text_below_one_ms() {
        assert_eq!(pulse_width_text(PulseWidth::from_secs(0.000_503)).as_str(), "0.50");
        assert_eq!(pulse_width_text(PulseWidth::ZERO).as_str(), "0.00");
        assert_eq!(pulse_width_text(PulseWidth::from_secs(f32::NAN)).as_str(), "0.00");
    }

    #[test]
    fn test_engine_off_text() {
        assert_eq!(engine_off_text().as_str(), "ENGINE_OFF");
    }

    #[test]
    fn test_push_u32() {
        let mut s: String<16> = String::new();
        push_u32(&mut s, 0);
        assert_eq!(s.as_str(), "0");

        let mut s: String<16> = String::new();
        push_u32(&mut s, 4_294_967_295);
        assert_eq!(s.as_str(), "4294967295");
    }
}
