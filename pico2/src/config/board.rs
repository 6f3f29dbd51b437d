//! Pin assignment for the Pico 2 controller board.
//!
//! ```text
//! GPIO0-7   LCD D0-D7 (HD44780, 8-bit bus)
//! GPIO8     LCD RS
//! GPIO9     LCD E
//! GPIO16    Injector driver (PWM slice 0, channel A)
//! GPIO22    Engine switch (to ground, internal pull-up)
//! GPIO26    ADC0  manifold pressure (load)
//! GPIO27    ADC1  engine speed
//! GPIO28    ADC2  coolant temperature
//! GPIO29    ADC3  exhaust oxygen
//! ```
//!
//! The numbers here document the wiring and are checked against each other;
//! `main.rs` takes the matching embassy-rp peripherals.

use efi_common::SensorChannel;

/// LCD data bus, D0 first.
pub const LCD_DATA_PINS: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

/// LCD register select (low: command, high: data).
pub const LCD_RS_PIN: u8 = 8;

/// LCD enable strobe.
pub const LCD_ENABLE_PIN: u8 = 9;

/// Injector driver output.
pub const INJECTOR_PIN: u8 = 16;

/// Engine switch input, active-low.
pub const ENGINE_SWITCH_PIN: u8 = 22;

/// ADC input pin per sensor, indexed by [`SensorChannel::index`].
pub const SENSOR_PINS: [u8; SensorChannel::COUNT] = [26, 27, 28, 29];

/// The RP2350 ADC samples with 12 bits; the scaler expects 10.
pub const ADC_SAMPLE_SHIFT: u32 = 2;

/// Minimum time between two bursts of diagnostic warnings on the log.
pub const DIAGNOSTIC_LOG_INTERVAL_MS: u64 = 1000;

// Injector pin must sit on PWM slice 0 channel A (GPIO16 or GPIO0; GPIO0 is the LCD)
const _: () = assert!(INJECTOR_PIN == 16);
// ADC-capable pins on the RP2350A package
const _: () = assert!(SENSOR_PINS[0] == 26 && SENSOR_PINS[3] == 29);
const _: () = assert!((4095u32 >> ADC_SAMPLE_SHIFT) == efi_common::config::RAW_MAX as u32);
