//! Controller configuration constants.
//!
//! All values are compile-time constants. Groups with an ordering requirement
//! carry `const` assertions so a bad edit fails the build instead of the engine.

use crate::sensors::SensorScale;

// =============================================================================
// ADC
// =============================================================================

/// Largest raw sample the scaler expects (10-bit converter).
pub const RAW_MAX: u16 = 1023;

// =============================================================================
// Sensor Scaling
// =============================================================================

/// Manifold absolute pressure: 20 to 250 kPa.
pub const LOAD_SCALE: SensorScale = SensorScale::new(230.0, 20.0);

/// Engine speed: 0 to 8000 RPM.
pub const SPEED_SCALE: SensorScale = SensorScale::new(8000.0, 0.0);

/// Coolant temperature: 273 to 383 K.
pub const TEMPERATURE_SCALE: SensorScale = SensorScale::new(110.0, 273.0);

/// Exhaust oxygen sensor: 0.2 to 0.8 (fraction).
pub const OXYGEN_SCALE: SensorScale = SensorScale::new(0.6, 0.2);

const _: () = assert!(LOAD_SCALE.range > 0.0);
const _: () = assert!(SPEED_SCALE.range > 0.0);
const _: () = assert!(TEMPERATURE_SCALE.range > 0.0);
const _: () = assert!(OXYGEN_SCALE.range > 0.0);

// =============================================================================
// Timing
// =============================================================================

/// Injector PWM period in seconds (80 ms).
pub const INJECTOR_PERIOD_S: f32 = 0.080;

/// Delay between control loop iterations in milliseconds.
pub const CYCLE_PERIOD_MS: u64 = 100;

const _: () = assert!(INJECTOR_PERIOD_S > 0.0);

// =============================================================================
// Display
// =============================================================================

/// Character LCD columns (HD44780 16x2).
pub const LCD_COLUMNS: usize = 16;

/// Character LCD rows.
pub const LCD_ROWS: usize = 2;

/// Capacity of a status line string.
pub const DISPLAY_TEXT_LEN: usize = 20;

/// Status shown while the engine switch reads "off".
pub const ENGINE_OFF_TEXT: &str = "ENGINE_OFF";

const _: () = assert!(ENGINE_OFF_TEXT.len() <= LCD_COLUMNS);
const _: () = assert!(LCD_COLUMNS <= DISPLAY_TEXT_LEN);
