//! Board configuration.
//!
//! - `board`: Pin assignment and ADC sample format
//! - `pwm`: Injector PWM clocking

pub mod board;
pub mod pwm;

// Re-export board constants at config level for convenience
pub use board::{
    ADC_SAMPLE_SHIFT,
    DIAGNOSTIC_LOG_INTERVAL_MS,
    ENGINE_SWITCH_PIN,
    INJECTOR_PIN,
    LCD_DATA_PINS,
    LCD_ENABLE_PIN,
    LCD_RS_PIN,
    SENSOR_PINS,
};
// Re-export PWM clocking at config level for convenience
pub use pwm::{PWM_DIVIDER, PWM_TOP, SYS_CLOCK_HZ};
