//! Injector PWM clocking.
//!
//! ```text
//! period = (TOP + 1) * DIVIDER / SYS_CLOCK_HZ
//!        = 48000 * 250 / 150 MHz = 80 ms
//! ```

use efi_common::config::INJECTOR_PERIOD_S;

/// System clock at the default embassy-rp configuration.
pub const SYS_CLOCK_HZ: u32 = 150_000_000;

/// Integer clock divider of the injector PWM slice.
pub const PWM_DIVIDER: u8 = 250;

/// Counter wrap value of the injector PWM slice.
pub const PWM_TOP: u16 = 47_999;

/// Counter ticks per PWM period.
pub const PWM_TICKS: u32 = PWM_TOP as u32 + 1;

/// Configured PWM period in seconds.
pub const PWM_PERIOD_S: f32 = (PWM_TICKS * PWM_DIVIDER as u32) as f32 / SYS_CLOCK_HZ as f32;

const _: () = assert!(PWM_TICKS * PWM_DIVIDER as u32 == SYS_CLOCK_HZ / 1000 * 80);
const _: () = assert!(PWM_PERIOD_S - INJECTOR_PERIOD_S < 1e-6 && INJECTOR_PERIOD_S - PWM_PERIOD_S < 1e-6);
