//! Timing constants for the simulator.
//!
//! These constants use `std::time::Duration` which is not available in `no_std`
//! environments, so they are defined here rather than in the common crate.

use std::time::Duration;

use efi_common::config::CYCLE_PERIOD_MS;

/// Control loop period, same as the firmware.
pub const CYCLE_TIME: Duration = Duration::from_millis(CYCLE_PERIOD_MS);

/// Headless runs print one report every this many cycles (plus every state change).
pub const REPORT_EVERY: u32 = 10;
