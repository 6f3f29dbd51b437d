//! Fuel timing core for the EFI controller.
//!
//! This crate contains the platform-agnostic part of the controller, shared
//! between the Pico 2 firmware and the desktop simulator:
//!
//! - [`config`]: Sensor scaling parameters, timing and display constants
//! - [`sensors`]: Sensor channels and the raw-sample to physical-unit scaler
//! - [`bins`]: Non-uniform bin tables that quantize physical values into table indices
//! - [`calibration`]: Fuel map and the temperature/oxygen correction curves
//! - [`fuel`]: Pulse width computation from table indices
//! - [`format`]: Display text for the character LCD
//! - [`hal`]: Driver traits the control loop consumes
//! - [`control`]: Engine run/stop state machine and the per-cycle pipeline
//! - [`diagnostics`]: Ring buffer of recent indexing diagnostics
//! - [`errors`]: Error types
//!
//! # Data Flow
//!
//! ```text
//! raw ADC ─► sensors::scale ─► bins::*_BINS.resolve ─► fuel::compute ─► PWM + LCD
//! ```
//!
//! # no_std Compatibility
//!
//! The crate is `no_std`. Tests run on the host with the standard harness:
//! ```bash
//! cargo test -p efi-common
//! ```

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

pub mod bins;
pub mod calibration;
pub mod config;
pub mod control;
pub mod diagnostics;
pub mod errors;
pub mod format;
pub mod fuel;
pub mod hal;
pub mod sensors;

// Re-export commonly used items
pub use control::{Controller, CycleReport, EngineState};
pub use errors::IndexError;
pub use fuel::{PulseWidth, TableIndices};
pub use hal::{AnalogInput, Drivers, EngineSwitch, InjectorOutput, StatusDisplay};
pub use sensors::{SensorChannel, SensorReadings};
