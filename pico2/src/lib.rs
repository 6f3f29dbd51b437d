//! EFI controller firmware library - testable modules for the Pico 2 board.
//!
//! This library contains the board-level logic that can be tested on the host
//! machine. The binary (`main.rs`) uses this library and adds the
//! embassy-rp peripheral drivers.
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test --manifest-path pico2/Cargo.toml --lib --target x86_64-unknown-linux-gnu  # Linux/macOS
//! cargo test --manifest-path pico2/Cargo.toml --lib --target x86_64-pc-windows-msvc    # Windows
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the actual firmware runs as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

// === Pure logic modules (testable on host, no ARM dependencies) ===

// Board configuration
pub mod config;

// Peripheral logic
pub mod hd44780;
pub mod injector;
pub mod sampling;

// Logging helpers
pub mod throttle;
