//! EFI Controller Firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Runs the fuel injection control loop every 100 ms:
//! - Engine switch closed: sample load, speed, coolant and oxygen sensors,
//!   compute the injector pulse width, drive the injector PWM and show the
//!   pulse width in milliseconds on the LCD.
//! - Engine switch open: injector off, LCD shows `ENGINE_OFF`.
//!
//! See `config::board` for the pin assignment.
//!
//! # Logging
//!
//! defmt over RTT. State changes log at info, every cycle logs a debug summary,
//! and bin diagnostics (sensor outside its table or in a calibration gap) log
//! as warnings at most once per second.

#![no_std]
#![no_main]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

// Modules only used in the binary (not testable on host)
mod drivers;

use defmt::{debug, info, warn};
use efi_common::config::CYCLE_PERIOD_MS;
use efi_common::{Controller, Drivers};
use efi_pico2::config::{DIAGNOSTIC_LOG_INTERVAL_MS, PWM_DIVIDER, PWM_TOP};
use efi_pico2::hd44780::Hd44780;
use efi_pico2::throttle::LogThrottle;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::{Delay, Instant, Timer};
use {defmt_rtt as _, panic_probe as _};

use crate::drivers::{AdcSensors, LcdStatus, PwmInjector, SwitchInput};

// Program metadata for `picotool info`
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"efi-pico2"),
    embassy_rp::binary_info::rp_program_description!(c"Electronic fuel injection controller"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("EFI controller starting...");

    let p = embassy_rp::init(Default::default());

    // Sensors: ADC0-3 on GPIO26-29, no pulls on analog inputs
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let channels = [
        Channel::new_pin(p.PIN_26, Pull::None),
        Channel::new_pin(p.PIN_27, Pull::None),
        Channel::new_pin(p.PIN_28, Pull::None),
        Channel::new_pin(p.PIN_29, Pull::None),
    ];
    let sensors = AdcSensors::new(adc, channels);

    // Injector: PWM slice 0 channel A on GPIO16, 80 ms period, starts disabled
    let mut pwm_config = PwmConfig::default();
    pwm_config.divider = PWM_DIVIDER.into();
    pwm_config.top = PWM_TOP;
    pwm_config.compare_a = 0;
    pwm_config.enable = false;
    let pwm = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, pwm_config.clone());
    let injector = PwmInjector::new(pwm, pwm_config);
    info!("Injector PWM: divider {}, top {}", PWM_DIVIDER, PWM_TOP);

    // LCD: D0-D7 on GPIO0-7, RS on GPIO8, E on GPIO9
    let lcd_data = [
        Output::new(p.PIN_0, Level::Low),
        Output::new(p.PIN_1, Level::Low),
        Output::new(p.PIN_2, Level::Low),
        Output::new(p.PIN_3, Level::Low),
        Output::new(p.PIN_4, Level::Low),
        Output::new(p.PIN_5, Level::Low),
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_7, Level::Low),
    ];
    let lcd_rs = Output::new(p.PIN_8, Level::Low);
    let lcd_enable = Output::new(p.PIN_9, Level::Low);
    let display = LcdStatus::new(Hd44780::new(lcd_data, lcd_rs, lcd_enable, Delay));
    info!("LCD initialized");

    // Engine switch to ground on GPIO22 (active-low)
    let switch = SwitchInput::new(Input::new(p.PIN_22, Pull::Up));

    let mut drivers = Drivers::new(sensors, injector, display, switch);
    let mut controller = Controller::new();
    let mut diagnostic_throttle = LogThrottle::new(DIAGNOSTIC_LOG_INTERVAL_MS);

    info!("Control loop running ({} ms cycle)", CYCLE_PERIOD_MS);

    loop {
        let report = controller.step(&mut drivers);

        if report.state_changed {
            info!("Engine {}", report.state);
        }

        if let (Some(readings), Some(pulse_width)) = (report.readings, report.pulse_width) {
            debug!(
                "#{} load={} kPa speed={} rpm coolant={} K ego={} -> {} ms",
                report.cycle,
                readings.load_kpa,
                readings.speed_rpm,
                readings.coolant_k,
                readings.oxygen,
                report.text.as_str()
            );
            debug!("pulse width {} s", pulse_width.as_secs());
        }

        if !report.diagnostics.is_empty()
            && let Some(suppressed) = diagnostic_throttle.allow(Instant::now().as_millis())
        {
            for error in &report.diagnostics {
                warn!("#{}: {}", report.cycle, error);
            }
            if suppressed > 0 {
                warn!("{} cycles with diagnostics not shown", suppressed);
            }
        }

        Timer::after_millis(CYCLE_PERIOD_MS).await;
    }
}
