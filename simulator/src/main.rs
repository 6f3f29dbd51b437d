//! EFI Controller Simulator for Desktop.
//!
//! Runs the controller's control loop against a simple engine model, using
//! the same `efi-common` code as the firmware.
//!
//! # Modes
//!
//! - Default: headless run of the scripted drive cycle. Prints cycle reports
//!   and a diagnostic summary; `simulator <file.png>` also saves the final
//!   LCD panel and readout as an image.
//! - `--features window`: interactive SDL window.
//!   - **Space**: Toggle the engine switch
//!   - **Up/Down**: Open/close the throttle

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod drive_cycle;
mod drivers;
mod engine_model;
mod lcd;
mod readout;
mod timing;

use std::path::PathBuf;

use efi_common::{Controller, CycleReport, Drivers, EngineState};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};

use crate::drive_cycle::{STANDARD_CYCLE, segment_at, total_duration};
use crate::drivers::{SimAdc, SimInjector, SimSwitch};
use crate::engine_model::EngineModel;
use crate::lcd::LcdPanel;
use crate::readout::{LINE_HEIGHT, LINES, draw_readout, readout_lines};
use crate::timing::{CYCLE_TIME, REPORT_EVERY};

/// Simulated control loop hardware.
type SimDrivers = Drivers<SimAdc, SimInjector, LcdPanel, SimSwitch>;

/// Space around the panel and between panel and readout (px).
const PADDING: u32 = 8;

/// Width of the readout area (px).
const READOUT_WIDTH: u32 = 380;

/// Size of the rendered scene: LCD panel with the readout below.
const SCENE_SIZE: Size = Size::new(
    2 * PADDING + if LcdPanel::SIZE.width > READOUT_WIDTH { LcdPanel::SIZE.width } else { READOUT_WIDTH },
    3 * PADDING + LcdPanel::SIZE.height + LINES as u32 * LINE_HEIGHT,
);

const BACKGROUND: Rgb565 = Rgb565::BLACK;

fn main() {
    #[cfg(feature = "window")]
    run_window();

    #[cfg(not(feature = "window"))]
    run_headless(std::env::args().nth(1).map(PathBuf::from));
}

fn new_drivers() -> SimDrivers { Drivers::new(SimAdc::new(), SimInjector::new(), LcdPanel::new(), SimSwitch::new()) }

/// Load the model state into the drivers and run one controller iteration.
fn simulate_cycle(
    model: &mut EngineModel,
    controller: &mut Controller,
    drivers: &mut SimDrivers,
) -> CycleReport {
    model.step(CYCLE_TIME.as_secs_f32());
    drivers.switch.set(model.is_running());
    drivers.adc.set_samples(model.raw_samples());
    controller.step(drivers)
}

/// Render the LCD panel and the readout into `display`.
fn render_scene(
    display: &mut SimulatorDisplay<Rgb565>,
    drivers: &SimDrivers,
    lines: &[String; LINES],
) {
    display.clear(BACKGROUND).ok();
    let panel_origin = Point::new(PADDING as i32, PADDING as i32);
    drivers.display.draw(display, panel_origin).ok();
    let readout_origin = Point::new(PADDING as i32, (2 * PADDING + LcdPanel::SIZE.height) as i32);
    draw_readout(display, readout_origin, lines).ok();
}

fn print_report(
    report: &CycleReport,
    drivers: &SimDrivers,
) {
    match (report.state, report.readings, report.pulse_width) {
        (EngineState::Running, Some(r), Some(pw)) => println!(
            "#{:<4} RUN  load {:>6.1} kPa  speed {:>6.0} rpm  coolant {:>5.1} K  ego {:.3}  pw {:.4} s  lcd \"{}\"",
            report.cycle,
            r.load_kpa,
            r.speed_rpm,
            r.coolant_k,
            r.oxygen,
            pw.as_secs(),
            drivers.display.line(0)
        ),
        _ => println!("#{:<4} OFF  lcd \"{}\"", report.cycle, drivers.display.line(0)),
    }
    for error in &report.diagnostics {
        println!("      ! {error}");
    }
}

// =============================================================================
// Headless Drive Cycle
// =============================================================================

#[cfg_attr(feature = "window", allow(dead_code))]
fn run_headless(png: Option<PathBuf>) {
    let mut model = EngineModel::new();
    let mut drivers = new_drivers();
    let mut controller = Controller::new();

    println!(
        "EFI simulator: {:.0} s drive cycle, {} ms control period",
        total_duration(STANDARD_CYCLE),
        CYCLE_TIME.as_millis()
    );

    let mut t = 0.0f32;
    let mut current_label = "";
    let mut last_report = None;

    while let Some(segment) = segment_at(STANDARD_CYCLE, t) {
        if segment.label != current_label {
            current_label = segment.label;
            println!("--- {} (throttle {:.0}%) ---", segment.label, segment.throttle * 100.0);
        }
        model.set_running(segment.engine_on);
        model.set_throttle(segment.throttle);

        let report = simulate_cycle(&mut model, &mut controller, &mut drivers);
        if report.state_changed || report.cycle % REPORT_EVERY == 0 || !report.diagnostics.is_empty() {
            print_report(&report, &drivers);
        }
        last_report = Some(report);

        t += CYCLE_TIME.as_secs_f32();
    }

    let diagnostics = controller.diagnostics();
    println!(
        "Done: {} cycles, {} diagnostics ({} kept)",
        controller.cycles(),
        diagnostics.total(),
        diagnostics.len()
    );
    for entry in diagnostics.iter() {
        println!("  #{:<4} {}", entry.cycle, entry.error);
    }

    if let (Some(path), Some(report)) = (png, last_report) {
        let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(SCENE_SIZE);
        let lines = readout_lines(&model, &drivers.injector, &report);
        render_scene(&mut display, &drivers, &lines);

        let output_settings = OutputSettingsBuilder::new().scale(2).build();
        match display.to_rgb_output_image(&output_settings).save_png(&path) {
            Ok(()) => println!("Saved {}", path.display()),
            Err(e) => eprintln!("Failed to save {}: {e}", path.display()),
        }
    }
}

// =============================================================================
// Interactive Window
// =============================================================================

#[cfg(feature = "window")]
fn run_window() {
    use std::thread;
    use std::time::Instant;

    use embedded_graphics_simulator::sdl2::Keycode;
    use embedded_graphics_simulator::{SimulatorEvent, Window};

    /// Throttle change per key press.
    const THROTTLE_STEP: f32 = 0.05;

    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(SCENE_SIZE);
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("EFI Controller Sim", &output_settings);

    let mut model = EngineModel::new();
    let mut drivers = new_drivers();
    let mut controller = Controller::new();

    loop {
        let cycle_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => match keycode {
                    Keycode::Space if !repeat => {
                        model.set_running(!model.is_running());
                        println!("Engine switch {}", if model.is_running() { "ON" } else { "OFF" });
                    }
                    Keycode::Up => model.set_throttle(model.throttle() + THROTTLE_STEP),
                    Keycode::Down => model.set_throttle(model.throttle() - THROTTLE_STEP),
                    _ => {}
                },
                _ => {}
            }
        }

        let report = simulate_cycle(&mut model, &mut controller, &mut drivers);
        if report.state_changed || !report.diagnostics.is_empty() {
            print_report(&report, &drivers);
        }

        let lines = readout_lines(&model, &drivers.injector, &report);
        render_scene(&mut display, &drivers, &lines);
        window.update(&display);

        let elapsed = cycle_start.elapsed();
        if let Some(remaining) = CYCLE_TIME.checked_sub(elapsed) {
            thread::sleep(remaining);
        }
    }
}
