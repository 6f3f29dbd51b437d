//! Text readout of the simulation state, drawn under the LCD panel.

use efi_common::{CycleReport, EngineState};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use profont::PROFONT_12_POINT;

use crate::drivers::SimInjector;
use crate::engine_model::EngineModel;

const FONT: &MonoFont<'static> = &PROFONT_12_POINT;

/// Vertical distance between readout lines (px).
pub const LINE_HEIGHT: u32 = FONT.character_size.height + 2;

/// Number of readout lines.
pub const LINES: usize = 3;

const TEXT_COLOR: Rgb565 = Rgb565::new(24, 48, 24);
const WARN_COLOR: Rgb565 = Rgb565::new(31, 40, 0);

/// Build the readout lines for one cycle.
pub fn readout_lines(
    model: &EngineModel,
    injector: &SimInjector,
    report: &CycleReport,
) -> [String; LINES] {
    let state = match report.state {
        EngineState::Running => "RUN",
        EngineState::Stopped => "OFF",
    };
    let first = format!(
        "{state} THR {:>3.0}%  INJ {:>3.0}%",
        model.throttle() * 100.0,
        injector.duty() * 100.0
    );

    let second = match (report.readings, report.indices) {
        (Some(r), Some(i)) => format!(
            "{:>4.0}rpm[{}] {:>5.1}kPa[{}] {:>3.0}K[{}] {:.2}[{}]",
            r.speed_rpm,
            i.rpm(),
            r.load_kpa,
            i.load(),
            r.coolant_k,
            i.temp(),
            r.oxygen,
            i.oxy()
        ),
        _ => format!("engine {:.0}rpm coolant {:.0}K", model.speed_rpm(), model.coolant_k()),
    };

    let third = report
        .diagnostics
        .first()
        .map_or_else(String::new, |error| format!("! {error}"));

    [first, second, third]
}

/// Draw readout lines starting at `origin`. Diagnostic lines are highlighted.
pub fn draw_readout<D>(
    target: &mut D,
    origin: Point,
    lines: &[String; LINES],
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    for (i, line) in lines.iter().enumerate() {
        let color = if line.starts_with('!') { WARN_COLOR } else { TEXT_COLOR };
        let position = origin + Point::new(0, (i as u32 * LINE_HEIGHT) as i32);
        Text::with_baseline(line, position, MonoTextStyle::new(FONT, color), Baseline::Top).draw(target)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use efi_common::{Controller, Drivers};

    use super::*;
    use crate::drivers::{SimAdc, SimSwitch};
    use crate::lcd::LcdPanel;

    #[test]
    fn test_readout_running() {
        let model = EngineModel::new();
        let mut drivers = Drivers::new(SimAdc::new(), SimInjector::new(), LcdPanel::new(), SimSwitch::new());
        drivers.adc.set_samples([512; 4]);
        drivers.switch.set(true);
        let report = Controller::new().step(&mut drivers);

        let lines = readout_lines(&model, &drivers.injector, &report);
        assert!(lines[0].starts_with("RUN"));
        assert!(lines[1].contains("[9]"));
        assert!(lines[1].contains("135.1kPa[7]"));
        assert!(lines[2].is_empty());
    }

    #[test]
    fn test_readout_shows_diagnostic() {
        let model = EngineModel::new();
        let mut drivers = Drivers::new(SimAdc::new(), SimInjector::new(), LcdPanel::new(), SimSwitch::new());
        // Load raw 378 lands in the manifold pressure gap
        drivers.adc.set_samples([378, 512, 512, 512]);
        drivers.switch.set(true);
        let report = Controller::new().step(&mut drivers);

        let lines = readout_lines(&model, &drivers.injector, &report);
        assert!(lines[2].starts_with("! load"));
    }

    #[test]
    fn test_readout_stopped() {
        let model = EngineModel::new();
        let mut drivers = Drivers::new(SimAdc::new(), SimInjector::new(), LcdPanel::new(), SimSwitch::new());
        let report = Controller::new().step(&mut drivers);

        let lines = readout_lines(&model, &drivers.injector, &report);
        assert!(lines[0].starts_with("OFF"));
        assert!(lines[0].contains("INJ   0%"));
        assert!(lines[1].starts_with("engine"));
    }
}
