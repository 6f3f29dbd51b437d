//! Engine control loop.
//!
//! Two states, driven purely by polling the engine switch once per iteration
//! (level-triggered):
//!
//! - [`EngineState::Running`]: enable the injector, sample all four sensors,
//!   resolve their bins, compute the pulse width, send it to the injector and
//!   show it in milliseconds.
//! - [`EngineState::Stopped`]: disable the injector and show `ENGINE_OFF`.
//!
//! Both end by rendering the status line. [`Controller::step`] runs exactly one
//! iteration; the caller waits [`CYCLE_PERIOD_MS`] between iterations.
//!
//! [`CYCLE_PERIOD_MS`]: crate::config::CYCLE_PERIOD_MS

use heapless::Vec;

use crate::bins::{LOAD_BINS, OXY_BINS, RPM_BINS, TEMP_BINS};
use crate::diagnostics::DiagnosticLog;
use crate::errors::IndexError;
use crate::format::{DisplayText, engine_off_text, pulse_width_text};
use crate::fuel::{self, PulseWidth, TableIndices};
use crate::hal::{AnalogInput, Drivers, EngineSwitch, InjectorOutput, StatusDisplay};
use crate::sensors::{SensorChannel, SensorReadings};

// =============================================================================
// Engine State
// =============================================================================

/// Engine run state as read from the switch.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineState {
    Stopped,
    Running,
}

impl EngineState {
    #[inline]
    pub const fn from_switch(running: bool) -> Self {
        if running { Self::Running } else { Self::Stopped }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Stopped => "STOPPED",
            Self::Running => "RUNNING",
        }
    }
}

// =============================================================================
// Cycle Report
// =============================================================================

/// Everything one iteration computed and did.
#[derive(Clone, Debug)]
pub struct CycleReport {
    /// Iteration number, starting at 0.
    pub cycle: u32,
    pub state: EngineState,
    /// True when `state` differs from the previous iteration (or on the first one).
    pub state_changed: bool,
    /// Physical sensor values (running only).
    pub readings: Option<SensorReadings>,
    /// Resolved bins (running only).
    pub indices: Option<TableIndices>,
    /// Computed injector pulse width (running only).
    pub pulse_width: Option<PulseWidth>,
    /// Text sent to the display.
    pub text: DisplayText,
    /// Non-exact bin resolutions of this iteration.
    pub diagnostics: Vec<IndexError, { SensorChannel::COUNT }>,
}

// =============================================================================
// Controller
// =============================================================================

/// Control loop state: the last engine state and the diagnostic history.
pub struct Controller {
    state: Option<EngineState>,
    cycle: u32,
    diagnostics: DiagnosticLog,
}

impl Controller {
    pub const fn new() -> Self {
        Self {
            state: None,
            cycle: 0,
            diagnostics: DiagnosticLog::new(),
        }
    }

    /// State seen by the last iteration, `None` before the first poll.
    #[inline]
    pub const fn state(&self) -> Option<EngineState> { self.state }

    /// Number of iterations run so far.
    #[inline]
    pub const fn cycles(&self) -> u32 { self.cycle }

    #[inline]
    pub const fn diagnostics(&self) -> &DiagnosticLog { &self.diagnostics }

    /// Run one control loop iteration.
    pub fn step<A, O, D, S>(
        &mut self,
        drivers: &mut Drivers<A, O, D, S>,
    ) -> CycleReport
    where
        A: AnalogInput,
        O: InjectorOutput,
        D: StatusDisplay,
        S: EngineSwitch,
    {
        let state = EngineState::from_switch(drivers.switch.is_engine_running());
        let state_changed = self.state != Some(state);
        self.state = Some(state);

        let mut report = CycleReport {
            cycle: self.cycle,
            state,
            state_changed,
            readings: None,
            indices: None,
            pulse_width: None,
            text: DisplayText::new(),
            diagnostics: Vec::new(),
        };

        match state {
            EngineState::Running => {
                drivers.injector.enable();

                let mut raw = [0u16; SensorChannel::COUNT];
                for channel in SensorChannel::ALL {
                    raw[channel.index()] = drivers.adc.read_raw(channel);
                }
                let readings = SensorReadings::from_raw(raw);

                let (indices, diagnostics) = resolve_indices(&readings);
                let pulse_width = fuel::compute(&indices);

                drivers.injector.set_pulse_width(pulse_width);

                for error in &diagnostics {
                    self.diagnostics.record(self.cycle, *error);
                }

                report.readings = Some(readings);
                report.indices = Some(indices);
                report.pulse_width = Some(pulse_width);
                report.text = pulse_width_text(pulse_width);
                report.diagnostics = diagnostics;
            }
            EngineState::Stopped => {
                drivers.injector.disable();
                report.text = engine_off_text();
            }
        }

        drivers.display.show(report.text.as_str());

        self.cycle = self.cycle.wrapping_add(1);
        report
    }
}

impl Default for Controller {
    fn default() -> Self { Self::new() }
}

/// Resolve all four bins, collecting the diagnostics of non-exact ones.
pub fn resolve_indices(readings: &SensorReadings) -> (TableIndices, Vec<IndexError, { SensorChannel::COUNT }>) {
    let mut diagnostics = Vec::new();

    let rpm = RPM_BINS.resolve(readings.speed_rpm);
    let load = LOAD_BINS.resolve(readings.load_kpa);
    let temp = TEMP_BINS.resolve(readings.coolant_k);
    let oxy = OXY_BINS.resolve(readings.oxygen);

    for lookup in [&rpm, &load, &temp, &oxy] {
        if let Some(error) = lookup.diagnostic {
            diagnostics.push(error).ok();
        }
    }

    (TableIndices::from_resolved(&rpm, &load, &temp, &oxy), diagnostics)
}

// =============================================================================
// Unit Tests
// =============================================================================
