//! Fuel pulse width computation.
//!
//! ```text
//! afr         = FUEL_MAP[rpm][load]
//! base_pw     = 2.0 / (4.0 * afr)
//! pulse_width = base_pw * TEMP_FACTORS[temp] * OXY_FACTORS[oxy]
//! ```
//!
//! The 2.0 constant is the simplified injector flow model; the result is in
//! seconds, the same unit as the injector PWM period. Both corrections are
//! applied on every call.

use crate::bins::{BinLookup, LOAD_BIN_COUNT, OXY_BIN_COUNT, RPM_BIN_COUNT, TEMP_BIN_COUNT};
use crate::calibration::{FUEL_MAP, OXY_FACTORS, TEMP_FACTORS};
use crate::errors::{IndexError, IndexResult};

/// Injector flow constant of the base pulse width formula.
pub const INJECTOR_FLOW_CONSTANT: f32 = 2.0;

// =============================================================================
// Pulse Width
// =============================================================================

/// Injector open time per cycle.
#[derive(Clone, Copy, PartialEq, PartialOrd, Debug, Default)]
pub struct PulseWidth(f32);

impl PulseWidth {
    pub const ZERO: Self = Self(0.0);

    #[inline]
    pub const fn from_secs(secs: f32) -> Self { Self(secs) }

    #[inline]
    pub const fn as_secs(self) -> f32 { self.0 }

    #[inline]
    pub const fn as_millis(self) -> f32 { self.0 * 1000.0 }

    /// Fraction of `period_s` the injector is open, limited to `0.0..=1.0`.
    pub fn duty(
        self,
        period_s: f32,
    ) -> f32 {
        if period_s <= 0.0 || self.0.is_nan() {
            return 0.0;
        }
        (self.0 / period_s).clamp(0.0, 1.0)
    }
}

// =============================================================================
// Table Indices
// =============================================================================

/// Bin indices for one pulse width computation.
///
/// Constructed through [`TableIndices::new`], which guarantees every index
/// addresses its table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TableIndices {
    rpm: u8,
    load: u8,
    temp: u8,
    oxy: u8,
}

impl TableIndices {
    pub fn new(
        rpm: u8,
        load: u8,
        temp: u8,
        oxy: u8,
    ) -> IndexResult<Self> {
        check(rpm, RPM_BIN_COUNT, "fuel map rows")?;
        check(load, LOAD_BIN_COUNT, "fuel map columns")?;
        check(temp, TEMP_BIN_COUNT, "temperature factors")?;
        check(oxy, OXY_BIN_COUNT, "oxygen factors")?;
        Ok(Self { rpm, load, temp, oxy })
    }

    /// Indices resolved against the sensor bin tables.
    ///
    /// Each bin table has the length of the calibration table it addresses,
    /// and a resolved index is always inside its bin table.
    pub(crate) const fn from_resolved(
        rpm: &BinLookup,
        load: &BinLookup,
        temp: &BinLookup,
        oxy: &BinLookup,
    ) -> Self {
        Self {
            rpm: rpm.index,
            load: load.index,
            temp: temp.index,
            oxy: oxy.index,
        }
    }

    #[inline]
    pub const fn rpm(&self) -> u8 { self.rpm }

    #[inline]
    pub const fn load(&self) -> u8 { self.load }

    #[inline]
    pub const fn temp(&self) -> u8 { self.temp }

    #[inline]
    pub const fn oxy(&self) -> u8 { self.oxy }
}

fn check(
    index: u8,
    len: usize,
    table: &'static str,
) -> IndexResult<()> {
    if usize::from(index) < len {
        Ok(())
    } else {
        Err(IndexError::IndexOutOfTable { table, index, len })
    }
}

// =============================================================================
// Computation
// =============================================================================

/// Target air-fuel ratio for a speed/load cell.
#[inline]
pub fn target_afr(indices: &TableIndices) -> f32 { FUEL_MAP[usize::from(indices.rpm)][usize::from(indices.load)] }

/// Uncorrected pulse width for an air-fuel ratio.
#[inline]
pub fn base_pulse_width(afr: f32) -> PulseWidth { PulseWidth(INJECTOR_FLOW_CONSTANT / (4.0 * afr)) }

/// Corrected injector pulse width for the given table indices.
pub fn compute(indices: &TableIndices) -> PulseWidth {
    let base = base_pulse_width(target_afr(indices));
    let temp_factor = TEMP_FACTORS[usize::from(indices.temp)];
    let oxy_factor = OXY_FACTORS[usize::from(indices.oxy)];
    PulseWidth(base.0 * temp_factor * oxy_factor)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_bounds() {
        assert!(TableIndices::new(15, 15, 4, 6).is_ok());
        assert_eq!(
            TableIndices::new(16, 0, 0, 0),
            Err(IndexError::IndexOutOfTable {
                table: "fuel map rows",
                index: 16,
                len: 16,
            })
        );
        assert!(TableIndices::new(0, 0, 5, 0).is_err());
        assert!(TableIndices::new(0, 0, 0, 7).is_err());
    }

    #[cfg(not(feature = "integer-fuel-map"))]
    #[test]
    fn test_compute_reference_cell() {
        let indices = TableIndices::new(0, 0, 2, 0).unwrap();
        let expected = 2.0f32 / (4.0 * 15.1);
        assert_eq!(compute(&indices).as_secs(), expected);
        assert!((compute(&indices).as_secs() - 0.033_113).abs() < 1e-6);
    }

    #[cfg(not(feature = "integer-fuel-map"))]
    #[test]
    fn test_compute_applies_both_factors() {
        // Cold engine and lean exhaust: 1.2 * 0.75 on top of AFR 12.6
        let indices = TableIndices::new(9, 7, 0, 6).unwrap();
        let expected = 2.0f32 / (4.0 * 12.6) * 1.2 * 0.75;
        assert!((compute(&indices).as_secs() - expected).abs() < 1e-7);
    }

    #[test]
    fn test_compute_idempotent() {
        let indices = TableIndices::new(7, 11, 1, 3).unwrap();
        let first = compute(&indices);
        let second = compute(&indices);
        assert_eq!(first.as_secs().to_bits(), second.as_secs().to_bits());
    }

    #[test]
    fn test_pulse_width_fits_period() {
        // Richest corner of every table stays inside the 80 ms period
        for rpm in 0..RPM_BIN_COUNT as u8 {
            for load in 0..LOAD_BIN_COUNT as u8 {
                let indices = TableIndices::new(rpm, load, 0, 0).unwrap();
                let pw = compute(&indices);
                assert!(pw.as_secs() > 0.0);
                assert!(pw.as_secs() < crate::config::INJECTOR_PERIOD_S);
            }
        }
    }

    #[test]
    fn test_duty() {
        let pw = PulseWidth::from_secs(0.04);
        assert!((pw.duty(0.08) - 0.5).abs() < 1e-6);
        assert_eq!(PulseWidth::from_secs(0.2).duty(0.08), 1.0);
        assert_eq!(PulseWidth::from_secs(-0.01).duty(0.08), 0.0);
        assert_eq!(pw.duty(0.0), 0.0);
        assert!((pw.as_millis() - 40.0).abs() < 1e-4);
    }
}
