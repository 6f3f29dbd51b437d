//! Compiled-in calibration data.
//!
//! - [`FUEL_MAP`]: target air-fuel ratio, rows by engine speed bin, columns by load bin
//! - [`TEMP_FACTORS`]: pulse width multiplier per coolant temperature bin
//! - [`OXY_FACTORS`]: pulse width multiplier per exhaust oxygen bin
//!
//! The tables are immutable. Their shapes are tied to the bin tables and their
//! contents are range-checked at compile time.
//!
//! # Integer Fuel Map
//!
//! The deployed AVR build stored the map in an `int` array, truncating every
//! AFR toward zero (15.1 becomes 15). Enable the `integer-fuel-map` feature to
//! reproduce that build; the default uses the calibrated values.

use crate::bins::{LOAD_BIN_COUNT, OXY_BIN_COUNT, RPM_BIN_COUNT, TEMP_BIN_COUNT};

/// Lowest plausible AFR in the fuel map.
pub const AFR_MIN: f32 = 10.0;

/// Highest plausible AFR in the fuel map.
pub const AFR_MAX: f32 = 16.0;

/// Fuel map as a speed-by-load grid of air-fuel ratios.
pub type FuelMap = [[f32; LOAD_BIN_COUNT]; RPM_BIN_COUNT];

#[rustfmt::skip]
const CALIBRATED_FUEL_MAP: FuelMap = [
    [15.1, 14.9, 14.8, 14.6, 14.4, 13.9, 13.5, 12.5, 12.5, 12.5, 12.5, 12.5, 12.5, 12.5, 12.5, 12.5],
    [15.1, 14.9, 14.7, 14.3, 14.3, 13.7, 13.5, 12.7, 12.7, 12.7, 12.7, 12.7, 12.7, 12.7, 12.7, 12.7],
    [15.1, 14.9, 14.7, 14.0, 13.9, 13.6, 13.5, 12.9, 12.9, 12.9, 12.9, 12.9, 12.9, 12.9, 12.9, 12.9],
    [15.1, 14.7, 14.3, 13.9, 13.8, 13.6, 13.5, 13.5, 13.5, 13.5, 13.5, 13.5, 13.5, 13.4, 13.4, 13.4],
    [15.1, 14.7, 13.9, 13.9, 13.8, 13.5, 13.4, 13.4, 13.4, 13.4, 13.2, 13.2, 13.2, 13.2, 13.2, 13.2],
    [15.1, 14.7, 13.9, 13.8, 13.8, 13.5, 13.3, 12.7, 12.5, 12.5, 12.5, 12.5, 12.5, 12.5, 12.5, 12.5],
    [14.1, 14.1, 13.9, 13.8, 13.7, 13.4, 13.3, 12.7, 12.5, 12.5, 12.4, 12.3, 12.3, 12.2, 12.0, 12.0],
    [13.9, 13.9, 13.7, 13.7, 13.5, 13.3, 13.2, 12.6, 12.2, 11.3, 11.2, 11.2, 11.2, 11.1, 11.1, 11.0],
    [13.8, 13.6, 13.5, 13.5, 13.4, 13.2, 13.2, 12.6, 12.1, 11.3, 11.2, 11.2, 11.2, 11.1, 11.0, 10.9],
    [13.5, 13.5, 13.3, 13.2, 13.2, 13.1, 13.1, 12.6, 12.0, 11.2, 11.1, 11.1, 11.1, 11.0, 10.9, 10.6],
    [13.5, 13.4, 13.2, 13.1, 13.1, 13.0, 12.9, 12.5, 12.0, 11.2, 11.1, 11.1, 11.0, 10.9, 10.6, 10.5],
    [13.3, 13.2, 13.2, 13.1, 13.0, 12.9, 12.8, 12.5, 11.9, 11.1, 11.0, 11.0, 11.0, 10.8, 10.4, 10.4],
    [13.2, 13.1, 13.2, 13.1, 13.0, 12.8, 12.8, 12.2, 11.8, 11.1, 11.0, 10.9, 10.9, 10.7, 10.3, 10.2],
    [13.1, 13.1, 13.0, 13.0, 12.9, 12.6, 12.3, 11.9, 11.7, 11.0, 10.9, 10.8, 10.7, 10.6, 10.2, 10.2],
    [13.1, 13.1, 12.9, 12.9, 12.8, 12.4, 12.3, 11.9, 11.7, 10.9, 10.8, 10.7, 10.6, 10.5, 10.1, 10.0],
    [12.9, 12.9, 12.9, 12.8, 12.6, 12.3, 12.0, 11.9, 11.7, 10.8, 10.7, 10.6, 10.5, 10.4, 10.0, 10.0],
];

/// Truncate every entry toward zero, as an integer array would.
#[cfg_attr(not(feature = "integer-fuel-map"), allow(dead_code))]
const fn truncate_map(map: FuelMap) -> FuelMap {
    let mut out = map;
    let mut row = 0;
    while row < RPM_BIN_COUNT {
        let mut col = 0;
        while col < LOAD_BIN_COUNT {
            out[row][col] = map[row][col] as i32 as f32;
            col += 1;
        }
        row += 1;
    }
    out
}

/// Target air-fuel ratio by `[rpm bin][load bin]`.
#[cfg(not(feature = "integer-fuel-map"))]
pub const FUEL_MAP: FuelMap = CALIBRATED_FUEL_MAP;

/// Target air-fuel ratio by `[rpm bin][load bin]`, truncated to integers.
#[cfg(feature = "integer-fuel-map")]
pub const FUEL_MAP: FuelMap = truncate_map(CALIBRATED_FUEL_MAP);

/// Pulse width multiplier by coolant temperature bin (cold engines run rich).
pub const TEMP_FACTORS: [f32; TEMP_BIN_COUNT] = [1.2, 1.15, 1.0, 0.99, 0.98];

/// Pulse width multiplier by exhaust oxygen bin.
pub const OXY_FACTORS: [f32; OXY_BIN_COUNT] = [1.0, 1.0, 0.97, 0.94, 0.9, 0.83, 0.75];

// =============================================================================
// Compile-Time Validation
// =============================================================================

const fn map_in_range(
    map: &FuelMap,
    min: f32,
    max: f32,
) -> bool {
    let mut row = 0;
    while row < RPM_BIN_COUNT {
        let mut col = 0;
        while col < LOAD_BIN_COUNT {
            let afr = map[row][col];
            if afr < min || afr > max {
                return false;
            }
            col += 1;
        }
        row += 1;
    }
    true
}

const fn factors_positive(factors: &[f32]) -> bool {
    let mut i = 0;
    while i < factors.len() {
        if factors[i] <= 0.0 {
            return false;
        }
        i += 1;
    }
    true
}

// Every AFR is plausible and, in particular, non-zero (it is a divisor)
const _: () = assert!(map_in_range(&FUEL_MAP, AFR_MIN, AFR_MAX));
const _: () = assert!(AFR_MIN > 0.0);
const _: () = assert!(factors_positive(&TEMP_FACTORS));
const _: () = assert!(factors_positive(&OXY_FACTORS));

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuel_map_nonzero() {
        for row in &FUEL_MAP {
            for &afr in row {
                assert!(afr != 0.0);
                assert!((AFR_MIN..=AFR_MAX).contains(&afr));
            }
        }
    }

    #[test]
    fn test_truncate_map() {
        let truncated = truncate_map(CALIBRATED_FUEL_MAP);
        assert_eq!(truncated[0][0], 15.0);
        assert_eq!(truncated[9][7], 12.0);
        assert_eq!(truncated[15][15], 10.0);
        assert!(map_in_range(&truncated, AFR_MIN, AFR_MAX));
    }

    #[cfg(not(feature = "integer-fuel-map"))]
    #[test]
    fn test_calibrated_values() {
        assert_eq!(FUEL_MAP[0][0], 15.1);
        assert_eq!(FUEL_MAP[9][7], 12.6);
        assert_eq!(FUEL_MAP[15][15], 10.0);
    }

    #[test]
    fn test_correction_curves() {
        assert_eq!(TEMP_FACTORS[2], 1.0);
        assert_eq!(OXY_FACTORS[0], 1.0);
        // Richer when cold, leaner as exhaust oxygen rises
        assert!(TEMP_FACTORS.windows(2).all(|w| w[0] >= w[1]));
        assert!(OXY_FACTORS.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_range_check_rejects_zero() {
        let mut map = CALIBRATED_FUEL_MAP;
        map[3][4] = 0.0;
        assert!(!map_in_range(&map, AFR_MIN, AFR_MAX));
        assert!(!factors_positive(&[1.0, 0.0]));
    }
}
