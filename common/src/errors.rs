//! Error types for table indexing.
//!
//! Errors are small `Copy` values with no heap data, so the control loop can
//! keep them in a fixed-size report and in the [`DiagnosticLog`].
//!
//! # Categories
//!
//! ### Configuration defects
//! - `NoBinMatch`: a value inside the sensor domain that no bin covers
//! - `IndexOutOfTable`: an index past the end of a calibration table
//!
//! ### Range violations
//! - `BelowRange` / `AboveRange`: a value outside the sensor domain
//! - `NotANumber`: a non-finite physical value
//!
//! The strict lookups return these as `Err`. [`BinTable::resolve`] turns every
//! one of them into a usable bin and keeps the error as a diagnostic.
//!
//! [`DiagnosticLog`]: crate::diagnostics::DiagnosticLog
//! [`BinTable::resolve`]: crate::bins::BinTable::resolve

use thiserror_no_std::Error;

use crate::sensors::SensorChannel;

/// Result type for strict table lookups.
pub type IndexResult<T> = Result<T, IndexError>;

/// Failure to map a physical value or an index onto a table.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum IndexError {
    /// Value lies in a gap between two bins of the sensor's table.
    #[error("{sensor} value {value} falls between bins")]
    NoBinMatch {
        sensor: SensorChannel,
        value: f32,
    },

    /// Value lies below the first bin.
    #[error("{sensor} value {value} below {min}")]
    BelowRange {
        sensor: SensorChannel,
        value: f32,
        min: f32,
    },

    /// Value lies above the last bin.
    #[error("{sensor} value {value} above {max}")]
    AboveRange {
        sensor: SensorChannel,
        value: f32,
        max: f32,
    },

    /// Value is NaN.
    #[error("{sensor} value is not a number")]
    NotANumber { sensor: SensorChannel },

    /// Index does not address a row/column of a calibration table.
    #[error("index {index} outside {table} (len {len})")]
    IndexOutOfTable {
        table: &'static str,
        index: u8,
        len: usize,
    },
}

impl IndexError {
    /// Whether this error points at bad calibration data rather than a bad reading.
    pub const fn is_configuration_defect(&self) -> bool {
        matches!(self, Self::NoBinMatch { .. } | Self::IndexOutOfTable { .. })
    }

    /// Sensor the error refers to, if any.
    pub const fn sensor(&self) -> Option<SensorChannel> {
        match self {
            Self::NoBinMatch { sensor, .. }
            | Self::BelowRange { sensor, .. }
            | Self::AboveRange { sensor, .. }
            | Self::NotANumber { sensor } => Some(*sensor),
            Self::IndexOutOfTable { .. } => None,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for IndexError {
    fn format(
        &self,
        fmt: defmt::Formatter,
    ) {
        match self {
            Self::NoBinMatch { sensor, value } => defmt::write!(fmt, "{} {} between bins", sensor, value),
            Self::BelowRange { sensor, value, min } => defmt::write!(fmt, "{} {} < {}", sensor, value, min),
            Self::AboveRange { sensor, value, max } => defmt::write!(fmt, "{} {} > {}", sensor, value, max),
            Self::NotANumber { sensor } => defmt::write!(fmt, "{} NaN", sensor),
            Self::IndexOutOfTable { table, index, len } => {
                defmt::write!(fmt, "index {} outside {} (len {})", index, table, len)
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defect_classification() {
        let gap = IndexError::NoBinMatch {
            sensor: SensorChannel::Load,
            value: 105.0,
        };
        let high = IndexError::AboveRange {
            sensor: SensorChannel::Speed,
            value: 9000.0,
            max: 8000.0,
        };
        assert!(gap.is_configuration_defect());
        assert!(!high.is_configuration_defect());
        assert_eq!(gap.sensor(), Some(SensorChannel::Load));
        assert_eq!(high.sensor(), Some(SensorChannel::Speed));
    }

    #[test]
    fn test_display() {
        let gap = IndexError::NoBinMatch {
            sensor: SensorChannel::Load,
            value: 105.0,
        };
        assert_eq!(gap.to_string(), "load value 105 falls between bins");

        let table = IndexError::IndexOutOfTable {
            table: "fuel map rows",
            index: 16,
            len: 16,
        };
        assert_eq!(table.to_string(), "index 16 outside fuel map rows (len 16)");
        assert_eq!(table.sensor(), None);
    }
}
