//! Bin tables that quantize physical sensor values into table indices.
//!
//! Each sensor has its own non-uniform breakpoints, reflecting where the
//! calibration needs resolution rather than any linear encoding. Bins are
//! stored as explicit ranges and searched with a binary search, so a gap in
//! the breakpoints shows up as [`IndexError::NoBinMatch`] instead of an
//! undefined index.
//!
//! # Edges
//!
//! Bins are half-open `[low, high)`, except:
//! - the last bin of every table, which is closed `[low, high]`;
//! - oxygen bins 1 and 2, which split at 0.45 as `[0.35, 0.45]` / `(0.45, 0.55)`.
//!
//! # Known Gap
//!
//! The load table has no bin for `[100, 115)` kPa. The breakpoints are kept as
//! calibrated; [`BinTable::resolve`] maps such values to the nearest bin and
//! reports the gap.

use core::cmp::Ordering;

use crate::errors::{IndexError, IndexResult};
use crate::sensors::SensorChannel;

// =============================================================================
// Bin
// =============================================================================

/// One bin: a range of physical values with explicit edge inclusivity.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Bin {
    pub low: f32,
    pub high: f32,
    pub low_inclusive: bool,
    pub high_inclusive: bool,
}

impl Bin {
    /// Half-open bin `[low, high)`.
    pub const fn new(
        low: f32,
        high: f32,
    ) -> Self {
        Self {
            low,
            high,
            low_inclusive: true,
            high_inclusive: false,
        }
    }

    /// Same bin with the upper edge included.
    pub const fn closed(self) -> Self {
        Self {
            high_inclusive: true,
            ..self
        }
    }

    /// Same bin with the lower edge excluded.
    pub const fn open_low(self) -> Self {
        Self {
            low_inclusive: false,
            ..self
        }
    }

    /// Where `value` lies relative to this bin.
    ///
    /// `Less` means the bin is below the value, `Greater` means above, which
    /// is the ordering `binary_search_by` expects.
    fn locate(
        &self,
        value: f32,
    ) -> Ordering {
        let above_low = if self.low_inclusive { value >= self.low } else { value > self.low };
        let below_high = if self.high_inclusive { value <= self.high } else { value < self.high };

        if !above_low {
            Ordering::Greater
        } else if !below_high {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }

    /// Distance from `value` to the nearest edge of this bin.
    fn distance(
        &self,
        value: f32,
    ) -> f32 {
        if value < self.low {
            self.low - value
        } else if value > self.high {
            value - self.high
        } else {
            0.0
        }
    }
}

// =============================================================================
// Bin Lookup
// =============================================================================

/// Outcome of resolving a value to a bin.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BinLookup {
    /// Bin the value was assigned to.
    pub index: u8,
    /// Why the value did not fall cleanly into a bin, if it didn't.
    pub diagnostic: Option<IndexError>,
}

impl BinLookup {
    const fn exact(index: u8) -> Self {
        Self {
            index,
            diagnostic: None,
        }
    }

    const fn adjusted(
        index: u8,
        error: IndexError,
    ) -> Self {
        Self {
            index,
            diagnostic: Some(error),
        }
    }

    /// True if the value fell inside a bin without any adjustment.
    #[inline]
    pub const fn is_exact(&self) -> bool { self.diagnostic.is_none() }
}

// =============================================================================
// Bin Table
// =============================================================================

/// Ordered, non-overlapping bins for one sensor.
#[derive(Clone, Copy, Debug)]
pub struct BinTable<const N: usize> {
    sensor: SensorChannel,
    bins: [Bin; N],
}

impl<const N: usize> BinTable<N> {
    /// Number of bins.
    pub const LEN: usize = N;

    pub const fn new(
        sensor: SensorChannel,
        bins: [Bin; N],
    ) -> Self {
        Self { sensor, bins }
    }

    /// Sensor this table classifies.
    #[inline]
    pub const fn sensor(&self) -> SensorChannel { self.sensor }

    #[inline]
    pub const fn bins(&self) -> &[Bin; N] { &self.bins }

    /// Lowest value covered by the table.
    #[inline]
    pub const fn min(&self) -> f32 { self.bins[0].low }

    /// Highest value covered by the table.
    #[inline]
    pub const fn max(&self) -> f32 { self.bins[N - 1].high }

    /// Check that bins are non-empty, ascending and non-overlapping.
    ///
    /// Gaps are allowed; they are what [`IndexError::NoBinMatch`] reports.
    pub const fn is_well_formed(&self) -> bool {
        if N == 0 || N > u8::MAX as usize {
            return false;
        }
        let mut i = 0;
        while i < N {
            let bin = self.bins[i];
            if bin.low >= bin.high {
                return false;
            }
            if i > 0 {
                let prev = self.bins[i - 1];
                if prev.high > bin.low {
                    return false;
                }
                // A shared edge must belong to exactly one side
                if prev.high == bin.low && prev.high_inclusive == bin.low_inclusive {
                    return false;
                }
            }
            i += 1;
        }
        true
    }

    /// Strict classification: the bin containing `value`, or why there is none.
    pub fn lookup(
        &self,
        value: f32,
    ) -> IndexResult<u8> {
        let sensor = self.sensor;
        if value.is_nan() {
            return Err(IndexError::NotANumber { sensor });
        }
        match self.bins.binary_search_by(|bin| bin.locate(value)) {
            Ok(index) => Ok(index as u8),
            Err(0) => Err(IndexError::BelowRange {
                sensor,
                value,
                min: self.min(),
            }),
            Err(pos) if pos == N => Err(IndexError::AboveRange {
                sensor,
                value,
                max: self.max(),
            }),
            Err(_) => Err(IndexError::NoBinMatch { sensor, value }),
        }
    }

    /// Classification that always yields a bin.
    ///
    /// - Below the table (or NaN): first bin.
    /// - Above the table: last bin.
    /// - In a gap: the nearer neighbouring bin, the lower one on a tie.
    ///
    /// The strict lookup error is kept as the diagnostic in each case.
    pub fn resolve(
        &self,
        value: f32,
    ) -> BinLookup {
        match self.lookup(value) {
            Ok(index) => BinLookup::exact(index),
            Err(error @ (IndexError::BelowRange { .. } | IndexError::NotANumber { .. })) => BinLookup::adjusted(0, error),
            Err(error @ IndexError::AboveRange { .. }) => BinLookup::adjusted((N - 1) as u8, error),
            Err(error) => BinLookup::adjusted(self.nearest(value), error),
        }
    }

    /// Index of the bin with the closest edge to `value`.
    fn nearest(
        &self,
        value: f32,
    ) -> u8 {
        let mut best = 0;
        let mut best_distance = f32::INFINITY;
        for (i, bin) in self.bins.iter().enumerate() {
            let distance = bin.distance(value);
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        best as u8
    }
}

// =============================================================================
// Sensor Tables
// =============================================================================

/// Number of engine speed bins (fuel map rows).
pub const RPM_BIN_COUNT: usize = 16;

/// Number of engine load bins (fuel map columns).
pub const LOAD_BIN_COUNT: usize = 16;

/// Number of coolant temperature bins.
pub const TEMP_BIN_COUNT: usize = 5;

/// Number of exhaust oxygen bins.
pub const OXY_BIN_COUNT: usize = 7;

/// Engine speed (RPM) bins over `[0, 8000]`.
pub const RPM_BINS: BinTable<RPM_BIN_COUNT> = BinTable::new(
    SensorChannel::Speed,
    [
        Bin::new(0.0, 350.0),
        Bin::new(350.0, 750.0),
        Bin::new(750.0, 1000.0),
        Bin::new(1000.0, 1500.0),
        Bin::new(1500.0, 2000.0),
        Bin::new(2000.0, 2500.0),
        Bin::new(2500.0, 3000.0),
        Bin::new(3000.0, 3500.0),
        Bin::new(3500.0, 4000.0),
        Bin::new(4000.0, 4500.0),
        Bin::new(4500.0, 5000.0),
        Bin::new(5000.0, 5500.0),
        Bin::new(5500.0, 6000.0),
        Bin::new(6000.0, 6750.0),
        Bin::new(6750.0, 7500.0),
        Bin::new(7500.0, 8000.0).closed(),
    ],
);

/// Manifold pressure (kPa) bins over `[20, 250]`, with no bin for `[100, 115)`.
pub const LOAD_BINS: BinTable<LOAD_BIN_COUNT> = BinTable::new(
    SensorChannel::Load,
    [
        Bin::new(20.0, 35.0),
        Bin::new(35.0, 50.0),
        Bin::new(50.0, 65.0),
        Bin::new(65.0, 70.0),
        Bin::new(70.0, 85.0),
        Bin::new(85.0, 100.0),
        Bin::new(115.0, 130.0),
        Bin::new(130.0, 145.0),
        Bin::new(145.0, 160.0),
        Bin::new(160.0, 175.0),
        Bin::new(175.0, 190.0),
        Bin::new(190.0, 205.0),
        Bin::new(205.0, 220.0),
        Bin::new(220.0, 230.0),
        Bin::new(230.0, 240.0),
        Bin::new(240.0, 250.0).closed(),
    ],
);

/// Coolant temperature (K) bins over `[273, 383]`.
pub const TEMP_BINS: BinTable<TEMP_BIN_COUNT> = BinTable::new(
    SensorChannel::Temperature,
    [
        Bin::new(273.0, 295.0),
        Bin::new(295.0, 317.0),
        Bin::new(317.0, 339.0),
        Bin::new(339.0, 361.0),
        Bin::new(361.0, 383.0).closed(),
    ],
);

/// Exhaust oxygen bins over `[0.2, 0.8]`; 0.45 belongs to bin 1.
pub const OXY_BINS: BinTable<OXY_BIN_COUNT> = BinTable::new(
    SensorChannel::Oxygen,
    [
        Bin::new(0.2, 0.35),
        Bin::new(0.35, 0.45).closed(),
        Bin::new(0.45, 0.55).open_low(),
        Bin::new(0.55, 0.65),
        Bin::new(0.65, 0.7),
        Bin::new(0.7, 0.75),
        Bin::new(0.75, 0.8).closed(),
    ],
);

const _: () = assert!(RPM_BINS.is_well_formed());
const _: () = assert!(LOAD_BINS.is_well_formed());
const _: () = assert!(TEMP_BINS.is_well_formed());
const _: () = assert!(OXY_BINS.is_well_formed());

/// Engine speed bin (fuel map row).
#[inline]
pub fn rpm_index(value: f32) -> IndexResult<u8> { RPM_BINS.lookup(value) }

/// Engine load bin (fuel map column).
#[inline]
pub fn load_index(value: f32) -> IndexResult<u8> { LOAD_BINS.lookup(value) }

/// Coolant temperature bin (temperature correction curve).
#[inline]
pub fn temp_index(value: f32) -> IndexResult<u8> { TEMP_BINS.lookup(value) }

/// Exhaust oxygen bin (oxygen correction curve).
#[inline]
pub fn oxy_index(value: f32) -> IndexResult<u8> { OXY_BINS.lookup(value) }

// =============================================================================
// Unit Tests
// =============================================================================
