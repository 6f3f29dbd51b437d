//! Ring buffer of recent indexing diagnostics.
//!
//! The control loop records every non-exact bin resolution here, so a range
//! violation or a calibration gap stays inspectable after the cycle that
//! produced it, even on a build without a logger attached.
//!
//! # Usage
//!
//! ```ignore
//! let mut log = DiagnosticLog::new();
//! log.record(cycle, error);
//!
//! for entry in log.iter() {
//!     println!("#{} {}", entry.cycle, entry.error);
//! }
//! ```

use heapless::Deque;

use crate::errors::IndexError;

/// Maximum number of diagnostics kept.
pub const DIAGNOSTIC_LOG_SIZE: usize = 8;

/// One recorded diagnostic.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Diagnostic {
    /// Control loop iteration that produced it.
    pub cycle: u32,
    pub error: IndexError,
}

/// Ring buffer of the most recent diagnostics plus a running total.
pub struct DiagnosticLog {
    buffer: Deque<Diagnostic, DIAGNOSTIC_LOG_SIZE>,
    total: u32,
}

impl DiagnosticLog {
    pub const fn new() -> Self {
        Self {
            buffer: Deque::new(),
            total: 0,
        }
    }

    /// Record a diagnostic. If the buffer is full, the oldest entry is dropped.
    pub fn record(
        &mut self,
        cycle: u32,
        error: IndexError,
    ) {
        if self.buffer.is_full() {
            self.buffer.pop_front();
        }
        self.buffer.push_back(Diagnostic { cycle, error }).ok();
        self.total = self.total.saturating_add(1);
    }

    /// Iterate over kept diagnostics (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> { self.buffer.iter() }

    /// Most recent diagnostic.
    pub fn latest(&self) -> Option<&Diagnostic> { self.buffer.back() }

    /// Diagnostics recorded since creation, including dropped ones.
    #[inline]
    pub const fn total(&self) -> u32 { self.total }

    #[inline]
    pub fn len(&self) -> usize { self.buffer.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.total = 0;
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::SensorChannel;

    fn gap(value: f32) -> IndexError {
        IndexError::NoBinMatch {
            sensor: SensorChannel::Load,
            value,
        }
    }

    #[test]
    fn test_record() {
        let mut log = DiagnosticLog::new();
        assert!(log.is_empty());

        log.record(3, gap(101.0));
        assert_eq!(log.len(), 1);
        assert_eq!(log.total(), 1);
        assert_eq!(log.latest().map(|d| d.cycle), Some(3));
    }

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let mut log = DiagnosticLog::new();
        for cycle in 0..(DIAGNOSTIC_LOG_SIZE as u32 + 2) {
            log.record(cycle, gap(100.0 + cycle as f32));
        }

        assert_eq!(log.len(), DIAGNOSTIC_LOG_SIZE);
        assert_eq!(log.total(), DIAGNOSTIC_LOG_SIZE as u32 + 2);
        // Cycles 0 and 1 were dropped
        assert_eq!(log.iter().next().map(|d| d.cycle), Some(2));
    }

    #[test]
    fn test_clear() {
        let mut log = DiagnosticLog::new();
        log.record(0, gap(105.0));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.total(), 0);
    }
}
