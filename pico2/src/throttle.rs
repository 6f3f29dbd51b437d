//! Rate limiting for repeated log output.
//!
//! A sensor parked in a bin gap would otherwise produce a warning on every
//! 100 ms cycle. The throttle lets one burst through per interval and counts
//! what it held back, so the next message can report the suppressed total.

/// Time-based log throttle.
///
/// Times are plain milliseconds so the logic stays testable on the host;
/// the firmware passes `Instant::now().as_millis()`.
pub struct LogThrottle {
    interval_ms: u64,
    last_emit_ms: Option<u64>,
    suppressed: u32,
}

impl LogThrottle {
    /// Create a throttle that allows one burst per `interval_ms`.
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_emit_ms: None,
            suppressed: 0,
        }
    }

    /// Returns `Some(suppressed)` if a message may be emitted at `now_ms`,
    /// with the number of messages held back since the last one.
    pub fn allow(
        &mut self,
        now_ms: u64,
    ) -> Option<u32> {
        if let Some(last) = self.last_emit_ms
            && now_ms.saturating_sub(last) < self.interval_ms
        {
            self.suppressed = self.suppressed.saturating_add(1);
            return None;
        }

        self.last_emit_ms = Some(now_ms);
        Some(core::mem::take(&mut self.suppressed))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_passes() {
        let mut throttle = LogThrottle::new(1000);
        assert_eq!(throttle.allow(0), Some(0));
    }

    #[test]
    fn test_suppresses_within_interval() {
        let mut throttle = LogThrottle::new(1000);
        assert_eq!(throttle.allow(0), Some(0));
        assert_eq!(throttle.allow(100), None);
        assert_eq!(throttle.allow(999), None);
        // Reports what was held back
        assert_eq!(throttle.allow(1000), Some(2));
        assert_eq!(throttle.allow(1100), None);
        assert_eq!(throttle.allow(2500), Some(1));
    }

    #[test]
    fn test_clock_going_backwards() {
        let mut throttle = LogThrottle::new(1000);
        throttle.allow(5000);
        assert_eq!(throttle.allow(10), None);
    }
}
