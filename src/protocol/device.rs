//! Simulated irradiance sensor state.
//!
//! The reading climbs by one unit per elapsed second and wraps from
//! [`MAX_MEASUREMENT`] back to zero, giving a master a value that visibly
//! changes between polls.

use anyhow::{anyhow, Result};
use std::time::{Duration, Instant};

/// Highest irradiance value the device reports.
pub const MAX_MEASUREMENT: u16 = 2000;

/// Minimum wall-clock gap between two increments.
pub const ADVANCE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct DeviceState {
    measurement: u16,
    last_advance: Instant,
}

impl DeviceState {
    pub fn new(now: Instant) -> Self {
        Self {
            measurement: 0,
            last_advance: now,
        }
    }

    /// Start from an arbitrary reading instead of zero.
    pub fn with_value(value: u16, now: Instant) -> Result<Self> {
        if value > MAX_MEASUREMENT {
            return Err(anyhow!(
                "Initial measurement {value} is out of range (0..={MAX_MEASUREMENT})"
            ));
        }
        Ok(Self {
            measurement: value,
            last_advance: now,
        })
    }

    /// Step the reading once if at least [`ADVANCE_INTERVAL`] has passed.
    ///
    /// A long gap still yields a single step. Returns whether the reading
    /// changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        match now.checked_duration_since(self.last_advance) {
            Some(elapsed) if elapsed >= ADVANCE_INTERVAL => {
                self.measurement = (self.measurement + 1) % (MAX_MEASUREMENT + 1);
                self.last_advance = now;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> u16 {
        self.measurement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(state: &mut DeviceState, start: Instant, seconds: u64) -> bool {
        state.advance(start + Duration::from_secs(seconds))
    }

    #[test]
    fn test_starts_at_zero() {
        let state = DeviceState::new(Instant::now());
        assert_eq!(state.current(), 0);
    }

    #[test]
    fn test_no_advance_before_one_second() {
        let start = Instant::now();
        let mut state = DeviceState::new(start);
        assert!(!state.advance(start));
        assert!(!state.advance(start + Duration::from_millis(999)));
        assert_eq!(state.current(), 0);

        assert!(state.advance(start + Duration::from_millis(1000)));
        assert_eq!(state.current(), 1);
    }

    #[test]
    fn test_long_gap_advances_once() {
        let start = Instant::now();
        let mut state = DeviceState::new(start);
        assert!(tick(&mut state, start, 30));
        assert_eq!(state.current(), 1);
        // The clock restarts from the advance, not from the old timestamp.
        assert!(!state.advance(start + Duration::from_millis(30_500)));
        assert!(tick(&mut state, start, 31));
        assert_eq!(state.current(), 2);
    }

    #[test]
    fn test_wraps_after_full_cycle() {
        let start = Instant::now();
        let mut state = DeviceState::new(start);
        let initial = state.current();

        for second in 1..=2001 {
            assert!(tick(&mut state, start, second));
        }
        assert_eq!(state.current(), initial);

        assert!(tick(&mut state, start, 2002));
        assert_eq!(state.current(), initial + 1);
    }

    #[test]
    fn test_wraps_from_maximum() {
        let start = Instant::now();
        let mut state = DeviceState::with_value(MAX_MEASUREMENT, start).unwrap();
        assert!(tick(&mut state, start, 1));
        assert_eq!(state.current(), 0);
    }

    #[test]
    fn test_rejects_out_of_range_initial_value() {
        assert!(DeviceState::with_value(2001, Instant::now()).is_err());
        assert!(DeviceState::with_value(2000, Instant::now()).is_ok());
    }

    #[test]
    fn test_clock_going_backwards_is_ignored() {
        let start = Instant::now() + Duration::from_secs(10);
        let mut state = DeviceState::new(start);
        assert!(!state.advance(start - Duration::from_secs(5)));
        assert_eq!(state.current(), 0);
    }
}
