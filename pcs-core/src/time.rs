//! Simulation time management

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

/// Simulation time with nanosecond precision
///
/// SimTime represents a point in virtual time, stored as nanoseconds since
/// the start of the run. It is monotonically non-decreasing over the course
/// of a simulation and has nothing to do with wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimTime(u64);

impl SimTime {
    /// The start of the run (time zero)
    pub const fn zero() -> Self {
        SimTime(0)
    }

    /// Create a SimTime from nanoseconds
    pub const fn from_nanos(nanos: u64) -> Self {
        SimTime(nanos)
    }

    /// Create a SimTime from milliseconds
    pub const fn from_millis(millis: u64) -> Self {
        SimTime(millis * 1_000_000)
    }

    /// Create a SimTime from seconds
    pub const fn from_secs(secs: u64) -> Self {
        SimTime(secs * 1_000_000_000)
    }

    /// Create a SimTime from a Duration
    pub fn from_duration(duration: Duration) -> Self {
        SimTime(duration.as_nanos() as u64)
    }

    /// Convert to a Duration
    pub fn as_duration(&self) -> Duration {
        Duration::from_nanos(self.0)
    }

    /// Raw nanosecond value
    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Fractional seconds since the start of the run
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000_000.0
    }

    /// Elapsed time since an earlier instant (saturating at zero)
    pub fn duration_since(&self, earlier: SimTime) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }
}

impl Add<SimTime> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: SimTime) -> Self::Output {
        SimTime(self.0.saturating_add(rhs.0))
    }
}

impl Add<Duration> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: Duration) -> Self::Output {
        SimTime(self.0.saturating_add(rhs.as_nanos() as u64))
    }
}

impl Sub<Duration> for SimTime {
    type Output = SimTime;

    fn sub(self, rhs: Duration) -> Self::Output {
        SimTime(self.0.saturating_sub(rhs.as_nanos() as u64))
    }
}

impl Sub<SimTime> for SimTime {
    type Output = Duration;

    fn sub(self, rhs: SimTime) -> Self::Output {
        self.duration_since(rhs)
    }
}

impl Default for SimTime {
    fn default() -> Self {
        SimTime::zero()
    }
}

impl From<f64> for SimTime {
    /// Convert from seconds (as f64) to SimTime
    ///
    /// # Panics
    ///
    /// Panics if the input is negative, infinite, or NaN. A negative delay
    /// is a programmer error and is treated as fatal.
    fn from(secs: f64) -> Self {
        if !secs.is_finite() {
            panic!("SimTime cannot be created from non-finite value: {secs}");
        }
        if secs < 0.0 {
            panic!("SimTime cannot be negative: {secs}");
        }

        const MAX_SECS: f64 = (u64::MAX as f64) / 1_000_000_000.0;
        if secs > MAX_SECS {
            panic!("SimTime value too large: {secs} seconds (max: {MAX_SECS} seconds)");
        }

        SimTime::from_nanos((secs * 1_000_000_000.0) as u64)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let duration = self.as_duration();
        let secs = duration.as_secs();
        let millis = duration.subsec_millis();
        let micros = duration.subsec_micros() % 1000;
        let nanos = duration.subsec_nanos() % 1000;

        if secs > 0 {
            write!(f, "{secs}.{millis:03}s")
        } else if millis > 0 {
            write!(f, "{millis}.{micros:03}ms")
        } else if micros > 0 {
            write!(f, "{micros}.{nanos:03}µs")
        } else {
            write!(f, "{nanos}ns")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simtime_creation() {
        assert_eq!(SimTime::zero().as_nanos(), 0);
        assert_eq!(SimTime::from_nanos(1000).as_nanos(), 1000);
        assert_eq!(SimTime::from_millis(1).as_nanos(), 1_000_000);
        assert_eq!(SimTime::from_secs(1).as_nanos(), 1_000_000_000);
    }

    #[test]
    fn test_simtime_arithmetic() {
        let t1 = SimTime::from_millis(100);
        let t2 = SimTime::from_millis(50);
        let duration = Duration::from_millis(25);

        assert_eq!(t1 + duration, SimTime::from_millis(125));
        assert_eq!(t1 - duration, SimTime::from_millis(75));
        assert_eq!(t1 - t2, Duration::from_millis(50));
        // Subtraction saturates: an earlier instant minus a later one is zero.
        assert_eq!(t2 - t1, Duration::ZERO);
    }

    #[test]
    fn test_simtime_ordering() {
        let t1 = SimTime::from_millis(100);
        let t2 = SimTime::from_millis(200);

        assert!(t1 < t2);
        assert!(t2 > t1);
        assert_eq!(t1, t1);
    }

    #[test]
    fn test_simtime_from_f64() {
        assert_eq!(SimTime::from(1.0).as_nanos(), 1_000_000_000);
        assert_eq!(SimTime::from(0.5).as_nanos(), 500_000_000);
        assert_eq!(SimTime::from(0.000001).as_nanos(), 1_000);
    }

    #[test]
    fn test_simtime_as_secs_f64() {
        assert_eq!(SimTime::from_secs(2).as_secs_f64(), 2.0);
        assert_eq!(SimTime::from_millis(1500).as_secs_f64(), 1.5);
    }

    #[test]
    #[should_panic(expected = "SimTime cannot be negative")]
    fn test_simtime_from_negative_f64() {
        let _ = SimTime::from(-1.0);
    }

    #[test]
    #[should_panic(expected = "SimTime cannot be created from non-finite value")]
    fn test_simtime_from_nan_f64() {
        let _ = SimTime::from(f64::NAN);
    }
}
