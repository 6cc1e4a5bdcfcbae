//! Time units accepted when sizing a window.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Time unit for a window interval.
///
/// Every unit can be named, but only millisecond granularity or coarser
/// can be converted into a window. `Nanoseconds` and `Microseconds` are
/// rejected when a limiter is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl IntervalUnit {
    /// Number of milliseconds in one unit, or `None` for sub-millisecond units.
    pub fn millis_per_unit(&self) -> Option<u64> {
        match self {
            IntervalUnit::Nanoseconds | IntervalUnit::Microseconds => None,
            IntervalUnit::Milliseconds => Some(1),
            IntervalUnit::Seconds => Some(1_000),
            IntervalUnit::Minutes => Some(60_000),
            IntervalUnit::Hours => Some(3_600_000),
            IntervalUnit::Days => Some(86_400_000),
        }
    }

    /// Whether this unit is finer than a millisecond.
    pub fn is_sub_millisecond(&self) -> bool {
        self.millis_per_unit().is_none()
    }

    /// Convert `value` of this unit to milliseconds.
    ///
    /// Saturates at `u64::MAX` on overflow. Returns `None` for sub-millisecond units.
    pub fn to_millis(&self, value: u64) -> Option<u64> {
        self.millis_per_unit().map(|per| value.saturating_mul(per))
    }

    /// Lowercase name, as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalUnit::Nanoseconds => "nanoseconds",
            IntervalUnit::Microseconds => "microseconds",
            IntervalUnit::Milliseconds => "milliseconds",
            IntervalUnit::Seconds => "seconds",
            IntervalUnit::Minutes => "minutes",
            IntervalUnit::Hours => "hours",
            IntervalUnit::Days => "days",
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_millis() {
        assert_eq!(IntervalUnit::Milliseconds.to_millis(200), Some(200));
        assert_eq!(IntervalUnit::Seconds.to_millis(1), Some(1_000));
        assert_eq!(IntervalUnit::Minutes.to_millis(2), Some(120_000));
        assert_eq!(IntervalUnit::Hours.to_millis(1), Some(3_600_000));
        assert_eq!(IntervalUnit::Days.to_millis(1), Some(86_400_000));
    }

    #[test]
    fn test_sub_millisecond_units_do_not_convert() {
        assert!(IntervalUnit::Nanoseconds.is_sub_millisecond());
        assert!(IntervalUnit::Microseconds.is_sub_millisecond());
        assert!(!IntervalUnit::Milliseconds.is_sub_millisecond());
        assert_eq!(IntervalUnit::Nanoseconds.to_millis(5), None);
        assert_eq!(IntervalUnit::Microseconds.to_millis(5), None);
    }

    #[test]
    fn test_to_millis_saturates() {
        assert_eq!(IntervalUnit::Days.to_millis(u64::MAX), Some(u64::MAX));
    }

    #[test]
    fn test_unit_deserializes_lowercase() {
        let unit: IntervalUnit = serde_yaml::from_str("seconds").unwrap();
        assert_eq!(unit, IntervalUnit::Seconds);
        assert!(serde_yaml::from_str::<IntervalUnit>("Fortnights").is_err());
        assert_eq!(IntervalUnit::Hours.to_string(), "hours");
    }
}
