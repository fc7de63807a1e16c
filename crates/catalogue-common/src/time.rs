//! Epoch-millisecond timestamps
//!
//! Registration, modification and logging dates travel as strings holding
//! milliseconds since the Unix epoch.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{CommonError, Result};

/// Current time as an epoch-millisecond string
pub fn now_millis() -> String {
    to_millis(Utc::now())
}

pub fn to_millis(at: DateTime<Utc>) -> String {
    at.timestamp_millis().to_string()
}

/// Parse an epoch-millisecond string
pub fn parse_millis(value: &str) -> Result<DateTime<Utc>> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .ok_or_else(|| CommonError::InvalidTimestamp(value.to_string()))
}

/// Milliseconds of `value`, or 0 when it cannot be parsed
pub fn millis_or_zero(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let millis = to_millis(at);
        assert_eq!(millis, "1709294400000");
        assert_eq!(parse_millis(&millis).unwrap(), at);
    }

    #[test]
    fn test_invalid_values() {
        assert!(parse_millis("yesterday").is_err());
        assert_eq!(millis_or_zero("n/a"), 0);
        assert_eq!(millis_or_zero(" 42 "), 42);
    }
}
