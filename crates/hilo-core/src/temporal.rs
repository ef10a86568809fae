//! # Temporal Types
//!
//! JWT `NumericDate`: whole seconds since the Unix epoch, UTC.
//!
//! Token claims only ever carry second precision on the wire. Keeping the
//! in-memory type at the same precision means a decoded claim set compares
//! equal to the one that was signed. Other issuers may send fractional
//! seconds; those are truncated toward zero on decode.

use chrono::{DateTime, Duration, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A UTC instant with whole-second precision, serialized as a JSON integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NumericDate(i64);

impl<'de> Deserialize<'de> for NumericDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Whole(i64),
            Fractional(f64),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Whole(seconds) => Ok(Self(seconds)),
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
            Wire::Fractional(seconds)
                if seconds.is_finite()
                    && seconds >= i64::MIN as f64
                    && seconds < i64::MAX as f64 =>
            {
                Ok(Self(seconds.trunc() as i64))
            }
            Wire::Fractional(seconds) => Err(D::Error::custom(format!(
                "NumericDate {seconds} is out of range"
            ))),
        }
    }
}

impl NumericDate {
    /// The current instant, truncated to whole seconds.
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    /// Create from seconds since the Unix epoch.
    pub fn from_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Create from a `chrono::DateTime<Utc>`, dropping subsecond precision.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }

    /// Seconds since the Unix epoch.
    pub fn seconds(&self) -> i64 {
        self.0
    }

    /// This instant shifted by `duration` (which may be negative).
    ///
    /// Subsecond parts of `duration` are dropped. Saturates at the bounds
    /// of `i64` instead of overflowing.
    pub fn offset(&self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.num_seconds()))
    }

    /// Convert to a `chrono::DateTime<Utc>`. `None` when out of chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }
}

impl std::fmt::Display for NumericDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%SZ")),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<DateTime<Utc>> for NumericDate {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn from_datetime_truncates_subseconds() {
        let dt = Utc.timestamp_opt(1_700_000_000, 999_000_000).unwrap();
        assert_eq!(NumericDate::from_datetime(dt).seconds(), 1_700_000_000);
    }

    #[test]
    fn offset_accepts_negative_durations() {
        let base = NumericDate::from_seconds(1_000);
        assert_eq!(base.offset(Duration::seconds(-50)).seconds(), 950);
        assert_eq!(base.offset(Duration::seconds(500)).seconds(), 1_500);
    }

    #[test]
    fn offset_saturates() {
        let base = NumericDate::from_seconds(i64::MAX - 1);
        assert_eq!(base.offset(Duration::seconds(10)).seconds(), i64::MAX);
    }

    #[test]
    fn serializes_as_integer() {
        let json = serde_json::to_string(&NumericDate::from_seconds(42)).unwrap();
        assert_eq!(json, "42");
        let back: NumericDate = serde_json::from_str("42").unwrap();
        assert_eq!(back, NumericDate::from_seconds(42));
    }

    #[test]
    fn fractional_seconds_are_truncated() {
        let date: NumericDate = serde_json::from_str("1700000000.75").unwrap();
        assert_eq!(date, NumericDate::from_seconds(1_700_000_000));
        let date: NumericDate = serde_json::from_str("-1.5").unwrap();
        assert_eq!(date, NumericDate::from_seconds(-1));
        let date: NumericDate = serde_json::from_str("1.7e9").unwrap();
        assert_eq!(date, NumericDate::from_seconds(1_700_000_000));
    }

    #[test]
    fn out_of_range_and_non_numeric_dates_are_rejected() {
        for input in ["1e300", "18446744073709551615", "\"soon\"", "null"] {
            assert!(serde_json::from_str::<NumericDate>(input).is_err(), "{input}");
        }
    }

    #[test]
    fn display_is_iso8601() {
        let date = NumericDate::from_seconds(0);
        assert_eq!(date.to_string(), "1970-01-01T00:00:00Z");
    }
}
