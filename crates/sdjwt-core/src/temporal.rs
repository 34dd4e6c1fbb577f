//! # Temporal Types
//!
//! UTC-only timestamp type. JWT time claims (`iat`, `exp`, `nbf`) are
//! NumericDate values: whole seconds since the Unix epoch, so [`Timestamp`]
//! serializes as an integer and drops sub-second precision.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A UTC timestamp with second-level precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current UTC time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncated to seconds.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        match Utc.timestamp_opt(dt.timestamp(), 0).single() {
            Some(truncated) => Self(truncated),
            None => Self(dt),
        }
    }

    /// Create a timestamp from seconds since the Unix epoch.
    pub fn from_unix(seconds: i64) -> Option<Self> {
        Utc.timestamp_opt(seconds, 0).single().map(Self)
    }

    /// Seconds since the Unix epoch.
    pub fn as_unix(&self) -> i64 {
        self.0.timestamp()
    }

    /// Access the underlying `chrono::DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_unix())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let seconds = i64::deserialize(deserializer)?;
        Self::from_unix(seconds)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {seconds}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_numeric_date() {
        let ts = Timestamp::from_unix(1_700_000_000).unwrap();
        assert_eq!(serde_json::to_string(&ts).unwrap(), "1700000000");
        let back: Timestamp = serde_json::from_str("1700000000").unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn truncates_subseconds() {
        let dt = Utc.timestamp_opt(1_700_000_000, 999_000_000).unwrap();
        let ts = Timestamp::from_datetime(dt);
        assert_eq!(ts.as_unix(), 1_700_000_000);
        assert_eq!(ts.as_datetime().timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn display_is_utc_with_z() {
        let ts = Timestamp::from_unix(0).unwrap();
        assert_eq!(ts.to_string(), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn rejects_non_integer() {
        assert!(serde_json::from_str::<Timestamp>("\"2020-01-01\"").is_err());
    }
}
