//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a `DateTime<Utc>`.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the signed duration from `other` to this timestamp.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp offset by the given number of days.
    ///
    /// Negative values subtract days.
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Creates a new timestamp offset by an arbitrary duration.
    ///
    /// Used when extending a subscription expiry by a paused interval.
    pub fn add_duration(&self, duration: Duration) -> Self {
        Self(self.0 + duration)
    }

    /// Formats this timestamp for invoice numbers (`YYYYMMDDHHMMSS`, UTC).
    pub fn compact(&self) -> String {
        self.0.format("%Y%m%d%H%M%S").to_string()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed() -> Timestamp {
        let dt = DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Timestamp::from_datetime(dt)
    }

    #[test]
    fn add_days_moves_forward() {
        let ts = fixed();
        let later = ts.add_days(30);
        assert_eq!(later.duration_since(&ts), Duration::days(30));
        assert!(later.is_after(&ts));
    }

    #[test]
    fn add_days_accepts_negative_offsets() {
        let ts = fixed();
        let earlier = ts.add_days(-7);
        assert!(earlier.is_before(&ts));
    }

    #[test]
    fn add_duration_extends_by_exact_interval() {
        let ts = fixed();
        let paused = Duration::hours(36);
        assert_eq!(ts.add_duration(paused).duration_since(&ts), paused);
    }

    #[test]
    fn compact_format_is_sortable() {
        assert_eq!(fixed().compact(), "20240115103000");
    }

    #[test]
    fn ordering_follows_time() {
        let ts = fixed();
        assert!(ts < ts.add_days(1));
    }

    #[test]
    fn serializes_as_rfc3339_string() {
        let json = serde_json::to_string(&fixed()).unwrap();
        assert!(json.contains("2024-01-15"));
    }
}
