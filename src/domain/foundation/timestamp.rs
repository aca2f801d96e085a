//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Months, TimeZone, Utc};
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

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// Returns `None` if the value is outside chrono's representable range.
    pub fn from_unix_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the timestamp as Unix milliseconds.
    pub fn as_unix_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Advances by whole calendar months.
    ///
    /// When the day of month does not exist in the target month the result is
    /// clamped to that month's last day (Jan 31 + 1 month = Feb 28/29).
    /// Returns `None` on overflow of the representable range.
    pub fn checked_add_months(&self, months: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(months)).map(Self)
    }

    /// Formats as RFC 3339 / ISO-8601.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::thread::sleep;
    use std::time::Duration;

    fn at(rfc3339: &str) -> Timestamp {
        Timestamp::from_datetime(
            DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn timestamp_ordering_works() {
        let ts1 = Timestamp::now();
        sleep(Duration::from_millis(10));
        let ts2 = Timestamp::now();

        assert!(ts1 < ts2);
        assert!(ts1.is_before(&ts2));
    }

    #[test]
    fn timestamp_serializes_to_json() {
        let ts = at("2024-01-15T10:30:00Z");

        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.contains("2024-01-15"));
    }

    #[test]
    fn timestamp_unix_millis_roundtrip() {
        let ts = Timestamp::from_unix_millis(1_705_276_800_250).unwrap();
        assert_eq!(ts.as_unix_millis(), 1_705_276_800_250);
        assert_eq!(ts.as_datetime().year(), 2024);
    }

    // ══════════════════════════════════════════════════════════════
    // Calendar Month Arithmetic
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn add_one_month_from_jan_31_clamps_to_feb_28() {
        let start = at("2025-01-31T09:15:00Z");

        let end = start.checked_add_months(1).unwrap();

        assert_eq!(end, at("2025-02-28T09:15:00Z"));
    }

    #[test]
    fn add_one_month_from_jan_31_in_leap_year_clamps_to_feb_29() {
        let start = at("2024-01-31T00:00:00Z");

        let end = start.checked_add_months(1).unwrap();

        assert_eq!(end.as_datetime().month(), 2);
        assert_eq!(end.as_datetime().day(), 29);
    }

    #[test]
    fn add_six_months_from_aug_31_clamps_to_feb_end() {
        let start = at("2025-08-31T12:00:00Z");

        assert_eq!(
            start.checked_add_months(6).unwrap(),
            at("2026-02-28T12:00:00Z")
        );
    }

    #[test]
    fn add_twelve_months_keeps_day_and_time() {
        let start = at("2025-03-15T23:59:59Z");

        let end = start.checked_add_months(12).unwrap();

        assert_eq!(end, at("2026-03-15T23:59:59Z"));
        assert_eq!(end.as_datetime().hour(), 23);
    }

    #[test]
    fn add_month_is_not_fixed_thirty_days() {
        let start = at("2025-01-01T00:00:00Z");

        let end = start.checked_add_months(1).unwrap();

        assert_eq!(end, at("2025-02-01T00:00:00Z"));
    }
}
