//! Time elapsed since a journey's last IVMS check.
//!
//! Check dates arrive as whatever text the dashboard stored. Anything that
//! cannot be read as a timestamp degrades to [`Staleness::Unknown`] instead
//! of failing the evaluation.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};

/// Naive layouts accepted after RFC 3339, tried in order. Interpreted as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Whole minutes since the last check, or unknown when there is no usable date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Staleness {
    /// Minutes elapsed. Negative when the check date lies in the future.
    Minutes(i64),
    /// No check date, or one that could not be parsed.
    Unknown,
}

impl Staleness {
    /// Returns true if the elapsed time is known and strictly above `limit`.
    #[must_use]
    pub const fn exceeds(&self, limit: i64) -> bool {
        match self {
            Self::Minutes(m) => *m > limit,
            Self::Unknown => false,
        }
    }

    /// Returns true if the elapsed time is known and strictly between the bounds.
    #[must_use]
    pub const fn within_due_window(&self, low: i64, high: i64) -> bool {
        match self {
            Self::Minutes(m) => low < *m && *m < high,
            Self::Unknown => false,
        }
    }

    /// Returns true if the elapsed time is unknown.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns the minutes, if known.
    #[must_use]
    pub const fn minutes(&self) -> Option<i64> {
        match self {
            Self::Minutes(m) => Some(*m),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for Staleness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minutes(m) => write!(f, "{m} min"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Parses a stored check date.
///
/// Returns `None` for empty or unrecognised text.
#[must_use]
pub fn parse_check_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Computes the staleness of a check date relative to `now`.
///
/// Minutes are floored, so 59.9 minutes reads as 59 and a check 30 seconds
/// in the future reads as -1.
#[must_use]
pub fn minutes_since_last_check(check_date: Option<&str>, now: DateTime<Utc>) -> Staleness {
    match check_date.and_then(parse_check_date) {
        Some(checked_at) => {
            let elapsed_ms = now.signed_duration_since(checked_at).num_milliseconds();
            Staleness::Minutes(elapsed_ms.div_euclid(60_000))
        }
        None => Staleness::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use test_case::test_case;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    mod parse_tests {
        use super::*;
        use test_case::test_case;

        #[test_case("2024-05-01T09:00:00Z" ; "rfc3339 utc")]
        #[test_case("2024-05-01T13:00:00+04:00" ; "rfc3339 offset")]
        #[test_case("2024-05-01T09:00:00.000Z" ; "rfc3339 millis")]
        #[test_case("2024-05-01 09:00:00" ; "mysql datetime")]
        #[test_case("2024-05-01T09:00" ; "datetime local")]
        #[test_case("2024-05-01T09:00:00" ; "datetime local seconds")]
        #[test_case("2024-05-01 09:00" ; "space minutes")]
        #[test_case("  2024-05-01 09:00:00  " ; "padded")]
        fn parses_known_layouts(raw: &str) {
            let parsed = parse_check_date(raw);
            assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()));
        }

        #[test_case("" ; "empty")]
        #[test_case("   " ; "blank")]
        #[test_case("yesterday" ; "words")]
        #[test_case("2024-13-01 09:00:00" ; "bad month")]
        #[test_case("01/05/2024" ; "slashes")]
        fn rejects_garbage(raw: &str) {
            assert_eq!(parse_check_date(raw), None);
        }
    }

    mod minutes_tests {
        use super::*;

        #[test]
        fn absent_date_is_unknown() {
            assert_eq!(minutes_since_last_check(None, now()), Staleness::Unknown);
        }

        #[test]
        fn unparsable_date_is_unknown() {
            assert_eq!(
                minutes_since_last_check(Some("not a date"), now()),
                Staleness::Unknown
            );
        }

        #[test]
        fn three_hours_ago() {
            let staleness = minutes_since_last_check(Some("2024-05-01 09:00:00"), now());
            assert_eq!(staleness, Staleness::Minutes(180));
        }

        #[test]
        fn partial_minutes_floor() {
            let checked = now() - Duration::seconds(59 * 60 + 59);
            let staleness = minutes_since_last_check(Some(&checked.to_rfc3339()), now());
            assert_eq!(staleness, Staleness::Minutes(59));
        }

        #[test]
        fn future_date_is_negative_not_unknown() {
            let staleness = minutes_since_last_check(Some("2024-05-01T13:00:00Z"), now());
            assert_eq!(staleness, Staleness::Minutes(-60));
            assert!(!staleness.exceeds(120));
            assert!(!staleness.within_due_window(60, 120));
        }

        #[test]
        fn just_in_future_floors_to_minus_one() {
            let checked = now() + Duration::seconds(30);
            let staleness = minutes_since_last_check(Some(&checked.to_rfc3339()), now());
            assert_eq!(staleness, Staleness::Minutes(-1));
        }
    }

    mod predicate_tests {
        use super::*;
        use test_case::test_case;

        #[test_case(Staleness::Minutes(121), true ; "above")]
        #[test_case(Staleness::Minutes(120), false ; "at limit")]
        #[test_case(Staleness::Unknown, false ; "unknown")]
        fn exceeds_limit(staleness: Staleness, expected: bool) {
            assert_eq!(staleness.exceeds(120), expected);
        }

        #[test_case(Staleness::Minutes(60), false ; "at low bound")]
        #[test_case(Staleness::Minutes(61), true ; "just inside")]
        #[test_case(Staleness::Minutes(119), true ; "upper inside")]
        #[test_case(Staleness::Minutes(120), false ; "at high bound")]
        #[test_case(Staleness::Unknown, false ; "unknown")]
        fn within_due_window_is_strict(staleness: Staleness, expected: bool) {
            assert_eq!(staleness.within_due_window(60, 120), expected);
        }

        #[test]
        fn minutes_only_when_known() {
            assert_eq!(Staleness::Minutes(-5).minutes(), Some(-5));
            assert_eq!(Staleness::Unknown.minutes(), None);
        }

        #[test]
        fn display() {
            assert_eq!(Staleness::Minutes(42).to_string(), "42 min");
            assert_eq!(Staleness::Unknown.to_string(), "unknown");
        }
    }
}
