//! Normalization of client-supplied dates into store-comparable ranges.
//!
//! Clients send ISO-style dates (`2024-01-05`) and datetime-local values
//! (`2024-01-05T10:30`). The store keeps timestamps as text in its own
//! canonical form (`2024/01/05 10:30:00`), and range queries compare that
//! text lexically. [`RangeNormalizer`] turns client input into a
//! [`DateRange`] of [`CanonicalTimestamp`] bounds, rejecting anything that is
//! not exactly the expected grammar before a query is ever built.
//!
//! # Example
//!
//! ```
//! use thermolog_types::{Bound, DayBoundary, RangeNormalizer};
//!
//! let normalizer = RangeNormalizer::new(DayBoundary::FullDay);
//! let range = normalizer.normalize_day(Some("2024-01-05"))?;
//!
//! assert_eq!(range.start, Bound::Inclusive("2024/01/05 00:00:00".parse()?));
//! assert_eq!(range.end, Bound::Exclusive("2024/01/06 00:00:00".parse()?));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::macros::time;
use time::{Date, Month, PrimitiveDateTime, Time};

use crate::error::{ValidationError, ValidationResult};

/// Request parameter carrying a single calendar date.
pub const DAY_FIELD: &str = "selectedDate";
/// Request parameter carrying the start of a period.
pub const PERIOD_START_FIELD: &str = "selectedStartDate";
/// Request parameter carrying the end of a period.
pub const PERIOD_END_FIELD: &str = "selectedEndDate";

const DAY_FORMAT: &str = "YYYY-MM-DD";
const PERIOD_FORMAT: &str = "YYYY-MM-DDTHH:MM";

// '9' stands for any ASCII digit, every other byte must match literally.
const DAY_SHAPE: &[u8] = b"9999-99-99";
const PERIOD_SHAPE: &[u8] = b"9999-99-99T99:99";
const CANONICAL_SHAPE: &[u8] = b"9999/99/99 99:99:99";

const LAST_SECOND: Time = time!(23:59:59);

/// A second-precision, store-local civil datetime.
///
/// Displays as the store's canonical text `YYYY/MM/DD HH:MM:SS`, which sorts
/// lexically in chronological order and can be parsed back with [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalTimestamp(PrimitiveDateTime);

impl CanonicalTimestamp {
    /// Wrap a datetime, dropping any sub-second component.
    #[must_use]
    pub fn new(datetime: PrimitiveDateTime) -> Self {
        Self(datetime.replace_nanosecond(0).unwrap_or(datetime))
    }

    /// Midnight at the start of `date`.
    #[must_use]
    pub fn start_of_day(date: Date) -> Self {
        Self(date.midnight())
    }

    /// The wrapped datetime.
    #[must_use]
    pub const fn datetime(&self) -> PrimitiveDateTime {
        self.0
    }

    /// Calendar date part.
    #[must_use]
    pub const fn date(&self) -> Date {
        self.0.date()
    }

    /// The same instant shifted back by one day, if representable.
    #[must_use]
    pub fn previous_day(&self) -> Option<Self> {
        self.0.checked_sub(time::Duration::DAY).map(Self)
    }
}

impl fmt::Display for CanonicalTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dt = self.0;
        write!(
            f,
            "{:04}/{:02}/{:02} {:02}:{:02}:{:02}",
            dt.year(),
            u8::from(dt.month()),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second()
        )
    }
}

/// Error returned when text is not a canonical store timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid canonical timestamp '{0}': expected YYYY/MM/DD HH:MM:SS")]
pub struct ParseTimestampError(String);

impl FromStr for CanonicalTimestamp {
    type Err = ParseTimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseTimestampError(s.to_string());
        if !matches_shape(s, CANONICAL_SHAPE) {
            return Err(invalid());
        }
        let date = civil_date(&s[0..4], &s[5..7], &s[8..10]).ok_or_else(invalid)?;
        let time = civil_time(&s[11..13], &s[14..16], &s[17..19]).ok_or_else(invalid)?;
        Ok(Self(PrimitiveDateTime::new(date, time)))
    }
}

/// One end of a range, either including or excluding its timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    /// The timestamp itself is part of the range.
    Inclusive(CanonicalTimestamp),
    /// The timestamp itself is not part of the range.
    Exclusive(CanonicalTimestamp),
}

impl Bound {
    /// The bounding timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> CanonicalTimestamp {
        match self {
            Bound::Inclusive(ts) | Bound::Exclusive(ts) => *ts,
        }
    }

    /// Whether the bounding timestamp belongs to the range.
    #[must_use]
    pub const fn is_inclusive(&self) -> bool {
        matches!(self, Bound::Inclusive(_))
    }
}

/// A lower and an upper bound over canonical timestamps.
///
/// Ranges are built per request and never persisted. An inverted range is
/// valid and simply contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    /// Lower bound.
    pub start: Bound,
    /// Upper bound.
    pub end: Bound,
}

impl DateRange {
    /// Whether `ts` falls inside the range.
    #[must_use]
    pub fn contains(&self, ts: &CanonicalTimestamp) -> bool {
        let after_start = match self.start {
            Bound::Inclusive(start) => *ts >= start,
            Bound::Exclusive(start) => *ts > start,
        };
        let before_end = match self.end {
            Bound::Inclusive(end) => *ts <= end,
            Bound::Exclusive(end) => *ts < end,
        };
        after_start && before_end
    }
}

/// How a single-day request maps onto range bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DayBoundary {
    /// `[D 00:00:00, D+1 00:00:00)`: every reading of the day.
    #[default]
    FullDay,
    /// `(D 00:00:00, D 23:59:59)`: the legacy dashboard's bounds, which
    /// drop readings taken at exactly midnight or in the last second.
    Reference,
}

impl DayBoundary {
    /// Name used in configuration files and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DayBoundary::FullDay => "full-day",
            DayBoundary::Reference => "reference",
        }
    }
}

impl fmt::Display for DayBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown day boundary name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown day boundary '{0}': expected 'full-day' or 'reference'")]
pub struct ParseDayBoundaryError(String);

impl FromStr for DayBoundary {
    type Err = ParseDayBoundaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full-day" | "fullday" => Ok(DayBoundary::FullDay),
            "reference" => Ok(DayBoundary::Reference),
            _ => Err(ParseDayBoundaryError(s.to_string())),
        }
    }
}

/// Converts client date input into validated [`DateRange`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeNormalizer {
    day_boundary: DayBoundary,
}

impl RangeNormalizer {
    /// Create a normalizer using the given single-day policy.
    #[must_use]
    pub const fn new(day_boundary: DayBoundary) -> Self {
        Self { day_boundary }
    }

    /// The single-day policy in effect.
    #[must_use]
    pub const fn day_boundary(&self) -> DayBoundary {
        self.day_boundary
    }

    /// Range covering the calendar day named by a `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the input is missing, empty, not exactly
    /// `YYYY-MM-DD`, or names a date that does not exist.
    pub fn normalize_day(&self, date: Option<&str>) -> ValidationResult<DateRange> {
        let date = parse_day(DAY_FIELD, date)?;
        let start = CanonicalTimestamp::start_of_day(date);

        let range = match self.day_boundary {
            DayBoundary::Reference => DateRange {
                start: Bound::Exclusive(start),
                end: Bound::Exclusive(CanonicalTimestamp(date.with_time(LAST_SECOND))),
            },
            DayBoundary::FullDay => DateRange {
                start: Bound::Inclusive(start),
                end: match date.next_day() {
                    Some(next) => Bound::Exclusive(CanonicalTimestamp::start_of_day(next)),
                    // 9999-12-31 has no successor; second precision makes this equivalent.
                    None => Bound::Inclusive(CanonicalTimestamp(date.with_time(LAST_SECOND))),
                },
            },
        };

        Ok(range)
    }

    /// Range between two `YYYY-MM-DDTHH:MM` datetimes, both bounds exclusive.
    ///
    /// Seconds are set to zero. The bounds are used as given: an end before
    /// the start produces a range that matches nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if either input is missing, empty, not
    /// exactly `YYYY-MM-DDTHH:MM`, or names a datetime that does not exist.
    pub fn normalize_period(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> ValidationResult<DateRange> {
        let start = parse_minute(PERIOD_START_FIELD, start)?;
        let end = parse_minute(PERIOD_END_FIELD, end)?;

        Ok(DateRange {
            start: Bound::Exclusive(start),
            end: Bound::Exclusive(end),
        })
    }
}

fn require<'a>(field: &'static str, input: Option<&'a str>) -> ValidationResult<&'a str> {
    match input {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ValidationError::Missing { field }),
    }
}

fn parse_day(field: &'static str, input: Option<&str>) -> ValidationResult<Date> {
    let input = require(field, input)?;
    let malformed = ValidationError::Malformed {
        field,
        expected: DAY_FORMAT,
    };

    if !matches_shape(input, DAY_SHAPE) {
        return Err(malformed);
    }
    civil_date(&input[0..4], &input[5..7], &input[8..10]).ok_or(malformed)
}

fn parse_minute(field: &'static str, input: Option<&str>) -> ValidationResult<CanonicalTimestamp> {
    let input = require(field, input)?;
    let malformed = ValidationError::Malformed {
        field,
        expected: PERIOD_FORMAT,
    };

    if !matches_shape(input, PERIOD_SHAPE) {
        return Err(malformed.clone());
    }
    let date = civil_date(&input[0..4], &input[5..7], &input[8..10]).ok_or(malformed.clone())?;
    let time = civil_time(&input[11..13], &input[14..16], "00").ok_or(malformed)?;

    Ok(CanonicalTimestamp(PrimitiveDateTime::new(date, time)))
}

/// Byte-wise check against a shape template. Guarantees ASCII, so the
/// fixed-offset slicing done by callers never splits a character.
fn matches_shape(input: &str, shape: &[u8]) -> bool {
    input.len() == shape.len()
        && input
            .bytes()
            .zip(shape.iter())
            .all(|(c, &s)| if s == b'9' { c.is_ascii_digit() } else { c == s })
}

fn civil_date(year: &str, month: &str, day: &str) -> Option<Date> {
    let year: i32 = year.parse().ok()?;
    let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
    let day: u8 = day.parse().ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

fn civil_time(hour: &str, minute: &str, second: &str) -> Option<Time> {
    Time::from_hms(hour.parse().ok()?, minute.parse().ok()?, second.parse().ok()?).ok()
}
