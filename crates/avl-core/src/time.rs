use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::{AvlError, AvlResult};

/// Source of the current instant. Swapped for a manual clock in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

const ZONED_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Epoch numbers above this magnitude are milliseconds, not seconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 2e10;

/// A client-supplied timestamp, as parsed at ingress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportedTimestamp {
    Zoned(DateTime<FixedOffset>),
    /// No offset on the wire. Always read as UTC, never as server local time.
    Naive(NaiveDateTime),
}

impl ReportedTimestamp {
    /// Accepts ISO-8601 date-times (seconds and offset optional, `Z` or
    /// `±HH[:MM]`), bare dates read as UTC midnight, and numeric epochs.
    pub fn parse(value: &str) -> AvlResult<Self> {
        let value = value.trim();
        if let Ok(epoch) = value.parse::<f64>() {
            return Self::from_epoch(epoch);
        }
        if let Ok(zoned) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self::Zoned(zoned));
        }

        let offset_value = match value.strip_suffix(['Z', 'z']) {
            Some(stripped) => format!("{stripped}+00:00"),
            None => value.to_string(),
        };
        let zoned = ZONED_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(&offset_value, format).ok());
        if let Some(zoned) = zoned {
            return Ok(Self::Zoned(zoned));
        }

        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .ok()
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
            .map(Self::Naive)
            .ok_or_else(|| AvlError::invalid_input(format!("invalid timestamp: {value:?}")))
    }

    /// Unix epoch in seconds, or milliseconds for very large magnitudes.
    pub fn from_epoch(value: f64) -> AvlResult<Self> {
        let invalid = || AvlError::invalid_input(format!("invalid epoch timestamp: {value}"));
        if !value.is_finite() {
            return Err(invalid());
        }
        let seconds = if value.abs() > EPOCH_MILLIS_THRESHOLD {
            value / 1_000.0
        } else {
            value
        };
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::from_timestamp(whole as i64, nanos)
            .map(|utc| Self::Zoned(utc.fixed_offset()))
            .ok_or_else(invalid)
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            Self::Zoned(zoned) => zoned.with_timezone(&Utc),
            Self::Naive(naive) => naive.and_utc(),
        }
    }
}

pub fn normalize_timestamp(
    reported: Option<&ReportedTimestamp>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    reported.map(ReportedTimestamp::to_utc).unwrap_or(now)
}

/// Signed seconds from `earlier` to `later`; negative when `earlier` lies in the future.
pub fn seconds_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    let delta = later.signed_duration_since(earlier);
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_seconds() as f64,
    }
}
