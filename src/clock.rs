use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TimeError {
    #[error("unrecognised time '{0}'")]
    Unrecognised(String),
    #[error("invalid offset '{0}': {1}")]
    Offset(String, String),
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant.
#[allow(dead_code)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Observation time: the clock's current time when absent.
pub fn resolve_time(input: Option<&str>, clock: &dyn Clock) -> Result<DateTime<Utc>, TimeError> {
    match input {
        Some(s) => parse_time(s, clock),
        None => Ok(clock.now()),
    }
}

/// Accepts `now`, RFC 3339, naive date/times taken as UTC, and offsets
/// from now such as `T+10m` or `T-30s`.
pub fn parse_time(s: &str, clock: &dyn Clock) -> Result<DateTime<Utc>, TimeError> {
    let s = s.trim();

    if s.eq_ignore_ascii_case("now") {
        return Ok(clock.now());
    }

    // Relative: T+10s, T-5m
    if let Some(rest) = s.strip_prefix(['T', 't']) {
        let (neg, rest) = match rest.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, rest.strip_prefix('+').unwrap_or(rest)),
        };
        let dur = parse_duration(rest)?;
        return Ok(clock.now() + if neg { -dur } else { dur });
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimeError::Unrecognised(s.to_string()))
}

fn parse_duration(s: &str) -> Result<Duration, TimeError> {
    let err = |e: String| TimeError::Offset(s.to_string(), e);
    humantime::parse_duration(s.trim())
        .map_err(|e| err(e.to_string()))
        .and_then(|d| Duration::from_std(d).map_err(|e| err(e.to_string())))
}
