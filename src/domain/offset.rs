// X-offset parsing: a plain millisecond number or a duration string like "3 d"
use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;

/// Offset subtracted from every x value of a dataset at ingestion time, used
/// to line up datasets recorded in different epochs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Offset {
    Millis(f64),
    Duration(String),
}

impl Default for Offset {
    fn default() -> Self {
        Offset::Millis(0.0)
    }
}

impl From<f64> for Offset {
    fn from(ms: f64) -> Self {
        Offset::Millis(ms)
    }
}

impl From<&str> for Offset {
    fn from(s: &str) -> Self {
        Offset::Duration(s.to_string())
    }
}

impl Offset {
    /// Resolve the offset to milliseconds.
    pub fn as_millis(&self) -> Result<f64, ConfigurationError> {
        match self {
            Offset::Millis(ms) => Ok(*ms),
            Offset::Duration(text) => parse_duration_millis(text),
        }
    }
}

/// Parse "<scalar> <unit>" into milliseconds. Months count as 30 days and
/// years as 365 days.
pub fn parse_duration_millis(text: &str) -> Result<f64, ConfigurationError> {
    let invalid = || ConfigurationError::InvalidOffset(text.to_string());

    let mut parts = text.split_whitespace();
    let scalar: f64 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(invalid)?;

    let unit = match parts.next() {
        Some(unit) => unit,
        // a bare number inside a string is still milliseconds
        None => return Ok(scalar),
    };
    if parts.next().is_some() {
        return Err(invalid());
    }

    let unit_ms = unit_duration(unit).ok_or_else(invalid)?.num_milliseconds() as f64;
    Ok(scalar * unit_ms)
}

fn unit_duration(unit: &str) -> Option<Duration> {
    let duration = match unit {
        "ms" | "millisecond" | "milliseconds" => Duration::milliseconds(1),
        "s" | "second" | "seconds" => Duration::seconds(1),
        "m" | "minute" | "minutes" => Duration::minutes(1),
        "h" | "hour" | "hours" => Duration::hours(1),
        "d" | "day" | "days" => Duration::days(1),
        "w" | "week" | "weeks" => Duration::weeks(1),
        "M" | "month" | "months" => Duration::days(30),
        "y" | "year" | "years" => Duration::days(365),
        _ => return None,
    };
    Some(duration)
}
