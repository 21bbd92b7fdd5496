//! Polars AnyValue utility functions.
//!
//! Conversions between Polars `AnyValue`s, rule [`Literal`]s and the
//! physical representation of temporal columns.

use casewhen_model::Literal;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Days from 0001-01-01 (CE) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null`, formats floats without trailing zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use casewhen_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::Float64(1.50)), "1.5");
/// assert_eq!(any_to_string(AnyValue::Boolean(true)), "true");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// ```
/// use casewhen_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.25), "1.25");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Converts an `AnyValue` to a rule [`Literal`].
///
/// Integers become [`Literal::Integer`] (unsigned values beyond `i64` become
/// numbers), floats [`Literal::Number`], dates and datetimes
/// [`Literal::Timestamp`]. Types without a literal counterpart are rendered
/// as text.
pub fn any_to_literal(value: AnyValue<'_>) -> Literal {
    match value {
        AnyValue::Null => Literal::Null,
        AnyValue::Boolean(v) => Literal::Boolean(v),
        AnyValue::Int8(v) => Literal::Integer(i64::from(v)),
        AnyValue::Int16(v) => Literal::Integer(i64::from(v)),
        AnyValue::Int32(v) => Literal::Integer(i64::from(v)),
        AnyValue::Int64(v) => Literal::Integer(v),
        AnyValue::UInt8(v) => Literal::Integer(i64::from(v)),
        AnyValue::UInt16(v) => Literal::Integer(i64::from(v)),
        AnyValue::UInt32(v) => Literal::Integer(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).map_or(Literal::Number(v as f64), Literal::Integer),
        AnyValue::Float32(v) => Literal::Number(f64::from(v)),
        AnyValue::Float64(v) => Literal::Number(v),
        AnyValue::String(s) => Literal::Text(s.to_string()),
        AnyValue::StringOwned(s) => Literal::Text(s.to_string()),
        AnyValue::Date(days) => date_from_days(days)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map_or(Literal::Null, Literal::from),
        AnyValue::Datetime(v, unit, _) => {
            timestamp_from_physical(v, unit).map_or(Literal::Null, Literal::from)
        }
        other => Literal::Text(other.to_string()),
    }
}

/// Physical `i64` value of a timestamp in a `Datetime` column of `unit`.
///
/// Returns `None` when the timestamp does not fit (nanoseconds beyond 2262).
pub fn timestamp_to_physical(timestamp: NaiveDateTime, unit: TimeUnit) -> Option<i64> {
    let utc = timestamp.and_utc();
    match unit {
        TimeUnit::Milliseconds => Some(utc.timestamp_millis()),
        TimeUnit::Microseconds => Some(utc.timestamp_micros()),
        TimeUnit::Nanoseconds => utc.timestamp_nanos_opt(),
    }
}

/// Inverse of [`timestamp_to_physical`].
pub fn timestamp_from_physical(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let utc = match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value)?,
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value)?,
        TimeUnit::Nanoseconds => DateTime::from_timestamp_nanos(value),
    };
    Some(utc.naive_utc())
}

/// Days since 1970-01-01, the physical value of a `Date` column.
pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Inverse of [`date_to_days`].
pub fn date_from_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}
