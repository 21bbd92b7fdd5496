//! Scalar values used as rule criteria and as derived outputs.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a text timestamp (`YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS[.fff]` or the
/// `T`-separated form).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// A scalar appearing in a rule.
///
/// On the wire a literal is plain JSON: `null`, booleans, integers, floats
/// and strings map directly; timestamps are written `{"timestamp": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    Timestamp { timestamp: NaiveDateTime },
}

impl Literal {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Timestamp { .. } => "timestamp",
        }
    }

    /// The value type this literal naturally belongs to (`None` for null).
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::Null => None,
            Self::Boolean(_) => Some(ValueType::Boolean),
            Self::Integer(_) => Some(ValueType::Integer),
            Self::Number(_) => Some(ValueType::Number),
            Self::Text(_) => Some(ValueType::Text),
            Self::Timestamp { .. } => Some(ValueType::Timestamp),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Timestamp view of the literal. Text is parsed with [`parse_timestamp`].
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Timestamp { timestamp } => Some(*timestamp),
            Self::Text(text) => parse_timestamp(text),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
            Self::Timestamp { timestamp } => write!(f, "{}", timestamp.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<NaiveDateTime> for Literal {
    fn from(timestamp: NaiveDateTime) -> Self {
        Self::Timestamp { timestamp }
    }
}

/// Declared type of a derived column.
///
/// Accepts the pandas-style dtype names as aliases (`string`, `float64`,
/// `Int64`, `datetime`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[serde(alias = "string", alias = "str")]
    Text,
    #[serde(alias = "float", alias = "float64", alias = "Float64")]
    Number,
    #[serde(alias = "int", alias = "int64", alias = "Int64")]
    Integer,
    #[serde(alias = "bool")]
    Boolean,
    #[serde(alias = "datetime", alias = "datetime64[ns]")]
    Timestamp,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
        }
    }

    /// Whether a non-null literal can be stored in a column of this type.
    pub fn accepts(&self, literal: &Literal) -> bool {
        match self {
            Self::Text => !literal.is_null(),
            Self::Number => matches!(literal, Literal::Integer(_) | Literal::Number(_)),
            Self::Integer => matches!(literal, Literal::Integer(_)),
            Self::Boolean => matches!(literal, Literal::Boolean(_)),
            Self::Timestamp => literal.as_timestamp().is_some(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_plain_json() {
        let values: Vec<Literal> =
            serde_json::from_str(r#"[null, true, 3, 2.5, "US", {"timestamp": "2017-03-01T10:00:00"}]"#)
                .unwrap();
        assert_eq!(values[0], Literal::Null);
        assert_eq!(values[1], Literal::Boolean(true));
        assert_eq!(values[2], Literal::Integer(3));
        assert_eq!(values[3], Literal::Number(2.5));
        assert_eq!(values[4], Literal::Text("US".to_string()));
        assert_eq!(values[5].type_name(), "timestamp");
    }

    #[test]
    fn display_is_plain() {
        assert_eq!(Literal::Number(30.0).to_string(), "30");
        assert_eq!(Literal::Number(2.5).to_string(), "2.5");
        assert_eq!(Literal::from("senior").to_string(), "senior");
        let ts = parse_timestamp("2017-03-01").unwrap();
        assert_eq!(Literal::from(ts).to_string(), "2017-03-01 00:00:00");
    }

    #[test]
    fn parses_timestamp_formats() {
        assert!(parse_timestamp("2017-03-01 10:15:00").is_some());
        assert!(parse_timestamp("2017-03-01T10:15:00.250").is_some());
        assert!(parse_timestamp("01.03.2017").is_none());
        assert!(parse_timestamp("  ").is_none());
    }

    #[test]
    fn value_type_acceptance() {
        assert!(ValueType::Number.accepts(&Literal::Integer(1)));
        assert!(!ValueType::Integer.accepts(&Literal::Number(1.5)));
        assert!(ValueType::Text.accepts(&Literal::Integer(1)));
        assert!(!ValueType::Text.accepts(&Literal::Null));
        assert!(ValueType::Timestamp.accepts(&Literal::from("2017-01-01")));
        assert!(!ValueType::Boolean.accepts(&Literal::from("yes")));
    }

    #[test]
    fn value_type_aliases() {
        let parsed: Vec<ValueType> =
            serde_json::from_str(r#"["string", "Int64", "float64", "bool", "datetime"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                ValueType::Text,
                ValueType::Integer,
                ValueType::Number,
                ValueType::Boolean,
                ValueType::Timestamp
            ]
        );
    }
}
