//! Operator enumerations.
//!
//! Operators are a closed set: adding one means extending these enums and
//! every `match` over them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// Atomic predicate evaluated against one column or one mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Predicate {
    #[serde(rename = "equal")]
    Equal,
    #[serde(rename = "greater than")]
    GreaterThan,
    #[serde(rename = "lesser than")]
    LesserThan,
    #[serde(rename = "is null")]
    IsNull,
    #[serde(rename = "not")]
    Not,
}

impl Predicate {
    /// Returns the wire name of the predicate.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::GreaterThan => "greater than",
            Self::LesserThan => "lesser than",
            Self::IsNull => "is null",
            Self::Not => "not",
        }
    }

    /// Whether the predicate compares against a criterion.
    pub fn takes_criteria(&self) -> bool {
        match self {
            Self::Equal | Self::GreaterThan | Self::LesserThan => true,
            Self::IsNull | Self::Not => false,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operator reducing several masks into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    /// Returns the wire name of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Any operator name that may head a rule expression.
///
/// Serializes as its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operator {
    Predicate(Predicate),
    Logical(LogicalOperator),
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Predicate(predicate) => predicate.as_str(),
            Self::Logical(operator) => operator.as_str(),
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, Self::Logical(_))
    }
}

impl From<Predicate> for Operator {
    fn from(predicate: Predicate) -> Self {
        Self::Predicate(predicate)
    }
}

impl From<LogicalOperator> for Operator {
    fn from(operator: LogicalOperator) -> Self {
        Self::Logical(operator)
    }
}

impl PartialEq<Predicate> for Operator {
    fn eq(&self, other: &Predicate) -> bool {
        *self == Self::Predicate(*other)
    }
}

impl PartialEq<LogicalOperator> for Operator {
    fn eq(&self, other: &LogicalOperator) -> bool {
        *self == Self::Logical(*other)
    }
}

impl FromStr for Operator {
    type Err = RuleError;

    /// Parse an operator name (case-insensitive, `_` accepted for spaces).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_lowercase()
            .replace('_', " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        match normalized.as_str() {
            "equal" => Ok(Self::Predicate(Predicate::Equal)),
            "greater than" => Ok(Self::Predicate(Predicate::GreaterThan)),
            "lesser than" => Ok(Self::Predicate(Predicate::LesserThan)),
            "is null" => Ok(Self::Predicate(Predicate::IsNull)),
            "not" => Ok(Self::Predicate(Predicate::Not)),
            "and" => Ok(Self::Logical(LogicalOperator::And)),
            "or" => Ok(Self::Logical(LogicalOperator::Or)),
            _ => Err(RuleError::UnknownOperator {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(predicate) => predicate.fmt(f),
            Self::Logical(operator) => operator.fmt(f),
        }
    }
}
