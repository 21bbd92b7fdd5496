//! Error types for reading rule definitions.

use thiserror::Error;

use crate::operator::LogicalOperator;

/// Errors raised while reading rule expressions and rule chains.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Operator name is not one of the recognised operators.
    #[error("unknown operator: {name}")]
    UnknownOperator { name: String },

    /// A logical operator was given no operands.
    #[error("'{operator}' requires at least one operand")]
    EmptyOperandList { operator: LogicalOperator },

    /// Expression does not follow the `[operator, operand, criteria?]` shape.
    #[error("invalid rule expression: {message}")]
    InvalidExpression { message: String },

    /// Rule chain JSON could not be decoded.
    #[error("invalid rule chain JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl RuleError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidExpression {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;
