//! Error types for rule evaluation.

use casewhen_model::{LogicalOperator, Predicate, RuleError};
use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while evaluating rule expressions and rule chains.
///
/// Any error aborts the execution before the table or the lineage history
/// is modified.
#[derive(Debug, Error)]
pub enum CaseError {
    /// The rule definition could not be read.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// A logical reduction was given no masks.
    #[error("'{operator}' requires at least one mask")]
    EmptyOperandList { operator: LogicalOperator },

    #[error("column not found: {column}")]
    ColumnNotFound { column: String },

    /// Column or output type incompatible with the value it is used with.
    #[error("type mismatch on '{column}': expected {expected}, found {actual}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    #[error("'{predicate}' requires a criterion")]
    MissingCriteria { predicate: Predicate },

    #[error("'{predicate}' does not take a criterion")]
    UnexpectedCriteria { predicate: Predicate },

    #[error("mask has {actual} rows, table has {expected}")]
    MaskLengthMismatch { expected: usize, actual: usize },

    #[error("output value must not be null")]
    NullOutputValue,

    #[error("output column '{column}' already exists")]
    OutputColumnExists { column: String },

    /// Lineage entries were left without an output.
    #[error("{count} lineage entries still pending")]
    UnresolvedLineage { count: usize },

    /// A reduction named a lineage entry that is missing or already grouped.
    #[error("lineage entry {index} cannot join a group")]
    LineageIndex { index: usize },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, CaseError>;
