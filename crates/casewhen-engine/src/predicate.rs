//! Atomic predicate evaluation.
//!
//! Every predicate maps one input column (and an optional criterion) to a
//! [`BooleanChunked`] mask with the same length and order as the input.
//! Comparisons propagate nulls; `is null` never yields null.

use casewhen_common::{date_to_days, timestamp_to_physical};
use casewhen_model::{Literal, Predicate};
use polars::prelude::*;

use crate::error::{CaseError, Result};

#[derive(Debug, Clone, Copy)]
enum Comparison {
    Equal,
    Greater,
    Lesser,
}

impl Comparison {
    fn test<T: PartialOrd>(self, lhs: T, rhs: T) -> bool {
        match self {
            Self::Equal => lhs == rhs,
            Self::Greater => lhs > rhs,
            Self::Lesser => lhs < rhs,
        }
    }
}

/// Evaluate `predicate` against `input`.
///
/// # Errors
///
/// [`CaseError::MissingCriteria`] when a comparison has no criterion,
/// [`CaseError::UnexpectedCriteria`] when `is null` or `not` get one, and
/// [`CaseError::TypeMismatch`] when the column and criterion types are
/// incompatible.
pub fn evaluate(
    predicate: Predicate,
    input: &Column,
    criteria: Option<&Literal>,
) -> Result<BooleanChunked> {
    match predicate {
        Predicate::Equal | Predicate::GreaterThan | Predicate::LesserThan => {
            let criteria = criteria.ok_or(CaseError::MissingCriteria { predicate })?;
            let comparison = match predicate {
                Predicate::GreaterThan => Comparison::Greater,
                Predicate::LesserThan => Comparison::Lesser,
                _ => Comparison::Equal,
            };
            compare(input, comparison, criteria)
        }
        Predicate::IsNull | Predicate::Not if criteria.is_some() => {
            Err(CaseError::UnexpectedCriteria { predicate })
        }
        Predicate::IsNull => Ok(is_null(input)),
        Predicate::Not => not(input),
    }
}

pub fn equal(input: &Column, value: &Literal) -> Result<BooleanChunked> {
    compare(input, Comparison::Equal, value)
}

pub fn greater_than(input: &Column, value: &Literal) -> Result<BooleanChunked> {
    compare(input, Comparison::Greater, value)
}

pub fn lesser_than(input: &Column, value: &Literal) -> Result<BooleanChunked> {
    compare(input, Comparison::Lesser, value)
}

/// True where the input value is null.
pub fn is_null(input: &Column) -> BooleanChunked {
    input.is_null().with_name(input.name().clone())
}

/// Elementwise negation of a boolean column. Null stays null.
pub fn not(input: &Column) -> Result<BooleanChunked> {
    match input.dtype() {
        DataType::Null => Ok(BooleanChunked::full_null(input.name().clone(), input.len())),
        DataType::Boolean => {
            let mask: BooleanChunked = input.bool()?.iter().map(|v| v.map(|b| !b)).collect();
            Ok(mask.with_name(input.name().clone()))
        }
        other => Err(CaseError::TypeMismatch {
            column: input.name().to_string(),
            expected: "boolean".to_string(),
            actual: other.to_string(),
        }),
    }
}

fn mismatch(input: &Column, expected: &str, criteria: &Literal) -> CaseError {
    CaseError::TypeMismatch {
        column: input.name().to_string(),
        expected: expected.to_string(),
        actual: criteria.type_name().to_string(),
    }
}

fn compare_f64(input: &Column, comparison: Comparison, rhs: f64) -> Result<BooleanChunked> {
    let values = input.cast(&DataType::Float64)?;
    Ok(values
        .f64()?
        .iter()
        .map(|v| v.map(|lhs| comparison.test(lhs, rhs)))
        .collect())
}

fn compare(input: &Column, comparison: Comparison, criteria: &Literal) -> Result<BooleanChunked> {
    let name = input.name().clone();
    if criteria.is_null() || matches!(input.dtype(), DataType::Null) {
        return Ok(BooleanChunked::full_null(name, input.len()));
    }

    let dtype = input.dtype();
    let mask: BooleanChunked = if dtype.is_integer() {
        match criteria {
            Literal::Integer(rhs) => {
                let values = input.cast(&DataType::Int64)?;
                values
                    .i64()?
                    .iter()
                    .map(|v| v.map(|lhs| comparison.test(lhs, *rhs)))
                    .collect()
            }
            Literal::Number(rhs) => compare_f64(input, comparison, *rhs)?,
            other => return Err(mismatch(input, "number", other)),
        }
    } else if dtype.is_float() {
        match criteria.as_f64() {
            Some(rhs) => compare_f64(input, comparison, rhs)?,
            None => return Err(mismatch(input, "number", criteria)),
        }
    } else {
        match (dtype, criteria) {
            (DataType::String, Literal::Text(rhs)) => input
                .str()?
                .iter()
                .map(|v| v.map(|lhs| comparison.test(lhs, rhs.as_str())))
                .collect(),
            (DataType::String, other) => return Err(mismatch(input, "text", other)),
            (DataType::Boolean, Literal::Boolean(rhs)) => input
                .bool()?
                .iter()
                .map(|v| v.map(|lhs| comparison.test(lhs, *rhs)))
                .collect(),
            (DataType::Boolean, other) => return Err(mismatch(input, "boolean", other)),
            (DataType::Datetime(unit, _), _) => {
                let rhs = criteria
                    .as_timestamp()
                    .and_then(|ts| timestamp_to_physical(ts, *unit))
                    .ok_or_else(|| mismatch(input, "timestamp", criteria))?;
                let values = input.cast(&DataType::Int64)?;
                values
                    .i64()?
                    .iter()
                    .map(|v| v.map(|lhs| comparison.test(lhs, rhs)))
                    .collect()
            }
            (DataType::Date, _) => {
                let rhs = criteria
                    .as_timestamp()
                    .filter(|ts| ts.date().and_hms_opt(0, 0, 0) == Some(*ts))
                    .map(|ts| date_to_days(ts.date()))
                    .ok_or_else(|| mismatch(input, "date", criteria))?;
                let values = input.cast(&DataType::Int32)?;
                values
                    .i32()?
                    .iter()
                    .map(|v| v.map(|lhs| comparison.test(lhs, rhs)))
                    .collect()
            }
            (other, _) => {
                return Err(CaseError::TypeMismatch {
                    column: name.to_string(),
                    expected: criteria.type_name().to_string(),
                    actual: other.to_string(),
                });
            }
        }
    };
    Ok(mask.with_name(name))
}
