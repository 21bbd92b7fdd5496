//! Reduction of ordered mask lists with three-valued logic.
//!
//! `false AND null` is false and `true OR null` is true; every other
//! combination involving null stays null.

use casewhen_model::LogicalOperator;
use polars::prelude::*;

use crate::error::{CaseError, Result};

fn kleene(operator: LogicalOperator, lhs: Option<bool>, rhs: Option<bool>) -> Option<bool> {
    match operator {
        LogicalOperator::And => match (lhs, rhs) {
            (Some(false), _) | (_, Some(false)) => Some(false),
            (Some(true), Some(true)) => Some(true),
            _ => None,
        },
        LogicalOperator::Or => match (lhs, rhs) {
            (Some(true), _) | (_, Some(true)) => Some(true),
            (Some(false), Some(false)) => Some(false),
            _ => None,
        },
    }
}

/// Reduce `masks` left to right with `operator`.
///
/// # Errors
///
/// [`CaseError::EmptyOperandList`] for an empty list and
/// [`CaseError::MaskLengthMismatch`] when the masks differ in length.
pub fn combine(operator: LogicalOperator, masks: &[BooleanChunked]) -> Result<BooleanChunked> {
    let Some((first, rest)) = masks.split_first() else {
        return Err(CaseError::EmptyOperandList { operator });
    };
    let expected = first.len();
    if let Some(mask) = rest.iter().find(|mask| mask.len() != expected) {
        return Err(CaseError::MaskLengthMismatch {
            expected,
            actual: mask.len(),
        });
    }

    let mut acc: Vec<Option<bool>> = first.iter().collect();
    for mask in rest {
        for (slot, value) in acc.iter_mut().zip(mask.iter()) {
            *slot = kleene(operator, *slot, value);
        }
    }
    let combined: BooleanChunked = acc.into_iter().collect();
    Ok(combined.with_name(operator.as_str().into()))
}

pub fn and_all(masks: &[BooleanChunked]) -> Result<BooleanChunked> {
    combine(LogicalOperator::And, masks)
}

pub fn or_all(masks: &[BooleanChunked]) -> Result<BooleanChunked> {
    combine(LogicalOperator::Or, masks)
}
