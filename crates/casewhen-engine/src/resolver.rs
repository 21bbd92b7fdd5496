//! Recursive resolution of rule expressions into row masks.

use casewhen_model::{Operand, RuleExpression};
use polars::prelude::*;
use tracing::trace;

use crate::combinator;
use crate::error::{CaseError, Result};
use crate::predicate;
use crate::recorder::LineageBuffer;

/// Resolve `expr` against `data`, appending its lineage entries to `buffer`.
///
/// Operands resolve before their consumers. Every atomic step appends one
/// entry before its predicate runs. A logical reduction tags the entries of
/// its direct operands with a new group id once the combined mask is known,
/// then appends its own entry, which in turn is the operand entry of any
/// enclosing reduction.
pub fn resolve(
    expr: &RuleExpression,
    data: &DataFrame,
    buffer: &mut LineageBuffer,
) -> Result<BooleanChunked> {
    resolve_step(expr, data, buffer).map(|(mask, _)| mask)
}

/// Resolve `expr` and return its mask with the position of its own entry.
fn resolve_step(
    expr: &RuleExpression,
    data: &DataFrame,
    buffer: &mut LineageBuffer,
) -> Result<(BooleanChunked, usize)> {
    let (mask, entry) = match expr {
        RuleExpression::Atomic {
            predicate,
            operand,
            criteria,
        } => {
            let (input, descriptor) = match operand {
                Operand::Column(name) => (lookup(data, name)?.clone(), name.clone()),
                Operand::Expression(inner) => {
                    let (mask, _) = resolve_step(inner, data, buffer)?;
                    (Column::from(mask.into_series()), inner.describe())
                }
            };
            let entry = buffer.append_pending(*predicate, descriptor, criteria.as_ref());
            (predicate::evaluate(*predicate, &input, criteria.as_ref())?, entry)
        }
        RuleExpression::Logical { operator, operands } => {
            let mut masks = Vec::with_capacity(operands.len());
            let mut members = Vec::with_capacity(operands.len());
            for operand in operands {
                let (mask, entry) = resolve_step(operand, data, buffer)?;
                masks.push(mask);
                members.push(entry);
            }
            let combined = combinator::combine(*operator, &masks)?;
            let group_id = buffer.tag_group(&members, *operator)?;
            let entry = buffer.append_pending(*operator, format!("#{group_id}"), None);
            (combined, entry)
        }
    };

    if mask.len() != data.height() {
        return Err(CaseError::MaskLengthMismatch {
            expected: data.height(),
            actual: mask.len(),
        });
    }
    trace!(
        expression = %expr.describe(),
        selected = mask.iter().filter(|v| *v == Some(true)).count(),
        "resolved"
    );
    Ok((mask, entry))
}

pub(crate) fn lookup<'a>(data: &'a DataFrame, name: &str) -> Result<&'a Column> {
    data.column(name).map_err(|_| CaseError::ColumnNotFound {
        column: name.to_string(),
    })
}
