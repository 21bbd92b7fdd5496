//! The derived column under construction.

use casewhen_common::{any_to_literal, timestamp_to_physical};
use casewhen_model::{Literal, OutputValue, ValueType};
use polars::prelude::*;

use crate::error::{CaseError, Result};
use crate::resolver::lookup;

/// Per-row output values of one chain execution; `None` means still unset.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputColumn {
    name: String,
    declared: Option<ValueType>,
    values: Vec<Option<Literal>>,
}

impl OutputColumn {
    pub fn new(name: impl Into<String>, height: usize, declared: Option<ValueType>) -> Self {
        Self {
            name: name.into(),
            declared,
            values: vec![None; height],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn height(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[Option<Literal>] {
        &self.values
    }

    /// Rows not yet assigned.
    pub fn unset(&self) -> usize {
        self.values.iter().filter(|value| value.is_none()).count()
    }

    /// Declared type, or the type inferred from the assigned values.
    pub fn value_type(&self) -> Option<ValueType> {
        self.declared.or_else(|| infer_value_type(&self.values))
    }

    /// Write `value` into every row where `mask` is true and the row is
    /// still unset. Returns the number of rows written.
    ///
    /// A column reference copies the source value of the same row; a null
    /// source value leaves the row unset.
    pub fn assign(
        &mut self,
        mask: &BooleanChunked,
        value: &OutputValue,
        data: &DataFrame,
    ) -> Result<usize> {
        if mask.len() != self.values.len() {
            return Err(CaseError::MaskLengthMismatch {
                expected: self.values.len(),
                actual: mask.len(),
            });
        }

        let mut written = 0;
        match value {
            OutputValue::Literal(literal) => {
                if literal.is_null() {
                    return Err(CaseError::NullOutputValue);
                }
                self.check_type(literal)?;
                for (slot, selected) in self.values.iter_mut().zip(mask.iter()) {
                    if selected == Some(true) && slot.is_none() {
                        *slot = Some(literal.clone());
                        written += 1;
                    }
                }
            }
            OutputValue::Column { column } => {
                let source = lookup(data, column)?;
                if source.len() != self.values.len() {
                    return Err(CaseError::MaskLengthMismatch {
                        expected: self.values.len(),
                        actual: source.len(),
                    });
                }
                let mut staged = Vec::new();
                for (row, selected) in mask.iter().enumerate() {
                    if selected != Some(true) || self.values[row].is_some() {
                        continue;
                    }
                    let literal = any_to_literal(source.get(row)?);
                    if literal.is_null() {
                        continue;
                    }
                    self.check_type(&literal)?;
                    staged.push((row, literal));
                }
                written = staged.len();
                for (row, literal) in staged {
                    self.values[row] = Some(literal);
                }
            }
        }
        Ok(written)
    }

    fn check_type(&self, literal: &Literal) -> Result<()> {
        match self.declared {
            Some(declared) if !declared.accepts(literal) => Err(CaseError::TypeMismatch {
                column: self.name.clone(),
                expected: declared.to_string(),
                actual: literal.type_name().to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Materialise the current state as a Polars column.
    ///
    /// Without a declared or inferable type the column has the `Null` dtype.
    pub fn to_column(&self) -> Result<Column> {
        let name: PlSmallStr = self.name.as_str().into();
        let values = &self.values;
        let series = match self.value_type() {
            None => return Ok(Column::full_null(name, values.len(), &DataType::Null)),
            Some(ValueType::Text) => {
                let text: Vec<Option<String>> = values
                    .iter()
                    .map(|v| v.as_ref().map(Literal::to_string))
                    .collect();
                Series::new(name, text)
            }
            Some(ValueType::Integer) => {
                let ints: Vec<Option<i64>> = values
                    .iter()
                    .map(|v| match v {
                        Some(Literal::Integer(i)) => Some(*i),
                        _ => None,
                    })
                    .collect();
                Series::new(name, ints)
            }
            Some(ValueType::Number) => {
                let floats: Vec<Option<f64>> = values
                    .iter()
                    .map(|v| v.as_ref().and_then(Literal::as_f64))
                    .collect();
                Series::new(name, floats)
            }
            Some(ValueType::Boolean) => {
                let flags: Vec<Option<bool>> = values
                    .iter()
                    .map(|v| match v {
                        Some(Literal::Boolean(b)) => Some(*b),
                        _ => None,
                    })
                    .collect();
                Series::new(name, flags)
            }
            Some(ValueType::Timestamp) => {
                let micros: Vec<Option<i64>> = values
                    .iter()
                    .map(|v| {
                        v.as_ref()
                            .and_then(Literal::as_timestamp)
                            .and_then(|ts| timestamp_to_physical(ts, TimeUnit::Microseconds))
                    })
                    .collect();
                Series::new(name, micros)
                    .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?
            }
        };
        Ok(series.into())
    }

    pub fn into_column(self) -> Result<Column> {
        self.to_column()
    }
}

/// Type shared by all assigned values: integers widen to numbers when
/// mixed with them, any other mix falls back to text.
fn infer_value_type(values: &[Option<Literal>]) -> Option<ValueType> {
    let mut found: Option<ValueType> = None;
    for value_type in values.iter().flatten().filter_map(Literal::value_type) {
        found = Some(match (found, value_type) {
            (None, next) => next,
            (Some(current), next) if current == next => current,
            (
                Some(ValueType::Integer | ValueType::Number),
                ValueType::Integer | ValueType::Number,
            ) => ValueType::Number,
            _ => return Some(ValueType::Text),
        });
    }
    found
}
