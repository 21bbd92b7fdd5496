//! Rule chains: ordered if / else-if / else statements defining one column.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::expression::RuleExpression;
use crate::literal::{Literal, ValueType};

/// Value written into the derived column by a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputValue {
    /// Copy the value of another column at the same row.
    Column { column: String },
    Literal(Literal),
}

impl OutputValue {
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column {
            column: name.into(),
        }
    }

    /// Lineage descriptor: the literal itself or the referenced column name.
    pub fn describe(&self) -> String {
        match self {
            Self::Column { column } => column.clone(),
            Self::Literal(literal) => literal.to_string(),
        }
    }
}

impl From<Literal> for OutputValue {
    fn from(value: Literal) -> Self {
        Self::Literal(value)
    }
}

macro_rules! literal_output {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for OutputValue {
                fn from(value: $ty) -> Self {
                    Self::Literal(Literal::from(value))
                }
            }
        )*
    };
}

literal_output!(&str, String, bool, i32, i64, f64);

/// One `if condition then output` step.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub condition: RuleExpression,
    pub output: OutputValue,
}

/// An ordered if / else-if / else definition producing one column.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleChain {
    /// Name of the derived column; the engine default applies when absent.
    pub output_column_name: Option<String>,
    /// Declared type of the derived column; inferred when absent.
    pub value_type: Option<ValueType>,
    /// Statements in evaluation order.
    pub statements: Vec<Statement>,
    /// Fallback for rows no statement assigned.
    pub else_value: OutputValue,
}

#[derive(Debug, Deserialize)]
struct RuleChainWire {
    #[serde(default, alias = "series_name")]
    output_column_name: Option<String>,
    #[serde(default, alias = "dtype")]
    value_type: Option<ValueType>,
    #[serde(default)]
    statements: Vec<(Value, OutputValue)>,
    #[serde(rename = "else")]
    else_value: OutputValue,
}

impl RuleChain {
    /// Start a chain that falls back to `else_value`.
    pub fn new(else_value: impl Into<OutputValue>) -> Self {
        Self {
            output_column_name: None,
            value_type: None,
            statements: Vec::new(),
            else_value: else_value.into(),
        }
    }

    /// Set the derived column name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.output_column_name = Some(name.into());
        self
    }

    /// Declare the derived column type.
    #[must_use]
    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    /// Append an `else if` statement.
    #[must_use]
    pub fn when(mut self, condition: RuleExpression, output: impl Into<OutputValue>) -> Self {
        self.statements.push(Statement {
            condition,
            output: output.into(),
        });
        self
    }

    /// Number of atomic lineage steps an execution produces, counting the
    /// implicit `is null` check of the else step.
    pub fn atomic_steps(&self) -> usize {
        self.statements
            .iter()
            .map(|statement| statement.condition.atomic_steps())
            .sum::<usize>()
            + 1
    }

    /// Number of logical reductions an execution records.
    pub fn logical_steps(&self) -> usize {
        self.statements
            .iter()
            .map(|statement| statement.condition.logical_steps())
            .sum()
    }

    /// Read a chain from its JSON wire shape.
    ///
    /// ```json
    /// {
    ///   "output_column_name": "segment",
    ///   "value_type": "text",
    ///   "statements": [[["greater than", "age", 30], "senior"]],
    ///   "else": "minor"
    /// }
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        let wire: RuleChainWire = serde_json::from_value(value)?;
        let statements = wire
            .statements
            .iter()
            .map(|(condition, output)| {
                Ok(Statement {
                    condition: RuleExpression::from_wire(condition)?,
                    output: output.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            output_column_name: wire.output_column_name,
            value_type: wire.value_type,
            statements,
            else_value: wire.else_value,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }
}
