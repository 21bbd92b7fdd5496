//! Rule expressions: atomic predicates and logical combinations.
//!
//! The wire shape is a JSON array `[operator, operand, criteria?]`:
//!
//! ```json
//! ["and", [["equal", "region", "US"], ["greater than", "amount", 100]]]
//! ```
//!
//! For atomic predicates the operand is a column name or a nested expression
//! whose mask becomes the input. For `and`/`or` the operand is the list of
//! nested expressions.

use serde_json::Value;

use crate::error::{Result, RuleError};
use crate::literal::Literal;
use crate::operator::{LogicalOperator, Operator, Predicate};

/// Input of an atomic predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A column of the dataset, looked up by name.
    Column(String),
    /// A previously computed mask.
    Expression(Box<RuleExpression>),
}

/// A nested boolean condition.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleExpression {
    Atomic {
        predicate: Predicate,
        operand: Operand,
        criteria: Option<Literal>,
    },
    Logical {
        operator: LogicalOperator,
        operands: Vec<RuleExpression>,
    },
}

impl RuleExpression {
    fn compare(predicate: Predicate, column: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::Atomic {
            predicate,
            operand: Operand::Column(column.into()),
            criteria: Some(value.into()),
        }
    }

    pub fn equal(column: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(Predicate::Equal, column, value)
    }

    pub fn greater_than(column: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(Predicate::GreaterThan, column, value)
    }

    pub fn lesser_than(column: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(Predicate::LesserThan, column, value)
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Self::Atomic {
            predicate: Predicate::IsNull,
            operand: Operand::Column(column.into()),
            criteria: None,
        }
    }

    /// Negate the mask of another expression.
    pub fn not(inner: RuleExpression) -> Self {
        Self::Atomic {
            predicate: Predicate::Not,
            operand: Operand::Expression(Box::new(inner)),
            criteria: None,
        }
    }

    pub fn and(operands: Vec<RuleExpression>) -> Self {
        Self::Logical {
            operator: LogicalOperator::And,
            operands,
        }
    }

    pub fn or(operands: Vec<RuleExpression>) -> Self {
        Self::Logical {
            operator: LogicalOperator::Or,
            operands,
        }
    }

    /// Input descriptor used when this expression feeds another predicate,
    /// e.g. `equal(region, US)` or `and(equal(region, US), is null(amount))`.
    pub fn describe(&self) -> String {
        match self {
            Self::Atomic {
                predicate,
                operand,
                criteria,
            } => {
                let input = match operand {
                    Operand::Column(name) => name.clone(),
                    Operand::Expression(inner) => inner.describe(),
                };
                match criteria {
                    Some(value) => format!("{predicate}({input}, {value})"),
                    None => format!("{predicate}({input})"),
                }
            }
            Self::Logical { operator, operands } => {
                let parts: Vec<String> = operands.iter().map(Self::describe).collect();
                format!("{operator}({})", parts.join(", "))
            }
        }
    }

    /// Number of atomic predicate evaluations this expression performs.
    pub fn atomic_steps(&self) -> usize {
        match self {
            Self::Atomic { operand, .. } => match operand {
                Operand::Column(_) => 1,
                Operand::Expression(inner) => 1 + inner.atomic_steps(),
            },
            Self::Logical { operands, .. } => operands.iter().map(Self::atomic_steps).sum(),
        }
    }

    /// Number of logical reductions this expression performs.
    pub fn logical_steps(&self) -> usize {
        match self {
            Self::Atomic { operand, .. } => match operand {
                Operand::Column(_) => 0,
                Operand::Expression(inner) => inner.logical_steps(),
            },
            Self::Logical { operands, .. } => {
                1 + operands.iter().map(Self::logical_steps).sum::<usize>()
            }
        }
    }

    /// Parse a JSON string in the wire shape.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_wire(&value)
    }

    /// Read an expression from its wire shape.
    ///
    /// # Errors
    ///
    /// [`RuleError::UnknownOperator`] for unrecognised operator names at any
    /// depth, [`RuleError::EmptyOperandList`] for `and`/`or` without operands,
    /// [`RuleError::InvalidExpression`] for any other shape violation.
    pub fn from_wire(value: &Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(RuleError::invalid(format!(
                "expected [operator, operand, criteria?], got {value}"
            )));
        };
        let Some((head, rest)) = items.split_first() else {
            return Err(RuleError::invalid("empty expression"));
        };
        let Some(name) = head.as_str() else {
            return Err(RuleError::invalid(format!(
                "operator name must be a string, got {head}"
            )));
        };

        match name.parse::<Operator>()? {
            Operator::Logical(operator) => Self::logical_from_wire(operator, rest),
            Operator::Predicate(predicate) => Self::atomic_from_wire(predicate, rest),
        }
    }

    fn logical_from_wire(operator: LogicalOperator, rest: &[Value]) -> Result<Self> {
        let [Value::Array(operands)] = rest else {
            return Err(RuleError::invalid(format!(
                "'{operator}' takes a single list of expressions"
            )));
        };
        if operands.is_empty() {
            return Err(RuleError::EmptyOperandList { operator });
        }
        let operands = operands
            .iter()
            .map(Self::from_wire)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::Logical { operator, operands })
    }

    fn atomic_from_wire(predicate: Predicate, rest: &[Value]) -> Result<Self> {
        let (operand, criteria) = match rest {
            [operand] => (operand, None),
            [operand, criteria] => (operand, Some(criteria)),
            _ => {
                return Err(RuleError::invalid(format!(
                    "'{predicate}' takes an operand and at most one criterion"
                )));
            }
        };

        let operand = match operand {
            Value::String(column) => Operand::Column(column.clone()),
            Value::Array(_) => Operand::Expression(Box::new(Self::from_wire(operand)?)),
            other => {
                return Err(RuleError::invalid(format!(
                    "operand of '{predicate}' must be a column name or an expression, got {other}"
                )));
            }
        };

        let criteria = criteria
            .map(|value| serde_json::from_value::<Literal>(value.clone()))
            .transpose()?;

        match (predicate.takes_criteria(), criteria.is_some()) {
            (true, false) => Err(RuleError::invalid(format!(
                "'{predicate}' requires a criterion"
            ))),
            (false, true) => Err(RuleError::invalid(format!(
                "'{predicate}' does not take a criterion"
            ))),
            _ => Ok(Self::Atomic {
                predicate,
                operand,
                criteria,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_atomic_expression() {
        let expr = RuleExpression::from_wire(&json!(["greater than", "age", 30])).unwrap();
        assert_eq!(expr, RuleExpression::greater_than("age", 30));
    }

    #[test]
    fn reads_nested_logical_expression() {
        let expr = RuleExpression::from_json(
            r#"["and", [["equal", "region", "US"], ["not", ["is null", "amount"]]]]"#,
        )
        .unwrap();
        assert_eq!(
            expr,
            RuleExpression::and(vec![
                RuleExpression::equal("region", "US"),
                RuleExpression::not(RuleExpression::is_null("amount")),
            ])
        );
        assert_eq!(expr.atomic_steps(), 3);
        assert_eq!(expr.logical_steps(), 1);
    }

    #[test]
    fn unknown_operator_anywhere_is_reported() {
        let err = RuleExpression::from_wire(&json!(["or", [["xor", "a", 1]]])).unwrap_err();
        assert!(matches!(err, RuleError::UnknownOperator { ref name } if name == "xor"));
    }

    #[test]
    fn empty_logical_operands_are_rejected() {
        let err = RuleExpression::from_wire(&json!(["and", []])).unwrap_err();
        assert!(matches!(
            err,
            RuleError::EmptyOperandList {
                operator: LogicalOperator::And
            }
        ));
    }

    #[test]
    fn arity_is_checked() {
        assert!(RuleExpression::from_wire(&json!(["equal", "a"])).is_err());
        assert!(RuleExpression::from_wire(&json!(["is null", "a", 1])).is_err());
        assert!(RuleExpression::from_wire(&json!(["not", 5])).is_err());
        assert!(RuleExpression::from_wire(&json!("equal")).is_err());
    }

    #[test]
    fn null_criterion_is_kept() {
        let expr = RuleExpression::from_wire(&json!(["equal", "a", null])).unwrap();
        assert_eq!(expr, RuleExpression::equal("a", Literal::Null));
    }

    #[test]
    fn describe_nested_operand() {
        let expr = RuleExpression::not(RuleExpression::and(vec![
            RuleExpression::equal("region", "US"),
            RuleExpression::is_null("amount"),
        ]));
        assert_eq!(expr.describe(), "not(and(equal(region, US), is null(amount)))");
    }
}
