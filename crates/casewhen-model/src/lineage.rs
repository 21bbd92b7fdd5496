//! Lineage records: the audit trail of one derived column.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::operator::{LogicalOperator, Operator};

/// One finalized evaluation step.
///
/// Every atomic predicate and every `and`/`or` reduction evaluated while
/// resolving a rule chain produces one record. The records of one
/// reduction's direct operands share a `group_id`; the reduction's own record
/// names that group in its `input` (`#<id>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageRecord {
    /// Dataset name from the source table metadata.
    pub dataset: Option<String>,
    /// Predicate or logical operator that ran.
    pub function: Operator,
    /// Logical operator that consumed this step's mask, if any.
    pub logical: Option<LogicalOperator>,
    /// Group shared with the other operands of the same reduction.
    pub group_id: Option<u32>,
    /// Column name or nested expression descriptor that was tested, or
    /// `#<id>` of the group a reduction combined.
    pub input: String,
    /// Criterion display, when the predicate takes one.
    pub criteria: Option<String>,
    /// Value assigned by the owning statement (literal or column name).
    pub output: String,
    /// Name of the derived column.
    pub output_name: String,
}

impl fmt::Display for LineageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(dataset) = &self.dataset {
            write!(f, "[{dataset}] ")?;
        }
        match &self.criteria {
            Some(criteria) => write!(f, "{}({}, {criteria})", self.function, self.input)?,
            None => write!(f, "{}({})", self.function, self.input)?,
        }
        if let (Some(logical), Some(group)) = (self.logical, self.group_id) {
            write!(f, " {logical}#{group}")?;
        }
        write!(f, " -> {} = {}", self.output_name, self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Predicate;

    fn record() -> LineageRecord {
        LineageRecord {
            dataset: Some("sales".to_string()),
            function: Predicate::GreaterThan.into(),
            logical: Some(LogicalOperator::And),
            group_id: Some(1),
            input: "close_value".to_string(),
            criteria: Some("1000".to_string()),
            output: "big".to_string(),
            output_name: "deal_size".to_string(),
        }
    }

    #[test]
    fn display_explains_step() {
        assert_eq!(
            record().to_string(),
            "[sales] greater than(close_value, 1000) and#1 -> deal_size = big"
        );
    }

    #[test]
    fn serializes_operator_names() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["function"], "greater than");
        assert_eq!(json["logical"], "and");
        assert_eq!(json["group_id"], 1);
        let back: LineageRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record());
    }

    #[test]
    fn display_names_reduced_group() {
        let reduction = LineageRecord {
            function: LogicalOperator::And.into(),
            input: "#1".to_string(),
            criteria: None,
            logical: Some(LogicalOperator::Or),
            group_id: Some(3),
            ..record()
        };
        assert_eq!(
            reduction.to_string(),
            "[sales] and(#1) or#3 -> deal_size = big"
        );
    }
}
