//! Domain model for case/when derived columns.
//!
//! Polars-free definitions shared by the engine, the ingest layer and the
//! CLI: literals, operators, rule expressions and chains (with their JSON
//! wire shapes), lineage records, dataset metadata and execution options.

pub mod chain;
pub mod error;
pub mod expression;
pub mod lineage;
pub mod literal;
pub mod metadata;
pub mod operator;
pub mod options;

pub use chain::{OutputValue, RuleChain, Statement};
pub use error::{Result, RuleError};
pub use expression::{Operand, RuleExpression};
pub use lineage::LineageRecord;
pub use literal::{Literal, ValueType, parse_timestamp};
pub use metadata::DatasetMeta;
pub use operator::{LogicalOperator, Operator, Predicate};
pub use options::{CaseOptions, DEFAULT_OUTPUT_NAME};
