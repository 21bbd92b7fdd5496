//! Rule chain execution.
//!
//! Statements run in declaration order against the full table. A row takes
//! the output of the first statement whose condition is true for it; rows
//! left unset afterwards take the else value. The finished column and the
//! lineage batch are committed together once everything has succeeded.

use casewhen_model::{CaseOptions, Predicate, RuleChain};
use tracing::{debug, info, info_span, warn};

use crate::error::{CaseError, Result};
use crate::frame::Dataset;
use crate::output::OutputColumn;
use crate::predicate;
use crate::recorder::LineageBuffer;
use crate::resolver::resolve;

/// Summary of one chain execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    /// Name of the derived column.
    pub output_name: String,
    /// Rows written by each statement, in declaration order.
    pub statement_rows: Vec<usize>,
    /// Rows filled by the else value.
    pub else_rows: usize,
    /// Lineage records appended to the history.
    pub lineage_records: usize,
    /// Whether an existing column was replaced.
    pub replaced: bool,
}

impl CaseOutcome {
    /// Rows that received a value.
    pub fn assigned_rows(&self) -> usize {
        self.statement_rows.iter().sum::<usize>() + self.else_rows
    }
}

/// Execute `chain` against `dataset`, writing the derived column and
/// appending its lineage.
///
/// On error neither the table nor the lineage history is modified.
pub fn execute(
    dataset: &mut Dataset,
    chain: &RuleChain,
    options: &CaseOptions,
) -> Result<CaseOutcome> {
    let output_name = chain
        .output_column_name
        .clone()
        .unwrap_or_else(|| options.default_output_name.clone());
    let dataset_name = dataset.name().map(str::to_string);

    let span = info_span!(
        "case",
        output = %output_name,
        dataset = dataset_name.as_deref().unwrap_or("-"),
        statements = chain.statements.len()
    );
    let _guard = span.enter();

    let replaced = dataset.data.column(&output_name).is_ok();
    if replaced && !options.allow_overwrite {
        return Err(CaseError::OutputColumnExists {
            column: output_name,
        });
    }

    let data = &dataset.data;
    let height = data.height();
    let mut output = OutputColumn::new(output_name.as_str(), height, chain.value_type);
    let mut buffer = LineageBuffer::new();
    let mut statement_rows = Vec::with_capacity(chain.statements.len());

    for (index, statement) in chain.statements.iter().enumerate() {
        let mask = resolve(&statement.condition, data, &mut buffer)?;
        let written = output.assign(&mask, &statement.output, data)?;
        let steps = buffer.resolve_pending(&statement.output.describe());
        debug!(
            statement = index + 1,
            rows = written,
            steps,
            remaining = output.unset(),
            "statement applied"
        );
        statement_rows.push(written);
    }

    let in_progress = output.to_column()?;
    buffer.append_pending(Predicate::IsNull, output_name.as_str(), None);
    let unset = predicate::is_null(&in_progress);
    let else_rows = output.assign(&unset, &chain.else_value, data)?;
    buffer.resolve_pending(&chain.else_value.describe());
    debug!(rows = else_rows, "else applied");

    let records = buffer.finish(&output_name, dataset_name.as_deref())?;
    let column = output.into_column()?;

    if replaced {
        warn!(column = %output_name, "replacing existing column");
    }
    dataset.data.with_column(column)?;
    let lineage_records = records.len();
    dataset.lineage_mut().append(records);

    info!(
        rows = height,
        else_rows,
        lineage = lineage_records,
        "derived column written"
    );
    Ok(CaseOutcome {
        output_name,
        statement_rows,
        else_rows,
        lineage_records,
        replaced,
    })
}
