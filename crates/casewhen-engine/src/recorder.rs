//! Lineage recording.
//!
//! A [`LineageBuffer`] collects the entries of one chain execution. Entries
//! are appended `Pending` before their predicate runs, become `Resolved` once
//! the owning statement's output is known, and are finished into
//! [`LineageRecord`]s carrying the output column and dataset names. The
//! finished batch is appended to the dataset's [`LineageHistory`].

use casewhen_model::{Literal, LineageRecord, LogicalOperator, Operator};
use tracing::trace;

use crate::error::{CaseError, Result};

#[derive(Debug, Clone, PartialEq)]
enum EntryState {
    Pending,
    Resolved { output: String },
}

/// One evaluation step of an execution in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferedEntry {
    pub function: Operator,
    pub logical: Option<LogicalOperator>,
    pub group_id: Option<u32>,
    pub input: String,
    pub criteria: Option<String>,
    state: EntryState,
}

impl BufferedEntry {
    pub fn is_pending(&self) -> bool {
        self.state == EntryState::Pending
    }

    /// Output of the owning statement, once resolved.
    pub fn output(&self) -> Option<&str> {
        match &self.state {
            EntryState::Pending => None,
            EntryState::Resolved { output } => Some(output),
        }
    }
}

/// Entries of a single chain execution.
#[derive(Debug, Default)]
pub struct LineageBuffer {
    entries: Vec<BufferedEntry>,
    last_group: u32,
}

impl LineageBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[BufferedEntry] {
        &self.entries
    }

    /// Number of entries still waiting for an output.
    pub fn pending(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_pending()).count()
    }

    /// Record a step about to run. Returns the entry's position.
    pub fn append_pending(
        &mut self,
        function: impl Into<Operator>,
        input: impl Into<String>,
        criteria: Option<&Literal>,
    ) -> usize {
        self.entries.push(BufferedEntry {
            function: function.into(),
            logical: None,
            group_id: None,
            input: input.into(),
            criteria: criteria.map(Literal::to_string),
            state: EntryState::Pending,
        });
        self.entries.len() - 1
    }

    /// Tag the entries at `members` as the direct operands of one `operator`
    /// reduction. Returns the new group id.
    ///
    /// # Errors
    ///
    /// [`CaseError::LineageIndex`] if a position is out of range or already
    /// belongs to a group.
    pub fn tag_group(&mut self, members: &[usize], operator: LogicalOperator) -> Result<u32> {
        if let Some(&index) = members.iter().find(|&&index| {
            self.entries
                .get(index)
                .is_none_or(|entry| entry.group_id.is_some())
        }) {
            return Err(CaseError::LineageIndex { index });
        }
        self.last_group += 1;
        let group_id = self.last_group;
        for &index in members {
            let entry = &mut self.entries[index];
            entry.logical = Some(operator);
            entry.group_id = Some(group_id);
        }
        trace!(group_id, %operator, tagged = members.len(), "grouped lineage entries");
        Ok(group_id)
    }

    /// Resolve every pending entry with `output`. Returns how many changed.
    pub fn resolve_pending(&mut self, output: &str) -> usize {
        let mut resolved = 0;
        for entry in &mut self.entries {
            if entry.is_pending() {
                entry.state = EntryState::Resolved {
                    output: output.to_string(),
                };
                resolved += 1;
            }
        }
        resolved
    }

    /// Finish every entry into a [`LineageRecord`].
    ///
    /// # Errors
    ///
    /// [`CaseError::UnresolvedLineage`] if any entry is still pending.
    pub fn finish(self, output_name: &str, dataset: Option<&str>) -> Result<Vec<LineageRecord>> {
        let count = self.pending();
        if count > 0 {
            return Err(CaseError::UnresolvedLineage { count });
        }
        Ok(self
            .entries
            .into_iter()
            .map(|entry| {
                let output = match entry.state {
                    EntryState::Resolved { output } => output,
                    EntryState::Pending => String::new(),
                };
                LineageRecord {
                    dataset: dataset.map(str::to_string),
                    function: entry.function,
                    logical: entry.logical,
                    group_id: entry.group_id,
                    input: entry.input,
                    criteria: entry.criteria,
                    output,
                    output_name: output_name.to_string(),
                }
            })
            .collect())
    }
}

/// Records of one `and`/`or` reduction within one execution.
#[derive(Debug, Clone, PartialEq)]
pub struct LineageGroup<'a> {
    pub output_name: &'a str,
    pub group_id: u32,
    pub logical: Option<LogicalOperator>,
    pub records: Vec<&'a LineageRecord>,
}

/// Append-only audit trail of a dataset.
///
/// Records are kept in evaluation order; each executed chain contributes one
/// contiguous batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineageHistory {
    records: Vec<LineageRecord>,
    batch_starts: Vec<usize>,
}

impl LineageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the records of one execution.
    pub fn append(&mut self, batch: Vec<LineageRecord>) {
        if batch.is_empty() {
            return;
        }
        self.batch_starts.push(self.records.len());
        self.records.extend(batch);
    }

    pub fn records(&self) -> &[LineageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineageRecord> {
        self.records.iter()
    }

    /// Record batches, one per executed chain, oldest first.
    pub fn batches(&self) -> impl Iterator<Item = &[LineageRecord]> + '_ {
        self.batch_starts.iter().enumerate().map(|(i, &start)| {
            let end = self
                .batch_starts
                .get(i + 1)
                .copied()
                .unwrap_or(self.records.len());
            &self.records[start..end]
        })
    }

    /// Records that explain the column `output_name`.
    pub fn for_output<'a>(
        &'a self,
        output_name: &'a str,
    ) -> impl Iterator<Item = &'a LineageRecord> + 'a {
        self.records
            .iter()
            .filter(move |record| record.output_name == output_name)
    }

    /// Grouped records per execution, ordered by group id within a batch.
    pub fn groups(&self) -> Vec<LineageGroup<'_>> {
        let mut groups = Vec::new();
        for batch in self.batches() {
            let mut batch_groups: Vec<LineageGroup<'_>> = Vec::new();
            for record in batch {
                let Some(group_id) = record.group_id else {
                    continue;
                };
                match batch_groups.iter_mut().find(|g| g.group_id == group_id) {
                    Some(group) => group.records.push(record),
                    None => batch_groups.push(LineageGroup {
                        output_name: &record.output_name,
                        group_id,
                        logical: record.logical,
                        records: vec![record],
                    }),
                }
            }
            batch_groups.sort_by_key(|group| group.group_id);
            groups.extend(batch_groups);
        }
        groups
    }
}

impl<'a> IntoIterator for &'a LineageHistory {
    type Item = &'a LineageRecord;
    type IntoIter = std::slice::Iter<'a, LineageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
