//! Dataset type: a Polars table with provenance metadata and lineage.

use casewhen_model::{CaseOptions, DatasetMeta, RuleChain};
use polars::prelude::DataFrame;
use serde_json::Value;

use crate::chain::{self, CaseOutcome};
use crate::error::Result;
use crate::recorder::LineageHistory;

/// A table that derived columns are written into.
///
/// The lineage history only grows: every successful rule chain execution
/// appends one batch of records explaining the column it wrote.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// The dataset contents.
    pub data: DataFrame,
    /// Optional metadata about provenance; `name` labels lineage records.
    pub meta: Option<DatasetMeta>,
    lineage: LineageHistory,
}

impl Dataset {
    /// Create a dataset without metadata.
    pub fn new(data: DataFrame) -> Self {
        Self {
            data,
            meta: None,
            lineage: LineageHistory::default(),
        }
    }

    pub fn with_meta(data: DataFrame, meta: DatasetMeta) -> Self {
        Self {
            data,
            meta: Some(meta),
            lineage: LineageHistory::default(),
        }
    }

    /// Create a dataset whose metadata only carries a name.
    pub fn named(data: DataFrame, name: impl Into<String>) -> Self {
        Self::with_meta(data, DatasetMeta::named(name))
    }

    /// Dataset name used as lineage provenance.
    pub fn name(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|meta| meta.name.as_deref())
    }

    /// Returns the number of rows.
    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn lineage(&self) -> &LineageHistory {
        &self.lineage
    }

    pub(crate) fn lineage_mut(&mut self) -> &mut LineageHistory {
        &mut self.lineage
    }

    /// Apply `chain` with default options.
    pub fn apply_case(&mut self, chain: &RuleChain) -> Result<CaseOutcome> {
        self.apply_case_with(chain, &CaseOptions::default())
    }

    pub fn apply_case_with(
        &mut self,
        chain: &RuleChain,
        options: &CaseOptions,
    ) -> Result<CaseOutcome> {
        chain::execute(self, chain, options)
    }

    /// Read a chain from its JSON wire shape and apply it.
    pub fn apply_case_json(&mut self, chain: &Value) -> Result<CaseOutcome> {
        let chain = RuleChain::from_value(chain.clone())?;
        self.apply_case(&chain)
    }
}

impl From<DataFrame> for Dataset {
    fn from(data: DataFrame) -> Self {
        Self::new(data)
    }
}
