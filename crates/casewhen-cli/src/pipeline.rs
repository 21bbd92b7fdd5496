//! Dataset loading and rule application behind the `run` command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use casewhen_common::{JoinKind, merge_safe};
use casewhen_engine::{CaseOutcome, Dataset};
use casewhen_ingest::{IngestOptions, load_metadata, read_dataset};
use casewhen_model::{CaseOptions, DatasetMeta, RuleChain};
use serde_json::Value;
use tracing::{debug, info};

/// A second CSV joined onto the dataset by key columns.
#[derive(Debug, Clone)]
pub struct JoinSource {
    pub csv: PathBuf,
    pub on: Vec<String>,
}

/// Everything needed to build the working dataset.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub csv: PathBuf,
    pub ingest: IngestOptions,
    pub meta: Option<PathBuf>,
    pub join: Option<JoinSource>,
}

impl LoadRequest {
    pub fn new(csv: impl Into<PathBuf>) -> Self {
        Self {
            csv: csv.into(),
            ingest: IngestOptions::default(),
            meta: None,
            join: None,
        }
    }
}

/// Read rule chains from a JSON file holding one chain object or an array
/// of them.
pub fn load_rule_chains(path: &Path) -> Result<Vec<RuleChain>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read rules {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("parse rules {}", path.display()))?;
    let chains = match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                RuleChain::from_value(item)
                    .with_context(|| format!("rule chain {} in {}", index + 1, path.display()))
            })
            .collect::<Result<Vec<_>>>()?,
        other => vec![
            RuleChain::from_value(other)
                .with_context(|| format!("rule chain in {}", path.display()))?,
        ],
    };
    debug!(path = %path.display(), chains = chains.len(), "rules loaded");
    Ok(chains)
}

/// Load the CSV, settle its metadata and apply the optional join.
///
/// Metadata precedence: explicit options, then the sidecar, then what is
/// derived from the file itself.
pub fn load_dataset(request: &LoadRequest) -> Result<Dataset> {
    let (mut data, derived) = read_dataset(&request.csv, &request.ingest)
        .with_context(|| format!("load {}", request.csv.display()))?;

    let mut meta = DatasetMeta {
        name: request.ingest.name.clone(),
        source_url: request.ingest.source_url.clone(),
        ..DatasetMeta::default()
    };
    if let Some(path) = &request.meta {
        let sidecar =
            load_metadata(path).with_context(|| format!("load metadata {}", path.display()))?;
        meta.merge(sidecar);
    }
    meta.merge(derived);

    if let Some(join) = &request.join {
        if join.on.is_empty() {
            bail!("join with {} needs at least one key column", join.csv.display());
        }
        let ingest = IngestOptions::new().with_infer_schema_rows(request.ingest.infer_schema_rows);
        let (right, _) = read_dataset(&join.csv, &ingest)
            .with_context(|| format!("load {}", join.csv.display()))?;
        let on: Vec<&str> = join.on.iter().map(String::as_str).collect();
        data = merge_safe(&data, &right, &on, JoinKind::Left)
            .with_context(|| format!("join {} on {}", join.csv.display(), join.on.join(", ")))?;
        info!(rows = data.height(), columns = data.width(), "join applied");
    }

    Ok(Dataset::with_meta(data, meta))
}

/// Apply every chain of every rules file, in order.
///
/// Stops at the first failing chain; chains applied before it stay applied.
pub fn apply_rule_files(
    dataset: &mut Dataset,
    rules: &[PathBuf],
    options: &CaseOptions,
) -> Result<Vec<CaseOutcome>> {
    let mut outcomes = Vec::new();
    for path in rules {
        for (index, chain) in load_rule_chains(path)?.iter().enumerate() {
            let outcome = dataset.apply_case_with(chain, options).with_context(|| {
                format!("apply rule chain {} from {}", index + 1, path.display())
            })?;
            outcomes.push(outcome);
        }
    }
    Ok(outcomes)
}
