use anyhow::{Context, Result};
use casewhen_common::{columns, dtype_view, duplicate_rows};
use casewhen_engine::{CaseOutcome, Dataset};
use casewhen_ingest::{IngestOptions, SampleSpec, read_dataset};
use casewhen_model::CaseOptions;
use comfy_table::Table;
use tracing::{info, info_span};

use casewhen_cli::pipeline::{JoinSource, LoadRequest, apply_rule_files, load_dataset};

use crate::cli::{ColumnsArgs, RunArgs};
use crate::summary::{apply_table_style, header_cell};

/// Dataset after all chains ran, with one outcome per chain.
pub struct RunResult {
    pub dataset: Dataset,
    pub outcomes: Vec<CaseOutcome>,
    /// Rows whose `--highlight-duplicates` key repeats.
    pub duplicates: Option<Vec<bool>>,
}

pub fn run_case(args: &RunArgs) -> Result<RunResult> {
    let span = info_span!("run", csv = %args.csv.display());
    let _guard = span.enter();

    let request = load_request(args);
    let mut dataset = load_dataset(&request)?;

    let mut options = CaseOptions::default().with_overwrite(!args.no_overwrite);
    if let Some(name) = &args.output_name {
        options = options.with_default_output_name(name.clone());
    }
    let outcomes = apply_rule_files(&mut dataset, &args.rules, &options)?;

    info!(
        chains = outcomes.len(),
        lineage = dataset.lineage().len(),
        "rules applied"
    );
    let duplicates = args
        .highlight_duplicates
        .as_deref()
        .map(|key| {
            duplicate_rows(&dataset.data, key)
                .with_context(|| format!("find duplicate values in '{key}'"))
        })
        .transpose()?;
    if let Some(flags) = &duplicates {
        info!(
            rows = flags.iter().filter(|flag| **flag).count(),
            "duplicate keys found"
        );
    }
    Ok(RunResult {
        dataset,
        outcomes,
        duplicates,
    })
}

pub fn run_columns(args: &ColumnsArgs) -> Result<()> {
    let (df, _) = read_dataset(&args.csv, &IngestOptions::default())
        .with_context(|| format!("load {}", args.csv.display()))?;
    let selected = columns(&df, args.contains.as_deref(), args.case_sensitive);

    let mut table = Table::new();
    table.set_header(vec![header_cell("Column"), header_cell("Type")]);
    apply_table_style(&mut table);
    for (name, dtype) in dtype_view(&df) {
        if selected.contains(&name) {
            table.add_row(vec![name, dtype]);
        }
    }
    println!("{table}");
    Ok(())
}

fn load_request(args: &RunArgs) -> LoadRequest {
    let mut ingest = IngestOptions::new().with_infer_schema_rows(args.infer_rows);
    if let Some(name) = &args.name {
        ingest = ingest.with_name(name.clone());
    }
    if let Some(url) = &args.source_url {
        ingest = ingest.with_source_url(url.clone());
    }
    for column in &args.datetime {
        ingest = ingest.with_datetime_column(column.clone());
    }
    if let Some(offset) = args.sample_offset {
        ingest = ingest.with_sample(SampleSpec {
            offset,
            len: args.sample_len,
            tail: args.sample_tail,
        });
    }

    LoadRequest {
        csv: args.csv.clone(),
        ingest,
        meta: args.meta.clone(),
        join: args.join.clone().map(|csv| JoinSource {
            csv,
            on: args.on.clone(),
        }),
    }
}
