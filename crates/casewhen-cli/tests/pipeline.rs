//! Integration tests for the pipeline module.

use std::fs;
use std::path::{Path, PathBuf};

use casewhen_cli::pipeline::{
    JoinSource, LoadRequest, apply_rule_files, load_dataset, load_rule_chains,
};
use casewhen_model::{CaseOptions, DatasetMeta, Predicate};
use tempfile::TempDir;

const SALES_CSV: &str = "\
opportunity_id,region,amount
1,US,50
2,US,150
3,EU,200
";

const AGENTS_CSV: &str = "\
opportunity_id,agent
1,Anna
2,Boris
3,Cora
";

const FLAG_RULES: &str = r#"{
  "output_column_name": "flag",
  "statements": [
    [["and", [["equal", "region", "US"], ["greater than", "amount", 100]]], true]
  ],
  "else": false
}"#;

const TIER_RULES: &str = r#"[
  {
    "output_column_name": "tier",
    "statements": [[["greater than", "amount", 100], "large"]],
    "else": "small"
  },
  {
    "output_column_name": "agent_flag",
    "statements": [[["is null", "agent"], "unassigned"]],
    "else": {"column": "agent"}
  }
]"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn strings(df: &polars::prelude::DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_no_null_iter()
        .map(str::to_string)
        .collect()
}

fn sales(dir: &TempDir) -> PathBuf {
    write(dir, "sales.csv", SALES_CSV)
}

#[test]
fn test_load_rule_chains_single_object() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "flag.json", FLAG_RULES);
    let chains = load_rule_chains(&path).unwrap();
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].output_column_name.as_deref(), Some("flag"));
    // two comparisons plus the else step
    assert_eq!(chains[0].atomic_steps(), 3);
}

#[test]
fn test_load_rule_chains_array() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "tiers.json", TIER_RULES);
    let chains = load_rule_chains(&path).unwrap();
    assert_eq!(chains.len(), 2);
    assert_eq!(chains[1].output_column_name.as_deref(), Some("agent_flag"));
}

#[test]
fn test_load_rule_chains_reports_file_and_position() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "bad.json",
        r#"[{"statements": [], "else": 1}, {"statements": [[["xor", "a", 1], 1]], "else": 0}]"#,
    );
    let message = format!("{:#}", load_rule_chains(&path).unwrap_err());
    assert!(message.contains("rule chain 2"));
    assert!(message.contains("bad.json"));
    assert!(message.contains("unknown operator"));
}

#[test]
fn test_load_dataset_metadata_precedence() {
    let dir = TempDir::new().unwrap();
    let csv = sales(&dir);
    let meta = write(
        &dir,
        "sales.meta.json",
        r#"{"name": "crm_sales", "source_url": "https://example.org/sidecar"}"#,
    );

    let mut request = LoadRequest::new(&csv);
    request.meta = Some(meta.clone());
    let dataset = load_dataset(&request).unwrap();
    let loaded = dataset.meta.as_ref().unwrap();
    assert_eq!(loaded.name.as_deref(), Some("crm_sales"));
    assert_eq!(loaded.source_url.as_deref(), Some("https://example.org/sidecar"));
    assert_eq!(loaded.source_file.as_deref(), Some("sales.csv"));
    assert_eq!(loaded.source_type.as_deref(), Some("CSV"));

    let mut request = LoadRequest::new(&csv);
    request.meta = Some(meta);
    request.ingest = request.ingest.with_name("explicit");
    let dataset = load_dataset(&request).unwrap();
    assert_eq!(dataset.name(), Some("explicit"));
}

#[test]
fn test_load_dataset_without_sidecar_uses_file_stem() {
    let dir = TempDir::new().unwrap();
    let dataset = load_dataset(&LoadRequest::new(sales(&dir))).unwrap();
    assert_eq!(dataset.name(), Some("sales"));
    assert_eq!(dataset.height(), 3);
    assert!(dataset.lineage().is_empty());
}

#[test]
fn test_load_dataset_joins_second_csv() {
    let dir = TempDir::new().unwrap();
    let mut request = LoadRequest::new(sales(&dir));
    request.join = Some(JoinSource {
        csv: write(&dir, "agents.csv", AGENTS_CSV),
        on: vec!["opportunity_id".to_string()],
    });
    let dataset = load_dataset(&request).unwrap();
    assert_eq!(dataset.height(), 3);
    assert!(dataset.data.column("agent").is_ok());
}

#[test]
fn test_load_dataset_rejects_colliding_join() {
    let dir = TempDir::new().unwrap();
    let mut request = LoadRequest::new(sales(&dir));
    request.join = Some(JoinSource {
        csv: write(&dir, "regions.csv", "opportunity_id,region\n1,US\n"),
        on: vec!["opportunity_id".to_string()],
    });
    let message = format!("{:#}", load_dataset(&request).unwrap_err());
    assert!(message.contains("regions.csv"));
    assert!(message.contains("region"));
}

#[test]
fn test_load_dataset_missing_file() {
    let request = LoadRequest::new(Path::new("/nonexistent/sales.csv"));
    let message = format!("{:#}", load_dataset(&request).unwrap_err());
    assert!(message.contains("sales.csv"));
}

#[test]
fn test_apply_rule_files_in_order() {
    let dir = TempDir::new().unwrap();
    let mut request = LoadRequest::new(sales(&dir));
    request.join = Some(JoinSource {
        csv: write(&dir, "agents.csv", "opportunity_id,agent\n1,Anna\n3,Cora\n"),
        on: vec!["opportunity_id".to_string()],
    });
    let mut dataset = load_dataset(&request).unwrap();
    let rules = vec![
        write(&dir, "flag.json", FLAG_RULES),
        write(&dir, "tiers.json", TIER_RULES),
    ];

    let outcomes = apply_rule_files(&mut dataset, &rules, &CaseOptions::default()).unwrap();
    let names: Vec<&str> = outcomes.iter().map(|o| o.output_name.as_str()).collect();
    assert_eq!(names, vec!["flag", "tier", "agent_flag"]);

    let flags: Vec<Option<bool>> = dataset
        .data
        .column("flag")
        .unwrap()
        .bool()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(flags, vec![Some(false), Some(true), Some(false)]);
    assert_eq!(strings(&dataset.data, "tier"), vec!["small", "large", "large"]);
    assert_eq!(
        strings(&dataset.data, "agent_flag"),
        vec!["Anna", "unassigned", "Cora"]
    );

    // flag: 2 steps + and + else, tier: 1 + else, agent_flag: 1 + else
    assert_eq!(dataset.lineage().len(), 8);
    assert_eq!(dataset.lineage().batches().count(), 3);
    let first = &dataset.lineage().records()[0];
    assert_eq!(first.dataset.as_deref(), Some("sales"));
    assert_eq!(first.function, Predicate::Equal);
    assert_eq!(first.group_id, Some(1));
}

#[test]
fn test_apply_rule_files_default_output_name_and_overwrite() {
    let dir = TempDir::new().unwrap();
    let mut dataset = load_dataset(&LoadRequest::new(sales(&dir))).unwrap();
    let unnamed = write(&dir, "unnamed.json", r#"{"statements": [], "else": "x"}"#);

    let options = CaseOptions::default().with_default_output_name("label");
    apply_rule_files(&mut dataset, std::slice::from_ref(&unnamed), &options).unwrap();
    assert_eq!(strings(&dataset.data, "label"), vec!["x", "x", "x"]);

    let strict = CaseOptions::strict().with_default_output_name("label");
    let message = format!(
        "{:#}",
        apply_rule_files(&mut dataset, &[unnamed], &strict).unwrap_err()
    );
    assert!(message.contains("unnamed.json"));
    assert_eq!(dataset.lineage().len(), 1);
}

#[test]
fn test_dataset_meta_default_is_empty() {
    assert!(DatasetMeta::default().entries().is_empty());
}
