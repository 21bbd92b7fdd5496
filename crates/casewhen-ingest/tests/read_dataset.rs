//! Tests for loading datasets from disk.

use std::io::Write;

use casewhen_ingest::{
    IngestError, IngestOptions, SampleSpec, load_metadata, read_dataset,
};
use polars::prelude::*;
use tempfile::{NamedTempFile, TempDir};

const PIPELINE: &str = "\
opportunity_id,account,deal_stage,close_date,close_value
1C1I7A6R,Cancity,Won,2017-03-01,1054
Z063OYW0,Isdom,Won,2017-03-11,4514
EC4QE1BX,Cancity,Lost,2017-03-07,
";

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn reads_csv_with_provenance() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "sales_pipeline.csv", PIPELINE);

    let (df, meta) = read_dataset(&path, &IngestOptions::default()).unwrap();

    assert_eq!(df.height(), 3);
    assert_eq!(df.width(), 5);
    assert_eq!(df.column("close_value").unwrap().null_count(), 1);
    assert_eq!(meta.name.as_deref(), Some("sales_pipeline"));
    assert_eq!(meta.source_file.as_deref(), Some("sales_pipeline.csv"));
    assert_eq!(meta.source_type.as_deref(), Some("CSV"));
    assert_eq!(
        meta.source_path.as_deref(),
        Some(dir.path().display().to_string().as_str())
    );
}

#[test]
fn converts_requested_datetime_columns() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "pipeline.csv", PIPELINE);
    let options = IngestOptions::new()
        .with_name("sales")
        .with_datetime_column("close_date");

    let (df, meta) = read_dataset(&path, &options).unwrap();

    assert_eq!(meta.name.as_deref(), Some("sales"));
    assert!(matches!(
        df.column("close_date").unwrap().dtype(),
        DataType::Datetime(_, _)
    ));
}

#[test]
fn applies_sample_extract() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "pipeline.csv", PIPELINE);
    let options = IngestOptions::new().with_sample(SampleSpec {
        offset: 0,
        len: 1,
        tail: 1,
    });

    let (df, _) = read_dataset(&path, &options).unwrap();

    let ids: Vec<Option<&str>> = df
        .column("opportunity_id")
        .unwrap()
        .str()
        .unwrap()
        .iter()
        .collect();
    assert_eq!(ids, vec![Some("1C1I7A6R"), Some("EC4QE1BX")]);
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = read_dataset(&dir.path().join("absent.csv"), &IngestOptions::default())
        .unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn unknown_datetime_column_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "pipeline.csv", PIPELINE);
    let options = IngestOptions::new().with_datetime_column("engage_date");

    let err = read_dataset(&path, &options).unwrap_err();

    assert!(matches!(err, IngestError::ColumnNotFound { ref column } if column == "engage_date"));
}

#[test]
fn loads_metadata_sidecar() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"name": "sales", "source_url": "https://example.org/crm"}}"#
    )
    .unwrap();

    let meta = load_metadata(file.path()).unwrap();

    assert_eq!(meta.name.as_deref(), Some("sales"));
    assert_eq!(meta.source_url.as_deref(), Some("https://example.org/crm"));
    assert_eq!(meta.source_file, None);
}

#[test]
fn malformed_metadata_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[1, 2").unwrap();
    assert!(matches!(
        load_metadata(file.path()),
        Err(IngestError::MetadataParse { .. })
    ));
    assert!(matches!(
        load_metadata(std::path::Path::new("/nonexistent/meta.json")),
        Err(IngestError::MetadataRead { .. })
    ));
}
