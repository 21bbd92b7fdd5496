//! CSV dataset loading.

use std::path::Path;

use casewhen_common::timestamp_to_physical;
use casewhen_model::{DatasetMeta, parse_timestamp};
use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{IngestError, Result};
use crate::options::IngestOptions;
use crate::sample::sample_extract;

/// Source type recorded for datasets read from CSV files.
pub const CSV_SOURCE_TYPE: &str = "CSV";

/// Read a CSV file into a DataFrame and describe where it came from.
///
/// Listed datetime columns are converted from text, then the sample extract
/// is taken if one is requested.
pub fn read_dataset(path: &Path, options: &IngestOptions) -> Result<(DataFrame, DatasetMeta)> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(options.infer_schema_rows))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    for column in &options.datetime_columns {
        parse_datetime_column(&mut df, column)?;
    }

    if let Some(sample) = options.sample {
        let total = df.height();
        df = sample_extract(&df, sample.offset, sample.len, sample.tail)?;
        debug!(total, kept = df.height(), "sample extract taken");
    }

    let meta = describe_source(path, options);
    info!(
        path = %path.display(),
        dataset = meta.name.as_deref().unwrap_or("-"),
        rows = df.height(),
        columns = df.width(),
        "dataset loaded"
    );
    Ok((df, meta))
}

fn describe_source(path: &Path, options: &IngestOptions) -> DatasetMeta {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned());
    DatasetMeta {
        name: options.name.clone().or(stem),
        source_file: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
        source_path: path
            .parent()
            .map(|parent| parent.display().to_string())
            .filter(|parent| !parent.is_empty()),
        source_type: Some(CSV_SOURCE_TYPE.to_string()),
        source_url: options.source_url.clone(),
    }
}

/// Convert a text column to `Datetime` (microseconds). Empty cells become
/// null; temporal columns are left unchanged.
pub fn parse_datetime_column(df: &mut DataFrame, column: &str) -> Result<()> {
    let source = df
        .column(column)
        .map_err(|_| IngestError::ColumnNotFound {
            column: column.to_string(),
        })?;
    match source.dtype() {
        DataType::Datetime(_, _) | DataType::Date => return Ok(()),
        DataType::String => {}
        other => {
            return Err(IngestError::InvalidTimestamp {
                column: column.to_string(),
                value: format!("<{other}>"),
            });
        }
    }

    let mut micros = Vec::with_capacity(source.len());
    for value in source.str()?.iter() {
        let physical = match value.map(str::trim) {
            None | Some("") => None,
            Some(text) => {
                let timestamp =
                    parse_timestamp(text).ok_or_else(|| IngestError::InvalidTimestamp {
                        column: column.to_string(),
                        value: text.to_string(),
                    })?;
                timestamp_to_physical(timestamp, TimeUnit::Microseconds)
            }
        };
        micros.push(physical);
    }

    let converted = Series::new(column.into(), micros)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;
    df.with_column(converted)?;
    Ok(())
}
