//! Sample extracts of loaded datasets.

use polars::prelude::*;

use crate::error::Result;

/// Rows `[offset, offset + len)` followed by the last `tail` rows.
///
/// Both parts are clamped to the table; tail rows already inside the first
/// part are not repeated.
pub fn sample_extract(df: &DataFrame, offset: usize, len: usize, tail: usize) -> Result<DataFrame> {
    let height = df.height();
    let window = offset.min(height)..offset.saturating_add(len).min(height);
    let last = height.saturating_sub(tail)..height;
    let rows: Vec<IdxSize> = window
        .clone()
        .chain(last.filter(|row| !window.contains(row)))
        .map(|row| row as IdxSize)
        .collect();
    Ok(df.take(&IdxCa::from_vec("sample".into(), rows))?)
}
