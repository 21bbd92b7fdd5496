//! Table utilities: column introspection, dtype views and guarded joins.

use std::collections::{BTreeSet, HashMap};

use polars::prelude::*;
use thiserror::Error;

/// Errors raised by [`merge_safe`].
#[derive(Debug, Error)]
pub enum FrameError {
    /// Non-key columns present on both sides of a join.
    #[error("columns present on both sides of the join: {}", columns.join(", "))]
    DuplicateColumns { columns: Vec<String> },

    /// A left join produced more rows than the left table had.
    #[error("join duplicated rows: {before} rows before, {after} after")]
    DuplicateRows { before: usize, after: usize },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Join strategy for [`merge_safe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Left,
    Inner,
    Full,
}

impl From<JoinKind> for JoinType {
    fn from(kind: JoinKind) -> Self {
        match kind {
            JoinKind::Left => JoinType::Left,
            JoinKind::Inner => JoinType::Inner,
            JoinKind::Full => JoinType::Full,
        }
    }
}

/// Column names, optionally filtered by a substring.
pub fn columns(df: &DataFrame, contains: Option<&str>, case_sensitive: bool) -> Vec<String> {
    let names = df.get_column_names().into_iter().map(|name| name.to_string());
    match contains {
        None => names.collect(),
        Some(needle) if case_sensitive => names.filter(|name| name.contains(needle)).collect(),
        Some(needle) => {
            let needle = needle.to_lowercase();
            names
                .filter(|name| name.to_lowercase().contains(&needle))
                .collect()
        }
    }
}

/// `(column, dtype)` pairs in column order.
pub fn dtype_view(df: &DataFrame) -> Vec<(String, String)> {
    df.get_columns()
        .iter()
        .map(|column| (column.name().to_string(), column.dtype().to_string()))
        .collect()
}

fn columns_where(df: &DataFrame, pred: impl Fn(&DataType) -> bool) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|column| pred(column.dtype()))
        .map(|column| column.name().to_string())
        .collect()
}

pub fn datetime_columns(df: &DataFrame) -> Vec<String> {
    columns_where(df, |dtype| {
        matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
    })
}

pub fn integer_columns(df: &DataFrame) -> Vec<String> {
    columns_where(df, DataType::is_integer)
}

pub fn float_columns(df: &DataFrame) -> Vec<String> {
    columns_where(df, DataType::is_float)
}

pub fn text_columns(df: &DataFrame) -> Vec<String> {
    columns_where(df, |dtype| matches!(dtype, DataType::String))
}

/// Names present in both lists and not excluded, sorted.
pub fn duplicate_columns(left: &[String], right: &[String], exclude: &[String]) -> Vec<String> {
    let right: BTreeSet<&str> = right.iter().map(String::as_str).collect();
    let shared: BTreeSet<&str> = left
        .iter()
        .map(String::as_str)
        .filter(|name| right.contains(name) && !exclude.iter().any(|ex| ex == name))
        .collect();
    shared.into_iter().map(str::to_string).collect()
}

/// Copy of `df` without the named columns. Unknown names are ignored.
pub fn exclude_columns(df: &DataFrame, names: &[&str]) -> PolarsResult<DataFrame> {
    let keep: Vec<PlSmallStr> = df
        .get_column_names()
        .into_iter()
        .filter(|name| !names.contains(&name.as_str()))
        .cloned()
        .collect();
    df.select(keep)
}

/// Per row, whether its `key` value occurs more than once in `df`. Null keys
/// never count as duplicates.
pub fn duplicate_rows(df: &DataFrame, key: &str) -> PolarsResult<Vec<bool>> {
    let keys = df.column(key)?.cast(&DataType::String)?;
    let keys = keys.str()?;
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in keys.into_iter().flatten() {
        *counts.entry(value).or_default() += 1;
    }
    Ok(keys
        .into_iter()
        .map(|value| value.is_some_and(|v| counts.get(v).copied().unwrap_or(0) > 1))
        .collect())
}

/// Join `right` onto `left`, refusing joins that would silently rename
/// colliding columns or multiply left rows. Left row order is kept.
pub fn merge_safe(
    left: &DataFrame,
    right: &DataFrame,
    on: &[&str],
    how: JoinKind,
) -> Result<DataFrame, FrameError> {
    let exclude: Vec<String> = on.iter().map(|key| (*key).to_string()).collect();
    let duplicates = duplicate_columns(
        &columns(left, None, true),
        &columns(right, None, true),
        &exclude,
    );
    if !duplicates.is_empty() {
        return Err(FrameError::DuplicateColumns {
            columns: duplicates,
        });
    }

    let keys: Vec<Expr> = on.iter().map(|key| col(*key)).collect();
    let mut args = JoinArgs::new(how.into()).with_coalesce(JoinCoalesce::CoalesceColumns);
    args.maintain_order = MaintainOrderJoin::LeftRight;
    let merged = left
        .clone()
        .lazy()
        .join(right.clone().lazy(), keys.clone(), keys, args)
        .collect()?;

    let before = left.height();
    let after = merged.height();
    if how == JoinKind::Left && after > before {
        return Err(FrameError::DuplicateRows { before, after });
    }
    Ok(merged)
}
