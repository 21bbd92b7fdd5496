//! Shared Polars helpers for casewhen crates.

pub mod frame;
pub mod polars;

pub use frame::{
    FrameError, JoinKind, columns, datetime_columns, dtype_view, duplicate_columns,
    duplicate_rows, exclude_columns, float_columns, integer_columns, merge_safe, text_columns,
};
pub use self::polars::{
    any_to_literal, any_to_string, date_from_days, date_to_days, format_numeric,
    timestamp_from_physical, timestamp_to_physical,
};
