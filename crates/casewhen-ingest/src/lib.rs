//! Dataset loading for casewhen.
//!
//! Reads CSV files into Polars DataFrames together with the provenance
//! metadata that labels lineage records, and produces sample extracts.

pub mod error;
pub mod metadata;
pub mod options;
pub mod reader;
pub mod sample;

pub use error::{IngestError, Result};
pub use metadata::load_metadata;
pub use options::{IngestOptions, SampleSpec};
pub use reader::{CSV_SOURCE_TYPE, parse_datetime_column, read_dataset};
pub use sample::sample_extract;
