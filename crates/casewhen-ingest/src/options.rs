//! Options for loading datasets.

/// Rows taken for a sample extract: `len` rows starting at `offset`,
/// followed by the last `tail` rows of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSpec {
    pub offset: usize,
    pub len: usize,
    pub tail: usize,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            offset: 100,
            len: 10,
            tail: 1,
        }
    }
}

/// Options for [`read_dataset`](crate::read_dataset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// Dataset name. Defaults to the file stem.
    pub name: Option<String>,

    /// Where the file was obtained from.
    pub source_url: Option<String>,

    /// Rows Polars inspects to infer column types.
    /// Default: 100.
    pub infer_schema_rows: usize,

    /// Text columns to convert to timestamps after loading.
    pub datetime_columns: Vec<String>,

    /// Keep only a sample extract of the loaded rows.
    pub sample: Option<SampleSpec>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            name: None,
            source_url: None,
            infer_schema_rows: 100,
            datetime_columns: Vec::new(),
            sample: None,
        }
    }
}

impl IngestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_infer_schema_rows(mut self, rows: usize) -> Self {
        self.infer_schema_rows = rows;
        self
    }

    #[must_use]
    pub fn with_datetime_column(mut self, column: impl Into<String>) -> Self {
        self.datetime_columns.push(column.into());
        self
    }

    #[must_use]
    pub fn with_sample(mut self, sample: SampleSpec) -> Self {
        self.sample = Some(sample);
        self
    }
}
