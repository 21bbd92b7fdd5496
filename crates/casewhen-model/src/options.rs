//! Configuration options for rule chain execution.

use serde::{Deserialize, Serialize};

/// Column name used when a rule chain does not name its output.
pub const DEFAULT_OUTPUT_NAME: &str = "case_output";

/// Options controlling rule chain execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOptions {
    /// Name given to the derived column when the chain leaves it unset.
    pub default_output_name: String,

    /// Replace an existing column of the same name.
    /// Default: true.
    pub allow_overwrite: bool,
}

impl Default for CaseOptions {
    fn default() -> Self {
        Self {
            default_output_name: DEFAULT_OUTPUT_NAME.to_string(),
            allow_overwrite: true,
        }
    }
}

impl CaseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that refuse to replace existing columns.
    pub fn strict() -> Self {
        Self {
            allow_overwrite: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_default_output_name(mut self, name: impl Into<String>) -> Self {
        self.default_output_name = name.into();
        self
    }

    #[must_use]
    pub fn with_overwrite(mut self, allow: bool) -> Self {
        self.allow_overwrite = allow;
        self
    }
}
