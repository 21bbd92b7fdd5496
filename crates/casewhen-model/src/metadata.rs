//! Descriptive metadata attached to a loaded dataset.

use serde::{Deserialize, Serialize};

/// Provenance of a dataset. `name` feeds the lineage `dataset` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl DatasetMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Fill unset fields from `other`, keeping the values already present.
    pub fn merge(&mut self, other: DatasetMeta) {
        let DatasetMeta {
            name,
            source_file,
            source_path,
            source_type,
            source_url,
        } = other;
        self.name = self.name.take().or(name);
        self.source_file = self.source_file.take().or(source_file);
        self.source_path = self.source_path.take().or(source_path);
        self.source_type = self.source_type.take().or(source_type);
        self.source_url = self.source_url.take().or(source_url);
    }

    /// Non-empty fields as `(key, value)` pairs, in declaration order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", self.name.as_deref()),
            ("source_file", self.source_file.as_deref()),
            ("source_path", self.source_path.as_deref()),
            ("source_type", self.source_type.as_deref()),
            ("source_url", self.source_url.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
    }
}
