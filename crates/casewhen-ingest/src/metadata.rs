//! Dataset metadata sidecars.

use std::fs;
use std::path::Path;

use casewhen_model::DatasetMeta;

use crate::error::{IngestError, Result};

/// Read a JSON metadata sidecar.
///
/// ```json
/// {"name": "sales", "source_url": "https://example.org/crm"}
/// ```
pub fn load_metadata(path: &Path) -> Result<DatasetMeta> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::MetadataRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| IngestError::MetadataParse {
        path: path.to_path_buf(),
        source,
    })
}
