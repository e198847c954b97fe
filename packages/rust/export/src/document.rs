//! JSON document output.

use std::path::Path;

use partcatalog_shared::{PartCatalogError, PartRecord, Result};

use crate::write_atomic;

/// Write records as a pretty-printed JSON array.
pub fn write_json(records: &[PartRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| PartCatalogError::Export(format!("JSON serialization failed: {e}")))?;
    write_atomic(path, json.as_bytes())
}

/// Read back a JSON array of records written by [`write_json`].
pub fn read_json(path: &Path) -> Result<Vec<PartRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| PartCatalogError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| {
        PartCatalogError::validation(format!("invalid record document {}: {e}", path.display()))
    })
}
