//! Serialization of collected part records.
//!
//! - [`document`]: JSON array of records (write and re-read)
//! - [`table`]: CSV with the fixed twelve-column header
//! - [`combine`]: concatenation of previously exported files
//!
//! All writes go through a temporary sibling file renamed into place.

pub mod combine;
pub mod document;
pub mod table;

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use partcatalog_shared::{ExportConfig, OutputFormat, PartCatalogError, PartRecord, Result};

pub use combine::{CombineConfig, CombinedOutput, combine, combine_csv, combine_json};
pub use document::{read_json, write_json};
pub use table::{CSV_HEADER, write_csv};

/// Write `records` once per configured format.
///
/// Records are written in the order given. Any failed write aborts the
/// export. Returns the written paths in format order.
#[instrument(skip_all, fields(records = records.len(), dir = %config.dir.display()))]
pub fn export(records: &[PartRecord], config: &ExportConfig) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(config.formats.len());

    for format in &config.formats {
        let path = config.path_for(*format);
        match format {
            OutputFormat::Json => write_json(records, &path)?,
            OutputFormat::Csv => write_csv(records, &path)?,
        }
        written.push(path);
    }

    info!(files = written.len(), "export complete");
    Ok(written)
}

/// Write `bytes` to `path` via a temporary file in the same directory.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PartCatalogError::io(parent, e))?;
    }

    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    std::fs::write(&temp, bytes).map_err(|e| PartCatalogError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| PartCatalogError::io(path, e))?;

    debug!(path = %path.display(), size = bytes.len(), "wrote output file");
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    use partcatalog_shared::{InstallationInstructions, NO_COMPATIBILITY_INFO, PartRecord};

    /// Fresh scratch directory under the system temp dir.
    pub fn scratch_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pc-{label}-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub fn wheel() -> PartRecord {
        PartRecord {
            name: "Upper Dishrack Wheel".into(),
            price: 12.5,
            in_stock: true,
            rating: 4.0,
            review_count: 123,
            part_select_number: "PS11750057".into(),
            manufacturer_part_number: "WPW10195417".into(),
            item_description: "Replacement wheel, fits most racks.".into(),
            fixes_these_symptoms: vec!["Door won't close".into(), "Noisy".into()],
            replaces_these_parts: vec!["AP6013451".into(), "8268869".into()],
            installation_instructions: InstallationInstructions::Video(
                "https://www.youtube.com/watch?v=abc123".into(),
            ),
            is_compatible_with: vec!["KDFE104DSS0".into(), "WDT750SAHZ0".into()],
        }
    }

    pub fn pump() -> PartRecord {
        PartRecord {
            name: "Dishwasher Drain Pump".into(),
            price: 0.0,
            in_stock: false,
            rating: 0.0,
            review_count: 0,
            part_select_number: "PS3406971".into(),
            manufacturer_part_number: "W10348269".into(),
            item_description: String::new(),
            fixes_these_symptoms: vec![],
            replaces_these_parts: vec![],
            installation_instructions: InstallationInstructions::NotAvailable,
            is_compatible_with: vec![NO_COMPATIBILITY_INFO.into()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{pump, scratch_dir, wheel};
    use super::*;

    #[test]
    fn export_writes_each_configured_format() {
        let dir = scratch_dir("export");
        let config = ExportConfig {
            dir: dir.clone(),
            name: "dish_parts".into(),
            formats: vec![OutputFormat::Json, OutputFormat::Csv],
        };

        let written = export(&[wheel(), pump()], &config).unwrap();
        assert_eq!(written, vec![dir.join("dish_parts.json"), dir.join("dish_parts.csv")]);
        assert!(written.iter().all(|p| p.exists()));
        assert!(!dir.join("dish_parts.json.tmp").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_creates_missing_output_dir() {
        let dir = scratch_dir("export-nested");
        let config = ExportConfig {
            dir: dir.join("nested").join("out"),
            name: "parts".into(),
            formats: vec![OutputFormat::Csv],
        };

        let written = export(&[wheel()], &config).unwrap();
        assert!(written[0].exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_fails_when_target_is_a_directory() {
        let dir = scratch_dir("export-fail");
        std::fs::create_dir_all(dir.join("parts.json")).unwrap();
        let config = ExportConfig {
            dir: dir.clone(),
            name: "parts".into(),
            formats: vec![OutputFormat::Json],
        };

        let err = export(&[wheel()], &config).unwrap_err();
        assert!(matches!(err, PartCatalogError::Io { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
