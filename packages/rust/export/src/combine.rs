//! Concatenation of previously exported files.
//!
//! Inputs are read in the order given and appended without deduplication.
//! JSON elements are carried through untouched, so files written by older
//! runs still combine.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use tracing::{info, instrument};

use partcatalog_shared::{OutputFormat, PartCatalogError, Result};

use crate::table::csv_error;
use crate::write_atomic;

/// Which stems to combine, and where.
#[derive(Debug, Clone)]
pub struct CombineConfig {
    /// Directory holding the inputs and receiving the output.
    pub dir: PathBuf,
    /// Input file stems, in concatenation order.
    pub inputs: Vec<String>,
    /// Output file stem.
    pub output: String,
    pub formats: Vec<OutputFormat>,
}

/// One written combined file.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedOutput {
    pub format: OutputFormat,
    pub path: PathBuf,
    /// Rows (CSV) or array elements (JSON) written.
    pub rows: usize,
}

/// Combine every configured format.
#[instrument(skip_all, fields(inputs = config.inputs.len(), output = %config.output))]
pub fn combine(config: &CombineConfig) -> Result<Vec<CombinedOutput>> {
    if config.inputs.is_empty() {
        return Err(PartCatalogError::validation("no input files to combine"));
    }

    let mut outputs = Vec::with_capacity(config.formats.len());
    for format in &config.formats {
        let ext = format.extension();
        let inputs: Vec<PathBuf> = config
            .inputs
            .iter()
            .map(|stem| config.dir.join(format!("{stem}.{ext}")))
            .collect();
        let path = config.dir.join(format!("{}.{ext}", config.output));

        let rows = match format {
            OutputFormat::Csv => combine_csv(&inputs, &path)?,
            OutputFormat::Json => combine_json(&inputs, &path)?,
        };
        info!(format = %format, rows, path = %path.display(), "combined");
        outputs.push(CombinedOutput {
            format: *format,
            path,
            rows,
        });
    }
    Ok(outputs)
}

/// Concatenate CSV files sharing one header. Returns the data row count.
pub fn combine_csv(inputs: &[PathBuf], output: &Path) -> Result<usize> {
    let mut header: Option<csv::StringRecord> = None;
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut rows = 0;

    for input in inputs {
        let mut reader = csv::ReaderBuilder::new()
            .from_path(input)
            .map_err(|e| read_error(input, e))?;
        let this_header = reader.headers().map_err(|e| read_error(input, e))?.clone();

        match &header {
            None => {
                writer.write_record(&this_header).map_err(csv_error)?;
                header = Some(this_header);
            }
            Some(expected) if *expected != this_header => {
                return Err(PartCatalogError::validation(format!(
                    "header of {} does not match the first input",
                    input.display()
                )));
            }
            Some(_) => {}
        }

        for record in reader.records() {
            let record = record.map_err(|e| read_error(input, e))?;
            writer.write_record(&record).map_err(csv_error)?;
            rows += 1;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PartCatalogError::Export(format!("CSV flush failed: {e}")))?;
    write_atomic(output, &bytes)?;
    Ok(rows)
}

/// Concatenate top-level JSON arrays, written with 4-space indentation.
/// Returns the element count.
pub fn combine_json(inputs: &[PathBuf], output: &Path) -> Result<usize> {
    let mut combined: Vec<Value> = Vec::new();

    for input in inputs {
        let content =
            std::fs::read_to_string(input).map_err(|e| PartCatalogError::io(input, e))?;
        let value: Value = serde_json::from_str(&content).map_err(|e| {
            PartCatalogError::validation(format!("invalid JSON in {}: {e}", input.display()))
        })?;
        match value {
            Value::Array(items) => combined.extend(items),
            _ => {
                return Err(PartCatalogError::validation(format!(
                    "{} is not a JSON array",
                    input.display()
                )));
            }
        }
    }

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    combined
        .serialize(&mut ser)
        .map_err(|e| PartCatalogError::Export(format!("JSON serialization failed: {e}")))?;
    write_atomic(output, &buf)?;
    Ok(combined.len())
}

fn read_error(path: &Path, e: csv::Error) -> PartCatalogError {
    PartCatalogError::validation(format!("cannot read CSV {}: {e}", path.display()))
}
