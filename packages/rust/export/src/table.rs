//! CSV table output.

use std::io::Write;
use std::path::Path;

use partcatalog_shared::{PartCatalogError, PartRecord, Result};

use crate::write_atomic;

/// Column names, in output order.
pub const CSV_HEADER: [&str; 12] = [
    "partName",
    "partPrice",
    "inStock",
    "partRating",
    "partReviews",
    "PSNumber",
    "MPNumber",
    "partDescription",
    "partSymptoms",
    "partReplaces",
    "partInstallation",
    "partCompatible",
];

const LIST_SEPARATOR: &str = ", ";

/// Write records as CSV with the fixed header row.
pub fn write_csv(records: &[PartRecord], path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    write_csv_to(records, &mut buf)?;
    write_atomic(path, &buf)
}

/// Write the CSV form of `records` into any writer.
pub fn write_csv_to<W: Write>(records: &[PartRecord], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    writer.write_record(CSV_HEADER).map_err(csv_error)?;
    for record in records {
        writer.write_record(row(record)).map_err(csv_error)?;
    }
    writer
        .flush()
        .map_err(|e| PartCatalogError::Export(format!("CSV flush failed: {e}")))
}

fn row(record: &PartRecord) -> [String; 12] {
    [
        record.name.clone(),
        format_decimal(record.price),
        record.in_stock.to_string(),
        format_decimal(record.rating),
        record.review_count.to_string(),
        record.part_select_number.clone(),
        record.manufacturer_part_number.clone(),
        record.item_description.clone(),
        record.fixes_these_symptoms.join(LIST_SEPARATOR),
        record.replaces_these_parts.join(LIST_SEPARATOR),
        record.installation_instructions.to_string(),
        record.is_compatible_with.join(LIST_SEPARATOR),
    ]
}

/// Shortest round-trip form, keeping a trailing `.0` on whole numbers.
fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

pub(crate) fn csv_error(e: csv::Error) -> PartCatalogError {
    PartCatalogError::Export(format!("CSV write failed: {e}"))
}
