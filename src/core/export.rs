// Cerebro - core/export.rs
//
// CSV and JSON export of catalog records.
// Core layer: writes to any Write trait object.

use crate::core::model::IssueRecord;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export records to CSV format.
///
/// Writes: month, year, issue, collection, format
///
/// Each row is a single anchored issue triple, so the output imports back
/// to the same records.
pub fn export_csv<W: Write>(
    records: &[IssueRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["month", "year", "issue", "collection", "format"])
        .map_err(csv_err)?;

    let mut count = 0;
    for record in records {
        let year = record.year().to_string();
        csv_writer
            .write_record([
                record.month().name(),
                year.as_str(),
                record.issue_number(),
                record.collection(),
                record.format(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export records to JSON format (array of objects, camelCase keys).
pub fn export_json<W: Write>(
    records: &[IssueRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, records).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(records.len())
}
