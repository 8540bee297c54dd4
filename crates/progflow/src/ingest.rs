//! JSON adapter: raw rows in, flow records out.
//!
//! This is deliberately thin plumbing around `serde_json`; the core never
//! touches the filesystem itself. A spreadsheet exported as a JSON array of
//! objects (original column headers or snake_case keys) loads directly.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::catalog::RawProgramRow;
use crate::error::Result;
use crate::flow::FlowRecord;

/// Read a JSON array of raw program rows from a file.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the file can't be opened and
/// [`crate::Error::Json`] if it isn't a JSON array of row objects.
pub fn read_rows(path: &Path) -> Result<Vec<RawProgramRow>> {
    let file = File::open(path)?;
    let rows: Vec<RawProgramRow> = serde_json::from_reader(BufReader::new(file))?;
    debug!(rows = rows.len(), path = %path.display(), "rows loaded");
    Ok(rows)
}

/// Write flow records as a pretty-printed JSON array to a file.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] or [`crate::Error::Json`] on failure.
pub fn write_flows(path: &Path, records: &[FlowRecord]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Serialize flow records as a pretty-printed JSON string.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if serialization fails.
pub fn flows_to_string(records: &[FlowRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_with_spreadsheet_headers() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("rows.json");
        std::fs::write(
            &path,
            r#"[
                {"ID": "1", "Program Name": "Alpha"},
                {"id": "2", "name": "Beta", "dependency": "1"}
            ]"#,
        )
        .expect("write input");

        let rows = read_rows(&path).expect("rows parse");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Alpha");
        assert_eq!(rows[1].dependency.as_deref(), Some("1"));
    }

    #[test]
    fn read_rejects_non_array_input() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("rows.json");
        std::fs::write(&path, r#"{"name": "not an array"}"#).expect("write input");

        assert!(matches!(
            read_rows(&path),
            Err(crate::Error::Json(_))
        ));
    }

    #[test]
    fn read_reports_missing_file_as_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.json");

        assert!(matches!(read_rows(&path), Err(crate::Error::Io(_))));
    }
}
