//! CSV export of the rows currently shown by a list tab.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::info;

use crate::domain::resource::Resource;
use crate::infrastructure::config::write_atomic;

/// CSV export errors.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Encodes rows as CSV: the table's column titles, then the rendered cells.
///
/// # Errors
/// Returns error if a record cannot be encoded.
pub fn to_csv<R: Resource>(rows: &[&R]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(R::columns())?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Writes rows to `<collection>-<timestamp>.csv` under `dir`.
///
/// # Errors
/// Returns error if the directory or file cannot be written.
pub fn export_csv<R: Resource>(
    rows: &[&R],
    dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf, ExportError> {
    let bytes = to_csv(rows)?;
    std::fs::create_dir_all(dir)?;

    let path = dir.join(format!(
        "{}-{}.csv",
        R::KIND.collection(),
        now.format("%Y%m%d-%H%M%S")
    ));
    write_atomic(&path, &bytes)?;

    info!(path = ?path, rows = rows.len(), "List exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::tempdir;

    use super::*;
    use crate::domain::entities::Bus;

    fn buses() -> Vec<Bus> {
        serde_json::from_str(
            r#"[
                {"numero": "DK-1", "type": "VIP", "capacite": 40},
                {"numero": "DK, 2", "type": "Standard"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_header_and_rows_match_table() {
        let items = buses();
        let rows: Vec<&Bus> = items.iter().collect();

        let csv = String::from_utf8(to_csv(&rows).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], Bus::columns().join(","));
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("\"DK, 2\",Standard,N/A"));
    }

    #[test]
    fn test_export_file_name() {
        let dir = tempdir().unwrap();
        let items = buses();
        let rows: Vec<&Bus> = items.iter().take(1).collect();
        let now = Local.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();

        let path = export_csv(&rows, &dir.path().join("exports"), now).unwrap();

        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("buses-20240601-093000.csv")
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 2);
    }
}
