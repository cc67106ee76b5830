//! Local file exports.

mod csv_export;

pub use csv_export::{ExportError, export_csv, to_csv};
