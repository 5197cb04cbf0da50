//! # bloodline-report
//!
//! Tabular PDF export of BloodLine donor search results.
//!
//! The library turns a list of donor records plus the search criteria that
//! produced them into a paginated PDF table and saves it as
//! `bloodline-donor-results.pdf`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bloodline_report::{DonorRecord, DonorReportExporter, ExportOptions, FilterCriteria};
//!
//! fn main() -> bloodline_report::Result<()> {
//!     let donors = vec![
//!         DonorRecord::new("Rahim Uddin", "O+")
//!             .with_status("active")
//!             .with_location("Dhaka", "Savar")
//!             .with_phone("01700000000"),
//!         DonorRecord::new("Karim Mia", "O+").with_status("inactive"),
//!     ];
//!     let criteria = FilterCriteria::new().with_blood_group("O+");
//!
//!     let exporter = DonorReportExporter::new(ExportOptions::new().with_output_dir("reports"));
//!     let artifact = exporter.export(&donors, &criteria)?;
//!     println!("{} pages, {} rows", artifact.pages, artifact.rows);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`normalize`]: records to fixed 7-column rows with placeholders
//! - [`header`]: title, timestamp and wrapped criteria summary
//! - [`layout`]: the [`TableLayout`] capability and the built-in [`GridLayout`]
//! - [`render`]: PDF (via `lopdf`), JSON and plain text output
//! - [`export`]: orchestration and atomic persistence

pub mod error;
pub mod export;
pub mod header;
pub mod layout;
pub mod locale;
pub mod model;
pub mod normalize;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use export::{
    generate_donor_pdf, ArtifactSink, CollisionPolicy, DonorReportExporter, ExportArtifact,
    ExportOptions, FileSink, MemorySink, REPORT_FILE_NAME,
};
pub use header::ReportHeader;
pub use layout::{CellStyle, GridLayout, GridOptions, TableLayout, TableSpec, TableTheme};
pub use locale::DateLocale;
pub use model::{DonorRecord, FilterCriteria, ReportDocument, TableRegion};
pub use normalize::{normalize_record, normalize_records, ReportRow, COLUMN_HEADERS};
pub use render::{JsonFormat, PdfOptions};

use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Shape of a records file: a bare array or an object wrapping one.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsFile {
    List(Vec<DonorRecord>),
    Wrapped { donors: Vec<DonorRecord> },
}

/// Parse donor records from JSON text.
///
/// Accepts either `[ {...}, ... ]` or `{ "donors": [ {...}, ... ] }`.
///
/// # Example
///
/// ```
/// use bloodline_report::parse_records;
///
/// let records = parse_records(r#"[{"name": "Rahim", "bloodGroup": "O+"}]"#).unwrap();
/// assert_eq!(records.len(), 1);
/// ```
pub fn parse_records(json: &str) -> Result<Vec<DonorRecord>> {
    let file: RecordsFile =
        serde_json::from_str(json).map_err(|e| Error::InvalidInput(e.to_string()))?;
    Ok(match file {
        RecordsFile::List(records) => records,
        RecordsFile::Wrapped { donors } => donors,
    })
}

/// Parse donor records from a reader.
pub fn read_records<R: Read>(mut reader: R) -> Result<Vec<DonorRecord>> {
    let mut json = String::new();
    reader.read_to_string(&mut json)?;
    parse_records(&json)
}

/// Parse donor records from a JSON file.
pub fn read_records_file<P: AsRef<Path>>(path: P) -> Result<Vec<DonorRecord>> {
    let file = std::fs::File::open(path)?;
    read_records(std::io::BufReader::new(file))
}
