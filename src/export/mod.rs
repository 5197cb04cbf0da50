//! Donor report export orchestration.
//!
//! An export runs in one pass: compose the header, normalize the records,
//! hand the table to the layout engine, render the PDF and persist it. Each
//! call builds its own document, so repeated or concurrent exports never
//! share state.
//!
//! # Example
//!
//! ```no_run
//! use bloodline_report::export::generate_donor_pdf;
//! use bloodline_report::model::{DonorRecord, FilterCriteria};
//!
//! fn main() -> bloodline_report::Result<()> {
//!     let donors = vec![DonorRecord::new("Rahim", "O+").with_status("active")];
//!     let criteria = FilterCriteria::new().with_blood_group("O+");
//!
//!     let artifact = generate_donor_pdf(&donors, &criteria)?;
//!     println!("Saved {}", artifact.path.display());
//!     Ok(())
//! }
//! ```

mod sink;

pub use sink::{ArtifactSink, CollisionPolicy, FileSink, MemorySink};

use crate::error::Result;
use crate::header::{ReportHeader, TITLE};
use crate::layout::{CellStyle, GridLayout, TableLayout, TableSpec, TableTheme};
use crate::locale::DateLocale;
use crate::model::{mm, Color, DonorRecord, FilterCriteria, PageSize, ReportDocument};
use crate::normalize::{column_headers, normalize_records};
use crate::render::{to_pdf, PdfOptions};
use chrono::{DateTime, FixedOffset, Local};
use std::path::PathBuf;

/// File name every export is saved under.
pub const REPORT_FILE_NAME: &str = "bloodline-donor-results.pdf";

/// Vertical offset of the table header on the first page, in millimetres.
pub const TABLE_START_MM: f32 = 50.0;

/// Header row fill.
pub const HEADER_FILL: Color = Color::rgb(220, 38, 38);

/// Header row text color.
pub const HEADER_TEXT: Color = Color::WHITE;

/// Body font size in points.
pub const BODY_FONT_SIZE: f32 = 8.0;

const PRODUCER: &str = concat!("bloodline-report ", env!("CARGO_PKG_VERSION"));

/// Options for report export.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Directory the report is saved in (current directory when empty)
    pub output_dir: PathBuf,

    /// Date and time presentation
    pub locale: DateLocale,

    /// Fixed generation time; the current local time when `None`
    pub generated_at: Option<DateTime<FixedOffset>>,

    /// Deflate page content streams
    pub compress: bool,

    /// Behaviour when the report file already exists
    pub collision: CollisionPolicy,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the date locale.
    pub fn with_locale(mut self, locale: DateLocale) -> Self {
        self.locale = locale;
        self
    }

    /// Pin the generation timestamp.
    pub fn with_generated_at(mut self, at: DateTime<FixedOffset>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set the collision policy.
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision = policy;
        self
    }

    /// Build the file sink these options describe.
    pub fn file_sink(&self) -> FileSink {
        let dir = if self.output_dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            self.output_dir.clone()
        };
        FileSink::new(dir).with_policy(self.collision)
    }
}

/// Result of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Where the report was saved
    pub path: PathBuf,

    /// Size of the PDF in bytes
    pub size: usize,

    /// Number of pages
    pub pages: u32,

    /// Number of table body rows
    pub rows: usize,
}

/// Table spec for a donor report: fixed header, offset and styling.
pub fn report_table_spec(rows: Vec<Vec<String>>) -> TableSpec {
    TableSpec::new(mm(TABLE_START_MM), column_headers())
        .with_rows(rows)
        .with_theme(TableTheme::Striped)
        .with_header_style(
            CellStyle::header()
                .with_fill(HEADER_FILL)
                .with_text_color(HEADER_TEXT)
                .with_font_size(BODY_FONT_SIZE + 1.0),
        )
        .with_body_style(CellStyle::body().with_font_size(BODY_FONT_SIZE))
}

/// Builds, renders and saves donor reports.
#[derive(Debug, Clone, Default)]
pub struct DonorReportExporter<L = GridLayout> {
    options: ExportOptions,
    layout: L,
}

impl DonorReportExporter<GridLayout> {
    /// Create an exporter using the built-in grid layout.
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            layout: GridLayout::new(),
        }
    }
}

impl<L: TableLayout> DonorReportExporter<L> {
    /// Create an exporter with a custom table layout engine.
    pub fn with_layout(options: ExportOptions, layout: L) -> Self {
        Self { options, layout }
    }

    /// Get the export options.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Get the table layout engine.
    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Lay out the report without rendering it.
    pub fn build(&self, records: &[DonorRecord], criteria: &FilterCriteria) -> Result<ReportDocument> {
        let generated = self
            .options
            .generated_at
            .unwrap_or_else(|| Local::now().fixed_offset());

        let mut doc = ReportDocument::new(PageSize::A4);
        doc.metadata.title = Some(TITLE.to_string());
        doc.metadata.producer = Some(PRODUCER.to_string());
        doc.metadata.created = Some(generated);

        ReportHeader::compose(&generated.naive_local(), criteria, self.options.locale)
            .place(&mut doc);

        let rows = normalize_records(records, self.options.locale)
            .into_iter()
            .map(Vec::from)
            .collect();
        let spec = report_table_spec(rows);
        self.layout.layout(&mut doc, &spec)?;

        log::debug!(
            "Built donor report with {} rows on {} pages using {} layout",
            records.len(),
            doc.page_count(),
            self.layout.name()
        );
        Ok(doc)
    }

    /// Lay out and render the report to PDF bytes.
    pub fn render(&self, records: &[DonorRecord], criteria: &FilterCriteria) -> Result<Vec<u8>> {
        let doc = self.build(records, criteria)?;
        to_pdf(&doc, &self.pdf_options())
    }

    /// Export into the directory named by the options.
    pub fn export(
        &self,
        records: &[DonorRecord],
        criteria: &FilterCriteria,
    ) -> Result<ExportArtifact> {
        self.export_to(records, criteria, &self.options.file_sink())
    }

    /// Export into an arbitrary sink.
    pub fn export_to(
        &self,
        records: &[DonorRecord],
        criteria: &FilterCriteria,
        sink: &dyn ArtifactSink,
    ) -> Result<ExportArtifact> {
        let doc = self.build(records, criteria)?;
        let bytes = to_pdf(&doc, &self.pdf_options())?;
        let path = sink.persist(REPORT_FILE_NAME, &bytes)?;

        Ok(ExportArtifact {
            path,
            size: bytes.len(),
            pages: doc.page_count(),
            rows: doc.body_row_count(),
        })
    }

    fn pdf_options(&self) -> PdfOptions {
        PdfOptions::new().with_compression(self.options.compress)
    }
}

/// Export `records` with default options into the current directory.
pub fn generate_donor_pdf(
    records: &[DonorRecord],
    criteria: &FilterCriteria,
) -> Result<ExportArtifact> {
    DonorReportExporter::new(ExportOptions::default()).export(records, criteria)
}
