//! Table layout capability.
//!
//! The exporter does not place table cells itself. It hands a [`TableSpec`]
//! to a [`TableLayout`] implementation, which writes rows into the document
//! and adds pages as needed. [`GridLayout`] is the built-in implementation.
//!
//! # Example
//!
//! ```
//! use bloodline_report::layout::{GridLayout, TableLayout, TableSpec};
//! use bloodline_report::model::{mm, PageSize, ReportDocument};
//!
//! fn main() -> bloodline_report::Result<()> {
//!     let mut doc = ReportDocument::new(PageSize::A4);
//!     let spec = TableSpec::new(mm(20.0), vec!["Name".into(), "Group".into()])
//!         .with_rows(vec![vec!["Rahim".into(), "O+".into()]]);
//!
//!     let region = GridLayout::new().layout(&mut doc, &spec)?;
//!     assert_eq!(region.body_rows, 1);
//!     Ok(())
//! }
//! ```

mod grid;
pub mod metrics;

pub use grid::{GridLayout, GridOptions};
pub use metrics::{text_width, wrap_text};

use crate::error::{Error, Result};
use crate::model::{Color, Font, ReportDocument, TableRegion};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Trait for table layout engines.
///
/// Implementations mutate the document in place and report where the table
/// ended up. Errors are returned as-is to the caller of the export.
pub trait TableLayout {
    /// Get the name of this layout engine.
    fn name(&self) -> &str;

    /// Lay out `spec` into `doc`, starting on the current page.
    fn layout(&self, doc: &mut ReportDocument, spec: &TableSpec) -> Result<TableRegion>;
}

/// Visual theme of a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableTheme {
    /// Filled header, alternating body row shading
    #[default]
    Striped,
    /// Filled header, every cell outlined
    Grid,
    /// No fills or outlines
    Plain,
}

impl FromStr for TableTheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "striped" => Ok(TableTheme::Striped),
            "grid" => Ok(TableTheme::Grid),
            "plain" => Ok(TableTheme::Plain),
            other => Err(Error::Layout(format!("Unsupported table theme: {}", other))),
        }
    }
}

/// Styling applied to a group of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellStyle {
    /// Background fill
    pub fill: Option<Color>,

    /// Text color
    pub text_color: Color,

    /// Font face
    pub font: Font,

    /// Font size in points
    pub font_size: f32,
}

impl CellStyle {
    /// Default header style: bold on a dark fill.
    pub fn header() -> Self {
        Self {
            fill: Some(Color::rgb(41, 128, 185)),
            text_color: Color::WHITE,
            font: Font::HelveticaBold,
            font_size: 10.0,
        }
    }

    /// Default body style.
    pub fn body() -> Self {
        Self {
            fill: None,
            text_color: Color::rgb(33, 33, 33),
            font: Font::Helvetica,
            font_size: 10.0,
        }
    }

    /// Set the fill.
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Set the text color.
    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }
}

/// Everything a layout engine needs to place one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Vertical offset of the header row on the current page, in points
    pub start_offset: f32,

    /// Column headers
    pub header: Vec<String>,

    /// Body rows; each must have as many cells as `header`
    pub body_rows: Vec<Vec<String>>,

    /// Visual theme
    pub theme: TableTheme,

    /// Header cell style
    pub header_style: CellStyle,

    /// Body cell style
    pub body_style: CellStyle,
}

impl TableSpec {
    /// Create a spec with default styling and no rows.
    pub fn new(start_offset: f32, header: Vec<String>) -> Self {
        Self {
            start_offset,
            header,
            body_rows: Vec::new(),
            theme: TableTheme::default(),
            header_style: CellStyle::header(),
            body_style: CellStyle::body(),
        }
    }

    /// Set the body rows.
    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.body_rows = rows;
        self
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: TableTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the header style.
    pub fn with_header_style(mut self, style: CellStyle) -> Self {
        self.header_style = style;
        self
    }

    /// Set the body style.
    pub fn with_body_style(mut self, style: CellStyle) -> Self {
        self.body_style = style;
        self
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Check that every row has the header's arity.
    pub fn validate(&self) -> Result<()> {
        if self.header.is_empty() {
            return Err(Error::Layout("Table has no columns".into()));
        }
        let expected = self.header.len();
        for (i, row) in self.body_rows.iter().enumerate() {
            if row.len() != expected {
                return Err(Error::Layout(format!(
                    "Row {} has {} cells, expected {}",
                    i + 1,
                    row.len(),
                    expected
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_str() {
        assert_eq!("striped".parse::<TableTheme>().unwrap(), TableTheme::Striped);
        assert_eq!("GRID".parse::<TableTheme>().unwrap(), TableTheme::Grid);
        assert_eq!(" plain ".parse::<TableTheme>().unwrap(), TableTheme::Plain);

        let err = "fancy".parse::<TableTheme>().unwrap_err();
        assert!(matches!(err, Error::Layout(_)));
    }

    #[test]
    fn test_validate_arity() {
        let spec = TableSpec::new(0.0, vec!["A".into(), "B".into()])
            .with_rows(vec![vec!["1".into(), "2".into()], vec!["3".into()]]);
        let err = spec.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Table layout error: Row 2 has 1 cells, expected 2"
        );
    }

    #[test]
    fn test_validate_empty_header() {
        let spec = TableSpec::new(0.0, Vec::new());
        assert!(matches!(spec.validate(), Err(Error::Layout(_))));
    }

    #[test]
    fn test_spec_builder() {
        let spec = TableSpec::new(10.0, vec!["A".into()])
            .with_theme(TableTheme::Grid)
            .with_body_style(CellStyle::body().with_font_size(8.0));
        assert_eq!(spec.theme, TableTheme::Grid);
        assert_eq!(spec.body_style.font_size, 8.0);
        assert_eq!(spec.column_count(), 1);
    }
}
