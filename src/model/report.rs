//! In-memory report document.
//!
//! A [`ReportDocument`] is a list of pages holding absolutely positioned
//! elements. Coordinates are PDF points measured from the top-left corner of
//! the page; the renderer flips them into PDF user space.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Convert millimetres to points.
pub fn mm(value: f32) -> f32 {
    value * PT_PER_MM
}

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
}

impl PageSize {
    /// ISO A4 portrait.
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Create a color from components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components scaled to the 0..=1 range used by PDF color operators.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Built-in fonts available to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Font {
    #[default]
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// PostScript name of the standard Type1 font.
    pub fn base_font(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Name of the font in the page resource dictionary.
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    /// All fonts, in resource order.
    pub fn all() -> [Font; 2] {
        [Font::Helvetica, Font::HelveticaBold]
    }
}

/// A single line of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Left edge
    pub x: f32,
    /// Baseline, measured from the top of the page
    pub y: f32,
    /// Text content
    pub text: String,
    /// Font face
    pub font: Font,
    /// Font size in points
    pub size: f32,
    /// Fill color
    pub color: Color,
}

impl TextBlock {
    /// Create a black Helvetica text line.
    pub fn new(x: f32, y: f32, text: impl Into<String>, size: f32) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            font: Font::Helvetica,
            size,
            color: Color::BLACK,
        }
    }

    /// Set the font.
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    /// Set the color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Outline settings for a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

/// A filled and/or stroked rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge, measured from the top of the page
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

/// A positioned element on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text(TextBlock),
    Rect(Rect),
}

/// A page of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPage {
    /// Page number (1-indexed)
    pub number: u32,

    /// Elements in paint order
    pub elements: Vec<Element>,
}

impl ReportPage {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            elements: Vec::new(),
        }
    }

    /// Iterate over the text blocks on the page.
    pub fn texts(&self) -> impl Iterator<Item = &TextBlock> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text(t) => Some(t),
            Element::Rect(_) => None,
        })
    }

    /// Text of the page, one line per text block.
    pub fn plain_text(&self) -> String {
        self.texts()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Where a laid-out table ended up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRegion {
    /// Column headers
    pub header: Vec<String>,

    /// Number of body rows placed
    pub body_rows: usize,

    /// Page holding the header row
    pub first_page: u32,

    /// Page holding the last row
    pub last_page: u32,

    /// Vertical offset just below the last row on `last_page`
    pub end_offset: f32,
}

/// Document-level information written into the PDF info dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Document title
    pub title: Option<String>,

    /// Generation time
    pub created: Option<DateTime<FixedOffset>>,

    /// Producing application
    pub producer: Option<String>,
}

/// The in-memory report prior to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Document metadata
    pub metadata: ReportMetadata,

    /// Size shared by every page
    pub page_size: PageSize,

    /// Pages in order
    pub pages: Vec<ReportPage>,

    /// Tables laid out on the pages
    pub tables: Vec<TableRegion>,
}

impl ReportDocument {
    /// Create a document with a single empty page.
    pub fn new(page_size: PageSize) -> Self {
        Self {
            metadata: ReportMetadata::default(),
            page_size,
            pages: vec![ReportPage::new(1)],
            tables: Vec::new(),
        }
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Append an empty page and return its number.
    pub fn add_page(&mut self) -> u32 {
        let number = self.page_count() + 1;
        self.pages.push(ReportPage::new(number));
        number
    }

    /// Get a page by number (1-indexed).
    pub fn page(&self, number: u32) -> Option<&ReportPage> {
        if number == 0 {
            return None;
        }
        self.pages.get((number - 1) as usize)
    }

    /// The page new content is written to.
    pub fn current_page(&self) -> u32 {
        self.page_count()
    }

    /// Push an element onto the current page.
    pub fn push(&mut self, element: Element) {
        if self.pages.is_empty() {
            self.pages.push(ReportPage::new(1));
        }
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    /// Push a text block onto the current page.
    pub fn push_text(&mut self, text: TextBlock) {
        self.push(Element::Text(text));
    }

    /// Total body rows over all tables.
    pub fn body_row_count(&self) -> usize {
        self.tables.iter().map(|t| t.body_rows).sum()
    }

    /// Text of every page, pages separated by a blank line.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for ReportDocument {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}
