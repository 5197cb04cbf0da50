//! Built-in grid table layout.

use super::metrics::{text_width, wrap_text};
use super::{CellStyle, TableLayout, TableSpec, TableTheme};
use crate::error::Result;
use crate::model::{mm, Color, Element, Rect, ReportDocument, Stroke, TableRegion, TextBlock};

/// Fraction of the font size between the top of a line box and the baseline.
const BASELINE_RATIO: f32 = 0.85;

/// Tunables for [`GridLayout`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    /// Left, right, top (on continuation pages) and bottom margin, in points
    pub margin: f32,

    /// Padding inside every cell, in points
    pub cell_padding: f32,

    /// Line height as a multiple of the font size
    pub line_height: f32,

    /// Fill of alternate body rows for [`TableTheme::Striped`]
    pub stripe_fill: Color,

    /// Outline of cells for [`TableTheme::Grid`]
    pub grid_stroke: Stroke,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            margin: mm(14.0),
            cell_padding: mm(1.5),
            line_height: 1.15,
            stripe_fill: Color::rgb(245, 245, 245),
            grid_stroke: Stroke {
                color: Color::rgb(200, 200, 200),
                width: 0.5,
            },
        }
    }
}

/// Lays tables out as rows of wrapped cells, breaking pages between rows
/// and repeating the header row at the top of every page.
#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    options: GridOptions,
}

/// A row whose cells are already wrapped to their column widths.
struct WrappedRow {
    cells: Vec<Vec<String>>,
    height: f32,
}

/// Paint settings resolved from the theme for one row.
struct RowPaint<'a> {
    style: &'a CellStyle,
    fill: Option<Color>,
    stroke: Option<Stroke>,
    text_color: Color,
}

impl GridLayout {
    /// Create a layout with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layout with custom options.
    pub fn with_options(options: GridOptions) -> Self {
        Self { options }
    }

    /// Get the options.
    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Compute column widths that exactly fill `usable` points.
    ///
    /// When every column fits at its natural width, each gets a share
    /// proportional to its widest cell. Otherwise each column first gets room
    /// for its longest word (capped at an even split), and only the space left
    /// over is shared out by how much more each column would like.
    pub fn column_widths(&self, spec: &TableSpec, usable: f32) -> Vec<f32> {
        let columns = spec.column_count();
        let padding = 2.0 * self.options.cell_padding;
        let header_width = |text: &str| {
            text_width(text, spec.header_style.font, spec.header_style.font_size)
        };
        let body_width =
            |text: &str| text_width(text, spec.body_style.font, spec.body_style.font_size);

        let natural: Vec<f32> = (0..columns)
            .map(|col| {
                let body = spec
                    .body_rows
                    .iter()
                    .map(|row| body_width(&row[col]))
                    .fold(0.0_f32, f32::max);
                header_width(&spec.header[col]).max(body) + padding
            })
            .collect();

        let total: f32 = natural.iter().sum();
        if total <= 0.0 {
            let even = usable / columns.max(1) as f32;
            return vec![even; columns];
        }
        if total <= usable {
            return natural.iter().map(|w| w * usable / total).collect();
        }

        let cap = usable / columns as f32;
        let floors: Vec<f32> = (0..columns)
            .map(|col| {
                let header = longest_word(&spec.header[col], &header_width);
                let body = spec
                    .body_rows
                    .iter()
                    .map(|row| longest_word(&row[col], &body_width))
                    .fold(0.0_f32, f32::max);
                // one point of slack keeps rounding from splitting the word
                (header.max(body) + padding + 1.0).min(cap)
            })
            .collect();

        let spare = usable - floors.iter().sum::<f32>();
        let wants: Vec<f32> = natural
            .iter()
            .zip(&floors)
            .map(|(n, f)| (n - f).max(0.0))
            .collect();
        let wanted: f32 = wants.iter().sum();
        if wanted <= 0.0 {
            let floor_total: f32 = floors.iter().sum();
            return floors.iter().map(|f| f * usable / floor_total).collect();
        }

        floors
            .iter()
            .zip(&wants)
            .map(|(f, w)| f + spare * w / wanted)
            .collect()
    }

    fn wrap_row(&self, cells: &[String], widths: &[f32], style: &CellStyle) -> WrappedRow {
        let padding = 2.0 * self.options.cell_padding;
        let cells: Vec<Vec<String>> = cells
            .iter()
            .zip(widths)
            .map(|(text, width)| {
                wrap_text(text, style.font, style.font_size, (width - padding).max(0.0))
            })
            .collect();
        let max_lines = cells.iter().map(Vec::len).max().unwrap_or(1);
        let height = max_lines as f32 * style.font_size * self.options.line_height + padding;
        WrappedRow { cells, height }
    }

    fn draw_row(
        &self,
        doc: &mut ReportDocument,
        row: &WrappedRow,
        widths: &[f32],
        top: f32,
        paint: &RowPaint<'_>,
    ) {
        let pad = self.options.cell_padding;
        let size = paint.style.font_size;
        let mut x = self.options.margin;

        for (lines, width) in row.cells.iter().zip(widths) {
            if paint.fill.is_some() || paint.stroke.is_some() {
                doc.push(Element::Rect(Rect {
                    x,
                    y: top,
                    width: *width,
                    height: row.height,
                    fill: paint.fill,
                    stroke: paint.stroke,
                }));
            }

            for (i, line) in lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let baseline =
                    top + pad + i as f32 * size * self.options.line_height + size * BASELINE_RATIO;
                doc.push_text(
                    TextBlock::new(x + pad, baseline, line.clone(), size)
                        .with_font(paint.style.font)
                        .with_color(paint.text_color),
                );
            }
            x += width;
        }
    }

    fn header_paint<'a>(&self, spec: &'a TableSpec) -> RowPaint<'a> {
        match spec.theme {
            TableTheme::Striped => RowPaint {
                style: &spec.header_style,
                fill: spec.header_style.fill,
                stroke: None,
                text_color: spec.header_style.text_color,
            },
            TableTheme::Grid => RowPaint {
                style: &spec.header_style,
                fill: spec.header_style.fill,
                stroke: Some(self.options.grid_stroke),
                text_color: spec.header_style.text_color,
            },
            TableTheme::Plain => RowPaint {
                style: &spec.header_style,
                fill: None,
                stroke: None,
                text_color: spec.body_style.text_color,
            },
        }
    }

    fn body_paint<'a>(&self, spec: &'a TableSpec, index: usize) -> RowPaint<'a> {
        let (fill, stroke) = match spec.theme {
            TableTheme::Striped if index % 2 == 1 => (Some(self.options.stripe_fill), None),
            TableTheme::Striped => (spec.body_style.fill, None),
            TableTheme::Grid => (spec.body_style.fill, Some(self.options.grid_stroke)),
            TableTheme::Plain => (None, None),
        };
        RowPaint {
            style: &spec.body_style,
            fill,
            stroke,
            text_color: spec.body_style.text_color,
        }
    }
}

fn longest_word(text: &str, width: &impl Fn(&str) -> f32) -> f32 {
    text.split_whitespace().map(width).fold(0.0_f32, f32::max)
}

impl TableLayout for GridLayout {
    fn name(&self) -> &str {
        "grid"
    }

    fn layout(&self, doc: &mut ReportDocument, spec: &TableSpec) -> Result<TableRegion> {
        spec.validate()?;

        let page = doc.page_size;
        let margin = self.options.margin;
        let bottom = page.height - margin;
        let widths = self.column_widths(spec, page.width - 2.0 * margin);

        let header = self.wrap_row(&spec.header, &widths, &spec.header_style);
        let header_paint = self.header_paint(spec);

        let mut y = spec.start_offset;
        if y + header.height > bottom {
            log::debug!("Table header does not fit at offset {:.1}, starting a new page", y);
            doc.add_page();
            y = margin;
        }
        let first_page = doc.current_page();
        self.draw_row(doc, &header, &widths, y, &header_paint);
        y += header.height;

        let mut rows_on_page = 0usize;
        for (index, cells) in spec.body_rows.iter().enumerate() {
            let row = self.wrap_row(cells, &widths, &spec.body_style);

            if y + row.height > bottom && rows_on_page > 0 {
                let page_no = doc.add_page();
                log::debug!("Row {} starts page {}", index + 1, page_no);
                y = margin;
                self.draw_row(doc, &header, &widths, y, &header_paint);
                y += header.height;
                rows_on_page = 0;
            }

            if y + row.height > bottom {
                log::warn!(
                    "Row {} is taller than the printable area ({:.1}pt) and will overflow",
                    index + 1,
                    row.height
                );
            }

            self.draw_row(doc, &row, &widths, y, &self.body_paint(spec, index));
            y += row.height;
            rows_on_page += 1;
        }

        let region = TableRegion {
            header: spec.header.clone(),
            body_rows: spec.body_rows.len(),
            first_page,
            last_page: doc.current_page(),
            end_offset: y,
        };
        log::debug!(
            "Laid out {} rows over pages {}..={}",
            region.body_rows,
            region.first_page,
            region.last_page
        );
        doc.tables.push(region.clone());
        Ok(region)
    }
}
