//! PDF serialization using lopdf.

use crate::error::Result;
use crate::model::{Color, Element, Font, Rect, ReportDocument, ReportPage, TextBlock};
use chrono::{DateTime, FixedOffset};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Object, Stream, StringFormat};
use std::io::Write;
use unicode_normalization::UnicodeNormalization;

const PDF_VERSION: &str = "1.7";

/// Options for PDF output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfOptions {
    /// Deflate page content streams
    pub compress: bool,
}

impl PdfOptions {
    /// Create default options (uncompressed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable content stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// Render a report document to PDF bytes.
pub fn to_pdf(doc: &ReportDocument, options: &PdfOptions) -> Result<Vec<u8>> {
    let mut pdf = lopdf::Document::with_version(PDF_VERSION);
    let pages_id = pdf.new_object_id();

    let mut fonts = Dictionary::new();
    for font in Font::all() {
        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }
    let resources_id = pdf.add_object(dictionary! { "Font" => fonts });

    let width = doc.page_size.width;
    let height = doc.page_size.height;
    let mut kids = Vec::with_capacity(doc.pages.len());

    for page in &doc.pages {
        let content = page_content(page, height).encode()?;
        let stream = if options.compress {
            Stream::new(dictionary! { "Filter" => "FlateDecode" }, deflate(&content)?)
        } else {
            Stream::new(Dictionary::new(), content)
        };
        let content_id = pdf.add_object(stream);

        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.0_f32.into(), 0.0_f32.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);

    let info_id = pdf.add_object(info_dictionary(doc));
    pdf.trailer.set("Info", info_id);

    let mut out = Vec::new();
    pdf.save_to(&mut out)?;
    log::debug!("Rendered {} pages into {} bytes", page_count, out.len());
    Ok(out)
}

fn info_dictionary(doc: &ReportDocument) -> Dictionary {
    let mut info = Dictionary::new();
    if let Some(ref title) = doc.metadata.title {
        info.set("Title", Object::String(to_win_ansi(title), StringFormat::Literal));
    }
    if let Some(ref producer) = doc.metadata.producer {
        info.set(
            "Producer",
            Object::String(to_win_ansi(producer), StringFormat::Literal),
        );
    }
    if let Some(ref created) = doc.metadata.created {
        info.set("CreationDate", Object::string_literal(pdf_date(created)));
    }
    info
}

/// Format a timestamp as a PDF date string (`D:YYYYMMDDHHmmSS+HH'mm'`).
fn pdf_date(value: &DateTime<FixedOffset>) -> String {
    let offset = value.offset().local_minus_utc();
    let sign = if offset < 0 { '-' } else { '+' };
    let offset = offset.abs();
    format!(
        "D:{}{}{:02}'{:02}'",
        value.format("%Y%m%d%H%M%S"),
        sign,
        offset / 3600,
        (offset % 3600) / 60
    )
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn page_content(page: &ReportPage, page_height: f32) -> Content {
    let mut ops = Vec::new();
    for element in &page.elements {
        match element {
            Element::Rect(rect) => draw_rect(&mut ops, rect, page_height),
            Element::Text(text) => draw_text(&mut ops, text, page_height),
        }
    }
    Content { operations: ops }
}

fn color_operands(color: Color) -> Vec<Object> {
    color.to_unit().into_iter().map(Object::Real).collect()
}

fn draw_rect(ops: &mut Vec<Operation>, rect: &Rect, page_height: f32) {
    let paint = match (rect.fill, rect.stroke) {
        (Some(_), Some(_)) => "B",
        (Some(_), None) => "f",
        (None, Some(_)) => "S",
        (None, None) => return,
    };

    ops.push(Operation::new("q", vec![]));
    if let Some(fill) = rect.fill {
        ops.push(Operation::new("rg", color_operands(fill)));
    }
    if let Some(stroke) = rect.stroke {
        ops.push(Operation::new("RG", color_operands(stroke.color)));
        ops.push(Operation::new("w", vec![stroke.width.into()]));
    }
    let bottom = page_height - (rect.y + rect.height);
    ops.push(Operation::new(
        "re",
        vec![
            rect.x.into(),
            bottom.into(),
            rect.width.into(),
            rect.height.into(),
        ],
    ));
    ops.push(Operation::new(paint, vec![]));
    ops.push(Operation::new("Q", vec![]));
}

fn draw_text(ops: &mut Vec<Operation>, text: &TextBlock, page_height: f32) {
    if text.text.trim().is_empty() {
        return;
    }
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![
            Object::Name(text.font.resource_name().as_bytes().to_vec()),
            text.size.into(),
        ],
    ));
    ops.push(Operation::new("rg", color_operands(text.color)));
    ops.push(Operation::new(
        "Td",
        vec![text.x.into(), (page_height - text.y).into()],
    ));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(to_win_ansi(&text.text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

/// Encode text for the standard fonts' WinAnsiEncoding.
///
/// Text is NFC-normalized first so decomposed accents land on their Latin-1
/// code points. Characters with no WinAnsi code become `?`.
pub(crate) fn to_win_ansi(s: &str) -> Vec<u8> {
    s.nfc()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u8,
            _ => match c {
                '€' => 0x80,
                '‚' => 0x82,
                '…' => 0x85,
                '‘' => 0x91,
                '’' => 0x92,
                '“' => 0x93,
                '”' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                '™' => 0x99,
                _ => b'?',
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PageSize, Stroke};
    use chrono::TimeZone;

    fn sample_doc() -> ReportDocument {
        let mut doc = ReportDocument::new(PageSize::A4);
        doc.metadata.title = Some("Report".to_string());
        doc.push_text(TextBlock::new(40.0, 60.0, "Hello", 12.0));
        doc.push(Element::Rect(Rect {
            x: 40.0,
            y: 80.0,
            width: 100.0,
            height: 20.0,
            fill: Some(Color::rgb(220, 38, 38)),
            stroke: None,
        }));
        doc.add_page();
        doc.push_text(TextBlock::new(40.0, 60.0, "Second", 12.0));
        doc
    }

    #[test]
    fn test_to_pdf_header_and_pages() {
        let bytes = to_pdf(&sample_doc(), &PdfOptions::new()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));

        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 2);
    }

    #[test]
    fn test_uncompressed_content_is_readable() {
        let bytes = to_pdf(&sample_doc(), &PdfOptions::new()).unwrap();
        let haystack = String::from_utf8_lossy(&bytes);
        assert!(haystack.contains("(Hello) Tj"));
        assert!(haystack.contains("/Helvetica-Bold"));
    }

    #[test]
    fn test_compressed_output_still_loads() {
        let options = PdfOptions::new().with_compression(true);
        let bytes = to_pdf(&sample_doc(), &options).unwrap();
        assert!(!String::from_utf8_lossy(&bytes).contains("(Hello) Tj"));

        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 2);
    }

    #[test]
    fn test_page_content_flips_y() {
        let mut page = ReportPage::new(1);
        page.elements
            .push(Element::Text(TextBlock::new(10.0, 100.0, "x", 10.0)));
        let content = page_content(&page, 800.0);

        let td = content
            .operations
            .iter()
            .find(|op| op.operator == "Td")
            .unwrap();
        assert_eq!(td.operands[1].as_float().unwrap(), 700.0);
    }

    #[test]
    fn test_rect_paint_operator() {
        let mut ops = Vec::new();
        let rect = Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            fill: Some(Color::WHITE),
            stroke: Some(Stroke {
                color: Color::BLACK,
                width: 1.0,
            }),
        };
        draw_rect(&mut ops, &rect, 100.0);
        assert!(ops.iter().any(|op| op.operator == "B"));

        let mut ops = Vec::new();
        let bare = Rect {
            fill: None,
            stroke: None,
            ..rect
        };
        draw_rect(&mut ops, &bare, 100.0);
        assert!(ops.is_empty());
    }

    #[test]
    fn test_to_win_ansi() {
        assert_eq!(to_win_ansi("abc"), b"abc".to_vec());
        assert_eq!(to_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        // decomposed e + combining acute
        assert_eq!(to_win_ansi("cafe\u{301}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(to_win_ansi("রহিম"), b"????".to_vec());
        assert_eq!(to_win_ansi("a–b"), vec![b'a', 0x96, b'b']);
    }

    #[test]
    fn test_pdf_date() {
        let offset = FixedOffset::east_opt(6 * 3600).unwrap();
        let dt = offset.with_ymd_and_hms(2026, 10, 17, 9, 5, 0).unwrap();
        assert_eq!(pdf_date(&dt), "D:20261017090500+06'00'");
    }
}
