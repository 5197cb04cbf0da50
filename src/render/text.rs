//! Plain text rendering of laid-out reports.

use crate::model::ReportDocument;

/// Convert a report document to plain text, one line per text block, with a
/// marker line before every page.
pub fn to_text(doc: &ReportDocument) -> String {
    let mut output = String::new();

    for page in &doc.pages {
        output.push_str(&format!("--- Page {} ---\n", page.number));
        for text in page.texts() {
            output.push_str(&text.text);
            output.push('\n');
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextBlock;

    #[test]
    fn test_to_text() {
        let mut doc = ReportDocument::default();
        doc.push_text(TextBlock::new(0.0, 0.0, "Title", 18.0));
        doc.add_page();
        doc.push_text(TextBlock::new(0.0, 0.0, "More", 10.0));

        let text = to_text(&doc);
        assert_eq!(text, "--- Page 1 ---\nTitle\n--- Page 2 ---\nMore\n");
    }
}
