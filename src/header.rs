//! Document header composition: title, timestamp and criteria summary.

use crate::layout::wrap_text;
use crate::locale::DateLocale;
use crate::model::{mm, Font, FilterCriteria, ReportDocument, TextBlock};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Report title.
pub const TITLE: &str = "BloodLine Donor Search Results";

/// Maximum width of a criteria line, in millimetres.
pub const CRITERIA_WRAP_MM: f32 = 180.0;

const LEFT_MM: f32 = 14.0;
const TITLE_Y_MM: f32 = 22.0;
const TIMESTAMP_Y_MM: f32 = 30.0;
const CRITERIA_Y_MM: f32 = 38.0;

const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 11.0;

/// Composed header text, before placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportHeader {
    /// Fixed report title
    pub title: String,

    /// `Generated on: <date> <time>`
    pub generated: String,

    /// Criteria summary, wrapped to the maximum line width
    pub criteria_lines: Vec<String>,
}

impl ReportHeader {
    /// Compose the header for a generation time and criteria.
    pub fn compose(now: &NaiveDateTime, criteria: &FilterCriteria, locale: DateLocale) -> Self {
        Self {
            title: TITLE.to_string(),
            generated: format!("Generated on: {}", locale.format_date_time(now)),
            criteria_lines: wrap_text(
                &criteria.summary(),
                Font::Helvetica,
                BODY_SIZE,
                mm(CRITERIA_WRAP_MM),
            ),
        }
    }

    /// Write the header onto the current page at its fixed offsets.
    pub fn place(&self, doc: &mut ReportDocument) {
        let x = mm(LEFT_MM);
        doc.push_text(
            TextBlock::new(x, mm(TITLE_Y_MM), self.title.clone(), TITLE_SIZE)
                .with_font(Font::HelveticaBold),
        );
        doc.push_text(TextBlock::new(
            x,
            mm(TIMESTAMP_Y_MM),
            self.generated.clone(),
            BODY_SIZE,
        ));

        let line_height = BODY_SIZE * 1.15;
        for (i, line) in self.criteria_lines.iter().enumerate() {
            doc.push_text(TextBlock::new(
                x,
                mm(CRITERIA_Y_MM) + i as f32 * line_height,
                line.clone(),
                BODY_SIZE,
            ));
        }
    }
}
