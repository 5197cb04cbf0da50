//! Data model for donor report export.
//!
//! Input types ([`DonorRecord`], [`FilterCriteria`]) arrive from the search
//! front end; [`ReportDocument`] is the laid-out artifact handed to the
//! renderer.

mod criteria;
mod record;
mod report;

pub use criteria::{FilterCriteria, ALL_PLACEHOLDER};
pub use record::{DonorRecord, ACTIVE_STATUS};
pub use report::{
    mm, Color, Element, Font, PageSize, Rect, ReportDocument, ReportMetadata, ReportPage, Stroke,
    TableRegion, TextBlock, PT_PER_MM,
};
