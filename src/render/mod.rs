//! Rendering module for converting report documents to output formats.

mod json;
mod pdf;
mod text;

pub use json::{to_json, JsonFormat};
pub use pdf::{to_pdf, PdfOptions};
pub use text::to_text;
