//! Error types for the report exporter.

use std::io;
use thiserror::Error;

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or saving a report.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when writing the artifact.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error raised by the PDF object writer.
    #[error("PDF writing error: {0}")]
    Pdf(String),

    /// The table could not be laid out (bad column count, unknown theme).
    #[error("Table layout error: {0}")]
    Layout(String),

    /// Error during rendering (PDF, JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Input records could not be read.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io(err.error)
    }
}
