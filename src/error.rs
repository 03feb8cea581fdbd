//! Error types for pagetext.

use std::io;
use thiserror::Error;

/// Result type alias for pagetext operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting page text.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the source document.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header carries a version we cannot read.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Text extraction failed for a single page (1-based page number).
    #[error("Text extraction failed on page {page}: {message}")]
    PageText { page: usize, message: String },

    /// Page index is out of range.
    #[error("Page index {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Writing to the output sink failed.
    #[error("Failed to write {target}: {source}")]
    Write {
        target: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Whether this error means the source document could not be opened.
    pub fn is_open_error(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::UnknownFormat
                | Error::UnsupportedVersion(_)
                | Error::Encrypted
                | Error::PdfParse(_)
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
