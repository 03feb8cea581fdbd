//! # pagetext
//!
//! Dump the plain text of every page of a PDF document into one text file.
//!
//! Each page's text is pulled with a simple, no-layout extraction, its
//! whitespace is normalized, and it is appended after a page marker:
//!
//! ```text
//!
//!
//! ===== PAGE 1 =====
//!
//! First page text
//!
//! ===== PAGE 2 =====
//!
//! [No text extracted]
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> pagetext::Result<()> {
//!     let summary = pagetext::extract_to_file("document.pdf", "extracted.txt")?;
//!     println!("{} pages", summary.pages);
//!     Ok(())
//! }
//! ```
//!
//! The PDF library sits behind the [`DocumentOpener`] and [`PageSource`]
//! traits; [`Extractor`] drives any implementation of them.

pub mod backend;
pub mod detect;
pub mod error;
pub mod extract;
pub mod normalize;

pub use backend::{DocumentOpener, LopdfDocument, LopdfOpener, PageSource};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use extract::{
    page_marker, write_pages, ErrorMode, ExtractOptions, ExtractionSummary, Extractor, PageSink,
    DEFAULT_OUTPUT, PAGE_PLACEHOLDER,
};
pub use normalize::{normalize, TextNormalizer};

use std::path::Path;

/// Extract every page of `pdf` into `out` with default options.
///
/// # Example
///
/// ```no_run
/// let summary = pagetext::extract_to_file("document.pdf", "extracted.txt").unwrap();
/// assert!(summary.pages > 0);
/// ```
pub fn extract_to_file<P: AsRef<Path>, Q: AsRef<Path>>(pdf: P, out: Q) -> Result<ExtractionSummary> {
    Extractor::default().run(pdf, out)
}

/// Extract every page of `pdf` with custom options.
pub fn extract_to_file_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    pdf: P,
    out: Q,
    options: ExtractOptions,
) -> Result<ExtractionSummary> {
    Extractor::default().with_options(options).run(pdf, out)
}

/// Normalized text of each page of `pdf`, in page order.
///
/// ```no_run
/// for (i, text) in pagetext::extract_pages("document.pdf")?.iter().enumerate() {
///     println!("page {}: {} chars", i + 1, text.len());
/// }
/// # Ok::<(), pagetext::Error>(())
/// ```
pub fn extract_pages<P: AsRef<Path>>(pdf: P) -> Result<Vec<String>> {
    Extractor::default().pages(pdf)
}
