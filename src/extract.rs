//! Page-by-page extraction driver.
//!
//! A run opens the document, walks its pages in order, normalizes each
//! page's text, and appends one block per page to the output:
//!
//! ```text
//! \n\n===== PAGE 1 =====\n\n<text of page 1>\n\n===== PAGE 2 =====\n\n<text of page 2>
//! ```
//!
//! Pages whose normalized text is empty get [`PAGE_PLACEHOLDER`] as body.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::backend::{DocumentOpener, LopdfOpener, PageSource};
use crate::error::{Error, Result};
use crate::normalize::normalize;

/// Body written for pages without any text.
pub const PAGE_PLACEHOLDER: &str = "[No text extracted]";

/// Output path used when none is given.
pub const DEFAULT_OUTPUT: &str = "extracted.txt";

/// Marker that opens the block of a 1-based page number.
pub fn page_marker(number: usize) -> String {
    format!("\n\n===== PAGE {} =====\n\n", number)
}

/// How a failing page is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Abort the run on the first page that fails.
    #[default]
    Strict,
    /// Log the failure and write the placeholder for that page.
    Lenient,
}

/// Options for an extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Per-page error handling
    pub error_mode: ErrorMode,

    /// Body for pages with no text
    pub placeholder: String,
}

impl ExtractOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Keep going past pages that fail to extract.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the body written for empty pages.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            placeholder: PAGE_PLACEHOLDER.to_string(),
        }
    }
}

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Pages written
    pub pages: usize,
    /// Pages written with the placeholder because they had no text
    pub empty_pages: usize,
    /// Pages that failed in lenient mode and were replaced by the placeholder
    pub recovered_pages: usize,
    /// Characters of normalized text written, excluding markers
    pub chars: usize,
}

/// Append-only output for page blocks.
pub struct PageSink<W: Write> {
    writer: W,
    target: String,
}

impl<W: Write> PageSink<W> {
    /// Wrap a writer. `target` names it in error messages.
    pub fn new(writer: W, target: impl Into<String>) -> Self {
        Self {
            writer,
            target: target.into(),
        }
    }

    /// Append the block for a 1-based page number.
    pub fn write_page(&mut self, number: usize, body: &str) -> Result<()> {
        let marker = page_marker(number);
        self.writer
            .write_all(marker.as_bytes())
            .and_then(|_| self.writer.write_all(body.as_bytes()))
            .map_err(|e| self.write_error(e))
    }

    /// Flush and hand back the writer.
    pub fn finish(mut self) -> Result<W> {
        match self.writer.flush() {
            Ok(()) => Ok(self.writer),
            Err(e) => Err(self.write_error(e)),
        }
    }

    fn write_error(&self, source: std::io::Error) -> Error {
        Error::Write {
            target: self.target.clone(),
            source,
        }
    }
}

/// Raw text of a page, or `None` when it failed and `mode` is lenient.
fn page_text_or_recover<D>(doc: &D, index: usize, mode: ErrorMode) -> Result<Option<String>>
where
    D: PageSource + ?Sized,
{
    match doc.page_text(index) {
        Ok(text) => Ok(Some(text)),
        Err(e) if mode == ErrorMode::Lenient => {
            log::warn!("Failed to extract text from page {}: {}", index + 1, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Write every page of `doc` to `sink`, in order.
pub fn write_pages<D, W>(
    doc: &D,
    sink: &mut PageSink<W>,
    options: &ExtractOptions,
) -> Result<ExtractionSummary>
where
    D: PageSource + ?Sized,
    W: Write,
{
    let mut summary = ExtractionSummary::default();

    for index in 0..doc.page_count() {
        let number = index + 1;

        let raw = page_text_or_recover(doc, index, options.error_mode)?;
        let recovered = raw.is_none();
        if recovered {
            summary.recovered_pages += 1;
        }
        let raw = raw.unwrap_or_default();

        let text = normalize(&raw);
        log::debug!(
            "page {}: {} raw bytes, {} normalized bytes",
            number,
            raw.len(),
            text.len()
        );

        if text.is_empty() {
            if !recovered {
                summary.empty_pages += 1;
            }
            sink.write_page(number, &options.placeholder)?;
        } else {
            summary.chars += text.chars().count();
            sink.write_page(number, &text)?;
        }
        summary.pages += 1;
    }

    Ok(summary)
}

/// Runs extraction from a source path to an output file.
///
/// ```no_run
/// use pagetext::Extractor;
///
/// let summary = Extractor::default().run("document.pdf", "extracted.txt")?;
/// println!("{} pages", summary.pages);
/// # Ok::<(), pagetext::Error>(())
/// ```
pub struct Extractor<O: DocumentOpener> {
    opener: O,
    options: ExtractOptions,
}

impl<O: DocumentOpener> Extractor<O> {
    /// Create an extractor over a document opener.
    pub fn new(opener: O) -> Self {
        Self {
            opener,
            options: ExtractOptions::default(),
        }
    }

    /// Replace the run options.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Extract `pdf` into `out`, creating or overwriting it.
    ///
    /// The document is opened before the output file is touched, so a
    /// source that cannot be opened leaves `out` as it was.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(&self, pdf: P, out: Q) -> Result<ExtractionSummary> {
        let pdf = pdf.as_ref();
        let out = out.as_ref();

        let doc = self.opener.open(pdf)?;
        log::info!("Opened {} ({} pages)", pdf.display(), doc.page_count());

        let target = out.display().to_string();
        let file = File::create(out).map_err(|source| Error::Write {
            target: target.clone(),
            source,
        })?;
        let mut sink = PageSink::new(BufWriter::new(file), target);

        let summary = write_pages(&doc, &mut sink, &self.options)?;
        sink.finish()?;

        log::info!(
            "Wrote {} pages to {} ({} empty, {} recovered)",
            summary.pages,
            out.display(),
            summary.empty_pages,
            summary.recovered_pages
        );
        Ok(summary)
    }

    /// Extract normalized page texts into memory, in page order.
    ///
    /// Empty pages yield empty strings; no placeholder is substituted.
    pub fn pages<P: AsRef<Path>>(&self, pdf: P) -> Result<Vec<String>> {
        let doc = self.opener.open(pdf.as_ref())?;
        (0..doc.page_count())
            .map(|index| {
                let raw = page_text_or_recover(&doc, index, self.options.error_mode)?;
                Ok(raw.map(|text| normalize(&text)).unwrap_or_default())
            })
            .collect()
    }
}

impl Default for Extractor<LopdfOpener> {
    fn default() -> Self {
        Self::new(LopdfOpener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// In-memory document. `None` pages fail to extract.
    struct FakeDocument {
        pages: Vec<Option<&'static str>>,
        requested: RefCell<Vec<usize>>,
    }

    impl FakeDocument {
        fn new(pages: Vec<Option<&'static str>>) -> Self {
            Self {
                pages,
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl PageSource for FakeDocument {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page_text(&self, index: usize) -> Result<String> {
            self.requested.borrow_mut().push(index);
            match self.pages.get(index) {
                Some(Some(text)) => Ok(text.to_string()),
                Some(None) => Err(Error::PageText {
                    page: index + 1,
                    message: "broken content stream".to_string(),
                }),
                None => Err(Error::PageOutOfRange(index, self.pages.len())),
            }
        }
    }

    struct FakeOpener(Vec<Option<&'static str>>);

    impl DocumentOpener for FakeOpener {
        type Document = FakeDocument;

        fn open(&self, path: &Path) -> Result<FakeDocument> {
            if path.ends_with("missing.pdf") {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no such file",
                )));
            }
            Ok(FakeDocument::new(self.0.clone()))
        }
    }

    fn render(doc: &FakeDocument, options: &ExtractOptions) -> Result<(String, ExtractionSummary)> {
        let mut sink = PageSink::new(Vec::new(), "memory");
        let summary = write_pages(doc, &mut sink, options)?;
        let bytes = sink.finish()?;
        Ok((String::from_utf8(bytes).unwrap(), summary))
    }

    #[test]
    fn test_extractor_pages_lenient() {
        let extractor = Extractor::new(FakeOpener(vec![Some("one"), None, Some(" three ")]));
        assert!(matches!(
            extractor.pages("input.pdf"),
            Err(Error::PageText { page: 2, .. })
        ));

        let extractor = extractor.with_options(ExtractOptions::new().lenient());
        assert_eq!(extractor.pages("input.pdf").unwrap(), vec!["one", "", "three"]);
    }

    #[test]
    fn test_page_text_or_recover() {
        let doc = FakeDocument::new(vec![Some("a"), None]);
        assert_eq!(
            page_text_or_recover(&doc, 0, ErrorMode::Strict).unwrap(),
            Some("a".to_string())
        );
        assert!(page_text_or_recover(&doc, 1, ErrorMode::Strict).is_err());
        assert_eq!(page_text_or_recover(&doc, 1, ErrorMode::Lenient).unwrap(), None);
    }

    #[test]
    fn test_page_marker() {
        assert_eq!(page_marker(1), "\n\n===== PAGE 1 =====\n\n");
        assert_eq!(page_marker(12), "\n\n===== PAGE 12 =====\n\n");
    }

    #[test]
    fn test_three_page_document() {
        let doc = FakeDocument::new(vec![Some("A"), Some(""), Some("B  B")]);
        let (out, summary) = render(&doc, &ExtractOptions::default()).unwrap();

        assert_eq!(
            out,
            "\n\n===== PAGE 1 =====\n\nA\
             \n\n===== PAGE 2 =====\n\n[No text extracted]\
             \n\n===== PAGE 3 =====\n\nB B"
        );
        assert_eq!(
            summary,
            ExtractionSummary {
                pages: 3,
                empty_pages: 1,
                recovered_pages: 0,
                chars: 4,
            }
        );
    }

    #[test]
    fn test_pages_requested_in_order() {
        let doc = FakeDocument::new(vec![Some("1"), Some("2"), Some("3"), Some("4")]);
        render(&doc, &ExtractOptions::default()).unwrap();
        assert_eq!(*doc.requested.borrow(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_body_is_normalized() {
        let doc = FakeDocument::new(vec![Some("\r\n  Title\r\n\r\n\r\n\r\nBody \t text  \n")]);
        let (out, _) = render(&doc, &ExtractOptions::default()).unwrap();
        assert_eq!(out, "\n\n===== PAGE 1 =====\n\nTitle\n\nBody text");
    }

    #[test]
    fn test_whitespace_only_page_gets_placeholder() {
        let doc = FakeDocument::new(vec![Some(" \r\n\t \n")]);
        let (out, summary) = render(&doc, &ExtractOptions::default()).unwrap();
        assert!(out.ends_with(PAGE_PLACEHOLDER));
        assert_eq!(summary.empty_pages, 1);
    }

    #[test]
    fn test_empty_document_writes_nothing() {
        let doc = FakeDocument::new(vec![]);
        let (out, summary) = render(&doc, &ExtractOptions::default()).unwrap();
        assert!(out.is_empty());
        assert_eq!(summary, ExtractionSummary::default());
    }

    #[test]
    fn test_strict_mode_aborts_on_failing_page() {
        let doc = FakeDocument::new(vec![Some("ok"), None, Some("never")]);
        let mut sink = PageSink::new(Vec::new(), "memory");
        let err = write_pages(&doc, &mut sink, &ExtractOptions::default()).unwrap_err();

        assert!(matches!(err, Error::PageText { page: 2, .. }));
        assert_eq!(*doc.requested.borrow(), vec![0, 1]);
    }

    #[test]
    fn test_lenient_mode_substitutes_placeholder() {
        let doc = FakeDocument::new(vec![Some("ok"), None, Some("")]);
        let options = ExtractOptions::new().lenient();
        let (out, summary) = render(&doc, &options).unwrap();

        assert_eq!(
            out,
            "\n\n===== PAGE 1 =====\n\nok\
             \n\n===== PAGE 2 =====\n\n[No text extracted]\
             \n\n===== PAGE 3 =====\n\n[No text extracted]"
        );
        assert_eq!(summary.pages, 3);
        assert_eq!(summary.recovered_pages, 1);
        assert_eq!(summary.empty_pages, 1);
    }

    #[test]
    fn test_custom_placeholder() {
        let doc = FakeDocument::new(vec![Some("")]);
        let options = ExtractOptions::new().with_placeholder("<blank>");
        let (out, _) = render(&doc, &options).unwrap();
        assert_eq!(out, "\n\n===== PAGE 1 =====\n\n<blank>");
    }

    #[test]
    fn test_sink_write_failure() {
        struct FullDisk;

        impl Write for FullDisk {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let doc = FakeDocument::new(vec![Some("a")]);
        let mut sink = PageSink::new(FullDisk, "full.txt");
        let err = write_pages(&doc, &mut sink, &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Write { ref target, .. } if target == "full.txt"));
    }

    #[test]
    fn test_extractor_run_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("pages.txt");

        let extractor = Extractor::new(FakeOpener(vec![Some("A"), Some(""), Some("B  B")]));
        let summary = extractor.run("input.pdf", &out).unwrap();

        assert_eq!(summary.pages, 3);
        let written = std::fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("\n\n===== PAGE 1 =====\n\nA"));
        assert!(written.ends_with("===== PAGE 3 =====\n\nB B"));
    }

    #[test]
    fn test_extractor_overwrites_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("pages.txt");
        std::fs::write(&out, "stale content that is much longer than the new one").unwrap();

        Extractor::new(FakeOpener(vec![Some("new")]))
            .run("input.pdf", &out)
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "\n\n===== PAGE 1 =====\n\nnew"
        );
    }

    #[test]
    fn test_extractor_open_failure_leaves_output_alone() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("pages.txt");
        let fresh = dir.path().join("fresh.txt");
        std::fs::write(&out, "keep me").unwrap();

        let extractor = Extractor::new(FakeOpener(vec![Some("x")]));
        assert!(extractor.run("missing.pdf", &out).unwrap_err().is_open_error());
        assert!(extractor.run("missing.pdf", &fresh).is_err());

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "keep me");
        assert!(!fresh.exists());
    }

    #[test]
    fn test_extractor_unwritable_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("no_such_dir").join("pages.txt");

        let err = Extractor::new(FakeOpener(vec![Some("x")]))
            .run("input.pdf", &out)
            .unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }

    #[test]
    fn test_extractor_pages_in_memory() {
        let extractor = Extractor::new(FakeOpener(vec![Some(" A "), Some(""), Some("B\t\tB")]));
        assert_eq!(extractor.pages("input.pdf").unwrap(), vec!["A", "", "B B"]);
    }
}
