//! PDF backend abstraction layer.
//!
//! The extraction driver only needs two capabilities from a PDF library:
//! open a document from a path, and produce the plain text of page `i`.
//! Both are expressed as traits so the driver can run against an in-memory
//! fake as well as the concrete [`LopdfOpener`].

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};

/// An opened document that yields page text in page order.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Plain text of the page at a 0-based `index`, without layout
    /// reconstruction.
    fn page_text(&self, index: usize) -> Result<String>;
}

/// Opens documents from the filesystem.
pub trait DocumentOpener {
    type Document: PageSource;

    /// Open the document at `path`.
    fn open(&self, path: &Path) -> Result<Self::Document>;
}

/// [`DocumentOpener`] backed by `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfOpener;

impl DocumentOpener for LopdfOpener {
    type Document = LopdfDocument;

    fn open(&self, path: &Path) -> Result<LopdfDocument> {
        LopdfDocument::load_file(path)
    }
}

/// [`PageSource`] backed by `lopdf::Document`.
pub struct LopdfDocument {
    doc: Document,
    /// lopdf page numbers (1-based keys of `get_pages`) in document order.
    page_numbers: Vec<u32>,
}

impl LopdfDocument {
    /// Load from a file path, checking the header first.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = detect_format_from_path(path)?;
        log::debug!("{}: detected {}", path.display(), format);

        let doc = Document::load(path)?;
        Self::from_document(doc)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(data)?;
        Self::from_document(doc)
    }

    fn from_document(mut doc: Document) -> Result<Self> {
        // lopdf does not decrypt on load; only the empty user password is tried
        if doc.is_encrypted() {
            doc.decrypt("").map_err(|e| {
                log::debug!("Empty-password decryption failed: {}", e);
                Error::Encrypted
            })?;
        }
        inline_inherited_resources(&mut doc);

        let page_numbers = doc.get_pages().keys().copied().collect();
        Ok(Self { doc, page_numbers })
    }

    /// PDF version string from the file header.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }
}

impl PageSource for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        let page_number = *self
            .page_numbers
            .get(index)
            .ok_or(Error::PageOutOfRange(index, self.page_numbers.len()))?;

        self.doc
            .extract_text(&[page_number])
            .map_err(|e| Error::PageText {
                page: index + 1,
                message: e.to_string(),
            })
    }
}

/// Copy `/Resources` inherited from an ancestor `/Pages` node onto each
/// page that has none of its own.
///
/// lopdf only follows inherited resources given by reference; an inline
/// dictionary on a `/Pages` node is otherwise invisible to `extract_text`.
fn inline_inherited_resources(doc: &mut Document) {
    let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();

    for page_id in page_ids {
        let inherited = match doc.get_dictionary(page_id) {
            Ok(page) if !page.has(b"Resources") => inherited_resources(doc, page),
            _ => None,
        };
        if let Some(resources) = inherited {
            if let Ok(page) = doc.get_object_mut(page_id).and_then(Object::as_dict_mut) {
                page.set("Resources", resources);
            }
        }
    }
}

/// Nearest `/Resources` entry up the `/Parent` chain.
fn inherited_resources(doc: &Document, page: &Dictionary) -> Option<Object> {
    const MAX_DEPTH: usize = 64;

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    for _ in 0..MAX_DEPTH {
        let node = doc.get_dictionary(parent?).ok()?;
        if let Ok(resources) = node.get(b"Resources") {
            return Some(resources.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}
