//! `DocumentExtractor` trait and the `lopdf`-backed [`PdfExtractor`].
//!
//! # Overview
//!
//! [`DocumentExtractor`] is the interface the pipeline calls.  It is
//! object-safe and `Send + Sync` so it can be held behind an
//! `Arc<dyn DocumentExtractor>` and moved onto the blocking thread pool.
//!
//! [`PdfExtractor`] reads the file, hashes it, parses it with `lopdf`,
//! decrypts it when needed and returns per-page text blocks together with
//! page labels, the outline and the document info.
//!
//! [`MockExtractor`] (available under `#[cfg(test)]`) returns canned pages
//! and counts its calls, so the pipeline can be tested without real PDFs.

use std::path::{Path, PathBuf};

use lopdf::Document;
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::labels::PageLabels;
use super::objects::{get_dict, get_text};
use super::outline::read_toc;
use super::types::{DocumentInfo, ExtractedDocument, PageText};

// ---------------------------------------------------------------------------
// ExtractError
// ---------------------------------------------------------------------------

/// The document could not be turned into text.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `lopdf` could not parse the file.
    #[error("PDF parsing error: {0}")]
    Parse(String),

    /// Encrypted and the empty password does not open it.
    #[error("PDF is password protected")]
    PasswordRequired,

    #[error("the supplied PDF password was rejected")]
    PasswordRejected,
}

// ---------------------------------------------------------------------------
// DocumentExtractor trait
// ---------------------------------------------------------------------------

/// Turns a document on disk into ordered page text.
///
/// The document handle lives only for the duration of one call.
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument, ExtractError>;
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn DocumentExtractor>) {}
};

// ---------------------------------------------------------------------------
// PdfExtractor
// ---------------------------------------------------------------------------

/// Production extractor built on `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    password: Option<String>,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `password` for encrypted documents instead of the empty password.
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
        }
    }

    /// Parse `bytes`, decrypting when the document is encrypted.
    ///
    /// Returns the document with its `(is_encrypted, needs_password)` flags.
    fn open(&self, bytes: &[u8]) -> Result<(Document, bool, bool), ExtractError> {
        let doc = Document::load_mem(bytes).map_err(|e| ExtractError::Parse(e.to_string()))?;
        if !doc.is_encrypted() {
            return Ok((doc, false, false));
        }

        let mut attempt = doc.clone();
        if attempt.decrypt("").is_ok() {
            return Ok((attempt, true, false));
        }
        let Some(password) = self.password.as_deref() else {
            return Err(ExtractError::PasswordRequired);
        };
        let mut attempt = doc;
        match attempt.decrypt(password) {
            Ok(()) => Ok((attempt, true, true)),
            Err(e) => {
                log::warn!("extract: decryption failed: {e}");
                Err(ExtractError::PasswordRejected)
            }
        }
    }
}

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument, ExtractError> {
        if !path.exists() {
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document_id = hex::encode(Sha256::digest(&bytes));

        let (doc, is_encrypted, needs_password) = self.open(&bytes)?;
        let labels = PageLabels::from_document(&doc);
        let toc = read_toc(&doc);

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        let mut pages = Vec::with_capacity(page_numbers.len());
        for (index, &number) in page_numbers.iter().enumerate() {
            let raw = match doc.extract_text(&[number]) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("extract: page {number} text could not be decoded: {e}");
                    String::new()
                }
            };
            pages.push(PageText::from_raw(
                number as usize,
                labels.label_for(index),
                &raw,
            ));
        }

        let info_dict = get_dict(&doc, &doc.trailer, b"Info");
        let info = DocumentInfo {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            document_id,
            page_count: pages.len(),
            is_encrypted,
            needs_password,
            title: info_dict
                .and_then(|d| get_text(&doc, d, b"Title"))
                .filter(|t| !t.trim().is_empty()),
            author: info_dict
                .and_then(|d| get_text(&doc, d, b"Author"))
                .filter(|a| !a.trim().is_empty()),
        };

        log::info!(
            "extract: {}: {} pages, {} blocks, {} outline entries",
            info.file_name,
            info.page_count,
            pages.iter().map(|p| p.blocks.len()).sum::<usize>(),
            toc.len()
        );

        Ok(ExtractedDocument { info, toc, pages })
    }
}

// ---------------------------------------------------------------------------
// MockExtractor  (test-only)
// ---------------------------------------------------------------------------

/// Test double returning pre-configured pages.
#[cfg(test)]
pub struct MockExtractor {
    pages: std::sync::Mutex<Vec<PageText>>,
    calls: std::sync::atomic::AtomicUsize,
    unreadable: bool,
    delay: Option<std::time::Duration>,
}

#[cfg(test)]
impl MockExtractor {
    pub fn new(pages: Vec<PageText>) -> Self {
        Self {
            pages: std::sync::Mutex::new(pages),
            calls: std::sync::atomic::AtomicUsize::new(0),
            unreadable: false,
            delay: None,
        }
    }

    /// Build pages from raw page strings, numbered from 1.
    pub fn from_raw_pages(raw: &[&str]) -> Self {
        Self::new(
            raw.iter()
                .enumerate()
                .map(|(i, text)| PageText::from_raw(i + 1, None, text))
                .collect(),
        )
    }

    /// A mock whose every call fails with `Parse`.
    pub fn unreadable() -> Self {
        Self {
            unreadable: true,
            ..Self::new(Vec::new())
        }
    }

    /// Block the calling thread for `delay` before every extraction.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the pages returned by subsequent calls.
    pub fn set_pages(&self, pages: Vec<PageText>) {
        *self.pages.lock().unwrap() = pages;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl DocumentExtractor for MockExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument, ExtractError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.unreadable {
            return Err(ExtractError::Parse("mock: unreadable".into()));
        }
        let pages = self.pages.lock().unwrap().clone();
        Ok(ExtractedDocument {
            info: DocumentInfo {
                file_name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                document_id: "mock".into(),
                page_count: pages.len(),
                ..Default::default()
            },
            toc: Vec::new(),
            pages,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Object, Stream, StringFormat};

    /// Write a one-page PDF with a Courier text run and an Info title.
    fn write_sample_pdf(path: &Path) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = b"BT /F1 12 Tf 72 700 Td (Hello world) Tj ET".to_vec();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(b"Sample".to_vec(), StringFormat::Literal),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn extracts_text_and_info_from_generated_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.pdf");
        write_sample_pdf(&path);

        let doc = PdfExtractor::new().extract(&path).unwrap();
        assert_eq!(doc.info.file_name, "sample.pdf");
        assert_eq!(doc.info.page_count, 1);
        assert_eq!(doc.info.document_id.len(), 64);
        assert!(!doc.info.is_encrypted);
        assert_eq!(doc.info.title.as_deref(), Some("Sample"));
        assert_eq!(doc.pages[0].number, 1);
        let text: String = doc.pages[0].blocks.iter().map(|b| b.text.clone()).collect();
        assert!(text.contains("Hello"), "extracted: {text:?}");
    }

    #[test]
    fn document_id_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.pdf");
        write_sample_pdf(&path);

        let extractor = PdfExtractor::new();
        let a = extractor.extract(&path).unwrap().info.document_id;
        let b = extractor.extract(&path).unwrap().info.document_id;
        assert_eq!(a, b);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = PdfExtractor::new()
            .extract(&dir.path().join("absent.pdf"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::NotFound(_)));
    }

    #[test]
    fn garbage_bytes_fail_to_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();
        let err = PdfExtractor::new().extract(&path).unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }

    #[test]
    fn mock_counts_calls_and_can_fail() {
        let mock = MockExtractor::from_raw_pages(&["one", "two"]);
        let doc = mock.extract(Path::new("x.pdf")).unwrap();
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(mock.calls(), 1);

        let failing = MockExtractor::unreadable();
        assert!(failing.extract(Path::new("x.pdf")).is_err());
    }
}
