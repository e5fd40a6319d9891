//! Data types produced by the extractor.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TextBlock / PageText
// ---------------------------------------------------------------------------

/// One run of text from a page, delimited by blank lines in the page's text
/// stream.  Internal line breaks are preserved; the noise filter works line
/// by line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Lines of the block with trailing whitespace removed.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines().map(str::trim_end)
    }
}

/// All blocks of a single page, in reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct PageText {
    /// 1-based physical page number.
    pub number: usize,
    /// Human-readable label from the document's page-label tree (`"iv"`,
    /// `"A-3"`), when one applies to this page.
    pub label: Option<String>,
    pub blocks: Vec<TextBlock>,
}

impl PageText {
    /// Split a page's raw text into blocks on blank lines.
    ///
    /// ```
    /// use pdf_tts::extract::PageText;
    ///
    /// let page = PageText::from_raw(1, None, "Title\n\nFirst line\nsecond line\n\n\n");
    /// assert_eq!(page.blocks.len(), 2);
    /// assert_eq!(page.blocks[1].text, "First line\nsecond line");
    /// ```
    pub fn from_raw(number: usize, label: Option<String>, raw: &str) -> Self {
        let mut blocks = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in raw.lines() {
            let line = line.trim_end();
            if line.trim().is_empty() {
                if !current.is_empty() {
                    blocks.push(TextBlock::new(current.join("\n")));
                    current.clear();
                }
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() {
            blocks.push(TextBlock::new(current.join("\n")));
        }

        Self {
            number,
            label,
            blocks,
        }
    }
}

// ---------------------------------------------------------------------------
// DocumentInfo / TocEntry
// ---------------------------------------------------------------------------

/// Document-level metadata gathered while extracting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub file_name: String,
    /// Hex SHA-256 of the PDF bytes.
    pub document_id: String,
    pub page_count: usize,
    pub is_encrypted: bool,
    /// `true` when the document could not be opened with an empty password.
    pub needs_password: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// One outline (bookmark) entry, flattened in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Nesting depth, starting at 1 for top-level entries.
    pub level: usize,
    pub title: String,
    /// 1-based target page, when the destination resolves to a page.
    pub page: Option<usize>,
}

// ---------------------------------------------------------------------------
// ExtractedDocument
// ---------------------------------------------------------------------------

/// Everything the pipeline needs from one PDF.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedDocument {
    pub info: DocumentInfo,
    pub toc: Vec<TocEntry>,
    pub pages: Vec<PageText>,
}

impl ExtractedDocument {
    /// Total number of blocks across all pages.
    pub fn block_count(&self) -> usize {
        self.pages.iter().map(|p| p.blocks.len()).sum()
    }
}
