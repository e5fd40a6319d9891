//! Paths of the files derived from one document.
//!
//! All artifacts sit next to the PDF and are named after its stem:
//!
//! ```text
//! uploads/<doc>/paper.pdf
//!              /paper_original.txt    raw extracted text
//!              /paper_processed.txt   filtered text with page markers
//!              /paper.segments.json   segment cache
//!              /paper.meta.json       metadata snapshot
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::extract::ExtractedDocument;

use super::PipelineError;

/// Separator written between blocks in the raw-text artifact.
const BLOCK_RULE: &str = "==================================================";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentArtifacts {
    pub pdf: PathBuf,
    pub original_text: PathBuf,
    pub processed_text: PathBuf,
    pub cache: PathBuf,
    pub meta: PathBuf,
}

impl DocumentArtifacts {
    /// ```
    /// use std::path::Path;
    /// use pdf_tts::pipeline::DocumentArtifacts;
    ///
    /// let a = DocumentArtifacts::for_document(Path::new("/up/1/paper.v2.pdf"));
    /// assert_eq!(a.cache, Path::new("/up/1/paper.v2.segments.json"));
    /// assert_eq!(a.original_text, Path::new("/up/1/paper.v2_original.txt"));
    /// ```
    pub fn for_document(pdf: &Path) -> Self {
        let dir = pdf.parent().unwrap_or_else(|| Path::new("."));
        let stem = pdf
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".into());

        Self {
            pdf: pdf.to_path_buf(),
            original_text: dir.join(format!("{stem}_original.txt")),
            processed_text: dir.join(format!("{stem}_processed.txt")),
            cache: dir.join(format!("{stem}.segments.json")),
            meta: dir.join(format!("{stem}.meta.json")),
        }
    }

    /// File name of the PDF itself.
    pub fn file_name(&self) -> String {
        self.pdf
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The four derived files, in creation order.
    pub fn derived(&self) -> [&Path; 4] {
        [
            self.original_text.as_path(),
            self.processed_text.as_path(),
            self.cache.as_path(),
            self.meta.as_path(),
        ]
    }

    /// Delete every derived file that exists.  Returns how many were removed.
    pub fn remove_all(&self) -> Result<usize, PipelineError> {
        let mut removed = 0;
        for path in self.derived() {
            match fs::remove_file(path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(PipelineError::io(path, e)),
            }
        }
        Ok(removed)
    }
}

/// Raw page text as extracted, every block followed by a rule line.
pub fn original_text(document: &ExtractedDocument) -> String {
    let mut out = String::new();
    for page in &document.pages {
        for block in &page.blocks {
            out.push_str(&block.text);
            out.push('\n');
            out.push_str(BLOCK_RULE);
            out.push('\n');
        }
    }
    out
}

/// Write a text artifact, creating the parent directory if needed.
pub fn write_text(path: &Path, content: &str) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| PipelineError::io(path, e))
}
