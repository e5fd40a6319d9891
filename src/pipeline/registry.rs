//! One shared [`DocumentPipeline`] per document directory.
//!
//! Callers that reach the same document through the registry contend on the
//! same pipeline lock, so their `stream` calls never race on the cache file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::extract::DocumentExtractor;
use crate::tts::SpeechSynthesizer;

use super::runner::{DocumentPipeline, PipelineOptions};
use super::PipelineError;

/// Find the single PDF inside a document directory.
///
/// Fails with [`PipelineError::DocumentLayout`] when the directory holds no
/// PDF or more than one.
pub fn locate_document(dir: &Path) -> Result<PathBuf, PipelineError> {
    let mut pdfs: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| PipelineError::io(dir, e))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_pdf(path))
        .collect();

    if pdfs.len() != 1 {
        return Err(PipelineError::DocumentLayout {
            dir: dir.to_path_buf(),
            found: pdfs.len(),
        });
    }
    Ok(pdfs.remove(0))
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Hands out one pipeline per document directory, creating it on first use.
pub struct DocumentRegistry {
    extractor: Arc<dyn DocumentExtractor>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    options: PipelineOptions,
    pipelines: Mutex<HashMap<PathBuf, Arc<DocumentPipeline>>>,
}

impl DocumentRegistry {
    pub fn new(
        extractor: Arc<dyn DocumentExtractor>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            extractor,
            synthesizer,
            options,
            pipelines: Mutex::new(HashMap::new()),
        }
    }

    /// The pipeline for the document in `dir`.
    pub fn open(&self, dir: &Path) -> Result<Arc<DocumentPipeline>, PipelineError> {
        let key = fs::canonicalize(dir).map_err(|e| PipelineError::io(dir, e))?;

        let mut pipelines = self.pipelines.lock().unwrap();
        if let Some(pipeline) = pipelines.get(&key) {
            return Ok(Arc::clone(pipeline));
        }

        let pdf = locate_document(&key)?;
        log::debug!("registry: opening {}", pdf.display());
        let pipeline = Arc::new(DocumentPipeline::new(
            &pdf,
            Arc::clone(&self.extractor),
            Arc::clone(&self.synthesizer),
            self.options.clone(),
        ));
        pipelines.insert(key, Arc::clone(&pipeline));
        Ok(pipeline)
    }

    /// Drop the registry's handle for `dir`.  Returns whether one was held.
    pub fn forget(&self, dir: &Path) -> bool {
        let key = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        self.pipelines.lock().unwrap().remove(&key).is_some()
    }

    pub fn len(&self) -> usize {
        self.pipelines.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
