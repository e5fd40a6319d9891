//! Document pipeline: drives extract → filter → segment → cache and serves
//! segment audio on demand.
//!
//! [`DocumentPipeline`] owns one document's [`DocumentState`] behind an async
//! mutex.  Every public operation holds the lock for its whole critical
//! section, so operations on one document are serialised.
//!
//! # Flow
//!
//! ```text
//! process()
//!   └─▶ spawn_blocking (owns the state lock):
//!         extract ─▶ write <stem>_original.txt
//!         filter + segment ─▶ write <stem>_processed.txt
//!         load prior cache ─▶ reconcile ─▶ save cache
//!         save <stem>.meta.json, status = Processed
//!
//! stream(i)
//!   ├─ cached  ─▶ return audio
//!   └─ missing ─▶ strip markup ─▶ synthesize ─▶ store + flush ─▶ return audio
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::cache::{reconcile, ReconcileReport, SegmentCache};
use crate::config::{AppConfig, FilterConfig, ReconcileMode};
use crate::extract::DocumentExtractor;
use crate::filter::NoiseFilter;
use crate::segment::{strip_markup, Segmenter};
use crate::tts::SpeechSynthesizer;

use super::artifacts::{original_text, write_text, DocumentArtifacts};
use super::snapshot::DocumentSnapshot;
use super::state::{DocumentState, DocumentStatus};
use super::PipelineError;

// ---------------------------------------------------------------------------
// PipelineOptions
// ---------------------------------------------------------------------------

/// Processing settings shared by every document pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub filter: FilterConfig,
    /// Directory holding the exclusion lists.
    pub filters_dir: PathBuf,
    pub reconcile: ReconcileMode,
    pub segmenter: Segmenter,
}

impl PipelineOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            filter: config.filter.clone(),
            filters_dir: config.storage.filters_dir(),
            reconcile: config.segment.reconcile,
            segmenter: Segmenter::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProcessJob  (runs on the blocking pool)
// ---------------------------------------------------------------------------

/// Exclusive hold on a document's state for the length of one `process()`.
///
/// Dropped without [`commit`](Self::commit), whether through an error, a
/// panic or a job that never ran, it puts the previous status back.
struct ProcessGuard {
    state: OwnedMutexGuard<DocumentState>,
    previous: DocumentStatus,
    committed: bool,
}

impl ProcessGuard {
    fn begin(mut state: OwnedMutexGuard<DocumentState>) -> Self {
        let previous = state.status;
        state.status = DocumentStatus::Processing;
        Self {
            state,
            previous,
            committed: false,
        }
    }

    fn commit(mut self, next: DocumentState) {
        *self.state = next;
        self.committed = true;
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        if !self.committed {
            self.state.status = self.previous;
        }
    }
}

/// One processing run.  The job owns the state lock, so its artifact and
/// cache writes finish before any other operation on the document starts,
/// even when the caller stops waiting for it.
struct ProcessJob {
    artifacts: DocumentArtifacts,
    extractor: Arc<dyn DocumentExtractor>,
    options: PipelineOptions,
}

impl ProcessJob {
    fn run(self, guard: ProcessGuard) -> Result<ReconcileReport, PipelineError> {
        let (next, report) = self.build()?;
        guard.commit(next);
        Ok(report)
    }

    fn build(&self) -> Result<(DocumentState, ReconcileReport), PipelineError> {
        let document = self.extractor.extract(&self.artifacts.pdf)?;
        write_text(&self.artifacts.original_text, &original_text(&document))?;

        let mut filter = NoiseFilter::new(&self.options.filter, &self.options.filters_dir)?;
        let segmentation = self
            .options
            .segmenter
            .segment_pages(&document.pages, &mut filter);
        write_text(&self.artifacts.processed_text, &segmentation.processed_text)?;

        let cache = SegmentCache::new(&self.artifacts.cache);
        let prior = cache.load();
        let unreadable_prior = prior.is_none() && cache.exists();
        let (entries, report) = reconcile(&segmentation.segments, prior, self.options.reconcile);
        cache.save(&entries, report.needs_overwrite() || unreadable_prior)?;

        let mut info = document.info;
        info.file_name = self.artifacts.file_name();
        let next = DocumentState {
            status: DocumentStatus::Processed,
            entries: Some(entries),
            info,
            toc: document.toc,
            removals: filter.take_removals(),
            last_updated: Some(Utc::now()),
        };
        DocumentSnapshot::from_state(&next).save(&self.artifacts.meta)?;
        Ok((next, report))
    }
}

// ---------------------------------------------------------------------------
// DocumentPipeline
// ---------------------------------------------------------------------------

/// Processing and playback for a single document.
///
/// ```rust,no_run
/// use std::path::Path;
/// use std::sync::Arc;
/// use pdf_tts::config::AppConfig;
/// use pdf_tts::extract::PdfExtractor;
/// use pdf_tts::pipeline::{DocumentPipeline, PipelineOptions};
/// use pdf_tts::tts::GoogleTtsClient;
///
/// # async fn example() -> Result<(), pdf_tts::pipeline::PipelineError> {
/// let config = AppConfig::default();
/// let pipeline = DocumentPipeline::new(
///     Path::new("uploads/1/paper.pdf"),
///     Arc::new(PdfExtractor::new()),
///     Arc::new(GoogleTtsClient::from_config(&config.tts, &config.synthesis)),
///     PipelineOptions::from_config(&config),
/// );
/// pipeline.process().await?;
/// let audio = pipeline.stream(0).await?;
/// # let _ = audio;
/// # Ok(())
/// # }
/// ```
pub struct DocumentPipeline {
    artifacts: DocumentArtifacts,
    cache: SegmentCache,
    extractor: Arc<dyn DocumentExtractor>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    options: PipelineOptions,
    state: Arc<Mutex<DocumentState>>,
}

impl DocumentPipeline {
    /// Create the pipeline for the PDF at `pdf`.
    ///
    /// A persisted cache next to the PDF is loaded, so a restarted process
    /// starts out `Processed`.
    pub fn new(
        pdf: &Path,
        extractor: Arc<dyn DocumentExtractor>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        options: PipelineOptions,
    ) -> Self {
        let artifacts = DocumentArtifacts::for_document(pdf);
        let cache = SegmentCache::new(&artifacts.cache);

        let state = match cache.load() {
            Some(entries) => {
                log::info!(
                    "pipeline: restored {} segments for {}",
                    entries.len(),
                    artifacts.file_name()
                );
                DocumentState::restored(artifacts.file_name(), entries)
            }
            None => DocumentState::unprocessed(artifacts.file_name()),
        };

        Self {
            artifacts,
            cache,
            extractor,
            synthesizer,
            options,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn artifacts(&self) -> &DocumentArtifacts {
        &self.artifacts
    }

    pub async fn status(&self) -> DocumentStatus {
        self.state.lock().await.status
    }

    // -----------------------------------------------------------------------
    // process
    // -----------------------------------------------------------------------

    /// Extract, filter and segment the document, then reconcile the result
    /// with the persisted cache.
    ///
    /// Runs in full on every call.  On failure the status reverts to what it
    /// was before the call.  Dropping the returned future does not abandon
    /// the run: it completes on the blocking pool and the next operation on
    /// this document waits for it.
    pub async fn process(&self) -> Result<ReconcileReport, PipelineError> {
        let guard = ProcessGuard::begin(Arc::clone(&self.state).lock_owned().await);
        log::info!("pipeline: processing {}", self.artifacts.file_name());

        let job = ProcessJob {
            artifacts: self.artifacts.clone(),
            extractor: Arc::clone(&self.extractor),
            options: self.options.clone(),
        };
        let result = tokio::task::spawn_blocking(move || job.run(guard))
            .await
            .map_err(|e| PipelineError::Internal(e.to_string()))
            .and_then(|r| r);

        match &result {
            Ok(report) => log::info!(
                "pipeline: {} processed: {} segments, {} with audio",
                self.artifacts.file_name(),
                report.total,
                report.reused
            ),
            Err(e) => log::error!("pipeline: processing {} failed: {e}", self.artifacts.file_name()),
        }
        result
    }

    // -----------------------------------------------------------------------
    // stream
    // -----------------------------------------------------------------------

    /// Audio for segment `index`, synthesising and persisting it on first
    /// request.
    ///
    /// When synthesis fails the cache is left untouched, so the call can be
    /// retried.
    pub async fn stream(&self, index: usize) -> Result<Vec<u8>, PipelineError> {
        let mut state = self.state.lock().await;
        if !state.status.is_processed() {
            return Err(PipelineError::NotProcessed);
        }
        let entries = state.entries.as_ref().ok_or(PipelineError::NotProcessed)?;
        let entry = entries.get(index).ok_or(PipelineError::IndexOutOfRange {
            index,
            len: entries.len(),
        })?;

        if let Some(audio) = &entry.audio {
            log::debug!("pipeline: streaming [cache] #{index}: {}", entry.text.trim());
            return Ok(audio.clone());
        }

        let text = strip_markup(&entry.text);
        log::debug!("pipeline: streaming [tts] #{index}: {}", text.trim());
        let audio = self.synthesizer.synthesize(&text).await?;

        // No suspension point from here until the cache is flushed.
        let entries = state.entries.as_mut().ok_or(PipelineError::NotProcessed)?;
        entries[index].audio = Some(audio.clone());
        self.cache.save(entries, true)?;
        state.last_updated = Some(Utc::now());
        Ok(audio)
    }

    // -----------------------------------------------------------------------
    // clean / get_data
    // -----------------------------------------------------------------------

    /// Delete every derived artifact and forget all segments.  Valid in any
    /// state.  Returns the number of files removed.
    pub async fn clean(&self) -> Result<usize, PipelineError> {
        let mut state = self.state.lock().await;
        let removed = self.artifacts.remove_all()?;
        *state = DocumentState {
            status: DocumentStatus::Cleaned,
            ..DocumentState::unprocessed(self.artifacts.file_name())
        };
        log::info!(
            "pipeline: cleaned {} ({removed} files removed)",
            self.artifacts.file_name()
        );
        Ok(removed)
    }

    /// Persisted metadata overlaid with the live state.
    pub async fn get_data(&self) -> DocumentSnapshot {
        let meta = self.artifacts.meta.clone();
        let persisted = tokio::task::spawn_blocking(move || DocumentSnapshot::load(&meta))
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        let state = self.state.lock().await;
        DocumentSnapshot::overlay(persisted, &state)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
