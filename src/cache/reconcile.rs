//! Reconcile freshly produced segments with a previously persisted cache.

use crate::config::ReconcileMode;

use super::entry::CacheEntry;

/// What [`reconcile`] did with the prior cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Number of fresh segments.
    pub total: usize,
    /// Entries whose audio was carried over.
    pub reused: usize,
    /// A prior cache existed but its length differed, so none of it was used.
    pub prior_discarded: bool,
    /// Indices whose text differs from the prior cache (same-length case).
    pub texts_changed: usize,
}

impl ReconcileReport {
    /// `true` when the persisted cache no longer matches the reconciled
    /// entries and must be rewritten.
    pub fn needs_overwrite(&self) -> bool {
        self.prior_discarded || self.texts_changed > 0
    }
}

/// Build the cache entries for `segments`, reusing audio from `prior`.
///
/// A prior cache of a different length is discarded entirely.  With the same
/// length, [`ReconcileMode::Positional`] carries audio over by index whatever
/// text now sits there; [`ReconcileMode::TextVerified`] only where the text
/// is unchanged.  Entries always carry the fresh segment text.
pub fn reconcile(
    segments: &[String],
    prior: Option<Vec<CacheEntry>>,
    mode: ReconcileMode,
) -> (Vec<CacheEntry>, ReconcileReport) {
    let mut report = ReconcileReport {
        total: segments.len(),
        ..Default::default()
    };

    let prior = match prior {
        Some(prior) if prior.len() == segments.len() => prior,
        Some(prior) => {
            log::warn!(
                "cache: prior cache has {} entries but {} segments were produced; discarding it",
                prior.len(),
                segments.len()
            );
            report.prior_discarded = true;
            return (fresh(segments), report);
        }
        None => return (fresh(segments), report),
    };

    let entries = segments
        .iter()
        .zip(prior)
        .map(|(text, old)| {
            let same_text = old.text == *text;
            if !same_text {
                report.texts_changed += 1;
            }
            let audio = match mode {
                ReconcileMode::Positional => old.audio,
                ReconcileMode::TextVerified if same_text => old.audio,
                ReconcileMode::TextVerified => None,
            };
            if audio.is_some() {
                report.reused += 1;
            }
            CacheEntry {
                text: text.clone(),
                audio,
            }
        })
        .collect();

    log::info!(
        "cache: reconciled {} segments, {} with cached audio, {} texts changed",
        report.total,
        report.reused,
        report.texts_changed
    );
    (entries, report)
}

fn fresh(segments: &[String]) -> Vec<CacheEntry> {
    segments.iter().map(CacheEntry::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn prior() -> Vec<CacheEntry> {
        vec![
            CacheEntry::with_audio("a", vec![1]),
            CacheEntry::new("b"),
            CacheEntry::with_audio("c", vec![3]),
        ]
    }

    #[test]
    fn no_prior_cache_starts_empty() {
        let (entries, report) = reconcile(&segs(&["a", "b"]), None, ReconcileMode::Positional);
        assert_eq!(entries, vec![CacheEntry::new("a"), CacheEntry::new("b")]);
        assert_eq!(report.reused, 0);
        assert!(!report.prior_discarded);
        assert!(!report.needs_overwrite());
    }

    #[test]
    fn length_mismatch_discards_all_audio() {
        let (entries, report) =
            reconcile(&segs(&["a", "b"]), Some(prior()), ReconcileMode::Positional);
        assert!(entries.iter().all(|e| e.audio.is_none()));
        assert!(report.prior_discarded);
        assert!(report.needs_overwrite());
    }

    #[test]
    fn positional_reuses_by_index_even_if_text_changed() {
        let (entries, report) = reconcile(
            &segs(&["a", "b", "C!"]),
            Some(prior()),
            ReconcileMode::Positional,
        );
        assert_eq!(entries[0].audio, Some(vec![1]));
        assert_eq!(entries[2], CacheEntry::with_audio("C!", vec![3]));
        assert_eq!(report.reused, 2);
        assert_eq!(report.texts_changed, 1);
        assert!(report.needs_overwrite());
    }

    #[test]
    fn text_verified_drops_audio_where_text_changed() {
        let (entries, report) = reconcile(
            &segs(&["a", "b", "C!"]),
            Some(prior()),
            ReconcileMode::TextVerified,
        );
        assert_eq!(entries[0].audio, Some(vec![1]));
        assert_eq!(entries[2].audio, None);
        assert_eq!(report.reused, 1);
    }

    #[test]
    fn identical_prior_needs_no_overwrite() {
        let (entries, report) =
            reconcile(&segs(&["a", "b", "c"]), Some(prior()), ReconcileMode::Positional);
        assert_eq!(entries, prior());
        assert!(!report.needs_overwrite());
    }
}
