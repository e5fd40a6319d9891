//! The ordered rule chain deciding whether a line is content or noise.
//!
//! # Rule order
//!
//! ```text
//! 1. strip bracketed spans            (always runs; spans → bracketed-citation)
//! 2. symbols-and-digits only          ─┐
//! 3. symbols only                      │ each can be switched off
//! 4. digits only                       │ in FilterConfig
//! 5. mostly non-ASCII                  │
//! 6. URL prefix                       ─┘
//! 7. fuzzy exclusion lists            (authors, references, custom)
//! 8. degenerate catch-all
//! ```
//!
//! The first rule that fires rejects the line; later rules are not consulted.

use std::path::Path;

use crate::config::FilterConfig;

use super::exclusion::ExclusionList;
use super::removals::{RemovalCategory, Removals};
use super::rules::{self, BracketStripper};
use super::similarity::SimilarityMatcher;
use super::FilterError;

/// Author lists only apply to candidates of at most this many words.
const MAX_AUTHOR_WORDS: usize = 4;

/// Outcome of running the rule chain over one line.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Content; carries the text after bracket stripping.
    Keep(String),
    Reject(RemovalCategory),
}

/// Stateful noise filter: the rule chain plus the removals seen so far.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    config: FilterConfig,
    stripper: BracketStripper,
    authors: ExclusionList,
    references: ExclusionList,
    custom: ExclusionList,
    removals: Removals,
}

impl NoiseFilter {
    /// Build a filter, loading (or creating) the exclusion lists in
    /// `filters_dir`.
    pub fn new(config: &FilterConfig, filters_dir: &Path) -> Result<Self, FilterError> {
        Ok(Self::with_lists(
            config,
            ExclusionList::load_or_create(filters_dir, &config.authors)?,
            ExclusionList::load_or_create(filters_dir, &config.references)?,
            ExclusionList::load_or_create(filters_dir, &config.custom)?,
        ))
    }

    /// Build a filter from in-memory lists.
    pub fn with_lists(
        config: &FilterConfig,
        authors: ExclusionList,
        references: ExclusionList,
        custom: ExclusionList,
    ) -> Self {
        Self {
            config: config.clone(),
            stripper: BracketStripper::new(config),
            authors,
            references,
            custom,
            removals: Removals::new(),
        }
    }

    /// A filter with empty exclusion lists.
    pub fn without_lists(config: &FilterConfig) -> Self {
        Self::with_lists(
            config,
            ExclusionList::new(&config.authors.file, Vec::new(), config.authors.cutoff),
            ExclusionList::new(&config.references.file, Vec::new(), config.references.cutoff),
            ExclusionList::new(&config.custom.file, Vec::new(), config.custom.cutoff),
        )
    }

    /// Run the rule chain over `line` and record the outcome.
    ///
    /// Returns the kept text, or `None` when the line is noise.
    pub fn classify(&mut self, line: &str) -> Option<String> {
        let (verdict, spans) = self.evaluate(line);
        for span in spans {
            self.removals.record(RemovalCategory::BracketedCitation, span);
        }
        match verdict {
            Verdict::Keep(text) => Some(text),
            Verdict::Reject(category) => {
                log::trace!("filter: {category}: {line:?}");
                self.removals.record(category, line);
                None
            }
        }
    }

    /// Run the rule chain without recording anything.
    ///
    /// Also returns the bracketed spans that were stripped.
    pub fn evaluate(&self, line: &str) -> (Verdict, Vec<String>) {
        let (text, spans) = self.stripper.strip(line);
        let verdict = match self.first_rejection(&text) {
            Some(category) => Verdict::Reject(category),
            None => Verdict::Keep(text),
        };
        (verdict, spans)
    }

    fn first_rejection(&self, text: &str) -> Option<RemovalCategory> {
        let cfg = &self.config;
        let compact = rules::compact(text);

        if cfg.remove_symbols_and_digits_only && rules::is_symbols_and_digits_only(&compact) {
            return Some(RemovalCategory::SymbolsAndDigitsOnly);
        }
        if cfg.remove_symbols_only && rules::is_symbols_only(&compact) {
            return Some(RemovalCategory::SymbolsOnly);
        }
        if cfg.remove_digits_only && rules::is_digits_only(&compact) {
            return Some(RemovalCategory::DigitsOnly);
        }
        if cfg.remove_majority_non_ascii {
            if let Some(ratio) = rules::ascii_ratio(&compact) {
                if ratio < cfg.min_ascii_ratio {
                    return Some(RemovalCategory::NonAsciiMajority);
                }
            }
        }
        if cfg.remove_urls && rules::looks_like_url(text) {
            return Some(RemovalCategory::Url);
        }

        if let Some(category) = self.exclusion_match(text) {
            return Some(category);
        }

        rules::is_degenerate(text).then_some(RemovalCategory::Degenerate)
    }

    fn exclusion_match(&self, text: &str) -> Option<RemovalCategory> {
        if self.authors.is_empty() && self.references.is_empty() && self.custom.is_empty() {
            return None;
        }
        let candidate = SimilarityMatcher::new(text);

        if text.split_whitespace().count() <= MAX_AUTHOR_WORDS && self.authors.matches(&candidate)
        {
            return Some(RemovalCategory::AuthorMatch);
        }
        if text.starts_with('[') && self.references.matches(&candidate) {
            return Some(RemovalCategory::ReferenceMatch);
        }
        if self.custom.matches(&candidate) {
            return Some(RemovalCategory::CustomMatch);
        }
        None
    }

    pub fn removals(&self) -> &Removals {
        &self.removals
    }

    /// Hand over the accumulated removals, leaving an empty record.
    pub fn take_removals(&mut self) -> Removals {
        std::mem::take(&mut self.removals)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> NoiseFilter {
        NoiseFilter::without_lists(&FilterConfig::default())
    }

    fn filter_with(authors: &[&str], references: &[&str], custom: &[&str]) -> NoiseFilter {
        let cfg = FilterConfig::default();
        let list = |name: &str, items: &[&str], cutoff: f64| {
            ExclusionList::new(name, items.iter().map(|s| s.to_string()).collect(), cutoff)
        };
        NoiseFilter::with_lists(
            &cfg,
            list("authors", authors, cfg.authors.cutoff),
            list("references", references, cfg.references.cutoff),
            list("custom", custom, cfg.custom.cutoff),
        )
    }

    #[test]
    fn digits_only_line_is_rejected_as_digits_only() {
        let mut f = filter();
        assert_eq!(f.classify("123"), None);
        assert_eq!(f.removals().get(RemovalCategory::DigitsOnly), ["123".to_string()]);
        assert_eq!(f.removals().count(RemovalCategory::SymbolsAndDigitsOnly), 0);
    }

    #[test]
    fn citation_marker_is_stripped() {
        let mut f = filter();
        assert_eq!(f.classify("see [3]").as_deref(), Some("see "));
        assert_eq!(
            f.removals().get(RemovalCategory::BracketedCitation),
            ["[3]".to_string()]
        );
    }

    #[test]
    fn mostly_non_latin_line_is_rejected() {
        let mut f = filter();
        // 19 Greek letters, 1 ASCII letter: 5 % ASCII.
        let line = "αβγδεζηθικλμνξοπρστ a";
        assert_eq!(f.classify(line), None);
        assert_eq!(f.removals().count(RemovalCategory::NonAsciiMajority), 1);
    }

    #[test]
    fn url_line_is_rejected() {
        let mut f = filter();
        assert_eq!(f.classify("www.example.com"), None);
        assert_eq!(f.removals().count(RemovalCategory::Url), 1);
    }

    #[test]
    fn mixed_symbols_and_digits() {
        let (verdict, _) = filter().evaluate("12.4 - 7/8");
        assert_eq!(
            verdict,
            Verdict::Reject(RemovalCategory::SymbolsAndDigitsOnly)
        );
        let (verdict, _) = filter().evaluate("* * *");
        assert_eq!(verdict, Verdict::Reject(RemovalCategory::SymbolsOnly));
    }

    #[test]
    fn disabled_rule_falls_through_to_catch_all() {
        let cfg = FilterConfig {
            remove_digits_only: false,
            ..FilterConfig::default()
        };
        let (verdict, _) = NoiseFilter::without_lists(&cfg).evaluate("42");
        assert_eq!(verdict, Verdict::Reject(RemovalCategory::Degenerate));
    }

    #[test]
    fn fully_stripped_line_is_degenerate() {
        let (verdict, spans) = filter().evaluate("[12]");
        assert_eq!(verdict, Verdict::Reject(RemovalCategory::Degenerate));
        assert_eq!(spans, vec!["[12]".to_string()]);
    }

    #[test]
    fn ordinary_prose_is_kept() {
        let mut f = filter();
        let line = "The quick brown fox jumps over the lazy dog.";
        assert_eq!(f.classify(line).as_deref(), Some(line));
        assert!(f.removals().is_empty());
    }

    #[test]
    fn short_line_matching_author_is_rejected() {
        let mut f = filter_with(&["Jane Q. Doe"], &[], &[]);
        assert_eq!(f.classify("Jane Doe"), None);
        assert_eq!(f.removals().count(RemovalCategory::AuthorMatch), 1);
    }

    #[test]
    fn long_line_skips_author_list() {
        let f = filter_with(&["Jane Doe"], &[], &[]);
        let (verdict, _) = f.evaluate("Jane Doe wrote a long paragraph about foxes");
        assert!(matches!(verdict, Verdict::Keep(_)));
    }

    #[test]
    fn reference_list_needs_leading_bracket() {
        let cfg = FilterConfig {
            strip_brackets: false,
            ..FilterConfig::default()
        };
        let f = NoiseFilter::with_lists(
            &cfg,
            ExclusionList::new("authors", Vec::new(), 0.4),
            ExclusionList::new("references", vec!["Journal of Things".into()], 0.05),
            ExclusionList::new("custom", Vec::new(), 0.4),
        );
        let (verdict, _) = f.evaluate("[4] Smith, Journal of Things, 2001");
        assert_eq!(verdict, Verdict::Reject(RemovalCategory::ReferenceMatch));
        let (verdict, _) = f.evaluate("Smith, Journal of Things, 2001");
        assert!(matches!(verdict, Verdict::Keep(_)));
    }

    #[test]
    fn custom_list_applies_to_any_line() {
        let mut f = filter_with(&[], &[], &["Proceedings of the Example Conference"]);
        assert_eq!(
            f.classify("Proceedings of the Example Conference 2024"),
            None
        );
        assert_eq!(f.removals().count(RemovalCategory::CustomMatch), 1);
    }

    #[test]
    fn take_removals_resets_record() {
        let mut f = filter();
        f.classify("123");
        let taken = f.take_removals();
        assert_eq!(taken.total(), 1);
        assert!(f.removals().is_empty());
    }

    #[test]
    fn new_creates_missing_list_files() {
        let dir = tempfile::tempdir().unwrap();
        let f = NoiseFilter::new(&FilterConfig::default(), dir.path()).unwrap();
        assert!(f.removals().is_empty());
        for name in ["authors", "references", "custom"] {
            assert!(dir.path().join(name).exists(), "{name} not created");
        }
    }
}
