//! Diagnostic record of rejected lines, bucketed by the rule that fired.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The rule that rejected (or, for bracketed spans, stripped) a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalCategory {
    SymbolsAndDigitsOnly,
    SymbolsOnly,
    DigitsOnly,
    NonAsciiMajority,
    Url,
    AuthorMatch,
    ReferenceMatch,
    CustomMatch,
    BracketedCitation,
    Degenerate,
}

impl RemovalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemovalCategory::SymbolsAndDigitsOnly => "symbols-and-digits-only",
            RemovalCategory::SymbolsOnly => "symbols-only",
            RemovalCategory::DigitsOnly => "digits-only",
            RemovalCategory::NonAsciiMajority => "non-ascii-majority",
            RemovalCategory::Url => "url",
            RemovalCategory::AuthorMatch => "author-match",
            RemovalCategory::ReferenceMatch => "reference-match",
            RemovalCategory::CustomMatch => "custom-match",
            RemovalCategory::BracketedCitation => "bracketed-citation",
            RemovalCategory::Degenerate => "degenerate",
        }
    }
}

impl fmt::Display for RemovalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected text per category, in the order it was seen.
///
/// Serialises as a JSON object keyed by the kebab-case category name.  Never
/// consulted for control flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Removals {
    buckets: BTreeMap<RemovalCategory, Vec<String>>,
}

impl Removals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: RemovalCategory, text: impl Into<String>) {
        self.buckets.entry(category).or_default().push(text.into());
    }

    /// Texts recorded under `category`.
    pub fn get(&self, category: RemovalCategory) -> &[String] {
        self.buckets.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, category: RemovalCategory) -> usize {
        self.get(category).len()
    }

    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (RemovalCategory, &[String])> {
        self.buckets.iter().map(|(c, v)| (*c, v.as_slice()))
    }
}
