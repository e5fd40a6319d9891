//! Fuzzy exclusion lists: plain-text files of known noise lines.
//!
//! One entry per line; blank lines are ignored.  A missing file is created
//! empty so users can find it next to the others and fill it in.

use std::path::Path;

use crate::config::ExclusionListConfig;

use super::similarity::SimilarityMatcher;
use super::FilterError;

/// Entries of one exclusion list and the similarity above which a candidate
/// is rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct ExclusionList {
    name: String,
    entries: Vec<String>,
    cutoff: f64,
}

impl ExclusionList {
    pub fn new(name: impl Into<String>, entries: Vec<String>, cutoff: f64) -> Self {
        Self {
            name: name.into(),
            entries,
            cutoff,
        }
    }

    /// Read `config.file` from `dir`, creating the directory and an empty
    /// file when they are missing.
    pub fn load_or_create(dir: &Path, config: &ExclusionListConfig) -> Result<Self, FilterError> {
        let path = dir.join(&config.file);

        if !path.exists() {
            std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
            std::fs::write(&path, "").map_err(|e| io_error(&path, e))?;
            log::info!("filter: created empty exclusion list {}", path.display());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        let entries: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        log::debug!(
            "filter: loaded {} entries from {}",
            entries.len(),
            path.display()
        );

        Ok(Self::new(config.file.clone(), entries, config.cutoff))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `true` when any entry is more similar to the candidate than the cutoff.
    pub fn matches(&self, candidate: &SimilarityMatcher) -> bool {
        self.entries
            .iter()
            .any(|entry| candidate.exceeds(entry, self.cutoff))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> FilterError {
    FilterError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(file: &str, cutoff: f64) -> ExclusionListConfig {
        ExclusionListConfig {
            file: file.into(),
            cutoff,
        }
    }

    #[test]
    fn missing_file_is_created_empty() {
        let dir = tempfile::tempdir().unwrap();
        let filters = dir.path().join("filters");

        let list = ExclusionList::load_or_create(&filters, &config("authors", 0.4)).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.name(), "authors");
        assert!(filters.join("authors").exists());
    }

    #[test]
    fn loads_non_blank_trimmed_lines() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("custom"), "  Running Header \n\n\nAcme Corp\n").unwrap();

        let list = ExclusionList::load_or_create(dir.path(), &config("custom", 0.4)).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.matches(&SimilarityMatcher::new("Running Header")));
        assert!(!list.matches(&SimilarityMatcher::new("zzzz qqqq")));
    }

    #[test]
    fn empty_list_never_matches() {
        let list = ExclusionList::new("authors", Vec::new(), 0.0);
        assert!(!list.matches(&SimilarityMatcher::new("anything")));
    }
}
