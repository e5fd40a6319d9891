//! From extracted pages to the ordered list of speakable segments.
//!
//! ```text
//! PageText ──filter_page──▶ FilteredPage ──Segmenter::segment──▶ Segmentation
//!   blocks of lines          paragraphs       page markers +      segments +
//!                                              sentence split      processed text
//! ```

use std::sync::Arc;

use crate::extract::PageText;
use crate::filter::NoiseFilter;

use super::markup::page_marker;
use super::splitter::{PeriodSpaceSplitter, SentenceSplitter};

// ---------------------------------------------------------------------------
// FilteredPage
// ---------------------------------------------------------------------------

/// A page after noise filtering: one normalised paragraph per surviving block.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredPage {
    pub number: usize,
    pub label: Option<String>,
    pub paragraphs: Vec<String>,
}

/// Run every line of every block through `filter` and join what survives.
pub fn filter_page(page: &PageText, filter: &mut NoiseFilter) -> FilteredPage {
    let paragraphs = page
        .blocks
        .iter()
        .filter_map(|block| {
            let kept: Vec<String> = block
                .lines()
                .filter_map(|line| filter.classify(line))
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect();
            let paragraph = normalize(&join_lines(&kept));
            (!paragraph.is_empty()).then_some(paragraph)
        })
        .collect();

    FilteredPage {
        number: page.number,
        label: page.label.clone(),
        paragraphs,
    }
}

/// Join lines with single spaces, undoing line-wrap hyphenation: a line
/// ending in `-` followed by one starting with a lowercase letter is joined
/// without the hyphen.
///
/// ```
/// use pdf_tts::segment::join_lines;
///
/// let lines = ["a hyphen-".to_string(), "ated word".to_string()];
/// assert_eq!(join_lines(&lines), "a hyphenated word");
/// ```
pub fn join_lines(lines: &[String]) -> String {
    let mut out = String::new();
    for line in lines {
        if out.is_empty() {
            out.push_str(line);
            continue;
        }
        let continues_word = out.ends_with('-')
            && line.chars().next().is_some_and(char::is_lowercase);
        if continues_word {
            out.pop();
        } else {
            out.push(' ');
        }
        out.push_str(line);
    }
    out
}

/// Cosmetic clean-up of a paragraph: collapse runs of spaces, drop stray
/// `"- "` hyphenation, tighten `" , "` and `" ."`.
pub fn normalize(paragraph: &str) -> String {
    let mut collapsed = String::with_capacity(paragraph.len());
    let mut prev_space = false;
    for c in paragraph.chars() {
        if c == ' ' {
            if !prev_space {
                collapsed.push(c);
            }
            prev_space = true;
        } else {
            collapsed.push(c);
            prev_space = false;
        }
    }

    collapsed
        .replace("- ", "")
        .replace(" , ", ", ")
        .replace(" .", ".")
        .trim()
        .to_string()
}

// ---------------------------------------------------------------------------
// Segmenter
// ---------------------------------------------------------------------------

/// Result of segmenting a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
    /// Speakable units in reading order, page markers included.
    pub segments: Vec<String>,
    /// Page markers and paragraphs separated by blank lines, as persisted in
    /// the processed-text artifact.
    pub processed_text: String,
}

/// Turns filtered pages into segments using a pluggable sentence splitter.
#[derive(Clone)]
pub struct Segmenter {
    splitter: Arc<dyn SentenceSplitter>,
}

impl std::fmt::Debug for Segmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Segmenter").finish_non_exhaustive()
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter {
    /// Segmenter using [`PeriodSpaceSplitter`].
    pub fn new() -> Self {
        Self::with_splitter(PeriodSpaceSplitter)
    }

    pub fn with_splitter(splitter: impl SentenceSplitter + 'static) -> Self {
        Self {
            splitter: Arc::new(splitter),
        }
    }

    /// Segment `pages` in order.  Each page contributes its marker segment
    /// followed by the sentences of its paragraphs.
    pub fn segment(&self, pages: &[FilteredPage]) -> Segmentation {
        let mut out = Segmentation::default();

        for page in pages {
            let marker = page_marker(page.number, page.label.as_deref());
            out.processed_text.push('\n');
            out.processed_text.push_str(&marker);
            out.processed_text.push_str("\n\n");
            out.segments.push(format!("{marker}\n"));

            for paragraph in &page.paragraphs {
                out.processed_text.push_str(paragraph);
                out.processed_text.push_str("\n\n");
                out.segments.extend(self.splitter.split(paragraph));
            }
        }

        log::debug!(
            "segment: {} pages → {} segments",
            pages.len(),
            out.segments.len()
        );
        out
    }

    /// Filter and segment extracted pages in one pass.
    pub fn segment_pages(&self, pages: &[PageText], filter: &mut NoiseFilter) -> Segmentation {
        let filtered: Vec<FilteredPage> = pages.iter().map(|p| filter_page(p, filter)).collect();
        self.segment(&filtered)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;

    fn filter() -> NoiseFilter {
        NoiseFilter::without_lists(&FilterConfig::default())
    }

    #[test]
    fn hyphen_join_only_before_lowercase() {
        let lines = vec!["Covid-".to_string(), "19 cases".to_string()];
        assert_eq!(join_lines(&lines), "Covid- 19 cases");
        let lines = vec!["re-".to_string(), "Entry".to_string()];
        assert_eq!(join_lines(&lines), "re- Entry");
    }

    #[test]
    fn normalize_cleans_spacing() {
        assert_eq!(normalize("a   b , c ."), "a b, c.");
        assert_eq!(normalize("well- known"), "wellknown");
    }

    #[test]
    fn filter_page_drops_noise_lines_and_joins_the_rest() {
        let page = PageText::from_raw(
            1,
            None,
            "The results [3] were\nsignificant. See\nwww.example.com\n\n42\n\nNext block.",
        );
        let mut f = filter();
        let filtered = filter_page(&page, &mut f);
        assert_eq!(
            filtered.paragraphs,
            vec![
                "The results were significant. See".to_string(),
                "Next block.".to_string(),
            ]
        );
        assert_eq!(f.removals().total(), 3);
    }

    #[test]
    fn segments_start_each_page_with_marker() {
        let pages = vec![
            FilteredPage {
                number: 1,
                label: Some("i".into()),
                paragraphs: vec!["First. Second.".into()],
            },
            FilteredPage {
                number: 2,
                label: None,
                paragraphs: vec![],
            },
        ];
        let seg = Segmenter::new().segment(&pages);
        assert_eq!(
            seg.segments,
            vec![
                "<CENTER><UNDERLINE><BOLD>PAGE #1 (i)<BOLD><UNDERLINE><CENTER>\n".to_string(),
                "First. ".to_string(),
                "Second.\n".to_string(),
                "<CENTER><UNDERLINE><BOLD>PAGE #2<BOLD><UNDERLINE><CENTER>\n".to_string(),
            ]
        );
        assert_eq!(
            seg.processed_text,
            "\n<CENTER><UNDERLINE><BOLD>PAGE #1 (i)<BOLD><UNDERLINE><CENTER>\n\n\
             First. Second.\n\n\
             \n<CENTER><UNDERLINE><BOLD>PAGE #2<BOLD><UNDERLINE><CENTER>\n\n"
        );
    }

    #[test]
    fn segment_count_is_stable_across_runs() {
        let pages = vec![
            PageText::from_raw(1, None, "Alpha beta. Gamma delta.\n\n(12)\n\nEpsilon."),
            PageText::from_raw(2, Some("2".into()), "Zeta eta theta."),
        ];
        let segmenter = Segmenter::new();
        let a = segmenter.segment_pages(&pages, &mut filter());
        let b = segmenter.segment_pages(&pages, &mut filter());
        assert_eq!(a, b);
        assert_eq!(a.segments.len(), 6);
    }

    struct WholeParagraph;

    impl SentenceSplitter for WholeParagraph {
        fn split(&self, paragraph: &str) -> Vec<String> {
            vec![format!("{paragraph}\n")]
        }
    }

    #[test]
    fn custom_splitter_is_used() {
        let pages = vec![FilteredPage {
            number: 1,
            label: None,
            paragraphs: vec!["One. Two.".into()],
        }];
        let seg = Segmenter::with_splitter(WholeParagraph).segment(&pages);
        assert_eq!(seg.segments[1], "One. Two.\n");
        assert_eq!(seg.segments.len(), 2);
    }
}
