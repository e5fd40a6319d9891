//! Individual noise heuristics.
//!
//! Each predicate looks at one line after bracket stripping.  They are pure
//! functions; [`NoiseFilter`](super::NoiseFilter) decides the order and
//! records what fired.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::FilterConfig;

// ---------------------------------------------------------------------------
// Bracket stripping
// ---------------------------------------------------------------------------

static PAREN_ANY: OnceLock<Option<Regex>> = OnceLock::new();
static PAREN_LETTERLESS: OnceLock<Option<Regex>> = OnceLock::new();
static BRACKET_ANY: OnceLock<Option<Regex>> = OnceLock::new();
static BRACKET_LETTERLESS: OnceLock<Option<Regex>> = OnceLock::new();
static BRACE_ANY: OnceLock<Option<Regex>> = OnceLock::new();
static BRACE_LETTERLESS: OnceLock<Option<Regex>> = OnceLock::new();

fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

/// Removes `( )`, `[ ]` and `{ }` spans according to [`FilterConfig`].
#[derive(Debug, Clone)]
pub struct BracketStripper {
    patterns: Vec<&'static Regex>,
}

impl BracketStripper {
    pub fn new(config: &FilterConfig) -> Self {
        let letterless = config.strip_only_without_letters;
        let mut patterns = Vec::new();

        let mut add = |enabled: bool, found: Option<&'static Regex>| {
            if enabled {
                match found {
                    Some(re) => patterns.push(re),
                    None => log::error!("filter: bracket pattern failed to compile"),
                }
            }
        };

        add(
            config.strip_parentheses,
            if letterless {
                cached(&PAREN_LETTERLESS, r"\([^()\p{Alphabetic}]*\)")
            } else {
                cached(&PAREN_ANY, r"\(.*?\)")
            },
        );
        add(
            config.strip_brackets,
            if letterless {
                cached(&BRACKET_LETTERLESS, r"\[[^\[\]\p{Alphabetic}]*\]")
            } else {
                cached(&BRACKET_ANY, r"\[.*?\]")
            },
        );
        add(
            config.strip_braces,
            if letterless {
                cached(&BRACE_LETTERLESS, r"\{[^{}\p{Alphabetic}]*\}")
            } else {
                cached(&BRACE_ANY, r"\{.*?\}")
            },
        );

        Self { patterns }
    }

    /// Strip every enabled span kind.  Returns the remaining text and the
    /// removed spans in the order they were found.
    ///
    /// ```
    /// use pdf_tts::config::FilterConfig;
    /// use pdf_tts::filter::BracketStripper;
    ///
    /// let stripper = BracketStripper::new(&FilterConfig::default());
    /// let (kept, removed) = stripper.strip("see [3] (and Figure 2)");
    /// assert_eq!(kept, "see  (and Figure 2)");
    /// assert_eq!(removed, vec!["[3]".to_string()]);
    /// ```
    pub fn strip(&self, text: &str) -> (String, Vec<String>) {
        let mut current = text.to_string();
        let mut removed = Vec::new();
        for re in &self.patterns {
            if !re.is_match(&current) {
                continue;
            }
            removed.extend(re.find_iter(&current).map(|m| m.as_str().to_string()));
            current = re.replace_all(&current, "").into_owned();
        }
        (current, removed)
    }
}

// ---------------------------------------------------------------------------
// Character-class predicates
// ---------------------------------------------------------------------------

/// The text with every whitespace character removed.
pub fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Non-empty, only ASCII punctuation and digits, and both kinds present.
pub fn is_symbols_and_digits_only(compact: &str) -> bool {
    let mut punct = false;
    let mut digit = false;
    for c in compact.chars() {
        if c.is_ascii_punctuation() {
            punct = true;
        } else if c.is_ascii_digit() {
            digit = true;
        } else {
            return false;
        }
    }
    punct && digit
}

pub fn is_symbols_only(compact: &str) -> bool {
    !compact.is_empty() && compact.chars().all(|c| c.is_ascii_punctuation())
}

pub fn is_digits_only(compact: &str) -> bool {
    !compact.is_empty() && compact.chars().all(|c| c.is_ascii_digit())
}

/// Fraction of ASCII characters, or `None` for empty input.
pub fn ascii_ratio(compact: &str) -> Option<f64> {
    let total = compact.chars().count();
    if total == 0 {
        return None;
    }
    let ascii = compact.chars().filter(char::is_ascii).count();
    Some(ascii as f64 / total as f64)
}

/// Starts with `http` or `www` once every non-letter is removed, so
/// `"w w w . example"` and `"https://..."` both count.
pub fn looks_like_url(text: &str) -> bool {
    let letters: String = text.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    letters.starts_with("http") || letters.starts_with("www")
}

/// Empty, digits only, or a bare link.
pub fn is_degenerate(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty()
        || compact(trimmed).chars().all(|c| c.is_ascii_digit())
        || trimmed.starts_with("http")
        || trimmed.starts_with("www")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stripper(letterless: bool) -> BracketStripper {
        BracketStripper::new(&FilterConfig {
            strip_only_without_letters: letterless,
            ..FilterConfig::default()
        })
    }

    #[test]
    fn strips_letterless_spans_only() {
        let (kept, removed) = stripper(true).strip("Results (3) were [12, 14] good {5}");
        assert_eq!(kept, "Results  were  good ");
        assert_eq!(removed, vec!["(3)", "[12, 14]", "{5}"]);
    }

    #[test]
    fn keeps_spans_with_letters_when_letterless() {
        let (kept, removed) = stripper(true).strip("(see Figure 2 caption)");
        assert_eq!(kept, "(see Figure 2 caption)");
        assert!(removed.is_empty());
    }

    #[test]
    fn strips_any_span_when_unrestricted() {
        let (kept, removed) = stripper(false).strip("a (see Figure 2) b");
        assert_eq!(kept, "a  b");
        assert_eq!(removed, vec!["(see Figure 2)"]);
    }

    #[test]
    fn disabled_kinds_are_left_alone() {
        let s = BracketStripper::new(&FilterConfig {
            strip_brackets: false,
            ..FilterConfig::default()
        });
        let (kept, _) = s.strip("x [1] (2)");
        assert_eq!(kept, "x [1] ");
    }

    #[test]
    fn symbol_and_digit_predicates() {
        assert!(is_symbols_and_digits_only("(1)-2"));
        assert!(!is_symbols_and_digits_only("123"));
        assert!(!is_symbols_and_digits_only("---"));
        assert!(!is_symbols_and_digits_only(""));
        assert!(is_symbols_only("***"));
        assert!(!is_symbols_only(""));
        assert!(is_digits_only("123"));
        assert!(!is_digits_only("12a"));
    }

    #[test]
    fn ascii_ratio_counts_chars() {
        assert_eq!(ascii_ratio(""), None);
        assert_eq!(ascii_ratio("ab"), Some(1.0));
        assert_eq!(ascii_ratio("aé"), Some(0.5));
    }

    #[test]
    fn url_detection_ignores_punctuation() {
        assert!(looks_like_url("www.example.com"));
        assert!(looks_like_url("https://example.com/a"));
        assert!(looks_like_url("  (http) link"));
        assert!(!looks_like_url("the web"));
    }

    #[test]
    fn degenerate_lines() {
        assert!(is_degenerate("   "));
        assert!(is_degenerate("1 2 3"));
        assert!(is_degenerate("http"));
        assert!(!is_degenerate("Chapter 1"));
    }
}
