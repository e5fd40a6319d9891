//! Inline structural tags carried inside segment text.
//!
//! Tags are written as `<NAME>` and bracket the text they apply to, e.g.
//! `<BOLD>Title<BOLD>`.  Readers render them; the synthesis service must
//! never see them.

/// Every tag that may appear in segment text.
pub const FORMATTING_TAGS: [&str; 5] = ["BOLD", "ITALIC", "UNDERLINE", "STRIKETHROUGH", "CENTER"];

/// The marker segment placed before each page's content.
///
/// ```
/// use pdf_tts::segment::page_marker;
///
/// assert_eq!(
///     page_marker(5, Some("iii")),
///     "<CENTER><UNDERLINE><BOLD>PAGE #5 (iii)<BOLD><UNDERLINE><CENTER>"
/// );
/// assert_eq!(
///     page_marker(1, None),
///     "<CENTER><UNDERLINE><BOLD>PAGE #1<BOLD><UNDERLINE><CENTER>"
/// );
/// ```
pub fn page_marker(number: usize, label: Option<&str>) -> String {
    let label = match label {
        Some(l) if !l.is_empty() => format!(" ({l})"),
        _ => String::new(),
    };
    format!("<CENTER><UNDERLINE><BOLD>PAGE #{number}{label}<BOLD><UNDERLINE><CENTER>")
}

/// Remove every formatting tag, leaving the text between them.
pub fn strip_markup(text: &str) -> String {
    FORMATTING_TAGS
        .iter()
        .fold(text.to_string(), |acc, tag| acc.replace(&format!("<{tag}>"), ""))
}

/// `true` for segments produced by [`page_marker`].
pub fn is_page_marker(segment: &str) -> bool {
    segment.trim_start().starts_with("<CENTER><UNDERLINE><BOLD>PAGE #")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_markup_removes_all_tags() {
        let marker = page_marker(2, Some("ii"));
        assert_eq!(strip_markup(&marker), "PAGE #2 (ii)");
        assert_eq!(
            strip_markup("<ITALIC>a<ITALIC> <STRIKETHROUGH>b<STRIKETHROUGH>"),
            "a b"
        );
    }

    #[test]
    fn strip_markup_keeps_unknown_angle_text() {
        assert_eq!(strip_markup("x < y and <EM>z"), "x < y and <EM>z");
    }

    #[test]
    fn empty_label_is_omitted() {
        assert_eq!(page_marker(3, Some("")), page_marker(3, None));
    }

    #[test]
    fn detects_marker_segments() {
        assert!(is_page_marker(&format!("{}\n", page_marker(1, None))));
        assert!(!is_page_marker("PAGE #1"));
    }
}
