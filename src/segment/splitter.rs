//! Sentence splitting strategies.

/// Splits one paragraph into speakable fragments.
///
/// Implementations decide the trailing separator of each fragment; the
/// fragments concatenated should read as the paragraph followed by a line
/// break.
pub trait SentenceSplitter: Send + Sync {
    fn split(&self, paragraph: &str) -> Vec<String>;
}

/// Splits on the literal `". "`.
///
/// Every fragment but the last gets `". "` back; the last is terminated with
/// `"\n"`.  Empty fragments are dropped.  Abbreviations (`"Dr. Smith"`) and
/// decimals followed by a space are split too.
///
/// ```
/// use pdf_tts::segment::{PeriodSpaceSplitter, SentenceSplitter};
///
/// let parts = PeriodSpaceSplitter.split("One. Two. Three.");
/// assert_eq!(parts, vec!["One. ", "Two. ", "Three.\n"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodSpaceSplitter;

impl SentenceSplitter for PeriodSpaceSplitter {
    fn split(&self, paragraph: &str) -> Vec<String> {
        let pieces: Vec<&str> = paragraph.trim().split(". ").collect();
        let last = pieces.len().saturating_sub(1);
        pieces
            .iter()
            .enumerate()
            .filter(|(_, piece)| !piece.is_empty())
            .map(|(i, piece)| {
                if i < last {
                    format!("{piece}. ")
                } else {
                    format!("{piece}\n")
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_sentence_gets_newline() {
        assert_eq!(PeriodSpaceSplitter.split("Hello world"), vec!["Hello world\n"]);
    }

    #[test]
    fn empty_paragraph_yields_nothing() {
        assert!(PeriodSpaceSplitter.split("   ").is_empty());
    }

    #[test]
    fn empty_fragments_are_dropped() {
        // ". " at the very start leaves an empty first fragment.
        assert_eq!(PeriodSpaceSplitter.split(". Next"), vec!["Next\n"]);
    }

    #[test]
    fn abbreviations_are_split() {
        assert_eq!(
            PeriodSpaceSplitter.split("See Dr. Smith."),
            vec!["See Dr. ", "Smith.\n"]
        );
    }
}
