//! Page labels (`/PageLabels` in the document catalog).
//!
//! A document can number its front matter `i, ii, iii`, its body `1, 2, 3`
//! and its appendices `A-1, A-2`.  The labels are stored as a number tree
//! mapping the first page index of each range to a label dictionary with an
//! optional style `/S`, prefix `/P` and start value `/St`.

use lopdf::{Dictionary, Document, Object};

use super::objects::{get, get_dict, get_text, resolve};

/// Numbering style of a label range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLabelStyle {
    Decimal,
    RomanUpper,
    RomanLower,
    AlphaUpper,
    AlphaLower,
    /// Prefix only.
    None,
}

impl PageLabelStyle {
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"D" => PageLabelStyle::Decimal,
            b"R" => PageLabelStyle::RomanUpper,
            b"r" => PageLabelStyle::RomanLower,
            b"A" => PageLabelStyle::AlphaUpper,
            b"a" => PageLabelStyle::AlphaLower,
            _ => PageLabelStyle::None,
        }
    }
}

/// Labelling scheme for the pages from `start_page` up to the next range.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLabelRange {
    /// Zero-based index of the first page in the range.
    pub start_page: usize,
    pub style: PageLabelStyle,
    pub prefix: Option<String>,
    /// Numeric value of the first page in the range (default 1).
    pub start_value: u32,
}

impl PageLabelRange {
    /// Format the label of `page_index`.  `None` when the page lies before
    /// the range or its number does not fit in a `u32`.
    pub fn format_label(&self, page_index: usize) -> Option<String> {
        let offset = u32::try_from(page_index.checked_sub(self.start_page)?).ok()?;
        let number = self.start_value.checked_add(offset)?;
        let numeral = match self.style {
            PageLabelStyle::Decimal => number.to_string(),
            PageLabelStyle::RomanUpper => to_roman(number).to_uppercase(),
            PageLabelStyle::RomanLower => to_roman(number),
            PageLabelStyle::AlphaUpper => to_alpha(number).to_uppercase(),
            PageLabelStyle::AlphaLower => to_alpha(number),
            PageLabelStyle::None => String::new(),
        };
        Some(match &self.prefix {
            Some(prefix) => format!("{prefix}{numeral}"),
            None => numeral,
        })
    }
}

/// Resolved page-label ranges of one document, sorted by start page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLabels {
    ranges: Vec<PageLabelRange>,
}

impl PageLabels {
    pub fn new(mut ranges: Vec<PageLabelRange>) -> Self {
        ranges.sort_by_key(|r| r.start_page);
        Self { ranges }
    }

    /// Read the label tree from the catalog.  A missing or malformed tree
    /// yields no labels.
    pub fn from_document(doc: &Document) -> Self {
        let Ok(catalog) = doc.catalog() else {
            return Self::default();
        };
        let Some(tree) = get_dict(doc, catalog, b"PageLabels") else {
            return Self::default();
        };
        let mut ranges = Vec::new();
        collect_ranges(doc, tree, &mut ranges, 0);
        Self::new(ranges)
    }

    /// Label of the zero-based `page_index`, or `None` when no range covers
    /// it or the range formats to an empty string.
    pub fn label_for(&self, page_index: usize) -> Option<String> {
        let range = self
            .ranges
            .iter()
            .rev()
            .find(|r| r.start_page <= page_index)?;
        let label = range.format_label(page_index)?;
        (!label.is_empty()).then_some(label)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Walk a number-tree node: `/Nums` pairs on leaves, `/Kids` on inner nodes.
fn collect_ranges(doc: &Document, node: &Dictionary, out: &mut Vec<PageLabelRange>, depth: usize) {
    if depth > 16 {
        return;
    }

    if let Some(Object::Array(nums)) = get(doc, node, b"Nums") {
        for pair in nums.chunks_exact(2) {
            let start = match resolve(doc, &pair[0]) {
                Some(Object::Integer(i)) if *i >= 0 => *i as usize,
                _ => continue,
            };
            if let Some(Object::Dictionary(label)) = resolve(doc, &pair[1]) {
                out.push(parse_label_dict(doc, label, start));
            }
        }
    }

    if let Some(Object::Array(kids)) = get(doc, node, b"Kids") {
        for kid in kids {
            if let Some(Object::Dictionary(kid)) = resolve(doc, kid) {
                collect_ranges(doc, kid, out, depth + 1);
            }
        }
    }
}

fn parse_label_dict(doc: &Document, dict: &Dictionary, start_page: usize) -> PageLabelRange {
    let style = match get(doc, dict, b"S") {
        Some(Object::Name(name)) => PageLabelStyle::from_name(name),
        _ => PageLabelStyle::None,
    };
    let start_value = match get(doc, dict, b"St") {
        Some(Object::Integer(st)) if *st > 0 => u32::try_from(*st).unwrap_or(1),
        _ => 1,
    };
    PageLabelRange {
        start_page,
        style,
        prefix: get_text(doc, dict, b"P"),
        start_value,
    }
}

/// Lowercase roman numeral.  Values above 3999 fall back to decimal.
fn to_roman(mut n: u32) -> String {
    if n == 0 || n > 3999 {
        return n.to_string();
    }
    const TABLE: [(u32, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = String::new();
    for (value, numeral) in TABLE {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

/// Longest letter label produced before falling back to decimal.
const MAX_ALPHA_REPEAT: u32 = 32;

/// Lowercase letter label: a..z, then aa..zz, aaa..zzz and so on.  Values
/// needing more than [`MAX_ALPHA_REPEAT`] letters fall back to decimal.
fn to_alpha(n: u32) -> String {
    if n == 0 {
        return String::new();
    }
    let repeat = (n - 1) / 26 + 1;
    if repeat > MAX_ALPHA_REPEAT {
        return n.to_string();
    }
    let letter = (b'a' + ((n - 1) % 26) as u8) as char;
    let repeat = repeat as usize;
    std::iter::repeat(letter).take(repeat).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Object, StringFormat};

    fn range(start_page: usize, style: PageLabelStyle) -> PageLabelRange {
        PageLabelRange {
            start_page,
            style,
            prefix: None,
            start_value: 1,
        }
    }

    #[test]
    fn roman_numerals() {
        assert_eq!(to_roman(1), "i");
        assert_eq!(to_roman(4), "iv");
        assert_eq!(to_roman(9), "ix");
        assert_eq!(to_roman(14), "xiv");
        assert_eq!(to_roman(1994), "mcmxciv");
    }

    #[test]
    fn alpha_labels_repeat_after_z() {
        assert_eq!(to_alpha(1), "a");
        assert_eq!(to_alpha(26), "z");
        assert_eq!(to_alpha(27), "aa");
        assert_eq!(to_alpha(53), "aaa");
    }

    #[test]
    fn format_label_with_prefix_and_start() {
        let r = PageLabelRange {
            start_page: 10,
            style: PageLabelStyle::Decimal,
            prefix: Some("A-".into()),
            start_value: 5,
        };
        assert_eq!(r.format_label(10).as_deref(), Some("A-5"));
        assert_eq!(r.format_label(12).as_deref(), Some("A-7"));
        assert_eq!(r.format_label(9), None);
    }

    #[test]
    fn start_value_at_u32_max_does_not_overflow() {
        let r = PageLabelRange {
            start_value: u32::MAX,
            ..range(0, PageLabelStyle::Decimal)
        };
        assert_eq!(r.format_label(0), Some(u32::MAX.to_string()));
        assert_eq!(r.format_label(1), None);

        let labels = PageLabels::new(vec![r]);
        assert_eq!(labels.label_for(0), Some(u32::MAX.to_string()));
        assert_eq!(labels.label_for(1), None);
    }

    #[test]
    fn oversized_alpha_start_falls_back_to_decimal() {
        assert_eq!(to_alpha(26 * MAX_ALPHA_REPEAT).len(), MAX_ALPHA_REPEAT as usize);
        assert_eq!(to_alpha(26 * MAX_ALPHA_REPEAT + 1), (26 * MAX_ALPHA_REPEAT + 1).to_string());

        let r = PageLabelRange {
            start_value: 4_000_000_000,
            ..range(0, PageLabelStyle::AlphaLower)
        };
        assert_eq!(r.format_label(0).as_deref(), Some("4000000000"));
    }

    #[test]
    fn start_value_beyond_u32_reads_as_one() {
        let mut doc = Document::with_version("1.5");
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "PageLabels" => dictionary! {
                "Nums" => vec![
                    0.into(),
                    dictionary! { "S" => "D", "St" => Object::Integer(i64::from(u32::MAX) + 5) }
                        .into(),
                ],
            },
        });
        doc.trailer.set("Root", catalog_id);

        let labels = PageLabels::from_document(&doc);
        assert_eq!(labels.label_for(0).as_deref(), Some("1"));
        assert_eq!(labels.label_for(2).as_deref(), Some("3"));
    }

    #[test]
    fn label_for_picks_covering_range() {
        let labels = PageLabels::new(vec![
            range(3, PageLabelStyle::Decimal),
            range(0, PageLabelStyle::RomanLower),
        ]);
        assert_eq!(labels.label_for(0).as_deref(), Some("i"));
        assert_eq!(labels.label_for(2).as_deref(), Some("iii"));
        assert_eq!(labels.label_for(3).as_deref(), Some("1"));
        assert_eq!(labels.label_for(7).as_deref(), Some("5"));
    }

    #[test]
    fn uncovered_or_empty_label_is_none() {
        let labels = PageLabels::new(vec![range(2, PageLabelStyle::None)]);
        assert_eq!(labels.label_for(0), None);
        assert_eq!(labels.label_for(2), None);
    }

    #[test]
    fn reads_tree_from_catalog() {
        let mut doc = Document::with_version("1.5");
        let appendix = dictionary! {
            "S" => "D",
            "P" => Object::String(b"A-".to_vec(), StringFormat::Literal),
        };
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "PageLabels" => dictionary! {
                "Nums" => vec![
                    0.into(),
                    dictionary! { "S" => "r" }.into(),
                    2.into(),
                    appendix.into(),
                ],
            },
        });
        doc.trailer.set("Root", catalog_id);

        let labels = PageLabels::from_document(&doc);
        assert!(!labels.is_empty());
        assert_eq!(labels.label_for(1).as_deref(), Some("ii"));
        assert_eq!(labels.label_for(3).as_deref(), Some("A-2"));
    }

    #[test]
    fn missing_tree_yields_no_labels() {
        let mut doc = Document::with_version("1.5");
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog" });
        doc.trailer.set("Root", catalog_id);
        assert!(PageLabels::from_document(&doc).is_empty());
    }
}
