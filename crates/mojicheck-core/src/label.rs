//! Page labels and the display label shown in reports.
//!
//! A document may declare page labels through its `/PageLabels` number tree
//! (ISO 32000-1, 12.4.2). Each [`LabelRange`] covers the pages from its
//! `start_page` up to the next range. Pages without a declared label get a
//! zero-padded `"index/total"` fallback from [`display_label`].

/// Numbering style of a label range (`/S` entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// `D`: 1, 2, 3
    Decimal,
    /// `R`: I, II, III
    RomanUpper,
    /// `r`: i, ii, iii
    RomanLower,
    /// `A`: A..Z, AA..ZZ
    AlphaUpper,
    /// `a`: a..z, aa..zz
    AlphaLower,
    /// No `/S` entry: the label is the prefix alone.
    None,
}

impl LabelStyle {
    /// Map a `/S` name to a style. Unknown names behave like a missing entry.
    pub fn from_name(name: &str) -> Self {
        match name {
            "D" => LabelStyle::Decimal,
            "R" => LabelStyle::RomanUpper,
            "r" => LabelStyle::RomanLower,
            "A" => LabelStyle::AlphaUpper,
            "a" => LabelStyle::AlphaLower,
            _ => LabelStyle::None,
        }
    }
}

/// One entry of the `/PageLabels` number tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRange {
    /// 0-based index of the first page in this range.
    pub start_page: usize,
    pub style: LabelStyle,
    pub prefix: Option<String>,
    /// Numeric value of the first page in this range (`/St`, default 1).
    pub start_value: u32,
}

impl LabelRange {
    pub fn new(start_page: usize, style: LabelStyle) -> Self {
        Self {
            start_page,
            style,
            prefix: None,
            start_value: 1,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_start_value(mut self, start_value: u32) -> Self {
        self.start_value = start_value;
        self
    }

    /// Format the label of `page_index`.
    ///
    /// Returns `None` when the page precedes `start_page` or its number cannot
    /// be written in the range's style (overflowing `u32`, or too large for
    /// letters and roman numerals).
    pub fn format(&self, page_index: usize) -> Option<String> {
        let offset = u32::try_from(page_index.checked_sub(self.start_page)?).ok()?;
        let number = self.start_value.checked_add(offset)?;
        let numeric = match self.style {
            LabelStyle::Decimal => number.to_string(),
            LabelStyle::RomanUpper => roman(number)?.to_uppercase(),
            LabelStyle::RomanLower => roman(number)?,
            LabelStyle::AlphaUpper => alpha(number, b'A')?,
            LabelStyle::AlphaLower => alpha(number, b'a')?,
            LabelStyle::None => String::new(),
        };
        Some(match &self.prefix {
            Some(prefix) => format!("{prefix}{numeric}"),
            None => numeric,
        })
    }
}

/// The declared page labels of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLabels {
    ranges: Vec<LabelRange>,
}

impl PageLabels {
    /// Build from ranges in any order.
    pub fn new(mut ranges: Vec<LabelRange>) -> Self {
        ranges.sort_by_key(|r| r.start_page);
        Self { ranges }
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The declared label of `page_index`, or an empty string when no range
    /// covers the page or its label cannot be formatted.
    pub fn declared(&self, page_index: usize) -> String {
        self.ranges
            .iter()
            .rev()
            .find(|r| r.start_page <= page_index)
            .and_then(|r| r.format(page_index))
            .unwrap_or_default()
    }
}

/// Human-readable page identifier used in reports and operator messages.
///
/// Uses the declared label when it is non-empty. Otherwise synthesizes
/// `"{index+1}/{total}"` with both numbers zero-padded to the width of
/// `total` (at least three digits), e.g. `"003/150"`.
pub fn display_label(declared: &str, index: usize, total: usize) -> String {
    if !declared.is_empty() {
        return declared.to_string();
    }
    let width = total.to_string().len().max(3);
    format!("{:0width$}/{:0width$}", index + 1, total)
}

/// Largest number written with letters or roman numerals. Both styles grow
/// linearly with the number.
const MAX_LETTER_NUMBER: u32 = 100_000;

fn roman(mut n: u32) -> Option<String> {
    if n > MAX_LETTER_NUMBER {
        return None;
    }
    const NUMERALS: [(u32, &str); 13] = [
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
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    Some(out)
}

/// 1=A, 26=Z, 27=AA, 28=BB: PDF letter labels repeat the letter instead of
/// counting in base 26.
fn alpha(n: u32, base: u8) -> Option<String> {
    if n > MAX_LETTER_NUMBER {
        return None;
    }
    if n == 0 {
        return Some(String::new());
    }
    let letter = (base + ((n - 1) % 26) as u8) as char;
    let repeat = ((n - 1) / 26 + 1) as usize;
    Some(std::iter::repeat_n(letter, repeat).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_label_pads_to_three_digits() {
        assert_eq!(display_label("", 2, 150), "003/150");
        assert_eq!(display_label("", 0, 3), "001/003");
    }

    #[test]
    fn fallback_label_widens_for_large_documents() {
        assert_eq!(display_label("", 41, 1200), "0042/1200");
    }

    #[test]
    fn declared_label_wins() {
        assert_eq!(display_label("xii", 11, 150), "xii");
    }

    #[test]
    fn roman_numerals() {
        assert_eq!(roman(4).as_deref(), Some("iv"));
        assert_eq!(roman(9).as_deref(), Some("ix"));
        assert_eq!(roman(1994).as_deref(), Some("mcmxciv"));
    }

    #[test]
    fn alpha_labels_repeat_letters() {
        assert_eq!(alpha(1, b'A').as_deref(), Some("A"));
        assert_eq!(alpha(26, b'A').as_deref(), Some("Z"));
        assert_eq!(alpha(27, b'A').as_deref(), Some("AA"));
        assert_eq!(alpha(28, b'a').as_deref(), Some("bb"));
    }

    #[test]
    fn start_value_overflow_falls_back_to_page_count_label() {
        let labels = PageLabels::new(vec![
            LabelRange::new(0, LabelStyle::Decimal).with_start_value(u32::MAX),
        ]);
        assert_eq!(labels.declared(0), u32::MAX.to_string());
        assert_eq!(labels.declared(1), "");
        assert_eq!(display_label(&labels.declared(1), 1, 3), "002/003");
    }

    #[test]
    fn huge_letter_labels_are_not_formatted() {
        let roman_range = LabelRange::new(0, LabelStyle::RomanUpper).with_start_value(u32::MAX - 1);
        assert_eq!(roman_range.format(0), None);
        let alpha_range = LabelRange::new(0, LabelStyle::AlphaLower).with_start_value(3_000_000);
        assert_eq!(alpha_range.format(0), None);
        let small = LabelRange::new(0, LabelStyle::AlphaLower).with_start_value(53);
        assert_eq!(small.format(0).as_deref(), Some("aaa"));
    }

    #[test]
    fn page_before_range_start_is_not_formatted() {
        let range = LabelRange::new(5, LabelStyle::Decimal);
        assert_eq!(range.format(2), None);
    }

    #[test]
    fn ranges_cover_following_pages() {
        let labels = PageLabels::new(vec![
            LabelRange::new(4, LabelStyle::Decimal),
            LabelRange::new(0, LabelStyle::RomanLower),
            LabelRange::new(7, LabelStyle::Decimal)
                .with_prefix("A-")
                .with_start_value(8),
        ]);
        assert_eq!(labels.declared(0), "i");
        assert_eq!(labels.declared(3), "iv");
        assert_eq!(labels.declared(4), "1");
        assert_eq!(labels.declared(6), "3");
        assert_eq!(labels.declared(7), "A-8");
        assert_eq!(labels.declared(9), "A-10");
    }

    #[test]
    fn uncovered_page_has_empty_label() {
        let labels = PageLabels::new(vec![LabelRange::new(2, LabelStyle::Decimal)]);
        assert_eq!(labels.declared(0), "");
        assert_eq!(labels.declared(2), "1");
    }

    #[test]
    fn prefix_only_style() {
        let range = LabelRange::new(0, LabelStyle::None).with_prefix("Cover");
        assert_eq!(range.format(0).as_deref(), Some("Cover"));
    }

    #[test]
    fn style_from_name() {
        assert_eq!(LabelStyle::from_name("R"), LabelStyle::RomanUpper);
        assert_eq!(LabelStyle::from_name("a"), LabelStyle::AlphaLower);
        assert_eq!(LabelStyle::from_name("Q"), LabelStyle::None);
    }
}
