//! Defect rules.
//!
//! A [`DefectRule`] looks at one page and appends zero or more
//! [`DefectRecord`]s. Two rules ship by default:
//!
//! - [`TextDefectRule`] runs a list of [`TokenMatcher`]s over every word.
//!   The default matchers flag Kangxi Radicals codepoints
//!   ([`KangxiRadicalMatcher`]) and the mojibake sequence `判夕`
//!   ([`LiteralMatcher`]).
//! - [`OversizedImageRule`] flags images whose encoded stream is at least
//!   6 MiB, once per placement.
//!
//! Rules run in the order they were added to a [`RuleSet`], so records keep
//! page order, then word order, then image order.

use std::ops::RangeInclusive;

use crate::page::PageContent;
use crate::record::DefectRecord;

/// Assigned codepoints of the Kangxi Radicals block.
pub const KANGXI_RADICALS: RangeInclusive<char> = '\u{2F00}'..='\u{2FD5}';

/// Mojibake left behind by a broken CJK conversion.
pub const MOJIBAKE_SEQUENCE: &str = "判夕";

/// Images whose encoded stream reaches this size are reported.
pub const OVERSIZED_IMAGE_BYTES: usize = 6 * 1024 * 1024;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A rule that inspects one page.
pub trait DefectRule {
    /// Short identifier used in log output.
    fn name(&self) -> &'static str;

    /// Append the defects found on `page` to `out`, in page order.
    fn inspect(&self, page: &PageContent, out: &mut Vec<DefectRecord>);
}

/// A match inside a single text token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    /// 0-based character offset of the match start.
    pub char_position: usize,
    pub value: String,
}

/// Finds suspicious substrings in a text token.
pub trait TokenMatcher {
    fn find(&self, text: &str) -> Vec<TokenMatch>;
}

/// Matches every character of a codepoint range, one match per character.
#[derive(Debug, Clone)]
pub struct KangxiRadicalMatcher {
    range: RangeInclusive<char>,
}

impl Default for KangxiRadicalMatcher {
    fn default() -> Self {
        Self {
            range: KANGXI_RADICALS,
        }
    }
}

impl TokenMatcher for KangxiRadicalMatcher {
    fn find(&self, text: &str) -> Vec<TokenMatch> {
        text.chars()
            .enumerate()
            .filter(|(_, c)| self.range.contains(c))
            .map(|(char_position, c)| TokenMatch {
                char_position,
                value: c.to_string(),
            })
            .collect()
    }
}

/// Matches a literal string with a left-to-right, non-overlapping scan.
#[derive(Debug, Clone)]
pub struct LiteralMatcher {
    needle: String,
}

impl LiteralMatcher {
    pub fn new(needle: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
        }
    }

    /// The `判夕` mojibake matcher.
    pub fn mojibake() -> Self {
        Self::new(MOJIBAKE_SEQUENCE)
    }
}

impl TokenMatcher for LiteralMatcher {
    fn find(&self, text: &str) -> Vec<TokenMatch> {
        if self.needle.is_empty() {
            return Vec::new();
        }
        text.match_indices(self.needle.as_str())
            .map(|(byte_offset, value)| TokenMatch {
                char_position: text[..byte_offset].chars().count(),
                value: value.to_string(),
            })
            .collect()
    }
}

/// Runs token matchers over every word of a page.
///
/// For each word, all matches of the first matcher come before those of the
/// second, and so on. Every match shares the word's bounding box.
pub struct TextDefectRule {
    matchers: Vec<Box<dyn TokenMatcher>>,
}

impl TextDefectRule {
    pub fn new(matchers: Vec<Box<dyn TokenMatcher>>) -> Self {
        Self { matchers }
    }
}

impl Default for TextDefectRule {
    fn default() -> Self {
        Self::new(vec![
            Box::new(KangxiRadicalMatcher::default()),
            Box::new(LiteralMatcher::mojibake()),
        ])
    }
}

impl DefectRule for TextDefectRule {
    fn name(&self) -> &'static str {
        "text"
    }

    fn inspect(&self, page: &PageContent, out: &mut Vec<DefectRecord>) {
        for word in &page.words {
            for matcher in &self.matchers {
                for m in matcher.find(&word.text) {
                    out.push(DefectRecord::text(
                        page.index,
                        page.label.as_str(),
                        word.text.as_str(),
                        m.char_position,
                        m.value,
                        word.bbox,
                    ));
                }
            }
        }
    }
}

/// Flags images whose encoded stream is at least `threshold` bytes.
#[derive(Debug, Clone)]
pub struct OversizedImageRule {
    threshold: usize,
}

impl OversizedImageRule {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Default for OversizedImageRule {
    fn default() -> Self {
        Self::new(OVERSIZED_IMAGE_BYTES)
    }
}

impl DefectRule for OversizedImageRule {
    fn name(&self) -> &'static str {
        "image-size"
    }

    fn inspect(&self, page: &PageContent, out: &mut Vec<DefectRecord>) {
        for image in &page.images {
            if image.byte_len < self.threshold {
                continue;
            }
            let size = size_description(image.byte_len);
            for rect in &image.placements {
                out.push(DefectRecord::image(
                    page.index,
                    page.label.as_str(),
                    size.as_str(),
                    *rect,
                ));
            }
        }
    }
}

/// Image size in megabytes with two decimals, e.g. `"6.50MB"`.
pub fn size_description(byte_len: usize) -> String {
    format!("{:.2}MB", byte_len as f64 / BYTES_PER_MB)
}

/// An ordered collection of rules applied to every page.
pub struct RuleSet {
    rules: Vec<Box<dyn DefectRule>>,
}

impl RuleSet {
    /// An empty rule set.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: impl DefectRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Apply every rule to `page`.
    pub fn inspect(&self, page: &PageContent) -> Vec<DefectRecord> {
        let mut out = Vec::new();
        for rule in &self.rules {
            rule.inspect(page, &mut out);
        }
        out
    }
}

impl Default for RuleSet {
    /// Text rule (Kangxi radicals, `判夕`) followed by the 6 MiB image rule.
    fn default() -> Self {
        Self::new()
            .with_rule(TextDefectRule::default())
            .with_rule(OversizedImageRule::default())
    }
}
