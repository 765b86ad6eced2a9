//! Line classification shared by every metrics parser.
//!
//! Each line is checked against these rules, first match wins:
//!
//! 1. `[label]` (optionally followed by whitespace) is a section header,
//!    when the format uses sections
//! 2. `#...` is a comment, an empty or all-whitespace line is blank
//! 3. the format's [`HeaderRule`] decides whether it is a column header
//! 4. everything else is data
//!
//! Header and data lines have trailing whitespace removed before being split
//! on the format delimiter.

use std::iter::Enumerate;
use std::str::Lines;
use std::sync::OnceLock;

use regex::Regex;

fn section_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\[(.*)\]\s*$").expect("section pattern is valid"))
}

/// How a format recognises its column header line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRule {
    /// The format has no header line
    None,
    /// Only the first non-comment, non-blank line, and only if it starts with the prefix
    FirstRecordPrefix(&'static str),
    /// Any line starting with the prefix
    Prefix(&'static str),
    /// Any line ending with the suffix
    Suffix(&'static str),
}

/// Per-format classification settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRules {
    pub delimiter: char,
    pub header: HeaderRule,
    pub sections: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Section(&'a str),
    Comment,
    Blank,
    ColumnHeader(Vec<&'a str>),
    Data(Vec<&'a str>),
}

/// A classified line with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    pub number: usize,
    pub kind: LineKind<'a>,
}

/// Lazy iterator over classified lines, see [`classify`]
pub struct ClassifiedLines<'a> {
    lines: Enumerate<Lines<'a>>,
    rules: LineRules,
    seen_record: bool,
}

/// Classify `text` line by line according to `rules`
#[must_use]
pub fn classify(text: &str, rules: LineRules) -> ClassifiedLines<'_> {
    ClassifiedLines {
        lines: text.lines().enumerate(),
        rules,
        seen_record: false,
    }
}

impl<'a> ClassifiedLines<'a> {
    fn classify_line(&mut self, line: &'a str) -> LineKind<'a> {
        if self.rules.sections {
            if let Some(label) = section_pattern()
                .captures(line)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
            {
                self.seen_record = true;
                return LineKind::Section(label);
            }
        }

        if line.starts_with('#') {
            return LineKind::Comment;
        }
        if line.trim().is_empty() {
            return LineKind::Blank;
        }

        let first_record = !self.seen_record;
        self.seen_record = true;

        let trimmed = line.trim_end();
        let is_header = match self.rules.header {
            HeaderRule::None => false,
            HeaderRule::FirstRecordPrefix(prefix) => first_record && trimmed.starts_with(prefix),
            HeaderRule::Prefix(prefix) => trimmed.starts_with(prefix),
            HeaderRule::Suffix(suffix) => trimmed.ends_with(suffix),
        };

        let fields = trimmed.split(self.rules.delimiter).collect();
        if is_header {
            LineKind::ColumnHeader(fields)
        } else {
            LineKind::Data(fields)
        }
    }
}

impl<'a> Iterator for ClassifiedLines<'a> {
    type Item = ClassifiedLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, line) = self.lines.next()?;
        let kind = self.classify_line(line);
        Some(ClassifiedLine {
            number: idx + 1,
            kind,
        })
    }
}
