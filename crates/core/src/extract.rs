//! Labeled-field extraction.
//!
//! A field is looked up with an ordered list of [`FieldPattern`]s. The first
//! pattern that matches wins; later patterns are never consulted and values
//! are never merged across patterns.
//!
//! ```text
//! Symptoms: chest pain          ← head line: rest of the line after the label
//! shortness of breath           ← continuation (block patterns only)
//! chest pain                    ← duplicate, dropped during cleaning
//! Allergies: none               ← stop label: ends the block
//! ```

use regex_lite::Regex;
use serde::Serialize;
use std::fmt;

use crate::note::normalize;

/// Rendering of a field that was not found.
pub const UNKNOWN: &str = "N/A";

/// How far a pattern's capture extends past its label.
#[derive(Debug, Clone)]
enum Shape {
    /// The rest of the line.
    Line,
    /// The leading run of ASCII digits.
    Digits,
    /// The rest of the line plus following non-empty lines, up to a line
    /// starting with one of these (lowercased) `label:` prefixes.
    Block { stop_prefixes: Vec<String> },
}

/// One way of locating a labeled field in a note.
///
/// Labels match case-insensitively and unanchored; whitespace after the
/// colon (newlines included) is skipped before the value starts.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    head: Regex,
    shape: Shape,
}

impl FieldPattern {
    /// `Label: value` on a single line.
    pub fn line(label: &str) -> Self {
        Self::build(label, r"([^\n]+)", Shape::Line)
    }

    /// `Label: 42` — digits only.
    pub fn digits(label: &str) -> Self {
        Self::build(label, r"(\d+)", Shape::Digits)
    }

    /// `Label: value` continuing over following lines until a blank line,
    /// end of text, or a line that starts with one of `stop_labels`.
    pub fn block(label: &str, stop_labels: &[&str]) -> Self {
        let stop_prefixes = stop_labels
            .iter()
            .map(|l| format!("{}:", l.to_lowercase()))
            .collect();
        Self::build(label, r"([^\n]+)", Shape::Block { stop_prefixes })
    }

    fn build(label: &str, value: &str, shape: Shape) -> Self {
        let pattern = format!(r"(?i){}:\s*{value}", regex_lite::escape(label));
        let head = Regex::new(&pattern).expect("escaped label always forms a valid pattern");
        Self {
            head,
            shape,
        }
    }

    /// Raw captured value, before cleaning. `None` when the pattern does not
    /// match anywhere in `text`.
    pub fn capture(&self, text: &str) -> Option<String> {
        let caps = self.head.captures(text)?;
        let value = caps.get(1)?;
        let mut captured = value.as_str().to_string();

        if let Shape::Block { stop_prefixes } = &self.shape {
            let mut rest = &text[value.end()..];
            while let Some(after_newline) = rest.strip_prefix('\n') {
                let line = after_newline.split('\n').next().unwrap_or_default();
                let lowered = line.to_lowercase();
                if line.is_empty() || stop_prefixes.iter().any(|p| lowered.starts_with(p)) {
                    break;
                }
                captured.push('\n');
                captured.push_str(line);
                rest = &after_newline[line.len()..];
            }
        }

        Some(captured.trim().to_string())
    }
}

/// The value of one extracted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Found(String),
    Unknown,
}

impl FieldValue {
    pub fn is_unknown(&self) -> bool {
        matches!(self, FieldValue::Unknown)
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            FieldValue::Found(v) => Some(v),
            FieldValue::Unknown => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Found(v) => f.write_str(v),
            FieldValue::Unknown => f.write_str(UNKNOWN),
        }
    }
}

/// A named field and what was found for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedField {
    pub name: String,
    pub value: FieldValue,
}

/// Ordered set of named fields, each with its own priority-ordered patterns.
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    fields: Vec<(String, Vec<FieldPattern>)>,
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Fields are reported in the order they were added.
    pub fn field(mut self, name: impl Into<String>, patterns: Vec<FieldPattern>) -> Self {
        self.fields.push((name.into(), patterns));
        self
    }

    /// Extract every configured field from `text`.
    pub fn extract_all(&self, text: &str) -> Vec<ExtractedField> {
        let text = normalize(text);
        self.fields
            .iter()
            .map(|(name, patterns)| ExtractedField {
                name: name.clone(),
                value: Self::extract(&text, patterns),
            })
            .collect()
    }

    /// Extract a single configured field by name.
    pub fn get(&self, name: &str, text: &str) -> Option<FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, patterns)| Self::extract(text, patterns))
    }

    /// Apply `patterns` in order; the first match wins.
    pub fn extract(text: &str, patterns: &[FieldPattern]) -> FieldValue {
        let text = normalize(text);
        patterns
            .iter()
            .find_map(|p| p.capture(&text))
            .map(|raw| FieldValue::Found(clean_lines(&raw)))
            .unwrap_or(FieldValue::Unknown)
    }
}

/// Drop blank lines and repeated lines, keeping first-seen order.
pub fn clean_lines(value: &str) -> String {
    let mut unique: Vec<&str> = Vec::new();
    for line in value.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        if !unique.contains(&line) {
            unique.push(line);
        }
    }
    unique.join("\n")
}
