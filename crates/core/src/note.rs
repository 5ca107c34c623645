//! The patient note — the one input every agent receives.

use std::fmt;

/// Convert literal `\n` escape sequences to real newlines and trim.
///
/// Applied at every boundary (coordinator entry, agent wrapper entry,
/// agent entry) so that text arriving with escaped newlines from a browser
/// form behaves the same as text with real line breaks. Idempotent.
pub fn normalize(raw: &str) -> String {
    raw.replace("\\n", "\n").trim().to_string()
}

/// A normalized, unstructured patient note.
///
/// The only way to build one is through [`normalize`], so extraction and
/// matching code never sees escaped newlines or surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Note {
    text: String,
}

impl Note {
    pub fn new(raw: &str) -> Self {
        Self {
            text: normalize(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True when nothing but whitespace was supplied.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<&str> for Note {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Note {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
