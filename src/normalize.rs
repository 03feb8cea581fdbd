//! Whitespace normalization for extracted page text.
//!
//! The transforms run in a fixed order:
//!
//! 1. `\r\n`, then any remaining `\r`, become `\n`
//! 2. runs of spaces and tabs become a single space
//! 3. runs of three or more `\n` become exactly `\n\n`
//! 4. leading and trailing whitespace is stripped

use std::sync::OnceLock;

use regex::Regex;

/// Compiled normalization patterns.
pub struct TextNormalizer {
    horizontal_run: Regex,
    blank_line_run: Regex,
}

impl TextNormalizer {
    /// Compile a new normalizer.
    pub fn new() -> Self {
        Self {
            horizontal_run: Regex::new(r"[ \t]+").unwrap(),
            blank_line_run: Regex::new(r"\n{3,}").unwrap(),
        }
    }

    /// Normalize a page of text.
    pub fn process(&self, text: &str) -> String {
        let unified = text.replace("\r\n", "\n").replace('\r', "\n");
        let spaced = self.horizontal_run.replace_all(&unified, " ");
        let capped = self.blank_line_run.replace_all(&spaced, "\n\n");
        capped.trim().to_string()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize text with a shared [`TextNormalizer`].
///
/// ```
/// assert_eq!(pagetext::normalize("Hello\r\nWorld"), "Hello\nWorld");
/// assert_eq!(pagetext::normalize("  a \t b  "), "a b");
/// ```
pub fn normalize(text: &str) -> String {
    static SHARED: OnceLock<TextNormalizer> = OnceLock::new();
    SHARED.get_or_init(TextNormalizer::new).process(text)
}
