//! Text normalization: tokenizing, cleaning and stop-word filtering.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use scraper::ElementRef;

use crate::error::Result;

const ENGLISH_STOP_WORDS: &str = include_str!("../../data/stop_words_en.txt");

/// Characters stripped from every token.
const STRIPPED: [char; 8] = ['!', '?', '.', ',', ':', ';', '(', ')'];

/// Elements whose text is never page content.
const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// A case-folded stop-word set.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The built-in English list.
    pub fn english() -> Self {
        Self::parse(ENGLISH_STOP_WORDS)
    }

    /// Load a list from a file with one word per line.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Parse one word per line; blank lines and `#` comments are ignored.
    pub fn parse(content: &str) -> Self {
        let words = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StopWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(|w| w.into().to_lowercase()).collect(),
        }
    }
}

/// Whitespace-delimited tokens.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Lowercase a token and strip `! ? . , : ; ( )`.
pub fn clean(word: &str) -> String {
    word.to_lowercase().replace(STRIPPED, "")
}

/// Clean every word and drop stop words and tokens left empty.
pub fn filter_stop_words<'a>(
    words: impl IntoIterator<Item = &'a str>,
    stop_words: &StopWords,
) -> Vec<String> {
    words
        .into_iter()
        .map(clean)
        .filter(|word| !word.is_empty() && !stop_words.contains(word))
        .collect()
}

/// Visible text of a region, text nodes joined by a space.
pub fn region_text(region: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in region.descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            text.push_str(chunk);
            text.push(' ');
        }
    }
    text
}

/// Turns page regions into cleaned words.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stop_words: StopWords,
}

impl TextNormalizer {
    pub fn new(stop_words: StopWords) -> Self {
        Self { stop_words }
    }

    /// Cleaned, stop-word filtered tokens of a text.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        filter_stop_words(tokenize(text), &self.stop_words)
    }

    /// Cleaned, stop-word filtered tokens of a content region.
    pub fn normalize_region(&self, region: ElementRef<'_>) -> Vec<String> {
        self.normalize(&region_text(region))
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(StopWords::english())
    }
}
