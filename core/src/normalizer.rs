use crate::Term;
use lazy_static::lazy_static;
use rust_stemmers::{Algorithm, Stemmer};
use std::fmt;

/// Characters deleted from a line before it is split into words.
pub const DEFAULT_PUNCTUATION: &[char] = &['.', ',', '\'', ':', ';', '!', '?'];

lazy_static! {
    static ref NORMALIZER: Normalizer = Normalizer::default();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Deleted in place, not replaced by whitespace, so "don't" becomes "dont".
    pub punctuation: Vec<char>,
    /// Reduce every word with the English Snowball stemmer.
    pub stem: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self { punctuation: DEFAULT_PUNCTUATION.to_vec(), stem: true }
    }
}

/// Turns raw lines into terms. The same instance must be used for indexing
/// and for querying, otherwise a word can normalize differently on each side.
pub struct Normalizer {
    punctuation: Vec<char>,
    stemmer: Option<Stemmer>,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        let stemmer = config.stem.then(|| Stemmer::create(Algorithm::English));
        Self { punctuation: config.punctuation, stemmer }
    }

    /// Normalize lines in order; terms of each line follow the words' order.
    pub fn normalize<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Term> {
        let mut terms = Vec::new();
        for line in lines {
            self.normalize_line_into(line.as_ref(), &mut terms);
        }
        terms
    }

    pub fn normalize_line(&self, line: &str) -> Vec<Term> {
        let mut terms = Vec::new();
        self.normalize_line_into(line, &mut terms);
        terms
    }

    /// Delete the configured punctuation, keeping case.
    pub fn strip_punctuation(&self, text: &str) -> String {
        text.chars().filter(|c| !self.punctuation.contains(c)).collect()
    }

    fn normalize_line_into(&self, line: &str, out: &mut Vec<Term>) {
        let cleaned = self.strip_punctuation(&line.to_lowercase());
        for word in cleaned.split_whitespace() {
            let term = match &self.stemmer {
                Some(stemmer) => stemmer.stem(word).into_owned(),
                None => word.to_string(),
            };
            out.push(term);
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("punctuation", &self.punctuation)
            .field("stem", &self.stemmer.is_some())
            .finish()
    }
}

/// Normalize with the default configuration.
pub fn normalize<S: AsRef<str>>(lines: &[S]) -> Vec<Term> {
    NORMALIZER.normalize(lines)
}
