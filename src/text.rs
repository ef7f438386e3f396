//! Text normalization for stored email copies.
//!
//! `EnglishNormalizer` lowercases, splits into word tokens, keeps purely
//! alphabetic tokens, drops English stopwords and reduces plural nouns to
//! their singular form. Output is space-joined and normalizing it again
//! yields the same string.

use std::collections::HashSet;

use regex::Regex;

/// Normalizes raw email text before storage.
pub trait TextNormalizer: Send + Sync {
    /// Normalize `text`. `None` passes through unchanged.
    fn normalize(&self, text: Option<&str>) -> Option<String>;
}

/// Common English stopwords, including contraction fragments left by
/// splitting on apostrophes ("ve", "ll", "t").
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "ain", "all", "am", "an", "and", "any",
    "are", "aren", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "couldn", "d", "did", "didn", "do", "does", "doesn", "doing", "don",
    "down", "during", "each", "few", "for", "from", "further", "had", "hadn", "has", "hasn", "have",
    "haven", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i",
    "if", "in", "into", "is", "isn", "it", "its", "itself", "just", "ll", "m", "ma", "me", "mightn",
    "more", "most", "mustn", "my", "myself", "needn", "no", "nor", "not", "now", "o", "of", "off",
    "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "re",
    "s", "same", "shan", "she", "should", "shouldn", "so", "some", "such", "t", "than", "that",
    "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "ve", "very", "was", "wasn", "we",
    "were", "weren", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
    "with", "won", "wouldn", "y", "you", "your", "yours", "yourself", "yourselves",
];

/// Words ending in "s" that are not plurals.
const SINGULAR_S: &[&str] = &[
    "always", "analysis", "basis", "bus", "canvas", "chaos", "crisis", "diagnosis", "gas", "lens",
    "news", "perhaps", "plus", "series", "species", "status", "thanks", "various", "yes",
];

/// Stopword-filtering, plural-folding English normalizer.
pub struct EnglishNormalizer {
    word: Regex,
    stopwords: HashSet<&'static str>,
    singular_s: HashSet<&'static str>,
}

impl EnglishNormalizer {
    pub fn new() -> Self {
        Self {
            word: Regex::new(r"\w+").expect("static word pattern"),
            stopwords: STOPWORDS.iter().copied().collect(),
            singular_s: SINGULAR_S.iter().copied().collect(),
        }
    }

    /// Reduce a lowercase token to its singular form.
    ///
    /// Every output is a fixed point: it never ends in a strippable suffix.
    pub fn lemmatize(&self, token: &str) -> String {
        if token.len() <= 3 || self.singular_s.contains(token) {
            return token.to_string();
        }
        // "buses" -> "bus": the "es" plural of a listed singular.
        if let Some(stem) = token.strip_suffix("es")
            && self.singular_s.contains(stem)
        {
            return stem.to_string();
        }
        if let Some(stem) = token.strip_suffix("ies")
            && stem.len() >= 2
        {
            return format!("{stem}y");
        }
        for suffix in ["sses", "shes", "ches", "xes"] {
            if token.ends_with(suffix) {
                return token[..token.len() - 2].to_string();
            }
        }
        if token.ends_with('s') && !["ss", "us", "is"].iter().any(|end| token.ends_with(end)) {
            return token[..token.len() - 1].to_string();
        }
        token.to_string()
    }

    fn normalize_str(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        self.word
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| token.chars().all(char::is_alphabetic))
            .filter(|token| !self.stopwords.contains(*token))
            .map(|token| self.lemmatize(token))
            .filter(|lemma| !self.stopwords.contains(lemma.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for EnglishNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer for EnglishNormalizer {
    fn normalize(&self, text: Option<&str>) -> Option<String> {
        text.map(|t| self.normalize_str(t))
    }
}
