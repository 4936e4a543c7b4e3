//! Easy-word lexicon and the "difficult word" test.
//!
//! A word is difficult when it is not in the easy-word set and has at least
//! `syllable_threshold` syllables. The built-in set ships with the crate;
//! a larger vocabulary can be loaded from disk in either of two formats:
//!
//! - a JSON frequency dictionary, `[["the", 199660765], ["of", 1002], ...]`,
//!   ordered by descending frequency (optionally truncated to the top K);
//! - a plain list, one word per line, `#` comments allowed.

use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::path::Path;

use crate::syllables::count_syllables;

const BUILTIN_EASY_WORDS: &str = include_str!("../data/easy_words.txt");

#[derive(Debug, Clone)]
pub struct EasyWords {
    words: HashSet<String>,
}

impl EasyWords {
    /// The vocabulary bundled with the crate.
    pub fn builtin() -> Self {
        Self::from_word_list(BUILTIN_EASY_WORDS, None)
    }

    /// Load a vocabulary file, detecting JSON by its leading `[`.
    pub fn load(path: &Path, top_k: Option<usize>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read easy-word lexicon: {}", path.display()))?;

        let lexicon = if content.trim_start().starts_with('[') {
            Self::from_frequency_json(&content, top_k)
                .with_context(|| format!("Invalid frequency dictionary: {}", path.display()))?
        } else {
            Self::from_word_list(&content, top_k)
        };

        if lexicon.is_empty() {
            bail!("Easy-word lexicon is empty: {}", path.display());
        }
        Ok(lexicon)
    }

    pub fn from_word_list(content: &str, top_k: Option<usize>) -> Self {
        let words = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .take(top_k.unwrap_or(usize::MAX))
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    pub fn from_frequency_json(content: &str, top_k: Option<usize>) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(content)?;
        let entries = json
            .as_array()
            .context("expected a top-level JSON array")?;

        let mut words = HashSet::with_capacity(entries.len());
        for entry in entries.iter().take(top_k.unwrap_or(usize::MAX)) {
            let pair = entry
                .as_array()
                .filter(|a| a.len() >= 2)
                .context("each entry must be a [word, count] pair")?;
            let word = pair[0].as_str().context("word must be a string")?;
            pair[1].as_u64().context("count must be a non-negative integer")?;
            words.insert(word.to_lowercase());
        }
        Ok(Self { words })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// True when `word` is outside the vocabulary and has at least
    /// `syllable_threshold` syllables.
    pub fn is_difficult(&self, word: &str, syllable_threshold: usize) -> bool {
        if self.contains(word) {
            return false;
        }
        count_syllables(word) >= syllable_threshold
    }
}

impl Default for EasyWords {
    fn default() -> Self {
        Self::builtin()
    }
}
