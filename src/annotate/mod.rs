//! Sentence/word segmentation and part-of-speech annotation.
//!
//! Defines the [`Annotator`] trait and its two strategies:
//! - **[`TaggingAnnotator`]**: Unicode word-boundary segmentation plus a
//!   lexicon and suffix-rule part-of-speech tagger (Universal POS tags).
//! - **[`BasicTokenizer`]**: segmentation only; every token reports `N/A`
//!   as its part of speech.
//!
//! # Strategy Selection
//!
//! [`create_annotator`] picks the strategy once, at startup, from
//! `[nlp].annotator`:
//!
//! | Setting | Result |
//! |---------|--------|
//! | `tagger` | tagger, or a startup error if its lexicon cannot be loaded |
//! | `basic` | basic tokenizer |
//! | `auto` | tagger, falling back to the basic tokenizer on load failure |
//!
//! The chosen annotator is shared read-only for the life of the process.

mod basic;
mod tagger;

pub use basic::BasicTokenizer;
pub use tagger::{TaggingAnnotator, UNIVERSAL_TAGS};

use anyhow::Result;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::NlpConfig;

/// Segmentation (and optionally tagging) capability used by the pipeline.
pub trait Annotator: Send + Sync {
    /// Short identifier logged at startup (e.g. `"tagger"`).
    fn name(&self) -> &str;
    /// Whether tokens carry part-of-speech tags.
    fn has_pos(&self) -> bool;
    /// Segment `text` into sentences and tokens.
    fn annotate(&self, text: &str) -> Annotation;
}

/// Output of one annotation pass.
#[derive(Debug, Clone, Default)]
pub struct Annotation {
    /// Sentence texts, trimmed, in order.
    pub sentences: Vec<String>,
    /// Tokens in document order; whitespace is attached to the preceding token.
    pub tokens: Vec<AnnotatedToken>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedToken {
    pub text: String,
    /// Whitespace that followed the token in the source.
    pub whitespace: String,
    /// The token is a word and goes through complexity classification.
    pub is_word: bool,
    /// The token is punctuation and is left out of `word_tokens`.
    pub is_punct: bool,
    pub pos: Option<String>,
}

impl AnnotatedToken {
    pub fn text_with_ws(&self) -> String {
        format!("{}{}", self.text, self.whitespace)
    }
}

/// Trimmed, non-empty sentences by Unicode sentence boundaries.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the process-wide annotator from configuration.
pub fn create_annotator(config: &NlpConfig) -> Result<Arc<dyn Annotator>> {
    match config.annotator.as_str() {
        "basic" => Ok(Arc::new(BasicTokenizer)),
        "tagger" => Ok(Arc::new(TaggingAnnotator::from_config(config)?)),
        _ => match TaggingAnnotator::from_config(config) {
            Ok(tagger) => Ok(Arc::new(tagger)),
            Err(e) => {
                log::warn!(
                    "Part-of-speech tagger unavailable ({:#}); falling back to basic tokenizer",
                    e
                );
                Ok(Arc::new(BasicTokenizer))
            }
        },
    }
}
