//! The analysis pipeline.
//!
//! ```text
//! RawInput ──▶ acquire ──▶ clean ──┬──▶ annotate + classify ──┐
//!                                  └──▶ score ────────────────┴──▶ AnalysisResult
//! ```
//!
//! An [`Analyzer`] is built once at startup (it owns the annotator strategy
//! and the easy-word vocabulary) and shared read-only across requests. Each
//! call runs synchronously and keeps no state between calls.

use anyhow::Result;
use std::sync::Arc;
use thiserror::Error;

use crate::annotate::{create_annotator, Annotator};
use crate::clean::clean_text;
use crate::complexity::{classify_word, promote};
use crate::config::NlpConfig;
use crate::extract::acquire_text;
use crate::lexicon::EasyWords;
use crate::models::{AnalysisResult, Complexity, RawInput, WordAnalysis};
use crate::readability::{complexity_label, score};

const NO_POS: &str = "N/A";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No text provided or file is empty")]
    EmptyInput,
}

pub struct Analyzer {
    annotator: Arc<dyn Annotator>,
    easy_words: Arc<EasyWords>,
}

impl Analyzer {
    pub fn new(annotator: Arc<dyn Annotator>, easy_words: Arc<EasyWords>) -> Self {
        Self {
            annotator,
            easy_words,
        }
    }

    /// Select the annotator and load the vocabulary named in `[nlp]`.
    pub fn from_config(config: &NlpConfig) -> Result<Self> {
        let annotator = create_annotator(config)?;
        let easy_words = match &config.easy_words {
            Some(path) => EasyWords::load(path, config.easy_words_top_k)?,
            None => EasyWords::builtin(),
        };
        log::info!(
            "Analyzer ready: annotator={}, easy words={}",
            annotator.name(),
            easy_words.len()
        );
        Ok(Self::new(annotator, Arc::new(easy_words)))
    }

    pub fn annotator_name(&self) -> &str {
        self.annotator.name()
    }

    /// Acquire text from `input` and analyze it.
    pub fn analyze_input(&self, input: &RawInput) -> Result<AnalysisResult, AnalysisError> {
        self.analyze(&acquire_text(input))
    }

    /// Run the pipeline on raw text. Text that is empty after cleaning is
    /// reported as [`AnalysisError::EmptyInput`].
    pub fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let annotation = self.annotator.annotate(&cleaned);
        let with_pos = self.annotator.has_pos();

        let mut word_count = 0;
        let mut word_analysis = Vec::with_capacity(annotation.tokens.len());
        for token in &annotation.tokens {
            let pos = token.pos.clone().unwrap_or_else(|| NO_POS.to_string());
            let complexity = if token.is_word {
                word_count += 1;
                let base = classify_word(&token.text, &self.easy_words);
                if with_pos {
                    promote(base, &token.text, &pos)
                } else {
                    base
                }
            } else {
                Complexity::None
            };
            word_analysis.push(WordAnalysis {
                text: token.text_with_ws(),
                complexity,
                pos,
            });
        }

        let word_tokens = annotation
            .tokens
            .iter()
            .filter(|t| !t.is_punct)
            .map(|t| t.text.clone())
            .collect();

        let readability = score(&cleaned, &self.easy_words);

        Ok(AnalysisResult {
            complexity_label: complexity_label(readability.flesch_kincaid_grade).to_string(),
            readability,
            word_analysis,
            word_count,
            sentence_count: annotation.sentences.len(),
            cleaned_text: cleaned,
            sentence_tokens: annotation.sentences,
            word_tokens,
        })
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(
            Arc::new(crate::annotate::TaggingAnnotator::new()),
            Arc::new(EasyWords::builtin()),
        )
    }
}
