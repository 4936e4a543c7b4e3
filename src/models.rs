//! Core data models used throughout ClauseEase.
//!
//! These types represent the input, per-word annotations, and scores that
//! flow through the analysis pipeline, plus the persisted account and
//! history rows.

use serde::Serialize;

/// Declared kind of an uploaded byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Plain,
    Pdf,
}

impl ContentKind {
    /// Infers the kind from an uploaded file name (`.pdf` → PDF, anything else plain).
    pub fn from_filename(name: &str) -> Self {
        if name.to_ascii_lowercase().ends_with(".pdf") {
            ContentKind::Pdf
        } else {
            ContentKind::Plain
        }
    }
}

/// Raw analysis input before text acquisition.
#[derive(Debug, Clone)]
pub enum RawInput {
    Text(String),
    Bytes { bytes: Vec<u8>, kind: ContentKind },
}

/// Four-level complexity tag attached to each token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    None,
    Simple,
    Normal,
    Complex,
}

/// One entry of `word_analysis`: display text (with trailing whitespace),
/// complexity tag, and part-of-speech label (`"N/A"` without a tagger).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordAnalysis {
    pub text: String,
    pub complexity: Complexity,
    pub pos: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReadabilityScores {
    pub flesch_kincaid_grade: f64,
    pub gunning_fog: f64,
    pub flesch_reading_ease: f64,
}

/// Full result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub readability: ReadabilityScores,
    pub word_analysis: Vec<WordAnalysis>,
    pub word_count: usize,
    pub sentence_count: usize,
    pub complexity_label: String,
    pub cleaned_text: String,
    pub sentence_tokens: Vec<String>,
    pub word_tokens: Vec<String>,
}

/// Registered account, without credentials.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// A stored analysis history row.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub user_id: i64,
    pub text_preview: String,
    pub flesch_score: f64,
    pub fog_score: f64,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_kind_from_filename() {
        assert_eq!(ContentKind::from_filename("contract.PDF"), ContentKind::Pdf);
        assert_eq!(ContentKind::from_filename("notes.txt"), ContentKind::Plain);
        assert_eq!(ContentKind::from_filename("pdf"), ContentKind::Plain);
    }

    #[test]
    fn complexity_serializes_lowercase() {
        let json = serde_json::to_string(&Complexity::Complex).unwrap();
        assert_eq!(json, "\"complex\"");
        assert_eq!(serde_json::to_string(&Complexity::None).unwrap(), "\"none\"");
    }
}
