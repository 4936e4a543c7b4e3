//! Standard readability formulas over cleaned text.
//!
//! - Flesch–Kincaid grade: `0.39·(words/sentences) + 11.8·(syllables/words) − 15.59`
//! - Gunning fog: `0.4·(words/sentences + 100·difficult/words)`, where
//!   difficult words are distinct words of three or more syllables outside
//!   the easy-word vocabulary
//! - Flesch reading ease: `206.835 − 1.015·(words/sentences) − 84.6·(syllables/words)`
//!
//! Text without words scores 0.0 on all three.

use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

use crate::lexicon::EasyWords;
use crate::models::ReadabilityScores;
use crate::syllables::count_syllables;

const FOG_SYLLABLES: usize = 3;

/// Compute all three indices for already-cleaned text.
pub fn score(cleaned: &str, easy_words: &EasyWords) -> ReadabilityScores {
    let words = lexicon_words(cleaned);
    if words.is_empty() {
        return ReadabilityScores {
            flesch_kincaid_grade: 0.0,
            gunning_fog: 0.0,
            flesch_reading_ease: 0.0,
        };
    }

    let word_count = words.len() as f64;
    let sentences = sentence_count(cleaned).max(1) as f64;
    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();

    let words_per_sentence = word_count / sentences;
    let syllables_per_word = syllables as f64 / word_count;

    let difficult: HashSet<String> = words
        .iter()
        .map(|w| w.to_lowercase())
        .filter(|w| easy_words.is_difficult(w, FOG_SYLLABLES))
        .collect();

    let grade = 0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59;
    let fog = 0.4 * (words_per_sentence + 100.0 * difficult.len() as f64 / word_count);
    let ease = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;

    ReadabilityScores {
        flesch_kincaid_grade: round_to(grade, 1),
        gunning_fog: round_to(fog, 2),
        flesch_reading_ease: round_to(ease, 2),
    }
}

/// Human-readable band for a Flesch–Kincaid grade.
pub fn complexity_label(grade: f64) -> &'static str {
    if grade > 14.0 {
        "Very Complex (Legal/Academic)"
    } else if grade > 10.0 {
        "Complex (Professional)"
    } else if grade > 7.0 {
        "Normal (Clear)"
    } else {
        "Simple (Conversational)"
    }
}

/// Whitespace-separated words with punctuation removed (apostrophes kept).
fn lexicon_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric() || *c == '\'' || *c == '_')
                .collect::<String>()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn sentence_count(text: &str) -> usize {
    text.unicode_sentences()
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count()
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
