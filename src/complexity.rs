//! Per-word complexity classification.
//!
//! [`classify_word`] is a pure function of the word (and the fixed easy-word
//! vocabulary): four or more syllables, or a difficult word, is `complex`;
//! exactly three syllables is `normal`; anything else is `simple`.
//!
//! [`promote`] is applied by the caller only when part-of-speech tags are
//! available. Long content words (nouns, verbs, adjectives over eight
//! characters) that the syllable count rates `simple` are raised to `normal`.

use crate::lexicon::EasyWords;
use crate::models::Complexity;
use crate::syllables::count_syllables;

/// Syllable threshold used for the "difficult word" lookup.
const DIFFICULT_SYLLABLES: usize = 2;

const PROMOTION_MIN_LEN: usize = 9;
const PROMOTION_TAGS: &[&str] = &["NOUN", "VERB", "ADJ"];

/// Classify a single token. Never returns [`Complexity::None`]; tokens that
/// are not words are tagged `none` by the caller without calling this.
pub fn classify_word(word: &str, easy_words: &EasyWords) -> Complexity {
    if word.trim().is_empty() {
        return Complexity::Simple;
    }

    let core = strip_punctuation(word).to_lowercase();
    if core.trim().is_empty() {
        return Complexity::Simple;
    }

    let syllables = count_syllables(&core);
    if syllables >= 4 || easy_words.is_difficult(&core, DIFFICULT_SYLLABLES) {
        Complexity::Complex
    } else if syllables == 3 {
        Complexity::Normal
    } else {
        Complexity::Simple
    }
}

/// Raise a `simple` content word longer than eight characters to `normal`.
pub fn promote(complexity: Complexity, raw: &str, pos: &str) -> Complexity {
    if complexity == Complexity::Simple
        && raw.chars().count() >= PROMOTION_MIN_LEN
        && PROMOTION_TAGS.contains(&pos)
    {
        Complexity::Normal
    } else {
        complexity
    }
}

/// Keeps word characters (letters, digits, `_`) and whitespace.
fn strip_punctuation(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn easy() -> EasyWords {
        EasyWords::builtin()
    }

    #[test]
    fn empty_and_punctuation_only_are_simple() {
        assert_eq!(classify_word("", &easy()), Complexity::Simple);
        assert_eq!(classify_word("   ", &easy()), Complexity::Simple);
        assert_eq!(classify_word("?!", &easy()), Complexity::Simple);
    }

    #[test]
    fn one_syllable_words_are_simple() {
        for w in ["cat", "dog", "run", "Strengths"] {
            assert_eq!(classify_word(w, &easy()), Complexity::Simple, "{}", w);
        }
    }

    #[test]
    fn three_syllable_easy_word_is_normal() {
        assert_eq!(classify_word("yesterday", &easy()), Complexity::Normal);
        assert_eq!(classify_word("Wonderful,", &easy()), Complexity::Normal);
    }

    #[test]
    fn four_syllables_is_complex() {
        assert_eq!(classify_word("complexity", &easy()), Complexity::Complex);
        assert_eq!(classify_word("indemnification", &easy()), Complexity::Complex);
    }

    #[test]
    fn difficult_two_syllable_word_is_complex() {
        assert_eq!(classify_word("clauses", &easy()), Complexity::Complex);
        // listed as easy
        assert_eq!(classify_word("table", &easy()), Complexity::Simple);
    }

    #[test]
    fn classification_is_deterministic() {
        for w in ["robust", "employer", "agreement", "a"] {
            assert_eq!(classify_word(w, &easy()), classify_word(w, &easy()));
        }
    }

    #[test]
    fn promotion_requires_length_and_content_tag() {
        assert_eq!(promote(Complexity::Simple, "strengths", "NOUN"), Complexity::Normal);
        assert_eq!(promote(Complexity::Simple, "strengths", "ADV"), Complexity::Simple);
        assert_eq!(promote(Complexity::Simple, "strength", "NOUN"), Complexity::Simple);
        assert_eq!(promote(Complexity::Complex, "strengthening", "VERB"), Complexity::Complex);
        assert_eq!(promote(Complexity::Simple, "stretched", "N/A"), Complexity::Simple);
    }
}
