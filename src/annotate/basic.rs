//! Segmentation-only fallback strategy.

use unicode_segmentation::UnicodeSegmentation;

use super::{split_sentences, AnnotatedToken, Annotation, Annotator};

/// Sentence and word splitting with no part-of-speech information.
///
/// Every token is reported with a single trailing space, and any token
/// containing a word character (letter, digit or `_`) counts as a word.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicTokenizer;

impl Annotator for BasicTokenizer {
    fn name(&self) -> &str {
        "basic"
    }

    fn has_pos(&self) -> bool {
        false
    }

    fn annotate(&self, text: &str) -> Annotation {
        let tokens = text
            .split_word_bounds()
            .filter(|seg| !seg.trim().is_empty())
            .map(|seg| {
                let is_word = seg.chars().any(|c| c.is_alphanumeric() || c == '_');
                AnnotatedToken {
                    text: seg.to_string(),
                    whitespace: " ".to_string(),
                    is_word,
                    is_punct: !is_word,
                    pos: None,
                }
            })
            .collect();

        Annotation {
            sentences: split_sentences(text),
            tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_punctuation_from_words() {
        let a = BasicTokenizer.annotate("Pay now, please.");
        let texts: Vec<&str> = a.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Pay", "now", ",", "please", "."]);
        assert!(a.tokens.iter().all(|t| t.whitespace == " " && t.pos.is_none()));
        assert!(!a.tokens[2].is_word);
        assert!(a.tokens[2].is_punct);
    }

    #[test]
    fn digits_count_as_words() {
        let a = BasicTokenizer.annotate("Clause 12 applies");
        assert!(a.tokens.iter().all(|t| t.is_word));
        assert_eq!(a.sentences.len(), 1);
    }

    #[test]
    fn empty_text() {
        let a = BasicTokenizer.annotate("");
        assert!(a.tokens.is_empty());
        assert!(a.sentences.is_empty());
    }
}
