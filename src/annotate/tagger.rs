//! Lexicon and suffix-rule part-of-speech tagger.
//!
//! Tags follow the Universal POS set. Lookup order for each word:
//!
//! 1. the user lexicon (`[nlp].pos_lexicon`, `word<TAB>TAG` per line)
//! 2. the built-in closed-class and high-frequency word table
//! 3. shape rules: numbers, symbols, capitalized words mid-sentence
//! 4. context: a word after infinitive `to` or a modal is a verb
//! 5. suffix rules (`-tion` → NOUN, `-ly` → ADV, `-ous` → ADJ, ...)
//! 6. NOUN

use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

use super::{split_sentences, AnnotatedToken, Annotation, Annotator};
use crate::config::NlpConfig;

pub const UNIVERSAL_TAGS: &[&str] = &[
    "ADJ", "ADP", "ADV", "AUX", "CCONJ", "DET", "INTJ", "NOUN", "NUM", "PART", "PRON", "PROPN",
    "PUNCT", "SCONJ", "SPACE", "SYM", "VERB", "X",
];

const SYMBOL_CHARS: &str = "$%&+<=>@#^|~`\u{20ac}\u{a3}\u{a5}\u{a9}\u{ae}\u{b0}\u{b1}\u{d7}\u{f7}\u{a7}";

const MODALS: &[&str] = &[
    "will", "would", "shall", "should", "can", "could", "may", "might", "must",
];

const NOUN_SUFFIXES: &[&str] = &[
    "tion", "sion", "ment", "ness", "ity", "ance", "ence", "ship", "hood", "ism", "ist", "ure",
    "age", "dom", "ery", "eer", "ee", "er", "or",
];
const VERB_SUFFIXES: &[&str] = &["ize", "ise", "ify", "ate", "ing", "ed"];
const ADJ_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "ical", "al", "ic", "less", "ish", "ary", "ory", "ant",
    "ent", "ile",
];

lazy_static! {
    static ref BUILTIN: HashMap<&'static str, &'static str> = {
        let groups: &[(&str, &[&str])] = &[
            ("DET", &[
                "the", "a", "an", "this", "that", "these", "those", "each", "every", "some",
                "any", "no", "all", "both", "either", "neither", "another", "such",
            ]),
            ("PRON", &[
                "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
                "my", "your", "his", "its", "our", "their", "mine", "yours", "ours", "theirs",
                "who", "whom", "whose", "which", "what", "myself", "yourself", "himself",
                "herself", "itself", "ourselves", "themselves", "anyone", "someone",
                "everyone", "nobody", "anything", "something", "everything", "nothing",
            ]),
            ("ADP", &[
                "of", "in", "on", "at", "by", "for", "with", "about", "against", "between",
                "into", "through", "during", "before", "after", "above", "below", "from", "up",
                "down", "over", "under", "upon", "within", "without", "per", "via", "among",
                "across", "toward", "towards", "onto", "notwithstanding", "despite", "except",
                "beyond", "throughout", "regarding", "concerning",
            ]),
            ("CCONJ", &["and", "or", "but", "nor", "yet", "plus"]),
            ("SCONJ", &[
                "if", "because", "although", "though", "while", "unless", "whereas", "since",
                "whether", "until", "than", "once", "whereby",
            ]),
            ("AUX", &[
                "be", "is", "am", "are", "was", "were", "been", "being", "have", "has", "had",
                "do", "does", "did", "will", "would", "shall", "should", "can", "could", "may",
                "might", "must",
            ]),
            ("PART", &["not", "to", "'s"]),
            ("INTJ", &["yes", "oh", "hello", "hi", "please", "ok", "okay", "wow"]),
            ("NUM", &[
                "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
                "hundred", "thousand", "million", "billion",
            ]),
            ("ADV", &[
                "very", "also", "then", "there", "here", "now", "only", "just", "again", "still",
                "even", "already", "always", "never", "often", "soon", "too", "well", "however",
                "therefore", "thereby", "hereby", "herein", "thereof", "hereunder", "not", "so",
                "perhaps", "almost", "quite", "rather", "instead", "otherwise", "together",
            ]),
            ("ADJ", &[
                "good", "bad", "new", "old", "big", "small", "long", "short", "high", "low",
                "great", "little", "other", "same", "own", "last", "first", "next", "few",
                "many", "much", "more", "most", "less", "least", "full", "free", "true", "able",
                "sure", "clear", "fair", "best", "better", "due", "late", "early", "prior",
                "written", "sole", "whole",
            ]),
            ("VERB", &[
                "go", "goes", "went", "gone", "make", "makes", "made", "take", "takes", "took",
                "get", "gets", "got", "give", "gives", "gave", "come", "comes", "came", "see",
                "sees", "saw", "know", "knows", "knew", "think", "thinks", "thought", "say",
                "says", "said", "run", "runs", "ran", "find", "finds", "found", "tell", "tells",
                "told", "use", "uses", "want", "wants", "need", "needs", "pay", "pays", "paid",
                "keep", "keeps", "kept", "let", "put", "sign", "signs", "agree", "agrees",
                "provide", "provides", "include", "includes", "apply", "applies", "sat", "sit",
                "leave", "left", "hold", "holds", "held", "bring", "brought",
            ]),
        ];
        let mut table = HashMap::new();
        for (tag, words) in groups {
            for word in words.iter() {
                // first group wins ("not" stays PART)
                table.entry(*word).or_insert(*tag);
            }
        }
        table
    };
}

/// Part-of-speech tagging annotator.
#[derive(Debug, Clone, Default)]
pub struct TaggingAnnotator {
    lexicon: HashMap<String, String>,
}

impl TaggingAnnotator {
    /// Tagger with only the built-in word table.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &NlpConfig) -> Result<Self> {
        match &config.pos_lexicon {
            Some(path) => Self::with_lexicon_file(path),
            None => Ok(Self::new()),
        }
    }

    /// Load a user lexicon of `word<TAB>TAG` lines. Blank lines and `#`
    /// comments are skipped; unknown tags are rejected.
    pub fn with_lexicon_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read POS lexicon: {}", path.display()))?;
        Self::with_lexicon(&content)
            .with_context(|| format!("Invalid POS lexicon: {}", path.display()))
    }

    pub fn with_lexicon(content: &str) -> Result<Self> {
        let mut lexicon = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            let (Some(word), Some(tag), None) = (parts.next(), parts.next(), parts.next()) else {
                bail!("line {}: expected `word<TAB>TAG`", idx + 1);
            };
            let tag = tag.to_ascii_uppercase();
            if !UNIVERSAL_TAGS.contains(&tag.as_str()) {
                bail!("line {}: unknown tag '{}'", idx + 1, tag);
            }
            lexicon.insert(word.to_lowercase(), tag);
        }
        Ok(Self { lexicon })
    }

    fn tag(&self, word: &str, prev: Option<&str>, sentence_start: bool) -> String {
        let lower = word.to_lowercase();

        if let Some(tag) = self.lexicon.get(&lower) {
            return tag.clone();
        }
        if let Some(tag) = BUILTIN.get(lower.as_str()) {
            return (*tag).to_string();
        }

        shape_tag(word, sentence_start)
            .or_else(|| context_tag(&lower, prev))
            .or_else(|| suffix_tag(&lower))
            .unwrap_or("NOUN")
            .to_string()
    }
}

impl Annotator for TaggingAnnotator {
    fn name(&self) -> &str {
        "tagger"
    }

    fn has_pos(&self) -> bool {
        true
    }

    fn annotate(&self, text: &str) -> Annotation {
        let mut tokens: Vec<AnnotatedToken> = Vec::new();
        let mut sentence_start = true;
        let mut prev_word: Option<String> = None;

        for seg in text.split_word_bounds() {
            if seg.trim().is_empty() {
                if let Some(last) = tokens.last_mut() {
                    last.whitespace.push_str(seg);
                }
                continue;
            }

            let is_word = is_alpha(seg);
            let is_punct = is_punctuation(seg);
            let pos = if is_punct {
                "PUNCT".to_string()
            } else {
                self.tag(seg, prev_word.as_deref(), sentence_start)
            };

            sentence_start = is_punct && seg.chars().any(|c| matches!(c, '.' | '!' | '?'));
            prev_word = Some(seg.to_lowercase());

            tokens.push(AnnotatedToken {
                text: seg.to_string(),
                whitespace: String::new(),
                is_word,
                is_punct,
                pos: Some(pos),
            });
        }

        Annotation {
            sentences: split_sentences(text),
            tokens,
        }
    }
}

/// Letters only, allowing internal apostrophes (`don't`, `tenant's`).
fn is_alpha(seg: &str) -> bool {
    seg.chars().any(char::is_alphabetic) && seg.chars().all(|c| c.is_alphabetic() || c == '\'')
}

fn is_punctuation(seg: &str) -> bool {
    seg.chars()
        .all(|c| !c.is_alphanumeric() && !c.is_whitespace() && !SYMBOL_CHARS.contains(c))
}

fn shape_tag(word: &str, sentence_start: bool) -> Option<&'static str> {
    if word.chars().any(|c| c.is_ascii_digit())
        && word.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '%'))
    {
        return Some("NUM");
    }
    if word.chars().all(|c| SYMBOL_CHARS.contains(c)) {
        return Some("SYM");
    }
    if !word.chars().any(char::is_alphabetic) {
        return Some("X");
    }

    let mut chars = word.chars();
    let first_upper = chars.next().is_some_and(char::is_uppercase);
    let all_upper = word.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase);
    if (first_upper && !sentence_start) || (all_upper && word.chars().count() > 1) {
        return Some("PROPN");
    }
    None
}

fn context_tag(lower: &str, prev: Option<&str>) -> Option<&'static str> {
    let after_verb_marker = prev.is_some_and(|p| p == "to" || MODALS.contains(&p));
    if after_verb_marker && !has_suffix(lower, NOUN_SUFFIXES) && !has_suffix(lower, ADJ_SUFFIXES) {
        return Some("VERB");
    }
    None
}

fn suffix_tag(lower: &str) -> Option<&'static str> {
    if lower.chars().count() < 5 {
        return None;
    }
    if lower.ends_with("ly") {
        return Some("ADV");
    }
    if has_suffix(lower, NOUN_SUFFIXES) {
        return Some("NOUN");
    }
    if has_suffix(lower, VERB_SUFFIXES) {
        return Some("VERB");
    }
    if has_suffix(lower, ADJ_SUFFIXES) {
        return Some("ADJ");
    }
    None
}

fn has_suffix(word: &str, suffixes: &[&str]) -> bool {
    suffixes
        .iter()
        .any(|s| word.len() > s.len() + 2 && word.ends_with(s))
}
