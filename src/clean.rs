//! Text normalization for analysis.
//!
//! Raw input (typed, uploaded, or extracted from a PDF) is pushed through an
//! ordered list of named [`CleaningStep`]s. Each step feeds the next; later
//! rules assume the earlier ones already ran, so the order in [`STEPS`] is
//! part of the contract.
//!
//! | # | Step | Effect |
//! |---|------|--------|
//! | 1 | `strip_control` | drop control characters and the U+007F–U+00FF block |
//! | 2 | `collapse_leaders` | runs of 3+ `_`, `.` or `*` become one space |
//! | 3 | `join_hyphenated` | `word-\nword` becomes `wordword` |
//! | 4 | `normalize_quotes` | typographic quotes become ASCII `"` and `'` |
//! | 5 | `collapse_whitespace` | every whitespace run becomes one space |
//! | 6 | `drop_lone_chars` | lone characters other than `a`, `i`, `A`, `I` and digits are removed |
//! | 7 | `trim` | final whitespace collapse and outer trim |
//!
//! [`clean_text`] repeats the pipeline until the output stops changing, which
//! makes `clean_text(clean_text(s)) == clean_text(s)` hold for every input.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CONTROL_CHARS: Regex =
        Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F-\xFF]").expect("valid control-char regex");
    static ref LEADER_RUNS: Regex = Regex::new(r"[_.*]{3,}").expect("valid leader regex");
    static ref HYPHEN_BREAK: Regex =
        Regex::new(r"(\w+)-\s*\n\s*(\w+)").expect("valid hyphen-break regex");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid whitespace regex");
}

/// Upper bound on fixpoint passes. Every pass after the first strictly
/// shortens the text, so real inputs settle in two or three.
const MAX_PASSES: usize = 8;

/// A single named transformation in the cleaning pipeline.
#[derive(Clone, Copy)]
pub struct CleaningStep {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

impl std::fmt::Debug for CleaningStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleaningStep").field("name", &self.name).finish()
    }
}

/// The cleaning pipeline, in application order.
pub const STEPS: &[CleaningStep] = &[
    CleaningStep {
        name: "strip_control",
        apply: strip_control,
    },
    CleaningStep {
        name: "collapse_leaders",
        apply: collapse_leaders,
    },
    CleaningStep {
        name: "join_hyphenated",
        apply: join_hyphenated,
    },
    CleaningStep {
        name: "normalize_quotes",
        apply: normalize_quotes,
    },
    CleaningStep {
        name: "collapse_whitespace",
        apply: collapse_whitespace,
    },
    CleaningStep {
        name: "drop_lone_chars",
        apply: drop_lone_chars,
    },
    CleaningStep {
        name: "trim",
        apply: trim,
    },
];

/// Normalize raw text into the canonical form used for analysis.
///
/// Total over all strings: empty input yields an empty string.
pub fn clean_text(raw: &str) -> String {
    let mut current = run_steps(raw);
    for _ in 1..MAX_PASSES {
        let next = run_steps(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn run_steps(text: &str) -> String {
    STEPS
        .iter()
        .fold(text.to_string(), |acc, step| (step.apply)(&acc))
}

/// Step 1: remove binary noise. Tab, newline and carriage return survive.
pub fn strip_control(text: &str) -> String {
    CONTROL_CHARS.replace_all(text, "").into_owned()
}

/// Step 2: dotted leaders and rule lines (`.....`, `____`, `***`).
pub fn collapse_leaders(text: &str) -> String {
    LEADER_RUNS.replace_all(text, " ").into_owned()
}

/// Step 3: undo line-wrap hyphenation. The hyphen and the line break are
/// deleted, not replaced by a space.
pub fn join_hyphenated(text: &str) -> String {
    HYPHEN_BREAK.replace_all(text, "${1}${2}").into_owned()
}

/// Step 4: typographic quotes and apostrophes to ASCII.
pub fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => '\'',
            other => other,
        })
        .collect()
}

/// Step 5: single-line text with single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}

/// Step 6: drop stray single characters left by broken extraction.
///
/// A space-delimited token of exactly one character is kept only if it is
/// `a`, `A`, `i`, `I` or an ASCII digit. This also removes enumerator
/// capitals such as the `B` in "Section B".
pub fn drop_lone_chars(text: &str) -> String {
    text.split(' ')
        .filter(|token| !token.is_empty() && !is_garbage_char(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_garbage_char(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => !matches!(c, 'a' | 'A' | 'i' | 'I' | '0'..='9'),
        _ => false,
    }
}

/// Step 7: final collapse and trim.
pub fn trim(text: &str) -> String {
    collapse_whitespace(text).trim().to_string()
}
