//! Heuristic English syllable counting.
//!
//! Counts vowel groups in the ASCII-letter core of a word after removing
//! endings that are usually silent. Runs of three or more vowels are split
//! into pairs (`"beautiful"` → `eau` counts twice), which over-counts a few
//! words and under-counts others; the readability formulas only need an
//! estimate.

/// Syllable estimate for a single word. Non-letters are ignored; a word with
/// no ASCII letters has zero syllables, any other word has at least one.
pub fn count_syllables(word: &str) -> usize {
    let letters: String = word
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if letters.is_empty() {
        return 0;
    }
    if letters.len() <= 3 {
        return 1;
    }

    let core = strip_silent_ending(&letters);
    let core = core.strip_prefix('y').unwrap_or(core);

    vowel_groups(core).max(1)
}

fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u' | b'y')
}

fn strip_silent_ending(word: &str) -> &str {
    let bytes = word.as_bytes();
    let n = bytes.len();

    if let Some(stem) = word.strip_suffix("es") {
        // boxes, wishes, places, pages keep the extra syllable
        let sibilant = stem.ends_with('s')
            || stem.ends_with('x')
            || stem.ends_with('z')
            || stem.ends_with("ch")
            || stem.ends_with("sh")
            || stem.ends_with('c')
            || stem.ends_with('g');
        if !sibilant && n >= 3 && !is_vowel(bytes[n - 3]) && bytes[n - 3] != b'l' {
            return stem;
        }
        return word;
    }

    if let Some(stem) = word.strip_suffix("ed") {
        if n >= 3 && !matches!(bytes[n - 3], b't' | b'd') {
            return stem;
        }
        return word;
    }

    if let Some(stem) = word.strip_suffix('e') {
        if n >= 2 && !is_vowel(bytes[n - 2]) && bytes[n - 2] != b'l' {
            return stem;
        }
    }

    word
}

fn vowel_groups(word: &str) -> usize {
    let mut groups = 0;
    let mut run = 0usize;
    for &b in word.as_bytes() {
        if is_vowel(b) {
            run += 1;
        } else if run > 0 {
            groups += run.div_ceil(2);
            run = 0;
        }
    }
    groups + run.div_ceil(2)
}
