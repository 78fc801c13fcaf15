//! Utility functions.

use std::cmp::min; // comparison helpers

/// Convert a "character index" to a "byte index" in a UTF‑8 string.
///
/// Document offsets are counted in characters, but Rust strings can only be sliced at byte
/// offsets that lie on UTF‑8 boundaries. Indices past the end clamp to `s.len()`.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    s.char_indices().nth(char_idx).map_or(s.len(), |(bi, _)| bi)
}

/// Length of `s` in characters.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Slice `s` by character offsets. Offsets are clamped; an inverted range yields `""`.
pub fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let b0 = char_to_byte_index(s, start);
    let b1 = char_to_byte_index(s, end);
    if b0 >= b1 {
        return "";
    }
    &s[b0..b1]
}

/// Number of decimal digits in `n` (used to size the line-number gutter).
pub fn digits(n: usize) -> usize {
    n.to_string().len()
}

/// Convert a character offset in `text` to a `(line, column)` pair, both in characters.
pub fn offset_to_line_col(text: &str, offset: usize) -> (usize, usize) {
    let mut line = 0;
    let mut col = 0;
    for ch in text.chars().take(offset) {
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Convert a `(line, column)` pair back into a character offset, clamping the column to the
/// line length and the line to the last line.
pub fn line_col_to_offset(text: &str, line: usize, col: usize) -> usize {
    let mut offset = 0;
    for (i, l) in text.split('\n').enumerate() {
        let len = char_len(l);
        if i == line {
            return offset + min(col, len);
        }
        offset += len + 1;
    }
    char_len(text)
}

/// Calculate the Levenshtein distance between two strings.
/// This is used for "did you mean?" suggestions for unknown commands.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    if a.is_empty() { return b.len(); }
    if b.is_empty() { return a.len(); }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        cur[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            cur[j] = min(prev[j] + 1, min(cur[j - 1] + 1, prev[j - 1] + cost));
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[b.len()]
}
