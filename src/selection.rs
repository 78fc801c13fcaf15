//! Last-known selection reported by the editing surface.

use crate::utils::char_slice;

/// A contiguous character range plus the text it covered when it was captured.
///
/// Offsets are character indices into the document. The range may be stale once the document
/// changes; consumers clamp at use time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Selection {
    pub fn is_collapsed(&self) -> bool {
        self.start >= self.end
    }
}

/// Holds the most recent selection. Each report overwrites the previous one.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    last: Option<Selection>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the range `start..end` of `text`. Offsets are stored as given.
    pub fn report(&mut self, text: &str, start: usize, end: usize) {
        self.last = Some(Selection { start, end, text: char_slice(text, start, end).to_string() });
    }

    pub fn last(&self) -> Option<&Selection> {
        self.last.as_ref()
    }

    /// Selected text, or `""` if nothing was ever reported.
    pub fn selected_text(&self) -> &str {
        self.last.as_ref().map_or("", |s| s.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_reported() {
        let t = SelectionTracker::new();
        assert!(t.last().is_none());
        assert_eq!(t.selected_text(), "");
    }

    #[test]
    fn report_captures_substring_and_range() {
        let mut t = SelectionTracker::new();
        t.report("Hi there", 3, 8);
        let sel = t.last().unwrap();
        assert_eq!((sel.start, sel.end), (3, 8));
        assert_eq!(sel.text, "there");
        assert!(!sel.is_collapsed());
    }

    #[test]
    fn last_write_wins() {
        let mut t = SelectionTracker::new();
        t.report("abcdef", 0, 3);
        t.report("abcdef", 4, 4);
        let sel = t.last().unwrap();
        assert_eq!((sel.start, sel.end), (4, 4));
        assert_eq!(sel.text, "");
        assert!(sel.is_collapsed());
    }

    #[test]
    fn out_of_range_offsets_are_kept_verbatim() {
        let mut t = SelectionTracker::new();
        t.report("abc", 2, 50);
        let sel = t.last().unwrap();
        assert_eq!((sel.start, sel.end), (2, 50));
        assert_eq!(sel.text, "c");
    }

    #[test]
    fn offsets_count_characters() {
        let mut t = SelectionTracker::new();
        t.report("naïve café", 6, 10);
        assert_eq!(t.selected_text(), "café");
    }
}
