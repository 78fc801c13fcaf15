//! Undo/redo history over whole-document snapshots.
//!
//! Linear undo: `past` holds older snapshots (oldest first), `present` is the committed text,
//! `future` holds undone snapshots (next redo first). A new commit discards the future.

use std::collections::VecDeque;

/// Snapshot history for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    past: Vec<String>,
    present: String,
    future: VecDeque<String>,
    /// Maximum number of `past` entries kept; `None` is unbounded.
    limit: Option<usize>,
}

impl History {
    /// Start a fresh history with `seed` as the present text.
    pub fn new(seed: impl Into<String>) -> Self {
        Self { past: Vec::new(), present: seed.into(), future: VecDeque::new(), limit: None }
    }

    /// Cap the number of undo steps. Only the oldest `past` entries are ever evicted.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self.evict();
        self
    }

    pub fn past(&self) -> &[String] {
        &self.past
    }

    pub fn present(&self) -> &str {
        &self.present
    }

    pub fn future(&self) -> &VecDeque<String> {
        &self.future
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Record `text` as the new present. The redo chain is dropped.
    pub fn commit(&mut self, text: impl Into<String>) {
        let prev = std::mem::replace(&mut self.present, text.into());
        self.past.push(prev);
        self.future.clear();
        self.evict();
    }

    /// Step back one snapshot. Returns `false` (and changes nothing) when there is no past.
    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.past.pop() else { return false; };
        let cur = std::mem::replace(&mut self.present, prev);
        self.future.push_front(cur);
        true
    }

    /// Step forward one snapshot. Returns `false` (and changes nothing) when there is no future.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else { return false; };
        let cur = std::mem::replace(&mut self.present, next);
        self.past.push(cur);
        true
    }

    fn evict(&mut self) {
        if let Some(cap) = self.limit {
            if self.past.len() > cap {
                let excess = self.past.len() - cap;
                self.past.drain(0..excess);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn future(h: &History) -> Vec<&str> {
        h.future().iter().map(String::as_str).collect()
    }

    // ==================== commit tests ====================

    #[test]
    fn commits_stack_in_order() {
        let mut h = History::new("seed");
        for t in ["t1", "t2", "t3", "t4"] {
            h.commit(t);
        }
        assert_eq!(h.present(), "t4");
        assert_eq!(h.past(), ["seed", "t1", "t2", "t3"]);
        assert!(h.future().is_empty());
    }

    #[test]
    fn commit_discards_redo_branch() {
        let mut h = History::new("A");
        h.commit("B");
        h.commit("C");
        assert!(h.undo());
        assert_eq!(h.past(), ["A"]);
        assert_eq!(h.present(), "B");
        assert_eq!(future(&h), ["C"]);

        h.commit("D");
        assert_eq!(h.past(), ["A", "B"]);
        assert_eq!(h.present(), "D");
        assert!(h.future().is_empty());
    }

    // ==================== undo/redo tests ====================

    #[test]
    fn undo_on_empty_past_is_noop() {
        let mut h = History::new("only");
        let before = h.clone();
        assert!(!h.undo());
        assert_eq!(h, before);
    }

    #[test]
    fn redo_on_empty_future_is_noop() {
        let mut h = History::new("a");
        h.commit("b");
        let before = h.clone();
        assert!(!h.redo());
        assert_eq!(h, before);
    }

    #[test]
    fn undo_then_redo_restores_state() {
        let mut h = History::new("a");
        h.commit("b");
        h.commit("c");
        h.undo();
        let before = h.clone();
        assert!(h.undo());
        assert!(h.redo());
        assert_eq!(h, before);
    }

    #[test]
    fn redo_then_undo_restores_state() {
        let mut h = History::new("a");
        h.commit("b");
        h.commit("c");
        h.undo();
        h.undo();
        let before = h.clone();
        assert!(h.redo());
        assert!(h.undo());
        assert_eq!(h, before);
    }

    #[test]
    fn future_is_ordered_next_redo_first() {
        let mut h = History::new("a");
        h.commit("b");
        h.commit("c");
        h.undo();
        h.undo();
        assert_eq!(h.present(), "a");
        assert_eq!(future(&h), ["b", "c"]);
        h.redo();
        assert_eq!(h.present(), "b");
        assert_eq!(future(&h), ["c"]);
    }

    // ==================== limit tests ====================

    #[test]
    fn limit_evicts_oldest_past_only() {
        let mut h = History::new("s").with_limit(Some(2));
        h.commit("1");
        h.commit("2");
        h.commit("3");
        assert_eq!(h.past(), ["1", "2"]);
        assert_eq!(h.present(), "3");
        h.undo();
        h.undo();
        assert!(!h.can_undo());
        assert_eq!(h.present(), "1");
        assert_eq!(future(&h), ["2", "3"]);
    }
}
