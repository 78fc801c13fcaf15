//! Document session: the editing state of one open document.
//!
//! Wires the selection tracker, the insertion engine, the undo history and debounced
//! persistence together. The view layer talks only to [`DocumentSession`].

use crate::history::History;
use crate::insertion::{self, FormatAction};
use crate::persistence::{Autosave, DEFAULT_AUTOSAVE_DELAY};
use crate::route::DocumentId;
use crate::selection::{Selection, SelectionTracker};
use crate::storage::Storage;
use crate::template::WELCOME_TEMPLATE;
use anyhow::{Context, Result};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Per-session tunables (see `Config`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub autosave_delay: Duration,
    pub history_limit: Option<usize>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { autosave_delay: DEFAULT_AUTOSAVE_DELAY, history_limit: None }
    }
}

/// One open document.
///
/// The live text is always `history.present()`, so the two can never disagree.
pub struct DocumentSession {
    id: DocumentId,
    history: History,
    selection: SelectionTracker,
    autosave: Autosave,
    /// Last storage problem, waiting to be shown to the user.
    warning: Option<String>,
}

impl DocumentSession {
    /// Open `id`, seeding its text from storage.
    ///
    /// A storage read failure does not prevent opening: the document starts from its default
    /// seed and a warning is queued.
    pub fn open(id: DocumentId, storage: Rc<dyn Storage>, opts: &SessionOptions) -> Self {
        let autosave = Autosave::new(id.storage_key(), storage, opts.autosave_delay);
        let mut warning = None;
        let stored = autosave.load().unwrap_or_else(|e| {
            warn!(key = autosave.key(), error = %format!("{e:#}"), "failed to load document");
            warning = Some(format!("Storage unavailable: {e:#}"));
            None
        });
        let seed = seed_text(&id, stored);
        info!(key = autosave.key(), chars = seed.chars().count(), "document opened");

        Self {
            id,
            history: History::new(seed).with_limit(opts.history_limit),
            selection: SelectionTracker::new(),
            autosave,
            warning,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn storage_key(&self) -> &str {
        self.autosave.key()
    }

    pub fn text(&self) -> &str {
        self.history.present()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.last()
    }

    pub fn selected_text(&self) -> &str {
        self.selection.selected_text()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Whether an edit is waiting for the autosave timer.
    pub fn is_save_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    /// Replace the whole text (raw typing). Always recorded as one undo step.
    pub fn set_text(&mut self, value: impl Into<String>) {
        self.history.commit(value);
        self.text_changed();
    }

    /// Wrap the last selection in `before`/`after`, or append the snippet if nothing was
    /// ever selected.
    pub fn insert_markdown(&mut self, before: &str, after: &str, placeholder: Option<&str>) {
        let next = insertion::insert(self.text(), self.selection.last(), before, after, placeholder);
        self.set_text(next);
    }

    /// Apply a formatting snippet. Returns the character offset just past the inserted text.
    pub fn apply(&mut self, action: FormatAction) -> usize {
        let (before, after, placeholder) = action.snippet();
        let end = insertion::insertion_end(self.text(), self.selection.last(), before, after, placeholder);
        self.insert_markdown(before, after, placeholder);
        end
    }

    /// Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        if moved {
            self.text_changed();
        }
        moved
    }

    /// Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        if moved {
            self.text_changed();
        }
        moved
    }

    /// Record the selection `start..end` (character offsets into the current text).
    pub fn record_selection(&mut self, start: usize, end: usize) {
        self.selection.report(self.history.present(), start, end);
    }

    /// Focus left the editor: save right away.
    pub fn blur(&mut self) {
        let res = self.autosave.flush(self.history.present());
        self.note_save_result(res);
    }

    /// Drive the autosave timer. Call regularly from the event loop.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        let res = self.autosave.poll(now).map(|_| ());
        self.note_save_result(res);
    }

    /// The session is going away: write out any edit still waiting for its timer.
    pub fn close(&mut self) -> Option<String> {
        if self.autosave.is_pending() {
            self.blur();
        }
        self.warning.take()
    }

    /// Take the queued storage warning, if any.
    pub fn take_warning(&mut self) -> Option<String> {
        self.warning.take()
    }

    fn text_changed(&mut self) {
        self.autosave.schedule(self.history.present(), Instant::now());
    }

    fn note_save_result(&mut self, res: Result<()>) {
        if let Err(e) = res {
            warn!(key = self.autosave.key(), error = %format!("{e:#}"), "failed to save document");
            self.warning = Some(format!("Could not save: {e:#}"));
        }
    }
}

/// Initial text for a document given what storage returned.
///
/// The home document falls back to the welcome template when nothing (or an empty string) is
/// stored; any other document starts empty.
pub fn seed_text(id: &DocumentId, stored: Option<String>) -> String {
    let home = id.is_default();
    match stored {
        Some(s) if !(home && s.is_empty()) => s,
        _ if home => WELCOME_TEMPLATE.to_string(),
        _ => String::new(),
    }
}

/// Allocate a new document id.
///
/// Clears the home document's entry (never the new one's) so the next visit to the home
/// route starts from the welcome template.
pub fn create_document(storage: &dyn Storage) -> Result<DocumentId> {
    let id = DocumentId::generate();
    storage
        .remove(&DocumentId::Default.storage_key())
        .context("Failed to clear the default document")?;
    info!(key = %id.storage_key(), "new document created");
    Ok(id)
}

/// Forget the home document's saved text so it reopens with the welcome template.
pub fn reset_default(storage: &dyn Storage) -> Result<()> {
    storage
        .remove(&DocumentId::Default.storage_key())
        .context("Failed to reset the default document")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn open(st: &MemoryStorage, id: DocumentId) -> DocumentSession {
        DocumentSession::open(id, Rc::new(st.clone()), &SessionOptions::default())
    }

    fn named(id: &str) -> DocumentId {
        DocumentId::named(id).unwrap()
    }

    fn later() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    // ==================== seeding tests ====================

    #[test]
    fn home_seeds_from_template_when_absent() {
        let st = MemoryStorage::new();
        let s = open(&st, DocumentId::Default);
        assert_eq!(s.text(), WELCOME_TEMPLATE);
        assert_eq!(s.storage_key(), "markdown-default");
        assert!(!s.can_undo());
        assert!(!s.can_redo());
    }

    #[test]
    fn home_seeds_from_storage() {
        let st = MemoryStorage::new();
        st.save("markdown-default", "saved home").unwrap();
        assert_eq!(open(&st, DocumentId::Default).text(), "saved home");
    }

    #[test]
    fn home_treats_empty_entry_as_absent() {
        let st = MemoryStorage::new();
        st.save("markdown-default", "").unwrap();
        assert_eq!(open(&st, DocumentId::Default).text(), WELCOME_TEMPLATE);
    }

    #[test]
    fn named_doc_seeds_empty_or_from_own_entry() {
        let st = MemoryStorage::new();
        st.save("markdown-default", "home").unwrap();
        assert_eq!(open(&st, named("fresh")).text(), "");
        st.save("markdown-known", "kept").unwrap();
        assert_eq!(open(&st, named("known")).text(), "kept");
    }

    // ==================== editing tests ====================

    #[test]
    fn set_text_commits_history() {
        let st = MemoryStorage::new();
        let mut s = open(&st, named("a"));
        s.set_text("one");
        s.set_text("two");
        assert_eq!(s.text(), "two");
        assert_eq!(s.history().past(), ["", "one"]);
        assert_eq!(s.history().present(), s.text());
    }

    #[test]
    fn insert_without_selection_appends() {
        let st = MemoryStorage::new();
        let mut s = open(&st, named("a"));
        s.set_text("Hi");
        s.insert_markdown("**", "**", Some("bold text"));
        assert_eq!(s.text(), "Hi**bold text**");
    }

    #[test]
    fn insert_wraps_recorded_selection() {
        let st = MemoryStorage::new();
        let mut s = open(&st, named("a"));
        s.set_text("Hi there");
        s.record_selection(0, 2);
        assert_eq!(s.selected_text(), "Hi");
        s.insert_markdown("**", "**", None);
        assert_eq!(s.text(), "**Hi** there");
        assert!(s.undo());
        assert_eq!(s.text(), "Hi there");
    }

    #[test]
    fn apply_returns_offset_after_snippet() {
        let st = MemoryStorage::new();
        let mut s = open(&st, named("a"));
        s.set_text("ab");
        s.record_selection(1, 1);
        let end = s.apply(FormatAction::Italic);
        assert_eq!(s.text(), "a*italic text*b");
        assert_eq!(end, 14);
    }

    #[test]
    fn undo_redo_move_live_text() {
        let st = MemoryStorage::new();
        let mut s = open(&st, named("a"));
        s.set_text("x");
        s.set_text("xy");
        assert!(s.undo());
        assert_eq!(s.text(), "x");
        assert!(s.redo());
        assert_eq!(s.text(), "xy");
        assert!(!s.redo());
        assert!(s.undo());
        assert!(s.undo());
        assert!(!s.undo());
        assert_eq!(s.text(), "");
    }

    // ==================== persistence tests ====================

    #[test]
    fn rapid_edits_produce_one_write() {
        let st = MemoryStorage::new();
        let mut s = open(&st, named("burst"));
        for t in ["a", "ab", "abc", "abcd"] {
            s.set_text(t);
            s.tick();
        }
        assert_eq!(st.write_count(), 0);
        assert!(s.is_save_pending());
        s.tick_at(later());
        assert_eq!(st.write_count(), 1);
        assert_eq!(st.get("markdown-burst").as_deref(), Some("abcd"));
    }

    #[test]
    fn undo_schedules_save() {
        let st = MemoryStorage::new();
        let mut s = open(&st, named("u"));
        s.set_text("a");
        s.tick_at(later());
        s.undo();
        s.tick_at(later() + Duration::from_secs(1));
        assert_eq!(st.get("markdown-u").as_deref(), Some(""));
        assert_eq!(st.write_count(), 2);
    }

    #[test]
    fn blur_saves_immediately() {
        let st = MemoryStorage::new();
        let mut s = open(&st, named("b"));
        s.set_text("typed");
        s.blur();
        assert_eq!(st.get("markdown-b").as_deref(), Some("typed"));
        assert!(!s.is_save_pending());
        s.tick_at(later());
        assert_eq!(st.write_count(), 1);
    }

    #[test]
    fn close_flushes_pending_edit_only() {
        let st = MemoryStorage::new();
        let mut s = open(&st, named("c"));
        assert!(s.close().is_none());
        assert_eq!(st.write_count(), 0);

        let mut s = open(&st, named("c"));
        s.set_text("unsaved");
        s.close();
        assert_eq!(st.get("markdown-c").as_deref(), Some("unsaved"));
    }

    #[test]
    fn storage_failure_becomes_warning() {
        let st = MemoryStorage::new();
        let mut s = open(&st, named("w"));
        st.set_fail_writes(true);
        s.set_text("x");
        s.tick_at(later());
        let w = s.take_warning().expect("warning queued");
        assert!(w.starts_with("Could not save"));
        assert!(s.take_warning().is_none());
        assert_eq!(s.text(), "x");
    }

    #[test]
    fn documents_are_isolated_by_key() {
        let st = MemoryStorage::new();
        let mut a = open(&st, named("one"));
        let mut b = open(&st, named("two"));
        a.set_text("first");
        b.set_text("second");
        a.blur();
        b.blur();
        assert_eq!(st.get("markdown-one").as_deref(), Some("first"));
        assert_eq!(st.get("markdown-two").as_deref(), Some("second"));
        assert!(!st.contains("markdown-default"));
    }

    // ==================== lifecycle tests ====================

    #[test]
    fn create_document_clears_default_only() {
        let st = MemoryStorage::new();
        st.save("markdown-default", "home text").unwrap();
        let id = create_document(&st).unwrap();
        assert!(!id.is_default());
        assert!(!st.contains("markdown-default"));
        assert!(!st.contains(&id.storage_key()));

        let mut s = open(&st, id.clone());
        s.set_text("new doc");
        s.blur();
        let other = create_document(&st).unwrap();
        assert_ne!(other, id);
        assert_eq!(st.get(&id.storage_key()).as_deref(), Some("new doc"));
    }

    #[test]
    fn reset_default_restores_template() {
        let st = MemoryStorage::new();
        st.save("markdown-default", "mine").unwrap();
        st.save("markdown-keep", "other").unwrap();
        reset_default(&st).unwrap();
        assert_eq!(open(&st, DocumentId::Default).text(), WELCOME_TEMPLATE);
        assert_eq!(st.get("markdown-keep").as_deref(), Some("other"));
    }
}
