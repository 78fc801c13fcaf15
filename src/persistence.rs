//! Debounced persistence of one document's text.

use crate::storage::Storage;
use anyhow::Result;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default quiet period before an edit is written.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(500);

/// A save waiting for its deadline.
#[derive(Debug, Clone)]
struct PendingSave {
    text: String,
    due: Instant,
}

/// Saves a document under a fixed key, either immediately or after a quiet period.
///
/// Only one save is ever pending: scheduling replaces (cancels) the previous one, so a burst
/// of edits results in a single write of the final text. The owner drives the timer by calling
/// [`Autosave::poll`] from its event loop.
pub struct Autosave {
    key: String,
    storage: Rc<dyn Storage>,
    delay: Duration,
    pending: Option<PendingSave>,
}

impl Autosave {
    pub fn new(key: impl Into<String>, storage: Rc<dyn Storage>, delay: Duration) -> Self {
        Self { key: key.into(), storage, delay, pending: None }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn load(&self) -> Result<Option<String>> {
        self.storage.load(&self.key)
    }

    /// Arm (or re-arm) the timer for `text`, dropping any save that was still waiting.
    pub fn schedule(&mut self, text: &str, now: Instant) {
        self.pending = Some(PendingSave { text: text.to_string(), due: now + self.delay });
    }

    /// Write the pending text if its deadline has passed. Returns whether a write happened.
    ///
    /// A failed write is not retried: the pending slot is cleared either way and the next edit
    /// schedules a fresh save.
    pub fn poll(&mut self, now: Instant) -> Result<bool> {
        match &self.pending {
            Some(p) if now >= p.due => {}
            _ => return Ok(false),
        }
        let Some(p) = self.pending.take() else { return Ok(false); };
        self.write(&p.text)?;
        Ok(true)
    }

    /// Write `text` now and cancel anything pending.
    pub fn flush(&mut self, text: &str) -> Result<()> {
        self.pending = None;
        self.write(text)
    }

    fn write(&self, text: &str) -> Result<()> {
        self.storage.save(&self.key, text)?;
        debug!(key = %self.key, bytes = text.len(), "document saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn autosave(st: &MemoryStorage) -> Autosave {
        Autosave::new("markdown-test", Rc::new(st.clone()), DEFAULT_AUTOSAVE_DELAY)
    }

    #[test]
    fn nothing_written_before_deadline() {
        let st = MemoryStorage::new();
        let mut a = autosave(&st);
        let t0 = Instant::now();
        a.schedule("x", t0);
        assert!(!a.poll(t0 + Duration::from_millis(499)).unwrap());
        assert_eq!(st.write_count(), 0);
        assert!(a.is_pending());
    }

    #[test]
    fn burst_of_edits_writes_once_with_final_text() {
        let st = MemoryStorage::new();
        let mut a = autosave(&st);
        let t0 = Instant::now();
        for (i, text) in ["H", "He", "Hel", "Hell", "Hello"].iter().enumerate() {
            let at = t0 + Duration::from_millis(100 * i as u64);
            a.schedule(text, at);
            a.poll(at).unwrap();
        }
        // Deadline of the first edit passed, but it was cancelled by later edits.
        assert!(!a.poll(t0 + Duration::from_millis(600)).unwrap());
        assert!(a.poll(t0 + Duration::from_millis(900)).unwrap());
        assert_eq!(st.write_count(), 1);
        assert_eq!(st.get("markdown-test").as_deref(), Some("Hello"));
        assert!(!a.poll(t0 + Duration::from_secs(5)).unwrap());
        assert_eq!(st.write_count(), 1);
    }

    #[test]
    fn flush_writes_immediately_and_cancels_pending() {
        let st = MemoryStorage::new();
        let mut a = autosave(&st);
        let t0 = Instant::now();
        a.schedule("draft", t0);
        a.flush("draft").unwrap();
        assert!(!a.is_pending());
        assert!(!a.poll(t0 + Duration::from_secs(1)).unwrap());
        assert_eq!(st.write_count(), 1);
    }

    #[test]
    fn failed_write_clears_slot() {
        let st = MemoryStorage::new();
        st.set_fail_writes(true);
        let mut a = autosave(&st);
        let t0 = Instant::now();
        a.schedule("x", t0);
        assert!(a.poll(t0 + Duration::from_secs(1)).is_err());
        assert!(!a.is_pending());
    }
}
