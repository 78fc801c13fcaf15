//! Local document storage: one entry per key, value is the raw document text.

use anyhow::{bail, Context, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::rc::Rc;

/// A key/value store for document text.
///
/// Implementations take `&self` so a single backend can be shared (`Rc<dyn Storage>`) by
/// successive document sessions on the UI thread.
pub trait Storage {
    /// Stored text for `key`, or `None` if there is no entry.
    fn load(&self, key: &str) -> Result<Option<String>>;
    /// Write `text` verbatim under `key`, replacing any previous entry.
    fn save(&self, key: &str, text: &str) -> Result<()>;
    /// Remove the entry for `key`. Removing a missing entry is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.md`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            bail!("Invalid storage key: '{}'", key);
        }
        Ok(self.dir.join(format!("{key}.md")))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn save(&self, key: &str, text: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create storage dir {}", self.dir.display()))?;
        // Write to a sibling temp file first so a failed write never truncates the entry.
        let tmp = path.with_extension("md.tmp");
        fs::write(&tmp, text).with_context(|| format!("Failed writing {}", tmp.display()))?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e).with_context(|| format!("Failed replacing {}", path.display()));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

/// In-process storage. Clones share the same entries.
///
/// Counts successful writes and can be told to reject writes, which makes it useful for
/// exercising autosave and storage-failure paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
    writes: Rc<Cell<usize>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Make subsequent `save` calls fail (simulates a full or unavailable medium).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, text: &str) -> Result<()> {
        if self.fail_writes.get() {
            bail!("Storage quota exceeded while writing '{}'", key);
        }
        self.entries.borrow_mut().insert(key.to_string(), text.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
