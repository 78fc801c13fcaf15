//! Session-scoped keyboard shortcuts.
//!
//! A document session subscribes its bindings when it mounts and holds the returned
//! [`ShortcutScope`]. Dropping the scope removes the bindings, so they can never outlive the
//! session that registered them.

use crate::insertion::FormatAction;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Engine operation a shortcut triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Undo,
    Redo,
    Format(FormatAction),
}

/// Bindings every document session installs, keyed by canonical key strings.
pub fn session_bindings() -> HashMap<String, SessionAction> {
    [
        ("Ctrl+Z", SessionAction::Undo),
        ("Ctrl+Y", SessionAction::Redo),
        ("Ctrl+Shift+Z", SessionAction::Redo),
        ("Ctrl+B", SessionAction::Format(FormatAction::Bold)),
        ("Ctrl+I", SessionAction::Format(FormatAction::Italic)),
    ]
    .into_iter()
    .map(|(k, a)| (k.to_string(), a))
    .collect()
}

struct Layer {
    id: u64,
    bindings: HashMap<String, SessionAction>,
}

#[derive(Default)]
struct Layers {
    stack: RefCell<Vec<Layer>>,
    next_id: Cell<u64>,
}

/// Stack of active binding layers. The most recent subscription wins on conflicts.
#[derive(Clone, Default)]
pub struct ShortcutTable {
    layers: Rc<Layers>,
}

impl ShortcutTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `bindings` until the returned scope is dropped.
    #[must_use]
    pub fn subscribe(&self, bindings: HashMap<String, SessionAction>) -> ShortcutScope {
        let id = self.layers.next_id.get();
        self.layers.next_id.set(id + 1);
        self.layers.stack.borrow_mut().push(Layer { id, bindings });
        ShortcutScope { id, layers: Rc::downgrade(&self.layers) }
    }

    pub fn resolve(&self, key: &str) -> Option<SessionAction> {
        self.layers
            .stack
            .borrow()
            .iter()
            .rev()
            .find_map(|l| l.bindings.get(key).copied())
    }

    pub fn active_layers(&self) -> usize {
        self.layers.stack.borrow().len()
    }
}

/// RAII handle for one subscription.
pub struct ShortcutScope {
    id: u64,
    layers: Weak<Layers>,
}

impl Drop for ShortcutScope {
    fn drop(&mut self) {
        if let Some(layers) = self.layers.upgrade() {
            layers.stack.borrow_mut().retain(|l| l.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_live_as_long_as_scope() {
        let table = ShortcutTable::new();
        assert_eq!(table.resolve("Ctrl+Z"), None);
        let scope = table.subscribe(session_bindings());
        assert_eq!(table.resolve("Ctrl+Z"), Some(SessionAction::Undo));
        assert_eq!(table.resolve("Ctrl+Shift+Z"), Some(SessionAction::Redo));
        assert_eq!(table.resolve("Ctrl+B"), Some(SessionAction::Format(FormatAction::Bold)));
        drop(scope);
        assert_eq!(table.resolve("Ctrl+Z"), None);
        assert_eq!(table.active_layers(), 0);
    }

    #[test]
    fn newest_layer_wins_and_older_survives() {
        let table = ShortcutTable::new();
        let outer = table.subscribe(session_bindings());
        let inner = table.subscribe(HashMap::from([("Ctrl+Z".to_string(), SessionAction::Redo)]));
        assert_eq!(table.resolve("Ctrl+Z"), Some(SessionAction::Redo));
        drop(inner);
        assert_eq!(table.resolve("Ctrl+Z"), Some(SessionAction::Undo));
        drop(outer);
        assert_eq!(table.active_layers(), 0);
    }

    #[test]
    fn dropping_out_of_order_removes_only_own_layer() {
        let table = ShortcutTable::new();
        let a = table.subscribe(session_bindings());
        let b = table.subscribe(HashMap::from([("F9".to_string(), SessionAction::Undo)]));
        drop(a);
        assert_eq!(table.resolve("Ctrl+B"), None);
        assert_eq!(table.resolve("F9"), Some(SessionAction::Undo));
        drop(b);
    }

    #[test]
    fn scope_outliving_table_is_harmless() {
        let table = ShortcutTable::new();
        let scope = table.subscribe(session_bindings());
        drop(table);
        drop(scope);
    }
}
