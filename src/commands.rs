//! Command registry and command execution system.

use crate::app::App;
use crate::insertion::FormatAction;
use crate::utils::levenshtein_distance;
use anyhow::Result;
use std::collections::HashMap;

/// What running a command does.
#[derive(Clone, Copy)]
pub enum CommandSource {
    /// A built-in command implemented as a Rust function.
    Builtin(fn(&mut App) -> Result<()>),
    /// Insert a formatting snippet into the current document.
    Format(FormatAction),
}

/// A user-invokable action.
///
/// Commands can be invoked either by keybinding (`key`) or via the command palette prompt.
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub key: Option<String>, // canonical string e.g. "Ctrl+S"
    pub source: CommandSource,
}

/// Registry of known commands + lookup tables for fast resolving.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    by_name: HashMap<String, usize>,
    keymap: HashMap<String, String>, // key -> command_name
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command, replacing any earlier one with the same (case-insensitive) name.
    pub fn register(&mut self, cmd: Command) {
        let name_key = cmd.name.to_lowercase();
        if let Some(k) = cmd.key.as_ref() {
            self.keymap.insert(k.clone(), cmd.name.clone());
        }

        if let Some(&idx) = self.by_name.get(&name_key) {
            self.commands[idx] = cmd;
        } else {
            let idx = self.commands.len();
            self.commands.push(cmd);
            self.by_name.insert(name_key, idx);
        }
    }

    /// Lookup a command by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Command> {
        let idx = *self.by_name.get(&name.to_lowercase())?;
        self.commands.get(idx)
    }

    /// Resolve a key chord like `"Ctrl+S"` to a command name.
    pub fn resolve_key(&self, key: &str) -> Option<String> {
        self.keymap.get(key).cloned()
    }

    /// Substring search over command names and descriptions, for the palette.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Command> {
        let q = query.to_lowercase();
        let mut items: Vec<&Command> = self
            .commands
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&q) || c.description.to_lowercase().contains(&q))
            .collect();
        items.sort_by_key(|c| c.name.to_lowercase());
        items.truncate(limit);
        items
    }

    /// Find the closest command by name using Levenshtein distance.
    pub fn suggest_command(&self, name: &str) -> Option<&Command> {
        let name = name.to_lowercase();
        let (dist, cmd) = self
            .commands
            .iter()
            .map(|c| (levenshtein_distance(&name, &c.name.to_lowercase()), c))
            .min_by_key(|(d, _)| *d)?;

        // Only suggest when roughly 40% of the longer name matches
        let longest = name.chars().count().max(cmd.name.chars().count());
        let threshold = (longest * 2).div_ceil(5).max(2);
        (dist <= threshold).then_some(cmd)
    }
}

/// Chord string for a key event, e.g. `"Ctrl+Shift+Z"` or `"F6"`.
///
/// Modifiers always appear as Ctrl, Alt, Shift; letters are upper-cased so `Ctrl+b` and
/// `Ctrl+B` name the same chord.
pub fn canonical_key_string(key: &crossterm::event::KeyEvent) -> String {
    use crossterm::event::{KeyCode, KeyModifiers};

    const MODIFIERS: [(KeyModifiers, &str); 3] =
        [(KeyModifiers::CONTROL, "Ctrl+"), (KeyModifiers::ALT, "Alt+"), (KeyModifiers::SHIFT, "Shift+")];

    let mut chord: String = MODIFIERS
        .iter()
        .filter(|(m, _)| key.modifiers.contains(*m))
        .map(|(_, label)| *label)
        .collect();

    match key.code {
        KeyCode::Char(c) => chord.push(c.to_ascii_uppercase()),
        KeyCode::F(n) => chord.push_str(&format!("F{n}")),
        // Named keys print as their variant name (Enter, Esc, PageUp, ...)
        other => chord.push_str(&format!("{other:?}")),
    }
    chord
}
