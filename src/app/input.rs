//! Input handling: keyboard, mouse, and prompt events.

use super::App;
use crate::commands::canonical_key_string;
use crate::route::Route;
use crate::types::{Focus, PromptKind};
use crate::utils::char_len;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use std::cmp::min;
use std::time::Duration;
use tracing::debug;

/// Typing one of these with text selected wraps the selection instead of replacing it.
const PAIRS: &[(char, char)] = &[('(', ')'), ('[', ']'), ('{', '}'), ('"', '"'), ('\'', '\''), ('`', '`'), ('*', '*'), ('_', '_')];

impl App {
    /// Mouse wheel scrolls whichever pane has focus.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let down = match mouse.kind {
            MouseEventKind::ScrollUp => false,
            MouseEventKind::ScrollDown => true,
            _ => return,
        };
        match self.focus {
            Focus::Editor => {
                let (line, col) = self.cursor_line_col();
                let target = if down { line + 1 } else { line.saturating_sub(1) };
                let col = self.goal_col.unwrap_or(col);
                let pos = self.offset_at(target, col);
                self.move_to(pos, false);
                self.goal_col = Some(col);
            }
            Focus::Preview => self.scroll_preview(if down { 3 } else { -3 }),
        }
    }

    /// Top-level key handler.
    ///
    /// Returns `true` if the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // If help is shown, any key closes it
        if self.show_help {
            self.show_help = false;
            self.mark_redraw();
            return false;
        }

        // Prompt mode consumes keys first
        if self.prompt.is_some() {
            return self.handle_prompt_key(key);
        }

        let key_str = canonical_key_string(&key);

        // Session shortcuts (undo/redo/bold/italic) come before global commands
        if let Some(action) = self.shortcuts.resolve(&key_str) {
            self.apply_action(action);
            return false;
        }

        if let Some(cmd_name) = self.commands.resolve_key(&key_str) {
            return self.run_command_by_name(&cmd_name);
        }

        match self.focus {
            Focus::Editor => self.handle_editor_key(key),
            Focus::Preview => self.handle_preview_key(key),
        }
        false
    }

    fn handle_preview_key(&mut self, key: KeyEvent) {
        let page = self.pane_layout().preview.map_or(10, |r| r.h.max(1));
        let page = isize::try_from(page).unwrap_or(10);
        match key.code {
            KeyCode::Up => self.scroll_preview(-1),
            KeyCode::Down => self.scroll_preview(1),
            KeyCode::PageUp => self.scroll_preview(-page),
            KeyCode::PageDown => self.scroll_preview(page),
            KeyCode::Home => self.scroll_preview(isize::MIN / 2),
            KeyCode::Esc => self.set_focus(Focus::Editor),
            _ => {}
        }
    }

    fn scroll_preview(&mut self, delta: isize) {
        self.preview_scroll = self.preview_scroll.saturating_add_signed(delta);
        self.mark_redraw();
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down | KeyCode::Home | KeyCode::End
            | KeyCode::PageUp | KeyCode::PageDown => self.move_cursor(key.code, shift, ctrl),
            KeyCode::Esc => {
                if self.anchor.take().is_some() {
                    self.report_selection();
                    self.mark_redraw();
                }
            }
            KeyCode::Enter => self.replace_selection("\n"),
            KeyCode::Tab => self.replace_selection("  "),
            KeyCode::Backspace => {
                if self.selection_range().is_none() {
                    if self.cursor == 0 {
                        return;
                    }
                    self.anchor = Some(self.cursor - 1);
                }
                self.replace_selection("");
            }
            KeyCode::Delete => {
                if self.selection_range().is_none() {
                    if self.cursor >= char_len(self.session.text()) {
                        return;
                    }
                    self.anchor = Some(self.cursor + 1);
                }
                self.replace_selection("");
            }
            KeyCode::Char(ch) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                let pair = PAIRS.iter().find(|(open, _)| *open == ch);
                match (pair, self.selection_range()) {
                    (Some(&(open, close)), Some(_)) => {
                        self.wrap_selection(&open.to_string(), &close.to_string());
                    }
                    _ => {
                        let mut buf = [0u8; 4];
                        self.replace_selection(ch.encode_utf8(&mut buf));
                    }
                }
            }
            _ => {}
        }
    }

    /// Move the cursor for a navigation key. Shift extends the selection.
    fn move_cursor(&mut self, code: KeyCode, selecting: bool, ctrl: bool) {
        // Collapse a selection to its edge instead of stepping past it.
        if !selecting {
            if let (Some((a, b)), KeyCode::Left | KeyCode::Right) = (self.selection_range(), code) {
                let edge = if code == KeyCode::Left { a } else { b };
                self.move_to(edge, false);
                self.goal_col = None;
                return;
            }
        }

        let (line, col) = self.cursor_line_col();
        let page = self.pane_layout().editor.map_or(10, |r| r.h.max(1));
        let vertical = |app: &Self, target: usize| -> (usize, usize) {
            let goal = app.goal_col.unwrap_or(col);
            (app.offset_at(target, goal), goal)
        };

        let (pos, goal) = match code {
            KeyCode::Left => (self.cursor.saturating_sub(1), None),
            KeyCode::Right => (self.cursor + 1, None),
            KeyCode::Up => {
                let (p, g) = vertical(self, line.saturating_sub(1));
                (p, Some(g))
            }
            KeyCode::Down => {
                let (p, g) = vertical(self, line + 1);
                (p, Some(g))
            }
            KeyCode::PageUp => {
                let (p, g) = vertical(self, line.saturating_sub(page));
                (p, Some(g))
            }
            KeyCode::PageDown => {
                let (p, g) = vertical(self, line + page);
                (p, Some(g))
            }
            KeyCode::Home if ctrl => (0, None),
            KeyCode::End if ctrl => (usize::MAX, None),
            KeyCode::Home => (self.offset_at(line, 0), None),
            KeyCode::End => (self.offset_at(line, usize::MAX), None),
            _ => return,
        };
        self.move_to(pos, selecting);
        self.goal_col = goal;
    }

    /// Handle keys while a prompt is active.
    pub fn handle_prompt_key(&mut self, key: KeyEvent) -> bool {
        let Some(prompt) = &mut self.prompt else { return false; };
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match (key.code, ctrl) {
            (KeyCode::Esc, _) => {
                self.prompt = None;
            }
            (KeyCode::Tab, _) => {
                // Complete to the first palette match
                if prompt.kind == PromptKind::Command {
                    if let Some(first) = self.commands.search(prompt.input.trim(), 1).first() {
                        prompt.input = first.name.clone();
                        prompt.cursor = prompt.input.chars().count();
                    }
                }
            }
            (KeyCode::Enter, _) => {
                let kind = prompt.kind;
                let input = prompt.input.trim().to_string();
                self.prompt = None;
                self.mark_redraw();
                if input.is_empty() {
                    return false;
                }
                match kind {
                    PromptKind::Open => match Route::parse(&input) {
                        Ok(route) => self.navigate(&route),
                        Err(e) => {
                            debug!(input = %input, error = %e, "rejected route");
                            self.set_status(format!("{e:#}"), Duration::from_secs(3));
                        }
                    },
                    PromptKind::Command => return self.run_command_by_name(&input),
                }
            }
            (KeyCode::Backspace, _) => {
                if prompt.cursor > 0 {
                    let mut chars: Vec<char> = prompt.input.chars().collect();
                    chars.remove(prompt.cursor - 1);
                    prompt.input = chars.into_iter().collect();
                    prompt.cursor -= 1;
                }
            }
            (KeyCode::Delete, _) => {
                let len = prompt.input.chars().count();
                if prompt.cursor < len {
                    let mut chars: Vec<char> = prompt.input.chars().collect();
                    chars.remove(prompt.cursor);
                    prompt.input = chars.into_iter().collect();
                }
            }
            (KeyCode::Left, _) => prompt.cursor = prompt.cursor.saturating_sub(1),
            (KeyCode::Right, _) => prompt.cursor = min(prompt.cursor + 1, prompt.input.chars().count()),
            (KeyCode::Home, _) => prompt.cursor = 0,
            (KeyCode::End, _) => prompt.cursor = prompt.input.chars().count(),
            (KeyCode::Char('u'), true) => {
                // Ctrl+U clears prompt line
                prompt.input.clear();
                prompt.cursor = 0;
            }
            (KeyCode::Char(ch), false) if !key.modifiers.contains(KeyModifiers::ALT) => {
                let mut chars: Vec<char> = prompt.input.chars().collect();
                chars.insert(prompt.cursor, ch);
                prompt.input = chars.into_iter().collect();
                prompt.cursor += 1;
            }
            _ => {}
        }
        self.mark_redraw();
        false
    }
}
