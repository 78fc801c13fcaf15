//! App: the terminal UI around one open document session.
//!
//! The document text, undo history and selection live in [`DocumentSession`]. `App` only keeps
//! view state (cursor, scroll, panes, prompt) and turns key presses into session calls.

mod builtin_commands;
mod input;
mod render;
mod screens;

use crate::commands::{CommandRegistry, CommandSource};
use crate::config::Config;
use crate::export::{self, ExportFormat};
use crate::highlight::Highlighter;
use crate::preview::Preview;
use crate::route::{DocumentId, Route};
use crate::session::{self, DocumentSession, SessionOptions};
use crate::shortcuts::{session_bindings, SessionAction, ShortcutScope, ShortcutTable};
use crate::storage::Storage;
use crate::types::{Focus, Layout, Prompt, StatusMsg, ViewState};
use crate::utils::{char_len, char_slice, line_col_to_offset, offset_to_line_col};
use anyhow::Result;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use unicode_width::UnicodeWidthChar;

pub use builtin_commands::register_builtin_commands;
use render::PaneLayout;

/// The top-level application state.
pub struct App {
    storage: Rc<dyn Storage>,
    options: SessionOptions,
    export_dir: PathBuf,
    /// The open document.
    pub(crate) session: DocumentSession,
    shortcuts: ShortcutTable,
    /// Bindings of the open session; `None` only while switching documents.
    shortcut_scope: Option<ShortcutScope>,
    /// Cursor as a char offset into the document text.
    pub(crate) cursor: usize,
    /// Selection anchor (char offset).
    pub(crate) anchor: Option<usize>,
    /// Column the cursor keeps while moving up and down.
    pub(crate) goal_col: Option<usize>,
    /// Editor viewport scroll (line, char column).
    pub(crate) scroll_y: usize,
    pub(crate) scroll_x: usize,
    pub(crate) preview_scroll: usize,
    pub(crate) view: ViewState,
    pub(crate) focus: Focus,
    /// Rendered preview; only materialized while the preview pane is visible.
    pub(crate) preview: Option<Preview>,
    pub(crate) prompt: Option<Prompt>,
    pub(crate) status: Option<StatusMsg>,
    pub(crate) commands: CommandRegistry,
    pub(crate) highlighter: Highlighter,
    /// Terminal size in columns and rows.
    pub(crate) size: (u16, u16),
    pub(crate) needs_redraw: bool,
    pub(crate) show_help: bool,
}

impl App {
    /// Open `route` with `storage` on a terminal of `size` (columns, rows).
    pub fn new(storage: Rc<dyn Storage>, config: &Config, route: &Route, size: (u16, u16)) -> Self {
        let options = config.session_options();
        let session = DocumentSession::open(route.document(), Rc::clone(&storage), &options);
        let mut commands = CommandRegistry::new();
        register_builtin_commands(&mut commands);

        let mut app = Self {
            storage,
            options,
            export_dir: config.export_dir.clone(),
            session,
            shortcuts: ShortcutTable::new(),
            shortcut_scope: None,
            cursor: 0,
            anchor: None,
            goal_col: None,
            scroll_y: 0,
            scroll_x: 0,
            preview_scroll: 0,
            view: ViewState::for_width(size.0, config.layout),
            focus: Focus::Editor,
            preview: None,
            prompt: None,
            status: None,
            commands,
            highlighter: Highlighter::new(),
            size,
            needs_redraw: true,
            show_help: false,
        };
        app.mounted();
        app.set_status("Ctrl+P commands • F1 help • Ctrl+Q quit", Duration::from_secs(4));
        app
    }

    pub fn route(&self) -> Route {
        self.session.id().route()
    }

    pub fn text(&self) -> &str {
        self.session.text()
    }

    pub fn session(&self) -> &DocumentSession {
        &self.session
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Mark that the screen needs to be redrawn.
    pub fn mark_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Show a message in the status bar.
    pub fn set_status(&mut self, msg: impl Into<String>, ttl: Duration) {
        self.status = Some(StatusMsg { text: msg.into(), until: Instant::now() + ttl, warning: false });
        self.mark_redraw();
    }

    /// Show a recoverable problem (storage, export) in the status bar.
    pub fn warn(&mut self, msg: impl Into<String>) {
        self.status = Some(StatusMsg { text: msg.into(), until: Instant::now() + Duration::from_secs(6), warning: true });
        self.mark_redraw();
    }

    /// Periodic updates: autosave timer, storage warnings, status expiry.
    pub fn tick(&mut self) {
        let was_pending = self.session.is_save_pending();
        self.session.tick();
        if was_pending != self.session.is_save_pending() {
            self.mark_redraw();
        }
        self.drain_warnings();
        if let Some(st) = &self.status {
            if Instant::now() >= st.until {
                self.status = None;
                self.mark_redraw();
            }
        }
    }

    /// Called when the terminal is resized.
    pub fn on_resize(&mut self, width: u16, height: u16) {
        let was_narrow = self.size.0 < crate::types::NARROW_WIDTH;
        self.size = (width, height);
        if was_narrow != (width < crate::types::NARROW_WIDTH) {
            self.view = ViewState::for_width(width, None);
            self.view_changed();
        }
        self.ensure_visible();
        self.mark_redraw();
    }

    // ==================== document lifecycle ====================

    /// End the current session: flush pending edits and release its shortcuts.
    fn close_session(&mut self) {
        self.shortcut_scope = None;
        if let Some(w) = self.session.close() {
            self.warn(w);
        }
    }

    /// Subscribe the session's shortcuts and reset per-document view state.
    fn mounted(&mut self) {
        self.shortcut_scope = Some(self.shortcuts.subscribe(session_bindings()));
        self.cursor = 0;
        self.anchor = None;
        self.goal_col = None;
        self.scroll_y = 0;
        self.scroll_x = 0;
        self.preview_scroll = 0;
        self.text_changed();
        self.drain_warnings();
    }

    fn mount(&mut self, id: DocumentId) {
        self.session = DocumentSession::open(id, Rc::clone(&self.storage), &self.options);
        self.mounted();
    }

    /// Switch to another document, ending the current session first.
    pub fn navigate(&mut self, route: &Route) {
        self.close_session();
        self.mount(route.document());
        self.set_status(format!("Opened {route}"), Duration::from_secs(2));
    }

    /// Create a document with a fresh id and open it.
    pub fn new_document(&mut self) -> Result<()> {
        self.close_session();
        match session::create_document(self.storage.as_ref()) {
            Ok(id) => {
                let route = id.route();
                self.mount(id);
                self.set_status(format!("New document {route}"), Duration::from_secs(3));
                Ok(())
            }
            Err(e) => {
                self.shortcut_scope = Some(self.shortcuts.subscribe(session_bindings()));
                Err(e)
            }
        }
    }

    /// Forget the home document and reopen it with the welcome content.
    pub fn reset_to_example(&mut self) -> Result<()> {
        self.close_session();
        let res = session::reset_default(self.storage.as_ref());
        self.mount(DocumentId::Default);
        res?;
        self.set_status("Restored example content", Duration::from_secs(3));
        Ok(())
    }

    /// Flush the open document before exit. Returns the storage warning if the final save failed.
    pub fn shutdown(&mut self) -> Option<String> {
        self.shortcut_scope = None;
        self.session.close()
    }

    pub fn active_shortcut_layers(&self) -> usize {
        self.shortcuts.active_layers()
    }

    fn drain_warnings(&mut self) {
        if let Some(w) = self.session.take_warning() {
            self.warn(w);
        }
    }

    // ==================== editing ====================

    /// Normalized selection, `None` when collapsed.
    pub fn selection_range(&self) -> Option<(usize, usize)> {
        let a = self.anchor?;
        match a.cmp(&self.cursor) {
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Less => Some((a, self.cursor)),
            std::cmp::Ordering::Greater => Some((self.cursor, a)),
        }
    }

    /// Tell the session where the selection (or bare cursor) is.
    pub(crate) fn report_selection(&mut self) {
        let (a, b) = self.selection_range().unwrap_or((self.cursor, self.cursor));
        self.session.record_selection(a, b);
    }

    /// Move the cursor to `pos`, extending the selection when `selecting`.
    pub(crate) fn move_to(&mut self, pos: usize, selecting: bool) {
        if selecting {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
        self.cursor = pos.min(char_len(self.session.text()));
        self.report_selection();
        self.ensure_visible();
        self.mark_redraw();
    }

    /// Replace the selection (or insert at the cursor) with `s`.
    pub(crate) fn replace_selection(&mut self, s: &str) {
        let (a, b) = self.selection_range().unwrap_or((self.cursor, self.cursor));
        let text = self.session.text();
        let next = format!("{}{}{}", char_slice(text, 0, a), s, char_slice(text, b, usize::MAX));
        self.session.set_text(next);
        self.after_edit(a + char_len(s));
    }

    /// Wrap the selection in `open`/`close` through the session's insertion engine.
    pub(crate) fn wrap_selection(&mut self, open: &str, close: &str) {
        self.report_selection();
        let end = self.selection_range().map_or(self.cursor, |(_, b)| b);
        self.session.insert_markdown(open, close, None);
        self.after_edit(end + char_len(open) + char_len(close));
    }

    /// Run a session-level action (shortcut or command).
    pub fn apply_action(&mut self, action: SessionAction) {
        match action {
            SessionAction::Undo => {
                if self.session.undo() {
                    self.after_edit(self.cursor);
                } else {
                    self.set_status("Nothing to undo", Duration::from_secs(1));
                }
            }
            SessionAction::Redo => {
                if self.session.redo() {
                    self.after_edit(self.cursor);
                } else {
                    self.set_status("Nothing to redo", Duration::from_secs(1));
                }
            }
            SessionAction::Format(f) => {
                self.report_selection();
                let end = self.session.apply(f);
                self.after_edit(end);
            }
        }
    }

    fn after_edit(&mut self, cursor: usize) {
        self.anchor = None;
        self.goal_col = None;
        self.cursor = cursor;
        self.text_changed();
        self.report_selection();
        self.ensure_visible();
    }

    /// The text changed: re-render derived state.
    fn text_changed(&mut self) {
        self.cursor = self.cursor.min(char_len(self.session.text()));
        if let Some(a) = self.anchor {
            self.anchor = Some(a.min(char_len(self.session.text())));
        }
        self.highlighter.invalidate_all();
        self.refresh_preview();
        self.mark_redraw();
    }

    fn refresh_preview(&mut self) {
        self.preview = self.view.preview_visible.then(|| Preview::render(self.session.text()));
    }

    // ==================== view ====================

    /// Move keyboard focus. Leaving the editor saves the document.
    pub fn set_focus(&mut self, focus: Focus) {
        let focus = self.view.usable_focus(focus);
        if self.focus == Focus::Editor && focus != Focus::Editor {
            self.session.blur();
            self.drain_warnings();
        }
        self.focus = focus;
        self.mark_redraw();
    }

    pub fn toggle_layout(&mut self) {
        self.view.toggle_layout();
        self.view_changed();
        let name = match self.view.layout {
            Layout::Split => "split",
            Layout::Tabs => "tabs",
        };
        self.set_status(format!("Layout: {name}"), Duration::from_secs(2));
    }

    pub fn toggle_preview(&mut self) {
        self.view.toggle_preview();
        self.view_changed();
    }

    pub fn toggle_editor(&mut self) {
        self.view.toggle_editor();
        self.view_changed();
    }

    fn view_changed(&mut self) {
        let focus = self.view.usable_focus(self.focus);
        self.set_focus(focus);
        self.refresh_preview();
        self.ensure_visible();
        self.mark_redraw();
    }

    /// Write the document (Markdown) or the visible preview (HTML) to the export directory.
    pub fn export(&mut self, format: ExportFormat) -> Result<()> {
        let payload = match format {
            ExportFormat::Markdown => export::export_markdown(self.session.text()),
            ExportFormat::Html => {
                let Some(e) = export::export_html(self.preview.as_ref()) else {
                    debug!("html export skipped: preview not visible");
                    return Ok(());
                };
                e
            }
        };
        let path = export::write_export(&self.export_dir, &payload)?;
        self.set_status(format!("Exported {}", path.display()), Duration::from_secs(3));
        Ok(())
    }

    /// Update scroll so the cursor is visible.
    pub fn ensure_visible(&mut self) {
        let Some(pane) = self.pane_layout().editor else { return; };
        let text = self.session.text();
        let (line, col) = offset_to_line_col(text, self.cursor);
        let height = pane.h.max(1);

        if line < self.scroll_y {
            self.scroll_y = line;
        } else if line >= self.scroll_y + height {
            self.scroll_y = line + 1 - height;
        }

        let avail = pane.w.saturating_sub(render::gutter_width(text)).saturating_sub(1).max(1);
        let line_text = text.split('\n').nth(line).unwrap_or("");
        let width_of = |n: usize| -> usize {
            line_text.chars().take(n).map(|ch| UnicodeWidthChar::width(ch).unwrap_or(1)).sum()
        };
        if col < self.scroll_x {
            self.scroll_x = col;
        } else {
            while width_of(col) - width_of(self.scroll_x) >= avail && self.scroll_x < col {
                self.scroll_x += 1;
            }
        }
    }

    /// Cursor position as (line, col) within the current text.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        offset_to_line_col(self.session.text(), self.cursor)
    }

    pub(crate) fn offset_at(&self, line: usize, col: usize) -> usize {
        line_col_to_offset(self.session.text(), line, col)
    }

    pub(crate) fn pane_layout(&self) -> PaneLayout {
        PaneLayout::compute(self.size, self.view, self.prompt.is_some())
    }

    /// Run a command by name. Returns `true` when the app should quit.
    pub fn run_command_by_name(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.eq_ignore_ascii_case("quit") {
            return true;
        }

        let Some(cmd) = self.commands.get(name).cloned() else {
            let mut msg = format!("Unknown command: '{name}'");
            if let Some(suggestion) = self.commands.suggest_command(name) {
                msg.push_str(&format!(". Did you mean '{}'?", suggestion.name));
            }
            self.set_status(msg, Duration::from_secs(3));
            return false;
        };

        match cmd.source {
            CommandSource::Builtin(f) => {
                if let Err(e) = f(self) {
                    warn!(command = %cmd.name, error = %format!("{e:#}"), "command failed");
                    self.warn(format!("{}: {e:#}", cmd.name));
                }
            }
            CommandSource::Format(action) => self.apply_action(SessionAction::Format(action)),
        }
        self.mark_redraw();
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::template::WELCOME_TEMPLATE;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    const WIDE: (u16, u16) = (120, 40);

    fn app_with(st: &MemoryStorage, route: &str, size: (u16, u16)) -> App {
        let config = Config { export_dir: std::env::temp_dir(), ..Config::default() };
        App::new(Rc::new(st.clone()), &config, &Route::parse(route).unwrap(), size)
    }

    fn key(app: &mut App, code: KeyCode, mods: KeyModifiers) -> bool {
        app.handle_key(KeyEvent::new(code, mods))
    }

    fn type_str(app: &mut App, s: &str) {
        for ch in s.chars() {
            key(app, KeyCode::Char(ch), KeyModifiers::NONE);
        }
    }

    // ==================== typing & selection ====================

    #[test]
    fn typing_commits_each_keystroke() {
        let st = MemoryStorage::new();
        let mut app = app_with(&st, "/doc/t1", WIDE);
        type_str(&mut app, "Hi");
        assert_eq!(app.text(), "Hi");
        assert_eq!(app.session().history().past(), ["", "H"]);
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn bold_shortcut_without_selection_inserts_at_cursor() {
        let st = MemoryStorage::new();
        let mut app = app_with(&st, "/doc/t2", WIDE);
        type_str(&mut app, "Hi");
        key(&mut app, KeyCode::Char('b'), KeyModifiers::CONTROL);
        assert_eq!(app.text(), "Hi**bold text**");
        assert_eq!(app.cursor, char_len("Hi**bold text**"));
    }

    #[test]
    fn bold_shortcut_wraps_selection() {
        let st = MemoryStorage::new();
        let mut app = app_with(&st, "/doc/t3", WIDE);
        type_str(&mut app, "Hi there");
        key(&mut app, KeyCode::Home, KeyModifiers::NONE);
        key(&mut app, KeyCode::Right, KeyModifiers::SHIFT);
        key(&mut app, KeyCode::Right, KeyModifiers::SHIFT);
        assert_eq!(app.session().selected_text(), "Hi");
        key(&mut app, KeyCode::Char('b'), KeyModifiers::CONTROL);
        assert_eq!(app.text(), "**Hi** there");
    }

    #[test]
    fn pair_character_wraps_selection() {
        let st = MemoryStorage::new();
        let mut app = app_with(&st, "/doc/t4", WIDE);
        type_str(&mut app, "word");
        key(&mut app, KeyCode::Home, KeyModifiers::SHIFT);
        key(&mut app, KeyCode::Char('('), KeyModifiers::NONE);
        assert_eq!(app.text(), "(word)");
        assert_eq!(app.cursor, 6);
    }

    #[test]
    fn tab_inserts_two_spaces_over_selection() {
        let st = MemoryStorage::new();
        let mut app = app_with(&st, "/doc/t5", WIDE);
        type_str(&mut app, "ab");
        key(&mut app, KeyCode::Left, KeyModifiers::SHIFT);
        key(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.text(), "a  ");
    }

    #[test]
    fn undo_redo_shortcuts() {
        let st = MemoryStorage::new();
        let mut app = app_with(&st, "/doc/t6", WIDE);
        type_str(&mut app, "ab");
        key(&mut app, KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(app.text(), "a");
        key(&mut app, KeyCode::Char('Z'), KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert_eq!(app.text(), "ab");
        key(&mut app, KeyCode::Char('z'), KeyModifiers::CONTROL);
        key(&mut app, KeyCode::Char('y'), KeyModifiers::CONTROL);
        assert_eq!(app.text(), "ab");
    }

    #[test]
    fn backspace_and_newline() {
        let st = MemoryStorage::new();
        let mut app = app_with(&st, "/doc/t7", WIDE);
        type_str(&mut app, "abc");
        key(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        key(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        type_str(&mut app, "d");
        assert_eq!(app.text(), "ab\nd");
        assert_eq!(app.cursor_line_col(), (1, 1));
        key(&mut app, KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(app.cursor_line_col(), (0, 1));
    }

    // ==================== persistence & lifecycle ====================

    #[test]
    fn focus_switch_saves_immediately() {
        let st = MemoryStorage::new();
        let mut app = app_with(&st, "/doc/t8", WIDE);
        type_str(&mut app, "draft");
        assert_eq!(st.write_count(), 0);
        key(&mut app, KeyCode::F(6), KeyModifiers::NONE);
        assert_eq!(app.focus(), Focus::Preview);
        assert_eq!(st.get("markdown-t8").as_deref(), Some("draft"));
        assert!(!app.session().is_save_pending());
    }

    #[test]
    fn navigating_flushes_and_swaps_shortcuts() {
        let st = MemoryStorage::new();
        let mut app = app_with(&st, "/doc/a", WIDE);
        assert_eq!(app.active_shortcut_layers(), 1);
        type_str(&mut app, "alpha");
        app.navigate(&Route::parse("/doc/b").unwrap());
        assert_eq!(st.get("markdown-a").as_deref(), Some("alpha"));
        assert_eq!(app.route().to_string(), "/doc/b");
        assert_eq!(app.text(), "");
        assert_eq!(app.active_shortcut_layers(), 1);
        app.navigate(&Route::parse("/doc/a").unwrap());
        assert_eq!(app.text(), "alpha");
    }

    #[test]
    fn new_document_clears_default_only() {
        let st = MemoryStorage::new();
        let mut app = app_with(&st, "/", WIDE);
        assert_eq!(app.text(), WELCOME_TEMPLATE);
        key(&mut app, KeyCode::End, KeyModifiers::CONTROL);
        type_str(&mut app, "!");
        app.new_document().unwrap();
        assert!(!st.contains("markdown-default"));
        let Route::Doc(DocumentId::Named(id)) = app.route() else { panic!("expected a named document") };
        assert_eq!(id.len(), crate::route::GENERATED_ID_LEN);
        assert!(!st.contains(&format!("markdown-{id}")));
        assert_eq!(app.text(), "");
    }

    #[test]
    fn reset_restores_template() {
        let st = MemoryStorage::new();
        let mut app = app_with(&st, "/", WIDE);
        type_str(&mut app, "mine");
        app.shutdown();
        assert!(st.contains("markdown-default"));
        let mut app = app_with(&st, "/", WIDE);
        assert!(app.text().starts_with("mine"));
        app.reset_to_example().unwrap();
        assert_eq!(app.text(), WELCOME_TEMPLATE);
        assert!(!st.contains("markdown-default"));
    }

    #[test]
    fn storage_failure_is_a_warning_not_a_crash() {
        let st = MemoryStorage::new();
        let mut app = app_with(&st, "/doc/w", WIDE);
        st.set_fail_writes(true);
        type_str(&mut app, "x");
        key(&mut app, KeyCode::F(6), KeyModifiers::NONE);
        let status = app.status.as_ref().expect("warning shown");
        assert!(status.warning);
        assert_eq!(app.text(), "x");
    }

    #[test]
    fn shutdown_reports_failed_final_save() {
        let st = MemoryStorage::new();
        let mut app = app_with(&st, "/doc/q", WIDE);
        type_str(&mut app, "unsaved");
        st.set_fail_writes(true);
        let warning = app.shutdown().expect("failed save is reported");
        assert!(warning.starts_with("Could not save"), "{warning}");
        assert!(!st.contains("markdown-q"));
        assert_eq!(app.active_shortcut_layers(), 0);
    }

    #[test]
    fn shutdown_after_clean_save_reports_nothing() {
        let st = MemoryStorage::new();
        let mut app = app_with(&st, "/doc/q2", WIDE);
        type_str(&mut app, "kept");
        assert_eq!(app.shutdown(), None);
        assert_eq!(st.get("markdown-q2").as_deref(), Some("kept"));
    }

    // ==================== view & export ====================

    #[test]
    fn narrow_terminal_starts_in_tabs_without_preview() {
        let st = MemoryStorage::new();
        let app = app_with(&st, "/doc/n", (60, 20));
        assert_eq!(app.view().layout, Layout::Tabs);
        assert!(app.preview.is_none());
    }

    #[test]
    fn html_export_aborts_without_visible_preview() {
        let dir = tempfile::tempdir().unwrap();
        let st = MemoryStorage::new();
        let config = Config { export_dir: dir.path().to_path_buf(), ..Config::default() };
        let mut app = App::new(Rc::new(st), &config, &Route::parse("/doc/x").unwrap(), (60, 20));
        app.export(ExportFormat::Html).unwrap();
        assert!(!dir.path().join("document.html").exists());

        app.toggle_preview();
        app.export(ExportFormat::Html).unwrap();
        assert!(dir.path().join("document.html").exists());
        app.export(ExportFormat::Markdown).unwrap();
        assert!(dir.path().join("document.md").exists());
    }

    #[test]
    fn unknown_command_suggests() {
        let st = MemoryStorage::new();
        let mut app = app_with(&st, "/doc/c", WIDE);
        assert!(!app.run_command_by_name("bodl"));
        let msg = &app.status.as_ref().unwrap().text;
        assert!(msg.contains("Did you mean 'bold'"), "{msg}");
        assert!(app.run_command_by_name("quit"));
    }

    #[test]
    fn format_command_from_palette() {
        let st = MemoryStorage::new();
        let mut app = app_with(&st, "/doc/p", WIDE);
        key(&mut app, KeyCode::Char('p'), KeyModifiers::CONTROL);
        type_str(&mut app, "heading2");
        key(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.text(), "## ");
    }
}
