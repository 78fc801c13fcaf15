//! Rendering: drawing the editor, the preview and the status line to the terminal.

use super::App;
use crate::preview::LineStyle;
use crate::types::{Focus, Layout, PromptKind, ViewState};
use crate::utils::digits;
use anyhow::Result;
use crossterm::{
    cursor,
    style::{self, Attribute, Color},
    terminal::{self, ClearType},
    QueueableCommand,
};
use std::cmp::max;
use std::io::Write;
use unicode_width::UnicodeWidthChar;

/// A screen rectangle in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

/// Where each pane goes for the current terminal size and view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PaneLayout {
    pub editor: Option<Rect>,
    pub preview: Option<Rect>,
    /// Column of the split separator, if both panes are shown.
    pub separator: Option<usize>,
    /// Whether row 0 holds the tab bar.
    pub tab_bar: bool,
    pub prompt_y: Option<usize>,
    pub status_y: usize,
}

impl PaneLayout {
    pub fn compute(size: (u16, u16), view: ViewState, has_prompt: bool) -> Self {
        let width = size.0 as usize;
        let height = size.1 as usize;
        let tab_bar = view.layout == Layout::Tabs;
        let top = usize::from(tab_bar);
        let status_y = height.saturating_sub(1);
        let prompt_y = has_prompt.then(|| status_y.saturating_sub(1));
        let body_h = height.saturating_sub(1 + usize::from(has_prompt) + top);
        let full = Rect { x: 0, y: top, w: width, h: body_h };

        let (editor, preview, separator) = match (view.editor_visible, view.preview_visible) {
            (true, true) => {
                let left = width / 2;
                (
                    Some(Rect { w: left, ..full }),
                    Some(Rect { x: left + 1, w: width.saturating_sub(left + 1), ..full }),
                    Some(left),
                )
            }
            (true, false) => (Some(full), None, None),
            (false, true) => (None, Some(full), None),
            (false, false) => (None, None, None),
        };
        Self { editor, preview, separator, tab_bar, prompt_y, status_y }
    }
}

/// Width of the line-number gutter (`NN│ `) for `text`.
pub(crate) fn gutter_width(text: &str) -> usize {
    max(2, digits(text.split('\n').count())) + 2
}

fn preview_color(style: LineStyle) -> (Color, bool) {
    match style {
        LineStyle::Heading(1) => (Color::Cyan, true),
        LineStyle::Heading(_) => (Color::Blue, true),
        LineStyle::Body | LineStyle::Blank => (Color::Reset, false),
        LineStyle::ListItem => (Color::White, false),
        LineStyle::Quote => (Color::Grey, false),
        LineStyle::Code => (Color::Green, false),
        LineStyle::DiagramTitle => (Color::Magenta, true),
        LineStyle::Diagram => (Color::DarkMagenta, false),
        LineStyle::Rule => (Color::DarkGrey, false),
    }
}

/// Print `s` cut to `avail` display columns; returns the columns used.
fn print_clipped<W: Write>(out: &mut W, s: &str, avail: usize) -> Result<usize> {
    let mut used = 0;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(1);
        if used + w > avail {
            break;
        }
        out.queue(style::Print(ch))?;
        used += w;
    }
    Ok(used)
}

impl App {
    /// Render the entire UI.
    pub fn render<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if !self.needs_redraw {
            return Ok(());
        }
        self.needs_redraw = false;

        if self.show_help {
            return self.render_help(out);
        }

        let layout = self.pane_layout();
        out.queue(cursor::Hide)?;
        out.queue(style::ResetColor)?;
        out.queue(terminal::Clear(ClearType::All))?;

        if layout.tab_bar {
            self.render_tab_bar(out)?;
        }
        if let Some(r) = layout.editor {
            self.render_editor(out, r)?;
        }
        if let Some(x) = layout.separator {
            if let Some(r) = layout.editor {
                for row in r.y..r.y + r.h {
                    out.queue(cursor::MoveTo(x as u16, row as u16))?;
                    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
                    out.queue(style::Print("│"))?;
                }
                out.queue(style::ResetColor)?;
            }
        }
        if let Some(r) = layout.preview {
            self.render_preview(out, r)?;
        }
        if let Some(y) = layout.prompt_y {
            self.render_prompt(out, y)?;
        }
        self.render_status_bar(out, layout.status_y)?;

        match (layout.prompt_y, &self.prompt, layout.editor) {
            (Some(y), Some(p), _) => {
                let label = prompt_label(p.kind).chars().count();
                let x = label + p.input.chars().take(p.cursor).map(|c| UnicodeWidthChar::width(c).unwrap_or(1)).sum::<usize>();
                out.queue(cursor::MoveTo(x as u16, y as u16))?;
                out.queue(cursor::Show)?;
            }
            (_, None, Some(r)) if self.focus == Focus::Editor => {
                let (x, y) = self.cursor_screen_pos(r);
                out.queue(cursor::MoveTo(x as u16, y as u16))?;
                out.queue(cursor::Show)?;
            }
            _ => {}
        }
        out.flush()?;
        Ok(())
    }

    fn render_tab_bar<W: Write>(&self, out: &mut W) -> Result<()> {
        out.queue(cursor::MoveTo(0, 0))?;
        for (label, active) in [(" Editor ", self.view.editor_visible), (" Preview ", self.view.preview_visible)] {
            if active {
                out.queue(style::SetBackgroundColor(Color::DarkBlue))?;
                out.queue(style::SetForegroundColor(Color::White))?;
                out.queue(style::SetAttribute(Attribute::Bold))?;
            } else {
                out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            }
            out.queue(style::Print(label))?;
            out.queue(style::SetAttribute(Attribute::Reset))?;
            out.queue(style::ResetColor)?;
            out.queue(style::Print(" "))?;
        }
        Ok(())
    }

    fn render_editor<W: Write>(&mut self, out: &mut W, r: Rect) -> Result<()> {
        let text = self.session.text().to_string();
        let gutter = gutter_width(&text);
        let lnw = gutter - 2;
        let avail = r.w.saturating_sub(gutter);
        let sel = self.selection_range();
        let (cursor_line, _) = self.cursor_line_col();
        let fenced = crate::highlight::fenced_lines(&text);

        let mut line_start = 0;
        let mut lines = text.split('\n').enumerate();
        // Skip lines above the viewport, keeping track of their char offsets.
        for _ in 0..self.scroll_y {
            match lines.next() {
                Some((_, l)) => line_start += l.chars().count() + 1,
                None => break,
            }
        }

        for row in 0..r.h {
            out.queue(cursor::MoveTo(r.x as u16, (r.y + row) as u16))?;
            let Some((y, line)) = lines.next() else {
                out.queue(style::SetForegroundColor(Color::DarkGrey))?;
                out.queue(style::Print("~"))?;
                out.queue(style::ResetColor)?;
                continue;
            };

            let current = y == cursor_line && self.focus == Focus::Editor;
            let base_bg = current.then_some(Color::DarkBlue);
            if let Some(bg) = base_bg {
                out.queue(style::SetBackgroundColor(bg))?;
            }
            out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            out.queue(style::Print(format!("{:>width$}", y + 1, width = lnw)))?;
            out.queue(style::Print("│ "))?;
            out.queue(style::ResetColor)?;

            let in_fence = fenced.get(y).copied().unwrap_or(false);
            let highlights = if in_fence { Vec::new() } else { self.highlighter.get_highlights(y, line) };

            let mut col_used = 0;
            for (char_i, ch) in line.chars().enumerate().skip(self.scroll_x) {
                let ch_w = UnicodeWidthChar::width(ch).unwrap_or(1);
                if col_used + ch_w > avail {
                    break;
                }
                let offset = line_start + char_i;
                let selected = sel.is_some_and(|(a, b)| offset >= a && offset < b);

                // Selection overrides syntax highlighting
                if selected {
                    out.queue(style::SetForegroundColor(Color::Black))?;
                    out.queue(style::SetBackgroundColor(Color::Grey))?;
                } else {
                    if let Some(bg) = base_bg {
                        out.queue(style::SetBackgroundColor(bg))?;
                    }
                    let color = if in_fence {
                        Some(Color::Green)
                    } else {
                        self.highlighter.color_at(&highlights, char_i).map(|c| c.to_crossterm())
                    };
                    out.queue(style::SetForegroundColor(color.unwrap_or(Color::Reset)))?;
                }
                out.queue(style::Print(ch))?;
                out.queue(style::ResetColor)?;
                col_used += ch_w;
            }

            if current && col_used < avail {
                out.queue(style::SetBackgroundColor(Color::DarkBlue))?;
                out.queue(style::Print(" ".repeat(avail - col_used)))?;
                out.queue(style::ResetColor)?;
            }
            line_start += line.chars().count() + 1;
        }
        Ok(())
    }

    fn render_preview<W: Write>(&mut self, out: &mut W, r: Rect) -> Result<()> {
        let width = r.w.saturating_sub(2);
        let lines = self.preview.as_ref().map(|p| p.lines(width)).unwrap_or_default();
        self.preview_scroll = self.preview_scroll.min(lines.len().saturating_sub(1));

        for (row, line) in lines.iter().skip(self.preview_scroll).take(r.h).enumerate() {
            out.queue(cursor::MoveTo((r.x + 1) as u16, (r.y + row) as u16))?;
            let (color, bold) = preview_color(line.style);
            out.queue(style::SetForegroundColor(color))?;
            if bold {
                out.queue(style::SetAttribute(Attribute::Bold))?;
            }
            print_clipped(out, &line.text, width)?;
            out.queue(style::SetAttribute(Attribute::Reset))?;
            out.queue(style::ResetColor)?;
        }
        Ok(())
    }

    fn render_prompt<W: Write>(&self, out: &mut W, prompt_y: usize) -> Result<()> {
        let Some(p) = &self.prompt else { return Ok(()); };
        let width = self.size.0 as usize;

        if p.kind == PromptKind::Command {
            let hits = self.commands.search(p.input.trim(), 10);
            let start_y = prompt_y.saturating_sub(hits.len());
            for (i, cmd) in hits.iter().enumerate() {
                out.queue(cursor::MoveTo(0, (start_y + i) as u16))?;
                out.queue(terminal::Clear(ClearType::CurrentLine))?;
                out.queue(style::SetBackgroundColor(Color::AnsiValue(235)))?;
                out.queue(style::SetForegroundColor(Color::Yellow))?;
                let mut line = format!("  {:18}", cmd.name);
                line.push_str(&format!(" │ {:28}", cmd.description));
                if let Some(key) = &cmd.key {
                    line.push_str(&format!(" ({key})"));
                }
                let used = print_clipped(out, &line, width)?;
                if used < width {
                    out.queue(style::Print(" ".repeat(width - used)))?;
                }
                out.queue(style::ResetColor)?;
            }
        }

        out.queue(cursor::MoveTo(0, prompt_y as u16))?;
        out.queue(terminal::Clear(ClearType::CurrentLine))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(style::Print(prompt_label(p.kind)))?;
        out.queue(style::ResetColor)?;
        out.queue(style::Print(&p.input))?;
        Ok(())
    }

    fn render_status_bar<W: Write>(&self, out: &mut W, status_y: usize) -> Result<()> {
        let width = self.size.0 as usize;
        out.queue(cursor::MoveTo(0, status_y as u16))?;
        out.queue(style::SetForegroundColor(Color::Black))?;
        out.queue(style::SetBackgroundColor(Color::White))?;

        let (line, col) = self.cursor_line_col();
        let saving = if self.session.is_save_pending() { "●" } else { " " };
        let sel_info = self
            .selection_range()
            .map(|(a, b)| format!("  SEL {}", b - a))
            .unwrap_or_default();
        let undo = if self.session.can_undo() { "undo" } else { "    " };
        let redo = if self.session.can_redo() { "redo" } else { "    " };
        let mut bar = format!(" {saving} {}  Ln {}, Col {}{sel_info}  [{undo}|{redo}] ", self.route(), line + 1, col + 1);

        let mut msg_warning = false;
        if let Some(st) = &self.status {
            bar.push_str("| ");
            msg_warning = st.warning;
            if msg_warning {
                // Print the fixed part, then the warning in its own color.
                let used = print_clipped(out, &bar, width)?;
                out.queue(style::SetBackgroundColor(Color::DarkRed))?;
                out.queue(style::SetForegroundColor(Color::White))?;
                let used = used + print_clipped(out, &st.text, width.saturating_sub(used))?;
                if used < width {
                    out.queue(style::Print(" ".repeat(width - used)))?;
                }
            } else {
                bar.push_str(&st.text);
            }
        }
        if !msg_warning {
            let used = print_clipped(out, &bar, width)?;
            if used < width {
                out.queue(style::Print(" ".repeat(width - used)))?;
            }
        }
        out.queue(style::ResetColor)?;
        Ok(())
    }

    fn cursor_screen_pos(&self, r: Rect) -> (usize, usize) {
        let text = self.session.text();
        let (line, col) = self.cursor_line_col();
        let line_text = text.split('\n').nth(line).unwrap_or("");
        let x: usize = line_text
            .chars()
            .skip(self.scroll_x)
            .take(col.saturating_sub(self.scroll_x))
            .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(1))
            .sum();
        let x = (r.x + gutter_width(text) + x).min((r.x + r.w).saturating_sub(1));
        let y = r.y + line.saturating_sub(self.scroll_y).min(r.h.saturating_sub(1));
        (x, y)
    }
}

fn prompt_label(kind: PromptKind) -> &'static str {
    match kind {
        PromptKind::Open => "Open (id or /doc/<id>): ",
        PromptKind::Command => "Command: ",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_layout_shares_width() {
        let view = ViewState::for_width(100, None);
        let l = PaneLayout::compute((100, 30), view, false);
        let e = l.editor.unwrap();
        let p = l.preview.unwrap();
        assert_eq!((e.x, e.w), (0, 50));
        assert_eq!((p.x, p.w), (51, 49));
        assert_eq!(e.h, 29);
        assert_eq!(l.separator, Some(50));
        assert!(!l.tab_bar);
    }

    #[test]
    fn tabs_layout_reserves_tab_bar_and_prompt() {
        let view = ViewState::for_width(60, None);
        let l = PaneLayout::compute((60, 20), view, true);
        let e = l.editor.unwrap();
        assert!(l.preview.is_none());
        assert_eq!((e.y, e.w, e.h), (1, 60, 17));
        assert_eq!(l.prompt_y, Some(18));
        assert_eq!(l.status_y, 19);
    }

    #[test]
    fn gutter_grows_with_line_count() {
        assert_eq!(gutter_width("a"), 4);
        assert_eq!(gutter_width(&"\n".repeat(120)), 5);
    }

    #[test]
    fn renders_into_a_buffer() {
        use crate::config::Config;
        use crate::route::Route;
        use crate::storage::MemoryStorage;
        use std::rc::Rc;

        let mut app = App::new(Rc::new(MemoryStorage::new()), &Config::default(), &Route::Home, (100, 30));
        let mut buf = Vec::new();
        app.render(&mut buf).unwrap();
        let s = String::from_utf8_lossy(&buf);
        assert!(s.contains("Welcome"));
        // Nothing changed, nothing redrawn.
        let mut again = Vec::new();
        app.render(&mut again).unwrap();
        assert!(again.is_empty());
    }
}
