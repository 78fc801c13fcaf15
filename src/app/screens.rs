//! Full-screen overlays: the help screen.

use super::App;
use anyhow::Result;
use crossterm::{
    cursor,
    style::{self, Color},
    terminal::{self, ClearType},
    QueueableCommand,
};
use std::io::Write;

const HELP_TEXT: &[&str] = &[
    " MDPAD HELP: Keybindings ",
    "=========================",
    "",
    " EDITING:",
    "  Ctrl + Z            Undo",
    "  Ctrl + Y / Shift+Z  Redo",
    "  Ctrl + B / Ctrl + I Bold / italic (wraps the selection)",
    "  Alt + 1 / 2 / 3     Heading 1 / 2 / 3",
    "  Alt + K / Alt + C   Link / inline code",
    "  ( [ { \" ' ` * _     Wrap the selection in the pair",
    "  Tab                 Insert 2 spaces",
    "  Shift + Arrows      Select text while moving",
    "",
    " DOCUMENTS:",
    "  Ctrl + N            New document",
    "  Ctrl + O            Open document by id",
    "  Ctrl + S            Save now (also saved automatically)",
    "  Alt + M / Alt + H   Export document.md / document.html",
    "",
    " VIEW:",
    "  F6                  Switch focus editor / preview (saves)",
    "  Alt + L             Toggle split / tabs layout",
    "  Alt + P / Alt + E   Preview / editor pane",
    "",
    " SYSTEM:",
    "  Ctrl + P            Command palette",
    "  Ctrl + Q            Quit",
    "  F1                  This help screen",
    "",
    " Press any key to close help...",
];

impl App {
    /// Render the help screen.
    pub fn render_help<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let width = self.size.0 as usize;
        let height = self.size.1 as usize;

        out.queue(cursor::Hide)?;
        out.queue(style::SetBackgroundColor(Color::DarkBlue))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(terminal::Clear(ClearType::All))?;

        let block_w = HELP_TEXT.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let x = width.saturating_sub(block_w) / 2;
        let start_y = height.saturating_sub(HELP_TEXT.len()) / 2;
        for (i, line) in HELP_TEXT.iter().enumerate() {
            out.queue(cursor::MoveTo(x as u16, (start_y + i) as u16))?;
            out.queue(style::Print(line))?;
        }

        out.queue(style::ResetColor)?;
        out.flush()?;
        Ok(())
    }
}
