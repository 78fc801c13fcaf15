//! Terminal setup and teardown.

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    style,
    terminal::{self, ClearType},
    ExecutableCommand,
};
use std::io::{self, Stdout, Write};

/// Raw mode + alternate screen for as long as the guard lives.
///
/// Dropping it restores the terminal, including on early return or panic unwind, so the
/// session still gets flushed to storage with a usable shell afterwards.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn new(stdout: &mut Stdout) -> Result<Self> {
        terminal::enable_raw_mode().context("enable_raw_mode failed")?;
        stdout
            .execute(terminal::EnterAlternateScreen)?
            .execute(EnableMouseCapture)?
            .execute(cursor::Hide)?
            .execute(terminal::Clear(ClearType::All))?;
        stdout.flush()?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.execute(style::ResetColor);
        let _ = stdout.execute(cursor::Show);
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}
