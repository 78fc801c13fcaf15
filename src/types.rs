//! Common types used by the terminal UI.

use serde::Deserialize;
use std::time::Instant;

/// Terminals narrower than this start in the tab layout.
pub const NARROW_WIDTH: u16 = 80;

/// The different prompt modes shown in the bottom line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Document id or route to open.
    Open,
    Command,
}

/// Prompt state (what the user is typing at the bottom).
#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
    pub cursor: usize, // char index in input
}

impl Prompt {
    /// Create a new prompt pre-filled with `initial`.
    pub fn new(kind: PromptKind, initial: impl Into<String>) -> Self {
        let input = initial.into();
        let cursor = input.chars().count();
        Self { kind, input, cursor }
    }
}

/// Short-lived status message shown in the status bar.
#[derive(Clone)]
pub struct StatusMsg {
    pub text: String,
    pub until: Instant,
    /// Warnings are drawn in a different color.
    pub warning: bool,
}

/// How the editor and preview panes share the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Side by side.
    Split,
    /// One pane at a time.
    Tabs,
}

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Preview,
}

/// Layout plus pane visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub layout: Layout,
    pub editor_visible: bool,
    pub preview_visible: bool,
}

impl ViewState {
    /// Default view for a terminal `width` columns wide, unless `configured` pins the layout.
    pub fn for_width(width: u16, configured: Option<Layout>) -> Self {
        let layout = configured.unwrap_or(if width < NARROW_WIDTH { Layout::Tabs } else { Layout::Split });
        match layout {
            Layout::Tabs => Self { layout, editor_visible: true, preview_visible: false },
            Layout::Split => Self { layout, editor_visible: true, preview_visible: true },
        }
    }

    pub fn toggle_layout(&mut self) {
        match self.layout {
            Layout::Split => {
                self.layout = Layout::Tabs;
                if self.editor_visible && self.preview_visible {
                    self.preview_visible = false;
                }
            }
            Layout::Tabs => {
                self.layout = Layout::Split;
                self.editor_visible = true;
                self.preview_visible = true;
            }
        }
    }

    /// Tabs: switch to the preview tab. Split: show or hide the editor pane.
    pub fn toggle_preview(&mut self) {
        match self.layout {
            Layout::Tabs => {
                self.preview_visible = true;
                self.editor_visible = false;
            }
            Layout::Split => {
                if !self.editor_visible || self.preview_visible {
                    self.editor_visible = !self.editor_visible;
                }
            }
        }
    }

    /// Tabs: switch to the editor tab. Split: show or hide the preview pane.
    pub fn toggle_editor(&mut self) {
        match self.layout {
            Layout::Tabs => {
                self.editor_visible = true;
                self.preview_visible = false;
            }
            Layout::Split => {
                if !self.preview_visible || self.editor_visible {
                    self.preview_visible = !self.preview_visible;
                }
            }
        }
    }

    /// Focus that can actually receive input given what is visible.
    pub fn usable_focus(&self, wanted: Focus) -> Focus {
        match wanted {
            Focus::Editor if !self.editor_visible => Focus::Preview,
            Focus::Preview if !self.preview_visible => Focus::Editor,
            f => f,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_picks_default_layout() {
        let narrow = ViewState::for_width(60, None);
        assert_eq!(narrow.layout, Layout::Tabs);
        assert!(narrow.editor_visible && !narrow.preview_visible);
        let wide = ViewState::for_width(120, None);
        assert_eq!(wide.layout, Layout::Split);
        assert!(wide.editor_visible && wide.preview_visible);
        assert_eq!(ViewState::for_width(120, Some(Layout::Tabs)).layout, Layout::Tabs);
    }

    #[test]
    fn layout_toggle_round_trip() {
        let mut v = ViewState::for_width(120, None);
        v.toggle_layout();
        assert_eq!(v, ViewState { layout: Layout::Tabs, editor_visible: true, preview_visible: false });
        v.toggle_preview();
        assert!(!v.editor_visible && v.preview_visible);
        v.toggle_layout();
        assert_eq!(v, ViewState::for_width(120, None));
    }

    #[test]
    fn split_toggles_hide_the_other_pane() {
        let mut v = ViewState::for_width(120, None);
        v.toggle_preview();
        assert!(!v.editor_visible && v.preview_visible);
        v.toggle_preview();
        assert!(v.editor_visible);
        v.toggle_editor();
        assert!(v.editor_visible && !v.preview_visible);
    }

    #[test]
    fn split_never_hides_both_panes() {
        let mut v = ViewState::for_width(120, None);
        v.toggle_preview();
        v.toggle_editor();
        assert!(v.preview_visible);
        assert_eq!(v.usable_focus(Focus::Editor), Focus::Preview);
    }

    #[test]
    fn tabs_switch_panes() {
        let mut v = ViewState::for_width(40, None);
        v.toggle_preview();
        assert!(!v.editor_visible && v.preview_visible);
        v.toggle_editor();
        assert!(v.editor_visible && !v.preview_visible);
        assert_eq!(v.usable_focus(Focus::Preview), Focus::Editor);
    }
}
