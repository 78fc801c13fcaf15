//! Built-in command registration.

use crate::commands::{Command, CommandRegistry, CommandSource};
use crate::export::ExportFormat;
use crate::insertion::FormatAction;
use crate::shortcuts::SessionAction;
use crate::types::{Focus, Prompt, PromptKind};
use super::App;

fn builtin(reg: &mut CommandRegistry, name: &str, description: &str, key: Option<&str>, f: fn(&mut App) -> anyhow::Result<()>) {
    reg.register(Command {
        name: name.to_string(),
        description: description.to_string(),
        key: key.map(str::to_string),
        source: CommandSource::Builtin(f),
    });
}

/// Key chords for formatting commands that are not session shortcuts.
fn format_key(action: FormatAction) -> Option<&'static str> {
    match action {
        FormatAction::Heading1 => Some("Alt+1"),
        FormatAction::Heading2 => Some("Alt+2"),
        FormatAction::Heading3 => Some("Alt+3"),
        FormatAction::Link => Some("Alt+K"),
        FormatAction::InlineCode => Some("Alt+C"),
        _ => None,
    }
}

/// Register all built-in commands.
pub fn register_builtin_commands(reg: &mut CommandRegistry) {
    builtin(reg, "command", "Command palette (Ctrl+P)", Some("Ctrl+P"), |app| {
        app.prompt = Some(Prompt::new(PromptKind::Command, ""));
        app.mark_redraw();
        Ok(())
    });

    builtin(reg, "open", "Open document by id (Ctrl+O)", Some("Ctrl+O"), |app| {
        app.prompt = Some(Prompt::new(PromptKind::Open, ""));
        app.mark_redraw();
        Ok(())
    });

    builtin(reg, "new", "Create a new document (Ctrl+N)", Some("Ctrl+N"), App::new_document);

    builtin(reg, "reset", "Restore the example content on the home document", None, App::reset_to_example);

    builtin(reg, "save", "Save now (Ctrl+S)", Some("Ctrl+S"), |app| {
        app.session.blur();
        if let Some(w) = app.session.take_warning() {
            anyhow::bail!(w);
        }
        app.set_status("Saved", std::time::Duration::from_secs(1));
        Ok(())
    });

    builtin(reg, "undo", "Undo (Ctrl+Z)", None, |app| {
        app.apply_action(SessionAction::Undo);
        Ok(())
    });

    builtin(reg, "redo", "Redo (Ctrl+Y, Ctrl+Shift+Z)", None, |app| {
        app.apply_action(SessionAction::Redo);
        Ok(())
    });

    builtin(reg, "switch_focus", "Switch between editor and preview (F6)", Some("F6"), |app| {
        let next = match app.focus {
            Focus::Editor => Focus::Preview,
            Focus::Preview => Focus::Editor,
        };
        app.set_focus(next);
        Ok(())
    });

    builtin(reg, "layout", "Toggle split / tabs layout (Alt+L)", Some("Alt+L"), |app| {
        app.toggle_layout();
        Ok(())
    });

    builtin(reg, "toggle_preview", "Show preview (tabs) / toggle editor pane (split) (Alt+P)", Some("Alt+P"), |app| {
        app.toggle_preview();
        Ok(())
    });

    builtin(reg, "toggle_editor", "Show editor (tabs) / toggle preview pane (split) (Alt+E)", Some("Alt+E"), |app| {
        app.toggle_editor();
        Ok(())
    });

    builtin(reg, "export_md", "Export as document.md (Alt+M)", Some("Alt+M"), |app| app.export(ExportFormat::Markdown));

    builtin(reg, "export_html", "Export the preview as document.html (Alt+H)", Some("Alt+H"), |app| {
        app.export(ExportFormat::Html)
    });

    builtin(reg, "help", "Show help screen (F1)", Some("F1"), |app| {
        app.show_help = true;
        app.mark_redraw();
        Ok(())
    });

    builtin(reg, "quit", "Quit (Ctrl+Q)", Some("Ctrl+Q"), |_app| Ok(()));

    for action in FormatAction::ALL {
        reg.register(Command {
            name: action.command_name().to_string(),
            description: action.description().to_string(),
            key: format_key(action).map(str::to_string),
            source: CommandSource::Format(action),
        });
    }
}
