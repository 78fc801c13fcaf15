//! Markdown insertion: wrapping the last selection or appending a snippet.

use crate::selection::Selection;
use crate::utils::{char_len, char_to_byte_index};

/// Compute the document text after inserting `before`/`after` around the selection.
///
/// - No selection: `before + placeholder + after` is appended to `text`.
/// - Selection: the selected text (or the placeholder when the selection is empty) is wrapped
///   in place. Offsets are clamped to the current text since the selection may be stale.
pub fn insert(text: &str, selection: Option<&Selection>, before: &str, after: &str, placeholder: Option<&str>) -> String {
    let placeholder = placeholder.unwrap_or("");
    let Some(sel) = selection else {
        let mut out = String::with_capacity(text.len() + before.len() + placeholder.len() + after.len());
        out.push_str(text);
        out.push_str(before);
        out.push_str(placeholder);
        out.push_str(after);
        return out;
    };

    let (start, end) = clamp_range(text, sel.start, sel.end);
    let chosen = if sel.text.is_empty() { placeholder } else { sel.text.as_str() };

    let b0 = char_to_byte_index(text, start);
    let b1 = char_to_byte_index(text, end);
    let mut out = String::with_capacity(text.len() + before.len() + chosen.len() + after.len());
    out.push_str(&text[..b0]);
    out.push_str(before);
    out.push_str(chosen);
    out.push_str(after);
    out.push_str(&text[b1..]);
    out
}

/// Clamp `start..end` into `[0, len(text)]` (characters). An inverted range collapses to `start`.
pub fn clamp_range(text: &str, start: usize, end: usize) -> (usize, usize) {
    let len = char_len(text);
    let start = start.min(len);
    let end = end.min(len).max(start);
    (start, end)
}

/// Character offset just past the inserted snippet, for placing the cursor afterwards.
pub fn insertion_end(text: &str, selection: Option<&Selection>, before: &str, after: &str, placeholder: Option<&str>) -> usize {
    let placeholder = placeholder.unwrap_or("");
    match selection {
        None => char_len(text) + char_len(before) + char_len(placeholder) + char_len(after),
        Some(sel) => {
            let (start, _) = clamp_range(text, sel.start, sel.end);
            let chosen = if sel.text.is_empty() { placeholder } else { sel.text.as_str() };
            start + char_len(before) + char_len(chosen) + char_len(after)
        }
    }
}

const FLOWCHART: &str = "```mermaid
graph TD
  A[Start] --> B{Decision}
  B -->|Yes| C[Action 1]
  B -->|No| D[Action 2]
  C --> E[Result]
  D --> E
```";

const SEQUENCE_DIAGRAM: &str = "```mermaid
sequenceDiagram
  participant A as Alice
  participant B as Bob
  A->>B: Hello Bob
  B->>A: Hi Alice
  A->>B: How are you?
  B-->>A: I'm good, thanks!
```";

const PIE_CHART: &str = "```mermaid
pie title Distribution
  \"Segment A\" : 40
  \"Segment B\" : 30
  \"Segment C\" : 20
  \"Segment D\" : 10
```";

/// The fixed formatting snippets offered by the toolbar/commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatAction {
    Heading1,
    Heading2,
    Heading3,
    Bold,
    Italic,
    Strikethrough,
    BulletList,
    NumberedList,
    TaskList,
    Quote,
    InlineCode,
    CodeBlock,
    Link,
    Image,
    Flowchart,
    SequenceDiagram,
    PieChart,
}

impl FormatAction {
    pub const ALL: [FormatAction; 17] = [
        Self::Heading1,
        Self::Heading2,
        Self::Heading3,
        Self::Bold,
        Self::Italic,
        Self::Strikethrough,
        Self::BulletList,
        Self::NumberedList,
        Self::TaskList,
        Self::Quote,
        Self::InlineCode,
        Self::CodeBlock,
        Self::Link,
        Self::Image,
        Self::Flowchart,
        Self::SequenceDiagram,
        Self::PieChart,
    ];

    /// `(before, after, placeholder)` for this action.
    pub fn snippet(self) -> (&'static str, &'static str, Option<&'static str>) {
        match self {
            Self::Heading1 => ("# ", "", None),
            Self::Heading2 => ("## ", "", None),
            Self::Heading3 => ("### ", "", None),
            Self::Bold => ("**", "**", Some("bold text")),
            Self::Italic => ("*", "*", Some("italic text")),
            Self::Strikethrough => ("~~", "~~", Some("strikethrough text")),
            Self::BulletList => ("- ", "", None),
            Self::NumberedList => ("1. ", "", None),
            Self::TaskList => ("- [ ] ", "", None),
            Self::Quote => ("> ", "", None),
            Self::InlineCode => ("`", "`", Some("code")),
            Self::CodeBlock => ("\n```\n", "\n```\n", Some("code block")),
            Self::Link => ("[", "](https://example.com)", Some("link text")),
            Self::Image => ("![", "](https://example.com/image.jpg)", Some("image alt text")),
            Self::Flowchart => (FLOWCHART, "", None),
            Self::SequenceDiagram => (SEQUENCE_DIAGRAM, "", None),
            Self::PieChart => (PIE_CHART, "", None),
        }
    }

    /// Command name used by the palette and key bindings.
    pub fn command_name(self) -> &'static str {
        match self {
            Self::Heading1 => "heading1",
            Self::Heading2 => "heading2",
            Self::Heading3 => "heading3",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Strikethrough => "strikethrough",
            Self::BulletList => "bullet_list",
            Self::NumberedList => "numbered_list",
            Self::TaskList => "task_list",
            Self::Quote => "quote",
            Self::InlineCode => "code",
            Self::CodeBlock => "code_block",
            Self::Link => "link",
            Self::Image => "image",
            Self::Flowchart => "flowchart",
            Self::SequenceDiagram => "sequence_diagram",
            Self::PieChart => "pie_chart",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Heading1 => "Heading 1",
            Self::Heading2 => "Heading 2",
            Self::Heading3 => "Heading 3",
            Self::Bold => "Bold (Ctrl+B)",
            Self::Italic => "Italic (Ctrl+I)",
            Self::Strikethrough => "Strikethrough",
            Self::BulletList => "Bullet list",
            Self::NumberedList => "Numbered list",
            Self::TaskList => "Task list",
            Self::Quote => "Blockquote",
            Self::InlineCode => "Inline code",
            Self::CodeBlock => "Code block",
            Self::Link => "Link",
            Self::Image => "Image",
            Self::Flowchart => "Mermaid flow chart",
            Self::SequenceDiagram => "Mermaid sequence diagram",
            Self::PieChart => "Mermaid pie chart",
        }
    }
}
