//! Example content shown on the home document until the user saves something there.

pub const WELCOME_TEMPLATE: &str = r#"# Welcome to mdpad

A small terminal editor for **Markdown** with a _live_ preview.

## Features

- Live preview next to the editor
- Formatting commands and shortcuts
- Split and tab layouts
- Export to Markdown or HTML
- Mermaid diagram blocks: flow charts, sequence diagrams and pie charts

## Getting started

1. Type in the editor pane
2. Select text and press Ctrl+B or Ctrl+I to format it
3. Press Ctrl+P to browse every command
4. Your work is saved automatically

> Press F1 at any time for the list of key bindings.

```rust
fn greet(name: &str) -> String {
    format!("Hello, {name}!")
}
```

## Diagrams

### Flow chart

```mermaid
graph TD
    A[Write] --> B{Looks right?}
    B -->|Yes| C[Export]
    B -->|No| D[Edit]
    D --> B
```

### Sequence diagram

```mermaid
sequenceDiagram
    participant User
    participant Editor
    User->>Editor: Type Markdown
    Editor->>User: Update preview
```

### Pie chart

```mermaid
pie title Where the time goes
    "Writing" : 45
    "Editing" : 30
    "Formatting" : 15
    "Coffee" : 10
```

- [ ] Try the task list command
- [x] Open mdpad

Enjoy writing!
"#;
