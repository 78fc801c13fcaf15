//! `mdpad`: a terminal Markdown editor with a live preview.
//!
//! ## Reading guide (high level architecture)
//! - **`session::DocumentSession`**: the editing state of one document. It owns the undo
//!   **`history`**, the **`selection`** tracker and debounced **`persistence`**, and applies
//!   formatting through the **`insertion`** engine. Everything else talks to the session.
//! - **`storage`**: where document text lives (`FileStorage` on disk, `MemoryStorage` in tests).
//! - **`route`**: document identity (`/` or `/doc/{id}`) and storage keys.
//! - **`preview`**: Markdown (and Mermaid diagram) rendering for the preview pane and HTML export.
//! - **`app::App`**: terminal UI state, key handling and rendering around the session.
//! - **`shortcuts`**: session-scoped key bindings, released when the session goes away.

pub mod app;
pub mod commands;
pub mod config;
pub mod export;
pub mod highlight;
pub mod history;
pub mod insertion;
pub mod logging;
pub mod persistence;
pub mod preview;
pub mod route;
pub mod selection;
pub mod session;
pub mod shortcuts;
pub mod storage;
pub mod template;
pub mod terminal;
pub mod types;
pub mod utils;
