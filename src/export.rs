//! Exporting the current document as Markdown or as the rendered HTML preview.

use crate::preview::Preview;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Html,
}

impl ExportFormat {
    /// Parse a `--export` argument.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "html" | "htm" => Ok(Self::Html),
            other => bail!("Unknown export format '{other}' (expected md or html)"),
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Markdown => "document.md",
            Self::Html => "document.html",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            Self::Markdown => "text/markdown",
            Self::Html => "text/html",
        }
    }
}

/// A ready-to-write export payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub format: ExportFormat,
    pub body: String,
}

impl Export {
    pub fn file_name(&self) -> &'static str {
        self.format.file_name()
    }

    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }
}

/// The raw document text.
pub fn export_markdown(text: &str) -> Export {
    Export { format: ExportFormat::Markdown, body: text.to_string() }
}

/// The rendered preview as markup. `None` when no preview is on screen.
pub fn export_html(preview: Option<&Preview>) -> Option<Export> {
    let preview = preview?;
    Some(Export { format: ExportFormat::Html, body: preview.to_html() })
}

/// Write `export` into `dir` under its fixed file name.
pub fn write_export(dir: &Path, export: &Export) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create export directory: {}", dir.display()))?;
    let path = dir.join(export.file_name());
    fs::write(&path, &export.body).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), media_type = export.media_type(), "exported document");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_export_is_raw_text() {
        let e = export_markdown("# T\n\n**b**");
        assert_eq!(e.body, "# T\n\n**b**");
        assert_eq!(e.file_name(), "document.md");
        assert_eq!(e.media_type(), "text/markdown");
    }

    #[test]
    fn html_export_needs_a_preview() {
        assert_eq!(export_html(None), None);
        let preview = Preview::render("# Title");
        let e = export_html(Some(&preview)).unwrap();
        assert_eq!(e.file_name(), "document.html");
        assert_eq!(e.media_type(), "text/html");
        assert_eq!(e.body, preview.to_html());
        assert!(e.body.contains("Title"));
    }

    #[test]
    fn write_creates_file_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let path = write_export(&out, &export_markdown("hello")).unwrap();
        assert_eq!(path, out.join("document.md"));
        assert_eq!(fs::read_to_string(path).unwrap(), "hello");
    }

    #[test]
    fn format_names() {
        assert_eq!(ExportFormat::parse("MD").unwrap(), ExportFormat::Markdown);
        assert_eq!(ExportFormat::parse("html").unwrap(), ExportFormat::Html);
        assert!(ExportFormat::parse("pdf").is_err());
    }
}
