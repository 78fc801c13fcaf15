//! User configuration loaded from `mdpad.toml`.

use crate::session::SessionOptions;
use crate::types::Layout;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings read from the config file. Every field is optional in the file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where documents are stored, one `<key>.md` file each.
    pub storage_dir: PathBuf,
    /// Where `document.md` / `document.html` exports are written.
    pub export_dir: PathBuf,
    pub autosave_delay_ms: u64,
    /// Maximum undo steps kept; unbounded when absent.
    pub history_limit: Option<usize>,
    /// Initial layout; picked from the terminal width when absent.
    pub layout: Option<Layout>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: data_dir().join("storage"),
            export_dir: PathBuf::from("."),
            autosave_delay_ms: 500,
            history_limit: None,
            layout: None,
        }
    }
}

impl Config {
    /// Load from `explicit` if given, otherwise from the first config file that exists.
    /// No config file at all means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&s)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            autosave_delay: Duration::from_millis(self.autosave_delay_ms),
            history_limit: self.history_limit,
        }
    }
}

/// `./mdpad.toml`, then `<config_dir>/mdpad/config.toml`.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("mdpad.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("mdpad").join("config.toml"));
    }
    paths
}

/// `<data_local_dir>/mdpad`, or `./.mdpad` when the platform has no data directory.
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir().map_or_else(|| PathBuf::from(".mdpad"), |d| d.join("mdpad"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let p = dir.path().join("mdpad.toml");
        fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn empty_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::from_file(&write(&dir, "")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.session_options(), SessionOptions::default());
    }

    #[test]
    fn fields_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"
storage_dir = "/tmp/docs"
export_dir = "out"
autosave_delay_ms = 250
history_limit = 100
layout = "tabs"
"#;
        let cfg = Config::from_file(&write(&dir, body)).unwrap();
        assert_eq!(cfg.storage_dir, PathBuf::from("/tmp/docs"));
        assert_eq!(cfg.export_dir, PathBuf::from("out"));
        assert_eq!(cfg.layout, Some(Layout::Tabs));
        let opts = cfg.session_options();
        assert_eq!(opts.autosave_delay, Duration::from_millis(250));
        assert_eq!(opts.history_limit, Some(100));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::from_file(&write(&dir, "autosave = 3\n")).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
