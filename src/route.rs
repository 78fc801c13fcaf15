//! Document identity and routing: `/` is the home document, `/doc/{id}` a named one.

use anyhow::{bail, Result};
use std::fmt;

/// Length of generated document identifiers.
pub const GENERATED_ID_LEN: usize = 10;

/// Which document a session edits. Also determines the storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentId {
    /// The home document.
    Default,
    Named(String),
}

impl DocumentId {
    /// Validate and wrap an identifier taken from a route or the command line.
    pub fn named(id: &str) -> Result<Self> {
        if id.is_empty() {
            bail!("Document id must not be empty");
        }
        if let Some(bad) = id.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_')) {
            bail!("Invalid character '{}' in document id '{}'", bad, id);
        }
        Ok(Self::Named(id.to_string()))
    }

    /// A fresh short random identifier.
    pub fn generate() -> Self {
        let token = uuid::Uuid::new_v4().simple().to_string();
        Self::Named(token[..GENERATED_ID_LEN].to_string())
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// Storage key: `markdown-<id>` or `markdown-default`.
    pub fn storage_key(&self) -> String {
        match self {
            Self::Default => "markdown-default".to_string(),
            Self::Named(id) => format!("markdown-{id}"),
        }
    }

    pub fn route(&self) -> Route {
        match self {
            Self::Default => Route::Home,
            Self::Named(_) => Route::Doc(self.clone()),
        }
    }
}

/// An addressable view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Doc(DocumentId),
}

impl Route {
    /// Parse `/`, `/doc/{id}`, or a bare identifier.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s == "/" {
            return Ok(Self::Home);
        }
        if let Some(rest) = s.strip_prefix("/doc/") {
            return Ok(Self::Doc(DocumentId::named(rest.trim_end_matches('/'))?));
        }
        if s.starts_with('/') {
            bail!("Unknown route '{}'. Expected '/' or '/doc/<id>'", s);
        }
        Ok(Self::Doc(DocumentId::named(s)?))
    }

    pub fn document(&self) -> DocumentId {
        match self {
            Self::Home => DocumentId::Default,
            Self::Doc(id) => id.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home | Self::Doc(DocumentId::Default) => write!(f, "/"),
            Self::Doc(DocumentId::Named(id)) => write!(f, "/doc/{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys() {
        assert_eq!(DocumentId::Default.storage_key(), "markdown-default");
        assert_eq!(DocumentId::named("abc").unwrap().storage_key(), "markdown-abc");
    }

    #[test]
    fn parse_routes() {
        assert_eq!(Route::parse("/").unwrap(), Route::Home);
        assert_eq!(Route::parse("").unwrap(), Route::Home);
        assert_eq!(Route::parse("/doc/Xy_9-a").unwrap(), Route::Doc(DocumentId::Named("Xy_9-a".into())));
        assert_eq!(Route::parse("/doc/abc/").unwrap().to_string(), "/doc/abc");
        assert_eq!(Route::parse("abc").unwrap().to_string(), "/doc/abc");
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(Route::parse("/docs/abc").is_err());
        assert!(Route::parse("/doc/").is_err());
        assert!(Route::parse("/doc/a b").is_err());
        assert!(Route::parse("../x").is_err());
    }

    #[test]
    fn generated_ids_are_short_and_distinct() {
        let a = DocumentId::generate();
        let b = DocumentId::generate();
        assert_ne!(a, b);
        let DocumentId::Named(token) = a else { panic!("generated id must be named") };
        assert_eq!(token.len(), GENERATED_ID_LEN);
        assert!(DocumentId::named(&token).is_ok());
    }

    #[test]
    fn route_roundtrip() {
        let id = DocumentId::named("k3y").unwrap();
        assert_eq!(id.route().to_string(), "/doc/k3y");
        assert_eq!(Route::parse(&id.route().to_string()).unwrap().document(), id);
        assert_eq!(DocumentId::Default.route(), Route::Home);
    }
}
