//! Template storage backends.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Source of raw template text.
///
/// Implement this trait to load templates from alternative backends
/// (databases, embedded assets). A missing resource must surface as
/// [`Error::NotFound`], not as a generic I/O failure, so callers can
/// handle it distinctly.
pub trait TemplateStore: Send + Sync {
    /// Loads the raw template text for a logical name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no resource exists under `name`,
    /// or [`Error::Io`] for any other I/O failure.
    fn load(&self, name: &str) -> Result<String>;
}

/// Filesystem-backed template store.
///
/// Logical names are resolved as relative paths under a root directory:
/// `templates/invitationtemplate` maps to
/// `<root>/templates/invitationtemplate`.
#[derive(Debug, Clone)]
pub struct FsTemplateStore {
    root: PathBuf,
}

impl FsTemplateStore {
    /// Creates a store rooted at the given directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a logical name to a path under the root.
    ///
    /// Absolute names and names with parent-directory components resolve to
    /// nothing: the store only serves resources below its root.
    fn resolve_path(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || name.is_empty() {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl TemplateStore for FsTemplateStore {
    fn load(&self, name: &str) -> Result<String> {
        let Some(path) = self.resolve_path(name) else {
            return Err(Error::not_found(name));
        };

        match std::fs::read_to_string(&path) {
            Ok(text) => {
                tracing::debug!(name, path = %path.display(), "Loaded template");
                Ok(text)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::not_found(name)),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// In-memory template store.
///
/// Useful for tests and for embedding templates directly in the binary.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateStore {
    templates: HashMap<String, String>,
}

impl MemoryTemplateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template under a logical name, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.templates.insert(name.into(), text.into());
    }

    /// Registers a template, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn load(&self, name: &str) -> Result<String> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found(name))
    }
}
