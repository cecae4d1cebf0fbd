//! Error types for template operations.

use std::io;

/// Result type alias for template operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Template error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No template resource exists under the given name.
    #[error("template not found: {name}")]
    NotFound {
        /// Logical name the caller asked for.
        name: String,
    },

    /// A placeholder referenced a variable absent from the supplied map.
    ///
    /// Only raised under [`MissingVariables::Error`](crate::MissingVariables).
    #[error("template {name}: no value supplied for variable `{variable}`")]
    MissingVariable {
        /// Logical name of the template being resolved.
        name: String,
        /// The unresolved variable.
        variable: String,
    },

    /// I/O failure other than a missing resource.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Creates a not-found error for the given logical name.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Returns true if this is a not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
