//! Error types for the connector.

use crate::properties::ConfigError;
use crate::transport::TransportError;

/// Result type alias for connector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error type returned by caller-supplied preparators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Connector error types.
///
/// The variants are deliberately distinct so callers can pattern-match:
/// a missing template ([`Error::Template`] wrapping
/// [`NotFound`](mailbridge_template::Error::NotFound)) is recoverable and
/// must not be confused with a delivery failure ([`Error::Transport`]).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Template resolution failed (not found, missing variable, or I/O).
    #[error(transparent)]
    Template(#[from] mailbridge_template::Error),

    /// The property mapping could not be resolved into a usable
    /// transport configuration. Raised at send time, never at set time.
    #[error("transport configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The transport failed to deliver the message.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An address could not be parsed as a mailbox.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    Build(String),

    /// Error raised inside a caller-supplied preparator, surfaced unchanged.
    #[error(transparent)]
    Preparator(BoxError),
}

impl Error {
    /// Returns true if this is a template-not-found failure.
    #[must_use]
    pub fn is_template_not_found(&self) -> bool {
        matches!(self, Self::Template(e) if e.is_not_found())
    }
}
