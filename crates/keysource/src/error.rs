//! Error types for secret retrieval.

use std::fmt;

use thiserror::Error;

/// Errors that can occur while constructing a source or reading from it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SecretsError {
    /// The key has no value in the backend's store.
    #[error("secret not found: {key}")]
    NotFound {
        /// The key that was requested.
        key: String,
    },

    /// Unsupported or disabled backend type.
    #[error("unsupported secrets backend: {0}")]
    UnsupportedBackend(String),

    /// Invalid backend configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The caller's context was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// The caller's context deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Backend-specific failure (I/O, network, permissions).
    #[error("backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SecretsError {
    /// Creates a `NotFound` error for a key.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Wraps an opaque backend failure.
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Backend(err.into())
    }

    /// Returns the stable category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::UnsupportedBackend(_) => ErrorKind::Unsupported,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::DeadlineExceeded => ErrorKind::DeadlineExceeded,
            Self::Backend(_) => ErrorKind::Backend,
        }
    }

    /// Returns true if the key was absent, as opposed to any other failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Comparable category of a [`SecretsError`].
///
/// Call sites branch on this rather than on error messages:
///
/// ```rust,ignore
/// match source.get(&ctx, "API_KEY").await {
///     Ok(value) => use_key(value),
///     Err(e) if e.kind() == ErrorKind::NotFound => fall_back(),
///     Err(e) => return Err(e.into()),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Key absent from the store.
    NotFound,
    /// Unknown backend selector.
    Unsupported,
    /// Invalid backend configuration.
    Configuration,
    /// Context cancelled.
    Cancelled,
    /// Context deadline passed.
    DeadlineExceeded,
    /// Opaque backend failure.
    Backend,
}

impl ErrorKind {
    /// Returns a short lowercase label, suitable for structured log fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Unsupported => "unsupported",
            Self::Configuration => "configuration",
            Self::Cancelled => "cancelled",
            Self::DeadlineExceeded => "deadline_exceeded",
            Self::Backend => "backend",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
