//! Result and error types for repoform.

use thiserror::Error;

use crate::template::TemplateKind;

/// Result type for page object operations
pub type RepoformResult<T> = Result<T, RepoformError>;

/// Errors that can occur while driving a page
#[derive(Debug, Error)]
pub enum RepoformError {
    /// The session is showing a different page than the page object models
    #[error("Unexpected page: expected title {expected:?}, found {actual:?}")]
    UnexpectedPage {
        /// Title the page object requires
        expected: String,
        /// Title reported by the session
        actual: String,
    },

    /// A required element could not be resolved
    #[error("Element not found: {locator}")]
    ElementNotFound {
        /// Description of the locator that failed
        locator: String,
    },

    /// A page object asked its locator table for a name it does not declare
    #[error("Unknown locator: {name}")]
    UnknownLocator {
        /// Logical element name
        name: String,
    },

    /// The automation backend failed
    #[error("Session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// Navigation failed
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// No visible option matched a requested template
    #[error("No {kind} template matches {requested:?}")]
    TemplateNotFound {
        /// Which picker was searched
        kind: TemplateKind,
        /// Requested template name
        requested: String,
    },

    /// More than one visible option matched a requested template
    #[error("{kind} template {requested:?} is ambiguous: {candidates:?}")]
    AmbiguousTemplate {
        /// Which picker was searched
        kind: TemplateKind,
        /// Requested template name
        requested: String,
        /// Visible texts of every matching option
        candidates: Vec<String>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl RepoformError {
    /// Create a session error
    #[must_use]
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Check whether this error reports an element that is absent
    #[must_use]
    pub const fn is_element_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }
}
