//! Error types for roster-core

use thiserror::Error;

use crate::models::EditCategory;

/// Result type alias using roster-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in roster-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Local pre-network validation failure; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The actor lacks permission for the attempted update category
    #[error("Not authorized for {category} updates")]
    Authorization {
        /// Update category the actor was denied for
        category: EditCategory,
    },

    /// Remote failure for any reason other than authorization
    #[error("Transport error: {0}")]
    Transport(String),

    /// HTTP error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No roster session has been loaded yet
    #[error("No roster session loaded")]
    NoSession,
}

impl Error {
    /// True when the error means the actor was denied, as opposed to a
    /// transport-level failure.
    pub const fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization { .. })
    }
}
