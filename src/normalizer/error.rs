//! Error types for response normalization.

use thiserror::Error;

/// Raised when an SDK result does not have the shape the normalizer expects.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A document or collection failed to parse.
    #[error("malformed {what}: {source}")]
    Malformed {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Pagination metadata is present but unusable.
    #[error("invalid pagination: {0}")]
    InvalidPagination(String),
}

impl NormalizeError {
    pub fn malformed(what: &'static str, source: serde_json::Error) -> Self {
        NormalizeError::Malformed { what, source }
    }
}
