//! Boundary to the remote syndication API.

use super::sdk_method::{Resource, SdkMethod};
use crate::model::{Document, QueryOptions};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors reported by a [`DocumentApi`] implementation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The name does not match any SDK entry point.
    #[error("Unknown SDK method: {0}")]
    UnknownMethod(String),

    /// The target document does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The API could not be reached or answered garbage.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The API refused the request.
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<String> for ApiError {
    fn from(msg: String) -> Self {
        ApiError::Transport(msg)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}

/// The syndication API as seen by the bridge.
///
/// `fetch` and `query` return the raw JSON of the response. `Ok(None)` means
/// the API had nothing to return; it is not an error.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    async fn fetch(
        &self,
        resource: Resource,
        guid: &str,
        options: &QueryOptions,
    ) -> Result<Option<Value>, ApiError>;

    async fn query(
        &self,
        resource: Resource,
        options: &QueryOptions,
    ) -> Result<Option<Value>, ApiError>;

    /// Creates or replaces a document, keyed by its `guid` attribute.
    async fn save(&self, document: &Document) -> Result<Document, ApiError>;

    /// Runs a parsed SDK method. Fetches require a guid.
    #[tracing::instrument(skip(self, options))]
    async fn call(
        &self,
        method: SdkMethod,
        guid: Option<&str>,
        options: &QueryOptions,
    ) -> Result<Option<Value>, ApiError> {
        tracing::debug!("Sending request");
        match method {
            SdkMethod::Fetch(resource) => {
                let guid = guid.ok_or_else(|| {
                    ApiError::Rejected(format!("{method} requires a guid"))
                })?;
                self.fetch(resource, guid, options).await
            }
            SdkMethod::Query(resource) => self.query(resource, options).await,
        }
    }
}
