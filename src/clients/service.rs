use super::document_api::{ApiError, DocumentApi};
use super::sdk_method::SdkMethod;
use crate::config::ApiSettings;
use crate::model::{Document, NormalizedEnvelope, QueryOptions};
use crate::normalizer::{self, NormalizeError};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Errors from [`DocumentService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Wraps a [`DocumentApi`] with the conveniences the handlers need.
///
/// Cheap to clone; the API is shared.
#[derive(Clone)]
pub struct DocumentService {
    api: Arc<dyn DocumentApi>,
    settings: ApiSettings,
}

impl DocumentService {
    pub fn new(api: Arc<dyn DocumentApi>, settings: ApiSettings) -> Self {
        Self { api, settings }
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// Runs an SDK call and reshapes the answer for the client.
    ///
    /// `Ok(None)` means the API returned nothing.
    #[instrument(skip(self, method, options), fields(%method))]
    pub async fn query_json(
        &self,
        method: SdkMethod,
        guid: Option<&str>,
        options: &QueryOptions,
    ) -> Result<Option<NormalizedEnvelope>, ServiceError> {
        debug!(?options, "query_json called");
        let raw = self.api.call(method, guid, options).await?;
        let envelope = normalizer::normalize(method.kind(), raw.as_ref())?;
        match &envelope {
            Some(env) => info!(total = env.total, items = env.len(), "Query ok"),
            None => info!("Query returned nothing"),
        }
        Ok(envelope)
    }

    /// Fetches one document by guid and parses it.
    #[instrument(skip(self))]
    pub async fn fetch_document(&self, guid: &str) -> Result<Option<Document>, ServiceError> {
        let raw = self
            .api
            .call(SdkMethod::FETCH_DOC, Some(guid), &QueryOptions::new())
            .await?;
        raw.as_ref()
            .filter(|value| !value.is_null())
            .map(Document::from_value)
            .transpose()
            .map_err(|source| NormalizeError::malformed("document", source).into())
    }

    /// Prepares a new document of `profile` from client-provided fields.
    ///
    /// A guid is generated when the source has none, and the profile link is
    /// pointed at the configured API.
    pub fn new_doc(&self, profile: &str, source: Document) -> Document {
        let mut doc = source;
        if doc.guid().map_or(true, str::is_empty) {
            doc.attributes.insert(
                "guid".to_string(),
                Value::String(uuid::Uuid::new_v4().to_string()),
            );
        }
        doc.links.insert(
            "profile".to_string(),
            json!([{ "href": self.settings.profile_href(profile) }]),
        );
        doc
    }

    #[instrument(skip(self, doc), fields(guid = doc.guid().unwrap_or_default()))]
    pub async fn save(&self, doc: &Document) -> Result<Document, ServiceError> {
        let saved = self.api.save(doc).await?;
        info!("Saved document");
        Ok(saved)
    }
}
