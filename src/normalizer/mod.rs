//! # Response Normalizer
//!
//! Turns the two result shapes of the syndication API into one
//! [`NormalizedEnvelope`] for the front end:
//!
//! - **Fetch** (a single document): pagination is always `1/1/1/0/1`, and the
//!   envelope holds exactly one item. Related documents become one nested
//!   level with filtered links; anything below that is passed through raw.
//! - **Query** (a paginated collection): pagination comes from the
//!   collection, and each document becomes one item in server order. An
//!   empty page leaves `items` out of the envelope.
//!
//! The reserved relations `auth` and `query` are stripped from every `links`
//! object the normalizer emits.
//!
//! Everything here is a pure function over already-fetched data.

mod error;

pub use error::*;

use crate::model::{
    CollectionResult, Document, ItemChildren, NormalizedEnvelope, NormalizedItem,
};
use serde_json::Value;
use tracing::trace;

/// Which result shape a call produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// A single document.
    Fetch,
    /// A paginated collection.
    Query,
}

impl QueryKind {
    /// `fetch*` names are single-document fetches; everything else is a query.
    pub fn from_method(name: &str) -> Self {
        if name.starts_with("fetch") {
            QueryKind::Fetch
        } else {
            QueryKind::Query
        }
    }
}

/// Normalizes a raw SDK result.
///
/// `None` and JSON `null` come back as `Ok(None)` so callers can map "no
/// result" to their own not-found response.
pub fn normalize(
    kind: QueryKind,
    result: Option<&Value>,
) -> Result<Option<NormalizedEnvelope>, NormalizeError> {
    let Some(raw) = result.filter(|value| !value.is_null()) else {
        return Ok(None);
    };

    let envelope = match kind {
        QueryKind::Fetch => {
            let doc = Document::from_value(raw)
                .map_err(|source| NormalizeError::malformed("document", source))?;
            normalize_document(&doc)?
        }
        QueryKind::Query => {
            let doc = Document::from_value(raw)
                .map_err(|source| NormalizeError::malformed("collection", source))?;
            normalize_collection(&CollectionResult::from_document(&doc)?)
        }
    };
    Ok(Some(envelope))
}

/// [`normalize`] with the kind derived from an SDK method name.
pub fn normalize_method(
    method: &str,
    result: Option<&Value>,
) -> Result<Option<NormalizedEnvelope>, NormalizeError> {
    normalize(QueryKind::from_method(method), result)
}

/// Single-document branch.
pub fn normalize_document(doc: &Document) -> Result<NormalizedEnvelope, NormalizeError> {
    let related = doc
        .related()
        .map_err(|source| NormalizeError::malformed("related document", source))?;
    trace!(related = related.len(), "normalizing fetched document");

    let children = if related.is_empty() {
        None
    } else {
        Some(ItemChildren::Related(
            related.iter().map(passthrough_item).collect(),
        ))
    };

    let item = NormalizedItem {
        attributes: doc.attributes.clone(),
        links: doc.client_links(),
        items: children,
    };

    Ok(NormalizedEnvelope::new(
        NormalizedEnvelope::SINGLE,
        Some(vec![item]),
    ))
}

/// Collection branch.
pub fn normalize_collection(page: &CollectionResult) -> NormalizedEnvelope {
    trace!(count = page.documents.len(), "normalizing collection page");
    let items = if page.is_empty() {
        None
    } else {
        Some(page.documents.iter().map(passthrough_item).collect())
    };
    NormalizedEnvelope::new(page.pagination, items)
}

// Filters links only; nested items and attributes are copied as-is.
fn passthrough_item(doc: &Document) -> NormalizedItem {
    NormalizedItem {
        attributes: doc.attributes.clone(),
        links: doc.client_links(),
        items: Some(ItemChildren::Raw(doc.items.clone())),
    }
}
