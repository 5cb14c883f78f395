//! In-memory [`DocumentApi`] backed by a map of documents.
//!
//! Answers look like the real API's: fetched documents and query pages carry
//! `auth` and `query` link relations, and query pages describe themselves
//! with a `navigation` link. Used by the demo binary and integration tests.

use super::document_api::{ApiError, DocumentApi};
use super::sdk_method::Resource;
use crate::model::{Document, QueryOptions};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{debug, info};

const DEFAULT_LIMIT: u64 = 10;

pub struct DocumentLibrary {
    base_url: String,
    // Keyed by guid; insertion order is kept separately for stable paging.
    docs: Mutex<Library>,
}

#[derive(Default)]
struct Library {
    by_guid: BTreeMap<String, Document>,
    order: Vec<String>,
}

impl DocumentLibrary {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            docs: Mutex::new(Library::default()),
        }
    }

    /// Adds or replaces a document. Fails for documents without a guid.
    pub fn insert(&self, doc: Document) -> Result<(), ApiError> {
        let guid = doc
            .guid()
            .filter(|guid| !guid.is_empty())
            .ok_or_else(|| ApiError::Rejected("document has no guid".to_string()))?
            .to_string();
        let mut library = self.lock()?;
        if !library.by_guid.contains_key(&guid) {
            library.order.push(guid.clone());
        }
        library.by_guid.insert(guid, doc);
        Ok(())
    }

    /// Stored copy of a document, without the link decorations added to
    /// API responses.
    pub fn get(&self, guid: &str) -> Result<Option<Document>, ApiError> {
        Ok(self.lock()?.by_guid.get(guid).cloned())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|library| library.order.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Library>, ApiError> {
        self.docs
            .lock()
            .map_err(|_| ApiError::Transport("document library lock poisoned".to_string()))
    }

    fn decorate(&self, links: &mut serde_json::Map<String, Value>) {
        links.insert(
            "auth".to_string(),
            json!([{"href": format!("{}/auth/access_token", self.base_url)}]),
        );
        links.insert(
            "query".to_string(),
            json!([{"href": format!("{}/docs{{?guid,profile,limit,offset,text}}", self.base_url)}]),
        );
    }
}

/// Profile name from a document's `profile` link (`.../profiles/<name>`).
fn profile_of(doc: &Document) -> Option<&str> {
    doc.links
        .get("profile")?
        .get(0)?
        .get("href")?
        .as_str()?
        .rsplit('/')
        .next()
}

fn option_u64(options: &QueryOptions, key: &str, default: u64) -> Result<u64, ApiError> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| ApiError::Rejected(format!("`{key}` must be a non-negative integer"))),
        Some(Value::String(s)) => s
            .parse()
            .map_err(|_| ApiError::Rejected(format!("`{key}` must be a non-negative integer"))),
        Some(other) => Err(ApiError::Rejected(format!("invalid `{key}`: {other}"))),
    }
}

fn selects(doc: &Document, resource: Resource, options: &QueryOptions) -> bool {
    let wanted_profile = resource
        .profile()
        .or_else(|| options.get("profile").and_then(Value::as_str));
    if let Some(wanted) = wanted_profile {
        if profile_of(doc) != Some(wanted) {
            return false;
        }
    }
    if let Some(text) = options.get("text").and_then(Value::as_str) {
        let needle = text.to_lowercase();
        let title = doc.attribute_str("title").unwrap_or_default().to_lowercase();
        if !title.contains(&needle) {
            return false;
        }
    }
    true
}

#[async_trait]
impl DocumentApi for DocumentLibrary {
    async fn fetch(
        &self,
        _resource: Resource,
        guid: &str,
        _options: &QueryOptions,
    ) -> Result<Option<Value>, ApiError> {
        let Some(mut doc) = self.get(guid)? else {
            debug!(guid, "Fetch miss");
            return Ok(None);
        };
        doc.href = Some(format!("{}/docs/{guid}", self.base_url));
        self.decorate(&mut doc.links);
        debug!(guid, "Fetch hit");
        Ok(Some(serde_json::to_value(doc)?))
    }

    async fn query(
        &self,
        resource: Resource,
        options: &QueryOptions,
    ) -> Result<Option<Value>, ApiError> {
        let limit = option_u64(options, "limit", DEFAULT_LIMIT)?.max(1);
        let offset = option_u64(options, "offset", 0)?;

        let matching: Vec<Document> = {
            let library = self.lock()?;
            library
                .order
                .iter()
                .filter_map(|guid| library.by_guid.get(guid))
                .filter(|doc| selects(doc, resource, options))
                .cloned()
                .collect()
        };

        let total = matching.len() as u64;
        debug!(?resource, total, limit, offset, "Query");
        if total == 0 {
            return Ok(None);
        }

        let page: Vec<Value> = matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?;

        let mut links = serde_json::Map::new();
        links.insert(
            "navigation".to_string(),
            json!([{
                "href": format!("{}/docs?limit={limit}&offset={offset}", self.base_url),
                "rels": ["self"],
                "totalitems": total,
                "totalpages": total.div_ceil(limit),
                "pagenum": offset / limit + 1
            }]),
        );
        self.decorate(&mut links);

        Ok(Some(json!({
            "version": "1.0",
            "href": format!("{}/docs", self.base_url),
            "attributes": {},
            "links": links,
            "items": page
        })))
    }

    async fn save(&self, document: &Document) -> Result<Document, ApiError> {
        let mut saved = document.clone();
        let guid = saved
            .guid()
            .filter(|guid| !guid.is_empty())
            .ok_or_else(|| ApiError::Rejected("document has no guid".to_string()))?
            .to_string();
        saved.href = Some(format!("{}/docs/{guid}", self.base_url));
        // Reserved relations are response decorations, never stored.
        saved.links.remove("auth");
        saved.links.remove("query");
        self.insert(saved.clone())?;
        info!(guid = %guid, size = self.len(), "Saved");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(guid: &str, title: &str) -> Document {
        Document::from_value(&json!({
            "attributes": {"guid": guid, "title": title},
            "links": {"profile": [{"href": "https://api.test/profiles/story"}]}
        }))
        .unwrap()
    }

    fn library() -> DocumentLibrary {
        let library = DocumentLibrary::new("https://api.test/");
        for i in 1..=5 {
            library.insert(story(&format!("s-{i}"), &format!("Story {i}"))).unwrap();
        }
        library
    }

    #[tokio::test]
    async fn fetch_decorates_links() {
        let doc = library()
            .fetch(Resource::Doc, "s-2", &QueryOptions::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["attributes"]["title"], "Story 2");
        assert!(doc["links"]["auth"].is_array());
        assert!(doc["links"]["query"].is_array());
        assert_eq!(doc["href"], "https://api.test/docs/s-2");
    }

    #[tokio::test]
    async fn fetch_miss_is_none() {
        let found = library()
            .fetch(Resource::Doc, "nope", &QueryOptions::new())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn query_pages_in_insertion_order() {
        let mut options = QueryOptions::new();
        options.insert("limit".into(), json!(2));
        options.insert("offset".into(), json!(2));
        let page = library().query(Resource::Doc, &options).await.unwrap().unwrap();

        let nav = &page["links"]["navigation"][0];
        assert_eq!(nav["totalitems"], 5);
        assert_eq!(nav["totalpages"], 3);
        assert_eq!(nav["pagenum"], 2);
        let guids: Vec<_> = page["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["attributes"]["guid"].as_str().unwrap())
            .collect();
        assert_eq!(guids, vec!["s-3", "s-4"]);
    }

    #[tokio::test]
    async fn query_filters_by_profile_and_text() {
        let library = library();
        let mut options = QueryOptions::new();
        options.insert("text".into(), json!("story 4"));
        let page = library.query(Resource::Doc, &options).await.unwrap().unwrap();
        assert_eq!(page["items"].as_array().unwrap().len(), 1);

        assert!(library
            .query(Resource::Group, &QueryOptions::new())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn save_requires_guid_and_strips_reserved_links() {
        let library = library();
        assert!(library.save(&Document::default()).await.is_err());

        let mut doc = story("s-9", "Saved");
        doc.links.insert("auth".into(), json!([]));
        let saved = library.save(&doc).await.unwrap();
        assert!(!saved.links.contains_key("auth"));
        assert_eq!(library.len(), 6);
        assert_eq!(saved.href.as_deref(), Some("https://api.test/docs/s-9"));
    }

    #[tokio::test]
    async fn rejects_bad_limit() {
        let mut options = QueryOptions::new();
        options.insert("limit".into(), json!("ten"));
        let err = library().query(Resource::Doc, &options).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(_)));
    }
}
