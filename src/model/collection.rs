//! Paginated query results.

use super::document::Document;
use crate::normalizer::NormalizeError;
use serde::Serialize;
use serde_json::Value;

/// Pagination metadata of one result page.
///
/// `offset` is never stored; see [`Pagination::offset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total_items: u64,
    /// Number of items on this page.
    pub count: u64,
    pub page_num: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// `(page_num - 1) * count`, or `None` when that overflows. Page
    /// numbers start at 1.
    pub fn checked_offset(&self) -> Option<u64> {
        self.page_num.saturating_sub(1).checked_mul(self.count)
    }

    /// `(page_num - 1) * count`. Pages built by
    /// [`CollectionResult::from_document`] never overflow here.
    pub fn offset(&self) -> u64 {
        self.checked_offset().unwrap_or(u64::MAX)
    }
}

/// One page of documents plus its pagination block.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionResult {
    pub documents: Vec<Document>,
    pub pagination: Pagination,
}

impl CollectionResult {
    /// Builds a page from a raw collection document.
    ///
    /// Pagination is read from the `navigation` link whose `rels` include
    /// `"self"`. Without one, the page is assumed to be the only page.
    pub fn from_document(doc: &Document) -> Result<Self, NormalizeError> {
        let documents = doc
            .related()
            .map_err(|source| NormalizeError::malformed("collection item", source))?;
        let count = documents.len() as u64;

        let pagination = match self_navigation(doc) {
            Some(nav) => Pagination {
                total_items: nav_number(nav, "totalitems")?.unwrap_or(count),
                count,
                page_num: nav_number(nav, "pagenum")?.unwrap_or(1),
                total_pages: nav_number(nav, "totalpages")?.unwrap_or(1),
            },
            None => Pagination {
                total_items: count,
                count,
                page_num: 1,
                total_pages: 1,
            },
        };

        if pagination.page_num == 0 {
            return Err(NormalizeError::InvalidPagination(
                "pagenum must be at least 1".to_string(),
            ));
        }
        if pagination.checked_offset().is_none() {
            return Err(NormalizeError::InvalidPagination(format!(
                "offset of page {} with {} items overflows",
                pagination.page_num, pagination.count
            )));
        }

        Ok(Self {
            documents,
            pagination,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn self_navigation(doc: &Document) -> Option<&Value> {
    doc.links
        .get("navigation")?
        .as_array()?
        .iter()
        .find(|link| {
            link.get("rels")
                .and_then(Value::as_array)
                .is_some_and(|rels| rels.iter().any(|rel| rel == "self"))
        })
}

fn nav_number(nav: &Value, field: &str) -> Result<Option<u64>, NormalizeError> {
    match nav.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            NormalizeError::InvalidPagination(format!(
                "navigation field `{field}` is not a non-negative integer: {value}"
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collection(value: Value) -> Result<CollectionResult, NormalizeError> {
        CollectionResult::from_document(&Document::from_value(&value).unwrap())
    }

    #[test]
    fn reads_self_navigation() {
        let page = collection(json!({
            "links": {
                "navigation": [
                    {"rels": ["next"], "pagenum": 3},
                    {"rels": ["self"], "totalitems": 25, "totalpages": 3, "pagenum": 2}
                ]
            },
            "items": (0..10).map(|i| json!({"attributes": {"guid": i.to_string()}})).collect::<Vec<_>>()
        }))
        .unwrap();

        assert_eq!(
            page.pagination,
            Pagination {
                total_items: 25,
                count: 10,
                page_num: 2,
                total_pages: 3
            }
        );
        assert_eq!(page.pagination.offset(), 10);
    }

    #[test]
    fn missing_navigation_means_single_page() {
        let page = collection(json!({"items": [{"attributes": {}}, {"attributes": {}}]})).unwrap();
        assert_eq!(page.pagination.total_items, 2);
        assert_eq!(page.pagination.page_num, 1);
        assert_eq!(page.pagination.total_pages, 1);
        assert_eq!(page.pagination.offset(), 0);
    }

    #[test]
    fn rejects_non_numeric_navigation() {
        let err = collection(json!({
            "links": {"navigation": [{"rels": ["self"], "totalitems": "many"}]},
            "items": []
        }))
        .unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidPagination(_)));
    }

    #[test]
    fn rejects_page_zero() {
        let err = collection(json!({
            "links": {"navigation": [{"rels": ["self"], "pagenum": 0}]}
        }))
        .unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidPagination(_)));
    }

    #[test]
    fn rejects_overflowing_offset() {
        let err = collection(json!({
            "links": {"navigation": [{"rels": ["self"], "pagenum": u64::MAX, "totalitems": 2}]},
            "items": [{"attributes": {}}, {"attributes": {}}]
        }))
        .unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidPagination(_)));

        // A single item per page keeps the largest page number usable.
        let page = collection(json!({
            "links": {"navigation": [{"rels": ["self"], "pagenum": u64::MAX}]},
            "items": [{"attributes": {}}]
        }))
        .unwrap();
        assert_eq!(page.pagination.offset(), u64::MAX - 1);
    }
}
