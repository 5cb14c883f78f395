//! Client-facing shapes produced by the normalizer.

use super::collection::Pagination;
use serde::Serialize;
use serde_json::{Map, Value};

/// Uniform result block handed to the front end, for fetches and queries alike.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedEnvelope {
    pub total: u64,
    pub count: u64,
    pub page: u64,
    pub offset: u64,
    pub total_pages: u64,
    /// Omitted entirely (not `[]`) when the page holds no documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<NormalizedItem>>,
}

impl NormalizedEnvelope {
    /// Pagination block used for every single-document fetch.
    pub const SINGLE: Pagination = Pagination {
        total_items: 1,
        count: 1,
        page_num: 1,
        total_pages: 1,
    };

    pub fn new(pagination: Pagination, items: Option<Vec<NormalizedItem>>) -> Self {
        Self {
            total: pagination.total_items,
            count: pagination.count,
            page: pagination.page_num,
            offset: pagination.offset(),
            total_pages: pagination.total_pages,
            items,
        }
    }

    /// Number of emitted items; `0` when `items` is absent.
    pub fn len(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One document as the client sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedItem {
    pub attributes: Map<String, Value>,
    pub links: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemChildren>,
}

/// Nested content under a [`NormalizedItem`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ItemChildren {
    /// Related documents of a single fetch, with their links filtered.
    Related(Vec<NormalizedItem>),
    /// Nested documents passed through untouched.
    Raw(Vec<Value>),
}
