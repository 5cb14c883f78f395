//! # Mock Document API
//!
//! Expectation-driven stand-in for [`DocumentApi`], for testing handlers and
//! the [`DocumentService`](super::DocumentService) without a document store.
//!
//! Expectations are consumed in order. A call that does not match the next
//! expectation panics, and [`MockDocumentApi::verify`] panics if any are left.
//!
//! ```ignore
//! let mock = MockDocumentApi::new();
//! mock.expect_fetch("guid-1").return_ok(Some(doc_json));
//! mock.expect_save().return_ok_echo();
//!
//! let service = DocumentService::new(mock.api(), settings.api);
//! // ... exercise code ...
//! mock.verify();
//! ```

use super::document_api::{ApiError, DocumentApi};
use super::sdk_method::Resource;
use crate::model::{Document, QueryOptions};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

enum Expectation {
    Fetch {
        guid: String,
        response: Result<Option<Value>, ApiError>,
    },
    Query {
        resource: Option<Resource>,
        response: Result<Option<Value>, ApiError>,
    },
    Save {
        // `None` echoes the saved document back.
        response: Option<Result<Document, ApiError>>,
    },
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    saved: Vec<Document>,
    queried: Vec<QueryOptions>,
}

/// A mock [`DocumentApi`] with an expectation queue.
#[derive(Clone, Default)]
pub struct MockDocumentApi {
    state: Arc<Mutex<MockState>>,
}

impl MockDocumentApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// A shareable handle for code under test.
    pub fn api(&self) -> Arc<dyn DocumentApi> {
        Arc::new(self.clone())
    }

    /// Expects a `fetch` of `guid`.
    pub fn expect_fetch(&self, guid: impl Into<String>) -> FetchExpectationBuilder {
        FetchExpectationBuilder {
            guid: guid.into(),
            state: self.state.clone(),
        }
    }

    /// Expects a `query` of any resource.
    pub fn expect_query(&self) -> QueryExpectationBuilder {
        QueryExpectationBuilder {
            resource: None,
            state: self.state.clone(),
        }
    }

    /// Expects a `query` of a specific resource.
    pub fn expect_query_of(&self, resource: Resource) -> QueryExpectationBuilder {
        QueryExpectationBuilder {
            resource: Some(resource),
            state: self.state.clone(),
        }
    }

    /// Expects a `save`.
    pub fn expect_save(&self) -> SaveExpectationBuilder {
        SaveExpectationBuilder {
            state: self.state.clone(),
        }
    }

    /// Documents passed to `save`, in call order.
    pub fn saved(&self) -> Vec<Document> {
        lock(&self.state).saved.clone()
    }

    /// Options passed to `query`, in call order.
    pub fn queried(&self) -> Vec<QueryOptions> {
        lock(&self.state).queried.clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = lock(&self.state).expectations.len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }

    fn next(&self) -> Option<Expectation> {
        lock(&self.state).expectations.pop_front()
    }
}

#[async_trait]
impl DocumentApi for MockDocumentApi {
    async fn fetch(
        &self,
        _resource: Resource,
        guid: &str,
        _options: &QueryOptions,
    ) -> Result<Option<Value>, ApiError> {
        match self.next() {
            Some(Expectation::Fetch {
                guid: expected,
                response,
            }) => {
                assert_eq!(expected, guid, "fetch called with unexpected guid");
                response
            }
            _ => panic!("Unexpected fetch({guid}) or expectation mismatch"),
        }
    }

    async fn query(
        &self,
        resource: Resource,
        options: &QueryOptions,
    ) -> Result<Option<Value>, ApiError> {
        lock(&self.state).queried.push(options.clone());
        match self.next() {
            Some(Expectation::Query {
                resource: expected,
                response,
            }) => {
                if let Some(expected) = expected {
                    assert_eq!(expected, resource, "query called for unexpected resource");
                }
                response
            }
            _ => panic!("Unexpected query({resource:?}) or expectation mismatch"),
        }
    }

    async fn save(&self, document: &Document) -> Result<Document, ApiError> {
        lock(&self.state).saved.push(document.clone());
        match self.next() {
            Some(Expectation::Save { response }) => {
                response.unwrap_or_else(|| Ok(document.clone()))
            }
            _ => panic!("Unexpected save or expectation mismatch"),
        }
    }
}

fn lock(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(|err| err.into_inner())
}

/// Builder for `fetch` expectations.
pub struct FetchExpectationBuilder {
    guid: String,
    state: Arc<Mutex<MockState>>,
}

impl FetchExpectationBuilder {
    pub fn return_ok(self, value: Option<Value>) {
        lock(&self.state).expectations.push_back(Expectation::Fetch {
            guid: self.guid,
            response: Ok(value),
        });
    }

    pub fn return_err(self, error: ApiError) {
        lock(&self.state).expectations.push_back(Expectation::Fetch {
            guid: self.guid,
            response: Err(error),
        });
    }
}

/// Builder for `query` expectations.
pub struct QueryExpectationBuilder {
    resource: Option<Resource>,
    state: Arc<Mutex<MockState>>,
}

impl QueryExpectationBuilder {
    pub fn return_ok(self, value: Option<Value>) {
        lock(&self.state).expectations.push_back(Expectation::Query {
            resource: self.resource,
            response: Ok(value),
        });
    }

    pub fn return_err(self, error: ApiError) {
        lock(&self.state).expectations.push_back(Expectation::Query {
            resource: self.resource,
            response: Err(error),
        });
    }
}

/// Builder for `save` expectations.
pub struct SaveExpectationBuilder {
    state: Arc<Mutex<MockState>>,
}

impl SaveExpectationBuilder {
    /// Returns the document that was passed in.
    pub fn return_ok_echo(self) {
        lock(&self.state)
            .expectations
            .push_back(Expectation::Save { response: None });
    }

    pub fn return_err(self, error: ApiError) {
        lock(&self.state).expectations.push_back(Expectation::Save {
            response: Some(Err(error)),
        });
    }
}
