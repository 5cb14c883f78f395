//! Handlers against an expectation-driven API, so the exact calls the
//! handlers make (and how they react to API failures) can be checked.

use serde_json::json;
use std::sync::Arc;
use syndication_bridge::clients::{ApiError, DocumentService, MockDocumentApi, Resource};
use syndication_bridge::config::Settings;
use syndication_bridge::handlers::{AjaxRequest, Handlers};
use syndication_bridge::model::UserId;
use syndication_bridge::store::ContentStore;

const TOKEN: &str = "nonce";

fn handlers(mock: &MockDocumentApi) -> Handlers {
    let settings = Settings::defaults();
    let (store, content) = ContentStore::new(8, settings.cms.admin_url.clone());
    tokio::spawn(
        store
            .with_nonce(settings.ajax.nonce_action.clone(), TOKEN)
            .with_user(UserId(1), ["edit_posts"])
            .run(),
    );
    let service = DocumentService::new(mock.api(), settings.api.clone());
    Handlers::new(service, Arc::new(content), settings)
}

fn request() -> AjaxRequest {
    AjaxRequest::new(UserId(1)).with_field("security", TOKEN)
}

#[tokio::test]
async fn test_search_merges_query_over_defaults() {
    let mock = MockDocumentApi::new();
    mock.expect_query_of(Resource::Doc).return_ok(Some(json!({
        "links": {"navigation": [{"rels": ["self"], "totalitems": 30, "pagenum": 3, "totalpages": 6}]},
        "items": [{"attributes": {"title": "one"}}, {"attributes": {"title": "two"}}]
    })));

    let handlers = handlers(&mock);
    let response = handlers
        .dispatch(
            "pmp_search",
            &request().with_field("query", json!({"limit": 5, "text": "x"}).to_string()),
        )
        .await;

    assert_eq!(response.status, 200);
    let data = &response.body["data"];
    assert_eq!(data["total"], 30);
    assert_eq!(data["page"], 3);
    assert_eq!(data["count"], 2);
    assert_eq!(data["offset"], 4);

    let queried = mock.queried();
    assert_eq!(queried.len(), 1);
    assert_eq!(queried[0]["profile"], "story");
    assert_eq!(queried[0]["limit"], 5);
    assert_eq!(queried[0]["text"], "x");
    mock.verify();
}

#[tokio::test]
async fn test_search_by_guid_fetches() {
    let mock = MockDocumentApi::new();
    mock.expect_fetch("abc").return_ok(Some(json!({
        "attributes": {"title": "A"},
        "links": {"auth": "x", "self": "y"},
        "items": []
    })));

    let response = handlers(&mock)
        .dispatch(
            "pmp_search",
            &request().with_field("query", json!({"guid": "abc"}).to_string()),
        )
        .await;

    assert_eq!(
        response.body,
        json!({
            "success": true,
            "data": {
                "total": 1, "count": 1, "page": 1, "offset": 0, "total_pages": 1,
                "items": [{"attributes": {"title": "A"}, "links": {"self": "y"}}]
            }
        })
    );
    mock.verify();
}

#[tokio::test]
async fn test_search_rejects_non_object_query() {
    let mock = MockDocumentApi::new();
    let response = handlers(&mock)
        .dispatch("pmp_search", &request().with_field("query", "[1, 2]"))
        .await;
    assert_eq!(response.status, 400);
    mock.verify();
}

#[tokio::test]
async fn test_api_failures_are_bad_gateway() {
    let mock = MockDocumentApi::new();
    mock.expect_query()
        .return_err(ApiError::Transport("connection reset".into()));
    mock.expect_query()
        .return_ok(Some(json!({"items": [17]})));

    let handlers = handlers(&mock);
    let response = handlers.dispatch("pmp_search", &request()).await;
    assert_eq!(response.status, 502);
    assert_eq!(response.body["success"], false);

    // Unparseable collection items.
    let response = handlers.dispatch("pmp_search", &request()).await;
    assert_eq!(response.status, 502);
    mock.verify();
}

#[tokio::test]
async fn test_create_group_saves_new_doc() {
    let mock = MockDocumentApi::new();
    mock.expect_save().return_ok_echo();

    let group = json!({"attributes": {"title": "Desk"}}).to_string();
    let response = handlers(&mock)
        .dispatch("pmp_create_group", &request().with_field("group", group))
        .await;
    assert_eq!(response.body, json!({"success": true}));

    let saved = mock.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].attribute_str("title"), Some("Desk"));
    assert!(saved[0].guid().is_some_and(|guid| !guid.is_empty()));
    assert_eq!(
        saved[0].links["profile"][0]["href"],
        "https://api.pmp.io/profiles/group"
    );
    mock.verify();
}

#[tokio::test]
async fn test_create_group_reports_save_failure() {
    let mock = MockDocumentApi::new();
    mock.expect_save()
        .return_err(ApiError::Rejected("read-only credentials".into()));

    let group = json!({"attributes": {"title": "Desk"}}).to_string();
    let response = handlers(&mock)
        .dispatch("pmp_create_group", &request().with_field("group", group))
        .await;
    assert_eq!(response.status, 502);
    mock.verify();
}

#[tokio::test]
async fn test_modify_group_merges_attributes() {
    let mock = MockDocumentApi::new();
    mock.expect_fetch("g-1").return_ok(Some(json!({
        "attributes": {"guid": "g-1", "title": "Old", "description": "kept"},
        "links": {"query": [{"href": "q"}], "profile": [{"href": "p"}]}
    })));
    mock.expect_save().return_ok_echo();

    let group = json!({"attributes": {"guid": "g-1", "title": "New"}}).to_string();
    let response = handlers(&mock)
        .dispatch("pmp_modify_group", &request().with_field("group", group))
        .await;
    assert_eq!(response.status, 200);

    let saved = mock.saved();
    assert_eq!(
        serde_json::Value::Object(saved[0].attributes.clone()),
        json!({"guid": "g-1", "title": "New", "description": "kept"})
    );
    assert!(!saved[0].links.contains_key("query"));
    assert!(saved[0].links.contains_key("profile"));
    mock.verify();
}
