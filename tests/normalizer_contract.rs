//! Contract tests for the response normalizer.
//!
//! - Item count and order are preserved for collections.
//! - Fetches always carry the single-document pagination block.
//! - `auth` and `query` links never reach the output, at the top level or
//!   one level down.
//! - `offset == (page - 1) * count` for collections.
//! - An empty collection omits `items` entirely.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use syndication_bridge::model::{ItemChildren, NormalizedEnvelope};
use syndication_bridge::normalizer::{normalize, normalize_method, NormalizeError, QueryKind};

const LINK_RELS: [&str; 5] = ["auth", "query", "self", "profile", "alternate"];

fn links_strategy() -> impl Strategy<Value = Map<String, Value>> {
    proptest::sample::subsequence(LINK_RELS.to_vec(), 0..=LINK_RELS.len()).prop_map(|rels| {
        rels.into_iter()
            .map(|rel| (rel.to_string(), json!([{ "href": format!("https://api.test/{rel}") }])))
            .collect()
    })
}

fn collection(items: Vec<Value>, page: u64, total_pages: u64, total: u64) -> Value {
    json!({
        "attributes": {},
        "links": {
            "auth": [{"href": "https://api.test/auth"}],
            "navigation": [{
                "rels": ["self"],
                "pagenum": page,
                "totalpages": total_pages,
                "totalitems": total
            }]
        },
        "items": items
    })
}

fn assert_no_reserved(links: &Map<String, Value>) {
    assert!(!links.contains_key("auth"), "auth leaked: {links:?}");
    assert!(!links.contains_key("query"), "query leaked: {links:?}");
}

fn only_item(envelope: &NormalizedEnvelope) -> &syndication_bridge::model::NormalizedItem {
    let items = envelope.items.as_ref().expect("fetch envelope has items");
    assert_eq!(items.len(), 1);
    &items[0]
}

proptest! {
    #[test]
    fn collection_keeps_count_and_order(
        links in proptest::collection::vec(links_strategy(), 0..25),
        page in 1u64..40,
    ) {
        let items: Vec<Value> = links
            .iter()
            .enumerate()
            .map(|(i, links)| json!({"attributes": {"guid": format!("g-{i}")}, "links": links}))
            .collect();
        let n = items.len();

        let envelope = normalize_method("queryDocs", Some(&collection(items, page, 40, 1000)))
            .unwrap()
            .unwrap();

        prop_assert_eq!(envelope.len(), n);
        let guids: Vec<String> = envelope
            .items
            .iter()
            .flatten()
            .map(|item| item.attributes["guid"].as_str().unwrap().to_string())
            .collect();
        let expected: Vec<String> = (0..n).map(|i| format!("g-{i}")).collect();
        prop_assert_eq!(guids, expected);
    }

    #[test]
    fn collection_offset_is_derived(count in 1usize..20, page in 1u64..500) {
        let items = (0..count).map(|i| json!({"attributes": {"n": i}})).collect();
        let envelope = normalize(QueryKind::Query, Some(&collection(items, page, 500, 10_000)))
            .unwrap()
            .unwrap();

        prop_assert_eq!(envelope.page, page);
        prop_assert_eq!(envelope.count, count as u64);
        prop_assert_eq!(envelope.offset, (page - 1) * count as u64);
    }

    #[test]
    fn reserved_links_never_leak(
        top in links_strategy(),
        nested in proptest::collection::vec(links_strategy(), 0..6),
    ) {
        let related: Vec<Value> = nested
            .iter()
            .map(|links| json!({"attributes": {}, "links": links, "items": []}))
            .collect();

        // Fetch: top level and related documents.
        let doc = json!({"attributes": {}, "links": top, "items": related.clone()});
        let envelope = normalize_method("fetchDoc", Some(&doc)).unwrap().unwrap();
        let item = only_item(&envelope);
        assert_no_reserved(&item.links);
        if let Some(ItemChildren::Related(children)) = &item.items {
            prop_assert_eq!(children.len(), nested.len());
            for child in children {
                assert_no_reserved(&child.links);
            }
        } else {
            prop_assert!(nested.is_empty());
        }

        // Query: every page item.
        let envelope = normalize_method("queryDocs", Some(&collection(related, 1, 1, 6)))
            .unwrap()
            .unwrap();
        for item in envelope.items.iter().flatten() {
            assert_no_reserved(&item.links);
        }
    }

    #[test]
    fn fetch_pagination_is_fixed(page in 0u64..100, total in 0u64..1000) {
        let doc = json!({
            "attributes": {"title": "A"},
            "links": {"navigation": [{"rels": ["self"], "pagenum": page, "totalitems": total}]},
        });
        let envelope = normalize_method("fetchDoc", Some(&doc)).unwrap().unwrap();
        prop_assert_eq!(
            (envelope.total, envelope.count, envelope.page, envelope.offset, envelope.total_pages),
            (1, 1, 1, 0, 1)
        );
    }
}

#[test]
fn fetch_concrete_case() {
    let input = json!({
        "attributes": {"title": "A"},
        "links": {"auth": "x", "self": "y"},
        "items": []
    });
    let envelope = normalize_method("fetchDoc", Some(&input)).unwrap();
    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({
            "total": 1, "count": 1, "page": 1, "offset": 0, "total_pages": 1,
            "items": [{"attributes": {"title": "A"}, "links": {"self": "y"}}]
        })
    );
}

#[test]
fn null_results_propagate() {
    assert_eq!(normalize_method("queryDocs", None).unwrap(), None);
    assert_eq!(normalize_method("queryDocs", Some(&Value::Null)).unwrap(), None);
    assert_eq!(normalize_method("fetchDoc", None).unwrap(), None);
}

#[test]
fn empty_collection_omits_items() {
    let envelope = normalize_method("queryDocs", Some(&collection(vec![], 1, 0, 0)))
        .unwrap()
        .unwrap();
    assert!(envelope.items.is_none());

    let body = serde_json::to_value(&envelope).unwrap();
    assert!(body.get("items").is_none());
    assert_eq!(body["total"], 0);
}

#[test]
fn fetch_nested_level_is_passed_through_raw() {
    let input = json!({
        "attributes": {"title": "Parent"},
        "links": {},
        "items": [{
            "attributes": {"title": "Child"},
            "links": {"query": [], "self": []},
            "items": [{"links": {"auth": [{"href": "deep"}]}}]
        }]
    });
    let body = serde_json::to_value(normalize_method("fetchDoc", Some(&input)).unwrap()).unwrap();
    let child = &body["items"][0]["items"][0];
    assert_eq!(child["links"], json!({"self": []}));
    // Below the first nested level documents are copied verbatim.
    assert_eq!(child["items"][0]["links"]["auth"][0]["href"], "deep");
}

#[test]
fn malformed_input_is_a_typed_error() {
    let err = normalize_method("fetchDoc", Some(&json!({"attributes": [1, 2]}))).unwrap_err();
    assert!(matches!(err, NormalizeError::Malformed { .. }));

    let err = normalize_method("queryDocs", Some(&json!({"items": [42]}))).unwrap_err();
    assert!(matches!(err, NormalizeError::Malformed { .. }));

    let err = normalize_method("queryDocs", Some(&collection(vec![json!({})], 0, 1, 1))).unwrap_err();
    assert!(matches!(err, NormalizeError::InvalidPagination(_)));

    let huge_page = collection(vec![json!({}), json!({})], u64::MAX, u64::MAX, 2);
    let err = normalize_method("queryDocs", Some(&huge_page)).unwrap_err();
    assert!(matches!(err, NormalizeError::InvalidPagination(_)));
}
