use serde_json::json;
use syndication_bridge::clients::{ContentApi, ContentError};
use syndication_bridge::model::{NewPost, PostId, PostStatus, UserId};
use syndication_bridge::store::ContentStore;

fn post(title: String) -> NewPost {
    NewPost {
        title,
        content: "body".to_string(),
        excerpt: String::new(),
        author: UserId(1),
        status: PostStatus::Publish,
        date: Some("2014-03-06 20:42:00".to_string()),
    }
}

/// Many handles inserting at once still get distinct, sequential ids.
#[tokio::test]
async fn test_concurrent_inserts_get_unique_ids() {
    let (store, content) = ContentStore::new(4, "https://cms.test/wp-admin");
    let store_task = tokio::spawn(store.run());

    let mut tasks = Vec::new();
    for i in 0..20 {
        let content = content.clone();
        tasks.push(tokio::spawn(async move {
            content
                .insert_post(post(format!("Post {i}")))
                .await
                .expect("Failed to insert post")
        }));
    }

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.expect("Insert task panicked"));
    }
    ids.sort();
    assert_eq!(ids, (1..=20).map(PostId).collect::<Vec<_>>());

    let last = content
        .get_post(PostId(20))
        .await
        .expect("Failed to get post")
        .expect("Post not found");
    assert_eq!(last.date.as_deref(), Some("2014-03-06 20:42:00"));

    // Dropping the last handle stops the store.
    drop(content);
    store_task.await.expect("Store task panicked");
}

#[tokio::test]
async fn test_seeded_options_are_visible() {
    let (store, content) = ContentStore::new(4, "https://cms.test/wp-admin");
    tokio::spawn(store.with_option("pmp_default_group", json!("g-0")).run());

    assert_eq!(
        content.get_option("pmp_default_group").await,
        Ok(Some(json!("g-0")))
    );
}

#[tokio::test]
async fn test_requests_after_shutdown_fail() {
    let (store, content) = ContentStore::new(4, "https://cms.test/wp-admin");
    let store_task = tokio::spawn(store.run());
    store_task.abort();
    let _ = store_task.await;

    let result = content.verify_nonce("pmp_ajax_nonce", "t").await;
    assert_eq!(result, Err(ContentError::StoreClosed));
}
