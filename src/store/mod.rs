//! # In-Memory Content Store
//!
//! A [`ContentApi`](crate::clients::ContentApi) implementation that keeps
//! posts, post meta and options in a single actor task. Used by the demo
//! binary and the handler tests in place of a real CMS.
//!
//! ```ignore
//! let (store, content) = ContentStore::new(32, "https://cms.test/wp-admin")
//!     .with_nonce("pmp_ajax_nonce", "token")
//!     .with_user(UserId(1), ["edit_posts"]);
//! tokio::spawn(store.run());
//! let id = content.insert_post(new_post).await?;
//! ```

pub mod actor;
pub mod handle;

pub use actor::{ContentRequest, ContentStore};
pub use handle::ContentHandle;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{ContentApi, ContentError};
    use crate::model::{NewPost, PostId, PostStatus, PostType, PostUpdate, UserId};
    use serde_json::json;

    fn draft(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: String::new(),
            excerpt: String::new(),
            author: UserId(1),
            status: PostStatus::Draft,
            date: None,
        }
    }

    fn spawn_store() -> ContentHandle {
        let (store, handle) = ContentStore::new(8, "https://cms.test/wp-admin/");
        let store = store
            .with_nonce("pmp_ajax_nonce", "abc")
            .with_user(UserId(1), ["edit_posts", "manage_options"]);
        tokio::spawn(store.run());
        handle
    }

    #[tokio::test]
    async fn test_nonce_and_capabilities() {
        let content = spawn_store();
        assert!(content.verify_nonce("pmp_ajax_nonce", "abc").await.unwrap());
        assert!(!content.verify_nonce("pmp_ajax_nonce", "xyz").await.unwrap());
        assert!(!content.verify_nonce("other", "abc").await.unwrap());

        assert!(content.user_can(UserId(1), "edit_posts").await.unwrap());
        assert!(!content.user_can(UserId(1), "delete_site").await.unwrap());
        assert!(!content.user_can(UserId(2), "edit_posts").await.unwrap());
    }

    #[tokio::test]
    async fn test_post_lifecycle() {
        let content = spawn_store();
        let id = content.insert_post(draft("Hello")).await.unwrap();
        assert_eq!(id, PostId(1));

        content
            .update_post(
                id,
                PostUpdate {
                    excerpt: Some("Short".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let post = content.get_post(id).await.unwrap().unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.excerpt, "Short");
        assert_eq!(post.author, Some(UserId(1)));

        content
            .update_post_meta(id, "pmp_guid", json!("g-1"))
            .await
            .unwrap();
        assert_eq!(
            content.post_meta(id, "pmp_guid").await.unwrap(),
            Some(json!("g-1"))
        );
        assert_eq!(content.post_meta(id, "missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_post_is_rejected() {
        let content = spawn_store();
        let err = content.insert_post(draft("  ")).await.unwrap_err();
        assert_eq!(err, ContentError::EmptyContent);
        assert_eq!(err.to_string(), "Content, title, and excerpt are empty.");
    }

    #[tokio::test]
    async fn test_missing_post_errors() {
        let content = spawn_store();
        let missing = PostId(42);
        assert_eq!(
            content.update_post(missing, PostUpdate::default()).await,
            Err(ContentError::PostNotFound(missing))
        );
        assert_eq!(
            content.update_post_meta(missing, "k", json!(1)).await,
            Err(ContentError::PostNotFound(missing))
        );
        assert_eq!(content.edit_post_link(missing).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sideload_creates_attachment() {
        let content = spawn_store();
        let parent = content.insert_post(draft("Story")).await.unwrap();

        let id = content
            .sideload_image("https://img.test/photos/cat.jpg?w=100", parent, None)
            .await
            .unwrap();
        let attachment = content.get_post(id).await.unwrap().unwrap();
        assert_eq!(attachment.post_type, PostType::Attachment);
        assert_eq!(attachment.status, PostStatus::Inherit);
        assert_eq!(attachment.parent, Some(parent));
        assert_eq!(attachment.title, "cat.jpg");

        let err = content
            .sideload_image("ftp://img.test/cat.jpg", parent, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Sideload(_)));
    }

    #[tokio::test]
    async fn test_edit_link_and_options() {
        let content = spawn_store();
        let id = content.insert_post(draft("Linked")).await.unwrap();
        assert_eq!(
            content.edit_post_link(id).await.unwrap().as_deref(),
            Some("https://cms.test/wp-admin/post.php?post=1&amp;action=edit")
        );

        assert_eq!(content.get_option("pmp_default_group").await.unwrap(), None);
        content
            .update_option("pmp_default_group", json!("g-9"))
            .await
            .unwrap();
        assert_eq!(
            content.get_option("pmp_default_group").await.unwrap(),
            Some(json!("g-9"))
        );
    }

    #[tokio::test]
    async fn test_closed_store() {
        let (store, content) = ContentStore::new(1, "https://cms.test");
        drop(store);
        let err = content.get_option("anything").await.unwrap_err();
        assert_eq!(err, ContentError::StoreClosed);
    }
}
