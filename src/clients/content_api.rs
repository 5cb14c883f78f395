//! Boundary to the local CMS content API.

use crate::model::{NewPost, Post, PostId, PostUpdate, UserId};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors reported by a [`ContentApi`] implementation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ContentError {
    /// The content store is no longer accepting requests.
    #[error("Content store closed")]
    StoreClosed,

    /// The content store dropped the reply channel.
    #[error("Content store dropped response channel")]
    StoreDropped,

    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    /// Title, content and excerpt were all empty.
    #[error("Content, title, and excerpt are empty.")]
    EmptyContent,

    /// The image could not be imported.
    #[error("Image sideload failed: {0}")]
    Sideload(String),

    #[error("Invalid content request: {0}")]
    Invalid(String),
}

impl From<String> for ContentError {
    fn from(msg: String) -> Self {
        ContentError::Invalid(msg)
    }
}

/// The CMS as seen by the bridge handlers.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Checks a request token issued for `action`.
    async fn verify_nonce(&self, action: &str, token: &str) -> Result<bool, ContentError>;

    async fn user_can(&self, user: UserId, capability: &str) -> Result<bool, ContentError>;

    async fn insert_post(&self, post: NewPost) -> Result<PostId, ContentError>;

    async fn update_post(&self, id: PostId, update: PostUpdate) -> Result<(), ContentError>;

    async fn get_post(&self, id: PostId) -> Result<Option<Post>, ContentError>;

    async fn update_post_meta(
        &self,
        id: PostId,
        key: &str,
        value: Value,
    ) -> Result<(), ContentError>;

    async fn post_meta(&self, id: PostId, key: &str) -> Result<Option<Value>, ContentError>;

    /// Downloads an image into the media library as a child of `parent`.
    async fn sideload_image(
        &self,
        url: &str,
        parent: PostId,
        description: Option<&str>,
    ) -> Result<PostId, ContentError>;

    /// Admin edit URL of a post, HTML-escaped for display.
    async fn edit_post_link(&self, id: PostId) -> Result<Option<String>, ContentError>;

    async fn update_option(&self, key: &str, value: Value) -> Result<(), ContentError>;

    async fn get_option(&self, key: &str) -> Result<Option<Value>, ContentError>;
}
