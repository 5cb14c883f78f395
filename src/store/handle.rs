use super::actor::{ContentRequest, Response};
use crate::clients::{ContentApi, ContentError};
use crate::model::{NewPost, Post, PostId, PostUpdate, UserId};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

/// Client half of the [`ContentStore`](super::ContentStore).
///
/// Cheap to clone. The store shuts down once every handle is dropped.
#[derive(Clone)]
pub struct ContentHandle {
    sender: mpsc::Sender<ContentRequest>,
}

impl ContentHandle {
    pub(crate) fn new(sender: mpsc::Sender<ContentRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> ContentRequest + Send,
    ) -> Result<T, ContentError>
    where
        T: Send,
    {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ContentError::StoreClosed)?;
        response.await.map_err(|_| ContentError::StoreDropped)?
    }
}

#[async_trait]
impl ContentApi for ContentHandle {
    async fn verify_nonce(&self, action: &str, token: &str) -> Result<bool, ContentError> {
        let (action, token) = (action.to_string(), token.to_string());
        self.request(|respond_to| ContentRequest::VerifyNonce {
            action,
            token,
            respond_to,
        })
        .await
    }

    async fn user_can(&self, user: UserId, capability: &str) -> Result<bool, ContentError> {
        let capability = capability.to_string();
        self.request(|respond_to| ContentRequest::UserCan {
            user,
            capability,
            respond_to,
        })
        .await
    }

    async fn insert_post(&self, post: NewPost) -> Result<PostId, ContentError> {
        self.request(|respond_to| ContentRequest::InsertPost { post, respond_to })
            .await
    }

    async fn update_post(&self, id: PostId, update: PostUpdate) -> Result<(), ContentError> {
        self.request(|respond_to| ContentRequest::UpdatePost {
            id,
            update,
            respond_to,
        })
        .await
    }

    async fn get_post(&self, id: PostId) -> Result<Option<Post>, ContentError> {
        self.request(|respond_to| ContentRequest::GetPost { id, respond_to })
            .await
    }

    async fn update_post_meta(
        &self,
        id: PostId,
        key: &str,
        value: Value,
    ) -> Result<(), ContentError> {
        let key = key.to_string();
        self.request(|respond_to| ContentRequest::UpdateMeta {
            id,
            key,
            value,
            respond_to,
        })
        .await
    }

    async fn post_meta(&self, id: PostId, key: &str) -> Result<Option<Value>, ContentError> {
        let key = key.to_string();
        self.request(|respond_to| ContentRequest::GetMeta {
            id,
            key,
            respond_to,
        })
        .await
    }

    async fn sideload_image(
        &self,
        url: &str,
        parent: PostId,
        description: Option<&str>,
    ) -> Result<PostId, ContentError> {
        let url = url.to_string();
        let description = description.map(str::to_string);
        self.request(|respond_to| ContentRequest::Sideload {
            url,
            parent,
            description,
            respond_to,
        })
        .await
    }

    async fn edit_post_link(&self, id: PostId) -> Result<Option<String>, ContentError> {
        self.request(|respond_to| ContentRequest::EditLink { id, respond_to })
            .await
    }

    async fn update_option(&self, key: &str, value: Value) -> Result<(), ContentError> {
        let key = key.to_string();
        self.request(|respond_to| ContentRequest::UpdateOption {
            key,
            value,
            respond_to,
        })
        .await
    }

    async fn get_option(&self, key: &str) -> Result<Option<Value>, ContentError> {
        let key = key.to_string();
        self.request(|respond_to| ContentRequest::GetOption { key, respond_to })
            .await
    }
}
