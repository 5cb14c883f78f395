//! # Content Store Actor
//!
//! The server half of the in-memory CMS. [`ContentStore`] owns every post,
//! meta entry and option, and serves [`ContentRequest`]s one at a time from
//! its channel, so no locking is needed around the state.
//!
//! ## Key Types
//!
//! - [`ContentRequest`]: one variant per CMS operation, each carrying its reply channel.
//! - [`ContentStore`]: the actor; spawn [`ContentStore::run`] on a Tokio task.
//! - [`ContentHandle`]: the cloneable client returned by [`ContentStore::new`].

use crate::clients::ContentError;
use crate::model::{NewPost, Post, PostId, PostStatus, PostType, PostUpdate, UserId};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::handle::ContentHandle;

// =============================================================================
// 1. MESSAGES
// =============================================================================

/// Reply channel carried by every request.
pub type Response<T> = oneshot::Sender<Result<T, ContentError>>;

/// Messages understood by the [`ContentStore`].
#[derive(Debug)]
pub enum ContentRequest {
    VerifyNonce {
        action: String,
        token: String,
        respond_to: Response<bool>,
    },
    UserCan {
        user: UserId,
        capability: String,
        respond_to: Response<bool>,
    },
    InsertPost {
        post: NewPost,
        respond_to: Response<PostId>,
    },
    UpdatePost {
        id: PostId,
        update: PostUpdate,
        respond_to: Response<()>,
    },
    GetPost {
        id: PostId,
        respond_to: Response<Option<Post>>,
    },
    UpdateMeta {
        id: PostId,
        key: String,
        value: Value,
        respond_to: Response<()>,
    },
    GetMeta {
        id: PostId,
        key: String,
        respond_to: Response<Option<Value>>,
    },
    Sideload {
        url: String,
        parent: PostId,
        description: Option<String>,
        respond_to: Response<PostId>,
    },
    EditLink {
        id: PostId,
        respond_to: Response<Option<String>>,
    },
    UpdateOption {
        key: String,
        value: Value,
        respond_to: Response<()>,
    },
    GetOption {
        key: String,
        respond_to: Response<Option<Value>>,
    },
}

// =============================================================================
// 2. THE ACTOR
// =============================================================================

/// In-memory CMS state plus the receiving end of its request channel.
///
/// # Architecture Note
/// The store is the only owner of its maps. Handlers never touch them
/// directly; they send a [`ContentRequest`] and await the oneshot reply.
/// Because `run()` handles one message at a time, an operation such as
/// `InsertPost` (allocate id, then insert) can never interleave with
/// another, and ids stay unique without a mutex.
///
/// When the last [`ContentHandle`] is dropped the channel closes, `recv()`
/// returns `None` and the actor stops.
pub struct ContentStore {
    receiver: mpsc::Receiver<ContentRequest>,
    admin_url: String,
    next_id: u64,
    posts: BTreeMap<PostId, Post>,
    meta: HashMap<PostId, BTreeMap<String, Value>>,
    options: BTreeMap<String, Value>,
    nonces: HashSet<(String, String)>,
    capabilities: HashMap<UserId, HashSet<String>>,
}

impl ContentStore {
    /// Creates the store and the handle used to talk to it.
    ///
    /// This method:
    /// 1. Opens a bounded channel of `buffer_size` requests
    /// 2. Normalizes `admin_url` (no trailing slash) for edit links
    /// 3. Starts post ids at 1
    ///
    /// The store does nothing until [`ContentStore::run`] is spawned.
    pub fn new(buffer_size: usize, admin_url: impl Into<String>) -> (Self, ContentHandle) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            admin_url: admin_url.into().trim_end_matches('/').to_string(),
            next_id: 1,
            posts: BTreeMap::new(),
            meta: HashMap::new(),
            options: BTreeMap::new(),
            nonces: HashSet::new(),
            capabilities: HashMap::new(),
        };
        (store, ContentHandle::new(sender))
    }

    /// Accepts `token` for requests guarded by `action`.
    pub fn with_nonce(mut self, action: impl Into<String>, token: impl Into<String>) -> Self {
        self.nonces.insert((action.into(), token.into()));
        self
    }

    /// Registers a user with the given capabilities.
    pub fn with_user<I, S>(mut self, user: UserId, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities
            .entry(user)
            .or_default()
            .extend(capabilities.into_iter().map(Into::into));
        self
    }

    /// Seeds an option before the store starts.
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    // --- Request loop ---

    /// Serves requests until every [`ContentHandle`] is dropped.
    pub async fn run(mut self) {
        info!(posts = self.posts.len(), "Content store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ContentRequest::VerifyNonce {
                    action,
                    token,
                    respond_to,
                } => {
                    let valid = self.nonces.contains(&(action.clone(), token));
                    debug!(%action, valid, "VerifyNonce");
                    let _ = respond_to.send(Ok(valid));
                }
                ContentRequest::UserCan {
                    user,
                    capability,
                    respond_to,
                } => {
                    let allowed = self
                        .capabilities
                        .get(&user)
                        .is_some_and(|caps| caps.contains(&capability));
                    debug!(%user, %capability, allowed, "UserCan");
                    let _ = respond_to.send(Ok(allowed));
                }
                ContentRequest::InsertPost { post, respond_to } => {
                    debug!(?post, "InsertPost");
                    let _ = respond_to.send(self.insert_post(post));
                }
                ContentRequest::UpdatePost {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(%id, ?update, "UpdatePost");
                    let result = match self.posts.get_mut(&id) {
                        Some(post) => {
                            if let Some(title) = update.title {
                                post.title = title;
                            }
                            if let Some(excerpt) = update.excerpt {
                                post.excerpt = excerpt;
                            }
                            info!(%id, "Updated");
                            Ok(())
                        }
                        None => {
                            warn!(%id, "Not found");
                            Err(ContentError::PostNotFound(id))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ContentRequest::GetPost { id, respond_to } => {
                    let post = self.posts.get(&id).cloned();
                    debug!(%id, found = post.is_some(), "GetPost");
                    let _ = respond_to.send(Ok(post));
                }
                ContentRequest::UpdateMeta {
                    id,
                    key,
                    value,
                    respond_to,
                } => {
                    debug!(%id, %key, "UpdateMeta");
                    let result = if self.posts.contains_key(&id) {
                        self.meta.entry(id).or_default().insert(key, value);
                        Ok(())
                    } else {
                        warn!(%id, "Not found");
                        Err(ContentError::PostNotFound(id))
                    };
                    let _ = respond_to.send(result);
                }
                ContentRequest::GetMeta {
                    id,
                    key,
                    respond_to,
                } => {
                    let value = self.meta.get(&id).and_then(|meta| meta.get(&key)).cloned();
                    let _ = respond_to.send(Ok(value));
                }
                ContentRequest::Sideload {
                    url,
                    parent,
                    description,
                    respond_to,
                } => {
                    debug!(%url, %parent, "Sideload");
                    let result = self.sideload(url, parent, description);
                    if let Err(e) = &result {
                        warn!(%parent, error = %e, "Sideload failed");
                    }
                    let _ = respond_to.send(result);
                }
                ContentRequest::EditLink { id, respond_to } => {
                    let link = self.posts.contains_key(&id).then(|| {
                        format!("{}/post.php?post={id}&amp;action=edit", self.admin_url)
                    });
                    let _ = respond_to.send(Ok(link));
                }
                ContentRequest::UpdateOption {
                    key,
                    value,
                    respond_to,
                } => {
                    info!(%key, "Option updated");
                    self.options.insert(key, value);
                    let _ = respond_to.send(Ok(()));
                }
                ContentRequest::GetOption { key, respond_to } => {
                    let _ = respond_to.send(Ok(self.options.get(&key).cloned()));
                }
            }
        }

        info!(posts = self.posts.len(), options = self.options.len(), "Shutdown");
    }

    // --- Operations ---

    fn allocate_id(&mut self) -> PostId {
        let id = PostId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert_post(&mut self, post: NewPost) -> Result<PostId, ContentError> {
        if [&post.title, &post.content, &post.excerpt]
            .iter()
            .all(|field| field.trim().is_empty())
        {
            warn!("Insert rejected: empty content");
            return Err(ContentError::EmptyContent);
        }

        let id = self.allocate_id();
        self.posts.insert(
            id,
            Post {
                id,
                post_type: PostType::Post,
                title: post.title,
                content: post.content,
                excerpt: post.excerpt,
                status: post.status,
                author: Some(post.author),
                date: post.date,
                parent: None,
                source_url: None,
            },
        );
        info!(%id, size = self.posts.len(), "Created");
        Ok(id)
    }

    fn sideload(
        &mut self,
        url: String,
        parent: PostId,
        description: Option<String>,
    ) -> Result<PostId, ContentError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ContentError::Sideload(format!("unsupported URL: {url}")));
        }
        if !self.posts.contains_key(&parent) {
            return Err(ContentError::PostNotFound(parent));
        }

        let file_name = url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ContentError::Sideload(format!("no file name in URL: {url}")))?
            .to_string();

        let id = self.allocate_id();
        self.posts.insert(
            id,
            Post {
                id,
                post_type: PostType::Attachment,
                title: description.clone().unwrap_or(file_name),
                content: String::new(),
                excerpt: String::new(),
                status: PostStatus::Inherit,
                author: None,
                date: None,
                parent: Some(parent),
                source_url: Some(url),
            },
        );
        info!(%id, %parent, "Attachment created");
        Ok(id)
    }
}
