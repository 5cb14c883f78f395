use crate::clients::{DocumentApi, DocumentService};
use crate::config::Settings;
use crate::handlers::{AjaxRequest, AjaxResponse, Handlers};
use crate::store::{ContentHandle, ContentStore};
use std::sync::Arc;
use tracing::{error, info};

const STORE_BUFFER: usize = 64;

/// Wires the syndication API, the content store and the handlers together.
///
/// `BridgeSystem` is responsible for:
/// - **Lifecycle**: spawning the content store actor and stopping it again
/// - **Wiring**: giving the handlers the SDK wrapper and a store handle
///
/// # Architecture
///
/// - **Content store**: an actor owning posts, meta and options, reached
///   through a [`ContentHandle`]
/// - **Document service**: the SDK wrapper around the injected
///   [`DocumentApi`], which normalizes every response
/// - **Handlers**: hold one of each and route requests by action name
///
/// The handlers share the store through `Arc<dyn ContentApi>`, so the store
/// stays alive as long as either the handlers or [`BridgeSystem::content`]
/// hold a handle. [`BridgeSystem::shutdown`] drops both before waiting.
///
/// # Example
///
/// ```ignore
/// let system = BridgeSystem::with_store(settings, api, |store| {
///     store.with_nonce("pmp_ajax_nonce", "token").with_user(UserId(1), ["edit_posts"])
/// });
///
/// let response = system.dispatch("pmp_search", &request).await;
///
/// system.shutdown().await?;
/// ```
pub struct BridgeSystem {
    /// Request handlers, ready to dispatch.
    pub handlers: Handlers,

    /// Direct access to the content store, e.g. for inspecting imports.
    pub content: ContentHandle,

    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl BridgeSystem {
    /// Starts a system with an empty content store.
    pub fn new(settings: Settings, api: Arc<dyn DocumentApi>) -> Self {
        Self::with_store(settings, api, |store| store)
    }

    /// Starts a system, letting `seed` register nonces, users and options on
    /// the store before it is spawned.
    ///
    /// This method:
    /// 1. Creates the content store and its handle
    /// 2. Applies `seed` and spawns the store in its own Tokio task
    /// 3. Wraps `api` in a [`DocumentService`] using `settings.api`
    /// 4. Builds the [`Handlers`] from the service, a store handle and `settings`
    pub fn with_store(
        settings: Settings,
        api: Arc<dyn DocumentApi>,
        seed: impl FnOnce(ContentStore) -> ContentStore,
    ) -> Self {
        // 1. Create the store
        let (store, content) = ContentStore::new(STORE_BUFFER, settings.cms.admin_url.clone());

        // 2. Seed and spawn
        let store_handle = tokio::spawn(seed(store).run());

        // 3. Wire the handlers
        let service = DocumentService::new(api, settings.api.clone());
        let handlers = Handlers::new(service, Arc::new(content.clone()), settings);

        Self {
            handlers,
            content,
            handles: vec![store_handle],
        }
    }

    pub async fn dispatch(&self, action: &str, request: &AjaxRequest) -> AjaxResponse {
        self.handlers.dispatch(action, request).await
    }

    /// Stops the content store and waits for it to finish.
    ///
    /// Every clone of [`BridgeSystem::handlers`] and
    /// [`BridgeSystem::content`] must be dropped first, or this waits
    /// forever.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down bridge...");

        // Dropping the last store handle closes the channel.
        drop(self.handlers);
        drop(self.content);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(format!("Store task failed: {:?}", e));
            }
        }

        info!("Bridge shutdown complete.");
        Ok(())
    }
}
