//! # AJAX Handlers
//!
//! The request handlers a CMS admin screen posts to. Every action checks the
//! request token first, then calls the syndication API through
//! [`DocumentService`] and/or the CMS through [`ContentApi`].
//!
//! | Action | Handler |
//! |---|---|
//! | `pmp_search` | [`Handlers::search`] |
//! | `pmp_draft_post` / `pmp_publish_post` | [`Handlers::create_post`] |
//! | `pmp_create_group` | [`Handlers::create_group`] |
//! | `pmp_modify_group` | [`Handlers::modify_group`] |
//! | `pmp_default_group` | [`Handlers::default_group`] |
//!
//! [`Handlers::dispatch`] routes by action name and turns every error into a
//! JSON failure body with the matching status.

pub mod entities;
pub mod error;
pub mod groups;
pub mod posts;
pub mod request;
pub mod search;

pub use entities::decode_entities;
pub use error::HandlerError;
pub use request::{AjaxAction, AjaxRequest, AjaxResponse};

use crate::clients::{ContentApi, DocumentService};
use crate::config::Settings;
use crate::model::PostStatus;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// All handlers, sharing one SDK wrapper and one CMS connection.
#[derive(Clone)]
pub struct Handlers {
    service: DocumentService,
    content: Arc<dyn ContentApi>,
    settings: Arc<Settings>,
}

impl Handlers {
    pub fn new(service: DocumentService, content: Arc<dyn ContentApi>, settings: Settings) -> Self {
        Self {
            service,
            content,
            settings: Arc::new(settings),
        }
    }

    pub fn service(&self) -> &DocumentService {
        &self.service
    }

    pub fn content(&self) -> &Arc<dyn ContentApi> {
        &self.content
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Routes a request by action name. Never fails: errors become
    /// `{"success": false, "message": ..}` with a non-200 status.
    pub async fn dispatch(&self, action: &str, request: &AjaxRequest) -> AjaxResponse {
        let result = match AjaxAction::from_name(action) {
            Ok(action) => self.handle(action, request).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(response) => {
                info!(action, status = response.status, "Handled");
                response
            }
            Err(e) => {
                warn!(action, status = e.status(), error = %e, "Request failed");
                e.into_response()
            }
        }
    }

    /// Checks the request token, then runs the action.
    pub async fn handle(
        &self,
        action: AjaxAction,
        request: &AjaxRequest,
    ) -> Result<AjaxResponse, HandlerError> {
        self.check_nonce(request).await?;
        debug!(%action, user = %request.user, "Nonce ok");

        match action {
            AjaxAction::Search => self.search(request).await,
            AjaxAction::DraftPost => self.create_post(request, PostStatus::Draft).await,
            AjaxAction::PublishPost => self.create_post(request, PostStatus::Publish).await,
            AjaxAction::CreateGroup => self.create_group(request).await,
            AjaxAction::ModifyGroup => self.modify_group(request).await,
            AjaxAction::DefaultGroup => self.default_group(request).await,
        }
    }

    async fn check_nonce(&self, request: &AjaxRequest) -> Result<(), HandlerError> {
        let ajax = &self.settings.ajax;
        let token = request.field(&ajax.nonce_field).unwrap_or_default();
        if token.is_empty() || !self.content.verify_nonce(&ajax.nonce_action, token).await? {
            return Err(HandlerError::InvalidNonce);
        }
        Ok(())
    }
}
