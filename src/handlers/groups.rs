use super::error::HandlerError;
use super::request::{AjaxRequest, AjaxResponse};
use super::Handlers;
use crate::model::{merge_attributes, Document};
use serde_json::Value;
use tracing::{info, instrument};

/// Profile of group documents on the remote service.
pub const GROUP_PROFILE: &str = "group";

fn required_guid(group: &Document) -> Result<String, HandlerError> {
    group
        .guid()
        .filter(|guid| !guid.is_empty())
        .map(str::to_string)
        .ok_or_else(|| HandlerError::BadRequest("Group has no guid.".to_string()))
}

impl Handlers {
    /// `pmp_create_group`
    #[instrument(skip_all, fields(action = "pmp_create_group"))]
    pub async fn create_group(&self, request: &AjaxRequest) -> Result<AjaxResponse, HandlerError> {
        let group: Document = request.json_field("group")?;
        let doc = self.service().new_doc(GROUP_PROFILE, group);
        let saved = self.service().save(&doc).await?;
        info!(guid = saved.guid().unwrap_or_default(), "Group created");
        Ok(AjaxResponse::success())
    }

    /// `pmp_modify_group`: merge the posted attributes over the stored group.
    #[instrument(skip_all, fields(action = "pmp_modify_group"))]
    pub async fn modify_group(&self, request: &AjaxRequest) -> Result<AjaxResponse, HandlerError> {
        let group: Document = request.json_field("group")?;
        let guid = required_guid(&group)?;

        let mut stored = self
            .service()
            .fetch_document(&guid)
            .await?
            .ok_or_else(|| HandlerError::NotFound(format!("Group not found: {guid}")))?;

        stored.attributes = merge_attributes(&stored.attributes, &group.attributes);
        stored.links = stored.client_links();
        self.service().save(&stored).await?;
        info!(%guid, "Group modified");
        Ok(AjaxResponse::success())
    }

    /// `pmp_default_group`: remember a group as the default for new content.
    #[instrument(skip_all, fields(action = "pmp_default_group"))]
    pub async fn default_group(&self, request: &AjaxRequest) -> Result<AjaxResponse, HandlerError> {
        let group: Document = request.json_field("group")?;
        let guid = required_guid(&group)?;

        let option = &self.settings().cms.default_group_option;
        self.content()
            .update_option(option, Value::String(guid.clone()))
            .await?;
        info!(%guid, %option, "Default group set");
        Ok(AjaxResponse::success())
    }
}
