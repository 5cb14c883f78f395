use super::entities::decode_entities;
use super::error::HandlerError;
use super::request::{AjaxRequest, AjaxResponse};
use super::Handlers;
use crate::model::{Attachment, NewPost, PostData, PostId, PostStatus, PostUpdate, StoryAttributes};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

/// Capability required to create posts.
pub const EDIT_POSTS: &str = "edit_posts";

impl Handlers {
    /// `pmp_draft_post` / `pmp_publish_post`: copy a remote story into a
    /// new local post, with its image if one is attached.
    #[instrument(skip_all, fields(user = %request.user, status = ?status))]
    pub async fn create_post(
        &self,
        request: &AjaxRequest,
        status: PostStatus,
    ) -> Result<AjaxResponse, HandlerError> {
        if !self.content().user_can(request.user, EDIT_POSTS).await? {
            warn!("Missing capability");
            return Err(HandlerError::Forbidden);
        }

        let data: PostData = request.json_field("post_data")?;
        let story = &data.attributes;

        let new_post = NewPost {
            title: story.title.clone().unwrap_or_default(),
            content: story.contentencoded.clone().unwrap_or_default(),
            excerpt: story.teaser.clone().unwrap_or_default(),
            author: request.user,
            status,
            date: story.post_date(),
        };

        // Insert failures are reported in the body, not the status.
        let post_id = match self.content().insert_post(new_post).await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Insert failed");
                return Ok(AjaxResponse::ok(json!({
                    "success": false,
                    "message": e.to_string(),
                })));
            }
        };
        info!(%post_id, guid = story.guid.as_deref().unwrap_or_default(), "Post created");

        if let Some(attachment) = &data.attachment {
            self.attach_image(post_id, attachment).await?;
        }

        self.set_story_meta(post_id, story).await?;

        let edit_url = self
            .content()
            .edit_post_link(post_id)
            .await?
            .map(|link| decode_entities(&link));

        Ok(AjaxResponse::ok(json!({
            "success": true,
            "data": { "edit_url": edit_url },
        })))
    }

    /// Imports the attachment's preferred enclosure and makes it the post
    /// thumbnail. Returns the attachment id, or `None` when there was
    /// nothing to import or the import failed.
    async fn attach_image(
        &self,
        post_id: PostId,
        attachment: &Attachment,
    ) -> Result<Option<PostId>, HandlerError> {
        let Some(enclosure) = attachment.preferred_enclosure() else {
            return Ok(None);
        };
        let image = &attachment.attributes;

        let image_id = match self
            .content()
            .sideload_image(&enclosure.href, post_id, image.description.as_deref())
            .await
        {
            Ok(id) => id,
            Err(e) => {
                warn!(%post_id, href = %enclosure.href, error = %e, "Image import failed");
                return Ok(None);
            }
        };

        self.content()
            .update_post(
                image_id,
                PostUpdate {
                    title: image.title.clone(),
                    excerpt: image.description.clone(),
                },
            )
            .await?;

        let meta = [
            ("_wp_attachment_image_alt", &image.title),
            ("pmp_guid", &image.guid),
            ("pmp_created", &image.created),
            ("pmp_modified", &image.modified),
            ("pmp_byline", &image.byline),
        ];
        for (key, value) in meta {
            self.content()
                .update_post_meta(image_id, key, Value::from(value.clone()))
                .await?;
        }

        self.content()
            .update_post_meta(post_id, "_thumbnail_id", Value::from(image_id.0))
            .await?;
        info!(%post_id, %image_id, "Image attached");
        Ok(Some(image_id))
    }

    async fn set_story_meta(
        &self,
        post_id: PostId,
        story: &StoryAttributes,
    ) -> Result<(), HandlerError> {
        let meta = [
            ("pmp_guid", &story.guid),
            ("pmp_created", &story.created),
            ("pmp_modified", &story.modified),
            ("pmp_byline", &story.byline),
            ("pmp_published", &story.published),
        ];
        for (key, value) in meta {
            self.content()
                .update_post_meta(post_id, key, Value::from(value.clone()))
                .await?;
        }
        Ok(())
    }
}
