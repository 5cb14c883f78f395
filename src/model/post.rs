//! Local CMS posts and the client payload used to import them.
//!
//! [`PostData`] is what the front end sends back after a search: the remote
//! story's attributes plus an optional image attachment. [`NewPost`] and
//! [`PostUpdate`] are the DTOs handed to the CMS.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Format the CMS expects for post dates.
pub const POST_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Identifier of a local post or attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostId(pub u64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a CMS user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Publish,
    Inherit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Post,
    Attachment,
}

/// A post as stored by the CMS.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: PostId,
    pub post_type: PostType,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub status: PostStatus,
    pub author: Option<UserId>,
    pub date: Option<String>,
    pub parent: Option<PostId>,
    /// Source URL for attachments.
    pub source_url: Option<String>,
}

/// Payload for inserting a post.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author: UserId,
    pub status: PostStatus,
    /// `YYYY-MM-DD HH:MM:SS`; the CMS picks the current time when unset.
    pub date: Option<String>,
}

/// Partial update of an existing post. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub excerpt: Option<String>,
}

/// Story payload sent by the client to create a local post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostData {
    #[serde(default)]
    pub attributes: StoryAttributes,
    #[serde(default)]
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoryAttributes {
    pub title: Option<String>,
    pub contentencoded: Option<String>,
    pub teaser: Option<String>,
    pub published: Option<String>,
    pub guid: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub byline: Option<String>,
}

impl StoryAttributes {
    /// `published` rendered in [`POST_DATE_FORMAT`], in UTC.
    pub fn post_date(&self) -> Option<String> {
        self.published.as_deref().and_then(format_post_date)
    }
}

/// Image document attached to a story.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub attributes: ImageAttributes,
    #[serde(default)]
    pub links: AttachmentLinks,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageAttributes {
    pub title: Option<String>,
    pub description: Option<String>,
    pub guid: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub byline: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentLinks {
    #[serde(default)]
    pub enclosure: Vec<Enclosure>,
}

/// One rendition of an image.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Enclosure {
    pub href: String,
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl Enclosure {
    pub fn crop(&self) -> Option<&str> {
        self.meta.get("crop").and_then(Value::as_str)
    }
}

impl Attachment {
    /// The `standard` crop, or the first enclosure when there is none.
    pub fn preferred_enclosure(&self) -> Option<&Enclosure> {
        let enclosures = &self.links.enclosure;
        enclosures
            .iter()
            .find(|enc| enc.crop() == Some("standard"))
            .or_else(|| enclosures.first())
    }
}

/// Converts a remote timestamp to the CMS date format.
///
/// Accepts RFC 3339 (what the API emits) and already-formatted local dates.
pub fn format_post_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc).format(POST_DATE_FORMAT).to_string());
    }
    NaiveDateTime::parse_from_str(raw, POST_DATE_FORMAT)
        .ok()
        .map(|naive| naive.format(POST_DATE_FORMAT).to_string())
}
