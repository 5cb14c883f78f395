//! Request and response shapes at the AJAX boundary.

use super::error::HandlerError;
use crate::model::UserId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;

/// The actions a client can post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AjaxAction {
    Search,
    DraftPost,
    PublishPost,
    CreateGroup,
    ModifyGroup,
    DefaultGroup,
}

impl AjaxAction {
    pub const ALL: [AjaxAction; 6] = [
        AjaxAction::Search,
        AjaxAction::DraftPost,
        AjaxAction::PublishPost,
        AjaxAction::CreateGroup,
        AjaxAction::ModifyGroup,
        AjaxAction::DefaultGroup,
    ];

    /// Looks up an action by its wire name, e.g. `pmp_search`.
    pub fn from_name(name: &str) -> Result<Self, HandlerError> {
        Self::ALL
            .into_iter()
            .find(|action| action.name() == name)
            .ok_or_else(|| HandlerError::UnknownAction(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            AjaxAction::Search => "pmp_search",
            AjaxAction::DraftPost => "pmp_draft_post",
            AjaxAction::PublishPost => "pmp_publish_post",
            AjaxAction::CreateGroup => "pmp_create_group",
            AjaxAction::ModifyGroup => "pmp_modify_group",
            AjaxAction::DefaultGroup => "pmp_default_group",
        }
    }
}

impl fmt::Display for AjaxAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A posted form: the requesting user plus raw string fields.
///
/// JSON payloads (`query`, `post_data`, `group`) arrive as strings and are
/// parsed by the handler that needs them.
#[derive(Debug, Clone)]
pub struct AjaxRequest {
    pub user: UserId,
    pub fields: HashMap<String, String>,
}

impl AjaxRequest {
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Parses a required JSON field.
    pub fn json_field<T: DeserializeOwned>(&self, key: &str) -> Result<T, HandlerError> {
        let raw = self
            .field(key)
            .ok_or_else(|| HandlerError::BadRequest(format!("Missing `{key}`.")))?;
        serde_json::from_str(raw)
            .map_err(|e| HandlerError::BadRequest(format!("Malformed `{key}`: {e}")))
    }
}

/// What a handler sends back: a status code and a JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AjaxResponse {
    pub status: u16,
    pub body: Value,
}

impl AjaxResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    /// `200 {"success": true}`
    pub fn success() -> Self {
        Self::ok(json!({ "success": true }))
    }

    /// Reads the body's `success` flag.
    pub fn is_success(&self) -> bool {
        self.body.get("success").and_then(Value::as_bool) == Some(true)
    }
}
