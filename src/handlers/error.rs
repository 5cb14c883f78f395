use super::request::AjaxResponse;
use crate::clients::{ApiError, ContentError, ServiceError};
use serde_json::json;
use thiserror::Error;

/// Why a handler refused or failed a request.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Invalid security token.")]
    InvalidNonce,

    #[error("You do not have sufficient permissions to access this page.")]
    Forbidden,

    #[error("Unknown action")]
    UnknownAction(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("Failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl HandlerError {
    /// HTTP-style status code reported to the client.
    pub fn status(&self) -> u16 {
        match self {
            HandlerError::InvalidNonce | HandlerError::Forbidden => 403,
            HandlerError::UnknownAction(_) | HandlerError::BadRequest(_) => 400,
            HandlerError::NotFound(_)
            | HandlerError::Api(ApiError::NotFound(_))
            | HandlerError::Service(ServiceError::Api(ApiError::NotFound(_)))
            | HandlerError::Content(ContentError::PostNotFound(_)) => 404,
            HandlerError::Api(_) | HandlerError::Service(_) => 502,
            HandlerError::Content(_) | HandlerError::Encode(_) => 500,
        }
    }

    pub fn into_response(self) -> AjaxResponse {
        AjaxResponse {
            status: self.status(),
            body: json!({
                "success": false,
                "message": self.to_string(),
            }),
        }
    }
}
