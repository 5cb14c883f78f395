use super::error::HandlerError;
use super::request::{AjaxRequest, AjaxResponse};
use super::Handlers;
use crate::clients::SdkMethod;
use crate::model::merge_attributes;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

impl Handlers {
    /// `pmp_search`: fetch one document by guid, or run a query.
    ///
    /// Options start from the configured search defaults; a JSON `query`
    /// field is merged over them.
    #[instrument(skip_all, fields(action = "pmp_search", user = %request.user))]
    pub async fn search(&self, request: &AjaxRequest) -> Result<AjaxResponse, HandlerError> {
        let mut options = self.settings().search.options();

        if let Some(raw) = request.field("query") {
            let query = match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(query)) => query,
                Ok(_) => {
                    return Err(HandlerError::BadRequest(
                        "`query` must be a JSON object.".to_string(),
                    ))
                }
                Err(e) => return Err(HandlerError::BadRequest(format!("Malformed `query`: {e}"))),
            };
            options = merge_attributes(&options, &query);
        }
        debug!(?options, "Search options");

        let guid = options.remove("guid").filter(|guid| !guid.is_null());
        let envelope = match guid {
            Some(guid) => {
                let guid = match guid {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                self.service()
                    .query_json(SdkMethod::FETCH_DOC, Some(guid.as_str()), &options)
                    .await?
            }
            None => {
                self.service()
                    .query_json(SdkMethod::QUERY_DOCS, None, &options)
                    .await?
            }
        };

        let Some(envelope) = envelope else {
            info!("No results");
            return Err(HandlerError::NotFound("No results found.".to_string()));
        };
        info!(total = envelope.total, page = envelope.page, "Search ok");

        let data = serde_json::to_value(&envelope).map_err(HandlerError::Encode)?;
        Ok(AjaxResponse::ok(json!({ "data": data, "success": true })))
    }
}
