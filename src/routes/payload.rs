// Request body extraction for capability routes

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::ApiError;
use crate::models::RequestFields;

/// Capability request body, accepted as JSON or as an urlencoded form
///
/// An empty body yields no fields, so the handler reports the first missing
/// parameter instead of a parse error.
pub struct Payload(pub RequestFields);

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            let Form(pairs) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::ValidationError(format!("Invalid form body: {}", e)))?;
            return Ok(Payload(RequestFields::from_pairs(pairs)));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::ValidationError(format!("Failed to read body: {}", e)))?;

        parse_json_fields(&bytes).map(Payload)
    }
}

fn parse_json_fields(bytes: &[u8]) -> Result<RequestFields, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(RequestFields::default());
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(RequestFields::new(map)),
        Ok(_) => Err(ApiError::ValidationError(
            "Request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(ApiError::ValidationError(format!(
            "Invalid JSON body: {}",
            e
        ))),
    }
}
