use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::sync::Arc;

use crate::auth::TokenManager;
use crate::error::ApiError;
use crate::models::Params;

/// HTTP client for the Baidu AI platform
///
/// Attaches the cached access token to every call and hands the upstream
/// payload back untouched. No retries.
pub struct UpstreamClient {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// Token manager
    token_manager: Arc<TokenManager>,

    /// Platform base URL, without trailing slash
    base_url: String,
}

impl UpstreamClient {
    /// Create a new upstream client
    pub fn new(
        client: Client,
        token_manager: Arc<TokenManager>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_manager,
            base_url: base_url.into(),
        }
    }

    /// Call a platform endpoint
    ///
    /// GET sends `params` as the query string. POST sends `body` when given,
    /// otherwise `params`, form-encoded.
    pub async fn call(
        &self,
        endpoint: &str,
        params: &Params,
        method: Method,
        body: Option<&Params>,
    ) -> Result<Value, ApiError> {
        let token = self.token_manager.get_token().await?;

        tracing::info!("📡 Calling Baidu AI API: {} {}", method, endpoint);

        let url = format!("{}{}", self.base_url, endpoint);
        let request = self.build_request(&url, &token, params, &method, body);

        let response = request.send().await.map_err(|e| {
            tracing::error!(
                error = %e,
                error_debug = ?e,
                method = %method,
                endpoint = %endpoint,
                "Baidu AI API request failed"
            );
            ApiError::UpstreamError {
                status: None,
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        // A body cut short is a transport failure, whatever the status said
        let text = response.text().await.map_err(|e| ApiError::UpstreamError {
            status: None,
            message: format!("Failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                method = %method,
                endpoint = %endpoint,
                response_body = %text,
                "❌ Baidu AI API returned error response"
            );
            let message = if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                text
            };
            return Err(ApiError::UpstreamError {
                status: Some(status.as_u16()),
                message,
            });
        }

        tracing::info!("✅ Baidu AI API call succeeded: {} {}", method, endpoint);

        Ok(parse_payload(text))
    }

    fn build_request(
        &self,
        url: &str,
        token: &str,
        params: &Params,
        method: &Method,
        body: Option<&Params>,
    ) -> RequestBuilder {
        let builder = self
            .client
            .request(method.clone(), url)
            .query(&[("access_token", token)]);

        if *method == Method::GET {
            builder.query(params)
        } else {
            builder.form(body.unwrap_or(params))
        }
    }
}

/// Upstream body as JSON, or as a JSON string when it is not JSON
fn parse_payload(text: String) -> Value {
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}
