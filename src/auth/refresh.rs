// Token refresh logic

use reqwest::Client;

use super::types::TokenResponse;
use crate::error::ApiError;

/// OAuth token endpoint for a platform base URL
pub(crate) fn token_url(base_url: &str) -> String {
    format!("{}/oauth/2.0/token", base_url)
}

/// Exchange the API key for a fresh access token (client credentials grant)
///
/// Single attempt; any failure surfaces as `AuthError`.
pub async fn request_token(
    client: &Client,
    base_url: &str,
    api_key: &str,
    secret_key: Option<&str>,
) -> Result<String, ApiError> {
    tracing::info!("Requesting Baidu AI access token...");

    let url = token_url(base_url);

    let mut query = vec![
        ("grant_type", "client_credentials"),
        ("client_id", api_key),
    ];
    if let Some(secret) = secret_key {
        query.push(("client_secret", secret));
    }

    let response = client
        .get(&url)
        .query(&query)
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, url = %url, "Token request failed");
            ApiError::AuthError(format!("Failed to reach token endpoint: {}", e))
        })?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!(
            status = status.as_u16(),
            response_body = %error_text,
            "Token endpoint returned error response"
        );
        return Err(ApiError::AuthError(format!(
            "Token endpoint returned {}: {}",
            status, error_text
        )));
    }

    let data: TokenResponse = response.json().await.map_err(|e| {
        ApiError::AuthError(format!("Failed to parse token response: {}", e))
    })?;

    match data.access_token {
        Some(token) if !token.is_empty() => {
            tracing::info!(
                upstream_expires_in = ?data.expires_in,
                "✅ Access token obtained"
            );
            Ok(token)
        }
        _ => {
            let reason = data
                .error_description
                .or(data.error)
                .unwrap_or_else(|| "response does not contain access_token".to_string());
            tracing::error!("Token endpoint rejected credentials: {}", reason);
            Err(ApiError::AuthError(reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_token_url() {
        assert_eq!(
            token_url("https://aip.baidubce.com"),
            "https://aip.baidubce.com/oauth/2.0/token"
        );
    }

    #[tokio::test]
    async fn test_request_token_sends_client_credentials() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/oauth/2.0/token")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
                Matcher::UrlEncoded("client_id".into(), "my-key".into()),
                Matcher::UrlEncoded("client_secret".into(), "my-secret".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"24.token","expires_in":2592000}"#)
            .expect(1)
            .create_async()
            .await;

        let token = request_token(&Client::new(), &server.url(), "my-key", Some("my-secret"))
            .await
            .unwrap();

        assert_eq!(token, "24.token");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_token_non_2xx_is_auth_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/oauth/2.0/token")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error":"invalid_client","error_description":"unknown client id"}"#)
            .create_async()
            .await;

        let err = request_token(&Client::new(), &server.url(), "bad", None)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::AuthError(_)));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_request_token_missing_access_token() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/oauth/2.0/token")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"error":"invalid_client","error_description":"unknown client id"}"#)
            .create_async()
            .await;

        let err = request_token(&Client::new(), &server.url(), "bad", None)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Authentication failed: unknown client id");
    }

    #[tokio::test]
    async fn test_request_token_transport_failure() {
        // Nothing listens on port 1
        let err = request_token(&Client::new(), "http://127.0.0.1:1", "key", None)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::AuthError(_)));
    }
}
