use chrono::{Duration, Utc};
use reqwest::Client;
use tokio::sync::RwLock;

use super::refresh;
use super::types::Credential;
use crate::config::Config;
use crate::error::ApiError;

/// Lifetime assigned to every freshly obtained token
///
/// The platform issues tokens valid for 30 days; one day is kept in reserve.
pub const TOKEN_LIFETIME_DAYS: i64 = 29;

/// Token manager
/// Holds the single cached access token and refreshes it when it expires
///
/// The lock is never held across the refresh request, so concurrent callers
/// that all observe an expired token may each refresh it. The last writer
/// wins; every token obtained this way is valid.
pub struct TokenManager {
    /// Cached credential, empty until the first refresh
    credential: RwLock<Option<Credential>>,

    /// HTTP client for token requests
    client: Client,

    /// Platform base URL
    base_url: String,

    /// API key (client_id)
    api_key: Option<String>,

    /// Secret key (client_secret), optional
    secret_key: Option<String>,
}

impl TokenManager {
    /// Create a new TokenManager from configuration
    pub fn new(client: Client, config: &Config) -> Self {
        Self::with_credentials(
            client,
            config.base_url.clone(),
            config.api_key.clone(),
            config.secret_key.clone(),
        )
    }

    /// Create a new TokenManager with explicit credentials
    pub fn with_credentials(
        client: Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        secret_key: Option<String>,
    ) -> Self {
        Self {
            credential: RwLock::new(None),
            client,
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
            secret_key: secret_key.filter(|k| !k.is_empty()),
        }
    }

    /// Replace the cached credential
    #[cfg(any(test, feature = "test-utils"))]
    pub async fn seed(&self, token: impl Into<String>, expires_at: chrono::DateTime<Utc>) {
        *self.credential.write().await = Some(Credential {
            token: token.into(),
            expires_at,
        });
    }

    /// Cached token if it has not expired yet
    async fn cached_token(&self) -> Option<String> {
        let credential = self.credential.read().await;
        credential
            .as_ref()
            .filter(|c| c.is_valid_at(Utc::now()))
            .map(|c| c.token.clone())
    }

    /// Get a valid access token, refreshing if necessary
    pub async fn get_token(&self) -> Result<String, ApiError> {
        if let Some(token) = self.cached_token().await {
            return Ok(token);
        }

        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ApiError::ConfigError(
                "Baidu AI API key is not configured, set BAIDU_API_KEY".to_string(),
            )
        })?;

        let token = refresh::request_token(
            &self.client,
            &self.base_url,
            api_key,
            self.secret_key.as_deref(),
        )
        .await?;

        let expires_at = Utc::now() + Duration::days(TOKEN_LIFETIME_DAYS);
        *self.credential.write().await = Some(Credential {
            token: token.clone(),
            expires_at,
        });

        tracing::debug!("Token cached until {}", expires_at.to_rfc3339());

        Ok(token)
    }

    /// Snapshot of the cached credential, if any
    pub async fn credential(&self) -> Option<Credential> {
        self.credential.read().await.clone()
    }
}
