use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use azmirror_core::{AppError, AppResult};


/// Connection settings for the remote directory API.
#[derive(Debug, Clone)]
pub struct GraphApiConfig {
    /// Tenant the client-credentials grant is issued against.
    pub tenant_id: String,
    /// Application (client) identifier used to authenticate.
    pub client_id: String,
    /// Client secret used to authenticate.
    pub client_secret: String,
    /// Base URL of the directory API, without a trailing slash.
    pub graph_base_url: String,
    /// Base URL of the token-issuing authority, without a trailing slash.
    pub login_base_url: String,
}

/// OAuth2 token response from the authority.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// Acquires and caches OAuth2 access tokens via the client-credentials flow.
///
/// Tokens are refreshed shortly before they expire so in-flight requests
/// never carry a token on the edge of its lifetime.
pub struct GraphTokenProvider {
    config: GraphApiConfig,
    http_client: reqwest::Client,
    cached_token: RwLock<Option<CachedToken>>,
    grace_period: Duration,
}

impl GraphTokenProvider {
    /// Creates a new token provider.
    #[must_use]
    pub fn new(config: GraphApiConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
            cached_token: RwLock::new(None),
            grace_period: Duration::minutes(5),
        }
    }

    /// Returns a valid access token, reusing the cached one while it lives.
    pub async fn access_token(&self) -> AppResult<String> {
        {
            let cache = self.cached_token.read().await;
            if let Some(token) = cache.as_ref()
                && !token.is_expired(self.grace_period)
            {
                return Ok(token.access_token.clone());
            }
        }

        debug!("refreshing directory access token");
        let new_token = self.acquire_token().await?;
        let access_token = new_token.access_token.clone();

        let mut cache = self.cached_token.write().await;
        *cache = Some(new_token);

        Ok(access_token)
    }

    async fn acquire_token(&self) -> AppResult<CachedToken> {
        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.login_base_url.trim_end_matches('/'),
            self.config.tenant_id
        );
        let scope = format!("{}/.default", self.config.graph_base_url.trim_end_matches('/'));

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", scope.as_str()),
        ];

        let response = self
            .http_client
            .post(&token_url)
            .form(&params)
            .send()
            .await
            .map_err(|error| AppError::Unauthorized(format!("token request failed: {error}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Unauthorized(format!(
                "token request failed with status {status}: {body}"
            )));
        }

        let token_response: TokenResponse = response.json().await.map_err(|error| {
            AppError::Unauthorized(format!("failed to parse token response: {error}"))
        })?;

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at: Utc::now() + Duration::seconds(token_response.expires_in),
        })
    }
}
