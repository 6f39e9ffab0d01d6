//! Credential cache for the Salesforce JWT-bearer exchange.
//!
//! A signed RS256 assertion is exchanged for an access token, which is then
//! cached until shortly before the provider would expire it. The cache mutex
//! is held across the exchange, so concurrent callers that find the cache
//! empty or expired share a single refresh.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::SalesforceConfig;
use crate::error::{AppError, AppResult};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime; Salesforce rejects anything beyond a few minutes
const ASSERTION_TTL_MINUTES: i64 = 5;

/// Cached-token lifetime, a conservative undershoot of the provider's
/// roughly two hour session timeout
const TOKEN_TTL_MINUTES: i64 = 50;

/// An access token bound to the org instance it was issued for
#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: String,
    pub instance_url: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    instance_url: Option<String>,
}

/// Lazily-refreshing token cache
pub struct TokenCache {
    config: SalesforceConfig,
    token_url: String,
    client: reqwest::Client,
    cached: Mutex<Option<Credential>>,
}

impl TokenCache {
    /// Creates a cache that exchanges tokens against the login host derived
    /// from the configured instance URL
    pub fn new(config: SalesforceConfig, client: reqwest::Client) -> Self {
        let token_url = format!("{}/services/oauth2/token", config.login_base());
        Self::with_token_url(config, client, token_url)
    }

    /// Creates a cache with an explicit token endpoint (used by tests)
    pub fn with_token_url(
        config: SalesforceConfig,
        client: reqwest::Client,
        token_url: String,
    ) -> Self {
        Self {
            config,
            token_url,
            client,
            cached: Mutex::new(None),
        }
    }

    /// Returns a valid credential, refreshing it if absent or expired.
    ///
    /// The lock is held for the duration of a refresh; concurrent callers
    /// wait for the in-flight exchange instead of issuing their own.
    pub async fn get(&self) -> AppResult<Credential> {
        let mut cached = self.cached.lock().await;

        if let Some(credential) = cached.as_ref() {
            if credential.is_valid(Utc::now()) {
                return Ok(credential.clone());
            }
            log::info!("Cached Salesforce token expired, refreshing");
        }

        let credential = self.refresh().await?;
        *cached = Some(credential.clone());
        Ok(credential)
    }

    async fn refresh(&self) -> AppResult<Credential> {
        let assertion = self.build_assertion()?;

        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!("HTTP {}: {}", status.as_u16(), detail)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("Malformed token response: {}", e)))?;

        log::info!("Obtained Salesforce access token via JWT-bearer exchange");

        Ok(Credential {
            access_token: token.access_token,
            // Sandbox responses may omit instance_url; fall back to config
            instance_url: token
                .instance_url
                .unwrap_or_else(|| self.config.instance_url.clone()),
            expires_at: Utc::now() + Duration::minutes(TOKEN_TTL_MINUTES),
        })
    }

    fn build_assertion(&self) -> AppResult<String> {
        let claims = AssertionClaims {
            iss: &self.config.client_id,
            sub: &self.config.username,
            aud: self.config.login_base(),
            exp: (Utc::now() + Duration::minutes(ASSERTION_TTL_MINUTES)).timestamp(),
        };

        let key = EncodingKey::from_rsa_pem(self.config.private_key_pem.as_bytes())?;
        let token = encode(&Header::new(Algorithm::RS256), &claims, &key)?;
        Ok(token)
    }
}
