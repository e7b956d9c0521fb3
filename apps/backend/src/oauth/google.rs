//! Google sign-in: consent URL construction and authorization-code exchange.

use std::time::Duration;

use jsonwebtoken::dangerous::insecure_decode;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use url::Url;

use super::state::OAuthStateCache;
use super::OAuthError;
use crate::config::oauth::GoogleOAuthConfig;
use crate::logging::pii::Redacted;
use crate::logging::security;

const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(120);
const SCOPES: &str = "openid email profile";

/// Identity claims read from Google's id_token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleIdentity {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub aud: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GoogleOAuthClient {
    config: GoogleOAuthConfig,
    http: reqwest::Client,
    states: OAuthStateCache,
}

impl GoogleOAuthClient {
    pub fn new(config: GoogleOAuthConfig, states: OAuthStateCache) -> Result<Self, OAuthError> {
        let http = reqwest::Client::builder()
            .timeout(EXCHANGE_TIMEOUT)
            .build()
            .map_err(|e| OAuthError::Transport(e.to_string()))?;
        Ok(Self {
            config,
            http,
            states,
        })
    }

    /// Consent-screen URL carrying a fresh per-flow state.
    pub async fn authorization_url(&self, origin: &str) -> Result<String, OAuthError> {
        let state = self.states.create_nonced(origin).await?;
        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("state", state.as_str()),
                ("access_type", "offline"),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|e| OAuthError::Transport(format!("invalid GOOGLE_AUTH_URL: {e}")))?;
        Ok(url.into())
    }

    /// Trades an authorization code for the caller's identity.
    ///
    /// The state is consumed first and an unknown, expired or replayed state
    /// is rejected before any network call. Provider failures are logged and
    /// returned as-is; nothing is retried.
    pub async fn exchange_code(&self, code: &str, state: &str) -> Result<GoogleIdentity, OAuthError> {
        if !self.states.consume(state).await? {
            security::oauth_state_rejected(state);
            return Err(OAuthError::InvalidState);
        }

        let params = [
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", SCOPES),
            ("state", state),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Google token exchange request failed");
                if e.is_timeout() {
                    OAuthError::Timeout
                } else {
                    OAuthError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %Redacted(&body), "Google token exchange rejected");
            return Err(OAuthError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let tokens: TokenResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Google token response did not parse");
            OAuthError::Transport(e.to_string())
        })?;
        let id_token = tokens.id_token.ok_or(OAuthError::MissingIdToken)?;
        let identity = self.read_id_token(&id_token)?;

        info!(email = %Redacted(&identity.email), "Google identity resolved");
        Ok(identity)
    }

    /// The id_token arrives straight from Google's token endpoint over TLS,
    /// so its claims are read without signature verification. The audience
    /// must still name this client.
    fn read_id_token(&self, id_token: &str) -> Result<GoogleIdentity, OAuthError> {
        let identity = insecure_decode::<GoogleIdentity>(id_token)
            .map_err(|e| OAuthError::InvalidIdToken(e.to_string()))?
            .claims;

        match identity.aud.as_deref() {
            Some(aud) if aud != self.config.client_id => Err(OAuthError::InvalidIdToken(
                "audience does not match client id".into(),
            )),
            _ => Ok(identity),
        }
    }
}
