//! Upstream auth API — credential exchange and profile fetch.
//!
//! ERROR HANDLING
//! ==============
//! Every call is a single attempt: no retry, no backoff. Failures surface to
//! the session store, which decides whether they mean "bad credentials" or
//! "invalidate the session". Transport and parse errors are kept distinct
//! from upstream rejections so callers can log them differently.

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

/// User record returned by the upstream profile endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique user identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Role label (e.g. `"admin"`, `"customer"`).
    pub role: String,
    /// Avatar image URL, if available.
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("upstream rejected the request: status {0}")]
    Rejected(u16),
    #[error("upstream transport error: {0}")]
    Transport(String),
    #[error("unexpected upstream response: {0}")]
    Malformed(String),
}

/// Backend seam for the session store. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange an email/password pair for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] for refused credentials, otherwise a
    /// transport or parse error.
    async fn exchange_credentials(&self, email: &str, password: &str) -> Result<String, ApiError>;

    /// Fetch the profile belonging to `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] for an expired or unknown token,
    /// otherwise a transport or parse error.
    async fn fetch_profile(&self, token: &str) -> Result<Profile, ApiError>;
}

// =============================================================================
// HTTP IMPLEMENTATION
// =============================================================================

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Real backend over the upstream REST API.
pub struct HttpAuthBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthBackend {
    /// Build a backend against `base_url` (no trailing slash required).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { client, base_url: base_url.into().trim_end_matches('/').to_owned() })
    }
}

#[async_trait::async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn exchange_credentials(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let resp = self
            .client
            .post(login_endpoint(&self.base_url))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ApiError::Rejected(resp.status().as_u16()));
        }

        let body = resp.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        parse_token_response(&body)
    }

    async fn fetch_profile(&self, token: &str) -> Result<Profile, ApiError> {
        let resp = self
            .client
            .get(profile_endpoint(&self.base_url))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ApiError::Rejected(resp.status().as_u16()));
        }

        let body = resp.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        parse_profile_response(&body)
    }
}

// =============================================================================
// PURE HELPERS
// =============================================================================

pub(crate) fn login_endpoint(base_url: &str) -> String {
    format!("{base_url}/auth/login")
}

pub(crate) fn profile_endpoint(base_url: &str) -> String {
    format!("{base_url}/auth/profile")
}

pub(crate) fn parse_token_response(body: &str) -> Result<String, ApiError> {
    let token_resp: TokenResponse =
        serde_json::from_str(body).map_err(|_| ApiError::Malformed(format!("not a token response: {body}")))?;
    if token_resp.access_token.is_empty() {
        return Err(ApiError::Malformed("empty access_token".into()));
    }
    Ok(token_resp.access_token)
}

pub(crate) fn parse_profile_response(body: &str) -> Result<Profile, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Malformed(format!("bad profile payload: {e}")))
}
