//! Environment-driven configuration.
//!
//! DESIGN
//! ======
//! All tunables come from environment variables with working defaults, so
//! `dashgate` runs against the public demo API out of the box. The guard's
//! path sets are static configuration: the protected list mirrors the
//! dashboard's page routes, the public list is the login page only.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use crate::guard::GuardPaths;

/// Name of the cookie holding the persisted credential.
pub const AUTH_COOKIE: &str = "auth_token";

/// Lifetime of the persisted credential, stamped at write time.
pub const CREDENTIAL_TTL: time::Duration = time::Duration::days(7);

/// Where authenticated users land after login.
pub const LANDING_PATH: &str = "/dashboard";

/// The only public page; unauthenticated users are sent here.
pub const LOGIN_PATH: &str = "/login";

const DEFAULT_UPSTREAM_API_URL: &str = "https://api.escuelajs.co/api/v1";
const DEFAULT_PORT: u16 = 3000;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the upstream REST API (credential exchange + profile).
    pub upstream_api_url: String,
    /// Port the gateway listens on.
    pub port: u16,
    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
    /// Protected/public path sets for the route guard.
    pub guard: GuardPaths,
}

impl AppConfig {
    /// Load from `UPSTREAM_API_URL`, `PORT`, and `COOKIE_SECURE`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_parts(
            std::env::var("UPSTREAM_API_URL").ok(),
            std::env::var("PORT").ok(),
            env_bool("COOKIE_SECURE"),
        )
    }

    fn from_parts(upstream: Option<String>, port: Option<String>, cookie_secure: Option<bool>) -> Self {
        let upstream_api_url = upstream
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UPSTREAM_API_URL.to_owned());
        let port = port.and_then(|v| v.parse().ok()).unwrap_or(DEFAULT_PORT);
        let cookie_secure = cookie_secure.unwrap_or_else(|| upstream_api_url.starts_with("https://"));

        Self {
            upstream_api_url: upstream_api_url.trim_end_matches('/').to_owned(),
            port,
            cookie_secure,
            guard: GuardPaths::default(),
        }
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}
