//! Route guard — request-time gating on the persisted credential.
//!
//! DESIGN
//! ======
//! The guard runs before any page handler and sees only the raw cookie value,
//! never the session store. It is a presence check: a present-but-expired
//! token passes here and is caught one step later when profile hydration
//! fails and invalidates the session. Protected pages without a credential
//! bounce to the login page with the requested path attached as a `redirect`
//! query parameter; the login page with a credential bounces to the landing
//! page.

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

use std::fmt::Write;

use crate::config::{LANDING_PATH, LOGIN_PATH};

/// Static path sets the guard enforces.
#[derive(Debug, Clone)]
pub struct GuardPaths {
    /// Pages that require a credential.
    pub protected: Vec<String>,
    /// Pages authenticated users are kept off (the login page).
    pub public: Vec<String>,
    /// Redirect target for unauthenticated requests.
    pub login_path: String,
    /// Redirect target for authenticated requests to public pages.
    pub landing_path: String,
}

impl Default for GuardPaths {
    fn default() -> Self {
        Self {
            protected: ["/", "/dashboard", "/manage-users", "/categories", "/products"]
                .map(str::to_owned)
                .to_vec(),
            public: vec![LOGIN_PATH.to_owned()],
            login_path: LOGIN_PATH.to_owned(),
            landing_path: LANDING_PATH.to_owned(),
        }
    }
}

/// Outcome of a guard check. Redirect variants carry the target location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Pass the request through unmodified.
    Allowed,
    /// Protected page without a credential.
    RedirectToLogin(String),
    /// Public page with a credential present.
    RedirectToLanding(String),
}

/// Decide what to do with a request for `path` given the raw cookie value.
///
/// An empty cookie value counts as no credential.
#[must_use]
pub fn decide(paths: &GuardPaths, path: &str, credential: Option<&str>) -> GuardDecision {
    let has_credential = credential.is_some_and(|token| !token.is_empty());

    if !has_credential && paths.protected.iter().any(|p| p == path) {
        let location = format!("{}?redirect={}", paths.login_path, encode_redirect(path));
        return GuardDecision::RedirectToLogin(location);
    }

    if has_credential && paths.public.iter().any(|p| p == path) {
        return GuardDecision::RedirectToLanding(paths.landing_path.clone());
    }

    GuardDecision::Allowed
}

/// Percent-encode a path for use as a query parameter value.
///
/// Everything outside the RFC 3986 unreserved set is escaped, so `/` becomes
/// `%2F`. The parameter is emitted for a future post-login return flow;
/// nothing consumes it yet.
pub(crate) fn encode_redirect(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(b as char),
            _ => {
                let _ = write!(out, "%{b:02X}");
            }
        }
    }
    out
}
