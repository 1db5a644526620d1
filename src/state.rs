//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the parsed configuration and the upstream auth backend behind its
//! trait, so tests swap in a mock without touching the routes.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::api::AuthBackend;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn AuthBackend>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, backend: Arc<dyn AuthBackend>) -> Self {
        Self { config: Arc::new(config), backend }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use tokio::sync::Notify;

    use super::*;
    use crate::services::api::{ApiError, Profile};
    use crate::services::session::Navigator;

    /// Create a dummy `Profile` for testing.
    #[must_use]
    pub fn dummy_profile() -> Profile {
        Profile {
            id: 1,
            name: "Eve".into(),
            email: "eve@x.com".into(),
            role: "admin".into(),
            avatar: Some("https://img.example.com/eve.png".into()),
        }
    }

    /// Scripted auth backend. Counts calls so tests can assert the
    /// single-attempt contract.
    pub struct MockAuthBackend {
        email: String,
        password: String,
        token: String,
        profile: Option<Profile>,
        profile_gate: Option<Arc<Notify>>,
        pub exchange_calls: AtomicUsize,
        pub profile_calls: AtomicUsize,
    }

    impl MockAuthBackend {
        /// Accepts exactly `email`/`password`, issuing `token` and serving
        /// `profile` for it.
        #[must_use]
        pub fn accepting(email: &str, password: &str, token: &str, profile: Profile) -> Self {
            Self {
                email: email.into(),
                password: password.into(),
                token: token.into(),
                profile: Some(profile),
                profile_gate: None,
                exchange_calls: AtomicUsize::new(0),
                profile_calls: AtomicUsize::new(0),
            }
        }

        /// Accepts the exchange but rejects every profile fetch, like an
        /// upstream that revoked the token immediately.
        #[must_use]
        pub fn broken_profile(email: &str, password: &str, token: &str) -> Self {
            let mut backend = Self::accepting(email, password, token, dummy_profile());
            backend.profile = None;
            backend
        }

        /// Delay profile responses until the gate is notified.
        #[must_use]
        pub fn with_profile_gate(mut self, gate: Arc<Notify>) -> Self {
            self.profile_gate = Some(gate);
            self
        }
    }

    #[async_trait::async_trait]
    impl crate::services::api::AuthBackend for MockAuthBackend {
        async fn exchange_credentials(&self, email: &str, password: &str) -> Result<String, ApiError> {
            self.exchange_calls.fetch_add(1, Ordering::SeqCst);
            if email == self.email && password == self.password {
                Ok(self.token.clone())
            } else {
                Err(ApiError::Rejected(401))
            }
        }

        async fn fetch_profile(&self, token: &str) -> Result<Profile, ApiError> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.profile_gate {
                gate.notified().await;
            }
            if token != self.token {
                return Err(ApiError::Rejected(401));
            }
            self.profile.clone().ok_or(ApiError::Rejected(401))
        }
    }

    /// Navigator that records every requested path.
    #[derive(Default)]
    pub struct RecordingNavigator {
        pub paths: Mutex<Vec<String>>,
    }

    impl RecordingNavigator {
        #[must_use]
        pub fn visited(&self) -> Vec<String> {
            self.paths.lock().unwrap().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, path: &str) {
            self.paths.lock().unwrap().push(path.to_owned());
        }
    }

    /// Create a test `AppState` over the given mock backend.
    #[must_use]
    pub fn test_app_state(backend: Arc<dyn AuthBackend>) -> AppState {
        let config = AppConfig {
            upstream_api_url: "http://upstream.test/api".into(),
            port: 0,
            cookie_secure: false,
            guard: crate::guard::GuardPaths::default(),
        };
        AppState::new(config, backend)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use super::test_helpers::{MockAuthBackend, dummy_profile, test_app_state};

    #[test]
    fn app_state_clone_shares_backend() {
        let backend = Arc::new(MockAuthBackend::accepting("a@b.com", "pw", "tok", dummy_profile()));
        let state = test_app_state(backend);
        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.config, &cloned.config));
        assert_eq!(cloned.config.upstream_api_url, "http://upstream.test/api");
    }

    #[test]
    fn test_state_carries_default_guard_paths() {
        let backend = Arc::new(MockAuthBackend::accepting("a@b.com", "pw", "tok", dummy_profile()));
        let state = test_app_state(backend);
        assert!(state.config.guard.protected.iter().any(|p| p == "/dashboard"));
        assert_eq!(state.config.guard.public, vec!["/login".to_owned()]);
    }
}
