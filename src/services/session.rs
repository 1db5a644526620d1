//! Session lifecycle — the single source of truth for "who is logged in".
//!
//! ARCHITECTURE
//! ============
//! A `SessionStore` owns the credential slot, the upstream backend, and a
//! navigation seam, and drives the status machine
//! `Initializing -> Unauthenticated <-> Authenticated`. State changes are
//! published over a `watch` channel so consumers can react without polling.
//!
//! TRADE-OFFS
//! ==========
//! Operations are single attempts: a failed profile fetch is full session
//! invalidation, never a retry. In-flight hydration cannot be cancelled, so
//! every state-mutating operation bumps a generation counter and stale
//! responses are discarded instead of applied; a logout can therefore never
//! be undone by a profile response that was already on the wire.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use crate::config::{LANDING_PATH, LOGIN_PATH};
use crate::services::api::{AuthBackend, Profile};
use crate::services::credentials::CredentialStore;

/// Where the session currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Startup restore in progress; held only while `initialize` runs.
    Initializing,
    /// No usable credential.
    Unauthenticated,
    /// Token present and profile hydrated.
    Authenticated,
}

/// Point-in-time view of the session, published to subscribers.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub token: Option<String>,
    pub profile: Option<Profile>,
}

/// Navigation seam — the router-push equivalent. Tests record calls,
/// the gateway ignores them.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator that drops navigation requests. Used where the caller owns
/// redirects itself (the gateway's request handlers).
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _path: &str) {}
}

struct SessionInner {
    token: Option<String>,
    profile: Option<Profile>,
    status: SessionStatus,
    /// Bumped by every state-mutating operation; in-flight hydration whose
    /// generation no longer matches is discarded.
    generation: u64,
}

/// Owner of the authentication lifecycle for one user agent.
///
/// Created once at application start, handed to consumers by reference or
/// `Arc`, never as a module global. All operations are async and settle the
/// state fully before returning.
pub struct SessionStore {
    backend: Arc<dyn AuthBackend>,
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    inner: Mutex<SessionInner>,
    updates: watch::Sender<SessionSnapshot>,
}

impl SessionStore {
    #[must_use]
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let initial = SessionSnapshot { status: SessionStatus::Initializing, token: None, profile: None };
        let (updates, _) = watch::channel(initial);
        Self {
            backend,
            credentials,
            navigator,
            inner: Mutex::new(SessionInner {
                token: None,
                profile: None,
                status: SessionStatus::Initializing,
                generation: 0,
            }),
            updates,
        }
    }

    /// Subscribe to session snapshots. The receiver immediately holds the
    /// latest published state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    /// Latest published state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.updates.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.snapshot().status == SessionStatus::Authenticated
    }

    /// Restore the session from the persisted credential.
    ///
    /// Runs once per application load. Always terminates `Initializing`,
    /// whether or not a credential exists or hydration succeeds, so callers
    /// never block on the status indefinitely.
    pub async fn initialize(&self) {
        let generation = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            inner.status = SessionStatus::Initializing;
            inner.token = None;
            inner.profile = None;
            self.publish(&inner);
            inner.generation
        };

        let Some(token) = self.credentials.load() else {
            tracing::debug!("no persisted credential; starting unauthenticated");
            self.settle(generation).await;
            return;
        };

        {
            let mut inner = self.inner.lock().await;
            if inner.generation == generation {
                inner.token = Some(token.clone());
                self.publish(&inner);
            }
        }

        self.hydrate_profile(&token, generation).await;
        self.settle(generation).await;
    }

    /// Exchange credentials, persist the token, hydrate the profile, and
    /// navigate to the landing page.
    ///
    /// Returns `true` only when the whole chain succeeded. A rejected or
    /// failed exchange returns `false` without mutating any state; a failed
    /// profile fetch after a successful exchange invalidates the session and
    /// also returns `false`.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let token = match self.backend.exchange_credentials(email, password).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, email, "credential exchange failed");
                return false;
            }
        };

        let generation = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            inner.token = Some(token.clone());
            inner.profile = None;
            inner.status = SessionStatus::Unauthenticated;
            self.publish(&inner);
            inner.generation
        };
        self.credentials.store(&token);

        if !self.hydrate_profile(&token, generation).await {
            return false;
        }

        self.navigator.navigate(LANDING_PATH);
        true
    }

    /// Clear the credential and all session state, then navigate to the
    /// login page. Safe to call when already logged out.
    pub async fn logout(&self) {
        self.credentials.clear();
        {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            inner.token = None;
            inner.profile = None;
            inner.status = SessionStatus::Unauthenticated;
            self.publish(&inner);
        }
        self.navigator.navigate(LOGIN_PATH);
    }

    /// Fetch and apply the profile for `token`. Returns `true` when the
    /// profile was applied; a failure invalidates the session, and a result
    /// arriving after the generation moved on is dropped.
    async fn hydrate_profile(&self, token: &str, generation: u64) -> bool {
        match self.backend.fetch_profile(token).await {
            Ok(profile) => {
                let mut inner = self.inner.lock().await;
                if inner.generation != generation {
                    tracing::debug!("discarding stale profile response");
                    return false;
                }
                inner.profile = Some(profile);
                inner.status = SessionStatus::Authenticated;
                self.publish(&inner);
                true
            }
            Err(e) => {
                let stale = {
                    let inner = self.inner.lock().await;
                    inner.generation != generation
                };
                if stale {
                    tracing::debug!("discarding stale profile failure");
                } else {
                    tracing::warn!(error = %e, "profile fetch failed; invalidating session");
                    self.logout().await;
                }
                false
            }
        }
    }

    /// Leave `Initializing` no matter how the restore went.
    async fn settle(&self, generation: u64) {
        let mut inner = self.inner.lock().await;
        if inner.generation == generation && inner.status == SessionStatus::Initializing {
            inner.status = SessionStatus::Unauthenticated;
            self.publish(&inner);
        }
    }

    fn publish(&self, inner: &SessionInner) {
        self.updates.send_replace(SessionSnapshot {
            status: inner.status.clone(),
            token: inner.token.clone(),
            profile: inner.profile.clone(),
        });
    }
}
