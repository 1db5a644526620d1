//! Persisted credential — the auth-token cookie slot.
//!
//! DESIGN
//! ======
//! Models the browser's cookie store as seen by the session lifecycle: a
//! single named slot holding an opaque token with a fixed expiry window.
//! Only the session store writes or clears it; the route guard and request
//! handlers read the raw cookie from the request instead.

#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;

use std::sync::Mutex;

use time::OffsetDateTime;

use crate::config::CREDENTIAL_TTL;

/// Storage seam for the persisted credential.
pub trait CredentialStore: Send + Sync {
    /// Read the token, if present and unexpired.
    fn load(&self) -> Option<String>;
    /// Write the token with a fresh expiry stamp.
    fn store(&self, token: &str);
    /// Delete the token. Idempotent.
    fn clear(&self);
}

#[derive(Debug, Clone)]
struct StoredCredential {
    token: String,
    expires_at: OffsetDateTime,
}

/// In-process credential slot with expiry enforcement on read.
pub struct MemoryCredentialStore {
    slot: Mutex<Option<StoredCredential>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self { slot: Mutex::new(None) }
    }

    /// Build a store pre-populated with `token`, as if a prior login had
    /// persisted it. Used when restoring a session from a request cookie.
    #[must_use]
    pub fn seeded(token: &str) -> Self {
        let store = Self::new();
        store.store(token);
        store
    }

    pub(crate) fn store_with_expiry(&self, token: &str, expires_at: OffsetDateTime) {
        let mut slot = self.slot.lock().expect("credential slot poisoned");
        *slot = Some(StoredCredential { token: token.to_owned(), expires_at });
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<String> {
        let mut slot = self.slot.lock().expect("credential slot poisoned");
        match slot.as_ref() {
            Some(cred) if cred.expires_at > OffsetDateTime::now_utc() => Some(cred.token.clone()),
            Some(_) => {
                // Expired records behave as absent and are dropped on read.
                *slot = None;
                None
            }
            None => None,
        }
    }

    fn store(&self, token: &str) {
        self.store_with_expiry(token, OffsetDateTime::now_utc() + CREDENTIAL_TTL);
    }

    fn clear(&self) {
        let mut slot = self.slot.lock().expect("credential slot poisoned");
        *slot = None;
    }
}
