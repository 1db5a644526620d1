//! Auth endpoints — login, logout, current-user.
//!
//! DESIGN
//! ======
//! Each request drives a short-lived `SessionStore` wired to an in-process
//! credential slot: login runs the full exchange → persist → hydrate chain
//! and copies the resulting credential into the response cookie; `/auth/me`
//! seeds the slot from the request cookie and runs the same restore path a
//! page reload would. Cookie attributes match the persisted-credential
//! contract: site-wide path, 7-day max-age.

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use crate::config::{AUTH_COOKIE, CREDENTIAL_TTL};
use crate::services::credentials::{CredentialStore, MemoryCredentialStore};
use crate::services::session::{NoopNavigator, SessionStore};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

fn request_session(state: &AppState, credentials: Arc<MemoryCredentialStore>) -> SessionStore {
    SessionStore::new(state.backend.clone(), credentials, Arc::new(NoopNavigator))
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(CREDENTIAL_TTL)
        .build()
}

fn clear_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

/// `POST /auth/login` — exchange credentials, set the session cookie,
/// return the hydrated profile.
pub async fn login(State(state): State<AppState>, jar: CookieJar, Json(body): Json<LoginRequest>) -> Response {
    let credentials = Arc::new(MemoryCredentialStore::new());
    let session = request_session(&state, credentials.clone());

    if !session.login(&body.email, &body.password).await {
        return (StatusCode::UNAUTHORIZED, "invalid credentials").into_response();
    }

    let (Some(token), Some(profile)) = (credentials.load(), session.snapshot().profile) else {
        tracing::error!("login reported success without a persisted session");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let jar = jar.add(session_cookie(token, state.config.cookie_secure));
    (jar, Json(profile)).into_response()
}

/// `POST /auth/logout` — clear the session cookie. Idempotent: the cookie
/// is the whole server-side session, so clearing it is the logout.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (jar.add(clear_cookie(state.config.cookie_secure)), StatusCode::NO_CONTENT)
}

/// `GET /auth/me` — restore the session from the request cookie.
///
/// This is where an expired or revoked token that slipped past the guard's
/// presence check gets caught: the restore fails upstream and the cookie is
/// cleared.
pub async fn me(State(state): State<AppState>, jar: CookieJar) -> Response {
    let token = jar.get(AUTH_COOKIE).map(Cookie::value).unwrap_or_default();
    if token.is_empty() {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let credentials = Arc::new(MemoryCredentialStore::seeded(token));
    let session = request_session(&state, credentials);
    session.initialize().await;

    match session.snapshot().profile {
        Some(profile) => Json(profile).into_response(),
        None => {
            let jar = jar.add(clear_cookie(state.config.cookie_secure));
            (jar, StatusCode::UNAUTHORIZED).into_response()
        }
    }
}
