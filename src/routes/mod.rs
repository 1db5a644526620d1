//! Router assembly and the route-guard middleware.
//!
//! SYSTEM CONTEXT
//! ==============
//! Page routes sit behind the guard middleware, which sees the raw cookie
//! before any handler runs. The auth endpoints live outside the guard and
//! answer their own 401s instead of redirecting.

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

pub mod auth;
pub mod pages;

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AUTH_COOKIE;
use crate::guard::{self, GuardDecision};
use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let pages = Router::new()
        .route("/", get(pages::home))
        .route("/dashboard", get(pages::dashboard))
        .route("/manage-users", get(pages::manage_users))
        .route("/categories", get(pages::categories))
        .route("/products", get(pages::products))
        .route("/login", get(pages::login))
        .layer(middleware::from_fn_with_state(state.clone(), guard_middleware));

    Router::new()
        .merge(pages)
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Apply the guard decision before any page handler runs.
pub(crate) async fn guard_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let credential = jar.get(AUTH_COOKIE).map(Cookie::value);

    match guard::decide(&state.config.guard, &path, credential) {
        GuardDecision::Allowed => next.run(request).await,
        GuardDecision::RedirectToLogin(location) | GuardDecision::RedirectToLanding(location) => {
            tracing::debug!(%path, %location, "guard redirect");
            Redirect::temporary(&location).into_response()
        }
    }
}
