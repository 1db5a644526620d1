//! Page stubs for the guarded dashboard routes.
//!
//! The dashboard UI itself is out of scope here; these handlers exist so the
//! guard has concrete pages to gate, and return just enough JSON to identify
//! themselves.

use axum::response::Json;
use serde_json::{Value, json};

pub async fn home() -> Json<Value> {
    page("home")
}

pub async fn dashboard() -> Json<Value> {
    page("dashboard")
}

pub async fn manage_users() -> Json<Value> {
    page("manage-users")
}

pub async fn categories() -> Json<Value> {
    page("categories")
}

pub async fn products() -> Json<Value> {
    page("products")
}

pub async fn login() -> Json<Value> {
    page("login")
}

fn page(name: &str) -> Json<Value> {
    Json(json!({ "page": name }))
}
