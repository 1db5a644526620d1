//! Service layer — upstream API client, credential persistence, session
//! lifecycle.

pub mod api;
pub mod credentials;
pub mod session;
