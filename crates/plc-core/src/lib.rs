//! Client-side data access for the PLC donation platform.
//!
//! - `auth`: session credential lifecycle (login, magic links, expiry, logout)
//! - `api`: bearer-authorized request building for resource endpoints
//! - `config`: backend location and credential slot naming
//! - `models`: JSON:API resource declarations

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::ApiClient;
pub use auth::{Credential, SessionError, SessionManager, SessionState, TokenStore};
pub use config::ApiConfig;
