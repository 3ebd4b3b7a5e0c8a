//! Authentication module for managing the session credential.
//!
//! This module provides:
//! - `SessionManager`: password login, magic-link login, login-link requests,
//!   expiry checks and logout
//! - `TokenStore`: the single persistent slot holding the credential, with
//!   in-memory, file and OS keychain backends
//! - `Credential`: the signed token and its locally decoded claims
//!
//! Session state is never cached; expiry is re-evaluated on every check.

pub mod credentials;
pub mod error;
pub mod session;
pub mod token;

pub use credentials::{FileStore, KeyringStore, MemoryStore, StoreError, TokenStore};
pub use error::SessionError;
pub use session::{SessionManager, SessionState};
pub use token::{Claims, Credential, CredentialStatus, TokenError};
