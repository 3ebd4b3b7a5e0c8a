//! Outbound request support for the JSON:API resource layer.
//!
//! `ApiClient` does not parse JSON:API documents. It resolves resource
//! collection URLs from the shared configuration and attaches the session
//! credential as a bearer token while the session is live.

pub mod client;

pub use client::{ApiClient, JSONAPI_MEDIA_TYPE};
