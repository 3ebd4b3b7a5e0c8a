use std::sync::Arc;

use anyhow::Result;
use reqwest::{header, Method, RequestBuilder};
use tracing::debug;

use crate::auth::SessionManager;
use crate::models::Resource;

/// Media type for JSON:API requests and responses
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Request builder for resource endpoints.
/// Clone is cheap - the session and its connection pool are shared.
#[derive(Clone)]
pub struct ApiClient {
    session: Arc<SessionManager>,
}

impl ApiClient {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Collection URL for a resource type, e.g. `.../api/v1/plc_users`
    pub fn resource_url<R: Resource>(&self) -> String {
        self.session.config().endpoint(R::JSONAPI_TYPE)
    }

    /// URL of a single resource by id
    pub fn member_url<R: Resource>(&self, id: &str) -> String {
        format!("{}/{}", self.resource_url::<R>(), id)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(JSONAPI_MEDIA_TYPE));
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static(JSONAPI_MEDIA_TYPE),
        );
        if let Some(value) = self.session.auth_header() {
            headers.insert(header::AUTHORIZATION, header::HeaderValue::from_str(&value)?);
        } else {
            debug!("No live session, sending unauthenticated request");
        }
        Ok(headers)
    }

    /// Start a request carrying JSON:API headers and, while the session is
    /// live, `Authorization: Bearer <credential>`.
    pub fn request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        Ok(self
            .session
            .http()
            .request(method, url)
            .headers(self.auth_headers()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryStore, TokenStore};
    use crate::config::ApiConfig;
    use crate::models::{PlcLineItem, PlcUser};

    fn client_with(store: Arc<MemoryStore>) -> ApiClient {
        let session = SessionManager::with_client(
            reqwest::Client::new(),
            ApiConfig::with_base_url("http://localhost:3000"),
            store,
        );
        ApiClient::new(Arc::new(session))
    }

    #[test]
    fn test_resource_urls() {
        let api = client_with(Arc::new(MemoryStore::new()));
        assert_eq!(api.resource_url::<PlcUser>(), "http://localhost:3000/api/v1/plc_users");
        assert_eq!(
            api.member_url::<PlcLineItem>("17"),
            "http://localhost:3000/api/v1/plc_line_items/17"
        );
    }

    #[test]
    fn test_headers_without_session() {
        let api = client_with(Arc::new(MemoryStore::new()));
        let headers = api.auth_headers().unwrap();
        assert!(headers.get(header::AUTHORIZATION).is_none());
        assert_eq!(headers[header::ACCEPT], JSONAPI_MEDIA_TYPE);
    }

    #[test]
    fn test_headers_with_opaque_credential_drop_it() {
        // Not decodable, so not live
        let store = Arc::new(MemoryStore::with_token("opaque"));
        let api = client_with(store.clone());
        let headers = api.auth_headers().unwrap();
        assert!(headers.get(header::AUTHORIZATION).is_none());
        assert_eq!(store.get().unwrap(), None);
    }
}
