use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::{header, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use super::credentials::TokenStore;
use super::token::{Credential, CredentialStatus};
use super::SessionError;
use crate::config::{ApiConfig, CREDENTIAL_KEY};

/// Password login endpoint, below the API namespace
const TOKENS_PATH: &str = "plc_user_tokens";

/// Login-link dispatch endpoint, below the API namespace
const LOGIN_LINKS_PATH: &str = "plc_user_login_links";

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    auth: AuthPayload<'a>,
}

#[derive(Debug, Serialize)]
struct AuthPayload<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginLinkRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    jwt: String,
}

/// Session state derived from the credential slot on every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    /// `expires_at` is `None` for a credential without an expiry claim.
    Authenticated { expires_at: Option<DateTime<Utc>> },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }
}

/// Owns the lifecycle of the session credential.
///
/// Operations take `&self` and are not coordinated with each other: two
/// overlapping `authenticate` calls both write the slot, and whichever
/// response settles last wins.
pub struct SessionManager {
    client: Client,
    config: ApiConfig,
    store: Arc<dyn TokenStore>,
}

impl SessionManager {
    /// Create a manager with a fresh HTTP client. No request timeout is set;
    /// the client's defaults govern.
    pub fn new(config: ApiConfig, store: Arc<dyn TokenStore>) -> Result<Self, SessionError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, config, store))
    }

    /// Create a manager sharing an existing connection pool.
    pub fn with_client(client: Client, config: ApiConfig, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            config,
            store,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn http(&self) -> &Client {
        &self.client
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Exchange an email and password for a credential, storing it.
    ///
    /// Input is not validated locally. A non-2xx response fails with the
    /// server's payload and leaves the stored credential untouched.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Credential, SessionError> {
        let url = self.config.endpoint(TOKENS_PATH);
        let body = AuthRequest {
            auth: AuthPayload { email, password },
        };

        debug!(url = %url, "Sending authentication request");
        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let text = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| SessionError::InvalidResponse(format!("Failed to parse token response: {}", e)))?;

        let credential = Credential::from(token.jwt);
        self.store.set(credential.as_str())?;
        info!(credential = %credential.fingerprint(), "Authenticated with password");
        Ok(credential)
    }

    /// Complete a magic-link login: take the credential embedded in the
    /// link's `plcJwt` query parameter and store it. No network access.
    ///
    /// Relative links are resolved against the configured base URL.
    pub fn authenticate_from_link(&self, link: &str) -> Result<Credential, SessionError> {
        let url = Url::parse(link)
            .or_else(|_| Url::parse(&self.config.base_url).and_then(|base| base.join(link)))
            .map_err(|e| {
                debug!(error = %e, "Login link is not a URL");
                SessionError::MissingCredential
            })?;

        let jwt = url
            .query_pairs()
            .find(|(key, value)| key == CREDENTIAL_KEY && !value.is_empty())
            .map(|(_, value)| value.into_owned())
            .ok_or(SessionError::MissingCredential)?;

        let credential = Credential::from(jwt);
        self.store.set(credential.as_str())?;
        info!(credential = %credential.fingerprint(), "Authenticated from login link");
        Ok(credential)
    }

    /// Ask the server to send a login link to `email` out of band.
    /// Nothing is stored; the link comes back through `authenticate_from_link`.
    pub async fn request_login_link(&self, email: &str) -> Result<(), SessionError> {
        let url = self.config.endpoint(LOGIN_LINKS_PATH);

        debug!(url = %url, "Requesting login link");
        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&LoginLinkRequest { email })
            .send()
            .await?;

        Self::check_response(response).await?;
        info!("Login link requested");
        Ok(())
    }

    /// Whether a live credential is stored. An expired or unreadable
    /// credential is removed from the slot and reported as `false`.
    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Derive the session state from the slot. Evaluated fresh on every call.
    pub fn state(&self) -> SessionState {
        match self.live_credential() {
            Some((_, expires_at)) => SessionState::Authenticated { expires_at },
            None => SessionState::Unauthenticated,
        }
    }

    /// Read the slot once and evaluate it. Expired or unreadable credentials
    /// are discarded; a failed read counts as logged out.
    fn live_credential(&self) -> Option<(Credential, Option<DateTime<Utc>>)> {
        let credential = match self.credential() {
            Ok(Some(credential)) => credential,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read credential slot");
                return None;
            }
        };

        match credential.status_at(Utc::now()) {
            CredentialStatus::Live { expires_at } => Some((credential, expires_at)),
            CredentialStatus::Expired { expired_at } => {
                info!(expired_at = %expired_at, "Stored credential expired, discarding");
                self.discard();
                None
            }
            CredentialStatus::Undecodable(e) => {
                warn!(error = %e, "Stored credential unreadable, discarding");
                self.discard();
                None
            }
        }
    }

    /// The stored credential, without any validity check.
    pub fn credential(&self) -> Result<Option<Credential>, SessionError> {
        Ok(self.store.get()?.map(Credential::from))
    }

    /// `Authorization` header value for the live credential, if any.
    pub fn auth_header(&self) -> Option<String> {
        self.live_credential()
            .map(|(credential, _)| self.config.generate_auth_header(credential.as_str()))
    }

    /// Forget the stored credential. A no-op when already logged out.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.store.remove()?;
        info!("Logged out");
        Ok(())
    }

    fn discard(&self) {
        if let Err(e) = self.store.remove() {
            warn!(error = %e, "Failed to remove credential");
        }
    }

    /// Check if response is successful, returning the server's payload if not.
    async fn check_response(response: Response) -> Result<Response, SessionError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await;
            Err(Self::rejection(status, body))
        }
    }

    /// A non-2xx response is always `Rejected`, even when its body can't
    /// be read; the status is already known.
    fn rejection(status: StatusCode, body: Result<String, reqwest::Error>) -> SessionError {
        let body = body.unwrap_or_else(|e| {
            warn!(status = %status, error = %e, "Failed to read error response body");
            String::new()
        });
        warn!(status = %status, "Request rejected");
        SessionError::rejected(status, &body)
    }
}
