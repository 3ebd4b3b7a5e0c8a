//! Session credential and its locally decoded claims.
//!
//! The credential is a signed JWT issued by the backend. The client never
//! verifies the signature; it only reads the payload to learn when the
//! credential stops being useful.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A session credential as returned to callers: `{"jwt": "<token>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub jwt: String,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Credential is not a JWT (missing payload segment)")]
    Malformed,

    #[error("Credential payload is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Credential payload is not a JSON claims object: {0}")]
    Claims(#[from] serde_json::Error),
}

/// The subset of registered claims the client cares about.
///
/// Registered time claims are JSON numbers and may carry a fractional part.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Claims {
    /// Expiry, seconds since the Unix epoch
    #[serde(default)]
    pub exp: Option<f64>,
    /// Issued at, seconds since the Unix epoch
    #[serde(default)]
    pub iat: Option<f64>,
}

/// Instant for a NumericDate, keeping sub-second precision.
/// `None` when not finite or outside chrono's range.
fn numeric_date(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1_000_000_000.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(numeric_date)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(numeric_date)
    }
}

/// Result of evaluating a credential against a point in time.
#[derive(Debug)]
pub enum CredentialStatus {
    /// Usable. `None` means the credential never expires.
    Live { expires_at: Option<DateTime<Utc>> },
    Expired { expired_at: DateTime<Utc> },
    Undecodable(TokenError),
}

impl Credential {
    pub fn new(jwt: impl Into<String>) -> Self {
        Self { jwt: jwt.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.jwt
    }

    /// Decode the payload segment without verifying the signature.
    pub fn claims(&self) -> Result<Claims, TokenError> {
        let payload = self.jwt.split('.').nth(1).ok_or(TokenError::Malformed)?;
        if payload.is_empty() {
            return Err(TokenError::Malformed);
        }
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Evaluate expiry at `now`. A credential whose expiry equals `now`
    /// is already expired.
    pub fn status_at(&self, now: DateTime<Utc>) -> CredentialStatus {
        let claims = match self.claims() {
            Ok(claims) => claims,
            Err(e) => return CredentialStatus::Undecodable(e),
        };
        match claims.exp {
            None => CredentialStatus::Live { expires_at: None },
            Some(exp) => match numeric_date(exp) {
                Some(expired_at) if expired_at <= now => CredentialStatus::Expired { expired_at },
                Some(expires_at) => CredentialStatus::Live {
                    expires_at: Some(expires_at),
                },
                // Out of chrono's range: far past or far future
                None if exp < 0.0 => CredentialStatus::Expired {
                    expired_at: DateTime::<Utc>::MIN_UTC,
                },
                None => CredentialStatus::Live { expires_at: None },
            },
        }
    }

    /// Short, non-secret form for log lines.
    pub fn fingerprint(&self) -> String {
        let tail: String = self
            .jwt
            .chars()
            .rev()
            .take(6)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("…{}", tail)
    }
}

impl From<String> for Credential {
    fn from(jwt: String) -> Self {
        Self { jwt }
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.jwt)
    }
}

#[cfg(test)]
pub(crate) fn make_token(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}
