//! Bearer token verification.
//!
//! Tokens are HS256 JWTs issued by the authorization server with the same
//! shared signing key. Authorities carry a `ROLE_` prefix which is stripped,
//! so access rules name bare roles (`ADMIN`, `USER`).

use std::collections::HashSet;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::schema::SecurityConfig;

const ROLE_PREFIX: &str = "ROLE_";

/// Claims issued by the authorization server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    #[serde(default)]
    pub authorities: Vec<String>,

    #[serde(default)]
    pub scope: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Expiry, seconds since epoch.
    pub exp: u64,
}

/// Errors from token verification.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("no signing key configured")]
    MissingKey,

    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// Identity attached to a request after authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub authenticated: bool,
    pub name: Option<String>,
    pub roles: HashSet<String>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_claims(claims: Claims) -> Self {
        let roles = claims
            .authorities
            .iter()
            .map(|a| a.strip_prefix(ROLE_PREFIX).unwrap_or(a).to_string())
            .collect();
        Self {
            authenticated: true,
            name: claims.user_name.or(claims.client_id),
            roles,
        }
    }
}

/// Verifies bearer tokens against the configured signing key.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(signing_key: &str, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        validation.validate_aud = false;
        Self {
            key: DecodingKey::from_secret(signing_key.as_bytes()),
            validation,
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Result<Self, TokenError> {
        let key = config
            .jwt_signing_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(TokenError::MissingKey)?;
        Ok(Self::new(key, config.leeway_secs))
    }

    /// Check signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
