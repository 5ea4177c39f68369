// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer token authentication for the gateway.
//!
//! Tokens are HS256 JWTs (`header.payload.signature`, base64url without
//! padding) signed with the shared `auth.jwt_secret`. The `sub` claim is the
//! user id. When no secret is configured, every request is rejected
//! (fail-closed).

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use solace_config::model::AuthConfig;
use solace_core::{
    AdapterType, AuthAdapter, AuthIdentity, AuthToken, HealthStatus, PluginAdapter, SolaceError,
};

use crate::error::ApiError;
use crate::handlers::Action;

type HmacSha256 = Hmac<Sha256>;

const JWT_ALG: &str = "HS256";

/// Longest token accepted before any decoding.
const MAX_TOKEN_LEN: usize = 8 * 1024;

#[derive(Debug, Serialize, Deserialize)]
struct JwtHeader {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// `aud` may be a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::One(aud) => aud == expected,
            Audience::Many(auds) => auds.iter().any(|a| a == expected),
        }
    }
}

/// Claims read from (and written to) a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// HS256 token verifier.
#[derive(Clone)]
pub struct JwtVerifier {
    secret: Option<Vec<u8>>,
    audience: Option<String>,
    leeway_secs: i64,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .field("audience", &self.audience)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config
                .jwt_secret
                .as_ref()
                .filter(|s| !s.is_empty())
                .map(|s| s.as_bytes().to_vec()),
            audience: config.audience.clone().filter(|a| !a.is_empty()),
            leeway_secs: i64::try_from(config.leeway_secs).unwrap_or(i64::MAX),
        }
    }

    /// Whether a signing secret is available.
    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Verifies `token` against the current time.
    pub fn verify(&self, token: &str) -> Result<AuthIdentity, SolaceError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Verifies `token` as if the current time were `now` (Unix seconds).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<AuthIdentity, SolaceError> {
        let secret = self.secret.as_deref().ok_or_else(|| {
            tracing::error!("no auth.jwt_secret configured -- rejecting request");
            unauthorized("authentication is not configured")
        })?;

        if token.len() > MAX_TOKEN_LEN {
            return Err(unauthorized("token too long"));
        }

        let mut parts = token.split('.');
        let (Some(header_part), Some(payload_part), Some(sig_part), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(unauthorized("malformed token"));
        };

        let header: JwtHeader = decode_segment(header_part)?;
        if header.alg != JWT_ALG {
            return Err(unauthorized(&format!(
                "unsupported token algorithm `{}`",
                header.alg
            )));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(sig_part)
            .map_err(|_| unauthorized("malformed token signature"))?;
        let mut mac = new_mac(secret)?;
        mac.update(header_part.as_bytes());
        mac.update(b".");
        mac.update(payload_part.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| unauthorized("invalid token signature"))?;

        let claims: Claims = decode_segment(payload_part)?;

        if claims.exp.saturating_add(self.leeway_secs) <= now {
            return Err(unauthorized("token expired"));
        }

        if let Some(expected) = &self.audience {
            let matches = claims.aud.as_ref().is_some_and(|aud| aud.contains(expected));
            if !matches {
                return Err(unauthorized("token audience mismatch"));
            }
        }

        if claims.sub.trim().is_empty() {
            return Err(unauthorized("token has no subject"));
        }

        Ok(AuthIdentity {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[async_trait]
impl PluginAdapter for JwtVerifier {
    fn name(&self) -> &str {
        "jwt-hs256"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaceError> {
        if self.is_configured() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy("auth.jwt_secret is not set".into()))
        }
    }

    async fn shutdown(&self) -> Result<(), SolaceError> {
        Ok(())
    }
}

#[async_trait]
impl AuthAdapter for JwtVerifier {
    async fn authenticate(&self, token: AuthToken) -> Result<AuthIdentity, SolaceError> {
        self.verify(&token.0)
    }
}

/// Signs `claims` as an HS256 token.
pub fn sign_token(secret: &[u8], claims: &Claims) -> Result<String, SolaceError> {
    let header = JwtHeader {
        alg: JWT_ALG.to_string(),
        typ: Some("JWT".to_string()),
    };
    let header_part = encode_segment(&header)?;
    let payload_part = encode_segment(claims)?;

    let mut mac = new_mac(secret)?;
    mac.update(header_part.as_bytes());
    mac.update(b".");
    mac.update(payload_part.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{header_part}.{payload_part}.{signature}"))
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            v.strip_prefix("Bearer ")
                .or_else(|| v.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that authenticates the caller and stores the
/// [`AuthIdentity`] in request extensions.
pub async fn auth_middleware(
    State(verifier): State<Arc<JwtVerifier>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).map(str::to_string);
    let identity = match token {
        Some(token) => verifier.authenticate(AuthToken(token)).await,
        None => Err(unauthorized("missing bearer token")),
    };

    match identity {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            Ok(next.run(request).await)
        }
        Err(e) => {
            let action = Action::label_from_query(request.uri().query());
            tracing::debug!(action, error = %e, "request rejected by auth");
            solace_prometheus::record_request(action, 401);
            Err(ApiError::from(e))
        }
    }
}

fn unauthorized(message: &str) -> SolaceError {
    SolaceError::Unauthorized(message.to_string())
}

fn new_mac(secret: &[u8]) -> Result<HmacSha256, SolaceError> {
    HmacSha256::new_from_slice(secret)
        .map_err(|e| SolaceError::Internal(format!("invalid HMAC key: {e}")))
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, SolaceError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| unauthorized("malformed token"))?;
    serde_json::from_slice(&bytes).map_err(|_| unauthorized("malformed token"))
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, SolaceError> {
    let json = serde_json::to_vec(value)
        .map_err(|e| SolaceError::Internal(format!("failed to encode token: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}
