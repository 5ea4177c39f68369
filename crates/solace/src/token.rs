// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `solace token` command implementation.

use solace_config::SolaceConfig;
use solace_core::SolaceError;
use solace_gateway::{Audience, Claims, sign_token};

/// Mints an HS256 token for `user` signed with `auth.jwt_secret`.
pub fn run_token(
    config: &SolaceConfig,
    user: &str,
    ttl_secs: u64,
    email: Option<String>,
) -> Result<String, SolaceError> {
    let secret = config
        .auth
        .jwt_secret
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SolaceError::Config("auth.jwt_secret is not set".into()))?;

    if user.trim().is_empty() {
        return Err(SolaceError::InvalidRequest("--user must not be empty".into()));
    }

    let now = chrono::Utc::now().timestamp();
    let ttl = i64::try_from(ttl_secs)
        .map_err(|_| SolaceError::InvalidRequest("--ttl-secs is too large".into()))?;

    let claims = Claims {
        sub: user.to_string(),
        exp: now.saturating_add(ttl),
        iat: Some(now),
        aud: config
            .auth
            .audience
            .clone()
            .filter(|a| !a.is_empty())
            .map(Audience::One),
        email,
        role: Some("authenticated".to_string()),
    };

    sign_token(secret.as_bytes(), &claims)
}
