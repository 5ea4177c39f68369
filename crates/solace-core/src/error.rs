// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Solace chat service.

use thiserror::Error;

/// The primary error type used across all Solace adapter traits and core operations.
#[derive(Debug, Error)]
pub enum SolaceError {
    /// Configuration errors (invalid TOML, missing required fields, missing secrets).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// LLM provider errors (API failure, malformed response, empty choices).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Missing, malformed, expired, or wrongly signed bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The requested record does not exist or is not owned by the caller.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller has used up today's message allowance.
    #[error("daily message limit of {limit} reached, try again tomorrow")]
    RateLimited { limit: u32 },

    /// The request failed validation (empty message, unknown action, bad body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SolaceError {
    /// HTTP status code this error maps to when surfaced to a client.
    pub fn status_code(&self) -> u16 {
        match self {
            SolaceError::Unauthorized(_) => 401,
            SolaceError::NotFound(_) => 404,
            SolaceError::RateLimited { .. } => 429,
            SolaceError::InvalidRequest(_) => 400,
            SolaceError::Config(_)
            | SolaceError::Storage { .. }
            | SolaceError::Provider { .. }
            | SolaceError::Internal(_) => 500,
        }
    }
}
