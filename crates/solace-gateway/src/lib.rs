// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Solace chat service.
//!
//! Authenticates bearer tokens, dispatches `/v1/chat?action=...` to
//! [`ChatService`](solace_chat::ChatService), and maps errors to
//! `{ "error": ... }` responses.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::{Audience, Claims, JwtVerifier, sign_token};
pub use error::{ApiError, ErrorResponse};
pub use server::{GatewayState, HealthState, router, start_server};
