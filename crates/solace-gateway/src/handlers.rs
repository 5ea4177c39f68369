// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! `/v1/chat` dispatches on the `action` query parameter. `/health` and
//! `/metrics` are public.

use std::str::FromStr;

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use solace_core::types::{CreateSessionRequest, SendMessageRequest};
use solace_core::{AuthIdentity, Message, Session};

use crate::error::ApiError;
use crate::server::GatewayState;

/// The chat API operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum Action {
    CreateSession,
    SendMessage,
    GetSessions,
    GetMessages,
    GetUserStats,
}

impl Action {
    /// Metric label for the `action` parameter of a raw query string.
    pub fn label_from_query(query: Option<&str>) -> &'static str {
        query
            .into_iter()
            .flat_map(|q| q.split('&'))
            .find_map(|pair| pair.strip_prefix("action="))
            .and_then(|value| Action::from_str(value).ok())
            .map_or("unknown", <&'static str>::from)
    }
}

/// Query string of `/v1/chat`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatQuery {
    pub action: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetMessagesBody {
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: Session,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<Session>,
}

#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// GET|POST /v1/chat?action=...
pub async fn chat_action(
    State(state): State<GatewayState>,
    Extension(identity): Extension<AuthIdentity>,
    query: Result<Query<ChatQuery>, QueryRejection>,
    body: Bytes,
) -> Response {
    let (label, result) = match query {
        Err(rejection) => ("unknown", Err(ApiError::bad_request(rejection.body_text()))),
        Ok(Query(query)) => {
            match query.action.as_deref().map(|raw| (raw, Action::from_str(raw))) {
                None => (
                    "unknown",
                    Err(ApiError::bad_request("missing `action` query parameter")),
                ),
                Some((raw, Err(_))) => (
                    "unknown",
                    Err(ApiError::bad_request(format!("unknown action `{raw}`"))),
                ),
                Some((_, Ok(action))) => (
                    <&'static str>::from(action),
                    dispatch(&state, &identity, action, &query, &body).await,
                ),
            }
        }
    };

    let response = result.unwrap_or_else(IntoResponse::into_response);
    let status = response.status().as_u16();
    solace_prometheus::record_request(label, status);
    tracing::debug!(user_id = %identity.user_id, action = label, status, "chat action handled");
    response
}

async fn dispatch(
    state: &GatewayState,
    identity: &AuthIdentity,
    action: Action,
    query: &ChatQuery,
    body: &Bytes,
) -> Result<Response, ApiError> {
    let user_id = identity.user_id.as_str();
    let response = match action {
        Action::CreateSession => {
            let request: CreateSessionRequest = parse_optional_body(body)?;
            let session = state.chat.create_session(user_id, request).await?;
            Json(SessionResponse { session }).into_response()
        }
        Action::SendMessage => {
            let request: SendMessageRequest = parse_body(body)?;
            Json(state.chat.send_message(user_id, request).await?).into_response()
        }
        Action::GetSessions => {
            let sessions = state.chat.list_sessions(user_id).await?;
            Json(SessionListResponse { sessions }).into_response()
        }
        Action::GetMessages => {
            let session_id = match query.session_id.as_deref().filter(|s| !s.is_empty()) {
                Some(id) => id.to_string(),
                None => parse_optional_body::<GetMessagesBody>(body)?
                    .session_id
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| ApiError::bad_request("`sessionId` is required"))?,
            };
            let messages = state.chat.list_messages(user_id, &session_id).await?;
            Json(MessageListResponse { messages }).into_response()
        }
        Action::GetUserStats => Json(state.chat.user_stats(user_id).await?).into_response(),
    };
    Ok(response)
}

/// Parses a required JSON body.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::bad_request("request body is required"));
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("malformed request body: {e}")))
}

/// Parses a JSON body that may be absent.
fn parse_optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    parse_body(body)
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

/// GET /metrics
///
/// 404 when Prometheus is disabled.
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics not enabled").into_response(),
    }
}
