//! HTTP handlers

use std::net::SocketAddr;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use serde_json::{Value, json};
use shared::{Component, MessageReply, MessageRequest, SessionCreated, ThreadCreated, component_debug, component_info};
use uuid::Uuid;

use crate::core::validate_message_request;
use crate::error::{ProxyError, ProxyResult};
use crate::state::AppState;
use crate::traits::{AssistantApi, Sleeper};
use crate::web::client_key::{client_ip, message_key, session_key};

/// `POST /api/sessions`
pub async fn create_session<A, S>(
    State(state): State<AppState<A, S>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> ProxyResult<Json<SessionCreated>>
where
    A: AssistantApi + 'static,
    S: Sleeper + 'static,
{
    let session_id = open_session(&state, peer, &headers).await?;
    Ok(Json(SessionCreated { session_id }))
}

/// `POST /api/threads`, answering `{ threadId }` for embeds that predate sessions
pub async fn create_thread<A, S>(
    State(state): State<AppState<A, S>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> ProxyResult<Json<ThreadCreated>>
where
    A: AssistantApi + 'static,
    S: Sleeper + 'static,
{
    let thread_id = open_session(&state, peer, &headers).await?;
    Ok(Json(ThreadCreated { thread_id }))
}

async fn open_session<A, S>(
    state: &AppState<A, S>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: &HeaderMap,
) -> ProxyResult<String>
where
    A: AssistantApi + 'static,
    S: Sleeper + 'static,
{
    let ip = client_ip(headers, peer.map(|ConnectInfo(addr)| addr));
    let key = session_key(&ip);
    if !state.rate_limiter.check(&key, state.rate_limits.sessions) {
        return Err(ProxyError::RateLimited { key });
    }

    state.conversation.create_session().await
}

/// `POST /api/messages`
///
/// The rate limit is charged before the body is validated, so malformed
/// floods count against the caller too.
pub async fn send_message<A, S>(
    State(state): State<AppState<A, S>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Result<Json<MessageRequest>, JsonRejection>,
) -> ProxyResult<Json<MessageReply>>
where
    A: AssistantApi + 'static,
    S: Sleeper + 'static,
{
    let ip = client_ip(&headers, peer.map(|ConnectInfo(addr)| addr));
    let key = message_key(&ip);
    if !state.rate_limiter.check(&key, state.rate_limits.messages) {
        return Err(ProxyError::RateLimited { key });
    }

    let Json(request) = body.map_err(|rejection| {
        component_debug!(Component::current(), rejection = %rejection, "Unparseable message body");
        ProxyError::validation("Invalid JSON body")
    })?;
    let validated = validate_message_request(request, state.max_message_chars)?;

    let request_id = Uuid::new_v4();
    component_info!(
        Component::current(),
        request_id = %request_id,
        session_id = %validated.session_id,
        chars = validated.message.chars().count(),
        "Forwarding message to assistant"
    );

    // Cancelled on server shutdown, or when this future is dropped
    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    let reply = state.conversation.exchange(validated, &cancel).await?;

    component_info!(
        Component::current(),
        request_id = %request_id,
        session_id = %reply.session_id,
        "Assistant replied"
    );
    Ok(Json(reply))
}

/// `GET /health`
pub async fn health_check<A, S>(State(state): State<AppState<A, S>>) -> Json<Value>
where
    A: AssistantApi + 'static,
    S: Sleeper + 'static,
{
    Json(json!({
        "status": "ok",
        "uptime_seconds": state.uptime_seconds(),
        "rate_limit_entries": state.rate_limiter.len(),
    }))
}
