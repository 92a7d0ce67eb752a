use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use tokio_stream::StreamExt;

use crate::errors::AppError;
use crate::models::{ChatRequest, ComposedReply};
use crate::services::chat;
use crate::state::AppState;

pub(crate) fn required_message(
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<String, AppError> {
    payload
        .ok()
        .and_then(|Json(body)| body.message().map(str::to_string))
        .ok_or_else(|| {
            tracing::warn!("chat request without a message");
            AppError::Validation("No message provided".to_string())
        })
}

// POST /api/chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ComposedReply>, AppError> {
    let message = required_message(payload)?;
    tracing::debug!(message = %message, "received chat request");

    let reply = chat::process_message(&state, &message).await;
    tracing::info!(kind = ?reply.kind, "sending chat reply");
    Ok(Json(reply))
}

// POST /api/chat/stream (SSE of reply fragments)
pub async fn chat_stream(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    let message = required_message(payload)?;

    let fragments = chat::stream_message(&state, &message).await;
    let events = fragments.map(|fragment| {
        Ok::<_, Infallible>(Event::default().data(fragment.to_json().to_string()))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
