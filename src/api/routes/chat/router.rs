//! Router for the chat API

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use tokio::sync::Mutex;

use super::public;
use crate::api::state::AppState;

type SharedState = Arc<Mutex<AppState>>;

/// Send a message on the active thread and wait for the reply.
///
/// The state lock is held for the whole model call so actions on the
/// session run one at a time.
async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::ChatRequest>,
) -> Response {
    let mut state = state.lock().await;
    let (session, chat) = state.session_and_chat();

    match session.submit(&payload.message, chat).await {
        Some(message) => Json(public::ChatResponse {
            message,
            thread_index: session.active_index(),
            session_id: session.active_thread().id.clone(),
        })
        .into_response(),
        // Blank messages don't create a turn
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(chat_handler))
}
