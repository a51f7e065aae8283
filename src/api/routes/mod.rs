//! API routes module

pub mod auth;
pub mod chat;
pub mod params;
pub mod rag;
pub mod threads;

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;

use crate::api::state::AppState;

type SharedState = Arc<Mutex<AppState>>;

/// Rejects requests until the session has logged in
async fn require_auth(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let authenticated = state.lock().await.session().is_authenticated();
    if !authenticated {
        return (StatusCode::UNAUTHORIZED, "Login required").into_response();
    }
    next.run(request).await
}

/// Create the combined API router
pub fn router(state: SharedState) -> Router<SharedState> {
    let protected = Router::new()
        // Conversation threads
        .nest("/threads", threads::router())
        // Sending messages
        .nest("/chat", chat::router())
        // Context augmentation
        .nest("/rag", rag::router())
        // Decoding parameters
        .nest("/params", params::router())
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new().nest("/auth", auth::router()).merge(protected)
}
