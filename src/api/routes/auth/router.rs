//! Router for the auth API

use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use tokio::sync::Mutex;

use super::public;
use crate::api::state::AppState;

type SharedState = Arc<Mutex<AppState>>;

/// Log in with the shared password
async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<public::LoginRequest>,
) -> (StatusCode, Json<public::AuthResponse>) {
    let mut state = state.lock().await;
    let expected = state.config.password.clone();
    let authenticated = state.session().authenticate(&payload.password, &expected);
    let status = if authenticated {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (status, Json(public::AuthResponse { authenticated }))
}

/// Log out. Threads are kept for the next login.
async fn logout(State(state): State<SharedState>) -> Json<public::AuthResponse> {
    state.lock().await.session().logout();
    Json(public::AuthResponse {
        authenticated: false,
    })
}

/// Create the auth router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}
