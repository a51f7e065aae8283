//! Router for the threads API

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use tokio::sync::Mutex;

use super::public;
use crate::api::state::AppState;

type SharedState = Arc<Mutex<AppState>>;

fn thread_not_found(index: usize) -> Response {
    (
        StatusCode::NOT_FOUND,
        format!("Thread {} not found", index),
    )
        .into_response()
}

/// List every thread and which one is active
async fn thread_list(State(state): State<SharedState>) -> Json<public::ThreadsResponse> {
    let mut state = state.lock().await;
    Json(public::ThreadsResponse::from(&*state.session()))
}

/// Start a new empty thread and make it active
async fn thread_create(
    State(state): State<SharedState>,
) -> (StatusCode, Json<public::ThreadResponse>) {
    let mut state = state.lock().await;
    let session = state.session();
    session.create_thread();
    (
        StatusCode::CREATED,
        Json(public::ThreadResponse::from(&*session)),
    )
}

/// The active thread with its messages
async fn thread_active(State(state): State<SharedState>) -> Json<public::ThreadResponse> {
    let mut state = state.lock().await;
    Json(public::ThreadResponse::from(&*state.session()))
}

async fn thread_select(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
) -> Response {
    let mut state = state.lock().await;
    let session = state.session();
    if !session.select_thread(index) {
        return thread_not_found(index);
    }
    Json(public::ThreadResponse::from(&*session)).into_response()
}

async fn thread_delete(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
) -> Response {
    let mut state = state.lock().await;
    let session = state.session();
    if !session.delete_thread(index) {
        return thread_not_found(index);
    }
    Json(public::ThreadsResponse::from(&*session)).into_response()
}

/// Create the threads router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(thread_list).post(thread_create))
        .route("/active", get(thread_active))
        .route("/{index}/select", post(thread_select))
        .route("/{index}", delete(thread_delete))
}
