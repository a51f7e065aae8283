//! Router for the decoding parameters API

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::sync::Mutex;

use super::public;
use crate::api::state::AppState;

type SharedState = Arc<Mutex<AppState>>;

async fn params_get(State(state): State<SharedState>) -> Json<public::DecodingParams> {
    let mut state = state.lock().await;
    Json(*state.session().params())
}

/// Replace the decoding parameters used for the following messages
async fn params_set(
    State(state): State<SharedState>,
    Json(payload): Json<public::DecodingParams>,
) -> Response {
    if let Some(reason) = public::validate(&payload) {
        return (StatusCode::BAD_REQUEST, reason).into_response();
    }
    let mut state = state.lock().await;
    state.session().set_params(payload);
    Json(payload).into_response()
}

/// Create the decoding parameters router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(params_get).put(params_set))
}
