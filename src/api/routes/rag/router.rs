//! Router for the RAG API

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::sync::Mutex;

use super::public;
use crate::ai::context::RagSource;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::documents::DocumentKind;

type SharedState = Arc<Mutex<AppState>>;

async fn rag_get(State(state): State<SharedState>) -> Json<public::RagResponse> {
    let mut state = state.lock().await;
    Json(public::RagResponse::from(state.session().rag()))
}

/// Turn context augmentation on or off
async fn rag_toggle(
    State(state): State<SharedState>,
    Json(payload): Json<public::RagToggleRequest>,
) -> Json<public::RagResponse> {
    let mut state = state.lock().await;
    let session = state.session();
    session.set_rag_enabled(payload.enabled);
    Json(public::RagResponse::from(session.rag()))
}

async fn rag_clear(State(state): State<SharedState>) -> Json<public::RagResponse> {
    let mut state = state.lock().await;
    let session = state.session();
    session.clear_rag_source();
    Json(public::RagResponse::from(session.rag()))
}

/// Use pasted text as the context source
async fn rag_text(
    State(state): State<SharedState>,
    Json(payload): Json<public::RagTextRequest>,
) -> Json<public::RagResponse> {
    let mut state = state.lock().await;
    let session = state.session();
    session.set_rag_source(RagSource::Text(payload.text));
    Json(public::RagResponse::from(session.rag()))
}

/// Use an uploaded PDF, TXT or CSV as the context source. The file is
/// read from the `file` field of a multipart form.
async fn rag_file(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(ApiError::bad_request)?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let Some(kind) = DocumentKind::from_file_name(&name) else {
            return Ok((
                StatusCode::BAD_REQUEST,
                format!("Unsupported file type: {}", name),
            )
                .into_response());
        };
        let bytes = field
            .bytes()
            .await
            .map_err(ApiError::bad_request)?
            .to_vec();
        tracing::info!("Received {} upload {} ({} bytes)", kind, name, bytes.len());

        let mut state = state.lock().await;
        let session = state.session();
        session.set_rag_source(RagSource::File { kind, name, bytes });
        return Ok(Json(public::RagResponse::from(session.rag())).into_response());
    }

    Ok((StatusCode::BAD_REQUEST, "Missing file field").into_response())
}

/// Create the RAG router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(rag_get).put(rag_toggle).delete(rag_clear))
        .route("/text", post(rag_text))
        .route(
            "/file",
            post(rag_file).layer(DefaultBodyLimit::disable()),
        )
}
