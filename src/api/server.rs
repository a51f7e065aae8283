use std::sync::Arc;

use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::ai::chat::Chat;
use crate::api::state::AppState;
use crate::core::{AppConfig, init_tracing};

pub fn app(shared_state: Arc<Mutex<AppState>>) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .nest("/api", routes::router(Arc::clone(&shared_state)))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

// Run the server
pub async fn serve(host: String, port: String, config: AppConfig) -> anyhow::Result<()> {
    // axum logs rejections from built-in extractors with the `axum::rejection`
    // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
    init_tracing(&format!(
        "{}=debug,tower_http=debug,axum::rejection=trace",
        env!("CARGO_CRATE_NAME")
    ));

    let chat = Chat::from_config(&config)?;
    tracing::info!(
        "Using model {} in {}",
        chat.gateway().model_id(),
        config.aws_region
    );

    let app_state = AppState::new(chat, config);
    let shared_state = Arc::new(Mutex::new(app_state));
    let app = app(shared_state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;

    tracing::debug!("Server started. Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
