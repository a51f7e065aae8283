//! Public API types

use axum::response::{IntoResponse, Response};
use http::StatusCode;

// Errors

pub struct ApiError {
    status: StatusCode,
    error: anyhow::Error,
}

impl ApiError {
    /// An error caused by the request itself, answered with a 400.
    pub fn bad_request(err: impl Into<anyhow::Error>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: err.into(),
        }
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{}", self.error);
            return (
                self.status,
                format!("Something went wrong: {}", self.error),
            )
                .into_response();
        }

        tracing::warn!("Rejected request: {}", self.error);
        (self.status, self.error.to_string()).into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: err.into(),
        }
    }
}

// Re-export public types from each route

pub mod auth {
    pub use crate::api::routes::auth::public::*;
}

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}

pub mod params {
    pub use crate::api::routes::params::public::*;
}

pub mod rag {
    pub use crate::api::routes::rag::public::*;
}

pub mod threads {
    pub use crate::api::routes::threads::public::*;
}
