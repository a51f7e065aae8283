//! Test utilities for integration tests
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use tokio::sync::Mutex;
use tower::util::ServiceExt;

use recycle::ai::chat::ChatBuilder;
use recycle::api::AppState;
use recycle::api::app;
use recycle::bedrock::{DecodingParams, GatewayError, InvokeModel, ModelGateway};
use recycle::core::AppConfig;

pub const TEST_PASSWORD: &str = "admin123";

/// Stands in for Bedrock. Answers every prompt with the same text, or
/// fails like an unreachable service.
pub struct FakeModel {
    answer: Option<String>,
    requests: std::sync::Mutex<Vec<serde_json::Value>>,
}

impl FakeModel {
    pub fn answering(text: &str) -> Self {
        Self {
            answer: Some(text.to_string()),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            answer: None,
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// The most recent request body sent to the model
    pub fn last_request(&self) -> serde_json::Value {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }

    /// The prompt text of the most recent request
    pub fn last_prompt(&self) -> String {
        self.last_request()["messages"][0]["content"][0]["text"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

#[async_trait]
impl InvokeModel for FakeModel {
    async fn invoke_model(&self, _model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, GatewayError> {
        let request: serde_json::Value = serde_json::from_slice(&body).unwrap();
        self.requests.lock().unwrap().push(request);

        match &self.answer {
            Some(text) => Ok(serde_json::json!({
                "content": [{"type": "text", "text": text}]
            })
            .to_string()
            .into_bytes()),
            None => Err(GatewayError::Connection("no credentials".to_string())),
        }
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        aws_profile: String::from("test"),
        aws_region: String::from("us-east-1"),
        bedrock_endpoint: None,
        model_id: String::from("test-model"),
        password: String::from(TEST_PASSWORD),
        persona_path: None,
        history_window: 8,
        decoding_params: DecodingParams::default(),
    }
}

/// Creates a test application router answering with `model`
pub fn test_app_with(model: Arc<FakeModel>) -> Router {
    let gateway = ModelGateway::new(model, "test-model");
    let chat = ChatBuilder::new(gateway)
        .persona("Você é o assistente do Recycle.")
        .build();
    let app_state = AppState::new(chat, test_config());
    app(Arc::new(Mutex::new(app_state)))
}

/// Creates a test application router whose model always answers "ok"
pub fn test_app() -> Router {
    test_app_with(Arc::new(FakeModel::answering("ok")))
}

/// Read the body of a response as a string
pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read the body of a response as JSON
pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).unwrap()
}

/// Build a JSON request
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a request without a body
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .body(Body::empty())
        .unwrap()
}

/// Log the session in with the shared password
pub async fn login(app: &Router) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({"password": TEST_PASSWORD}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
