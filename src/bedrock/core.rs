use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Inference profile used when none is configured
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-3-5-sonnet-20241022-v2:0";

pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

pub const CONNECTION_FALLBACK: &str =
    "Não foi possível conectar ao serviço Bedrock. Verifique suas credenciais.";

pub const INVOCATION_FALLBACK: &str =
    "Ocorreu um erro ao processar sua solicitação. Por favor, tente novamente.";

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct DecodingParams {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_tokens: u32,
}

impl Default for DecodingParams {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 0.85,
            top_k: 200,
            max_tokens: 800,
        }
    }
}

// {
//   "anthropic_version": "bedrock-2023-05-31",
//   "max_tokens": 800, "temperature": 1.0, "top_p": 0.85, "top_k": 200,
//   "messages": [{"role": "user", "content": [{"type": "text", "text": "..."}]}]
// }
#[derive(Serialize, Debug)]
struct ModelRequest<'a> {
    anthropic_version: &'static str,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
    top_k: u32,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Serialize, Debug)]
struct RequestMessage<'a> {
    role: &'static str,
    content: Vec<RequestContent<'a>>,
}

#[derive(Serialize, Debug)]
struct RequestContent<'a> {
    r#type: &'static str,
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct ModelResponseBody {
    content: Vec<ResponseContent>,
}

#[derive(Deserialize, Debug)]
struct ResponseContent {
    text: Option<String>,
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("unable to connect to Bedrock: {0}")]
    Connection(String),
    #[error("model invocation failed: {0}")]
    Invocation(String),
    #[error("failed to serialize model request: {0}")]
    Serialization(String),
    #[error("malformed model response: {0}")]
    MalformedResponse(String),
    #[error("model response has no text content")]
    EmptyResponse,
}

impl GatewayError {
    /// The text shown to the user in place of an answer.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            GatewayError::Connection(_) => CONNECTION_FALLBACK,
            _ => INVOCATION_FALLBACK,
        }
    }
}

/// Transport to the remote inference service. Takes a serialized
/// request body and returns the raw response body.
#[async_trait]
pub trait InvokeModel: Send + Sync {
    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, GatewayError>;
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ModelResponse {
    pub answer: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Serialize the request envelope for a single user turn.
pub fn request_body(prompt: &str, params: &DecodingParams) -> Result<Vec<u8>, GatewayError> {
    let request = ModelRequest {
        anthropic_version: ANTHROPIC_VERSION,
        max_tokens: params.max_tokens,
        temperature: params.temperature,
        top_p: params.top_p,
        top_k: params.top_k,
        messages: vec![RequestMessage {
            role: "user",
            content: vec![RequestContent {
                r#type: "text",
                text: prompt,
            }],
        }],
    };
    serde_json::to_vec(&request).map_err(|e| GatewayError::Serialization(e.to_string()))
}

/// Only the first content block's text is read.
pub fn parse_answer(body: &[u8]) -> Result<String, GatewayError> {
    let resp: ModelResponseBody =
        serde_json::from_slice(body).map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
    resp.content
        .into_iter()
        .next()
        .and_then(|c| c.text)
        .ok_or(GatewayError::EmptyResponse)
}

/// Reuses the caller's identifier when there is one.
pub fn resolve_session_id(session_id: &str) -> String {
    if session_id.trim().is_empty() {
        Uuid::new_v4().to_string()
    } else {
        session_id.to_string()
    }
}

#[derive(Clone)]
pub struct ModelGateway {
    backend: Arc<dyn InvokeModel>,
    model_id: String,
}

impl ModelGateway {
    pub fn new(backend: Arc<dyn InvokeModel>, model_id: &str) -> Self {
        Self {
            backend,
            model_id: model_id.to_string(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Send the prompt to the model and return the answer text.
    pub async fn invoke(&self, prompt: &str, params: &DecodingParams) -> Result<String, GatewayError> {
        let body = request_body(prompt, params)?;
        tracing::debug!(
            "Invoking model {} with {} byte request",
            self.model_id,
            body.len()
        );
        let resp = self.backend.invoke_model(&self.model_id, body).await?;
        parse_answer(&resp)
    }

    /// Like `invoke` but never fails. Errors are logged and replaced
    /// with their fixed user facing text.
    pub async fn respond(
        &self,
        prompt: &str,
        params: &DecodingParams,
        session_id: &str,
    ) -> ModelResponse {
        let answer = match self.invoke(prompt, params).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("Model gateway error: {}", e);
                e.fallback_message().to_string()
            }
        };
        ModelResponse {
            answer,
            session_id: resolve_session_id(session_id),
        }
    }
}
