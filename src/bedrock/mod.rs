//! Model gateway for Anthropic models hosted on AWS Bedrock.
mod client;
pub(crate) mod core;

pub use self::client::BedrockRuntime;
pub use self::core::{
    ANTHROPIC_VERSION, CONNECTION_FALLBACK, DEFAULT_MODEL_ID, DecodingParams, GatewayError,
    INVOCATION_FALLBACK, InvokeModel, ModelGateway, ModelResponse, parse_answer, request_body,
    resolve_session_id,
};
