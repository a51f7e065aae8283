use std::env;
use std::str::FromStr;

use crate::ai::prompt::DEFAULT_HISTORY_WINDOW;
use crate::bedrock::{DEFAULT_MODEL_ID, DecodingParams};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub aws_profile: String,
    pub aws_region: String,
    pub bedrock_endpoint: Option<String>,
    pub model_id: String,
    pub password: String,
    pub persona_path: Option<String>,
    pub history_window: usize,
    pub decoding_params: DecodingParams,
}

/// Reads a numeric env var, keeping `default` when the var is missing
/// or can't be parsed.
fn env_or<T: FromStr + Copy>(key: &str, default: T) -> T {
    parse_or(key, env::var(key).ok(), default)
}

fn parse_or<T: FromStr + Copy>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value for {}: {}", key, raw);
            default
        }),
        None => default,
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let defaults = DecodingParams::default();
        let aws_profile = env::var("AWS_PROFILE").unwrap_or_else(|_| "default".to_string());
        let aws_region =
            env::var("RECYCLE_AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        let bedrock_endpoint = env::var("RECYCLE_BEDROCK_ENDPOINT").ok();
        let model_id =
            env::var("RECYCLE_MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string());
        let password = env::var("RECYCLE_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
        let persona_path = env::var("RECYCLE_PERSONA_PATH").ok();
        let history_window = env_or("RECYCLE_HISTORY_WINDOW", DEFAULT_HISTORY_WINDOW);
        let decoding_params = DecodingParams {
            temperature: env_or("RECYCLE_TEMPERATURE", defaults.temperature),
            top_p: env_or("RECYCLE_TOP_P", defaults.top_p),
            top_k: env_or("RECYCLE_TOP_K", defaults.top_k),
            max_tokens: env_or("RECYCLE_MAX_TOKENS", defaults.max_tokens),
        };

        Self {
            aws_profile,
            aws_region,
            bedrock_endpoint,
            model_id,
            password,
            persona_path,
            history_window,
            decoding_params,
        }
    }
}
