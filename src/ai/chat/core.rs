use std::sync::Arc;

use anyhow::Result;

use super::models::Message;
use crate::ai::prompt::{DEFAULT_HISTORY_WINDOW, DEFAULT_PERSONA, PromptBuilder};
use crate::bedrock::{
    BedrockRuntime, DecodingParams, INVOCATION_FALLBACK, ModelGateway, ModelResponse,
    resolve_session_id,
};
use crate::core::AppConfig;

/// Produces assistant turns: assembles the prompt for a user message
/// and hands it to the model gateway.
///
/// The remote service keeps no conversation state, so the replayed
/// history in the prompt is the only memory the model has.
///
/// Use `ChatBuilder` to construct a `Chat`.
pub struct Chat {
    prompt: PromptBuilder,
    gateway: ModelGateway,
}

impl Chat {
    /// Build a `Chat` talking to Bedrock using the app configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let runtime = BedrockRuntime::from_config(config);
        let gateway = ModelGateway::new(Arc::new(runtime), &config.model_id);
        let prompt = match &config.persona_path {
            Some(path) => PromptBuilder::from_file(path, config.history_window)?,
            None => PromptBuilder::new(DEFAULT_PERSONA, config.history_window),
        };
        Ok(ChatBuilder::new(gateway).prompt(prompt).build())
    }

    pub fn prompt(&self) -> &PromptBuilder {
        &self.prompt
    }

    pub fn gateway(&self) -> &ModelGateway {
        &self.gateway
    }

    /// Runs the next turn. `history` is the thread's transcript before
    /// `user_message`. Always returns an answer, falling back to a
    /// fixed apology when anything goes wrong.
    pub async fn reply(
        &self,
        user_message: &str,
        history: &[Message],
        context: &str,
        params: &DecodingParams,
        session_id: &str,
    ) -> ModelResponse {
        let prompt = match self.prompt.build(user_message, history, context) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::error!("Failed to render chat prompt: {}", e);
                return ModelResponse {
                    answer: INVOCATION_FALLBACK.to_string(),
                    session_id: resolve_session_id(session_id),
                };
            }
        };
        self.gateway.respond(&prompt, params, session_id).await
    }
}

pub struct ChatBuilder {
    gateway: ModelGateway,
    persona: String,
    history_window: usize,
    prompt: Option<PromptBuilder>,
}

impl ChatBuilder {
    pub fn new(gateway: ModelGateway) -> Self {
        Self {
            gateway,
            persona: DEFAULT_PERSONA.to_string(),
            history_window: DEFAULT_HISTORY_WINDOW,
            prompt: None,
        }
    }

    pub fn persona(mut self, persona: &str) -> Self {
        self.persona = persona.to_string();
        self
    }

    pub fn history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    /// Use a ready made prompt builder. Overrides `persona` and
    /// `history_window`.
    pub fn prompt(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn build(self) -> Chat {
        let prompt = self
            .prompt
            .unwrap_or_else(|| PromptBuilder::new(&self.persona, self.history_window));
        Chat {
            prompt,
            gateway: self.gateway,
        }
    }
}
