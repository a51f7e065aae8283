//! Prompt assembly using Handlebars for templating. Strict mode
//! catches missing fields and escaping is turned off since the output
//! is plain text for the model, not HTML.

use std::fmt;
use std::fs;

use anyhow::{Context, Result};
use handlebars::{Handlebars, RenderError};
use serde_json::json;

use crate::ai::chat::Message;

/// Number of most recent messages replayed to the model
pub const DEFAULT_HISTORY_WINDOW: usize = 8;

pub const DEFAULT_PERSONA: &str = include_str!("../../prompts/recycle.txt");

#[derive(Debug)]
pub enum Prompt {
    Chat,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// Kept on a single line so Handlebars' standalone tag whitespace
// rules never apply. The transcript is pre-rendered.
const CHAT_PROMPT: &str =
    "{{persona}}\n\n{{transcript}}{{context}}Usuário: {{message}}\n\nAssistente:";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(&Prompt::Chat.to_string(), CHAT_PROMPT)
        .expect("Failed to register template");
    registry
}

/// Builds the single text blob sent to the model: persona, a window
/// of recent history, optional context and the generation cue.
pub struct PromptBuilder {
    persona: String,
    history_window: usize,
    templates: Handlebars<'static>,
}

impl PromptBuilder {
    pub fn new(persona: &str, history_window: usize) -> Self {
        Self {
            persona: persona.trim().to_string(),
            history_window,
            templates: templates(),
        }
    }

    /// Load the persona from a document on disk.
    pub fn from_file(path: &str, history_window: usize) -> Result<Self> {
        let persona = fs::read_to_string(path)
            .with_context(|| format!("Failed to read persona from {}", path))?;
        Ok(Self::new(&persona, history_window))
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    pub fn build(
        &self,
        user_message: &str,
        history: &[Message],
        context: &str,
    ) -> Result<String, RenderError> {
        let data = json!({
            "persona": self.persona,
            "transcript": self.transcript(history),
            "context": context,
            "message": user_message,
        });
        self.templates.render(&Prompt::Chat.to_string(), &data)
    }

    fn transcript(&self, history: &[Message]) -> String {
        if history.is_empty() || self.history_window == 0 {
            return String::new();
        }
        let start = history.len().saturating_sub(self.history_window);
        let mut out = String::from("Histórico da conversa:\n");
        for msg in &history[start..] {
            out.push_str(&format!("{}: {}\n", msg.role.label(), msg.content));
        }
        out.push('\n');
        out
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_PERSONA, DEFAULT_HISTORY_WINDOW)
    }
}
