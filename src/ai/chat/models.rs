//! The core models for a conversation: messages grouped into threads.
use chrono::Local;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

impl Role {
    /// Speaker label used when replaying a transcript to the model.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "Usuário",
            Role::Assistant => "Assistente",
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Local wall clock time the message was appended, `HH:MM`
    pub time: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
            time: Local::now().format("%H:%M").to_string(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Thread {
    /// Session identifier returned by the model gateway, empty until
    /// the first reply
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
}

impl Thread {
    pub fn new() -> Self {
        Self {
            id: String::new(),
            title: default_title(),
            messages: Vec::new(),
        }
    }

    pub fn push(&mut self, msg: Message) {
        self.messages.push(msg)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Thread {
    fn default() -> Self {
        Self::new()
    }
}

fn default_title() -> String {
    format!("Nova Conversa ({})", Local::now().format("%d/%m/%Y"))
}
