//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::ai::chat::Message;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    /// The assistant's reply, already appended to the active thread
    pub message: Message,
    pub thread_index: usize,
    pub session_id: String,
}
