//! Conversation state for a single user: the thread list, the active
//! thread, authentication and RAG settings.
//!
//! Invariants:
//! - there is always at least one thread
//! - `active` always indexes an existing thread
//! - every accepted user message is followed by exactly one assistant
//!   message, even when the model call fails

use super::core::Chat;
use super::models::{Message, Role, Thread};
use crate::ai::context::{RagSettings, RagSource};
use crate::bedrock::DecodingParams;

pub struct Session {
    threads: Vec<Thread>,
    active: usize,
    authenticated: bool,
    rag: RagSettings,
    params: DecodingParams,
}

impl Session {
    pub fn new(params: DecodingParams) -> Self {
        Self {
            threads: vec![Thread::new()],
            active: 0,
            authenticated: false,
            rag: RagSettings::default(),
            params,
        }
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_thread(&self) -> &Thread {
        &self.threads[self.active]
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Marks the session authenticated when `password` matches. A
    /// wrong password never clears an existing login.
    pub fn authenticate(&mut self, password: &str, expected: &str) -> bool {
        if password != expected {
            tracing::warn!("Rejected login attempt");
            return false;
        }
        self.authenticated = true;
        true
    }

    /// Threads stay in memory, only the auth flag is cleared.
    pub fn logout(&mut self) {
        self.authenticated = false;
    }

    /// Appends an empty thread and makes it active. Returns its index.
    pub fn create_thread(&mut self) -> usize {
        self.threads.push(Thread::new());
        self.active = self.threads.len() - 1;
        self.active
    }

    /// Returns false and leaves the session untouched when `index` is
    /// out of bounds.
    pub fn select_thread(&mut self, index: usize) -> bool {
        if index >= self.threads.len() {
            return false;
        }
        self.active = index;
        true
    }

    /// Removes a thread. Deleting the last thread replaces it with a
    /// new one. The active index keeps pointing at the same thread
    /// when an earlier one is removed, and at its successor (or the
    /// new last thread) when the active thread itself is removed.
    pub fn delete_thread(&mut self, index: usize) -> bool {
        if index >= self.threads.len() {
            return false;
        }
        self.threads.remove(index);

        if self.threads.is_empty() {
            self.create_thread();
        } else if index < self.active {
            self.active -= 1;
        } else if self.active >= self.threads.len() {
            self.active = self.threads.len() - 1;
        }
        true
    }

    pub fn rag(&self) -> &RagSettings {
        &self.rag
    }

    pub fn set_rag_enabled(&mut self, enabled: bool) {
        self.rag.enabled = enabled;
    }

    pub fn set_rag_source(&mut self, source: RagSource) {
        self.rag.source = Some(source);
    }

    pub fn clear_rag_source(&mut self) {
        self.rag.source = None;
    }

    pub fn params(&self) -> &DecodingParams {
        &self.params
    }

    pub fn set_params(&mut self, params: DecodingParams) {
        self.params = params;
    }

    /// Sends a user message on the active thread and appends the
    /// assistant's reply. Blank messages are ignored and yield `None`.
    pub async fn submit(&mut self, user_message: &str, chat: &Chat) -> Option<Message> {
        let user_message = user_message.trim();
        if user_message.is_empty() {
            return None;
        }

        let context = self.rag.resolve();
        let params = self.params;
        let thread = &mut self.threads[self.active];
        let history = thread.messages.clone();
        thread.push(Message::new(Role::User, user_message));

        let resp = chat
            .reply(user_message, &history, &context, &params, &thread.id)
            .await;

        let reply = Message::new(Role::Assistant, &resp.answer);
        thread.push(reply.clone());
        thread.id = resp.session_id;

        Some(reply)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DecodingParams::default())
    }
}
