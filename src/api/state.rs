use crate::ai::chat::{Chat, Session};
use crate::core::AppConfig;

pub struct AppState {
    // Created on the first request that touches it
    session: Option<Session>,
    pub chat: Chat,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(chat: Chat, config: AppConfig) -> Self {
        Self {
            session: None,
            chat,
            config,
        }
    }

    pub fn session(&mut self) -> &mut Session {
        self.session_and_chat().0
    }

    /// The session together with the chat that answers on it.
    pub fn session_and_chat(&mut self) -> (&mut Session, &Chat) {
        let params = self.config.decoding_params;
        let session = self.session.get_or_insert_with(|| Session::new(params));
        (session, &self.chat)
    }
}
