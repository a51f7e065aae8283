//! Public types for the threads API
use serde::Serialize;

use crate::ai::chat::{Session, Thread};

#[derive(Serialize)]
pub struct ThreadSummary {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub message_count: usize,
}

#[derive(Serialize)]
pub struct ThreadsResponse {
    pub threads: Vec<ThreadSummary>,
    pub active: usize,
}

impl From<&Session> for ThreadsResponse {
    fn from(session: &Session) -> Self {
        let threads = session
            .threads()
            .iter()
            .enumerate()
            .map(|(index, thread)| ThreadSummary {
                index,
                id: thread.id.clone(),
                title: thread.title.clone(),
                message_count: thread.messages.len(),
            })
            .collect();
        Self {
            threads,
            active: session.active_index(),
        }
    }
}

#[derive(Serialize)]
pub struct ThreadResponse {
    pub index: usize,
    pub thread: Thread,
}

impl From<&Session> for ThreadResponse {
    fn from(session: &Session) -> Self {
        Self {
            index: session.active_index(),
            thread: session.active_thread().clone(),
        }
    }
}
