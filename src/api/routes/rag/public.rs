//! Public types for the RAG (context augmentation) API
use serde::{Deserialize, Serialize};

use crate::ai::context::{RagSettings, RagSourceSummary};

#[derive(Deserialize)]
pub struct RagToggleRequest {
    pub enabled: bool,
}

#[derive(Deserialize)]
pub struct RagTextRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct RagResponse {
    pub enabled: bool,
    pub source: Option<RagSourceSummary>,
}

impl From<&RagSettings> for RagResponse {
    fn from(settings: &RagSettings) -> Self {
        Self {
            enabled: settings.enabled,
            source: settings.source.as_ref().map(|s| s.summary()),
        }
    }
}
