//! Configuration read from the environment at startup

use crate::llm::DEFAULT_BASE_URL;
use crate::session::SessionSettings;
use std::path::PathBuf;

/// Variable holding the API credential
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1000;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Missing or blank credentials are reported when the session starts,
    /// not here
    pub api_key: Option<String>,
    pub model: String,
    pub max_output_tokens: u32,
    /// Gemini endpoint root; override to point at a gateway
    pub base_url: String,
    pub log_path: PathBuf,
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_output_tokens = lookup("GEMINI_MAX_OUTPUT_TOKENS")
            .and_then(|v| v.trim().parse().ok())
            .filter(|&n: &u32| n > 0)
            .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS);

        let log_path = lookup("GEMINI_CHAT_LOG").map_or_else(
            || {
                let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".gemini-chat").join("gemini-chat.log")
            },
            PathBuf::from,
        );

        Self {
            api_key: lookup(API_KEY_VAR),
            model: lookup("GEMINI_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_output_tokens,
            base_url: lookup("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            log_path,
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            max_output_tokens: self.max_output_tokens,
            base_url: self.base_url.clone(),
        }
    }
}
