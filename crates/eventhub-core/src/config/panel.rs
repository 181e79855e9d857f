//! Notification panel configuration.

use serde::{Deserialize, Serialize};

/// Client-side notification panel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Close animation duration; the panel unmounts after it elapses.
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,
    /// Delay between mounting and applying the animated-in style.
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    /// Base URL of the notification API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Durable store key holding the session's bearer token.
    #[serde(default = "default_credentials_key")]
    pub credentials_key: String,
    /// Message shown in place of the list when a fetch fails.
    #[serde(default = "default_error_message")]
    pub error_message: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            animation_ms: default_animation_ms(),
            frame_ms: default_frame_ms(),
            api_base_url: default_api_base_url(),
            credentials_key: default_credentials_key(),
            error_message: default_error_message(),
        }
    }
}

fn default_animation_ms() -> u64 {
    280
}

fn default_frame_ms() -> u64 {
    16
}

fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_credentials_key() -> String {
    "eventhub:session:token".to_string()
}

fn default_error_message() -> String {
    "Couldn't load notifications. Try again.".to_string()
}
