//! Bearer-token session configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Static bearer-token grants and the sign-in redirect target.
///
/// Token issuance lives outside EventHub; this section only tells the
/// API which opaque tokens map to which user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token → grant mapping.
    #[serde(default)]
    pub tokens: HashMap<String, TokenGrant>,
    /// Where clients are sent after their session ends.
    #[serde(default = "default_sign_in_path")]
    pub sign_in_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            tokens: HashMap::new(),
            sign_in_path: default_sign_in_path(),
        }
    }
}

/// The identity a bearer token resolves to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    /// External user identifier.
    pub user_id: String,
    /// Role name: `"guest"`, `"organizer"`, or `"admin"`.
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_sign_in_path() -> String {
    "/sign-in".to_string()
}

fn default_role() -> String {
    "guest".to_string()
}
