//! Cross-context signals.
//!
//! Signals are fire-and-forget broadcasts consumed by navigation and
//! auth collaborators outside the notification core.

use serde::{Deserialize, Serialize};

/// Session lifecycle signal broadcast to every interested listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionSignal {
    /// The session ended; stored credentials have been cleared and the
    /// user should be sent to `redirect_to`.
    Ended {
        /// Sign-in location the navigation layer should move to.
        redirect_to: String,
    },
}

impl SessionSignal {
    /// Build an `Ended` signal.
    pub fn ended(redirect_to: impl Into<String>) -> Self {
        Self::Ended {
            redirect_to: redirect_to.into(),
        }
    }
}
