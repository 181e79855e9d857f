//! Client-side session invalidation.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};

use eventhub_core::events::SessionSignal;
use eventhub_core::traits::store::KeyValueStore;
use eventhub_core::types::id::ContextId;

/// Default capacity of the session signal channel.
const SIGNAL_CAPACITY: usize = 8;

/// Clears stored credentials and tells the rest of the client to sign in
/// again.
///
/// Navigation and auth state live outside the notification core; they
/// learn about the ended session from [`SessionInvalidator::subscribe`].
#[derive(Debug)]
pub struct SessionInvalidator {
    /// Durable store holding the credentials.
    store: Arc<dyn KeyValueStore>,
    /// Key of the stored bearer token.
    credentials_key: String,
    /// Sign-in location sent with the signal.
    redirect_to: String,
    /// Context performing the deletion.
    context: ContextId,
    /// Signal fan-out.
    signals: broadcast::Sender<SessionSignal>,
}

impl SessionInvalidator {
    /// Creates a new invalidator.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        credentials_key: impl Into<String>,
        redirect_to: impl Into<String>,
        context: ContextId,
    ) -> Self {
        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self {
            store,
            credentials_key: credentials_key.into(),
            redirect_to: redirect_to.into(),
            context,
            signals,
        }
    }

    /// Listen for session signals.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionSignal> {
        self.signals.subscribe()
    }

    /// End the session: clear the stored token and broadcast
    /// [`SessionSignal::Ended`].
    ///
    /// The signal is sent even if the credentials could not be cleared.
    /// Calling this again simply repeats both steps.
    pub async fn invalidate(&self) {
        if let Err(e) = self.store.delete(&self.credentials_key, self.context).await {
            warn!(
                key = %self.credentials_key,
                error = %e,
                "Failed to clear stored credentials"
            );
        }

        info!(redirect_to = %self.redirect_to, "Session ended, redirecting to sign-in");
        // Nobody listening is fine.
        let _ = self.signals.send(SessionSignal::ended(self.redirect_to.clone()));
    }
}
