//! Notification panel state machine.
//!
//! All state sits behind one [`std::sync::Mutex`] that is never held across
//! an `.await`. Animation timers and the feed fetch run as spawned tokio
//! tasks and re-enter through the mutex when they complete.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use eventhub_core::AppResult;
use eventhub_core::config::PanelConfig;
use eventhub_entity::notification::{NotificationFeed, NotificationRecord, ReadMarkerSet};

use crate::badge::BadgeStore;
use crate::session_control::SessionInvalidator;

use super::fetcher::NotificationFetcher;
use super::state::{Bounds, PanelKey, PanelSnapshot, PanelVisibility, Point};

/// Animation timings of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelTimings {
    /// Delay between mounting and applying the animated-in style.
    pub frame: Duration,
    /// Close animation length; the panel unmounts when it elapses.
    pub animation: Duration,
}

impl Default for PanelTimings {
    fn default() -> Self {
        Self::from(&PanelConfig::default())
    }
}

impl From<&PanelConfig> for PanelTimings {
    fn from(config: &PanelConfig) -> Self {
        Self {
            frame: Duration::from_millis(config.frame_ms),
            animation: Duration::from_millis(config.animation_ms),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum TimerTarget {
    /// Opening → Open.
    Frame,
    /// Closing → Closed.
    Unmount,
}

#[derive(Debug, Default)]
struct PanelState {
    visibility: PanelVisibility,
    items: Vec<NotificationRecord>,
    read_ids: ReadMarkerSet,
    loading: bool,
    loaded: bool,
    error: Option<String>,
    timer: Option<JoinHandle<()>>,
    timer_generation: u64,
    /// Bumped by `clear` and `refresh`; responses from an older epoch are stale.
    fetch_epoch: u64,
    bounds: Option<Bounds>,
    trigger_bounds: Option<Bounds>,
}

impl PanelState {
    fn unread(&self) -> i64 {
        self.items.iter().filter(|n| n.is_unread()).count() as i64
    }
}

enum FetchOutcome {
    Loaded(i64),
    SessionEnded,
    Failed,
    Dropped,
}

#[derive(Debug)]
struct PanelInner {
    state: Mutex<PanelState>,
    fetcher: Arc<dyn NotificationFetcher>,
    badge: Arc<BadgeStore>,
    session: Arc<SessionInvalidator>,
    timings: PanelTimings,
    error_message: String,
}

/// The notification dropdown.
///
/// Cloning yields another handle to the same panel.
#[derive(Debug, Clone)]
pub struct NotificationPanel {
    inner: Arc<PanelInner>,
}

impl NotificationPanel {
    /// Creates a closed panel.
    pub fn new(
        fetcher: Arc<dyn NotificationFetcher>,
        badge: Arc<BadgeStore>,
        session: Arc<SessionInvalidator>,
        config: &PanelConfig,
    ) -> Self {
        Self {
            inner: Arc::new(PanelInner {
                state: Mutex::new(PanelState::default()),
                fetcher,
                badge,
                session,
                timings: PanelTimings::from(config),
                error_message: config.error_message.clone(),
            }),
        }
    }

    /// Current lifecycle state.
    pub fn visibility(&self) -> PanelVisibility {
        self.inner.lock().visibility
    }

    /// Render view of the panel.
    pub fn snapshot(&self) -> PanelSnapshot {
        let state = self.inner.lock();
        PanelSnapshot {
            visibility: state.visibility,
            items: state.items.clone(),
            loading: state.loading,
            loaded: state.loaded,
            error: state.error.clone(),
            unread_count: self.inner.badge.get(),
        }
    }

    /// Open when closed or closing, close when open or opening.
    pub fn toggle(&self) {
        let visibility = self.inner.lock().visibility;
        match visibility {
            PanelVisibility::Closed | PanelVisibility::Closing => self.open(),
            PanelVisibility::Opening | PanelVisibility::Open => self.close(),
        }
    }

    /// Mount the panel and load the feed if this cycle has not loaded yet.
    ///
    /// Reopening while closing cancels the pending unmount and keeps the
    /// loaded list.
    pub fn open(&self) {
        let mut state = self.inner.lock();
        match state.visibility {
            PanelVisibility::Opening | PanelVisibility::Open => return,
            PanelVisibility::Closed => {
                state.loaded = false;
                state.error = None;
            }
            PanelVisibility::Closing => {}
        }
        debug!(from = ?state.visibility, "Opening notification panel");
        state.visibility = PanelVisibility::Opening;
        self.inner.arm(&mut state, TimerTarget::Frame);
        self.inner.start_fetch(&mut state);
    }

    /// Start the close animation. No-op unless open or opening.
    pub fn close(&self) {
        let mut state = self.inner.lock();
        self.inner.begin_close(&mut state);
    }

    /// Drop the list and fetch again if the panel is showing.
    pub fn refresh(&self) {
        let mut state = self.inner.lock();
        state.loaded = false;
        state.items.clear();
        state.error = None;
        state.fetch_epoch = state.fetch_epoch.wrapping_add(1);
        self.inner.start_fetch(&mut state);
    }

    /// Acknowledge every visible notification and empty the list.
    pub async fn clear(&self) {
        {
            let mut state = self.inner.lock();
            let ids: Vec<String> = state.items.drain(..).map(|n| n.id).collect();
            state.read_ids.mark_all(ids);
            state.loaded = true;
            state.error = None;
            state.fetch_epoch = state.fetch_epoch.wrapping_add(1);
        }
        self.inner.badge.set(0).await;
    }

    /// Remove one notification from the list and mark it read.
    ///
    /// Returns `false` if no visible notification has that id.
    pub async fn dismiss(&self, id: &str) -> bool {
        let unread = {
            let mut state = self.inner.lock();
            let Some(pos) = state.items.iter().position(|n| n.id == id) else {
                return false;
            };
            let removed = state.items.remove(pos);
            state.read_ids.mark(removed.id);
            state.unread()
        };
        self.inner.badge.set(unread).await;
        true
    }

    /// Mark every visible notification read, keeping the list.
    pub async fn mark_all_read(&self) {
        {
            let mut state = self.inner.lock();
            let PanelState {
                items, read_ids, ..
            } = &mut *state;
            for item in items.iter_mut() {
                item.is_read = true;
                read_ids.mark(item.id.clone());
            }
        }
        self.inner.badge.set(0).await;
    }

    /// Register the panel's on-screen rectangle.
    pub fn set_bounds(&self, bounds: Bounds) {
        self.inner.lock().bounds = Some(bounds);
    }

    /// Register the toggle button's rectangle; presses there never count as
    /// outside.
    pub fn set_trigger_bounds(&self, bounds: Bounds) {
        self.inner.lock().trigger_bounds = Some(bounds);
    }

    /// Close on a pointer press outside the panel and its trigger.
    ///
    /// Ignored until the panel's bounds are registered.
    pub fn handle_pointer_down(&self, point: Point) {
        let mut state = self.inner.lock();
        let Some(bounds) = state.bounds else {
            return;
        };
        if bounds.contains(point) || state.trigger_bounds.is_some_and(|t| t.contains(point)) {
            return;
        }
        self.inner.begin_close(&mut state);
    }

    /// Close on Escape.
    pub fn handle_key(&self, key: impl Into<PanelKey>) {
        if key.into() == PanelKey::Escape {
            self.close();
        }
    }
}

impl PanelInner {
    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn begin_close(self: &Arc<Self>, state: &mut PanelState) {
        if !matches!(
            state.visibility,
            PanelVisibility::Open | PanelVisibility::Opening
        ) {
            return;
        }
        debug!(from = ?state.visibility, "Closing notification panel");
        state.visibility = PanelVisibility::Closing;
        self.arm(state, TimerTarget::Unmount);
    }

    /// Replace the pending timer with a new one.
    fn arm(self: &Arc<Self>, state: &mut PanelState, target: TimerTarget) {
        if let Some(pending) = state.timer.take() {
            pending.abort();
        }
        state.timer_generation = state.timer_generation.wrapping_add(1);
        let generation = state.timer_generation;
        let delay = match target {
            TimerTarget::Frame => self.timings.frame,
            TimerTarget::Unmount => self.timings.animation,
        };

        let inner = Arc::clone(self);
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.timer_fired(generation, target);
        }));
    }

    fn timer_fired(&self, generation: u64, target: TimerTarget) {
        let mut state = self.lock();
        if state.timer_generation != generation {
            return;
        }
        state.timer = None;
        match (target, state.visibility) {
            (TimerTarget::Frame, PanelVisibility::Opening) => {
                state.visibility = PanelVisibility::Open;
            }
            (TimerTarget::Unmount, PanelVisibility::Closing) => {
                state.visibility = PanelVisibility::Closed;
                debug!("Notification panel unmounted");
            }
            _ => {}
        }
    }

    fn start_fetch(self: &Arc<Self>, state: &mut PanelState) {
        let showing = matches!(
            state.visibility,
            PanelVisibility::Opening | PanelVisibility::Open
        );
        if !showing || state.loaded || state.loading {
            return;
        }
        state.loading = true;
        state.error = None;
        let epoch = state.fetch_epoch;

        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let result = inner.fetcher.fetch().await;
            inner.finish_fetch(epoch, result).await;
        });
    }

    async fn finish_fetch(
        self: &Arc<Self>,
        epoch: u64,
        result: AppResult<NotificationFeed>,
    ) {
        let outcome = {
            let mut state = self.lock();
            state.loading = false;
            let outcome = self.apply_fetch(&mut state, epoch, result);
            if matches!(outcome, FetchOutcome::Dropped) {
                // A refresh issued while this fetch was in flight still needs its own load.
                self.start_fetch(&mut state);
            }
            outcome
        };

        match outcome {
            FetchOutcome::Loaded(unread) => self.badge.set(unread).await,
            FetchOutcome::SessionEnded => self.session.invalidate().await,
            FetchOutcome::Failed | FetchOutcome::Dropped => {}
        }
    }

    fn apply_fetch(
        self: &Arc<Self>,
        state: &mut PanelState,
        epoch: u64,
        result: AppResult<NotificationFeed>,
    ) -> FetchOutcome {
        if state.visibility == PanelVisibility::Closed {
            debug!("Dropping notification response for closed panel");
            return FetchOutcome::Dropped;
        }
        if state.fetch_epoch != epoch {
            debug!("Dropping notification response superseded by clear or refresh");
            return FetchOutcome::Dropped;
        }

        match result {
            Ok(feed) => {
                let mut items = feed.notifications;
                for item in &mut items {
                    item.is_read = item.is_read || state.read_ids.contains(&item.id);
                }
                state.items = items;
                state.loaded = true;
                state.error = None;
                FetchOutcome::Loaded(state.unread())
            }
            Err(e) if e.is_session_fatal() => {
                warn!(error = %e, "Notification API rejected the session");
                state.items.clear();
                state.loaded = false;
                state.error = None;
                self.begin_close(state);
                FetchOutcome::SessionEnded
            }
            Err(e) => {
                warn!(error = %e, "Failed to load notifications");
                state.loaded = false;
                state.error = Some(self.error_message.clone());
                FetchOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use eventhub_cache::memory::MemoryStore;
    use eventhub_core::AppError;
    use eventhub_core::config::{BadgeConfig, MemoryCacheConfig};
    use eventhub_core::events::SessionSignal;
    use eventhub_core::traits::store::KeyValueStore;
    use eventhub_core::types::id::ContextId;
    use eventhub_entity::notification::NotificationKind;

    #[derive(Debug, Default)]
    struct ScriptedFetcher {
        calls: AtomicUsize,
        delay: Duration,
        responses: Mutex<VecDeque<AppResult<NotificationFeed>>>,
    }

    impl ScriptedFetcher {
        fn with(responses: Vec<AppResult<NotificationFeed>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NotificationFetcher for ScriptedFetcher {
        async fn fetch(&self) -> AppResult<NotificationFeed> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(sample_feed()))
        }
    }

    fn record(id: &str, hour: u32) -> NotificationRecord {
        let kind = NotificationKind::TicketConfirmed;
        NotificationRecord {
            id: id.to_string(),
            kind,
            headline: kind.headline().to_string(),
            message: "Your ticket is confirmed.".to_string(),
            tone: kind.tone(),
            event_id: "e1".to_string(),
            event_title: "Gala".to_string(),
            event_date: None,
            location: String::new(),
            image_url: None,
            created_at: Utc.with_ymd_and_hms(2026, 6, 1, hour, 0, 0).unwrap(),
            is_read: false,
        }
    }

    fn sample_feed() -> NotificationFeed {
        NotificationFeed::new(vec![
            record("guest:t2:confirmed", 12),
            record("guest:t1:confirmed", 9),
        ])
    }

    struct Harness {
        panel: NotificationPanel,
        fetcher: Arc<ScriptedFetcher>,
        badge: Arc<BadgeStore>,
        session: Arc<SessionInvalidator>,
        store: Arc<dyn KeyValueStore>,
    }

    async fn harness(fetcher: ScriptedFetcher) -> Harness {
        let config = PanelConfig::default();
        let store: Arc<dyn KeyValueStore> =
            Arc::new(MemoryStore::new(&MemoryCacheConfig { max_capacity: 100 }, 16));
        store
            .set(&config.credentials_key, "token-1", ContextId::new())
            .await
            .unwrap();
        let badge = Arc::new(BadgeStore::connect(Arc::clone(&store), &BadgeConfig::default()).await);
        let session = Arc::new(SessionInvalidator::new(
            Arc::clone(&store),
            config.credentials_key.clone(),
            "/sign-in",
            badge.context_id(),
        ));
        let fetcher = Arc::new(fetcher);
        let panel = NotificationPanel::new(
            fetcher.clone(),
            Arc::clone(&badge),
            Arc::clone(&session),
            &config,
        );
        Harness {
            panel,
            fetcher,
            badge,
            session,
            store,
        }
    }

    async fn settle(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_close_cycle() {
        let h = harness(ScriptedFetcher::default()).await;

        h.panel.open();
        assert_eq!(h.panel.visibility(), PanelVisibility::Opening);
        settle(20).await;

        let snap = h.panel.snapshot();
        assert_eq!(snap.visibility, PanelVisibility::Open);
        assert!(snap.loaded);
        assert!(!snap.loading);
        assert_eq!(snap.items.len(), 2);
        assert_eq!(h.badge.get(), 2);

        h.panel.close();
        assert_eq!(h.panel.visibility(), PanelVisibility::Closing);
        settle(200).await;
        assert_eq!(h.panel.visibility(), PanelVisibility::Closing);
        settle(100).await;
        assert_eq!(h.panel.visibility(), PanelVisibility::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_fetch_per_open_cycle() {
        let h = harness(ScriptedFetcher::default()).await;

        h.panel.open();
        h.panel.open();
        h.panel.toggle();
        assert_eq!(h.panel.visibility(), PanelVisibility::Closing);
        h.panel.toggle();
        assert_eq!(h.panel.visibility(), PanelVisibility::Opening);
        settle(20).await;
        assert_eq!(h.panel.visibility(), PanelVisibility::Open);
        assert_eq!(h.fetcher.calls(), 1);

        // Reopening mid-close keeps the loaded list.
        h.panel.close();
        settle(100).await;
        h.panel.open();
        settle(20).await;
        assert_eq!(h.fetcher.calls(), 1);

        h.panel.close();
        settle(300).await;
        assert_eq!(h.panel.visibility(), PanelVisibility::Closed);
        h.panel.open();
        settle(20).await;
        assert_eq!(h.fetcher.calls(), 2);
    }

    fn delayed(ms: u64) -> ScriptedFetcher {
        ScriptedFetcher {
            delay: Duration::from_millis(ms),
            ..ScriptedFetcher::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_during_fetch_discards_response() {
        let h = harness(delayed(500)).await;

        h.panel.open();
        settle(20).await;
        assert!(h.panel.snapshot().loading);

        h.panel.clear().await;
        settle(600).await;

        let snap = h.panel.snapshot();
        assert!(snap.items.is_empty());
        assert!(snap.loaded);
        assert!(!snap.loading);
        assert_eq!(h.badge.get(), 0);
        assert_eq!(h.fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_during_fetch_fetches_again() {
        let h = harness(ScriptedFetcher {
            delay: Duration::from_millis(500),
            responses: Mutex::new(
                vec![Ok(NotificationFeed::new(vec![record("guest:old:confirmed", 8)]))].into(),
            ),
            ..ScriptedFetcher::default()
        })
        .await;

        h.panel.open();
        settle(20).await;
        h.panel.refresh();
        assert_eq!(h.fetcher.calls(), 1);

        settle(500).await;
        assert_eq!(h.fetcher.calls(), 2);
        let snap = h.panel.snapshot();
        assert!(snap.loading);
        assert!(snap.items.is_empty());

        settle(600).await;
        let snap = h.panel.snapshot();
        assert_eq!(h.fetcher.calls(), 2);
        assert!(snap.loaded);
        assert!(!snap.loading);
        let ids: Vec<&str> = snap.items.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["guest:t2:confirmed", "guest:t1:confirmed"]);
        assert_eq!(h.badge.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reopen_after_unmount_reuses_pending_fetch() {
        let h = harness(delayed(1000)).await;

        h.panel.open();
        settle(20).await;
        h.panel.close();
        settle(300).await;
        assert_eq!(h.panel.visibility(), PanelVisibility::Closed);
        assert!(h.panel.snapshot().loading);

        h.panel.open();
        settle(20).await;
        assert_eq!(h.panel.visibility(), PanelVisibility::Open);
        assert_eq!(h.fetcher.calls(), 1);

        settle(1000).await;
        let snap = h.panel.snapshot();
        assert_eq!(h.fetcher.calls(), 1);
        assert!(snap.loaded);
        assert!(!snap.loading);
        assert_eq!(snap.items.len(), 2);
        assert_eq!(h.badge.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_while_opening_cancels_frame() {
        let h = harness(ScriptedFetcher::default()).await;

        h.panel.open();
        h.panel.toggle();
        settle(20).await;
        assert_eq!(h.panel.visibility(), PanelVisibility::Closing);
        settle(300).await;
        assert_eq!(h.panel.visibility(), PanelVisibility::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_after_unmount_is_dropped() {
        let fetcher = ScriptedFetcher {
            delay: Duration::from_millis(1000),
            ..ScriptedFetcher::default()
        };
        let h = harness(fetcher).await;

        h.panel.open();
        settle(20).await;
        assert!(h.panel.snapshot().loading);
        h.panel.close();
        settle(300).await;
        assert_eq!(h.panel.visibility(), PanelVisibility::Closed);

        settle(1000).await;
        let snap = h.panel.snapshot();
        assert!(!snap.loading);
        assert!(!snap.loaded);
        assert!(snap.items.is_empty());
        assert_eq!(h.badge.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_failure_ends_session() {
        let h = harness(ScriptedFetcher::with(vec![Err(AppError::authentication(
            "expired",
        ))]))
        .await;
        let mut signals = h.session.subscribe();

        h.panel.open();
        settle(20).await;

        let snap = h.panel.snapshot();
        assert_eq!(snap.visibility, PanelVisibility::Closing);
        assert!(snap.error.is_none());
        assert_eq!(signals.recv().await.unwrap(), SessionSignal::ended("/sign-in"));
        let token = h.store.get(&PanelConfig::default().credentials_key).await.unwrap();
        assert!(token.is_none());

        settle(300).await;
        assert_eq!(h.panel.visibility(), PanelVisibility::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_then_refresh() {
        let h = harness(ScriptedFetcher::with(vec![Err(AppError::external_service(
            "502",
        ))]))
        .await;

        h.panel.open();
        settle(20).await;
        let snap = h.panel.snapshot();
        assert_eq!(snap.visibility, PanelVisibility::Open);
        assert_eq!(snap.error.as_deref(), Some(PanelConfig::default().error_message.as_str()));
        assert!(!snap.loaded);

        h.panel.refresh();
        settle(1).await;
        let snap = h.panel.snapshot();
        assert_eq!(h.fetcher.calls(), 2);
        assert!(snap.error.is_none());
        assert_eq!(snap.items.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_marks_visible_items_read() {
        let h = harness(ScriptedFetcher::default()).await;
        h.panel.open();
        settle(20).await;

        h.panel.clear().await;
        let snap = h.panel.snapshot();
        assert!(snap.items.is_empty());
        assert!(snap.loaded);
        assert!(snap.is_empty());
        assert_eq!(h.badge.get(), 0);

        h.panel.refresh();
        settle(1).await;
        let snap = h.panel.snapshot();
        assert_eq!(snap.items.len(), 2);
        assert!(snap.items.iter().all(|n| n.is_read));
        assert_eq!(h.badge.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_and_mark_all_read() {
        let h = harness(ScriptedFetcher::default()).await;
        h.panel.open();
        settle(20).await;

        assert!(h.panel.dismiss("guest:t2:confirmed").await);
        assert!(!h.panel.dismiss("guest:t2:confirmed").await);
        assert_eq!(h.panel.snapshot().items.len(), 1);
        assert_eq!(h.badge.get(), 1);

        h.panel.mark_all_read().await;
        let snap = h.panel.snapshot();
        assert_eq!(snap.items.len(), 1);
        assert!(snap.items[0].is_read);
        assert_eq!(snap.unread_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_outside_press_and_escape_close() {
        let h = harness(ScriptedFetcher::default()).await;
        h.panel.set_bounds(Bounds::new(0.0, 40.0, 320.0, 400.0));
        h.panel.set_trigger_bounds(Bounds::new(280.0, 0.0, 32.0, 32.0));
        h.panel.open();
        settle(20).await;

        h.panel.handle_pointer_down(Point::new(100.0, 100.0));
        h.panel.handle_pointer_down(Point::new(290.0, 10.0));
        assert_eq!(h.panel.visibility(), PanelVisibility::Open);

        h.panel.handle_pointer_down(Point::new(600.0, 600.0));
        assert_eq!(h.panel.visibility(), PanelVisibility::Closing);

        h.panel.open();
        settle(20).await;
        h.panel.handle_key("Enter");
        assert_eq!(h.panel.visibility(), PanelVisibility::Open);
        h.panel.handle_key(PanelKey::Escape);
        assert_eq!(h.panel.visibility(), PanelVisibility::Closing);
    }
}
