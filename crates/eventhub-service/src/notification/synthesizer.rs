//! Derives the notification feed from ticket snapshots.
//!
//! Nothing here touches storage or the clock: callers pass `now`, so the
//! same inputs always produce the same feed.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use eventhub_core::config::NotificationConfig;
use eventhub_entity::event::Event;
use eventhub_entity::notification::{NotificationKind, NotificationRecord, ReadMarkerSet};
use eventhub_entity::ticket::TicketWithEvent;
use eventhub_entity::user::UserRole;

/// Role whose perspective the ticket feed is written from.
const FEED_ROLE: UserRole = UserRole::Guest;

/// Time windows that classify an event date relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationWindows {
    /// `0 <= start - now <= reminder` fires a reminder.
    pub reminder: Duration,
    /// `reminder < start - now <= upcoming` fires an upcoming notice.
    pub upcoming: Duration,
    /// `0 <= now - start <= follow_up` fires a follow-up.
    pub follow_up: Duration,
    /// Follow-ups are timestamped this long after the event date.
    pub follow_up_offset: Duration,
}

impl Default for NotificationWindows {
    fn default() -> Self {
        Self {
            reminder: Duration::days(1),
            upcoming: Duration::days(7),
            follow_up: Duration::days(3),
            follow_up_offset: Duration::hours(12),
        }
    }
}

impl From<&NotificationConfig> for NotificationWindows {
    /// Out-of-range values fall back to the default for that window.
    fn from(config: &NotificationConfig) -> Self {
        let defaults = Self::default();
        Self {
            reminder: window(
                "reminder_window_hours",
                Duration::try_hours(config.reminder_window_hours),
                defaults.reminder,
            ),
            upcoming: window(
                "upcoming_window_days",
                Duration::try_days(config.upcoming_window_days),
                defaults.upcoming,
            ),
            follow_up: window(
                "follow_up_window_days",
                Duration::try_days(config.follow_up_window_days),
                defaults.follow_up,
            ),
            follow_up_offset: window(
                "follow_up_offset_hours",
                Duration::try_hours(config.follow_up_offset_hours),
                defaults.follow_up_offset,
            ),
        }
    }
}

fn window(field: &str, configured: Option<Duration>, fallback: Duration) -> Duration {
    configured.unwrap_or_else(|| {
        warn!(field, "Notification window out of range, using default");
        fallback
    })
}

/// Turns ticket snapshots into a sorted, deduplicated notification list.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationSynthesizer {
    windows: NotificationWindows,
}

impl NotificationSynthesizer {
    /// Create a synthesizer with explicit windows.
    pub fn new(windows: NotificationWindows) -> Self {
        Self { windows }
    }

    /// The windows in use.
    pub fn windows(&self) -> NotificationWindows {
        self.windows
    }

    /// Derive the feed for `tickets` as seen at `now`.
    ///
    /// Tickets for unapproved events, or without a resolvable event id, are
    /// skipped. Candidates with unusable timestamps are omitted. Ids already
    /// emitted are not emitted again, `is_read` reflects `read_ids`, and the
    /// result is ordered most recent first, keeping encounter order on ties.
    pub fn synthesize(
        &self,
        tickets: &[TicketWithEvent],
        read_ids: &ReadMarkerSet,
        now: DateTime<Utc>,
    ) -> Vec<NotificationRecord> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut records = Vec::new();

        for ticket in tickets {
            let Some(event) = ticket.event.as_ref() else {
                debug!(ticket_id = ?ticket.id, "Skipping ticket without event");
                continue;
            };
            if !event.is_approved() {
                continue;
            }
            let Some(event_id) = ticket.resolved_event_id() else {
                debug!(ticket_id = ?ticket.id, "Skipping ticket without event id");
                continue;
            };

            let confirmed = self.confirmed(ticket, event, event_id);
            let dated = self.dated(event, event_id, now);
            for record in confirmed.into_iter().chain(dated) {
                if seen.insert(record.id.clone()) {
                    records.push(record);
                }
            }
        }

        for record in &mut records {
            record.is_read = read_ids.contains(&record.id);
        }

        // `sort_by` is stable.
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    /// Which date bucket, if any, an event starting at `starts_at` falls in.
    ///
    /// Buckets are checked in order (reminder, upcoming, follow-up) and are
    /// mutually exclusive. Events further out than the upcoming window, or
    /// older than the follow-up window, get nothing.
    pub fn classify(&self, starts_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<NotificationKind> {
        let delta = starts_at - now;
        let zero = Duration::zero();

        if delta >= zero && delta <= self.windows.reminder {
            Some(NotificationKind::EventReminder)
        } else if delta > self.windows.reminder && delta <= self.windows.upcoming {
            Some(NotificationKind::EventUpcoming)
        } else if delta < zero && -delta <= self.windows.follow_up {
            Some(NotificationKind::EventComplete)
        } else {
            None
        }
    }

    fn confirmed(
        &self,
        ticket: &TicketWithEvent,
        event: &Event,
        event_id: &str,
    ) -> Option<NotificationRecord> {
        let ticket_id = ticket.id.as_deref()?;
        let created_at = ticket.created_at()?;
        let kind = NotificationKind::TicketConfirmed;
        Some(record(
            NotificationRecord::id_for(FEED_ROLE, ticket_id, kind),
            kind,
            format!("Your ticket for {} is confirmed.", display_title(event)),
            event,
            event_id,
            created_at,
        ))
    }

    fn dated(&self, event: &Event, event_id: &str, now: DateTime<Utc>) -> Option<NotificationRecord> {
        let starts_at = event.starts_at()?;
        let kind = self.classify(starts_at, now)?;
        let title = display_title(event);

        let (message, created_at) = match kind {
            NotificationKind::EventReminder => {
                let message = if event.location.is_empty() {
                    format!("{title} is happening within the next day.")
                } else {
                    format!("{title} is happening within the next day at {}.", event.location)
                };
                (message, now)
            }
            NotificationKind::EventUpcoming => (
                format!("{title} is coming up on {}.", starts_at.format("%a, %b %-d")),
                starts_at,
            ),
            NotificationKind::EventComplete => (
                format!("Thanks for attending {title}. We hope you had a great time."),
                starts_at.checked_add_signed(self.windows.follow_up_offset)?,
            ),
            NotificationKind::TicketConfirmed => return None,
        };

        Some(record(
            NotificationRecord::id_for(FEED_ROLE, event_id, kind),
            kind,
            message,
            event,
            event_id,
            created_at,
        ))
    }
}

/// Derive the feed with the default windows.
pub fn synthesize(
    tickets: &[TicketWithEvent],
    read_ids: &ReadMarkerSet,
    now: DateTime<Utc>,
) -> Vec<NotificationRecord> {
    NotificationSynthesizer::default().synthesize(tickets, read_ids, now)
}

fn display_title(event: &Event) -> &str {
    if event.title.trim().is_empty() {
        "your event"
    } else {
        event.title.as_str()
    }
}

fn record(
    id: String,
    kind: NotificationKind,
    message: String,
    event: &Event,
    event_id: &str,
    created_at: DateTime<Utc>,
) -> NotificationRecord {
    NotificationRecord {
        id,
        kind,
        headline: kind.headline().to_string(),
        message,
        tone: kind.tone(),
        event_id: event_id.to_string(),
        event_title: event.title.clone(),
        event_date: event.date.clone(),
        location: event.location.clone(),
        image_url: event.image_url.clone(),
        created_at,
        is_read: false,
    }
}
