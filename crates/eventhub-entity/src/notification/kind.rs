//! Notification kind and tone enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a derived notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    /// The guest's ticket was issued.
    TicketConfirmed,
    /// The event starts within the reminder window.
    EventReminder,
    /// The event starts within the upcoming window.
    EventUpcoming,
    /// The event took place recently.
    EventComplete,
}

impl NotificationKind {
    /// Return the kind as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TicketConfirmed => "ticket-confirmed",
            Self::EventReminder => "event-reminder",
            Self::EventUpcoming => "event-upcoming",
            Self::EventComplete => "event-complete",
        }
    }

    /// Trailing segment of notification ids of this kind.
    pub fn id_suffix(&self) -> &'static str {
        match self {
            Self::TicketConfirmed => "confirmed",
            Self::EventReminder => "reminder",
            Self::EventUpcoming => "upcoming",
            Self::EventComplete => "completed",
        }
    }

    /// Display headline.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::TicketConfirmed => "Ticket confirmed",
            Self::EventReminder => "Happening soon",
            Self::EventUpcoming => "Upcoming event",
            Self::EventComplete => "Thanks for joining",
        }
    }

    /// Visual tone.
    pub fn tone(&self) -> Tone {
        match self {
            Self::TicketConfirmed => Tone::Success,
            Self::EventReminder => Tone::Highlight,
            Self::EventUpcoming => Tone::Info,
            Self::EventComplete => Tone::Default,
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Visual styling hint for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Positive outcome.
    Success,
    /// Needs attention now.
    Highlight,
    /// Neutral information.
    Info,
    /// No emphasis.
    Default,
}
