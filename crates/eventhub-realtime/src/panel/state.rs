//! Panel state values exposed to the rendering layer.

use serde::{Deserialize, Serialize};

use eventhub_entity::notification::NotificationRecord;

/// Visibility lifecycle of the panel.
///
/// The panel cycles `Closed → Opening → Open → Closing → Closed`. It is
/// mounted in every state but `Closed`; only `Open` carries the
/// animated-in style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelVisibility {
    /// Not mounted.
    #[default]
    Closed,
    /// Mounted, waiting one frame before animating in.
    Opening,
    /// Mounted and fully visible.
    Open,
    /// Animating out; unmounts when the animation completes.
    Closing,
}

impl PanelVisibility {
    /// Whether the panel is in the tree.
    pub fn is_mounted(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Whether the animated-in style applies.
    pub fn is_animated_in(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// A pointer position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle used for hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `point` lies inside (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Keys the panel reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelKey {
    Escape,
    Other(String),
}

impl From<&str> for PanelKey {
    fn from(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Immutable view of the panel for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSnapshot {
    /// Current lifecycle state.
    pub visibility: PanelVisibility,
    /// Visible notifications, most recent first.
    pub items: Vec<NotificationRecord>,
    /// A fetch is in flight.
    pub loading: bool,
    /// The list reflects a completed fetch (or an explicit clear).
    pub loaded: bool,
    /// Retryable error shown in place of the list.
    pub error: Option<String>,
    /// Badge value at snapshot time.
    pub unread_count: u64,
}

impl PanelSnapshot {
    /// Whether an empty-state message should be shown.
    pub fn is_empty(&self) -> bool {
        self.loaded && self.items.is_empty() && self.error.is_none()
    }
}
