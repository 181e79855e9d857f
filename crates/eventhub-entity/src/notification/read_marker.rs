//! Session-local set of acknowledged notification ids.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Notification ids the user has acknowledged during this session.
///
/// The set only grows: there is deliberately no removal operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadMarkerSet {
    ids: HashSet<String>,
}

impl ReadMarkerSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one id as read. Returns `true` if it was not already marked.
    pub fn mark(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    /// Mark many ids as read.
    pub fn mark_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
    }

    /// Whether `id` has been acknowledged.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of acknowledged ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing has been acknowledged yet.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ReadMarkerSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.mark_all(iter);
        set
    }
}
