use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Identity of a running action: its primary output location. Treated as an
/// opaque key; ordering is plain lexicographic order on the path text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionKey(String);

impl ActionKey {
    pub fn new(primary_output: impl Into<String>) -> Self {
        Self(primary_output.into())
    }

    pub fn from_primary_output(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningAction {
    pub key: ActionKey,
    pub message: Option<String>,
    pub start_nanos: u64,
}

impl RunningAction {
    /// Text shown for the action: its progress message, or the key when the
    /// message is missing or blank.
    pub fn description(&self) -> &str {
        match self.message.as_deref() {
            Some(message) if !message.trim().is_empty() => message,
            _ => self.key.as_str(),
        }
    }

    pub fn age_nanos(&self, now_nanos: u64) -> u64 {
        now_nanos.saturating_sub(self.start_nanos)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestCounters {
    pub total: Option<usize>,
    pub completed: usize,
}

impl TestCounters {
    /// `(completed, total)` for display, never showing more completed than
    /// total. `None` until a test phase has been announced.
    pub fn visible(&self) -> Option<(usize, usize)> {
        self.total.map(|total| (self.completed.min(total), total))
    }
}
