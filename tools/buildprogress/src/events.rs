//! Typed notifications consumed by the tracker, and the JSON Lines event
//! stream format used to replay them.
//!
//! Each line of a stream is one [`EventRecord`]:
//!
//! ```text
//! {"at_nanos":125000000000,"type":"action_started","primary_output":"bin/foo","message":"Building foo","start_nanos":125000000000}
//! {"at_nanos":130000000000,"type":"action_completion","primary_output":"bin/foo"}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use crate::errors::ProgressError;
use crate::types::ActionKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    ActionStarted {
        primary_output: ActionKey,
        #[serde(default)]
        message: Option<String>,
        start_nanos: u64,
    },
    ActionCompletion {
        primary_output: ActionKey,
    },
    TestFilteringComplete {
        test_targets: Vec<String>,
    },
    TestSummary {
        #[serde(default)]
        target: Option<String>,
    },
}

impl ProgressEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ActionStarted { .. } => "action_started",
            Self::ActionCompletion { .. } => "action_completion",
            Self::TestFilteringComplete { .. } => "test_filtering_complete",
            Self::TestSummary { .. } => "test_summary",
        }
    }

    /// Number of distinct targets announced by a filtering event.
    pub fn distinct_target_count(targets: &[String]) -> usize {
        targets.iter().collect::<BTreeSet<_>>().len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub at_nanos: u64,
    #[serde(flatten)]
    pub event: ProgressEvent,
}

pub fn parse_event_stream(text: &str) -> Result<Vec<EventRecord>, ProgressError> {
    let mut records = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let record: EventRecord =
            serde_json::from_str(line).map_err(|e| ProgressError::EventParse {
                line: idx + 1,
                message: e.to_string(),
            })?;
        records.push(record);
    }
    Ok(records)
}
