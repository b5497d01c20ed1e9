//! Shared state of in-flight work, updated by event ingestion and read by the
//! renderer.
//!
//! All state lives behind one mutex. Readers take a [`TrackerSnapshot`] and
//! format from the copy, so rendering never holds the lock while writing.

use crate::events::ProgressEvent;
use crate::types::{ActionKey, RunningAction, TestCounters};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct TrackerState {
    running: BTreeMap<ActionKey, RunningAction>,
    actions_completed: usize,
    tests: TestCounters,
}

/// Point-in-time copy of the tracker. `running` is ordered by start time,
/// ties broken by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerSnapshot {
    pub running: Vec<RunningAction>,
    pub actions_completed: usize,
    pub tests: TestCounters,
}

impl TrackerSnapshot {
    pub fn oldest(&self) -> Option<&RunningAction> {
        self.running.first()
    }
}

#[derive(Debug, Default)]
pub struct StateTracker {
    state: Mutex<TrackerState>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a started action. A second start for a key that is still
    /// running replaces the earlier entry.
    pub fn action_started(&self, key: ActionKey, message: Option<String>, start_nanos: u64) {
        let action = RunningAction {
            key: key.clone(),
            message,
            start_nanos,
        };
        self.state().running.insert(key, action);
    }

    /// Removes a running action. Unknown keys are ignored, which covers
    /// duplicate and out-of-order completions.
    pub fn action_completion(&self, key: &ActionKey) {
        let mut state = self.state();
        if state.running.remove(key).is_some() {
            state.actions_completed = state.actions_completed.saturating_add(1);
        }
    }

    pub fn test_filtering_complete(&self, target_count: usize) {
        self.state().tests.total = Some(target_count);
    }

    pub fn test_summary(&self) {
        let mut state = self.state();
        let next = state.tests.completed.saturating_add(1);
        state.tests.completed = match state.tests.total {
            Some(total) => next.min(total),
            None => next,
        };
    }

    pub fn apply(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::ActionStarted {
                primary_output,
                message,
                start_nanos,
            } => self.action_started(primary_output.clone(), message.clone(), *start_nanos),
            ProgressEvent::ActionCompletion { primary_output } => {
                self.action_completion(primary_output)
            }
            ProgressEvent::TestFilteringComplete { test_targets } => {
                self.test_filtering_complete(ProgressEvent::distinct_target_count(test_targets))
            }
            ProgressEvent::TestSummary { .. } => self.test_summary(),
        }
    }

    /// True when the rendered progress would change from the passage of time
    /// alone, i.e. while anything is running.
    pub fn is_time_dependent(&self) -> bool {
        !self.state().running.is_empty()
    }

    pub fn running_count(&self) -> usize {
        self.state().running.len()
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        let state = self.state();
        let mut running = state.running.values().cloned().collect::<Vec<_>>();
        let tests = state.tests;
        let actions_completed = state.actions_completed;
        drop(state);

        running.sort_by(|a, b| {
            a.start_nanos
                .cmp(&b.start_nanos)
                .then_with(|| a.key.cmp(&b.key))
        });
        TrackerSnapshot {
            running,
            actions_completed,
            tests,
        }
    }
}
