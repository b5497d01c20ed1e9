use crate::types::RunningAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'a> {
    /// Shown actions in ascending start order.
    pub shown: Vec<&'a RunningAction>,
    /// Running actions left out of `shown`.
    pub elided: usize,
}

/// Chooses which running actions to display within `max_items` slots.
///
/// `running` must be sorted by start time (ties by key), as produced by
/// `StateTracker::snapshot`. The oldest action always gets a slot, even when
/// `max_items` is zero, since it is the one most likely to be stuck. The
/// remaining slots go to the most recently started actions.
pub fn select_visible(running: &[RunningAction], max_items: usize) -> Selection<'_> {
    let budget = max_items.max(1);
    let Some((oldest, rest)) = running.split_first() else {
        return Selection {
            shown: Vec::new(),
            elided: 0,
        };
    };

    let newest = budget.saturating_sub(1).min(rest.len());
    let mut shown = Vec::with_capacity(newest + 1);
    shown.push(oldest);
    shown.extend(&rest[rest.len() - newest..]);

    Selection {
        elided: running.len() - shown.len(),
        shown,
    }
}
