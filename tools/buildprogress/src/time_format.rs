pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Compact elapsed-time text: `"27s"`, `"2m 5s"`. Partial seconds are
/// truncated, so anything under a second is `"0s"`.
pub fn format_elapsed(nanos: u64) -> String {
    let seconds = nanos / NANOS_PER_SECOND;
    if seconds >= 60 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{seconds}s")
    }
}

/// Elapsed time to display for an item of the given age, or `None` while
/// the item is not older than `threshold_secs`.
pub fn elapsed_suffix(age_nanos: u64, threshold_secs: u64) -> Option<String> {
    if age_nanos > threshold_secs.saturating_mul(NANOS_PER_SECOND) {
        Some(format_elapsed(age_nanos))
    } else {
        None
    }
}
