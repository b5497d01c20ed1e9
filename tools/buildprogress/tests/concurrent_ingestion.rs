use buildprogress::config::DisplayConfig;
use buildprogress::render::{render_full, render_short};
use buildprogress::terminal_writer::StringTerminalWriter;
use buildprogress::tracker::StateTracker;
use buildprogress::types::ActionKey;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[test]
fn rendering_while_workers_ingest_sees_consistent_state() {
    let tracker = Arc::new(StateTracker::new());
    tracker.action_started(ActionKey::from("anchor"), Some("Anchor action".to_string()), 0);
    tracker.test_filtering_complete(16);
    let done = Arc::new(AtomicBool::new(false));
    let config = DisplayConfig::default();

    std::thread::scope(|scope| {
        let renderer = {
            let tracker = Arc::clone(&tracker);
            let done = Arc::clone(&done);
            let config = config.clone();
            scope.spawn(move || {
                while !done.load(Ordering::Acquire) {
                    let mut full = StringTerminalWriter::new();
                    render_full(&tracker, &mut full, u64::MAX, &config).expect("full");
                    assert!(full.written().contains("Anchor action"));
                    assert!(full.lines().len() <= 1 + config.max_running_lines + 1);

                    let mut short = StringTerminalWriter::new();
                    render_short(&tracker, &mut short, u64::MAX, &config).expect("short");
                    assert!(short.written().contains("Anchor action"));
                    assert!(!short.written().contains('\n'));
                }
            })
        };

        let workers = (0..16u64)
            .map(|worker| {
                let tracker = Arc::clone(&tracker);
                scope.spawn(move || {
                    for i in 0..200u64 {
                        let key = ActionKey::new(format!("out/{worker}/{i}"));
                        tracker.action_started(key.clone(), Some(format!("Step {i}")), 1 + i);
                        tracker.action_completion(&key);
                    }
                    tracker.test_summary();
                })
            })
            .collect::<Vec<_>>();
        for worker in workers {
            worker.join().expect("worker");
        }
        done.store(true, Ordering::Release);
        renderer.join().expect("renderer");
    });

    let snapshot = tracker.snapshot();
    assert_eq!(snapshot.running.len(), 1);
    assert_eq!(snapshot.actions_completed, 16 * 200);
    assert_eq!(snapshot.tests.visible(), Some((16, 16)));
    assert!(tracker.is_time_dependent());
}
