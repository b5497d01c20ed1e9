use assert_cmd::cargo::cargo_bin_cmd;

fn fixture(path: &str) -> String {
    format!("{}/tests/fixtures/{path}", env!("CARGO_MANIFEST_DIR"))
}

fn stdout_of(args: &[&str]) -> String {
    let mut cmd = cargo_bin_cmd!("buildprogress");
    cmd.args(args);
    let out = cmd.assert().success();
    String::from_utf8(out.get_output().stdout.clone()).expect("utf8")
}

#[test]
fn help_lists_flags() {
    let stdout = stdout_of(&["--help"]);
    assert!(stdout.contains("--events"));
    assert!(stdout.contains("--short"));
    assert!(stdout.contains("--follow"));
}

#[test]
fn full_view_of_replayed_build() {
    let events = fixture("events/build.jsonl");
    let stdout = stdout_of(&["--events", &events]);
    assert_eq!(
        stdout,
        "Building [1 done, 2 running]; 1 / 2 tests\n    Compiling foo.cc; 27s\n    Linking app\n"
    );
}

#[test]
fn short_view_of_replayed_build() {
    let events = fixture("events/build.jsonl");
    let stdout = stdout_of(&["--events", &events, "--short"]);
    assert_eq!(
        stdout,
        "Building Compiling foo.cc; 27s ... (+1 more); 1 / 2 tests\n"
    );
}

#[test]
fn render_time_can_be_moved_forward() {
    let events = fixture("events/build.jsonl");
    let stdout = stdout_of(&["--events", &events, "--short", "--now-nanos", "185000000000"]);
    assert!(stdout.contains("Compiling foo.cc; 1m 0s"), "stdout: {stdout}");
}

#[test]
fn follow_prints_a_line_per_event_without_tty() {
    let events = fixture("events/build.jsonl");
    let stdout = stdout_of(&["--events", &events, "--follow"]);
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 7 + 3);
    assert!(lines[0].starts_with("status=building running=1 message=Building Compiling foo.cc"));
    assert!(lines[4].ends_with("; 0 / 2 tests"));
}

#[test]
fn config_file_and_flags_shape_the_view() {
    let events = fixture("events/build.jsonl");
    let config = fixture("configs/wide.toml");
    let stdout = stdout_of(&[
        "--events",
        &events,
        "--config",
        &config,
        "--max-lines",
        "1",
    ]);
    assert_eq!(
        stdout,
        "Building [1 done, 2 running]; 1 / 2 tests\n    Compiling foo.cc; 27s\n    ... 1 more\n"
    );
}

#[test]
fn writes_jsonl_log_when_requested() {
    let temp = tempfile::tempdir().expect("tempdir");
    let log = temp.path().join("progress.jsonl");
    let events = fixture("events/build.jsonl");
    stdout_of(&["--events", &events, "--log", log.to_str().expect("utf8 path")]);

    let text = std::fs::read_to_string(&log).expect("log");
    let kinds = text
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).expect("json");
            value["event_type"].as_str().unwrap_or_default().to_string()
        })
        .collect::<Vec<_>>();
    assert_eq!(kinds, vec!["config_loaded", "events_parsed", "replay_complete"]);
    assert!(text.contains("\"time_dependent\":true"));
    assert!(text.contains("\"action_started\":3"), "log: {text}");
    assert!(text.contains("\"action_completion\":2"), "log: {text}");
}

#[test]
fn malformed_event_stream_exits_nonzero() {
    let mut cmd = cargo_bin_cmd!("buildprogress");
    cmd.arg("--events").arg(fixture("events/malformed.jsonl"));
    let out = cmd.assert().failure();
    let stderr = String::from_utf8(out.get_output().stderr.clone()).expect("utf8");
    assert!(stderr.contains("event stream line 2"), "stderr: {stderr}");
}

#[test]
fn invalid_config_exits_nonzero() {
    let mut cmd = cargo_bin_cmd!("buildprogress");
    cmd.arg("--events")
        .arg(fixture("events/build.jsonl"))
        .arg("--config")
        .arg(fixture("configs/invalid.toml"));
    cmd.assert().failure();
}

#[test]
fn missing_events_file_exits_nonzero() {
    let mut cmd = cargo_bin_cmd!("buildprogress");
    cmd.arg("--events").arg(fixture("events/missing.jsonl"));
    cmd.assert().failure();
}
