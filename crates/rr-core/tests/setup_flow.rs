// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! End-to-end setup and dispatch against a recording multiplexer.

use std::path::Path;

use rr_core::{
    setup_dispatch, CommandFile, DispatchOutcome, Dispatcher, LayoutChoice, RunConfig, RunError,
    Selection,
};
use rr_mux::testing::{MuxCall, RecordingMultiplexer};
use rr_mux::{Placement, StuffPaste};
use rr_mux_core::{SessionStatus, Target};
use serial_test::serial;

const SESSION_VAR: &str = "RR_SETUP_FLOW_STY";
const WINDOW_VAR: &str = "RR_SETUP_FLOW_WINDOW";

fn config(command_dir: &Path) -> RunConfig {
    RunConfig {
        command_dir: command_dir.to_path_buf(),
        session_env: SESSION_VAR.to_string(),
        window_env: WINDOW_VAR.to_string(),
        ..RunConfig::default()
    }
}

fn enter_session(key: &str, window: &str) {
    std::env::set_var(SESSION_VAR, key);
    std::env::set_var(WINDOW_VAR, window);
}

fn leave_session() {
    std::env::remove_var(SESSION_VAR);
    std::env::remove_var(WINDOW_VAR);
}

#[test]
#[serial]
fn test_setup_creates_file_and_prepares_remote_window() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let mux = RecordingMultiplexer::new()
        .with_session("100.pts-0.devbox", SessionStatus::Attached)
        .with_session("200.aux", SessionStatus::Detached);
    enter_session("100.pts-0.devbox", "2");

    let report = setup_dispatch(&mux, &config, Path::new("/src/app"), LayoutChoice::VerticalSplit);
    leave_session();
    let report = report.unwrap();

    assert_eq!(report.target, Target::new("200", 2));
    assert_eq!(report.placement, Placement::RemoteFullscreen);
    assert_eq!(
        report.command_file,
        dir.path().join("YYYsrcYYYapp-frequent-shell-command.sh")
    );

    let file = CommandFile::load(&report.command_file).unwrap();
    assert_eq!(file.targets().unwrap(), Target::new("200", 2));
    assert_eq!(
        mux.calls().last(),
        Some(&MuxCall::Stuff {
            session: "200".to_string(),
            window: 2,
            keys: "cd /src/app\n".to_string(),
        })
    );
}

#[test]
#[serial]
fn test_rerunning_setup_only_rewrites_headers() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let path = config.command_file_for(Path::new("/src/app"));
    let existing = "# notes   \n$target_screen=999\nmake \\\n  check\n$target_window=7\n\n  tail  \n";
    std::fs::write(&path, existing).unwrap();

    let mux = RecordingMultiplexer::new()
        .with_session("100.main", SessionStatus::Attached)
        .with_session("300.build", SessionStatus::Multi);
    enter_session("100.main", "1");
    let report = setup_dispatch(&mux, &config, Path::new("/src/app"), LayoutChoice::FullScreen);
    leave_session();
    report.unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "# notes   \n$target_screen=300\nmake \\\n  check\n$target_window=1\n\n  tail  \n"
    );
}

#[test]
#[serial]
fn test_setup_needs_a_second_session() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let mux = RecordingMultiplexer::new()
        .with_session("100.main", SessionStatus::Attached)
        .with_session("200.gone", SessionStatus::Other);
    enter_session("100.main", "0");

    let err = setup_dispatch(&mux, &config, Path::new("/src"), LayoutChoice::HorizontalSplit);
    leave_session();

    assert!(matches!(err, Err(RunError::RequiresTwoSessions { ref local }) if local == "100"));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
#[serial]
fn test_setup_outside_screen_fails() {
    let dir = tempfile::tempdir().unwrap();
    leave_session();
    let mux = RecordingMultiplexer::new();

    let err = setup_dispatch(&mux, &config(dir.path()), Path::new("/"), LayoutChoice::FullScreen);

    assert!(matches!(err, Err(RunError::NotInSession(_))));
    assert!(mux.calls().is_empty());
}

#[test]
#[serial]
fn test_setup_then_dispatch_a_line() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let mux = RecordingMultiplexer::new()
        .with_session("100.main", SessionStatus::Attached)
        .with_session("200.aux", SessionStatus::Attached);
    enter_session("100.main", "4");
    let report = setup_dispatch(&mux, &config, Path::new("/w"), LayoutChoice::Position(2));
    leave_session();
    let report = report.unwrap();

    let file = CommandFile::load(&report.command_file).unwrap();
    let channel = StuffPaste::new(&mux);
    let outcome = Dispatcher::new(&mux, &channel, config.message_wait)
        .run_selection(file.lines(), &Selection::Line("git status".to_string()))
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::Delivered);
    assert_eq!(
        mux.calls().last(),
        Some(&MuxCall::Stuff {
            session: "200".to_string(),
            window: 4,
            keys: "git status\n".to_string(),
        })
    );
}
