// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Drives `ScreenMultiplexer` against a scripted stand-in for the `screen`
//! binary and checks the exact command lines it produces.

#![cfg(unix)]

mod common;

use std::path::Path;

use common::{fake_screen, recorded_calls};
use rr_mux::{LayoutPreparer, Placement, ScratchFilePaste, ScreenMultiplexer};
use rr_mux_core::{Multiplexer, MuxError, PasteChannel, SessionStatus, Target};
use serial_test::serial;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
#[serial]
fn test_listing_survives_nonzero_exit() {
    let dir = tempfile::tempdir().unwrap();
    let mux = ScreenMultiplexer::unchecked(fake_screen(dir.path(), 0));

    let sessions = mux.list_sessions().unwrap();

    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].key(), "4242.pts-1.devbox");
    assert_eq!(sessions[0].status, SessionStatus::Attached);
    assert_eq!(sessions[1].key(), "1717.aux");
    assert_eq!(recorded_calls(dir.path()), vec![args(&["-list"])]);
}

#[test]
#[serial]
fn test_binary_that_prints_a_version_is_available() {
    let dir = tempfile::tempdir().unwrap();
    let path = fake_screen(dir.path(), 0);
    assert!(ScreenMultiplexer::with_binary(&path).is_ok());
}

#[test]
#[serial]
fn test_scratch_paste_issues_readbuf_and_paste() {
    let dir = tempfile::tempdir().unwrap();
    let mux = ScreenMultiplexer::unchecked(fake_screen(dir.path(), 0));
    let scratch = dir.path().join("exchange");

    ScratchFilePaste::new(&mux, &scratch)
        .deliver(&Target::new("1717", 3), "cargo build")
        .unwrap();

    assert_eq!(std::fs::read_to_string(&scratch).unwrap(), "cargo build\n");
    assert_eq!(
        recorded_calls(dir.path()),
        vec![args(&[
            "-S",
            "1717",
            "-p",
            "3",
            "-X",
            "eval",
            &format!("readbuf \"{}\"", scratch.display()),
            "paste .",
        ])]
    );
}

#[test]
#[serial]
fn test_remote_layout_runs_quietly_then_changes_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mux = ScreenMultiplexer::unchecked(fake_screen(dir.path(), 0));

    let placement = LayoutPreparer::new(&mux, 5)
        .prepare_target_window(&Target::new("aux", 0), "4242.pts-1.devbox", Path::new("/work"))
        .unwrap();

    assert_eq!(placement, Placement::RemoteFullscreen);
    assert_eq!(
        recorded_calls(dir.path()),
        vec![
            args(&["-list"]),
            args(&["-S", "1717", "-X", "msgwait", "0"]),
            args(&["-S", "1717", "-X", "eval", "only", "select 0"]),
            args(&["-S", "1717", "-X", "msgwait", "5"]),
            args(&["-S", "1717", "-p", "0", "-X", "stuff", "cd /work\n"]),
        ]
    );
}

#[test]
#[serial]
fn test_nonzero_exit_is_a_command_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mux = ScreenMultiplexer::unchecked(fake_screen(dir.path(), 1));

    let err = mux.stuff("9999", 0, "ls\n").unwrap_err();
    match err {
        MuxError::CommandFailed(msg) => assert!(msg.contains("No screen session found")),
        other => panic!("unexpected error: {other:?}"),
    }
}
