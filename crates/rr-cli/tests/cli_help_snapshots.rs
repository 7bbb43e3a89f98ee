// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Smoke tests running the `rr` binary.

use assert_cmd::assert::OutputAssertExt;

fn rr() -> std::process::Command {
    let bin = option_env!("CARGO_BIN_EXE_rr").unwrap_or("target/debug/rr");
    std::process::Command::new(bin)
}

#[test]
fn test_top_level_help_lists_subcommands() {
    let output = rr().arg("--help").assert().success().get_output().stdout.clone();
    let help = String::from_utf8_lossy(&output);
    for needle in ["setup", "run", "interrupt", "sessions", "targets", "vim"] {
        assert!(help.contains(needle), "help output should include {needle}");
    }
}

#[test]
fn test_run_help_snapshot() {
    let output = rr()
        .args(["run", "--help"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let help = String::from_utf8_lossy(&output);
    for needle in ["--line", "--block", "--file", "--transport", "--log-level"] {
        assert!(help.contains(needle), "help output should include flag {needle}");
    }
}

#[test]
fn test_vim_install_prints_mappings() {
    let dir = tempfile::tempdir().unwrap();
    let output = rr()
        .args(["vim", "install", "--log-dir"])
        .arg(dir.path())
        .env("RR_HOME", dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let script = String::from_utf8_lossy(&output);
    assert!(script.contains("function! RemoteRunSetup(layout) abort"));
    assert!(script.contains("nnoremap <silent> <Leader>r4 :call RemoteRunSetup('4')<CR>"));
}
