// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Common helpers for integration tests

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Listing printed by the fake `screen -list`
pub const LISTING: &str = "There are screens on:
\t4242.pts-1.devbox\t(10/18/2026 09:12:55 AM)\t(Attached)
\t1717.aux\t(Detached)
2 Sockets in /run/screen/S-me.";

/// Write an executable stand-in for `screen` into `dir`.
///
/// Every invocation appends its arguments to `calls.log` in `dir`, each
/// argument terminated by RS (0x1e) and each call by GS (0x1d). `-list`
/// prints [`LISTING`] and exits 1 like the real tool; `-X` commands exit
/// with `x_status`.
pub fn fake_screen(dir: &Path, x_status: i32) -> PathBuf {
    let log = dir.join("calls.log");
    let script = format!(
        r#"#!/bin/sh
for arg in "$@"; do printf '%s\036' "$arg" >> '{log}'; done
printf '\035' >> '{log}'
case "$1" in
  -list)
    cat <<'LISTING'
{listing}
LISTING
    exit 1
    ;;
  -v)
    echo "Screen version 4.09.01 (GNU) 20-Aug-23"
    exit 1
    ;;
esac
if [ {status} -ne 0 ]; then
  echo "No screen session found."
fi
exit {status}
"#,
        log = log.display(),
        listing = LISTING,
        status = x_status,
    );

    let path = dir.join("screen");
    fs::write(&path, script).expect("write fake screen");
    let mut perms = fs::metadata(&path).expect("stat fake screen").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod fake screen");
    path
}

/// Invocations recorded by [`fake_screen`], each as its argument list
pub fn recorded_calls(dir: &Path) -> Vec<Vec<String>> {
    let log = fs::read_to_string(dir.join("calls.log")).unwrap_or_default();
    log.split('\u{1d}')
        .filter(|call| !call.is_empty())
        .map(|call| {
            call.split('\u{1e}')
                .filter(|arg| !arg.is_empty())
                .map(str::to_string)
                .collect()
        })
        .collect()
}
