// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Tokenizer for `screen -list` output.
//!
//! A listing looks like:
//!
//! ```text
//! There are screens on:
//!         4242.pts-1.devbox       (10/18/2026 09:12:55 AM)        (Attached)
//!         1717.aux        (Detached)
//! 2 Sockets in /run/screen/S-me.
//! ```
//!
//! Every session line becomes a typed [`SessionRecord`]; everything else is
//! skipped.

use std::sync::OnceLock;

use regex::Regex;
use rr_mux_core::{SessionId, SessionRecord, SessionStatus};
use tracing::trace;

fn session_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\d+)\.(\S+)\s+(?:.*\s)?\(([^()]*)\)\s*$")
            .expect("session line regex should compile")
    })
}

/// Parse one line of `screen -list` output
pub fn parse_session_line(line: &str) -> Option<SessionRecord> {
    let caps = session_line_regex().captures(line)?;
    Some(SessionRecord {
        id: caps[1].to_string(),
        name: caps[2].to_string(),
        status: SessionStatus::from_label(&caps[3]),
    })
}

/// Parse the full output of `screen -list`, preserving listing order
pub fn parse_session_listing(output: &str) -> Vec<SessionRecord> {
    output
        .lines()
        .filter_map(|line| {
            let record = parse_session_line(line);
            if record.is_none() && !line.trim().is_empty() {
                trace!(line, "Skipping non-session line");
            }
            record
        })
        .collect()
}

/// Session id part of a session key (`4242.pts-1.devbox` -> `4242`)
pub fn session_id_from_key(key: &str) -> SessionId {
    key.split('.').next().unwrap_or(key).to_string()
}
