// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! `rr sessions`: the parsed `screen -list` output

use clap::Args;
use rr_core::RunConfig;
use rr_mux::detection::detect_screen_context;
use rr_mux_core::SessionRecord;

use crate::screen;

#[derive(Args)]
pub struct SessionsArgs {
    /// Include sessions that cannot receive commands (dead, remote)
    #[arg(long)]
    pub all: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

impl SessionsArgs {
    pub fn run(self, config: &RunConfig) -> anyhow::Result<()> {
        let mux = screen(config)?;
        let sessions = if self.all {
            mux.list_sessions()?
        } else {
            mux.candidate_sessions()?
        };
        let local = detect_screen_context(&config.env_names())
            .ok()
            .map(|ctx| ctx.session_id());

        if self.json {
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        } else {
            print!("{}", render(&sessions, local.as_deref()));
        }
        Ok(())
    }
}

/// One line per session, the caller's own session marked with `*`
pub fn render(sessions: &[SessionRecord], local: Option<&str>) -> String {
    sessions
        .iter()
        .map(|s| {
            let mark = if Some(s.id.as_str()) == local { "*" } else { " " };
            format!("{} {}\t({})\n", mark, s.key(), s.status)
        })
        .collect()
}
