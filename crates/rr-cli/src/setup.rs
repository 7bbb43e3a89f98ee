// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use clap::Args;
use rr_core::{setup_dispatch, LayoutChoice, RunConfig};

use crate::{current_dir, screen, vim};

#[derive(Args)]
pub struct SetupArgs {
    /// Editor window for the command file: e (current), s (horizontal
    /// split), v (vertical split) or the n-th window from the left
    #[arg(value_name = "LAYOUT")]
    pub layout: LayoutChoice,

    /// Print the setup report as JSON instead of Vim commands
    #[arg(long)]
    pub json: bool,
}

impl SetupArgs {
    pub fn run(self, config: &RunConfig) -> anyhow::Result<()> {
        let mux = screen(config)?;
        let report = setup_dispatch(mux.as_ref(), config, &current_dir()?, self.layout)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            for command in vim::setup_commands(report.layout, &report.command_file) {
                println!("{}", command);
            }
        }
        Ok(())
    }
}
