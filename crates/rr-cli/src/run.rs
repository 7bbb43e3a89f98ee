// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Dispatch commands: `rr run`, `rr interrupt` and `rr targets`

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use rr_core::{interrupt, CommandFile, DispatchOutcome, Dispatcher, RunConfig, Selection};
use rr_mux::{paste_channel, PasteTransport};
use tracing::info;

use crate::{command_file_path, screen};

#[derive(Args)]
#[command(group(clap::ArgGroup::new("mode").required(true).args(["line", "block"])))]
pub struct RunArgs {
    /// Run this single line as is
    #[arg(long, allow_hyphen_values = true)]
    pub line: Option<String>,

    /// Read a multi-line selection from stdin and join it into one command
    #[arg(long)]
    pub block: bool,

    /// Command file holding the target headers (default: the current
    /// directory's command file)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// How the command reaches the target window
    #[arg(long)]
    pub transport: Option<PasteTransport>,
}

impl RunArgs {
    pub fn selection(&self) -> anyhow::Result<Selection> {
        match &self.line {
            Some(line) => Ok(Selection::Line(line.clone())),
            None => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("cannot read the selection from stdin")?;
                Ok(Selection::block_from_text(&text))
            }
        }
    }

    pub fn run(self, config: &RunConfig) -> anyhow::Result<()> {
        let path = command_file_path(config, self.file.as_deref())?;
        let file = CommandFile::load(&path)?;
        let selection = self.selection()?;

        let mux = screen(config)?;
        let transport = self.transport.unwrap_or(config.paste_transport);
        let channel = paste_channel(transport, mux.as_ref(), &config.scratch_file);
        let outcome = Dispatcher::new(mux.as_ref(), channel.as_ref(), config.message_wait)
            .run_selection(file.lines(), &selection)?;

        info!(?outcome, file = %path.display(), "Run finished");
        if outcome == DispatchOutcome::Skipped {
            eprintln!("rr: nothing to run");
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct InterruptArgs {
    /// Command file holding the target headers
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl InterruptArgs {
    pub fn run(self, config: &RunConfig) -> anyhow::Result<()> {
        let path = command_file_path(config, self.file.as_deref())?;
        let target = CommandFile::load(&path)?.targets()?;

        let mux = screen(config)?;
        interrupt(mux.as_ref(), &target, config.message_wait)?;
        Ok(())
    }
}

#[derive(Args)]
pub struct TargetsArgs {
    /// Command file to read
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

impl TargetsArgs {
    pub fn run(self, config: &RunConfig) -> anyhow::Result<()> {
        let path = command_file_path(config, self.file.as_deref())?;
        let target = CommandFile::load(&path)?.targets()?;

        if self.json {
            let report = serde_json::json!({
                "command_file": path,
                "screen": target.screen,
                "window": target.window,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", target);
        }
        Ok(())
    }
}
