// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Subcommand;
use rr_core::RunConfig;
use rr_logging::CliLoggingArgs;
use rr_mux::multiplexer_by_name;
use rr_mux_core::Multiplexer;

pub mod run;
pub mod sessions;
pub mod setup;
pub mod vim;

#[derive(clap::Parser)]
#[command(
    name = "rr",
    about = "Remote Run: send commands from your editor to another GNU Screen window",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file to use instead of the user config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// GNU Screen executable
    #[arg(long, global = true)]
    pub screen_binary: Option<PathBuf>,
    /// Seconds restored as screen's msgwait after quiet operations
    #[arg(long, global = true)]
    pub message_wait: Option<u32>,
    #[command(flatten)]
    pub logging: CliLoggingArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Point this directory's command file at another screen session
    Setup(setup::SetupArgs),
    /// Send a line or a selection from the command file
    Run(run::RunArgs),
    /// Send Ctrl-C to the target window
    Interrupt(run::InterruptArgs),
    /// List GNU Screen sessions
    Sessions(sessions::SessionsArgs),
    /// Show the target named by the command file
    Targets(run::TargetsArgs),
    /// Editor integration
    Vim {
        #[command(subcommand)]
        subcommand: vim::VimCommands,
    },
}

impl Cli {
    /// Layered configuration with this invocation's flags applied last
    pub fn load_config(&self) -> anyhow::Result<RunConfig> {
        let mut config = RunConfig::load(self.config.as_deref())?;
        if let Some(binary) = &self.screen_binary {
            config.screen_binary = binary.clone();
        }
        if let Some(wait) = self.message_wait {
            config.message_wait = wait;
        }
        Ok(config)
    }

    pub fn run(self, config: &RunConfig) -> anyhow::Result<()> {
        match self.command {
            Commands::Setup(args) => args.run(config),
            Commands::Run(args) => args.run(config),
            Commands::Interrupt(args) => args.run(config),
            Commands::Sessions(args) => args.run(config),
            Commands::Targets(args) => args.run(config),
            Commands::Vim { subcommand } => subcommand.run(config),
        }
    }
}

/// The screen adapter configured by `config`
pub fn screen(config: &RunConfig) -> anyhow::Result<Box<dyn Multiplexer>> {
    multiplexer_by_name("screen", Some(config.screen_binary.as_path()))
        .with_context(|| format!("cannot run {}", config.screen_binary.display()))
}

pub fn current_dir() -> anyhow::Result<PathBuf> {
    std::env::current_dir().context("cannot determine the current directory")
}

/// Command file given with `--file`, else the one for the current directory
pub fn command_file_path(config: &RunConfig, file: Option<&Path>) -> anyhow::Result<PathBuf> {
    match file {
        Some(file) => Ok(file.to_path_buf()),
        None => Ok(config.command_file_for(&current_dir()?)),
    }
}

pub use clap::Parser;
