// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Setup flow: pair the current directory's command file with a window in
//! another screen session.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rr_mux::{locate, LayoutPreparer, Placement};
use rr_mux_core::{Multiplexer, Target};
use serde::Serialize;
use tracing::{info, instrument};

use crate::command_file::CommandFile;
use crate::config::RunConfig;
use crate::error::RunError;

/// Where the editor shows the command file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutChoice {
    /// Replace the current editor window (`e`)
    FullScreen,
    /// Horizontal split (`s`)
    HorizontalSplit,
    /// Single vertical split (`v`)
    VerticalSplit,
    /// The n-th window from the left, 1-based
    Position(u8),
}

impl FromStr for LayoutChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "e" => Ok(LayoutChoice::FullScreen),
            "s" => Ok(LayoutChoice::HorizontalSplit),
            "v" => Ok(LayoutChoice::VerticalSplit),
            n => match n.parse::<u8>() {
                Ok(n) if n > 0 => Ok(LayoutChoice::Position(n)),
                _ => Err(format!(
                    "Invalid layout: {}. Use 'e', 's', 'v' or a window number",
                    s
                )),
            },
        }
    }
}

impl fmt::Display for LayoutChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutChoice::FullScreen => write!(f, "e"),
            LayoutChoice::HorizontalSplit => write!(f, "s"),
            LayoutChoice::VerticalSplit => write!(f, "v"),
            LayoutChoice::Position(n) => write!(f, "{}", n),
        }
    }
}

/// Everything the editor needs after a successful setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupReport {
    pub target: Target,
    pub command_file: PathBuf,
    pub layout: LayoutChoice,
    pub placement: Placement,
}

/// Locate a remote session, point the command file of `cwd` at it and bring
/// the target window up.
///
/// The target is the remote session with the caller's own window number.
#[instrument(skip(mux, config), fields(component = "rr_core", operation = "setup_dispatch"))]
pub fn setup_dispatch(
    mux: &dyn Multiplexer,
    config: &RunConfig,
    cwd: &Path,
    layout: LayoutChoice,
) -> Result<SetupReport, RunError> {
    let location = locate(mux, &config.env_names())?;
    let remote = location
        .remote
        .ok_or_else(|| RunError::RequiresTwoSessions {
            local: location.local.clone(),
        })?;
    let target = Target::new(remote, location.window);

    let mut command_file = CommandFile::load_or_template(config.command_file_for(cwd))?;
    command_file.refresh_headers(&target);
    command_file.save()?;

    let placement = LayoutPreparer::new(mux, config.message_wait).prepare_target_window(
        &target,
        &location.local_key,
        cwd,
    )?;

    info!(%target, file = %command_file.path().display(), %layout, "Setup complete");
    Ok(SetupReport {
        target,
        command_file: command_file.path().to_path_buf(),
        layout,
        placement,
    })
}
