// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! GNU Screen multiplexer implementation
//!
//! GNU Screen is a classic terminal multiplexer with support for sessions,
//! windows, and regions. It uses the `-X` command interface for automation:
//! `screen -S <session> [-p <window>] -X <command> [args...]`.

use std::path::{Path, PathBuf};
use std::process::Command;

use rr_mux_core::*;
use tracing::{debug, error, info, instrument, warn};

use crate::sessions::parse_session_listing;

/// Binary looked up on `PATH` when none is configured
pub const DEFAULT_SCREEN_BINARY: &str = "screen";

/// GNU Screen multiplexer implementation
#[derive(Debug, Clone)]
pub struct ScreenMultiplexer {
    binary: PathBuf,
}

impl Default for ScreenMultiplexer {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_SCREEN_BINARY),
        }
    }
}

impl ScreenMultiplexer {
    /// Create a GNU Screen multiplexer, failing if the binary cannot run
    #[instrument]
    pub fn new() -> Result<Self, MuxError> {
        Self::with_binary(DEFAULT_SCREEN_BINARY)
    }

    /// Create a GNU Screen multiplexer driving a specific binary
    #[instrument(skip_all, fields(binary = %binary.as_ref().display()))]
    pub fn with_binary(binary: impl AsRef<Path>) -> Result<Self, MuxError> {
        debug!("Initializing GNU Screen multiplexer");
        let mux = Self {
            binary: binary.as_ref().to_path_buf(),
        };

        if !mux.is_available() {
            warn!("GNU Screen is not available");
            return Err(MuxError::NotAvailable("screen"));
        }

        info!("GNU Screen multiplexer initialized successfully");
        Ok(mux)
    }

    /// Build a multiplexer without probing the binary
    pub fn unchecked(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Build the argument vector for a `-X` command against a session
    fn command_args(session: &str, window: Option<WindowIndex>, command: &[&str]) -> Vec<String> {
        let mut args = vec!["-S".to_string(), session.to_string()];
        if let Some(window) = window {
            args.push("-p".to_string());
            args.push(window.to_string());
        }
        args.push("-X".to_string());
        args.extend(command.iter().map(|s| s.to_string()));
        args
    }

    /// Run a screen command and return its stdout
    fn run_screen_command(&self, args: &[String]) -> Result<String, MuxError> {
        debug!(binary = %self.binary.display(), ?args, "Running screen command");

        let output = Command::new(&self.binary).args(args).output().map_err(|e| {
            error!("Failed to run {}: {}", self.binary.display(), e);
            if e.kind() == std::io::ErrorKind::NotFound {
                MuxError::NotAvailable("screen")
            } else {
                MuxError::Io(e)
            }
        })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            // screen reports most -X failures on stdout
            let detail = if stderr.trim().is_empty() { stdout } else { stderr };
            error!(status = ?output.status.code(), "screen command failed: {}", detail.trim());
            Err(MuxError::CommandFailed(format!(
                "screen {} failed: {}",
                args.join(" "),
                detail.trim()
            )))
        }
    }
}

impl Multiplexer for ScreenMultiplexer {
    fn id(&self) -> &'static str {
        "screen"
    }

    #[instrument(skip(self))]
    fn is_available(&self) -> bool {
        // `screen -v` exits 1 on some builds, so only a failed spawn counts as missing
        let available = Command::new(&self.binary)
            .arg("-v")
            .output()
            .map(|output| !output.stdout.is_empty() || output.status.success())
            .unwrap_or(false);

        debug!(available, "Checked GNU Screen availability");
        available
    }

    #[instrument(skip(self))]
    fn list_sessions(&self) -> Result<Vec<SessionRecord>, MuxError> {
        debug!("Listing GNU Screen sessions");

        let output = Command::new(&self.binary).arg("-list").output().map_err(|e| {
            error!("Failed to list GNU Screen sessions: {}", e);
            if e.kind() == std::io::ErrorKind::NotFound {
                MuxError::NotAvailable("screen")
            } else {
                MuxError::Io(e)
            }
        })?;

        // `screen -list` exits 1 even when it lists sessions; the output is
        // what matters.
        if !output.status.success() {
            debug!(status = ?output.status.code(), "screen -list exited non-zero");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let sessions = parse_session_listing(&stdout);

        info!("Found {} GNU Screen sessions", sessions.len());
        Ok(sessions)
    }

    #[instrument(skip(self))]
    fn eval(
        &self,
        session: &str,
        window: Option<WindowIndex>,
        commands: &[String],
    ) -> Result<(), MuxError> {
        let mut command: Vec<&str> = vec!["eval"];
        command.extend(commands.iter().map(String::as_str));

        self.run_screen_command(&Self::command_args(session, window, &command))?;
        info!("GNU Screen eval succeeded on session '{}'", session);
        Ok(())
    }

    #[instrument(skip(self, keys), fields(len = keys.len()))]
    fn stuff(&self, session: &str, window: WindowIndex, keys: &str) -> Result<(), MuxError> {
        self.run_screen_command(&Self::command_args(session, Some(window), &["stuff", keys]))?;
        debug!("Keys stuffed into GNU Screen window {}:{}", session, window);
        Ok(())
    }

    #[instrument(skip(self))]
    fn set_message_wait(&self, session: &str, seconds: u32) -> Result<(), MuxError> {
        let seconds = seconds.to_string();
        self.run_screen_command(&Self::command_args(session, None, &["msgwait", &seconds]))?;
        Ok(())
    }
}
