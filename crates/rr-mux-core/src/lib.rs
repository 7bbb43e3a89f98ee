// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Low-level multiplexer abstractions shared by Remote Run crates.
//!
//! This crate knows nothing about GNU Screen specifically. It defines the
//! [`Multiplexer`] trait that a backend implements, the [`PasteChannel`]
//! seam used to deliver command text into a window, and the plain data
//! types that flow between them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a multiplexer session (for GNU Screen, the session pid)
pub type SessionId = String;

/// Index of a window inside a session
pub type WindowIndex = u32;

/// Errors reported by multiplexer backends
#[derive(Debug, thiserror::Error)]
pub enum MuxError {
    #[error("multiplexer not available: {0}")]
    NotAvailable(&'static str),
    #[error("multiplexer command failed: {0}")]
    CommandFailed(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

/// Status reported for a session in the multiplexer's listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Attached,
    Detached,
    /// Multi-user session, attached or not
    Multi,
    /// Dead, remote, or anything else the backend prints
    Other,
}

impl SessionStatus {
    /// Classify the text found inside the status parentheses.
    ///
    /// Matching is case-insensitive. `Multi, attached` and `Multi, detached`
    /// both classify as [`SessionStatus::Multi`].
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_ascii_lowercase();
        if label.starts_with("multi") {
            SessionStatus::Multi
        } else if label == "attached" {
            SessionStatus::Attached
        } else if label == "detached" {
            SessionStatus::Detached
        } else {
            SessionStatus::Other
        }
    }

    /// Whether a session with this status may be picked as a dispatch target
    pub fn is_candidate(self) -> bool {
        !matches!(self, SessionStatus::Other)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Attached => write!(f, "attached"),
            SessionStatus::Detached => write!(f, "detached"),
            SessionStatus::Multi => write!(f, "multi"),
            SessionStatus::Other => write!(f, "other"),
        }
    }
}

/// One entry of the multiplexer's session listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub name: String,
    pub status: SessionStatus,
}

impl SessionRecord {
    /// The full session key, `<id>.<name>`
    pub fn key(&self) -> String {
        format!("{}.{}", self.id, self.name)
    }

    pub fn is_candidate(&self) -> bool {
        self.status.is_candidate()
    }
}

/// Window that receives dispatched commands
///
/// `screen` is whatever the user wrote in the command file: a session pid,
/// a full session key, or a friendly session name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub screen: String,
    pub window: WindowIndex,
}

impl Target {
    pub fn new(screen: impl Into<String>, window: WindowIndex) -> Self {
        Self {
            screen: screen.into(),
            window,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.screen, self.window)
    }
}

/// Control surface of a terminal multiplexer
///
/// Every method is a blocking invocation of the backend; a non-zero exit of
/// the backend is reported as [`MuxError::CommandFailed`].
pub trait Multiplexer {
    /// Short backend identifier (e.g. "screen")
    fn id(&self) -> &'static str;

    /// Whether the backend binary can be executed
    fn is_available(&self) -> bool;

    /// List every session the backend currently knows about, in listing order
    fn list_sessions(&self) -> Result<Vec<SessionRecord>, MuxError>;

    /// Run a sequence of backend commands against a session, optionally
    /// scoped to one window
    fn eval(
        &self,
        session: &str,
        window: Option<WindowIndex>,
        commands: &[String],
    ) -> Result<(), MuxError>;

    /// Inject literal keystrokes into a window
    fn stuff(&self, session: &str, window: WindowIndex, keys: &str) -> Result<(), MuxError>;

    /// Set how long (in seconds) status messages stay on screen
    fn set_message_wait(&self, session: &str, seconds: u32) -> Result<(), MuxError>;

    /// Sessions whose status makes them eligible as targets
    fn candidate_sessions(&self) -> Result<Vec<SessionRecord>, MuxError> {
        Ok(self.list_sessions()?.into_iter().filter(SessionRecord::is_candidate).collect())
    }
}

/// Transport that delivers a command line into a target window
///
/// The dispatcher only talks to this trait, so the shared-file/paste-register
/// workaround can be swapped for a direct write without touching it.
pub trait PasteChannel {
    /// Short transport identifier, used in logs
    fn id(&self) -> &'static str;

    /// Deliver `text` into the target window as if it had been typed
    fn deliver(&self, target: &Target, text: &str) -> Result<(), MuxError>;
}
