// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::path::PathBuf;

use rr_mux::{DetectError, LayoutError, LocateError};
use rr_mux_core::{MuxError, SessionId};

/// Every way a Remote Run action can abort
///
/// None of these are retried; the user fixes the condition and tries again.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("not running inside a GNU Screen session: {0}")]
    NotInSession(#[from] DetectError),

    #[error("this feature requires two GNU Screen sessions, only found the local one ({local})")]
    RequiresTwoSessions { local: SessionId },

    #[error("cannot figure out the target: missing {missing}")]
    TargetsNotFound { missing: String },

    #[error("invalid $target_window value '{0}', expected a window number")]
    InvalidWindow(String),

    #[error("invalid target screen '{0}': no running session matches")]
    InvalidTarget(String),

    #[error("external tool failure: {0}")]
    ExternalToolFailure(#[from] MuxError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl RunError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RunError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<LocateError> for RunError {
    fn from(err: LocateError) -> Self {
        match err {
            LocateError::NotInSession(e) => RunError::NotInSession(e),
            LocateError::Mux(e) => RunError::ExternalToolFailure(e),
        }
    }
}

impl From<LayoutError> for RunError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::InvalidTarget(screen) => RunError::InvalidTarget(screen),
            LayoutError::Mux(e) => RunError::ExternalToolFailure(e),
        }
    }
}

impl From<config::ConfigError> for RunError {
    fn from(err: config::ConfigError) -> Self {
        RunError::Config(err.to_string())
    }
}
