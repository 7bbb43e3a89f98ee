// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Makes the target window visible and moves its shell to the caller's
//! working directory.

use std::path::Path;

use rr_mux_core::{Multiplexer, MuxError, SessionId, SessionRecord, Target};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::sessions::session_id_from_key;
use crate::with_messages_suppressed;

/// How the target window was brought on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// Target lives in the caller's own session: split it in two regions
    LocalSplit,
    /// Target lives in another session: show it full-screen there
    RemoteFullscreen,
}

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("invalid target screen '{0}': no running session matches")]
    InvalidTarget(String),
    #[error(transparent)]
    Mux(#[from] MuxError),
}

/// Resolve a friendly session name (or pid) to a running session's id.
///
/// The first candidate whose `<id>.<name>` key contains `screen` wins.
pub fn resolve_session(sessions: &[SessionRecord], screen: &str) -> Option<SessionId> {
    sessions
        .iter()
        .filter(|s| s.is_candidate())
        .find(|s| s.key().contains(screen))
        .map(|s| s.id.clone())
}

/// Quote a path for a POSIX shell when it contains anything unusual
pub fn shell_quote(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let safe = raw
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+' | ',' | ':' | '@'));
    if safe && !raw.is_empty() {
        raw.into_owned()
    } else {
        format!("'{}'", raw.replace('\'', r"'\''"))
    }
}

/// Arranges screen so the target window is visible
pub struct LayoutPreparer<'a> {
    mux: &'a dyn Multiplexer,
    message_wait: u32,
}

impl<'a> LayoutPreparer<'a> {
    /// `message_wait` is the msgwait value restored after quiet operations
    pub fn new(mux: &'a dyn Multiplexer, message_wait: u32) -> Self {
        Self { mux, message_wait }
    }

    /// Show the target window and `cd` it into `cwd`.
    ///
    /// `local_session_key` is the caller's own session key (`STY`).
    #[instrument(skip(self), fields(component = "rr_mux", operation = "prepare_target_window"))]
    pub fn prepare_target_window(
        &self,
        target: &Target,
        local_session_key: &str,
        cwd: &Path,
    ) -> Result<Placement, LayoutError> {
        let sessions = self.mux.list_sessions()?;
        let session = resolve_session(&sessions, &target.screen).ok_or_else(|| {
            warn!(screen = %target.screen, "Target screen matches no running session");
            LayoutError::InvalidTarget(target.screen.clone())
        })?;

        let select = format!("select {}", target.window);
        let placement = if session == session_id_from_key(local_session_key) {
            self.mux.eval(
                &session,
                None,
                &[
                    "only".to_string(),
                    "split".to_string(),
                    "focus".to_string(),
                    select,
                    "focus".to_string(),
                ],
            )?;
            Placement::LocalSplit
        } else {
            // msgwait 0 hides the "already focused" message on the remote
            with_messages_suppressed(self.mux, &session, self.message_wait, || {
                self.mux.eval(&session, None, &["only".to_string(), select])
            })?;
            Placement::RemoteFullscreen
        };

        self.mux.stuff(
            &session,
            target.window,
            &format!("cd {}\n", shell_quote(cwd)),
        )?;

        info!(%session, window = target.window, ?placement, "Target window prepared");
        Ok(placement)
    }
}
