// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Session locator: where am I, and which other session can run commands?

use rr_mux_core::{Multiplexer, MuxError, SessionId, SessionRecord, WindowIndex};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::detection::{detect_screen_context, DetectError, EnvNames, ScreenContext};

/// Result of locating the caller and a remote session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Session key of the caller (`STY`)
    pub local_key: String,
    /// Session id of the caller
    pub local: SessionId,
    /// Window the caller runs in
    pub window: WindowIndex,
    /// First other running session, if any
    pub remote: Option<SessionId>,
}

#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    #[error(transparent)]
    NotInSession(#[from] DetectError),
    #[error(transparent)]
    Mux(#[from] MuxError),
}

/// First candidate session whose id differs from `local`
pub fn pick_remote(sessions: &[SessionRecord], local: &str) -> Option<SessionId> {
    sessions
        .iter()
        .filter(|s| s.is_candidate())
        .find(|s| s.id != local)
        .map(|s| s.id.clone())
}

/// Locate the caller's session from the environment and pick a remote one.
///
/// An absent remote is not an error here; the caller decides.
#[instrument(skip(mux), fields(component = "rr_mux", operation = "locate", mux = mux.id()))]
pub fn locate(mux: &dyn Multiplexer, names: &EnvNames) -> Result<Location, LocateError> {
    let ctx = detect_screen_context(names)?;
    Ok(locate_from(mux, ctx)?)
}

/// Same as [`locate`] with an already detected context
pub fn locate_from(mux: &dyn Multiplexer, ctx: ScreenContext) -> Result<Location, MuxError> {
    let local = ctx.session_id();
    let sessions = mux.list_sessions()?;
    debug!(count = sessions.len(), %local, "Picking remote session");

    let remote = pick_remote(&sessions, &local);
    match &remote {
        Some(remote) => info!(%local, %remote, "Located remote session"),
        None => info!(%local, "No remote session running"),
    }

    Ok(Location {
        local_key: ctx.session_key,
        local,
        window: ctx.window,
        remote,
    })
}
