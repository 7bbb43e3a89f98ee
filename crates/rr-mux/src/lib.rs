// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Terminal multiplexer implementations
//!
//! This crate provides the GNU Screen implementation of the Multiplexer
//! trait together with the pieces built on top of it: session discovery,
//! paste channels and target window layout.

use std::path::Path;

use tracing::{debug, error, info, instrument};

pub mod detection;
pub mod layout;
pub mod locator;
pub mod paste;
#[cfg(feature = "screen")]
pub mod screen;
pub mod sessions;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use detection::{detect_screen_context, DetectError, EnvNames, ScreenContext};
pub use layout::{LayoutError, LayoutPreparer, Placement};
pub use locator::{locate, LocateError, Location};
pub use paste::{paste_channel, PasteTransport, ScratchFilePaste, StuffPaste};
#[cfg(feature = "screen")]
pub use screen::ScreenMultiplexer;

use rr_mux_core::*;

/// Run `operation` with status messages hidden on `session`.
///
/// Sets `msgwait 0`, runs the operation, then restores `msgwait restore`.
/// The restore is attempted even when the operation fails; the operation's
/// error wins.
pub fn with_messages_suppressed<T>(
    mux: &dyn Multiplexer,
    session: &str,
    restore: u32,
    operation: impl FnOnce() -> Result<T, MuxError>,
) -> Result<T, MuxError> {
    mux.set_message_wait(session, 0)?;
    let result = operation();
    let restored = mux.set_message_wait(session, restore);
    let value = result?;
    restored?;
    Ok(value)
}

/// Get a multiplexer by name, driving `binary` when given
#[instrument(fields(component = "rr_mux", operation = "multiplexer_by_name", multiplexer_name = %name))]
pub fn multiplexer_by_name(
    name: &str,
    binary: Option<&Path>,
) -> Result<Box<dyn Multiplexer>, MuxError> {
    info!("Creating multiplexer by name");

    match name {
        #[cfg(feature = "screen")]
        "screen" => {
            let screen = match binary {
                Some(binary) => screen::ScreenMultiplexer::with_binary(binary),
                None => screen::ScreenMultiplexer::new(),
            }
            .map_err(|e| {
                error!(error = %e, "Failed to create screen multiplexer");
                e
            })?;
            debug!("Successfully created screen multiplexer");
            Ok(Box::new(screen))
        }
        _ => {
            error!(multiplexer_name = %name, "Unsupported multiplexer requested");
            Err(MuxError::Other(format!("Unsupported multiplexer: {}", name)))
        }
    }
}
