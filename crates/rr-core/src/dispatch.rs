// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Sends normalized commands to the target window.

use rr_mux::with_messages_suppressed;
use rr_mux_core::{Multiplexer, PasteChannel, Target};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::command_file::resolve_targets;
use crate::error::RunError;
use crate::normalize::Selection;

/// Keys injected for an interrupt: Ctrl-C, then a newline
pub const INTERRUPT_KEYS: &str = "\u{3}\n";

/// Whether `command` is the interrupt pseudo-command
pub fn is_interrupt(command: &str) -> bool {
    matches!(command.trim(), "^c" | "^C")
}

/// What a dispatch ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchOutcome {
    /// Nothing to send
    Skipped,
    /// Ctrl-C sent to the target window
    Interrupted,
    /// Command pasted into the target window
    Delivered,
}

/// Send Ctrl-C to the target window without flashing a status message.
///
/// `message_wait` is restored on the target session afterwards.
#[instrument(skip(mux), fields(component = "rr_core", operation = "interrupt"))]
pub fn interrupt(
    mux: &dyn Multiplexer,
    target: &Target,
    message_wait: u32,
) -> Result<DispatchOutcome, RunError> {
    with_messages_suppressed(mux, &target.screen, message_wait, || {
        mux.stuff(&target.screen, target.window, INTERRUPT_KEYS)
    })?;
    info!(%target, "Interrupt sent");
    Ok(DispatchOutcome::Interrupted)
}

pub struct Dispatcher<'a> {
    mux: &'a dyn Multiplexer,
    channel: &'a dyn PasteChannel,
    message_wait: u32,
}

impl<'a> Dispatcher<'a> {
    /// `message_wait` is restored on the target session after an interrupt
    pub fn new(mux: &'a dyn Multiplexer, channel: &'a dyn PasteChannel, message_wait: u32) -> Self {
        Self {
            mux,
            channel,
            message_wait,
        }
    }

    /// Deliver one already normalized command
    #[instrument(skip(self, command), fields(component = "rr_core", operation = "dispatch", channel = self.channel.id()))]
    pub fn dispatch(&self, command: &str, target: &Target) -> Result<DispatchOutcome, RunError> {
        let command = command.trim();
        if command.is_empty() {
            debug!("Empty command, nothing to send");
            return Ok(DispatchOutcome::Skipped);
        }
        if is_interrupt(command) {
            return self.interrupt(target);
        }

        self.channel.deliver(target, command)?;
        info!(len = command.len(), "Command delivered");
        Ok(DispatchOutcome::Delivered)
    }

    /// Send Ctrl-C to the target window without flashing a status message
    pub fn interrupt(&self, target: &Target) -> Result<DispatchOutcome, RunError> {
        interrupt(self.mux, target, self.message_wait)
    }

    /// Resolve the target from the command file lines, then normalize and
    /// dispatch `selection`.
    ///
    /// Targets are resolved first, so a file without headers fails even for
    /// an empty selection.
    pub fn run_selection<S: AsRef<str>>(
        &self,
        lines: &[S],
        selection: &Selection,
    ) -> Result<DispatchOutcome, RunError> {
        let target = resolve_targets(lines)?;
        self.dispatch(&selection.normalize(), &target)
    }
}
