// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! In-memory multiplexer that records every call, for tests.

use std::cell::RefCell;

use rr_mux_core::{Multiplexer, MuxError, SessionRecord, SessionStatus, WindowIndex};

/// One recorded multiplexer invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MuxCall {
    ListSessions,
    Eval {
        session: String,
        window: Option<WindowIndex>,
        commands: Vec<String>,
    },
    Stuff {
        session: String,
        window: WindowIndex,
        keys: String,
    },
    MessageWait {
        session: String,
        seconds: u32,
    },
}

/// Fake multiplexer with a scripted session listing
#[derive(Debug, Default)]
pub struct RecordingMultiplexer {
    sessions: Vec<SessionRecord>,
    fail_on: Option<&'static str>,
    calls: RefCell<Vec<MuxCall>>,
}

impl RecordingMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session given as `<id>.<name>`
    pub fn with_session(mut self, key: &str, status: SessionStatus) -> Self {
        let (id, name) = key.split_once('.').unwrap_or((key, ""));
        self.sessions.push(SessionRecord {
            id: id.to_string(),
            name: name.to_string(),
            status,
        });
        self
    }

    /// Make one operation ("list", "eval", "stuff" or "msgwait") fail as a
    /// non-zero exit would. The call is still recorded.
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    /// Calls recorded so far, in order
    pub fn calls(&self) -> Vec<MuxCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, operation: &'static str, call: MuxCall) -> Result<(), MuxError> {
        self.calls.borrow_mut().push(call);
        if self.fail_on == Some(operation) {
            return Err(MuxError::CommandFailed(format!(
                "screen {} failed: exit status 1",
                operation
            )));
        }
        Ok(())
    }
}

impl Multiplexer for RecordingMultiplexer {
    fn id(&self) -> &'static str {
        "recording"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn list_sessions(&self) -> Result<Vec<SessionRecord>, MuxError> {
        self.record("list", MuxCall::ListSessions)?;
        Ok(self.sessions.clone())
    }

    fn eval(
        &self,
        session: &str,
        window: Option<WindowIndex>,
        commands: &[String],
    ) -> Result<(), MuxError> {
        self.record(
            "eval",
            MuxCall::Eval {
                session: session.to_string(),
                window,
                commands: commands.to_vec(),
            },
        )
    }

    fn stuff(&self, session: &str, window: WindowIndex, keys: &str) -> Result<(), MuxError> {
        self.record(
            "stuff",
            MuxCall::Stuff {
                session: session.to_string(),
                window,
                keys: keys.to_string(),
            },
        )
    }

    fn set_message_wait(&self, session: &str, seconds: u32) -> Result<(), MuxError> {
        self.record(
            "msgwait",
            MuxCall::MessageWait {
                session: session.to_string(),
                seconds,
            },
        )
    }
}
