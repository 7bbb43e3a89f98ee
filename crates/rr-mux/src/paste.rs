// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Paste channels that deliver a command line into a screen window.
//!
//! `stuff` goes through screen's input buffer, which limits its size, so the
//! default channel writes the text to screen's exchange file and asks the
//! target window to `readbuf` it into the paste register and `paste` it.
//! The exchange file is shared by every dispatch on the machine; two
//! dispatches must not overlap.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rr_mux_core::{Multiplexer, MuxError, PasteChannel, Target};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Screen's default exchange file for `readbuf`/`writebuf`
pub const DEFAULT_SCRATCH_FILE: &str = "/tmp/screen-exchange";

/// Which [`PasteChannel`] implementation delivers commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasteTransport {
    /// Scratch file plus `readbuf` / `paste .`
    #[default]
    Readbuf,
    /// Direct keystroke injection with `stuff`
    Stuff,
}

impl FromStr for PasteTransport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "readbuf" => Ok(PasteTransport::Readbuf),
            "stuff" => Ok(PasteTransport::Stuff),
            _ => Err(format!(
                "Invalid paste transport: {}. Use 'readbuf' or 'stuff'",
                s
            )),
        }
    }
}

/// Build the channel selected by `transport`
pub fn paste_channel<'a>(
    transport: PasteTransport,
    mux: &'a dyn Multiplexer,
    scratch_file: &Path,
) -> Box<dyn PasteChannel + 'a> {
    match transport {
        PasteTransport::Readbuf => Box::new(ScratchFilePaste::new(mux, scratch_file)),
        PasteTransport::Stuff => Box::new(StuffPaste::new(mux)),
    }
}

/// Scratch file + paste register channel
pub struct ScratchFilePaste<'a> {
    mux: &'a dyn Multiplexer,
    scratch_file: PathBuf,
}

impl<'a> ScratchFilePaste<'a> {
    pub fn new(mux: &'a dyn Multiplexer, scratch_file: impl Into<PathBuf>) -> Self {
        Self {
            mux,
            scratch_file: scratch_file.into(),
        }
    }

    /// Commands evaluated in the target window
    fn paste_commands(&self) -> Vec<String> {
        let readbuf = if self.scratch_file == Path::new(DEFAULT_SCRATCH_FILE) {
            "readbuf".to_string()
        } else {
            format!("readbuf \"{}\"", self.scratch_file.display())
        };
        vec![readbuf, "paste .".to_string()]
    }
}

impl PasteChannel for ScratchFilePaste<'_> {
    fn id(&self) -> &'static str {
        "readbuf"
    }

    #[instrument(skip(self, text), fields(scratch = %self.scratch_file.display(), len = text.len()))]
    fn deliver(&self, target: &Target, text: &str) -> Result<(), MuxError> {
        fs::write(&self.scratch_file, format!("{}\n", text))?;
        debug!("Wrote command to scratch file");

        self.mux.eval(&target.screen, Some(target.window), &self.paste_commands())
    }
}

/// Direct `stuff` channel; subject to screen's input buffer limit
pub struct StuffPaste<'a> {
    mux: &'a dyn Multiplexer,
}

impl<'a> StuffPaste<'a> {
    pub fn new(mux: &'a dyn Multiplexer) -> Self {
        Self { mux }
    }
}

impl PasteChannel for StuffPaste<'_> {
    fn id(&self) -> &'static str {
        "stuff"
    }

    #[instrument(skip(self, text), fields(len = text.len()))]
    fn deliver(&self, target: &Target, text: &str) -> Result<(), MuxError> {
        self.mux.stuff(&target.screen, target.window, &format!("{}\n", text))
    }
}
