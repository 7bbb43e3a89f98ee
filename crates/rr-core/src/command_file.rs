// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The per-directory command file.
//!
//! The file is a scratchpad of example commands whose first
//! `$target_screen=` and `$target_window=` lines name the window commands
//! are sent to. Setup rewrites those header values; every other line
//! belongs to the user and is kept byte for byte.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rr_mux_core::{Target, WindowIndex};
use tracing::{debug, info, instrument};

use crate::error::RunError;

pub const SCREEN_HEADER: &str = "$target_screen=";
pub const WINDOW_HEADER: &str = "$target_window=";

/// Contents of a freshly created command file
const TEMPLATE: &str = "
# Usage:
#     - In normal mode, press <Enter> to run the line under the cursor.
#     - Select several lines in visual mode and press <Enter> to run them
#       as one command.

# In visual mode every line is trimmed, a leading '#' or '//' comment
# marker and a '$' prompt are removed, and the lines are joined with one
# space. A line ending in a backslash is joined to the next one WITHOUT a
# space.
# Running a line containing only ^C interrupts the target window.

# Target screen session and window number.
$target_screen=
$target_window=

# Frequent commands.
ls
ls -l
git status
";

/// Command file location for a working directory.
///
/// Every `/` of `cwd` is replaced by `sentinel` so all command files can
/// live flat in `dir`.
pub fn command_file_path(dir: &Path, cwd: &Path, sentinel: &str, suffix: &str) -> PathBuf {
    let flat = cwd.to_string_lossy().replace('/', sentinel);
    dir.join(format!("{}{}", flat, suffix))
}

/// Value of the first line starting with `header`
fn header_value<'a, S: AsRef<str>>(lines: &'a [S], header: &str) -> Option<&'a str> {
    lines
        .iter()
        .map(AsRef::as_ref)
        .find(|line| line.starts_with(header))
        .map(|line| line[header.len()..].trim())
        .filter(|value| !value.is_empty())
}

/// Resolve the dispatch target from the header lines of a command file.
///
/// Pure: resolving the same lines twice gives the same target.
pub fn resolve_targets<S: AsRef<str>>(lines: &[S]) -> Result<Target, RunError> {
    let screen = header_value(lines, SCREEN_HEADER);
    let window = header_value(lines, WINDOW_HEADER);

    let (screen, window) = match (screen, window) {
        (Some(screen), Some(window)) => (screen, window),
        (screen, window) => {
            let missing: Vec<&str> = [(screen, SCREEN_HEADER), (window, WINDOW_HEADER)]
                .iter()
                .filter(|(value, _)| value.is_none())
                .map(|(_, header)| *header)
                .collect();
            return Err(RunError::TargetsNotFound {
                missing: missing.join(" and "),
            });
        }
    };

    let window = window
        .parse::<WindowIndex>()
        .map_err(|_| RunError::InvalidWindow(window.to_string()))?;

    Ok(Target::new(screen, window))
}

/// A command file held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl CommandFile {
    /// Read an existing command file
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, RunError> {
        let path = path.into();
        let content = fs::read_to_string(&path).map_err(|e| RunError::io(&path, e))?;
        Ok(Self {
            lines: content.lines().map(str::to_string).collect(),
            path,
        })
    }

    /// Read the command file, or start from the template if it does not exist
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_or_template(path: impl AsRef<Path>) -> Result<Self, RunError> {
        let path = path.as_ref();
        if path.exists() {
            debug!("Reusing existing command file");
            Self::load(path)
        } else {
            info!("Creating command file from template");
            Ok(Self::from_template(path))
        }
    }

    /// A new command file with the template contents and empty headers
    pub fn from_template(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lines: TEMPLATE.lines().map(str::to_string).collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Resolve the target named by the headers
    pub fn targets(&self) -> Result<Target, RunError> {
        resolve_targets(&self.lines)
    }

    /// Point every header line at `target`.
    ///
    /// A file without headers gets both prepended.
    pub fn refresh_headers(&mut self, target: &Target) {
        let screen_line = format!("{}{}", SCREEN_HEADER, target.screen);
        let window_line = format!("{}{}", WINDOW_HEADER, target.window);
        let mut seen_screen = false;
        let mut seen_window = false;

        for line in &mut self.lines {
            if line.starts_with(SCREEN_HEADER) {
                line.clone_from(&screen_line);
                seen_screen = true;
            } else if line.starts_with(WINDOW_HEADER) {
                line.clone_from(&window_line);
                seen_window = true;
            }
        }

        if !seen_window {
            self.lines.insert(0, window_line);
        }
        if !seen_screen {
            self.lines.insert(0, screen_line);
        }
    }

    /// Write the file atomically, creating its directory if needed.
    ///
    /// A symlinked command file is updated through the link, and an existing
    /// file keeps its permissions.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn save(&self) -> Result<(), RunError> {
        let path = fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());
        let permissions = fs::metadata(&path).ok().map(|meta| meta.permissions());

        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| RunError::io(&dir, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| RunError::io(&dir, e))?;
        for line in &self.lines {
            writeln!(tmp, "{}", line).map_err(|e| RunError::io(tmp.path(), e))?;
        }
        if let Some(permissions) = permissions {
            tmp.as_file()
                .set_permissions(permissions)
                .map_err(|e| RunError::io(tmp.path(), e))?;
        }
        tmp.persist(&path).map_err(|e| RunError::io(&path, e.error))?;

        debug!(lines = self.lines.len(), resolved = %path.display(), "Command file saved");
        Ok(())
    }
}
