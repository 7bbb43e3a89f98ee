// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Environment detection for the caller's own GNU Screen context.
//!
//! GNU Screen exports `STY` (the session key, `<pid>.<name>`) and `WINDOW`
//! (the window number) into every process it starts. The variable names are
//! configurable so tests and unusual setups can point elsewhere.

use rr_mux_core::{SessionId, WindowIndex};
use tracing::{debug, instrument};

use crate::sessions::session_id_from_key;

/// Default variable holding the session key
pub const SESSION_ENV: &str = "STY";
/// Default variable holding the window index
pub const WINDOW_ENV: &str = "WINDOW";

/// Names of the environment variables describing the caller's session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvNames {
    pub session: String,
    pub window: String,
}

impl Default for EnvNames {
    fn default() -> Self {
        Self {
            session: SESSION_ENV.to_string(),
            window: WINDOW_ENV.to_string(),
        }
    }
}

/// The screen session and window the current process runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenContext {
    /// Full session key as exported by screen
    pub session_key: String,
    pub window: WindowIndex,
}

impl ScreenContext {
    pub fn session_id(&self) -> SessionId {
        session_id_from_key(&self.session_key)
    }
}

/// Why the caller's screen context could not be determined
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetectError {
    #[error("not running inside a GNU Screen session (${0} is not set)")]
    MissingSession(String),
    #[error("cannot determine the current window (${0} is not set)")]
    MissingWindow(String),
    #[error("${name} holds '{value}', which is not a window number")]
    InvalidWindow { name: String, value: String },
}

/// Read the caller's screen context from the process environment
#[instrument(fields(component = "rr_mux", operation = "detect_screen_context"))]
pub fn detect_screen_context(names: &EnvNames) -> Result<ScreenContext, DetectError> {
    let session_key = std::env::var(&names.session)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DetectError::MissingSession(names.session.clone()))?;

    let raw_window = std::env::var(&names.window)
        .map_err(|_| DetectError::MissingWindow(names.window.clone()))?;
    let window = raw_window.trim().parse::<WindowIndex>().map_err(|_| {
        DetectError::InvalidWindow {
            name: names.window.clone(),
            value: raw_window.clone(),
        }
    })?;

    debug!(%session_key, window, "Detected screen context");
    Ok(ScreenContext {
        session_key,
        window,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> EnvNames {
        EnvNames {
            session: "RR_TEST_DETECT_STY".to_string(),
            window: "RR_TEST_DETECT_WINDOW".to_string(),
        }
    }

    #[test]
    #[serial_test::file_serial]
    fn test_detect_screen_context() {
        let names = names();
        std::env::set_var(&names.session, "4242.pts-1.devbox");
        std::env::set_var(&names.window, "2");

        let ctx = detect_screen_context(&names).unwrap();
        assert_eq!(ctx.session_key, "4242.pts-1.devbox");
        assert_eq!(ctx.session_id(), "4242");
        assert_eq!(ctx.window, 2);

        std::env::remove_var(&names.session);
        std::env::remove_var(&names.window);
    }

    #[test]
    #[serial_test::file_serial]
    fn test_missing_session_variable() {
        let names = names();
        std::env::remove_var(&names.session);
        std::env::set_var(&names.window, "0");

        assert_eq!(
            detect_screen_context(&names),
            Err(DetectError::MissingSession(names.session.clone()))
        );

        std::env::remove_var(&names.window);
    }

    #[test]
    #[serial_test::file_serial]
    fn test_missing_or_bad_window_variable() {
        let names = names();
        std::env::set_var(&names.session, "4242.main");
        std::env::remove_var(&names.window);
        assert!(matches!(
            detect_screen_context(&names),
            Err(DetectError::MissingWindow(_))
        ));

        std::env::set_var(&names.window, "first");
        assert!(matches!(
            detect_screen_context(&names),
            Err(DetectError::InvalidWindow { .. })
        ));

        std::env::remove_var(&names.session);
        std::env::remove_var(&names.window);
    }
}
