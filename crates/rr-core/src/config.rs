// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Layered configuration for Remote Run
//!
//! Built-in defaults, then the user's TOML file, then `RR_*` environment
//! variables (`RR_MESSAGE_WAIT` sets `message-wait`). CLI flags are applied
//! last by the binary.

use std::path::{Path, PathBuf};

use rr_mux::detection::{SESSION_ENV, WINDOW_ENV};
use rr_mux::paste::DEFAULT_SCRATCH_FILE;
use rr_mux::{EnvNames, PasteTransport};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::command_file::command_file_path;
use crate::error::RunError;

/// Directory name under the platform config directory
const APP_DIR: &str = "remote-run";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RunConfig {
    /// GNU Screen executable
    pub screen_binary: PathBuf,
    /// Exchange file used by the readbuf paste channel
    pub scratch_file: PathBuf,
    /// Where command files are kept; `~` is expanded
    pub command_dir: PathBuf,
    pub command_file_suffix: String,
    /// Replaces `/` when flattening a working directory into a file name
    pub path_sentinel: String,
    /// msgwait seconds restored after quiet operations
    pub message_wait: u32,
    pub session_env: String,
    pub window_env: String,
    pub paste_transport: PasteTransport,
    /// Prefix of the global Vim mappings
    pub leader_prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            screen_binary: PathBuf::from("screen"),
            scratch_file: PathBuf::from(DEFAULT_SCRATCH_FILE),
            command_dir: PathBuf::from("~/tmp"),
            command_file_suffix: "-frequent-shell-command.sh".to_string(),
            path_sentinel: "YYY".to_string(),
            message_wait: 5,
            session_env: SESSION_ENV.to_string(),
            window_env: WINDOW_ENV.to_string(),
            paste_transport: PasteTransport::default(),
            leader_prefix: "<Leader>r".to_string(),
            log_level: None,
        }
    }
}

/// User configuration file: `$RR_HOME/config.toml`, else the platform config
/// directory
pub fn user_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("RR_HOME") {
        return PathBuf::from(home).join("config.toml");
    }

    dirs::config_dir()
        .unwrap_or_else(|| expand_home(Path::new("~/.config")))
        .join(APP_DIR)
        .join("config.toml")
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

impl RunConfig {
    /// Load the layered configuration.
    ///
    /// `explicit` replaces the user file and must exist; the user file is
    /// optional.
    #[instrument(fields(component = "rr_core", operation = "load_config"))]
    pub fn load(explicit: Option<&Path>) -> Result<Self, RunError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (user_config_path(), false),
        };
        debug!(path = %path.display(), required, "Loading configuration");

        let built = config::Config::builder()
            .add_source(config::Config::try_from(&RunConfig::default())?)
            .add_source(
                config::File::from(path.as_path())
                    .format(config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix("RR")
                    .convert_case(config::Case::Kebab)
                    .try_parsing(true),
            )
            .build()?;

        Ok(built.try_deserialize()?)
    }

    pub fn env_names(&self) -> EnvNames {
        EnvNames {
            session: self.session_env.clone(),
            window: self.window_env.clone(),
        }
    }

    pub fn command_dir(&self) -> PathBuf {
        expand_home(&self.command_dir)
    }

    /// Command file for the working directory `cwd`
    pub fn command_file_for(&self, cwd: &Path) -> PathBuf {
        command_file_path(
            &self.command_dir(),
            cwd,
            &self.path_sentinel,
            &self.command_file_suffix,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard(Vec<(&'static str, Option<String>)>);

    impl EnvGuard {
        fn set(vars: &[(&'static str, &str)]) -> Self {
            let saved = vars.iter().map(|(k, _)| (*k, std::env::var(k).ok())).collect();
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
            EnvGuard(saved)
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (k, v) in &self.0 {
                match v {
                    Some(v) => std::env::set_var(k, v),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_any_file() {
        let dir = tempfile::tempdir().unwrap();
        let _env = EnvGuard::set(&[("RR_HOME", dir.path().to_str().unwrap())]);

        let config = RunConfig::load(None).unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.env_names(), EnvNames::default());
    }

    #[test]
    #[serial]
    fn test_file_then_environment_layers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "message-wait = 2\npaste-transport = \"stuff\"\ncommand-dir = \"/srv/cmds\"\n",
        )
        .unwrap();
        let _env = EnvGuard::set(&[
            ("RR_HOME", dir.path().to_str().unwrap()),
            ("RR_MESSAGE_WAIT", "9"),
            ("RR_SCREEN_BINARY", "/opt/bin/screen"),
        ]);

        let config = RunConfig::load(None).unwrap();
        assert_eq!(config.message_wait, 9);
        assert_eq!(config.paste_transport, PasteTransport::Stuff);
        assert_eq!(config.screen_binary, PathBuf::from("/opt/bin/screen"));
        assert_eq!(
            config.command_file_for(Path::new("/src/app")),
            PathBuf::from("/srv/cmds/YYYsrcYYYapp-frequent-shell-command.sh")
        );
    }

    #[test]
    #[serial]
    fn test_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = RunConfig::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, RunError::Config(_)));
    }

    #[test]
    #[serial]
    fn test_explicit_file_replaces_user_file() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("other.toml");
        std::fs::write(&explicit, "leader-prefix = \",r\"\n").unwrap();
        std::fs::write(dir.path().join("config.toml"), "message-wait = 1\n").unwrap();
        let _env = EnvGuard::set(&[("RR_HOME", dir.path().to_str().unwrap())]);

        let config = RunConfig::load(Some(&explicit)).unwrap();
        assert_eq!(config.leader_prefix, ",r");
        assert_eq!(config.message_wait, 5);
    }

    #[test]
    fn test_tilde_is_expanded() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home(Path::new("~/tmp")), home.join("tmp"));
        assert_eq!(expand_home(Path::new("/abs")), PathBuf::from("/abs"));
    }
}
