// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Remote Run core: turn selected command text into a command running in
//! another GNU Screen window.
//!
//! - [`normalize`] joins a selection into one shell command
//! - [`command_file`] owns the per-directory command file and its target headers
//! - [`dispatch`] delivers a command (or an interrupt) to the target window
//! - [`setup`] wires a command file to a freshly located remote session

pub mod command_file;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod normalize;
pub mod setup;

pub use command_file::{command_file_path, resolve_targets, CommandFile};
pub use crate::config::RunConfig;
pub use dispatch::{interrupt, DispatchOutcome, Dispatcher};
pub use error::RunError;
pub use normalize::{normalize, Selection};
pub use setup::{setup_dispatch, LayoutChoice, SetupReport};
