// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::process::ExitCode;

use rr_cli::{Cli, Parser};
use rr_logging::CliLogLevel;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("rr: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let default_level = config
        .log_level
        .as_deref()
        .and_then(|level| level.parse::<CliLogLevel>().ok())
        .unwrap_or_default();
    // Vim captures both output streams; a broken log file must not leak into them
    cli.logging.init_or_fallback("rr", default_level);

    match cli.run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Command failed");
            eprintln!("rr: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
