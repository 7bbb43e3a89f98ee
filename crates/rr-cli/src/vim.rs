// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Vim integration.
//!
//! `rr vim install` prints a script defining the helper functions and the
//! global mappings. Save it as a plugin:
//!
//! ```sh
//! rr vim install > ~/.vim/plugin/remote_run.vim
//! ```
//!
//! The helpers call `rr setup` and execute the Ex commands it prints, then
//! `rr run` from the buffer-local `<CR>` mappings.

use std::path::Path;

use clap::{Args, Subcommand};
use rr_core::{LayoutChoice, RunConfig};

/// Layout tokens bound under the mapping prefix
const MAPPED_LAYOUTS: [&str; 7] = ["e", "s", "v", "1", "2", "3", "4"];

#[derive(Subcommand)]
pub enum VimCommands {
    /// Print the Vim script defining the Remote Run functions and mappings
    Install(InstallArgs),
}

#[derive(Args)]
pub struct InstallArgs {
    /// Key sequence the layout mappings start with (default: <Leader>r)
    #[arg(long)]
    pub prefix: Option<String>,
}

impl VimCommands {
    pub fn run(self, config: &RunConfig) -> anyhow::Result<()> {
        match self {
            VimCommands::Install(args) => {
                let prefix = args.prefix.as_deref().unwrap_or(&config.leader_prefix);
                let binary = std::env::current_exe()
                    .map(|exe| exe.to_string_lossy().into_owned())
                    .unwrap_or_else(|_| "rr".to_string());
                print!("{}", install_script(prefix, &binary));
                Ok(())
            }
        }
    }
}

/// Ex commands moving the editor to the window chosen by `layout`
pub fn layout_commands(layout: LayoutChoice) -> Vec<String> {
    match layout {
        LayoutChoice::FullScreen => Vec::new(),
        LayoutChoice::HorizontalSplit => vec!["new".to_string()],
        LayoutChoice::VerticalSplit => vec!["only".to_string(), "vnew".to_string()],
        LayoutChoice::Position(n) => {
            let mut commands = vec!["3wincmd h".to_string()];
            if n > 1 {
                commands.push(format!("{}wincmd l", n - 1));
            }
            commands
        }
    }
}

/// Escape a path for use as an Ex command argument
pub fn escape_path(path: &Path) -> String {
    let mut escaped = String::new();
    for c in path.to_string_lossy().chars() {
        if matches!(c, ' ' | '\\' | '%' | '#' | '|' | '"' | '\t') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Ex commands printed by a successful `rr setup`, one per line
pub fn setup_commands(layout: LayoutChoice, command_file: &Path) -> Vec<String> {
    let mut commands = layout_commands(layout);
    commands.push(format!("edit! {}", escape_path(command_file)));
    commands.push("nnoremap <buffer> <silent> <CR> :call RemoteRunLine()<CR>".to_string());
    commands.push("vnoremap <buffer> <silent> <CR> :call RemoteRunBlock()<CR>".to_string());
    commands
}

/// The script printed by `rr vim install`
pub fn install_script(prefix: &str, binary: &str) -> String {
    let mut script = format!(
        r#"" Remote Run: send commands from a command file to another screen window
let g:remote_run_bin = get(g:, 'remote_run_bin', '{binary}')

function! RemoteRunSetup(layout) abort
  let l:out = system(shellescape(g:remote_run_bin) . ' setup ' . shellescape(a:layout))
  if v:shell_error
    echoerr 'rr setup: ' . trim(l:out)
    return
  endif
  for l:cmd in split(l:out, "\n")
    execute l:cmd
  endfor
endfunction

function! s:RemoteRunCall(args, input) abort
  wall
  let l:cmd = shellescape(g:remote_run_bin) . ' run --file ' . shellescape(expand('%:p')) . ' ' . a:args
  let l:out = system(l:cmd, a:input)
  if v:shell_error
    echoerr 'rr run: ' . trim(l:out)
  endif
endfunction

function! RemoteRunLine() abort
  call s:RemoteRunCall('--line=' . shellescape(getline('.')), '')
endfunction

function! RemoteRunBlock() range abort
  call s:RemoteRunCall('--block', join(getline(a:firstline, a:lastline), "\n"))
endfunction

"#,
        binary = binary.replace('\'', "''"),
    );

    for layout in MAPPED_LAYOUTS {
        script.push_str(&format!(
            "nnoremap <silent> {prefix}{layout} :call RemoteRunSetup('{layout}')<CR>\n"
        ));
    }
    script
}
