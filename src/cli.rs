// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command-line handling for git-ssh.
//!
//! git-ssh sits in front of git, so only its own options are parsed here.
//! Everything else is handed to git untouched by [`split_args`].

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::utils::LogLevel;

/// Default location of the real git binary.
pub const DEFAULT_GIT_PATH: &str = "/usr/bin/git";

/// Wrapper options that take a value (`--flag=value` or `--flag value`).
const VALUE_FLAGS: &[&str] = &[
    "--ssh",
    "--config-dir",
    "--create-config",
    "--remove-config",
    "--ssh-opts",
    "--ssh-alias",
    "--git-path",
];

/// Wrapper options without a value.
const SWITCH_FLAGS: &[&str] = &["--list-configs", "--ssh-debug", "--ssh-help", "--ssh-version"];

#[derive(Parser, Debug, Clone)]
#[command(
    name = "git-ssh",
    version,
    disable_help_flag = true,
    disable_version_flag = true,
    about = "git-ssh - a simple wrapper for Git to help with multiple SSH keys",
    long_about = "git-ssh runs git with GIT_SSH_COMMAND pointed at a named SSH config.\nConfigs are stored as <name>.2 files in the config directory.\nAll arguments not listed below are passed to git unchanged.",
    after_help = "EXAMPLES:\n  Create a config:          git ssh --create-config=~/.ssh/id_work:work\n  Use it for one command:   git ssh --ssh=work clone git@github.com:org/repo.git\n  Extra ssh options:        git ssh --ssh=work --ssh-opts=Port=2222 fetch\n  List stored configs:      git ssh --list-configs\n  Print a shell alias:      eval \"$(git ssh --ssh-alias=work)\""
)]
pub struct WrapperArgs {
    #[arg(
        long,
        value_name = "CONFIG",
        help = "Name of a config file in the config directory"
    )]
    pub ssh: Option<String>,

    #[arg(
        long = "config-dir",
        value_name = "DIRECTORY",
        help = "Directory to store and search for config files\n[default: $XDG_CONFIG_HOME/git-ssh or ~/.config/git-ssh]"
    )]
    pub config_dir: Option<PathBuf>,

    #[arg(
        long = "create-config",
        value_name = "KEY_PATH:NAME",
        help = "Create a new ssh config using KEY_PATH:NAME"
    )]
    pub create_config: Option<String>,

    #[arg(
        long = "remove-config",
        value_name = "NAME",
        help = "Remove an existing config by NAME"
    )]
    pub remove_config: Option<String>,

    #[arg(
        long = "ssh-opts",
        value_name = "OPTIONS",
        help = "Comma separated list of SSH options, passed as -o OPTION"
    )]
    pub ssh_opts: Option<String>,

    #[arg(
        long = "list-configs",
        help = "List all configs found in the config directory"
    )]
    pub list_configs: bool,

    #[arg(
        long = "ssh-alias",
        value_name = "NAME",
        help = "Print a shell alias that always uses config NAME, for use with eval"
    )]
    pub ssh_alias: Option<String>,

    #[arg(
        long = "git-path",
        value_name = "PATH",
        default_value = DEFAULT_GIT_PATH,
        help = "Path to the git binary"
    )]
    pub git_path: PathBuf,

    #[arg(long = "ssh-debug", help = "Turn on debug logging")]
    pub debug: bool,

    #[allow(dead_code)]
    #[arg(long = "ssh-help", action = ArgAction::Help, help = "Display this help and exit")]
    help: Option<bool>,

    #[allow(dead_code)]
    #[arg(long = "ssh-version", action = ArgAction::Version, help = "Display the version and exit")]
    version: Option<bool>,
}

impl WrapperArgs {
    pub fn log_level(&self) -> LogLevel {
        if self.debug {
            LogLevel::Debug
        } else {
            LogLevel::Off
        }
    }
}

/// Arguments after separating wrapper options from git arguments.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SplitArgs {
    /// Wrapper options, normalized to `--flag=value` form
    pub wrapper: Vec<String>,
    /// Arguments passed to git verbatim
    pub passthrough: Vec<String>,
}

/// Separate wrapper options from git arguments.
///
/// `args` must not include the program name. A `--` seen before any git
/// argument is dropped; after a `--` every argument goes to git.
pub fn split_args(args: &[String]) -> SplitArgs {
    let mut split = SplitArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "--" {
            if !split.passthrough.is_empty() {
                split.passthrough.push(arg.clone());
            }
            split.passthrough.extend(iter.cloned());
            break;
        }

        if SWITCH_FLAGS.contains(&arg.as_str()) {
            split.wrapper.push(arg.clone());
        } else if VALUE_FLAGS.contains(&arg.as_str()) {
            match iter.next() {
                Some(value) => split.wrapper.push(format!("{arg}={value}")),
                None => split.wrapper.push(arg.clone()),
            }
        } else if is_value_flag_with_value(arg) {
            split.wrapper.push(arg.clone());
        } else {
            split.passthrough.push(arg.clone());
        }
    }

    split
}

fn is_value_flag_with_value(arg: &str) -> bool {
    VALUE_FLAGS.iter().any(|flag| {
        arg.strip_prefix(flag)
            .is_some_and(|rest| rest.starts_with('='))
    })
}

/// Parse wrapper options out of `args` (without program name).
///
/// Exits the process on `--ssh-help`, `--ssh-version` or invalid options.
pub fn parse_args(args: &[String]) -> (WrapperArgs, Vec<String>) {
    let split = split_args(args);
    let wrapper = WrapperArgs::parse_from(program_args(split.wrapper));
    (wrapper, split.passthrough)
}

/// Like [`parse_args`] but returns clap errors instead of exiting.
pub fn try_parse_args(args: &[String]) -> Result<(WrapperArgs, Vec<String>), clap::Error> {
    let split = split_args(args);
    let wrapper = WrapperArgs::try_parse_from(program_args(split.wrapper))?;
    Ok((wrapper, split.passthrough))
}

fn program_args(wrapper: Vec<String>) -> impl Iterator<Item = String> {
    std::iter::once("git-ssh".to_string()).chain(wrapper)
}
