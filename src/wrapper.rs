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

//! Applies wrapper options and decides how git should be run.
//!
//! Steps run in a fixed order: resolve the config directory, create,
//! remove, list, alias, then identity lookup. Create, remove, list and
//! alias each satisfy the run on their own, so git is not started after them.

use anyhow::Result;
use std::io::Write;
use std::str::FromStr;

use crate::cli::WrapperArgs;
use crate::config::{ConfigRecord, ConfigStore, ensure_config_dir, resolve_config_dir};
use crate::error::WrapperError;
use crate::git::{Git, GitRunner, RunOutcome, Spawner};

/// Parsed `--create-config` value, `KEY_PATH:NAME`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub key_path: String,
    pub name: String,
}

impl FromStr for CreateRequest {
    type Err = WrapperError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || WrapperError::InvalidCreateString {
            value: value.to_string(),
        };

        let parts: Vec<&str> = value.split(':').collect();
        let [key_path, name] = parts.as_slice() else {
            return Err(invalid());
        };
        if key_path.is_empty() || name.is_empty() {
            return Err(invalid());
        }

        tracing::debug!("Create string -- name: {}, key: {}", name, key_path);
        Ok(Self {
            key_path: key_path.to_string(),
            name: name.to_string(),
        })
    }
}

/// What git should be run with, once options have been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Identity to route SSH through; `None` runs plain git
    pub identity: Option<ConfigRecord>,
    /// Formatted `-o OPTION` transport flags
    pub ssh_options: Vec<String>,
    /// The run is already complete and git must not be started
    pub done: bool,
}

/// Split a comma separated `--ssh-opts` value into `-o OPTION` flags.
pub fn parse_ssh_options(value: Option<&str>) -> Vec<String> {
    value
        .into_iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .map(|option| format!("-o {}", shell_words::quote(option)))
        .collect()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Apply wrapper options against the config store.
///
/// Create, remove, list and alias output is written to `out`.
pub fn handle_options(args: &WrapperArgs, out: &mut dyn Write) -> Result<Invocation, WrapperError> {
    let config_dir = resolve_config_dir(args.config_dir.as_deref());
    ensure_config_dir(&config_dir);
    let store = ConfigStore::new(config_dir);

    let mut invocation = Invocation {
        ssh_options: parse_ssh_options(args.ssh_opts.as_deref()),
        ..Default::default()
    };

    if let Some(create) = non_empty(&args.create_config) {
        let request: CreateRequest = create.parse()?;
        store.write(&request.name, &request.key_path, out)?;
        invocation.done = true;
    }

    if let Some(name) = non_empty(&args.remove_config) {
        store.remove(name, out)?;
        invocation.done = true;
    }

    if args.list_configs {
        store.list(out);
        invocation.done = true;
    }

    if invocation.done {
        return Ok(invocation);
    }

    if let Some(name) = non_empty(&args.ssh_alias) {
        if store.find(name).is_none() {
            return Err(WrapperError::NoSshConfig {
                name: name.to_string(),
            });
        }
        let _ = writeln!(out, "{}", alias_line(name, args));
        invocation.done = true;
        return Ok(invocation);
    }

    if let Some(name) = non_empty(&args.ssh) {
        match store.find(name) {
            Some(config) => invocation.identity = Some(config),
            None => {
                return Err(WrapperError::NoSshConfig {
                    name: name.to_string(),
                });
            }
        }
    }

    Ok(invocation)
}

/// Shell alias that routes every git call through config `name`.
fn alias_line(name: &str, args: &WrapperArgs) -> String {
    tracing::debug!("Generating SSH alias for: {}, use with eval", name);

    let mut command = format!(
        "git ssh --ssh={name} --git-path=\"{}\"",
        args.git_path.display()
    );
    if let Some(dir) = &args.config_dir {
        command.push_str(&format!(" --config-dir=\"{}\"", dir.display()));
    }
    if let Some(options) = non_empty(&args.ssh_opts) {
        command.push_str(&format!(" --ssh-opts=\"{options}\""));
    }

    format!("alias git='{command}'")
}

/// Run one invocation of the wrapper: check git, apply options, start git.
pub async fn run<S: Spawner>(
    args: &WrapperArgs,
    git_args: &[String],
    spawner: S,
    out: &mut dyn Write,
) -> Result<RunOutcome> {
    let git = Git::with_spawner(&args.git_path, spawner)?;
    let invocation = handle_options(args, out)?;
    GitRunner::new(git, invocation).call(git_args).await
}
