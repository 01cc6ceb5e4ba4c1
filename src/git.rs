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

//! Running the real git binary, optionally inside an SSH override environment.
//!
//! The child always inherits stdin, stdout and stderr so prompts and pagers
//! behave exactly as with plain git.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

use crate::config::ConfigRecord;
use crate::error::WrapperError;
use crate::wrapper::Invocation;

/// Environment variable git reads its SSH transport command from.
pub const SSH_COMMAND_ENV: &str = "GIT_SSH_COMMAND";

/// Exit code reported when the wait for git was interrupted.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// How a run of the wrapper ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Create, remove, list or alias already satisfied the run
    Skipped,
    /// git exited with this code
    Exited(i32),
    /// git was killed by this signal
    Signaled(i32),
    /// The wait for git was interrupted by Ctrl+C
    Interrupted,
}

impl RunOutcome {
    /// Process exit code for the wrapper. git's own code is passed through;
    /// a signal maps to the shell convention of `128 + signal`.
    pub fn exit_code(self) -> i32 {
        match self {
            RunOutcome::Skipped => 0,
            RunOutcome::Exited(code) => code,
            RunOutcome::Signaled(signal) => 128 + signal,
            RunOutcome::Interrupted => INTERRUPTED_EXIT_CODE,
        }
    }
}

/// Launches a program with inherited standard streams and extra environment.
#[async_trait]
pub trait Spawner: Send + Sync {
    async fn spawn(
        &self,
        program: &Path,
        args: &[String],
        env: &[(String, String)],
    ) -> io::Result<RunOutcome>;
}

/// [`Spawner`] backed by a real child process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessSpawner;

#[async_trait]
impl Spawner for ProcessSpawner {
    async fn spawn(
        &self,
        program: &Path,
        args: &[String],
        env: &[(String, String)],
    ) -> io::Result<RunOutcome> {
        let mut child = Command::new(program)
            .args(args)
            .envs(env.iter().map(|(key, value)| (key, value)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;

        tokio::select! {
            status = child.wait() => {
                let status = status?;
                tracing::debug!("git exited with {}", status);
                Ok(outcome_from_status(status))
            }
            interrupt = tokio::signal::ctrl_c() => match interrupt {
                Ok(()) => {
                    tracing::debug!("Interrupted while waiting for git");
                    Ok(RunOutcome::Interrupted)
                }
                Err(e) => {
                    tracing::warn!("Unable to listen for Ctrl+C: {}", e);
                    let status = child.wait().await?;
                    Ok(outcome_from_status(status))
                }
            },
        }
    }
}

fn outcome_from_status(status: ExitStatus) -> RunOutcome {
    if let Some(code) = status.code() {
        return RunOutcome::Exited(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return RunOutcome::Signaled(signal);
        }
    }

    RunOutcome::Exited(1)
}

/// Build the `GIT_SSH_COMMAND` value for a config and formatted `-o` options.
pub fn ssh_command(config: &ConfigRecord, ssh_options: &[String]) -> String {
    let path = config.path().to_string_lossy();
    let mut command = format!("ssh -F {}", shell_words::quote(&path));
    for option in ssh_options {
        command.push(' ');
        command.push_str(option);
    }
    command
}

/// Handle on the real git binary.
pub struct Git<S = ProcessSpawner> {
    path: PathBuf,
    spawner: S,
}

impl Git<ProcessSpawner> {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, WrapperError> {
        Self::with_spawner(path, ProcessSpawner)
    }
}

impl<S: Spawner> Git<S> {
    /// Fails with [`WrapperError::GitNotFound`] if `path` does not exist.
    pub fn with_spawner(path: impl Into<PathBuf>, spawner: S) -> Result<Self, WrapperError> {
        let path = path.into();
        if !path.exists() {
            return Err(WrapperError::GitNotFound { path });
        }
        Ok(Self { path, spawner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Plain git call, arguments passed through.
    pub async fn call(&self, args: &[String]) -> Result<RunOutcome> {
        tracing::debug!("Calling git without ssh wrapped environment");
        tracing::debug!("Git path: {:?} {:?}", self.path, args);
        self.spawner
            .spawn(&self.path, args, &[])
            .await
            .with_context(|| format!("Failed to run git at {}", self.path.display()))
    }

    /// git call with `GIT_SSH_COMMAND` pointing at `config`.
    pub async fn ssh_call(
        &self,
        args: &[String],
        config: &ConfigRecord,
        ssh_options: &[String],
    ) -> Result<RunOutcome> {
        tracing::debug!("Calling git with ssh wrapped environment: {}", config.name());
        tracing::debug!("Git path: {:?} {:?}", self.path, args);

        let command = ssh_command(config, ssh_options);
        tracing::debug!("SSH env: {}={}", SSH_COMMAND_ENV, command);

        self.spawner
            .spawn(&self.path, args, &[(SSH_COMMAND_ENV.to_string(), command)])
            .await
            .with_context(|| format!("Failed to run git at {}", self.path.display()))
    }
}

/// Runs git for a resolved [`Invocation`], or nothing if the run is done.
pub struct GitRunner<S = ProcessSpawner> {
    git: Git<S>,
    invocation: Invocation,
}

impl<S: Spawner> GitRunner<S> {
    pub fn new(git: Git<S>, invocation: Invocation) -> Self {
        Self { git, invocation }
    }

    pub async fn call(&self, git_args: &[String]) -> Result<RunOutcome> {
        if self.invocation.done {
            tracing::debug!("Already done, ignore call()");
            return Ok(RunOutcome::Skipped);
        }

        match &self.invocation.identity {
            Some(config) => {
                self.git
                    .ssh_call(git_args, config, &self.invocation.ssh_options)
                    .await
            }
            None => self.git.call(git_args).await,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SpawnCall {
        pub program: PathBuf,
        pub args: Vec<String>,
        pub env: Vec<(String, String)>,
    }

    /// Records spawn requests instead of starting processes.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSpawner {
        pub calls: Arc<Mutex<Vec<SpawnCall>>>,
        pub exit_code: Option<i32>,
    }

    impl RecordingSpawner {
        pub fn calls(&self) -> Vec<SpawnCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Spawner for RecordingSpawner {
        async fn spawn(
            &self,
            program: &Path,
            args: &[String],
            env: &[(String, String)],
        ) -> io::Result<RunOutcome> {
            self.calls.lock().unwrap().push(SpawnCall {
                program: program.to_path_buf(),
                args: args.to_vec(),
                env: env.to_vec(),
            });
            Ok(RunOutcome::Exited(self.exit_code.unwrap_or(0)))
        }
    }
}
