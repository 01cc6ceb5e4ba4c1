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

#![cfg(unix)]

use std::process::Command;
use tempfile::tempdir;

fn git_ssh() -> Command {
    Command::new(env!("CARGO_BIN_EXE_git-ssh"))
}

#[test]
fn test_missing_git_exits_with_fatal() {
    let temp = tempdir().unwrap();
    let output = git_ssh()
        .arg(format!("--config-dir={}", temp.path().display()))
        .arg("--git-path=/nonexistent/bin/git")
        .arg("status")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("FATAL  "));
    assert!(stderr.contains("/nonexistent/bin/git"));
}

#[test]
fn test_unknown_identity_exits_with_fatal() {
    let temp = tempdir().unwrap();
    let output = git_ssh()
        .arg(format!("--config-dir={}", temp.path().display()))
        .arg("--git-path=/bin/sh")
        .arg("--ssh=ghost")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("FATAL  Could not find config matching key: ghost"));
}

#[test]
fn test_child_sees_ssh_command_and_exit_code() {
    let temp = tempdir().unwrap();
    let created = git_ssh()
        .arg(format!("--config-dir={}", temp.path().display()))
        .arg("--git-path=/bin/sh")
        .arg("--create-config=/keys/id_work:work")
        .output()
        .unwrap();
    assert_eq!(created.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&created.stdout).contains("Config created: work"));

    let output = git_ssh()
        .arg(format!("--config-dir={}", temp.path().display()))
        .arg("--git-path=/bin/sh")
        .arg("--ssh=work")
        .arg("--")
        .arg("-c")
        .arg("printf '%s' \"$GIT_SSH_COMMAND\"; exit 7")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(7));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("ssh -F "));
    assert!(stdout.contains("work.2"));
}

#[test]
fn test_list_on_empty_dir() {
    let temp = tempdir().unwrap();
    let output = git_ssh()
        .arg(format!("--config-dir={}", temp.path().display()))
        .arg("--git-path=/bin/sh")
        .arg("--list-configs")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total config count: 0"));
}
