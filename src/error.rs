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

//! Expected, user-facing errors.
//!
//! Every variant terminates the run with a single `FATAL` line and exit
//! code 1. I/O failures inside the config store are not represented here;
//! they are logged and reported as a `false` result instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WrapperError {
    /// The wrapped git binary does not exist on disk
    #[error("Git binary cannot be found at: {}", path.display())]
    GitNotFound { path: PathBuf },

    /// Creation string is not of the form `KEY_PATH:NAME`
    #[error("Create string is invalid format: {value} (must be <path to key>:<name>)")]
    InvalidCreateString { value: String },

    /// No stored config matches the requested name
    #[error("Could not find config matching key: {name}")]
    NoSshConfig { name: String },

    /// A record without a name or path reached an operation that needs both
    #[error("Config is invalid: [name: {name}, path: {path}]")]
    BadConfig { name: String, path: String },
}

impl WrapperError {
    pub(crate) fn bad_config(name: &str, path: impl Into<String>) -> Self {
        Self::BadConfig {
            name: name.to_string(),
            path: path.into(),
        }
    }
}
