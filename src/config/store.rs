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

//! Config store backed by a plain directory.
//!
//! The directory itself is the index: every lookup and listing rescans it.
//! Ordinary I/O failures are logged and reported as `false`. A missing key,
//! or a name that is not a plain file name, is returned as an error.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;

use super::record::{
    ConfigRecord, config_name_from_file, is_valid_config_name, versioned_file_name,
};
use crate::error::WrapperError;

#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the config file for `name` inside this store.
    pub fn versioned_path(&self, name: &str) -> PathBuf {
        self.dir.join(versioned_file_name(name))
    }

    /// Write (or overwrite) the config for `name` pointing at `key_path`.
    ///
    /// The confirmation line goes to `out`.
    pub fn write(
        &self,
        name: &str,
        key_path: &str,
        out: &mut dyn Write,
    ) -> Result<bool, WrapperError> {
        let path = self.versioned_path(name);
        if !is_valid_config_name(name) || key_path.is_empty() {
            return Err(WrapperError::bad_config(
                name,
                path.to_string_lossy().into_owned(),
            ));
        }

        if !Path::new(key_path).exists() {
            tracing::warn!("Key file does not exist (yet): {}", key_path);
        }

        let result = File::create(&path).and_then(|mut file| {
            file.write_all(render_config(key_path).as_bytes())?;
            file.flush()
        });

        match result {
            Ok(()) => {
                let _ = writeln!(out, "Config created: {} at {}", name, path.display());
                Ok(true)
            }
            Err(e) => {
                tracing::error!("Unable to write {:?}: {}", path, e);
                Ok(false)
            }
        }
    }

    /// Delete the config for `name`. The confirmation line goes to `out`.
    pub fn remove(&self, name: &str, out: &mut dyn Write) -> Result<bool, WrapperError> {
        let path = self.versioned_path(name);
        if !is_valid_config_name(name) {
            return Err(WrapperError::bad_config(
                name,
                path.to_string_lossy().into_owned(),
            ));
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                let _ = writeln!(out, "Config removed: {} at {}", name, path.display());
                Ok(true)
            }
            Err(e) => {
                tracing::error!("Unable to remove: {} at {:?}: {}", name, path, e);
                Ok(false)
            }
        }
    }

    /// Find the config whose file name is exactly `<name>.<version>`.
    pub fn find(&self, name: &str) -> Option<ConfigRecord> {
        tracing::debug!("Find SSH config for: {} in {:?}", name, self.dir);
        let wanted = versioned_file_name(name);

        self.config_files()
            .into_iter()
            .find(|(file_name, _)| *file_name == wanted)
            .and_then(|(_, path)| {
                tracing::debug!("Found config: {} at {:?}", name, path);
                ConfigRecord::new(name, path).ok()
            })
    }

    /// Print every stored config with its content to `out`, followed by a
    /// total. Returns the number of configs listed.
    pub fn list(&self, out: &mut dyn Write) -> usize {
        let mut count = 0;
        let _ = writeln!(out, "Listing all configs in: {}\n", self.dir.display());

        for (file_name, path) in self.config_files() {
            if config_name_from_file(&file_name).is_none() {
                continue;
            }
            count += 1;

            let _ = writeln!(out, "{} [{}] ({})\n", "●".blue(), file_name, path.display());
            for line in read_lines(&path) {
                let _ = writeln!(out, "    {line}");
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "{} Total config count: {}", "▶".cyan(), count);
        count
    }

    /// Regular files in the store directory as `(file name, full path)`.
    fn config_files(&self) -> Vec<(String, PathBuf)> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!("Unable to read config dir {:?}: {}", self.dir, e);
                return Vec::new();
            }
        };

        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| {
                let file_name = path.file_name()?.to_str()?.to_string();
                tracing::debug!("Check config: {:?}", path);
                Some((file_name, path))
            })
            .collect()
    }
}

/// Lazily read `path` line by line.
///
/// Open or read failures are logged and end the sequence early; callers
/// never see the error. Each call opens the file afresh.
pub fn read_lines(path: &Path) -> impl Iterator<Item = String> + use<> {
    let reader = match File::open(path) {
        Ok(file) => Some(BufReader::new(file)),
        Err(e) => {
            tracing::error!("Cannot read content from path {:?}: {}", path, e);
            None
        }
    };

    let path = path.to_path_buf();
    reader
        .into_iter()
        .flat_map(|reader| reader.lines())
        .map_while(move |line| match line {
            Ok(line) => Some(line),
            Err(e) => {
                tracing::error!("Cannot read content from path {:?}: {}", path, e);
                None
            }
        })
}

fn render_config(key_path: &str) -> String {
    format!(
        "# Created by git-ssh
# You may modify this file, but it may be overwritten without warning by
# git-ssh if you tell it to do so.

Host *
    IdentityFile {key_path}
    IdentitiesOnly yes
    AddKeysToAgent yes
"
    )
}
