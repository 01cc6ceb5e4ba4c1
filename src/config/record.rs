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

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::WrapperError;

/// Current on-disk format version, used as the file name suffix.
pub const CONFIG_VERSION: u32 = 2;

/// A stored SSH identity: its name and the path of its config file.
///
/// Both fields are always non-empty. Absence is expressed as
/// `Option<ConfigRecord>` by the lookup functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRecord {
    name: String,
    path: PathBuf,
}

impl ConfigRecord {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self, WrapperError> {
        let name = name.into();
        let path = path.into();
        if name.is_empty() || path.as_os_str().is_empty() {
            return Err(WrapperError::bad_config(
                &name,
                path.to_string_lossy().into_owned(),
            ));
        }
        Ok(Self { name, path })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ConfigRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.name, self.path.display())
    }
}

/// File name for a config called `name`: `<name>.<version>`.
pub fn versioned_file_name(name: &str) -> String {
    format!("{name}.{CONFIG_VERSION}")
}

/// Whether `name` maps to a single file directly inside the config directory.
///
/// Empty names, `.`/`..` and names containing a path separator are refused.
pub fn is_valid_config_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(std::path::is_separator)
}

/// Name of the config stored in `file_name`, if the suffix matches the
/// current version and the stem is non-empty.
pub fn config_name_from_file(file_name: &str) -> Option<&str> {
    let suffix = format!(".{CONFIG_VERSION}");
    file_name
        .strip_suffix(suffix.as_str())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_requires_name_and_path() {
        assert!(ConfigRecord::new("work", "/cfg/work.2").is_ok());
        assert!(matches!(
            ConfigRecord::new("", "/cfg/work.2"),
            Err(WrapperError::BadConfig { .. })
        ));
        assert!(matches!(
            ConfigRecord::new("work", ""),
            Err(WrapperError::BadConfig { .. })
        ));
    }

    #[test]
    fn test_versioned_file_name() {
        assert_eq!(versioned_file_name("work"), "work.2");
    }

    #[test]
    fn test_valid_config_names() {
        assert!(is_valid_config_name("work"));
        assert!(is_valid_config_name("my.work"));
        assert!(!is_valid_config_name(""));
        assert!(!is_valid_config_name("."));
        assert!(!is_valid_config_name(".."));
        assert!(!is_valid_config_name("/tmp/evil"));
        assert!(!is_valid_config_name("../work"));
        assert!(!is_valid_config_name("nested/work"));
    }

    #[test]
    fn test_config_name_from_file() {
        assert_eq!(config_name_from_file("work.2"), Some("work"));
        assert_eq!(config_name_from_file("my.work.2"), Some("my.work"));
        assert_eq!(config_name_from_file("work.1"), None);
        assert_eq!(config_name_from_file("work.12"), None);
        assert_eq!(config_name_from_file("work"), None);
        assert_eq!(config_name_from_file(".2"), None);
    }
}
