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

//! Config directory resolution.
//!
//! Priority order:
//! 1. Explicit `--config-dir` argument
//! 2. `$XDG_CONFIG_HOME/git-ssh` when the variable is set and non-empty
//! 3. `~/.config/git-ssh`

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Directory name used under `XDG_CONFIG_HOME`.
pub const APP_DIR_NAME: &str = "git-ssh";

/// Fallback when neither an explicit directory nor `XDG_CONFIG_HOME` is given.
pub const DEFAULT_CONFIG_DIR: &str = "~/.config/git-ssh";

const XDG_CONFIG_HOME: &str = "XDG_CONFIG_HOME";

/// Expand a leading `~` to `home`.
///
/// Paths without a leading tilde, or a missing home, are returned untouched.
fn expand_tilde_with(path: &Path, home: Option<PathBuf>) -> PathBuf {
    let Some(home) = home else {
        tracing::warn!("Home directory unknown, leaving {:?} unexpanded", path);
        return path.to_path_buf();
    };
    match path.strip_prefix("~") {
        Ok(rest) if rest.as_os_str().is_empty() => home,
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Resolve the config directory from the process environment.
pub fn resolve_config_dir(explicit: Option<&Path>) -> PathBuf {
    resolve_config_dir_from(
        explicit,
        std::env::var_os(XDG_CONFIG_HOME),
        dirs::home_dir(),
    )
}

/// Resolve the config directory from explicit inputs.
pub fn resolve_config_dir_from(
    explicit: Option<&Path>,
    xdg_config_home: Option<OsString>,
    home: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = explicit {
        let dir = expand_tilde_with(dir, home);
        tracing::debug!("Config dir from argument: {:?}", dir);
        return dir;
    }

    match xdg_config_home {
        Some(xdg) if !xdg.is_empty() => {
            let dir = PathBuf::from(xdg).join(APP_DIR_NAME);
            tracing::debug!("Config dir from {}: {:?}", XDG_CONFIG_HOME, dir);
            dir
        }
        _ => {
            let dir = expand_tilde_with(Path::new(DEFAULT_CONFIG_DIR), home);
            tracing::debug!("Config dir from fallback: {:?}", dir);
            dir
        }
    }
}

/// Create the config directory if it is missing.
///
/// Failures are logged only; a later store operation will report its own error.
pub fn ensure_config_dir(dir: &Path) {
    match std::fs::create_dir_all(dir) {
        Ok(()) => tracing::debug!("Config dir ready: {:?}", dir),
        Err(e) => tracing::error!("Unable to create config dir {:?}: {}", dir, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn home() -> Option<PathBuf> {
        Some(PathBuf::from("/home/user"))
    }

    #[test]
    fn test_explicit_dir_wins_over_xdg() {
        let dir = resolve_config_dir_from(
            Some(Path::new("/srv/identities")),
            Some(OsString::from("/xdg")),
            home(),
        );
        assert_eq!(dir, PathBuf::from("/srv/identities"));
    }

    #[test]
    fn test_explicit_dir_expands_tilde() {
        let dir = resolve_config_dir_from(Some(Path::new("~/ids")), None, home());
        assert_eq!(dir, PathBuf::from("/home/user/ids"));
    }

    #[test]
    fn test_xdg_wins_over_default() {
        let dir = resolve_config_dir_from(None, Some(OsString::from("/xdg")), home());
        assert_eq!(dir, PathBuf::from("/xdg/git-ssh"));
    }

    #[test]
    fn test_empty_xdg_falls_through() {
        let dir = resolve_config_dir_from(None, Some(OsString::new()), home());
        assert_eq!(dir, PathBuf::from("/home/user/.config/git-ssh"));
    }

    #[test]
    fn test_default_when_nothing_set() {
        let dir = resolve_config_dir_from(None, None, home());
        assert_eq!(dir, PathBuf::from("/home/user/.config/git-ssh"));
    }

    #[test]
    fn test_expand_tilde_variants() {
        assert_eq!(
            expand_tilde_with(Path::new("~"), home()),
            PathBuf::from("/home/user")
        );
        assert_eq!(
            expand_tilde_with(Path::new("/abs/path"), home()),
            PathBuf::from("/abs/path")
        );
        assert_eq!(
            expand_tilde_with(Path::new("~/.ssh"), None),
            PathBuf::from("~/.ssh")
        );
    }

    #[test]
    #[serial]
    fn test_resolve_reads_process_environment() {
        let original = std::env::var_os(XDG_CONFIG_HOME);

        unsafe {
            std::env::set_var(XDG_CONFIG_HOME, "/tmp/xdg-test");
        }
        let from_env = resolve_config_dir(None);
        let explicit = resolve_config_dir(Some(Path::new("/explicit")));

        unsafe {
            match original {
                Some(value) => std::env::set_var(XDG_CONFIG_HOME, value),
                None => std::env::remove_var(XDG_CONFIG_HOME),
            }
        }

        assert_eq!(from_env, PathBuf::from("/tmp/xdg-test/git-ssh"));
        assert_eq!(explicit, PathBuf::from("/explicit"));
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_default_dir_is_absolute_without_home_var() {
        let original_home = std::env::var_os("HOME");
        let original_xdg = std::env::var_os(XDG_CONFIG_HOME);

        unsafe {
            std::env::remove_var("HOME");
            std::env::remove_var(XDG_CONFIG_HOME);
        }
        let dir = resolve_config_dir(None);

        unsafe {
            if let Some(value) = original_home {
                std::env::set_var("HOME", value);
            }
            if let Some(value) = original_xdg {
                std::env::set_var(XDG_CONFIG_HOME, value);
            }
        }

        assert!(dir.is_absolute(), "{dir:?} should be absolute");
        assert!(dir.ends_with(".config/git-ssh"));
    }

    #[test]
    fn test_ensure_config_dir_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("nested").join("git-ssh");
        ensure_config_dir(&dir);
        ensure_config_dir(&dir);
        assert!(dir.is_dir());
    }
}
