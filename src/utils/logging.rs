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

use tracing_subscriber::EnvFilter;

/// Diagnostic level for a single run.
///
/// Chosen once from `--ssh-debug` and handed to [`init_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    #[default]
    Off,
    Debug,
}

/// Create an environment filter for the given level
pub fn create_env_filter(level: LogLevel) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match level {
            LogLevel::Off => EnvFilter::new("off"),
            LogLevel::Debug => EnvFilter::new("git_ssh=debug"),
        }
    }
}

/// Initialize logging to stderr.
///
/// git's own stdout is inherited by the child, so diagnostics never go there.
pub fn init_logging(level: LogLevel) {
    let filter = create_env_filter(level);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_create_env_filter() {
        let original = std::env::var_os("RUST_LOG");
        unsafe {
            std::env::remove_var("RUST_LOG");
        }

        let off = create_env_filter(LogLevel::Off).to_string();
        let debug = create_env_filter(LogLevel::Debug).to_string();

        unsafe {
            if let Some(value) = original {
                std::env::set_var("RUST_LOG", value);
            }
        }

        assert_eq!(off, "off");
        assert_eq!(debug, "git_ssh=debug");
    }

    #[test]
    fn test_default_level_is_off() {
        assert_eq!(LogLevel::default(), LogLevel::Off);
    }
}
