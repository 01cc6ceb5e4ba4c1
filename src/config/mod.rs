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

//! Named SSH identity configs stored as `<name>.<version>` files.

mod dir;
mod record;
mod store;

pub use dir::{
    APP_DIR_NAME, DEFAULT_CONFIG_DIR, ensure_config_dir, resolve_config_dir, resolve_config_dir_from,
};
pub use record::{
    CONFIG_VERSION, ConfigRecord, config_name_from_file, is_valid_config_name, versioned_file_name,
};
pub use store::{ConfigStore, read_lines};
