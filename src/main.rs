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

use std::io::Write;

use git_ssh::{cli::parse_args, git::ProcessSpawner, utils::init_logging, wrapper::run};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (wrapper_args, git_args) = parse_args(&args);

    init_logging(wrapper_args.log_level());
    tracing::debug!("wrapper args: {:?}", wrapper_args);
    tracing::debug!("plain args: {:?}", git_args);

    let mut stdout = std::io::stdout();
    let result = run(&wrapper_args, &git_args, ProcessSpawner, &mut stdout).await;
    let _ = stdout.flush();

    match result {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("FATAL  {e:#}");
            std::process::exit(1);
        }
    }
}
