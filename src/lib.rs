pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod utils;
pub mod wrapper;

pub use cli::WrapperArgs;
pub use config::{ConfigRecord, ConfigStore};
pub use error::WrapperError;
pub use git::{Git, GitRunner, ProcessSpawner, RunOutcome, Spawner};
pub use wrapper::{Invocation, handle_options, run};
