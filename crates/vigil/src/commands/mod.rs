//! Command dispatch: bridges CLI args -> core operations -> output.

pub mod alerts;
pub mod analytics;
pub mod config_cmd;
pub mod health;
pub mod monitor;
pub mod review;
pub mod search;
pub mod upload;
pub mod use_cases;
pub mod util;
pub mod videos;

use vigil_core::ConsoleConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    config: ConsoleConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Alerts(args) => alerts::handle(config, args, global).await,
        Command::Review(args) => review::handle(config, args, global).await,
        Command::Search(args) => search::handle(config, args, global).await,
        Command::Analytics(args) => analytics::handle(config, args, global).await,
        Command::Videos(args) => videos::handle(config, args, global).await,
        Command::Monitor(args) => monitor::handle(config, args, global).await,
        Command::Upload(args) => upload::handle(config, args, global).await,
        Command::UseCases => use_cases::handle(config, global).await,
        Command::Health => health::handle(config, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
