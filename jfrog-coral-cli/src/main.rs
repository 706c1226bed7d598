mod cli;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> ExitCode {
    jfrog_coral_core::init_tracing();
    let cli = Cli::parse();
    debug!(env_file = ?cli.env_file, "CLI arguments parsed");

    match jfrog_coral_core::run(cli.env_file.as_deref()).await {
        Ok(()) => {
            info!("Agent stopped");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "Agent terminated");
            ExitCode::FAILURE
        }
    }
}
