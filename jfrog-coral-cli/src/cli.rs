use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "jfrog-coral-agent",
    version,
    about = "Coral agent that manages JFrog Artifactory through the JFrog MCP server"
)]
pub struct Cli {
    /// Environment file merged in dev mode (default: ./.env when present)
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,
}
